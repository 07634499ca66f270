//! 数据模型模块
//! 目录实体（用户、游戏、评论）、登录凭证与分页模型

pub mod credential;
pub mod game;
pub mod pagination;
pub mod review;
pub mod user;
