//! 评论业务服务

use crate::{
    error::AppError,
    models::{
        pagination::{PagedResponse, PageParams},
        review::{
            CreateReviewRequest, Review, ReviewListQuery, ReviewResponse, UpdateReviewRequest,
        },
    },
    repository::{GameRepository, ReviewRepository, UserRepository},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewService {
    db: PgPool,
}

impl ReviewService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 分页查询某游戏的评论
    pub async fn list_for_game(
        &self,
        game_id: Uuid,
        filter: ReviewListQuery,
    ) -> Result<PagedResponse<ReviewResponse>, AppError> {
        self.ensure_game_exists(game_id).await?;

        let page = PageParams::new(filter.page_number, filter.page_size);

        let repo = ReviewRepository::new(self.db.clone());
        let (reviews, total) = repo.list_filtered(game_id, &filter, &page).await?;

        let items = reviews.into_iter().map(ReviewResponse::from).collect();
        Ok(PagedResponse::new(items, total, &page))
    }

    /// 获取某游戏下的单条评论
    pub async fn get(&self, game_id: Uuid, id: Uuid) -> Result<Review, AppError> {
        let repo = ReviewRepository::new(self.db.clone());

        match repo.find_by_id(&id).await? {
            Some(review) if review.game_id == game_id => Ok(review),
            _ => Err(AppError::not_found("review")),
        }
    }

    /// 创建评论
    pub async fn create(&self, game_id: Uuid, req: CreateReviewRequest) -> Result<Review, AppError> {
        self.ensure_game_exists(game_id).await?;

        let user_repo = UserRepository::new(self.db.clone());
        if user_repo.find_by_id(&req.user_id).await?.is_none() {
            return Err(AppError::not_found("user"));
        }

        let repo = ReviewRepository::new(self.db.clone());
        repo.create(game_id, &req).await
    }

    /// 更新评论
    pub async fn update(
        &self,
        game_id: Uuid,
        id: Uuid,
        req: UpdateReviewRequest,
    ) -> Result<Review, AppError> {
        // 确认评论属于该游戏
        self.get(game_id, id).await?;

        let repo = ReviewRepository::new(self.db.clone());
        repo.update(id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("review"))
    }

    /// 删除评论
    pub async fn delete(&self, game_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.get(game_id, id).await?;

        let repo = ReviewRepository::new(self.db.clone());
        if !repo.delete(id).await? {
            return Err(AppError::not_found("review"));
        }

        Ok(())
    }

    async fn ensure_game_exists(&self, game_id: Uuid) -> Result<(), AppError> {
        let game_repo = GameRepository::new(self.db.clone());
        if game_repo.find_by_id(&game_id).await?.is_none() {
            return Err(AppError::not_found("game"));
        }
        Ok(())
    }
}
