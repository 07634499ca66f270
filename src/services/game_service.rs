//! 游戏业务服务
//! 标题关键字校验与差评自动下架规则

use crate::{
    error::AppError,
    models::{
        game::{Game, GameListQuery, GameResponse, GameWithRating, UpsertGameRequest},
        pagination::{PagedResponse, PageParams},
    },
    repository::{GameRepository, UserRepository},
};
use sqlx::PgPool;
use uuid::Uuid;

/// 标题中禁止出现的关键字
const FORBIDDEN_TITLE_WORDS: [&str; 3] = ["hack", "cheat", "pirata"];

/// 差评判定阈值（score <= 4 视为差评）
const BAD_SCORE_THRESHOLD: i16 = 4;

/// 达到该差评数量后自动下架
const BAD_COUNT_LIMIT: i64 = 5;

pub struct GameService {
    db: PgPool,
}

impl GameService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 分页查询游戏
    pub async fn list(&self, filter: GameListQuery) -> Result<PagedResponse<GameResponse>, AppError> {
        let page = PageParams::new(filter.page_number, filter.page_size);

        let repo = GameRepository::new(self.db.clone());
        let (games, total) = repo.list_filtered(&filter, &page).await?;

        let items = games.into_iter().map(GameResponse::from).collect();
        Ok(PagedResponse::new(items, total, &page))
    }

    /// 获取单个游戏
    pub async fn get(&self, id: Uuid) -> Result<Game, AppError> {
        let repo = GameRepository::new(self.db.clone());
        repo.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("game"))
    }

    /// 创建游戏
    pub async fn create(&self, req: UpsertGameRequest) -> Result<Game, AppError> {
        validate_title(&req.title)?;

        let user_repo = UserRepository::new(self.db.clone());
        if user_repo.find_by_id(&req.uploader_user_id).await?.is_none() {
            return Err(AppError::not_found("uploader user"));
        }

        let repo = GameRepository::new(self.db.clone());
        repo.create(&req).await
    }

    /// 更新游戏
    ///
    /// 更新后重新评估差评规则：差评数量达到阈值的游戏自动下架。
    pub async fn update(&self, id: Uuid, req: UpsertGameRequest) -> Result<Game, AppError> {
        validate_title(&req.title)?;

        let repo = GameRepository::new(self.db.clone());

        if repo.find_by_id(&id).await?.is_none() {
            return Err(AppError::not_found("game"));
        }

        let mut game = repo
            .update(id, &req)
            .await?
            .ok_or_else(|| AppError::not_found("game"))?;

        let bad_reviews = repo.count_bad_reviews(id, BAD_SCORE_THRESHOLD).await?;
        if game.is_active && bad_reviews >= BAD_COUNT_LIMIT {
            tracing::info!(
                game_id = %id,
                bad_reviews,
                "Deactivating game after repeated low scores"
            );
            repo.set_active(id, false).await?;
            game.is_active = false;
        }

        Ok(game)
    }

    /// 删除游戏
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let repo = GameRepository::new(self.db.clone());

        if !repo.delete(id).await? {
            return Err(AppError::not_found("game"));
        }

        Ok(())
    }

    /// 按类型查询
    pub async fn list_by_genre(&self, genre: &str) -> Result<Vec<Game>, AppError> {
        let repo = GameRepository::new(self.db.clone());
        repo.list_by_genre(genre).await
    }

    /// 标题子串搜索
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<Game>, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("title must not be empty".to_string()));
        }

        let repo = GameRepository::new(self.db.clone());
        repo.search_by_title(title).await
    }

    /// 评分最高的游戏
    pub async fn top_rated(&self, take: Option<i64>) -> Result<Vec<GameWithRating>, AppError> {
        let repo = GameRepository::new(self.db.clone());
        repo.top_rated(clamp_take(take)).await
    }

    /// 评分最低的游戏
    pub async fn low_rated(&self, take: Option<i64>) -> Result<Vec<GameWithRating>, AppError> {
        let repo = GameRepository::new(self.db.clone());
        repo.low_rated(clamp_take(take)).await
    }

    /// 按适龄范围查询
    pub async fn list_by_age_range(
        &self,
        min: Option<i32>,
        max: Option<i32>,
        include_unknown: bool,
    ) -> Result<Vec<Game>, AppError> {
        let repo = GameRepository::new(self.db.clone());
        repo.list_by_age_range(min, max, include_unknown).await
    }
}

fn clamp_take(take: Option<i64>) -> i64 {
    take.unwrap_or(10).clamp(1, 50)
}

/// 标题不得包含禁用关键字
fn validate_title(title: &str) -> Result<(), AppError> {
    let lowered = title.to_lowercase();
    for word in FORBIDDEN_TITLE_WORDS {
        if lowered.contains(word) {
            return Err(AppError::BusinessRule(format!(
                "Title contains a forbidden word: '{}'",
                word
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_rejects_forbidden_words() {
        assert!(validate_title("Honest Farming Sim").is_ok());
        assert!(validate_title("CHEAT Engine Deluxe").is_err());
        assert!(validate_title("hackers paradise").is_err());
        assert!(validate_title("La Pirata Dorada").is_err());
    }

    #[test]
    fn test_clamp_take() {
        assert_eq!(clamp_take(None), 10);
        assert_eq!(clamp_take(Some(0)), 1);
        assert_eq!(clamp_take(Some(500)), 50);
        assert_eq!(clamp_take(Some(25)), 25);
    }
}
