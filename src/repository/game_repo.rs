//! Game repository (数据库访问层)

use crate::{
    error::AppError,
    models::{
        game::{Game, GameListQuery, GameWithRating, UpsertGameRequest},
        pagination::PageParams,
    },
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct GameRepository {
    db: PgPool,
}

impl GameRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找游戏
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Game>, AppError> {
        let game = sqlx::query_as::<_, Game>(
            "SELECT * FROM games WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(game)
    }

    /// 创建游戏
    pub async fn create(&self, req: &UpsertGameRequest) -> Result<Game, AppError> {
        let game = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO games (uploader_user_id, title, genre, release_date, age_rating, min_age, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#
        )
        .bind(req.uploader_user_id)
        .bind(&req.title)
        .bind(&req.genre)
        .bind(req.release_date)
        .bind(&req.age_rating)
        .bind(req.min_age)
        .bind(&req.cover_url)
        .fetch_one(&self.db)
        .await?;

        Ok(game)
    }

    /// 更新游戏
    pub async fn update(&self, id: Uuid, req: &UpsertGameRequest) -> Result<Option<Game>, AppError> {
        let game = sqlx::query_as::<_, Game>(
            r#"
            UPDATE games
            SET
                uploader_user_id = $2,
                title = $3,
                genre = $4,
                release_date = $5,
                age_rating = $6,
                min_age = $7,
                cover_url = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(req.uploader_user_id)
        .bind(&req.title)
        .bind(&req.genre)
        .bind(req.release_date)
        .bind(&req.age_rating)
        .bind(req.min_age)
        .bind(&req.cover_url)
        .fetch_optional(&self.db)
        .await?;

        Ok(game)
    }

    /// 设置上架状态
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE games SET is_active = $2, updated_at = NOW() WHERE id = $1"
        )
        .bind(id)
        .bind(is_active)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 删除游戏
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 按过滤条件分页查询游戏
    pub async fn list_filtered(
        &self,
        filter: &GameListQuery,
        page: &PageParams,
    ) -> Result<(Vec<Game>, i64), AppError> {
        let games = sqlx::query_as::<_, Game>(
            r#"
            SELECT * FROM games
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR genre ILIKE $2)
              AND ($3::int IS NULL OR EXTRACT(YEAR FROM release_date) = $3)
              AND ($4::int IS NULL OR min_age >= $4)
              AND ($5::text IS NULL OR age_rating = $5)
              AND ($6::boolean IS NULL OR is_active = $6)
            ORDER BY title
            LIMIT $7 OFFSET $8
            "#
        )
        .bind(&filter.title)
        .bind(&filter.genre)
        .bind(filter.release_year)
        .bind(filter.min_age)
        .bind(&filter.age_rating)
        .bind(filter.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM games
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR genre ILIKE $2)
              AND ($3::int IS NULL OR EXTRACT(YEAR FROM release_date) = $3)
              AND ($4::int IS NULL OR min_age >= $4)
              AND ($5::text IS NULL OR age_rating = $5)
              AND ($6::boolean IS NULL OR is_active = $6)
            "#
        )
        .bind(&filter.title)
        .bind(&filter.genre)
        .bind(filter.release_year)
        .bind(filter.min_age)
        .bind(&filter.age_rating)
        .bind(filter.is_active)
        .fetch_one(&self.db)
        .await?;

        Ok((games, total))
    }

    /// 按类型查询（大小写不敏感的精确匹配）
    pub async fn list_by_genre(&self, genre: &str) -> Result<Vec<Game>, AppError> {
        let games = sqlx::query_as::<_, Game>(
            "SELECT * FROM games WHERE genre ILIKE $1 ORDER BY title"
        )
        .bind(genre)
        .fetch_all(&self.db)
        .await?;

        Ok(games)
    }

    /// 标题子串搜索
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<Game>, AppError> {
        let games = sqlx::query_as::<_, Game>(
            "SELECT * FROM games WHERE title ILIKE '%' || $1 || '%' ORDER BY title"
        )
        .bind(title)
        .fetch_all(&self.db)
        .await?;

        Ok(games)
    }

    /// 评分最高的游戏
    pub async fn top_rated(&self, take: i64) -> Result<Vec<GameWithRating>, AppError> {
        let games = sqlx::query_as::<_, GameWithRating>(
            r#"
            SELECT g.*, agg.avg_score, agg.reviews_count
            FROM (
                SELECT game_id, AVG(score)::float8 AS avg_score, COUNT(*) AS reviews_count
                FROM reviews
                GROUP BY game_id
            ) agg
            JOIN games g ON g.id = agg.game_id
            ORDER BY agg.avg_score DESC, agg.reviews_count DESC
            LIMIT $1
            "#
        )
        .bind(take)
        .fetch_all(&self.db)
        .await?;

        Ok(games)
    }

    /// 评分最低的游戏
    pub async fn low_rated(&self, take: i64) -> Result<Vec<GameWithRating>, AppError> {
        let games = sqlx::query_as::<_, GameWithRating>(
            r#"
            SELECT g.*, agg.avg_score, agg.reviews_count
            FROM (
                SELECT game_id, AVG(score)::float8 AS avg_score, COUNT(*) AS reviews_count
                FROM reviews
                GROUP BY game_id
            ) agg
            JOIN games g ON g.id = agg.game_id
            ORDER BY agg.avg_score ASC, agg.reviews_count DESC
            LIMIT $1
            "#
        )
        .bind(take)
        .fetch_all(&self.db)
        .await?;

        Ok(games)
    }

    /// 按适龄范围查询；include_unknown 时包含未标注 min_age 的游戏
    pub async fn list_by_age_range(
        &self,
        min: Option<i32>,
        max: Option<i32>,
        include_unknown: bool,
    ) -> Result<Vec<Game>, AppError> {
        let games = sqlx::query_as::<_, Game>(
            r#"
            SELECT * FROM games
            WHERE (
                min_age IS NOT NULL
                AND ($1::int IS NULL OR min_age >= $1)
                AND ($2::int IS NULL OR min_age <= $2)
            )
            OR ($3 AND min_age IS NULL)
            ORDER BY title
            "#
        )
        .bind(min)
        .bind(max)
        .bind(include_unknown)
        .fetch_all(&self.db)
        .await?;

        Ok(games)
    }

    /// 统计某游戏的差评数量（score <= threshold）
    pub async fn count_bad_reviews(&self, game_id: Uuid, threshold: i16) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE game_id = $1 AND score <= $2"
        )
        .bind(game_id)
        .bind(threshold)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }
}
