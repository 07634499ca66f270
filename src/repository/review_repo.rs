//! Review repository (数据库访问层)

use crate::{
    error::AppError,
    models::{
        pagination::PageParams,
        review::{CreateReviewRequest, Review, ReviewListQuery, UpdateReviewRequest},
    },
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewRepository {
    db: PgPool,
}

impl ReviewRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找评论
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(review)
    }

    /// 创建评论（created_at 由服务端生成）
    pub async fn create(&self, game_id: Uuid, req: &CreateReviewRequest) -> Result<Review, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (game_id, user_id, content, score)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(game_id)
        .bind(req.user_id)
        .bind(&req.content)
        .bind(req.score)
        .fetch_one(&self.db)
        .await?;

        Ok(review)
    }

    /// 更新评论（缺省字段保留原值）
    pub async fn update(&self, id: Uuid, req: &UpdateReviewRequest) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET
                content = COALESCE($2, content),
                score = COALESCE($3, score)
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(&req.content)
        .bind(req.score)
        .fetch_optional(&self.db)
        .await?;

        Ok(review)
    }

    /// 删除评论
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 按过滤条件分页查询某游戏的评论
    pub async fn list_filtered(
        &self,
        game_id: Uuid,
        filter: &ReviewListQuery,
        page: &PageParams,
    ) -> Result<(Vec<Review>, i64), AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE game_id = $1
              AND ($2::uuid IS NULL OR user_id = $2)
              AND ($3::smallint IS NULL OR score >= $3)
              AND ($4::smallint IS NULL OR score <= $4)
              AND ($5::timestamptz IS NULL OR created_at >= $5)
              AND ($6::timestamptz IS NULL OR created_at <= $6)
              AND ($7::boolean IS NULL OR is_active = $7)
            ORDER BY created_at DESC
            LIMIT $8 OFFSET $9
            "#
        )
        .bind(game_id)
        .bind(filter.user_id)
        .bind(filter.min_score)
        .bind(filter.max_score)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reviews
            WHERE game_id = $1
              AND ($2::uuid IS NULL OR user_id = $2)
              AND ($3::smallint IS NULL OR score >= $3)
              AND ($4::smallint IS NULL OR score <= $4)
              AND ($5::timestamptz IS NULL OR created_at >= $5)
              AND ($6::timestamptz IS NULL OR created_at <= $6)
              AND ($7::boolean IS NULL OR is_active = $7)
            "#
        )
        .bind(game_id)
        .bind(filter.user_id)
        .bind(filter.min_score)
        .bind(filter.max_score)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.is_active)
        .fetch_one(&self.db)
        .await?;

        Ok((reviews, total))
    }
}
