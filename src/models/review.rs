//! Review domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Game review
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub score: i16,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create review request (game id comes from the URL, created_at is
/// server-assigned)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 500))]
    pub content: String,
    #[validate(range(min = 1, max = 10))]
    pub score: i16,
}

/// Update review request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub score: Option<i16>,
}

/// List query: filters plus pagination
#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub user_id: Option<Uuid>,
    pub min_score: Option<i16>,
    pub max_score: Option<i16>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// Review response
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub score: i16,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            game_id: review.game_id,
            user_id: review.user_id,
            content: review.content,
            score: review.score,
            created_at: review.created_at,
        }
    }
}
