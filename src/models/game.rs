//! Game domain models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Catalog game entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    pub id: Uuid,
    pub uploader_user_id: Uuid,
    pub title: String,
    pub genre: String,
    pub release_date: Option<NaiveDate>,
    pub age_rating: Option<String>,
    pub min_age: Option<i32>,
    pub cover_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Game joined with its review aggregate
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameWithRating {
    #[sqlx(flatten)]
    pub game: Game,
    pub avg_score: f64,
    pub reviews_count: i64,
}

/// Create/update game request
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_game_consistency))]
pub struct UpsertGameRequest {
    pub uploader_user_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub genre: String,
    #[validate(custom(function = validate_release_date))]
    pub release_date: Option<NaiveDate>,
    #[validate(custom(function = validate_age_rating))]
    pub age_rating: Option<String>,
    #[validate(range(min = 0))]
    pub min_age: Option<i32>,
    #[validate(url)]
    pub cover_url: Option<String>,
}

/// List query: filters plus pagination
#[derive(Debug, Deserialize)]
pub struct GameListQuery {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i32>,
    pub min_age: Option<i32>,
    pub age_rating: Option<String>,
    pub is_active: Option<bool>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// Title search query
#[derive(Debug, Deserialize)]
pub struct TitleSearchQuery {
    pub title: String,
}

/// Age range query
#[derive(Debug, Deserialize)]
pub struct AgeRangeQuery {
    pub min: Option<i32>,
    pub max: Option<i32>,
    #[serde(default)]
    pub include_unknown: bool,
}

/// Rating list query (top-rated / low-rated)
#[derive(Debug, Deserialize)]
pub struct TakeQuery {
    pub take: Option<i64>,
}

/// Game response, optionally carrying the review aggregate
#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub id: Uuid,
    pub uploader_user_id: Uuid,
    pub title: String,
    pub genre: String,
    pub release_date: Option<NaiveDate>,
    pub age_rating: Option<String>,
    pub min_age: Option<i32>,
    pub cover_url: Option<String>,
    pub is_active: bool,
    pub average_score: Option<f64>,
    pub reviews_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self {
            id: game.id,
            uploader_user_id: game.uploader_user_id,
            title: game.title,
            genre: game.genre,
            release_date: game.release_date,
            age_rating: game.age_rating,
            min_age: game.min_age,
            cover_url: game.cover_url,
            is_active: game.is_active,
            average_score: None,
            reviews_count: 0,
            created_at: game.created_at,
        }
    }
}

impl From<GameWithRating> for GameResponse {
    fn from(rated: GameWithRating) -> Self {
        let mut response = GameResponse::from(rated.game);
        // Round to two decimals for presentation
        response.average_score = Some((rated.avg_score * 100.0).round() / 100.0);
        response.reviews_count = rated.reviews_count;
        response
    }
}

/// Allowed age ratings: E (everyone), T (teen), M (mature)
fn validate_age_rating(age_rating: &str) -> Result<(), ValidationError> {
    match age_rating {
        "E" | "T" | "M" => Ok(()),
        _ => Err(ValidationError::new("age_rating_must_be_e_t_or_m")),
    }
}

fn validate_release_date(release_date: &NaiveDate) -> Result<(), ValidationError> {
    if *release_date > Utc::now().date_naive() {
        return Err(ValidationError::new("release_date_must_not_be_in_the_future"));
    }
    Ok(())
}

/// min_age must stay consistent with the declared rating:
/// E <= 12, T 13-16, M >= 17
fn validate_game_consistency(request: &UpsertGameRequest) -> Result<(), ValidationError> {
    let (Some(rating), Some(min_age)) = (request.age_rating.as_deref(), request.min_age) else {
        return Ok(());
    };

    let consistent = match rating {
        "E" => min_age <= 12,
        "T" => (13..=16).contains(&min_age),
        "M" => min_age >= 17,
        _ => true,
    };

    if !consistent {
        return Err(ValidationError::new("min_age_inconsistent_with_age_rating"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> UpsertGameRequest {
        UpsertGameRequest {
            uploader_user_id: Uuid::new_v4(),
            title: "Starfall".to_string(),
            genre: "RPG".to_string(),
            release_date: NaiveDate::from_ymd_opt(2023, 11, 1),
            age_rating: Some("T".to_string()),
            min_age: Some(14),
            cover_url: Some("https://cdn.example.com/starfall.png".to_string()),
        }
    }

    #[test]
    fn test_valid_game_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_unknown_age_rating_rejected() {
        let mut req = valid_request();
        req.age_rating = Some("X".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_inconsistent_min_age_rejected() {
        let mut req = valid_request();
        req.age_rating = Some("E".to_string());
        req.min_age = Some(17);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_future_release_date_rejected() {
        let mut req = valid_request();
        req.release_date = Some(Utc::now().date_naive() + chrono::Duration::days(60));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_invalid_cover_url_rejected() {
        let mut req = valid_request();
        req.cover_url = Some("not a url".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rating_response_rounds_average() {
        let rated = GameWithRating {
            game: Game {
                id: Uuid::new_v4(),
                uploader_user_id: Uuid::new_v4(),
                title: "Starfall".to_string(),
                genre: "RPG".to_string(),
                release_date: None,
                age_rating: None,
                min_age: None,
                cover_url: None,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            avg_score: 7.6666,
            reviews_count: 3,
        };

        let response = GameResponse::from(rated);
        assert_eq!(response.average_score, Some(7.67));
        assert_eq!(response.reviews_count, 3);
    }
}
