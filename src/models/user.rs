//! User domain models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Catalog user (review author / game uploader)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub telephone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(custom(function = validate_birth_date))]
    pub date_of_birth: NaiveDate,
    #[validate(length(max = 15))]
    pub telephone: Option<String>,
}

/// Update user request (missing fields keep their stored value)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    #[validate(custom(function = validate_birth_date))]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 15))]
    pub telephone: Option<String>,
    pub is_active: Option<bool>,
}

/// List query: substring filters plus pagination
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub telephone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            date_of_birth: user.date_of_birth,
            telephone: user.telephone,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Users must be at least 13 years old and born in the past
fn validate_birth_date(date_of_birth: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();

    if *date_of_birth >= today {
        return Err(ValidationError::new("date_of_birth_must_be_in_the_past"));
    }

    let age = today.years_since(*date_of_birth).unwrap_or(0);
    if age < 13 {
        return Err(ValidationError::new("user_must_be_at_least_13"));
    }

    Ok(())
}
