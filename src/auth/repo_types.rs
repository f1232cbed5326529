use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub hashed_password: String, // Argon2 PHC string
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}
