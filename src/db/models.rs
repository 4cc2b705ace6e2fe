use sqlx::FromRow;

/// Row of `users`. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Plaintext user record as read from the bulk users file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}
