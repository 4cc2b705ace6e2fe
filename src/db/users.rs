use crate::db::models::User;
use crate::db::sqlite::SqlitePool;
use crate::error::{StockroomError, VerifyError};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{debug, info};

/// Username to password-hash mapping backing employee login.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash `password` with a fresh salt and insert the user.
    /// Fails with `UserExists` if the username is taken.
    pub async fn add_user(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), StockroomError> {
        let password_hash = hash_password(password).await?;

        let res = sqlx::query(
            r#"INSERT INTO users (username, password_hash, first_name, last_name)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => {
                info!(username, "user added");
                Ok(())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StockroomError::UserExists(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>, StockroomError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT username, password_hash, first_name, last_name
               FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Check a login attempt. Refusals come back as `StockroomError::Verify`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<(), StockroomError> {
        let Some(user) = self.find_user(username).await? else {
            debug!(username, "login refused: unknown user");
            return Err(VerifyError::UnknownUser.into());
        };

        if check_password(password, &user.password_hash).await? {
            Ok(())
        } else {
            debug!(username, "login refused: bad password");
            Err(VerifyError::BadPassword.into())
        }
    }
}

/// Argon2 hash with a fresh salt, computed on the blocking pool.
async fn hash_password(password: &str) -> Result<String, StockroomError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || -> Result<String, StockroomError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    })
    .await
    .map_err(|e| StockroomError::PasswordHash(format!("hash task join error: {e}")))?
}

/// `Ok(false)` on mismatch; malformed stored hashes are errors.
async fn check_password(password: &str, stored: &str) -> Result<bool, StockroomError> {
    let password = password.to_string();
    let stored = stored.to_string();
    tokio::task::spawn_blocking(move || -> Result<bool, StockroomError> {
        let parsed = PasswordHash::new(&stored)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    })
    .await
    .map_err(|e| StockroomError::PasswordHash(format!("verify task join error: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::connect;

    async fn store() -> CredentialStore {
        let pool = connect("sqlite::memory:").await.expect("open db");
        CredentialStore::new(pool)
    }

    #[tokio::test]
    async fn verify_distinguishes_unknown_user_and_bad_password() {
        let store = store().await;
        store
            .add_user("alice", "secret", "Alice", "A")
            .await
            .expect("add alice");

        assert!(store.verify("alice", "secret").await.is_ok());
        assert!(matches!(
            store.verify("alice", "wrong").await,
            Err(StockroomError::Verify(VerifyError::BadPassword))
        ));
        assert!(matches!(
            store.verify("bob", "x").await,
            Err(StockroomError::Verify(VerifyError::UnknownUser))
        ));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_and_original_kept() {
        let store = store().await;
        store
            .add_user("alice", "secret", "Alice", "A")
            .await
            .expect("add alice");

        let dup = store.add_user("alice", "other", "Alicia", "B").await;
        assert!(matches!(dup, Err(StockroomError::UserExists(ref u)) if u == "alice"));

        assert!(store.verify("alice", "secret").await.is_ok());
        assert!(store.verify("alice", "other").await.is_err());
        let user = store.find_user("alice").await.expect("lookup").expect("present");
        assert_eq!(user.first_name, "Alice");
    }

    #[tokio::test]
    async fn stored_hash_is_salted_and_not_plaintext() {
        let store = store().await;
        store.add_user("a", "same", "A", "A").await.expect("add a");
        store.add_user("b", "same", "B", "B").await.expect("add b");

        let a = store.find_user("a").await.expect("lookup").expect("a");
        let b = store.find_user("b").await.expect("lookup").expect("b");
        assert!(a.password_hash.starts_with("$argon2"));
        assert!(!a.password_hash.contains("same"));
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_free() {
        let hashing = tokio::spawn(async { hash_password("secret").await });

        let mut yields = 0u64;
        while !hashing.is_finished() {
            tokio::task::yield_now().await;
            yields += 1;
        }
        let hash = hashing.await.expect("join").expect("hash");

        // hashing inline would finish within the first yield
        assert!(yields > 1, "runtime stalled while hashing ({yields} yields)");
        assert!(check_password("secret", &hash).await.expect("check"));
        assert!(!check_password("other", &hash).await.expect("check"));
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_an_error_not_a_refusal() {
        assert!(matches!(
            check_password("secret", "not-a-phc-string").await,
            Err(StockroomError::PasswordHash(_))
        ));
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let store = store().await;
        store.add_user("alice", "secret", "Alice", "A").await.expect("add");
        assert!(matches!(
            store.verify("Alice", "secret").await,
            Err(StockroomError::Verify(VerifyError::UnknownUser))
        ));
    }
}
