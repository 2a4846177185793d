use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::Result;
use ulid::Ulid;

use super::models::AuthUser;
use super::Db;

impl Db {
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64> {
        let password_hash = hash_password(password)?;

        let user_id: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, display_name, role) VALUES (?1, ?2, ?3, ?4) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("new user created: id={user_id}, email={email}");
        Ok(user_id)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT id, email, display_name, role FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        let stored_hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE email = ?1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        match stored_hash {
            Some(hash) => Ok(verify_password(password, &hash)),
            None => Ok(false),
        }
    }

    pub async fn create_user_session(&self, user_id: i64) -> Result<String> {
        let session = Ulid::new().to_string();

        sqlx::query("INSERT INTO user_sessions (id, user_id) VALUES (?1, ?2)")
            .bind(&session)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.email, u.display_name, u.role
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ?1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_sessions WHERE id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Run argon2 hashing on a dedicated thread with a large stack to avoid
/// stack overflow in debug builds.
fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024) // 4 MB stack
        .spawn(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::default();
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
        })?
        .join()
        .map_err(|_| color_eyre::eyre::eyre!("hash thread panicked"))?
}

fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024)
        .spawn(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(h) => h,
                Err(_) => return false,
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .map(|h| h.join().unwrap_or(false))
        .unwrap_or(false)
}
