//! Repository traits over session and favorite-set storage.
//!
//! The managers route their session and favorite access through these
//! traits; the in-memory mocks pin the contract down without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::ads::models::AdvertisementId;
use crate::auth::models::{Session, UserId};

/// Trait for session repository operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session token
    async fn create_session(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, sqlx::Error>;

    /// Find a session by its token
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, sqlx::Error>;

    /// Delete one session; deleting an unknown token is a no-op
    async fn delete_session(&self, token: &str) -> Result<(), sqlx::Error>;

    /// Delete every expired session, returning how many were removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error>;
}

/// Trait for favorite-set repository operations
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Add to the account's favorites; `false` if it was already present
    async fn add(
        &self,
        account_id: i64,
        advertisement_id: AdvertisementId,
    ) -> Result<bool, sqlx::Error>;

    /// Remove from the account's favorites; `false` if it was not present
    async fn remove(
        &self,
        account_id: i64,
        advertisement_id: AdvertisementId,
    ) -> Result<bool, sqlx::Error>;
}

/// PostgreSQL implementation of `SessionRepository`, backing `AuthManager`
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO sessions (token, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING token, user_id, created_at, expires_at",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(Session {
            token: row.get("token"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        })
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Session {
            token: r.get("token"),
            user_id: r.get("user_id"),
            created_at: r.get("created_at"),
            expires_at: r.get("expires_at"),
        }))
    }

    async fn delete_session(&self, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// PostgreSQL implementation of `FavoriteRepository`, backing `AdsManager`
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn add(
        &self,
        account_id: i64,
        advertisement_id: AdvertisementId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO favorite_advertisements (account_id, advertisement_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(account_id)
        .bind(advertisement_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn remove(
        &self,
        account_id: i64,
        advertisement_id: AdvertisementId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM favorite_advertisements
             WHERE account_id = $1 AND advertisement_id = $2",
        )
        .bind(account_id)
        .bind(advertisement_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

/// Mock implementation for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    pub struct MockSessionRepository {
        sessions: Arc<Mutex<HashMap<String, Session>>>,
    }

    impl Default for MockSessionRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockSessionRepository {
        pub fn new() -> Self {
            Self {
                sessions: Arc::new(Mutex::new(HashMap::new())),
            }
        }
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn create_session(
            &self,
            user_id: UserId,
            token: &str,
            expires_at: DateTime<Utc>,
        ) -> Result<Session, sqlx::Error> {
            let session = Session {
                token: token.to_string(),
                user_id,
                created_at: Utc::now(),
                expires_at,
            };
            self.sessions
                .lock()
                .unwrap()
                .insert(token.to_string(), session.clone());
            Ok(session)
        }

        async fn find_by_token(&self, token: &str) -> Result<Option<Session>, sqlx::Error> {
            Ok(self.sessions.lock().unwrap().get(token).cloned())
        }

        async fn delete_session(&self, token: &str) -> Result<(), sqlx::Error> {
            self.sessions.lock().unwrap().remove(token);
            Ok(())
        }

        async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|_, s| s.expires_at > now);
            Ok((before - sessions.len()) as u64)
        }
    }

    #[derive(Default)]
    pub struct MockFavoriteRepository {
        favorites: Arc<Mutex<HashSet<(i64, AdvertisementId)>>>,
    }

    #[async_trait]
    impl FavoriteRepository for MockFavoriteRepository {
        async fn add(
            &self,
            account_id: i64,
            advertisement_id: AdvertisementId,
        ) -> Result<bool, sqlx::Error> {
            Ok(self
                .favorites
                .lock()
                .unwrap()
                .insert((account_id, advertisement_id)))
        }

        async fn remove(
            &self,
            account_id: i64,
            advertisement_id: AdvertisementId,
        ) -> Result<bool, sqlx::Error> {
            Ok(self
                .favorites
                .lock()
                .unwrap()
                .remove(&(account_id, advertisement_id)))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::Duration;

        #[tokio::test]
        async fn test_mock_session_lifecycle() {
            let repo = MockSessionRepository::new();
            let token = Uuid::new_v4().to_string();
            let expires_at = Utc::now() + Duration::days(7);

            repo.create_session(1, &token, expires_at)
                .await
                .expect("Failed to create session");

            let found = repo.find_by_token(&token).await.unwrap();
            assert!(found.is_some(), "Should find stored session");
            assert_eq!(found.unwrap().user_id, 1);

            repo.delete_session(&token).await.unwrap();
            let found = repo.find_by_token(&token).await.unwrap();
            assert!(found.is_none(), "Deleted session should be gone");
        }

        #[tokio::test]
        async fn test_mock_delete_expired_keeps_live_sessions() {
            let repo = MockSessionRepository::new();
            let now = Utc::now();

            repo.create_session(1, "stale", now - Duration::minutes(1))
                .await
                .unwrap();
            repo.create_session(2, "live", now + Duration::days(1))
                .await
                .unwrap();

            let removed = repo.delete_expired(now).await.unwrap();
            assert_eq!(removed, 1, "Only the stale session should be removed");
            assert!(repo.find_by_token("live").await.unwrap().is_some());
        }

        #[tokio::test]
        async fn test_mock_favorites_report_membership_changes() {
            let repo = MockFavoriteRepository::default();

            assert!(repo.add(1, 10).await.unwrap(), "first add inserts");
            assert!(!repo.add(1, 10).await.unwrap(), "repeat add is a no-op");

            assert!(repo.remove(1, 10).await.unwrap(), "remove takes it out");
            assert!(
                !repo.remove(1, 10).await.unwrap(),
                "repeat remove is a no-op"
            );
        }

        #[tokio::test]
        async fn test_mock_favorites_are_per_account() {
            let repo = MockFavoriteRepository::default();

            assert!(repo.add(1, 10).await.unwrap());
            assert!(
                repo.add(2, 10).await.unwrap(),
                "each account keeps its own set"
            );
        }
    }
}
