//! The identity-store seam.
//!
//! The login flow and the request gate only ever talk to a [`UserStore`]. Lookup
//! misses surface as [`StoreError::NotFound`] rather than `Option`, so callers
//! can collapse every failure into a single outcome with `?` and `map_err`.

use std::collections::BTreeMap;

use archivist_core::types::DbId;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::UserRepo;
use crate::DbPool;

/// Entity name used in [`StoreError::NotFound`].
const USER_ENTITY: &str = "User";

/// Name of the unique constraint on `users.email`.
const EMAIL_CONSTRAINT: &str = "uq_users_email";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    fn user_not_found(key: impl ToString) -> Self {
        StoreError::NotFound {
            entity: USER_ENTITY,
            key: key.to_string(),
        }
    }

    fn email_taken(email: &str) -> Self {
        StoreError::Conflict(format!("email {email} is already registered"))
    }
}

/// Repository interface over user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn update(&self, id: DbId, input: &UpdateUser) -> Result<User, StoreError>;

    async fn remove(&self, id: DbId) -> Result<(), StoreError>;

    /// Check that the backing storage is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`UserStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a unique violation on the email constraint to [`StoreError::Conflict`].
fn classify_write_error(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(EMAIL_CONSTRAINT)
        {
            return StoreError::email_taken(email);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, input)
            .await
            .map_err(|e| classify_write_error(e, &input.email))
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<User, StoreError> {
        UserRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StoreError::user_not_found(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        UserRepo::find_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| StoreError::user_not_found(email))
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> Result<User, StoreError> {
        let email = input.email.as_deref().unwrap_or_default();
        UserRepo::update(&self.pool, id, input)
            .await
            .map_err(|e| classify_write_error(e, email))?
            .ok_or_else(|| StoreError::user_not_found(id))
    }

    async fn remove(&self, id: DbId) -> Result<(), StoreError> {
        if UserRepo::delete(&self.pool, id).await? {
            tracing::info!(user_id = id, "User removed");
            Ok(())
        } else {
            Err(StoreError::user_not_found(id))
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Default)]
struct InMemoryUsers {
    last_id: DbId,
    rows: BTreeMap<DbId, User>,
}

impl InMemoryUsers {
    fn email_owner(&self, email: &str) -> Option<DbId> {
        self.rows
            .values()
            .find(|u| u.email == email)
            .map(|u| u.id)
    }
}

/// [`UserStore`] kept in process memory. Ids are assigned sequentially from 1
/// and never reused, matching BIGSERIAL behaviour.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<InMemoryUsers>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut users = self.inner.write().await;
        if users.email_owner(&input.email).is_some() {
            return Err(StoreError::email_taken(&input.email));
        }

        users.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: users.last_id,
            email: input.email.clone(),
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<User, StoreError> {
        self.inner
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::user_not_found(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| StoreError::user_not_found(email))
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> Result<User, StoreError> {
        let mut users = self.inner.write().await;
        if let Some(email) = &input.email {
            if users.email_owner(email).is_some_and(|owner| owner != id) {
                return Err(StoreError::email_taken(email));
            }
        }

        let user = users
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::user_not_found(id))?;
        if let Some(email) = &input.email {
            user.email = email.clone();
        }
        if let Some(name) = &input.name {
            user.name = name.clone();
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn remove(&self, id: DbId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::user_not_found(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
