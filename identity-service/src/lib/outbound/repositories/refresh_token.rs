use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RefreshTokenId;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::RefreshTokenLedger;

pub struct PostgresRefreshTokenLedger {
    pool: PgPool,
}

impl PostgresRefreshTokenLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    revoked: bool,
    created_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            id: RefreshTokenId(row.id),
            token: row.token,
            user_id: UserId(row.user_id),
            expires_at: row.expires_at,
            revoked: row.revoked,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl RefreshTokenLedger for PostgresRefreshTokenLedger {
    async fn record(
        &self,
        token: &str,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshTokenRecord, AuthError> {
        let record = RefreshTokenRecord {
            id: RefreshTokenId::new(),
            token: token.to_string(),
            user_id: *user_id,
            expires_at,
            revoked: false,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, token, user_id, expires_at, revoked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.0)
        .bind(&record.token)
        .bind(record.user_id.0)
        .bind(record.expires_at)
        .bind(record.revoked)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Persistence(e.to_string()))?;

        Ok(record)
    }

    async fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT id, token, user_id, expires_at, revoked, created_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Persistence(e.to_string()))?;

        Ok(row.map(RefreshTokenRecord::from))
    }

    async fn revoke(&self, id: &RefreshTokenId) -> Result<bool, AuthError> {
        // Conditional update: of any number of concurrent calls, exactly one
        // observes revoked = FALSE and flips it.
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE id = $1 AND revoked = FALSE
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Persistence(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}
