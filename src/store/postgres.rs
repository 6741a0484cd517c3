use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{ActionStore, StoreError};
use crate::domain::action::{Action, ActionChanges, ActionId, NewAction};

// ============================================================================
// Postgres Record Store
// ============================================================================
//
// One table, created on startup if missing. Ids come from BIGSERIAL, so
// restored rows always receive fresh ids.
//
// ============================================================================

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS sustainability_actions (
    id BIGSERIAL PRIMARY KEY,
    action VARCHAR(255) NOT NULL,
    date DATE NOT NULL,
    points INTEGER NOT NULL
)";

const INSERT_ACTION: &str =
    "INSERT INTO sustainability_actions (action, date, points) VALUES ($1, $2, $3) RETURNING id";

type ActionRow = (i64, String, NaiveDate, i32);

pub struct PostgresActionStore {
    pool: PgPool,
}

impl PostgresActionStore {
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections = max_connections, "Connected to Postgres");
        Ok(Self::from_pool(pool))
    }

    /// Create the actions table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::debug!("sustainability_actions table ready");
        Ok(())
    }
}

#[async_trait]
impl ActionStore for PostgresActionStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_all(&self) -> Result<Vec<Action>, StoreError> {
        let rows = sqlx::query_as::<_, ActionRow>(
            "SELECT id, action, date, points FROM sustainability_actions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, action, date, points)| Action {
                id,
                action,
                date,
                points,
            })
            .collect())
    }

    async fn create(&self, new_action: NewAction) -> Result<ActionId, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(INSERT_ACTION)
            .bind(new_action.action)
            .bind(new_action.date)
            .bind(new_action.points)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, id: ActionId, changes: ActionChanges) -> Result<ActionId, StoreError> {
        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE sustainability_actions
             SET action = COALESCE($2, action),
                 date = COALESCE($3, date),
                 points = COALESCE($4, points)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(changes.action)
        .bind(changes.date)
        .bind(changes.points)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: ActionId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sustainability_actions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn insert_many(&self, records: Vec<NewAction>) -> Result<Vec<ActionId>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let id = sqlx::query_scalar::<_, i64>(INSERT_ACTION)
                .bind(record.action)
                .bind(record.date)
                .bind(record.points)
                .fetch_one(&mut *tx)
                .await?;
            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }
}
