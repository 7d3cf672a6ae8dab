//! PostgreSQL store for `simple_object` rows.

use super::{SimpleRepository, SimpleTransaction};
use crate::error::AppError;
use crate::model::{SimpleId, SimpleObject};
use crate::store::qualified_table;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

/// SQL text for one schema, built once at construction.
#[derive(Debug, Clone)]
struct Statements {
    select_all: String,
    select_one: String,
    select_one_for_update: String,
    insert: String,
    upsert: String,
    bump_sequence: String,
    delete: String,
}

impl Statements {
    fn new(schema: &str) -> Self {
        let table = qualified_table(schema);
        Self {
            select_all: format!("SELECT id, text FROM {} ORDER BY id", table),
            select_one: format!("SELECT id, text FROM {} WHERE id = $1", table),
            select_one_for_update: format!("SELECT id, text FROM {} WHERE id = $1 FOR UPDATE", table),
            insert: format!("INSERT INTO {} (text) VALUES ($1) RETURNING id, text", table),
            upsert: format!(
                "INSERT INTO {} (id, text) VALUES ($1, $2) \
                 ON CONFLICT (id) DO UPDATE SET text = EXCLUDED.text RETURNING id, text",
                table
            ),
            // Keeps generated ids ahead of ids written explicitly through the upsert path.
            // Only ever moves the sequence forward, so deleted ids are never handed out again.
            bump_sequence: format!(
                "SELECT setval(s.seq::regclass, $1) \
                 FROM (SELECT pg_get_serial_sequence('{}', 'id') AS seq) s \
                 WHERE $1 > COALESCE(pg_sequence_last_value(s.seq::regclass), 0)",
                table
            ),
            delete: format!("DELETE FROM {} WHERE id = $1", table),
        }
    }
}

#[derive(Clone)]
pub struct PgSimpleRepository {
    pool: PgPool,
    sql: Statements,
}

impl PgSimpleRepository {
    /// Repository over `<schema>.simple_object`. Call `store::ensure_tables` first.
    pub fn new(pool: PgPool, schema: &str) -> Self {
        Self {
            pool,
            sql: Statements::new(schema),
        }
    }
}

async fn save_on(conn: &mut PgConnection, sql: &Statements, entity: &SimpleObject) -> Result<SimpleObject, AppError> {
    match entity.id {
        None => {
            tracing::debug!(sql = %sql.insert, "query");
            let row = sqlx::query_as::<_, SimpleObject>(&sql.insert)
                .bind(&entity.text)
                .fetch_one(&mut *conn)
                .await?;
            Ok(row)
        }
        Some(id) => {
            tracing::debug!(sql = %sql.upsert, id, "query");
            let row = sqlx::query_as::<_, SimpleObject>(&sql.upsert)
                .bind(id)
                .bind(&entity.text)
                .fetch_one(&mut *conn)
                .await?;
            sqlx::query(&sql.bump_sequence).bind(id).execute(&mut *conn).await?;
            Ok(row)
        }
    }
}

#[async_trait]
impl SimpleRepository for PgSimpleRepository {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError> {
        tracing::debug!(sql = %self.sql.select_all, "query");
        let rows = sqlx::query_as::<_, SimpleObject>(&self.sql.select_all)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        tracing::debug!(sql = %self.sql.select_one, id, "query");
        let row = sqlx::query_as::<_, SimpleObject>(&self.sql.select_one)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: &SimpleObject) -> Result<SimpleObject, AppError> {
        let mut tx = self.pool.begin().await?;
        let row = save_on(&mut tx, &self.sql, entity).await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: SimpleId) -> Result<(), AppError> {
        tracing::debug!(sql = %self.sql.delete, id, "query");
        sqlx::query(&self.sql.delete).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn SimpleTransaction>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction {
            tx,
            sql: self.sql.clone(),
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        Ok(())
    }
}

struct PgTransaction {
    tx: Transaction<'static, Postgres>,
    sql: Statements,
}

#[async_trait]
impl SimpleTransaction for PgTransaction {
    async fn find_by_id(&mut self, id: SimpleId) -> Result<Option<SimpleObject>, AppError> {
        tracing::debug!(sql = %self.sql.select_one_for_update, id, "query (tx)");
        let row = sqlx::query_as::<_, SimpleObject>(&self.sql.select_one_for_update)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn save(&mut self, entity: &SimpleObject) -> Result<SimpleObject, AppError> {
        save_on(&mut self.tx, &self.sql, entity).await
    }

    async fn delete_by_id(&mut self, id: SimpleId) -> Result<(), AppError> {
        tracing::debug!(sql = %self.sql.delete, id, "query (tx)");
        sqlx::query(&self.sql.delete).bind(id).execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
