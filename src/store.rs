//! Database bootstrap: create the target database and the `simple_object` table if missing.

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

pub const TABLE_NAME: &str = "simple_object";

/// Schema-qualified table name (e.g. "public.simple_object"). `schema` must be a validated identifier.
pub fn qualified_table(schema: &str) -> String {
    format!("{}.{}", schema, TABLE_NAME)
}

/// Create `schema` and its `simple_object` table. Idempotent.
pub async fn ensure_tables(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            text TEXT NOT NULL
        )
        "#,
        qualified_table(schema)
    );
    sqlx::query(&ddl).execute(pool).await?;
    tracing::info!(schema, table = TABLE_NAME, "store ready");
    Ok(())
}

/// Connect to the `postgres` admin database and create the target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres{}", base, query);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
