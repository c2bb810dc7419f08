//! Explicit database initialization: create missing registry tables and
//! seed default rows. Only the CLI/deploy tooling calls into this module;
//! verification never creates anything.

use sqlx::SqlitePool;
use tracing::info;

use super::error::DbError;
use super::schema;
use super::verify;

/// Execute the registry DDL for every expected table the database is
/// missing, inside a single transaction. Returns the created table names
/// in registry order; an empty list means the schema was already complete.
pub async fn create_missing_tables(pool: &SqlitePool) -> Result<Vec<String>, DbError> {
    let mut to_create = Vec::new();
    for def in schema::all_tables() {
        if !verify::table_exists(pool, def.name).await? {
            to_create.push(def);
        }
    }
    if to_create.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = pool.begin().await?;
    for def in &to_create {
        for stmt in split_statements(def.create_sql) {
            sqlx::query(&stmt).execute(&mut *tx).await?;
        }
        info!(target: "yektayar", event = "table_created", table = %def.name);
    }
    tx.commit().await?;

    Ok(to_create.iter().map(|d| d.name.to_string()).collect())
}

const DEFAULT_SETTINGS: &[(&str, &str, &str)] = &[
    ("contact_phone", "+98 21 1234 5678", "string"),
    ("contact_email", "info@yektayar.com", "string"),
    ("contact_address", "تهران، خیابان ولیعصر", "string"),
    ("contact_address_en", "Tehran, Vali Asr Street", "string"),
    ("contact_map_lat", "35.6892", "number"),
    ("contact_map_lng", "51.3890", "number"),
];

/// Seed the default contact settings and the about-us page stub. Idempotent:
/// existing rows are left untouched, so operators can re-run initialization
/// without clobbering edits made through the admin panel.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), DbError> {
    for (key, value, kind) in DEFAULT_SETTINGS {
        sqlx::query("INSERT OR IGNORE INTO settings (key, value, type) VALUES (?1, ?2, ?3)")
            .bind(key)
            .bind(value)
            .bind(kind)
            .execute(pool)
            .await?;
    }

    let metadata = serde_json::json!({
        "titleEn": "About Us",
        "description": "Learn about the YektaYar mental health platform",
    })
    .to_string();
    sqlx::query(
        "INSERT OR IGNORE INTO pages (slug, title, content, metadata) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind("about-us")
    .bind("درباره ما")
    .bind("YektaYar – a digital companion for family mental health.")
    .bind(&metadata)
    .execute(pool)
    .await?;

    info!(target: "yektayar", event = "defaults_seeded");
    Ok(())
}

fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
