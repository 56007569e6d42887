//! SQLite-backed persistence for NPC records and campaigns.

mod campaign_repo;
mod npc_repo;

pub use campaign_repo::SqliteCampaignRepo;
pub use npc_repo::SqliteNpcRepo;

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS npc_records (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        campaign_id TEXT,
        role TEXT NOT NULL,
        role_key TEXT NOT NULL,
        is_active INTEGER NOT NULL,
        has_stats INTEGER NOT NULL,
        search_text TEXT NOT NULL,
        deleted_at INTEGER,
        permanent_delete_at INTEGER,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        record_json TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_npc_owner_active ON npc_records (owner_id, is_active, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_npc_campaign ON npc_records (campaign_id)",
    "CREATE INDEX IF NOT EXISTS idx_npc_purge ON npc_records (is_active, permanent_delete_at)",
    r#"
    CREATE TABLE IF NOT EXISTS campaigns (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_campaign_owner ON campaigns (owner_id, created_at)",
];

/// Open (creating if needed) the database file and ensure the schema exists.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .map_err(|e| RepoError::database("schema", e))?;
    }

    Ok(pool)
}
