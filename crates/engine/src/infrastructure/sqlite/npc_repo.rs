//! SQLite NPC record storage.
//!
//! Each record is stored as a JSON document next to the scalar columns the
//! queries filter and sort on. Timestamps are epoch milliseconds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use npcforge_domain::{CampaignId, NpcId, NpcRecord, UserId};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

use crate::infrastructure::ports::{NpcCounts, NpcFilter, NpcRepo, PageRequest, RepoError};

pub struct SqliteNpcRepo {
    pool: SqlitePool,
}

/// Positional parameter for dynamically built WHERE clauses.
enum Bind {
    Text(String),
    Millis(i64),
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    binds: &'q [Bind],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in binds {
        query = match value {
            Bind::Text(text) => query.bind(text.as_str()),
            Bind::Millis(ms) => query.bind(*ms),
        };
    }
    query
}

impl SqliteNpcRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run a filtered, paginated listing plus the matching COUNT.
    ///
    /// `where_clause` uses `?` placeholders that are bound in order from `binds`.
    async fn paged(
        &self,
        operation: &'static str,
        where_clause: &str,
        binds: &[Bind],
        order_by: &str,
        page: PageRequest,
    ) -> Result<(Vec<NpcRecord>, u64), RepoError> {
        let count_sql = format!("SELECT COUNT(*) FROM npc_records WHERE {where_clause}");
        let total: i64 = bind_all(sqlx::query(&count_sql), binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database(operation, e))?
            .get(0);

        let list_sql = format!(
            "SELECT record_json FROM npc_records WHERE {where_clause} ORDER BY {order_by} LIMIT ? OFFSET ?"
        );
        let rows = bind_all(sqlx::query(&list_sql), binds)
            .bind(i64::from(page.limit))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database(operation, e))?;

        let records = rows.iter().map(decode_record).collect::<Result<_, _>>()?;
        Ok((records, total.max(0) as u64))
    }
}

fn decode_record(row: &SqliteRow) -> Result<NpcRecord, RepoError> {
    let json: String = row.get("record_json");
    serde_json::from_str(&json).map_err(RepoError::serialization)
}

fn millis(at: Option<DateTime<Utc>>) -> Option<i64> {
    at.map(|t| t.timestamp_millis())
}

#[async_trait]
impl NpcRepo for SqliteNpcRepo {
    async fn get_owned(&self, id: NpcId, owner: UserId) -> Result<Option<NpcRecord>, RepoError> {
        let row = sqlx::query("SELECT record_json FROM npc_records WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_npc", e))?;

        row.as_ref().map(decode_record).transpose()
    }

    async fn save(&self, record: &NpcRecord) -> Result<(), RepoError> {
        let json = serde_json::to_string(record).map_err(RepoError::serialization)?;

        sqlx::query(
            r#"
            INSERT INTO npc_records (
                id, owner_id, campaign_id, role, role_key, is_active, has_stats, search_text,
                deleted_at, permanent_delete_at, created_at, updated_at, record_json
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                campaign_id = excluded.campaign_id,
                role = excluded.role,
                role_key = excluded.role_key,
                is_active = excluded.is_active,
                has_stats = excluded.has_stats,
                search_text = excluded.search_text,
                deleted_at = excluded.deleted_at,
                permanent_delete_at = excluded.permanent_delete_at,
                updated_at = excluded.updated_at,
                record_json = excluded.record_json
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.created_by.to_string())
        .bind(record.campaign_id.map(|c| c.to_string()))
        .bind(&record.generation_request.role)
        .bind(record.generation_request.role.to_lowercase())
        .bind(record.is_active)
        .bind(record.generated_npc.has_stats())
        .bind(record.search_text())
        .bind(millis(record.deleted_at))
        .bind(millis(record.permanent_delete_at))
        .bind(record.created_at.timestamp_millis())
        .bind(record.updated_at.timestamp_millis())
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_npc", e))?;

        Ok(())
    }

    async fn delete(&self, id: NpcId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM npc_records WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_npc", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_active(
        &self,
        owner: UserId,
        filter: &NpcFilter,
        page: PageRequest,
    ) -> Result<(Vec<NpcRecord>, u64), RepoError> {
        let mut where_clause = String::from("owner_id = ? AND is_active = 1");
        let mut binds = vec![Bind::Text(owner.to_string())];

        if let Some(campaign_id) = filter.campaign_id {
            where_clause.push_str(" AND campaign_id = ?");
            binds.push(Bind::Text(campaign_id.to_string()));
        }
        if let Some(role) = filter.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            where_clause.push_str(" AND instr(role_key, ?) > 0");
            binds.push(Bind::Text(role.to_lowercase()));
        }

        self.paged("list_npcs", &where_clause, &binds, "created_at DESC", page)
            .await
    }

    async fn list_deleted(
        &self,
        owner: UserId,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<(Vec<NpcRecord>, u64), RepoError> {
        self.paged(
            "list_deleted_npcs",
            "owner_id = ? AND is_active = 0 AND permanent_delete_at > ?",
            &[
                Bind::Text(owner.to_string()),
                Bind::Millis(now.timestamp_millis()),
            ],
            "deleted_at DESC",
            page,
        )
        .await
    }

    async fn list_by_campaign(
        &self,
        owner: UserId,
        campaign_id: CampaignId,
    ) -> Result<Vec<NpcRecord>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT record_json FROM npc_records
            WHERE owner_id = ? AND campaign_id = ? AND is_active = 1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner.to_string())
        .bind(campaign_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_campaign_npcs", e))?;

        rows.iter().map(decode_record).collect()
    }

    async fn search(
        &self,
        owner: UserId,
        query: &str,
        campaign_id: Option<CampaignId>,
        page: PageRequest,
    ) -> Result<(Vec<NpcRecord>, u64), RepoError> {
        let mut where_clause =
            String::from("owner_id = ? AND is_active = 1 AND instr(search_text, ?) > 0");
        let mut binds = vec![
            Bind::Text(owner.to_string()),
            Bind::Text(query.trim().to_lowercase()),
        ];

        if let Some(campaign_id) = campaign_id {
            where_clause.push_str(" AND campaign_id = ?");
            binds.push(Bind::Text(campaign_id.to_string()));
        }

        self.paged("search_npcs", &where_clause, &binds, "created_at DESC", page)
            .await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let result = sqlx::query(
            "DELETE FROM npc_records WHERE is_active = 0 AND permanent_delete_at <= ?",
        )
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("delete_expired_npcs", e))?;

        Ok(result.rows_affected())
    }

    async fn count_summary(&self, owner: UserId) -> Result<NpcCounts, RepoError> {
        let owner = owner.to_string();

        let totals = sqlx::query(
            r#"
            SELECT COUNT(*) AS total, COALESCE(SUM(has_stats), 0) AS with_stats
            FROM npc_records WHERE owner_id = ? AND is_active = 1
            "#,
        )
        .bind(&owner)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database("npc_summary", e))?;

        let role_rows = sqlx::query(
            r#"
            SELECT role, COUNT(*) AS count FROM npc_records
            WHERE owner_id = ? AND is_active = 1
            GROUP BY role ORDER BY count DESC, role ASC LIMIT 10
            "#,
        )
        .bind(&owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("npc_summary", e))?;

        let campaign_rows = sqlx::query(
            r#"
            SELECT campaign_id, COUNT(*) AS count FROM npc_records
            WHERE owner_id = ? AND is_active = 1 AND campaign_id IS NOT NULL
            GROUP BY campaign_id ORDER BY count DESC
            "#,
        )
        .bind(&owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("npc_summary", e))?;

        let by_campaign = campaign_rows
            .iter()
            .map(|row| {
                let campaign_id: String = row.get("campaign_id");
                let count: i64 = row.get("count");
                let campaign_id = campaign_id
                    .parse::<CampaignId>()
                    .map_err(RepoError::serialization)?;
                Ok((campaign_id, count as u64))
            })
            .collect::<Result<Vec<_>, RepoError>>()?;

        Ok(NpcCounts {
            total: totals.get::<i64, _>("total") as u64,
            by_role: role_rows
                .iter()
                .map(|row| (row.get("role"), row.get::<i64, _>("count") as u64))
                .collect(),
            by_campaign,
            with_stats: totals.get::<i64, _>("with_stats") as u64,
        })
    }
}
