//! SQLite campaign storage.

use async_trait::async_trait;
use chrono::DateTime;
use npcforge_domain::{Campaign, CampaignId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{CampaignRepo, RepoError};

pub struct SqliteCampaignRepo {
    pool: SqlitePool,
}

impl SqliteCampaignRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_campaign(row: &SqliteRow) -> Result<Campaign, RepoError> {
    let id: String = row.get("id");
    let owner_id: String = row.get("owner_id");
    let created_at: i64 = row.get("created_at");

    Ok(Campaign {
        id: id.parse().map_err(RepoError::serialization)?,
        owner_id: owner_id.parse().map_err(RepoError::serialization)?,
        name: row.get("name"),
        description: row.get("description"),
        created_at: DateTime::from_timestamp_millis(created_at).ok_or_else(|| {
            RepoError::serialization(format!("invalid campaign timestamp: {created_at}"))
        })?,
    })
}

#[async_trait]
impl CampaignRepo for SqliteCampaignRepo {
    async fn save(&self, campaign: &Campaign) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (id, owner_id, name, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description
            "#,
        )
        .bind(campaign.id.to_string())
        .bind(campaign.owner_id.to_string())
        .bind(&campaign.name)
        .bind(campaign.description.as_deref())
        .bind(campaign.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_campaign", e))?;

        Ok(())
    }

    async fn get_owned(
        &self,
        id: CampaignId,
        owner: UserId,
    ) -> Result<Option<Campaign>, RepoError> {
        let row = sqlx::query("SELECT * FROM campaigns WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_campaign", e))?;

        row.as_ref().map(row_to_campaign).transpose()
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Campaign>, RepoError> {
        let rows = sqlx::query("SELECT * FROM campaigns WHERE owner_id = ? ORDER BY created_at DESC")
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_campaigns", e))?;

        rows.iter().map(row_to_campaign).collect()
    }
}
