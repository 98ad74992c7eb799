use sqlx::PgPool;

use crate::error::Result;
use crate::models::activity::{ActivityEntry, ActivityRow};
use crate::services::activity_merge::merge_activities;

#[derive(Clone)]
pub struct ActivityService {
    pool: PgPool,
}

impl ActivityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Raw activity for one card, oldest first.
    pub async fn list_for_card(&self, card_public_id: &str) -> Result<Vec<ActivityEntry>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT
                public_id, activity_type,
                actor_public_id, actor_name, actor_email,
                from_title, to_title, from_description, to_description,
                label_public_id, label_name,
                attachment_public_id, attachment_filename,
                created_at
            FROM card_activities
            WHERE card_public_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(card_public_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ActivityEntry::from).collect())
    }

    /// The card's feed with description and label bursts collapsed.
    pub async fn feed_for_card(&self, card_public_id: &str) -> Result<Vec<ActivityEntry>> {
        let entries = self.list_for_card(card_public_id).await?;
        Ok(merge_activities(&entries))
    }
}
