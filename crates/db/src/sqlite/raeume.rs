//! SQLite-Implementierung des RaumRepository

use chrono::{DateTime, Utc};
use sqlx::Row;

use palaver_core::RoomId;

use crate::error::{DbError, DbResult};
use crate::models::RaumRecord;
use crate::repository::RaumRepository;
use crate::sqlite::pool::SqliteDb;

impl RaumRepository for SqliteDb {
    async fn erstellen(&self, titel: &str) -> DbResult<RaumRecord> {
        let now = Utc::now();
        let result = sqlx::query("INSERT INTO raeume (titel, created_at) VALUES (?, ?)")
            .bind(titel)
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await?;

        let id = RoomId(result.last_insert_rowid());
        tracing::debug!(raum = %id, titel, "Raum angelegt");

        Ok(RaumRecord {
            id,
            titel: titel.to_string(),
            created_at: now,
        })
    }

    async fn finden(&self, id: RoomId) -> DbResult<Option<RaumRecord>> {
        let row = sqlx::query("SELECT id, titel, created_at FROM raeume WHERE id = ?")
            .bind(id.inner())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_raum(&r)).transpose()
    }

    async fn loeschen(&self, id: RoomId) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM raeume WHERE id = ?")
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected > 0 {
            tracing::debug!(raum = %id, "Raum geloescht");
        }
        Ok(affected > 0)
    }

    async fn alle(&self) -> DbResult<Vec<RaumRecord>> {
        let rows = sqlx::query("SELECT id, titel, created_at FROM raeume ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_raum).collect()
    }
}

/// Konvertiert eine SQLite-Zeile in einen RaumRecord
fn row_to_raum(row: &sqlx::sqlite::SqliteRow) -> DbResult<RaumRecord> {
    let created_raw: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map_err(|e| DbError::UngueltigeDaten(format!("created_at: {e}")))?
        .with_timezone(&Utc);

    Ok(RaumRecord {
        id: RoomId(row.try_get::<i64, _>("id")?),
        titel: row.try_get("titel")?,
        created_at,
    })
}
