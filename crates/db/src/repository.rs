//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt den Hub-Kern von der konkreten
//! Store-Implementierung. Der Kern nimmt nie an, ob der Store in-memory
//! oder persistent ist.

use palaver_core::RoomId;

use crate::error::DbResult;
use crate::models::RaumRecord;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://palaver.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://palaver.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Raum-Datenzugriffe
///
/// Create ist append-only: IDs sind streng aufsteigend und werden nie
/// wiederverwendet.
#[allow(async_fn_in_trait)]
pub trait RaumRepository: Send + Sync {
    /// Einen neuen Raum anlegen
    async fn erstellen(&self, titel: &str) -> DbResult<RaumRecord>;

    /// Einen Raum anhand seiner ID laden
    async fn finden(&self, id: RoomId) -> DbResult<Option<RaumRecord>>;

    /// Einen Raum loeschen; gibt false zurueck wenn er nicht existierte
    async fn loeschen(&self, id: RoomId) -> DbResult<bool>;

    /// Alle Raeume in stabiler Reihenfolge (aufsteigende ID) laden
    async fn alle(&self) -> DbResult<Vec<RaumRecord>>;
}
