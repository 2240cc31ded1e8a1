//! Datenbankmodelle fuer Palaver
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den Wire-Typen getrennt und dienen als reine
//! Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use palaver_core::{RoomId, RoomInfo};

/// Raum-Datensatz aus der Datenbank
///
/// Ein Raum existiert unabhaengig von seiner Mitgliedschaft: ein Raum
/// ohne Mitglieder bleibt bestehen bis er explizit geloescht wird.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaumRecord {
    pub id: RoomId,
    pub titel: String,
    pub created_at: DateTime<Utc>,
}

impl RaumRecord {
    /// Konvertiert den Datensatz in seine Wire-Form
    pub fn als_info(&self) -> RoomInfo {
        RoomInfo {
            id: self.id,
            title: self.titel.clone(),
        }
    }
}
