//! Client-Events – die Nachrichten die der Hub an Clients sendet
//!
//! Die Varianten-Namen sind der Wire-Level-Vertrag: externe Clients
//! reagieren auf genau diese Event-Namen. JSON-Serialisierung via serde
//! (Tagged Enum, nicht zeitkritisch).

use serde::{Deserialize, Serialize};

use crate::types::{ConnectionId, Identity, RoomId};

/// Ein Eintrag der Praesenz-Liste: Identitaet plus eine
/// repraesentative Verbindung
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub identity: Identity,
    pub connection: ConnectionId,
}

/// Raum-Informationen fuer die Raum-Liste
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: RoomId,
    pub title: String,
}

/// Alle Events die der Hub an Clients ausliefert
///
/// | Event          | Payload              | Empfaenger              |
/// |----------------|----------------------|-------------------------|
/// | UpdateUserList | geordnete User-Liste | alle                    |
/// | RoomList       | geordnete Raum-Liste | alle                    |
/// | NewMessage     | Text                 | alle / Raum / Benutzer  |
/// | LeaveRoom      | keiner               | ehemalige Raum-Mitglieder |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Praesenz-Update nach jedem Verbinden/Trennen
    UpdateUserList(Vec<UserEntry>),
    /// Aktuelle Raum-Liste nach jedem Erstellen/Loeschen
    RoomList(Vec<RoomInfo>),
    /// Chat-Nachricht (bereits mit Absender-/Raum-Tag versehen)
    NewMessage(String),
    /// Aufforderung den aktuellen Raum zu verlassen (Raum geloescht)
    LeaveRoom,
}

impl ClientEvent {
    /// Gibt den Wire-Namen des Events zurueck
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateUserList(_) => "UpdateUserList",
            Self::RoomList(_) => "RoomList",
            Self::NewMessage(_) => "NewMessage",
            Self::LeaveRoom => "LeaveRoom",
        }
    }
}
