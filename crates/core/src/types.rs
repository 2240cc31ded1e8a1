//! Gemeinsame Identifikationstypen fuer Palaver
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige ID einer live Transport-Verbindung
///
/// Wird vom Transport beim Verbindungsaufbau vergeben und beim Trennen
/// entwertet. Eine ConnectionId wird nie wiederverwendet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Erstellt eine neue zufaellige ConnectionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn:{}", self.0)
    }
}

/// Eindeutige Raum-ID
///
/// Raeume werden vom Raum-Store mit aufsteigenden IDs angelegt; gueltige
/// IDs sind immer > 0. Die 0 dient als Sentinel fuer "kein Raum".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub i64);

impl RoomId {
    /// Sentinel fuer "kein Raum" (z.B. beim ersten Beitritt)
    pub const KEINER: RoomId = RoomId(0);

    /// Gibt die innere ID zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }

    /// Prueft ob die ID auf einen echten Raum verweisen kann
    pub fn ist_gueltig(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "raum:{}", self.0)
    }
}

/// Stabile Kennung eines authentifizierten Benutzers
///
/// Wird vom externen Identitaets-Resolver geliefert (z.B. eine E-Mail-
/// Adresse) und ist unabhaengig davon, wie viele Verbindungen der
/// Benutzer gleichzeitig offen hat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    /// Erstellt eine Identity aus einer beliebigen Kennung
    pub fn new(kennung: impl Into<String>) -> Self {
        Self(kennung.into())
    }

    /// Gibt die Kennung als &str zurueck
    pub fn als_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_id_eindeutig() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a, b, "Zwei neue ConnectionIds muessen verschieden sein");
    }

    #[test]
    fn room_id_gueltigkeit() {
        assert!(RoomId(1).ist_gueltig());
        assert!(!RoomId::KEINER.ist_gueltig());
        assert!(!RoomId(-3).ist_gueltig());
    }

    #[test]
    fn identity_anzeige() {
        let id = Identity::new("alice@example.org");
        assert_eq!(id.to_string(), "alice@example.org");
        assert_eq!(id.als_str(), "alice@example.org");
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let cid = ConnectionId::new();
        let json = serde_json::to_string(&cid).unwrap();
        let cid2: ConnectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(cid, cid2);

        let rid = RoomId(7);
        let json = serde_json::to_string(&rid).unwrap();
        let rid2: RoomId = serde_json::from_str(&json).unwrap();
        assert_eq!(rid, rid2);
    }
}
