//! Fehlertypen fuer den Hub-Kern

use palaver_core::{ConnectionId, Identity};
use thiserror::Error;

/// Fehlertyp fuer den Hub-Kern
#[derive(Debug, Error)]
pub enum HubError {
    /// Verbindung ist bereits registriert (defensiv; Verbindungs-IDs
    /// werden nie wiederverwendet)
    #[error("Doppelte Verbindung: {verbindung} ist bereits fuer {identitaet} registriert")]
    DoppelteVerbindung {
        identitaet: Identity,
        verbindung: ConnectionId,
    },

    /// Maximale Clientanzahl erreicht
    #[error("Server ist voll")]
    ServerVoll,

    /// Ungueltige Eingabe (leerer Titel, leere oder zu lange Nachricht)
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    /// Fehler aus dem Raum-Store
    #[error("Datenbank-Fehler: {0}")]
    Datenbank(#[from] palaver_db::DbError),

    /// Unerwarteter Fehler
    #[error("Unerwarteter Fehler: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Interner Fehler
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl HubError {
    /// Erstellt einen internen Fehler
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

/// Result-Typ fuer den Hub-Kern
pub type HubResult<T> = Result<T, HubError>;
