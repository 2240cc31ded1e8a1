//! palaver-hub – Verbindungs-, Praesenz- und Mitgliedschafts-Kern
//!
//! Dieser Crate implementiert den Kern des Messaging-Hubs: wer ist mit
//! welchen Verbindungen online, welche Verbindung ist in welchem Raum,
//! und welche Verbindungen bekommen ein Event. Transport (WebSocket
//! o.ae.), Authentifizierung und Nachrichten-Persistenz sind externe
//! Kollaborateure.
//!
//! ## Architektur
//!
//! ```text
//! Transport (extern, ruft Lebenszyklus-Callbacks und Operationen)
//!     |
//!     v
//! HubSession (pro Verbindung)
//!     |  Lebenszyklus: verbinden -> Operationen -> trennen
//!     |
//!     +-- ConnectionRegistry  – Identitaet -> live Verbindungen, Send-Queues
//!     +-- MembershipManager   – Raum -> Mitglieds-Verbindungen
//!     +-- EventRouter         – Ziel aufloesen, Events zustellen
//!     +-- RaumRepository      – Raum-Datensaetze (palaver-db)
//! ```

pub mod error;
pub mod membership;
pub mod registry;
pub mod router;
pub mod session;
pub mod state;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use error::{HubError, HubResult};
pub use membership::MembershipManager;
pub use registry::{ClientSender, ConnectionRegistry};
pub use router::{EventRouter, Ziel};
pub use session::HubSession;
pub use state::{HubConfig, HubState};
