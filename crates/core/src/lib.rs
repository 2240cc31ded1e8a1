//! palaver-core – Gemeinsame Typen und Client-Events
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Palaver-Crates gemeinsam genutzt werden: die ID-Newtypes und
//! den Wire-Level-Vertrag der Client-Events.

pub mod event;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use event::{ClientEvent, RoomInfo, UserEntry};
pub use types::{ConnectionId, Identity, RoomId};
