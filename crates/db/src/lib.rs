//! palaver-db – Raum-Store
//!
//! Dieses Crate stellt das Repository-Pattern fuer Raum-Datensaetze
//! bereit. Der Hub-Kern arbeitet ausschliesslich gegen das
//! `RaumRepository`-Trait und nimmt nie an, ob der Store in-memory oder
//! persistent ist. Die mitgelieferte Implementierung ist SQLite
//! (`SqliteDb`, mit `in_memory()` fuer Tests).

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

// Bequeme Re-Exporte
pub use error::{DbError, DbResult};
pub use models::RaumRecord;
pub use repository::{DatabaseConfig, RaumRepository};
pub use sqlite::SqliteDb;
