//! SQLite-Backend fuer den Raum-Store

mod pool;
mod raeume;

pub use pool::SqliteDb;
