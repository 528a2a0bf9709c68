//! SQL storage layer — a thin dynamically-typed interface over embedded
//! SQLite, plus generic JSON-document record helpers shared by all
//! WorkOps services.

pub mod error;
pub mod records;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use records::RecordError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
