use workops_sql::SQLStore;

use crate::service::LunchError;

/// Initialize the SQLite schema for lunch resources.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), LunchError> {
    let statements = [
        // One row per user per day.
        "CREATE TABLE IF NOT EXISTS lunch_attendance (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            attending INTEGER NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (user_id, date)
        )",
        "CREATE INDEX IF NOT EXISTS idx_lunch_date ON lunch_attendance(date)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| LunchError::Storage(e.to_string()))?;
    }

    Ok(())
}
