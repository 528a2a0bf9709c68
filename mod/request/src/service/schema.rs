use workops_sql::SQLStore;

use crate::service::RequestError;

/// Initialize the SQLite schema for request resources.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), RequestError> {
    let statements = [
        // Requests table: ticket document plus indexed filter columns
        "CREATE TABLE IF NOT EXISTS requests (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            assigned_to TEXT,
            status TEXT NOT NULL,
            request_type TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_requests_user ON requests(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_requests_status ON requests(status)",
        "CREATE INDEX IF NOT EXISTS idx_requests_type ON requests(request_type)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| RequestError::Storage(e.to_string()))?;
    }

    Ok(())
}
