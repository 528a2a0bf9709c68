//! Generic JSON-document record helpers.
//!
//! WorkOps tables store the full record as a JSON `data` column plus a
//! few indexed scalar columns used for filtering. These helpers cover
//! the shared insert/get/update/delete/list shape so each service only
//! declares its table name and index columns.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::traits::{SQLStore, Value};

/// Error type for record operations. Services map this into their own
/// error enums.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("encode: {0}")]
    Encode(String),
}

/// Insert a record as JSON into a table with indexed columns.
pub fn insert_record<T: Serialize>(
    sql: &dyn SQLStore,
    table: &str,
    id: &str,
    record: &T,
    indexes: &[(&str, Value)],
) -> Result<(), RecordError> {
    let json = serde_json::to_string(record).map_err(|e| RecordError::Encode(e.to_string()))?;

    let mut cols = vec!["id", "data"];
    let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
    let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

    for (i, (col, val)) in indexes.iter().enumerate() {
        let idx = i + 3;
        cols.push(col);
        placeholders.push(format!("?{}", idx));
        params.push(val.clone());
    }

    let stmt = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        cols.join(", "),
        placeholders.join(", "),
    );

    sql.exec(&stmt, &params).map_err(|e| {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint") {
            RecordError::Conflict(msg)
        } else {
            RecordError::Storage(msg)
        }
    })?;

    Ok(())
}

/// Get a record by id, deserializing the JSON `data` column.
pub fn get_record<T: DeserializeOwned>(
    sql: &dyn SQLStore,
    table: &str,
    id: &str,
) -> Result<T, RecordError> {
    let stmt = format!("SELECT data FROM {} WHERE id = ?1", table);
    let rows = sql
        .query(&stmt, &[Value::Text(id.to_string())])
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    let row = rows
        .first()
        .ok_or_else(|| RecordError::NotFound(format!("{}/{}", table, id)))?;
    let data = row
        .get_str("data")
        .ok_or_else(|| RecordError::Encode("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| RecordError::Encode(e.to_string()))
}

/// Update a record's JSON data and indexed columns.
pub fn update_record<T: Serialize>(
    sql: &dyn SQLStore,
    table: &str,
    id: &str,
    record: &T,
    indexes: &[(&str, Value)],
) -> Result<(), RecordError> {
    let json = serde_json::to_string(record).map_err(|e| RecordError::Encode(e.to_string()))?;

    let mut sets = vec!["data = ?1".to_string()];
    let mut params: Vec<Value> = vec![Value::Text(json)];

    for (i, (col, val)) in indexes.iter().enumerate() {
        let idx = i + 2;
        sets.push(format!("{} = ?{}", col, idx));
        params.push(val.clone());
    }

    let id_idx = params.len() + 1;
    params.push(Value::Text(id.to_string()));

    let stmt = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        table,
        sets.join(", "),
        id_idx,
    );

    let affected = sql
        .exec(&stmt, &params)
        .map_err(|e| RecordError::Storage(e.to_string()))?;

    if affected == 0 {
        return Err(RecordError::NotFound(format!("{}/{}", table, id)));
    }

    Ok(())
}

/// Delete a record by id.
pub fn delete_record(sql: &dyn SQLStore, table: &str, id: &str) -> Result<(), RecordError> {
    let stmt = format!("DELETE FROM {} WHERE id = ?1", table);
    let affected = sql
        .exec(&stmt, &[Value::Text(id.to_string())])
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    if affected == 0 {
        return Err(RecordError::NotFound(format!("{}/{}", table, id)));
    }
    Ok(())
}

/// List records with equality filters and pagination.
/// Returns the page of items and the total matching count.
pub fn list_records<T: DeserializeOwned>(
    sql: &dyn SQLStore,
    table: &str,
    filters: &[(&str, Value)],
    limit: usize,
    offset: usize,
) -> Result<(Vec<T>, usize), RecordError> {
    let mut where_clauses = Vec::new();
    let mut params = Vec::new();

    for (i, (col, val)) in filters.iter().enumerate() {
        let idx = i + 1;
        where_clauses.push(format!("{} = ?{}", col, idx));
        params.push(val.clone());
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_clauses.join(" AND "))
    };

    // Count
    let count_sql = format!("SELECT COUNT(*) as cnt FROM {}{}", table, where_sql);
    let count_rows = sql
        .query(&count_sql, &params)
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    let total = count_rows
        .first()
        .and_then(|r| r.get_i64("cnt"))
        .unwrap_or(0) as usize;

    // Items
    let limit_idx = params.len() + 1;
    let offset_idx = params.len() + 2;
    params.push(Value::Integer(limit as i64));
    params.push(Value::Integer(offset as i64));

    let stmt = format!(
        "SELECT data FROM {}{} ORDER BY created_at DESC LIMIT ?{} OFFSET ?{}",
        table, where_sql, limit_idx, offset_idx,
    );

    let rows = sql
        .query(&stmt, &params)
        .map_err(|e| RecordError::Storage(e.to_string()))?;

    let mut items = Vec::new();
    for row in &rows {
        let data = row
            .get_str("data")
            .ok_or_else(|| RecordError::Encode("missing data column".into()))?;
        let item: T = serde_json::from_str(data).map_err(|e| RecordError::Encode(e.to_string()))?;
        items.push(item);
    }

    Ok((items, total))
}
