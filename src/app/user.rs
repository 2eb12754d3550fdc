//! User use cases: upsert keyed by external login id.

use crate::domain::UserRole;
use crate::error::AppError;
use crate::infra::{acquire_connection, Availability, DbPool};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpsertReq {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Option<UserRole>,
    pub last_signed_in: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
    pub last_signed_in: String,
}

/// Insert or update the user identified by `open_id`.
///
/// Only provided fields are written, so an update never clears a stored value.
/// `lastSignedIn` is always refreshed. A user whose `open_id` equals
/// `owner_open_id` becomes admin unless a role is given explicitly.
/// Without a database this is a logged no-op returning `Unavailable`.
pub fn user_upsert(
    pool: &DbPool,
    req: UserUpsertReq,
    owner_open_id: Option<&str>,
) -> Result<Availability<()>, AppError> {
    if req.open_id.trim().is_empty() {
        return Err(AppError::Validation("openId is required for upsert".into()));
    }
    let Some(conn) = acquire_connection(pool) else {
        log::warn!("[Database] Cannot upsert user: database not available");
        return Ok(Availability::Unavailable);
    };

    let now = Utc::now();
    let role = req
        .role
        .or_else(|| (owner_open_id == Some(req.open_id.as_str())).then_some(UserRole::Admin));
    let last_signed_in = req.last_signed_in.unwrap_or(now);

    let mut columns: Vec<&'static str> = vec!["openId"];
    let mut values: Vec<Value> = vec![Value::Text(req.open_id.clone())];
    let mut updates: Vec<&'static str> = Vec::new();

    let text_fields = [
        ("name", req.name),
        ("email", req.email),
        ("loginMethod", req.login_method),
    ];
    for (column, value) in text_fields {
        if let Some(v) = value {
            columns.push(column);
            values.push(Value::Text(v));
            updates.push(column);
        }
    }
    if let Some(role) = role {
        columns.push("role");
        values.push(Value::Text(role.as_str().to_string()));
        updates.push("role");
    }
    for (column, value) in [
        ("lastSignedIn", last_signed_in.to_rfc3339()),
        ("updatedAt", now.to_rfc3339()),
    ] {
        columns.push(column);
        values.push(Value::Text(value));
        updates.push(column);
    }
    columns.push("createdAt");
    values.push(Value::Text(now.to_rfc3339()));

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let assignments: Vec<String> = updates
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();
    let sql = format!(
        "INSERT INTO users ({}) VALUES ({}) ON CONFLICT(openId) DO UPDATE SET {}",
        columns.join(", "),
        placeholders.join(", "),
        assignments.join(", ")
    );

    conn.execute(&sql, params_from_iter(values)).map_err(|e| {
        log::error!("[Database] Failed to upsert user: {}", e);
        AppError::from(e)
    })?;
    Ok(Availability::Ready(()))
}

pub fn user_get_by_open_id(
    pool: &DbPool,
    open_id: &str,
) -> Result<Availability<Option<UserDto>>, AppError> {
    let Some(conn) = acquire_connection(pool) else {
        log::warn!("[Database] Cannot get user: database not available");
        return Ok(Availability::Unavailable);
    };
    let user = conn
        .query_row(
            "SELECT id, openId, name, email, loginMethod, role, createdAt, updatedAt, lastSignedIn FROM users WHERE openId = ?1",
            [open_id],
            |row| {
                let role: String = row.get(5)?;
                Ok(UserDto {
                    id: row.get(0)?,
                    open_id: row.get(1)?,
                    name: row.get(2)?,
                    email: row.get(3)?,
                    login_method: row.get(4)?,
                    role: UserRole::from_str(&role).unwrap_or_default(),
                    created_at: row.get(6)?,
                    updated_at: row.get(7)?,
                    last_signed_in: row.get(8)?,
                })
            },
        )
        .optional()?;
    Ok(Availability::Ready(user))
}
