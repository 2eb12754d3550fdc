//! City use cases.

use super::validate::{non_negative, optional_non_negative, optional_text, require_text};
use crate::error::AppError;
use crate::infra::{acquire_connection, get_connection, Availability, DbPool};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const CITY_COLUMNS: &str =
    "id, nome, populacao, idPais, latitude, longitude, createdAt, updatedAt";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "populacao")]
    pub population: i64,
    #[serde(rename = "idPais")]
    pub country_id: i64,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityCreateReq {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "populacao")]
    pub population: i64,
    #[serde(rename = "idPais")]
    pub country_id: i64,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityUpdateReq {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "populacao")]
    pub population: Option<i64>,
    #[serde(rename = "idPais")]
    pub country_id: Option<i64>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<CityDto> {
    Ok(CityDto {
        id: row.get(0)?,
        name: row.get(1)?,
        population: row.get(2)?,
        country_id: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn fetch_city(conn: &Connection, id: i64) -> Result<Option<CityDto>, AppError> {
    let sql = format!("SELECT {CITY_COLUMNS} FROM cities WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], city_from_row).optional()?)
}

fn query_cities(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<CityDto>, AppError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, city_from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn city_list(pool: &DbPool) -> Result<Availability<Vec<CityDto>>, AppError> {
    let Some(conn) = acquire_connection(pool) else {
        return Ok(Availability::Unavailable);
    };
    let sql = format!("SELECT {CITY_COLUMNS} FROM cities ORDER BY id");
    Ok(Availability::Ready(query_cities(&conn, &sql, [])?))
}

/// Cities owned by `country_id`. Unknown countries yield an empty list.
pub fn city_list_by_country(
    pool: &DbPool,
    country_id: i64,
) -> Result<Availability<Vec<CityDto>>, AppError> {
    let Some(conn) = acquire_connection(pool) else {
        return Ok(Availability::Unavailable);
    };
    let sql = format!("SELECT {CITY_COLUMNS} FROM cities WHERE idPais = ?1 ORDER BY id");
    Ok(Availability::Ready(query_cities(&conn, &sql, [country_id])?))
}

pub fn city_get(pool: &DbPool, id: i64) -> Result<Availability<Option<CityDto>>, AppError> {
    let Some(conn) = acquire_connection(pool) else {
        return Ok(Availability::Unavailable);
    };
    Ok(Availability::Ready(fetch_city(&conn, id)?))
}

/// Insert a city and return its new id.
///
/// An unknown `idPais` is rejected by the foreign key and surfaces as `DB_ERROR`.
pub fn city_create(pool: &DbPool, req: CityCreateReq) -> Result<i64, AppError> {
    require_text("nome", &req.name)?;
    non_negative("populacao", req.population)?;

    let now = Utc::now().to_rfc3339();
    let conn = get_connection(pool)?;
    conn.execute(
        "INSERT INTO cities (nome, populacao, idPais, latitude, longitude, createdAt, updatedAt) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            req.name,
            req.population,
            req.country_id,
            req.latitude,
            req.longitude,
            &now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn city_update(pool: &DbPool, req: CityUpdateReq) -> Result<Option<CityDto>, AppError> {
    optional_text("nome", req.name.as_deref())?;
    optional_non_negative("populacao", req.population)?;

    let now = Utc::now().to_rfc3339();
    let conn = get_connection(pool)?;
    let changed = conn.execute(
        "UPDATE cities SET
            nome = COALESCE(?1, nome),
            populacao = COALESCE(?2, populacao),
            idPais = COALESCE(?3, idPais),
            latitude = COALESCE(?4, latitude),
            longitude = COALESCE(?5, longitude),
            updatedAt = ?6
         WHERE id = ?7",
        params![
            req.name,
            req.population,
            req.country_id,
            req.latitude,
            req.longitude,
            &now,
            req.id
        ],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    fetch_city(&conn, req.id)
}

pub fn city_delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let conn = get_connection(pool)?;
    conn.execute("DELETE FROM cities WHERE id = ?1", [id])?;
    Ok(())
}
