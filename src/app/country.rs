//! Country use cases.

use super::validate::{non_negative, optional_non_negative, optional_text, require_text};
use crate::error::AppError;
use crate::infra::{acquire_connection, get_connection, Availability, DbPool};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

const COUNTRY_COLUMNS: &str =
    "id, nome, continente, populacao, idioma, bandeira, moeda, capital, createdAt, updatedAt";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDto {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "continente")]
    pub continent: String,
    #[serde(rename = "populacao")]
    pub population: i64,
    #[serde(rename = "idioma")]
    pub language: String,
    #[serde(rename = "bandeira")]
    pub flag: Option<String>,
    #[serde(rename = "moeda")]
    pub currency: Option<String>,
    pub capital: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryCreateReq {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "continente")]
    pub continent: String,
    #[serde(rename = "populacao")]
    pub population: i64,
    #[serde(rename = "idioma")]
    pub language: String,
    #[serde(rename = "bandeira")]
    pub flag: Option<String>,
    #[serde(rename = "moeda")]
    pub currency: Option<String>,
    pub capital: Option<String>,
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryUpdateReq {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "continente")]
    pub continent: Option<String>,
    #[serde(rename = "populacao")]
    pub population: Option<i64>,
    #[serde(rename = "idioma")]
    pub language: Option<String>,
    #[serde(rename = "bandeira")]
    pub flag: Option<String>,
    #[serde(rename = "moeda")]
    pub currency: Option<String>,
    pub capital: Option<String>,
}

fn country_from_row(row: &Row<'_>) -> rusqlite::Result<CountryDto> {
    Ok(CountryDto {
        id: row.get(0)?,
        name: row.get(1)?,
        continent: row.get(2)?,
        population: row.get(3)?,
        language: row.get(4)?,
        flag: row.get(5)?,
        currency: row.get(6)?,
        capital: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn fetch_country(conn: &Connection, id: i64) -> Result<Option<CountryDto>, AppError> {
    let sql = format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], country_from_row).optional()?)
}

pub fn country_list(pool: &DbPool) -> Result<Availability<Vec<CountryDto>>, AppError> {
    let Some(conn) = acquire_connection(pool) else {
        return Ok(Availability::Unavailable);
    };
    let sql = format!("SELECT {COUNTRY_COLUMNS} FROM countries ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], country_from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(Availability::Ready(out))
}

pub fn country_get(pool: &DbPool, id: i64) -> Result<Availability<Option<CountryDto>>, AppError> {
    let Some(conn) = acquire_connection(pool) else {
        return Ok(Availability::Unavailable);
    };
    Ok(Availability::Ready(fetch_country(&conn, id)?))
}

/// Insert a country and return its new id.
pub fn country_create(pool: &DbPool, req: CountryCreateReq) -> Result<i64, AppError> {
    require_text("nome", &req.name)?;
    require_text("continente", &req.continent)?;
    non_negative("populacao", req.population)?;
    require_text("idioma", &req.language)?;

    let now = Utc::now().to_rfc3339();
    let conn = get_connection(pool)?;
    conn.execute(
        "INSERT INTO countries (nome, continente, populacao, idioma, bandeira, moeda, capital, createdAt, updatedAt) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            req.name,
            req.continent,
            req.population,
            req.language,
            req.flag,
            req.currency,
            req.capital,
            &now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Merge the provided fields and return the stored row, or `None` if the id is unknown.
pub fn country_update(pool: &DbPool, req: CountryUpdateReq) -> Result<Option<CountryDto>, AppError> {
    optional_text("nome", req.name.as_deref())?;
    optional_text("continente", req.continent.as_deref())?;
    optional_non_negative("populacao", req.population)?;
    optional_text("idioma", req.language.as_deref())?;

    let now = Utc::now().to_rfc3339();
    let conn = get_connection(pool)?;
    let changed = conn.execute(
        "UPDATE countries SET
            nome = COALESCE(?1, nome),
            continente = COALESCE(?2, continente),
            populacao = COALESCE(?3, populacao),
            idioma = COALESCE(?4, idioma),
            bandeira = COALESCE(?5, bandeira),
            moeda = COALESCE(?6, moeda),
            capital = COALESCE(?7, capital),
            updatedAt = ?8
         WHERE id = ?9",
        params![
            req.name,
            req.continent,
            req.population,
            req.language,
            req.flag,
            req.currency,
            req.capital,
            &now,
            req.id
        ],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    fetch_country(&conn, req.id)
}

/// Delete a country that owns no cities.
///
/// The dependent check and the delete share one IMMEDIATE transaction, so no
/// city can be attached in between.
pub fn country_delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let conn = get_connection(pool)?;
    let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Immediate)?;

    let cities: i64 = tx.query_row(
        "SELECT COUNT(1) FROM cities WHERE idPais = ?1",
        [id],
        |r| r.get(0),
    )?;
    if cities > 0 {
        return Err(AppError::HasDependentCities {
            country_id: id,
            cities,
        });
    }

    tx.execute("DELETE FROM countries WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(())
}
