use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

pub const DEFAULT_DB_PATH: &str = "data.sqlite";

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    Ok(conn)
}

/// Creates the `tasman` table if missing. An existing table is left as is.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasman (
            id                   INTEGER PRIMARY KEY,
            description          TEXT,
            date_scraped         TEXT,
            date_received        TEXT,
            on_notice_to         TEXT,
            address              TEXT,
            council_reference    TEXT,
            applicant            TEXT,
            owner                TEXT,
            stage_description    TEXT,
            stage_status         TEXT,
            document_description TEXT,
            title_reference      TEXT
        );
        ",
    )?;
    Ok(())
}

// ── Records ──

/// One advertised application, as stored in `tasman`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRow {
    pub council_reference: String,
    pub description: String,
    pub document_description: String,
    pub date_received: Option<String>,
    pub on_notice_to: Option<String>,
    pub date_scraped: String,
    // Never populated by the listing page.
    pub address: Option<String>,
    pub applicant: Option<String>,
    pub owner: Option<String>,
    pub stage_description: Option<String>,
    pub stage_status: Option<String>,
    pub title_reference: Option<String>,
}

pub fn exists(conn: &Connection, council_reference: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM tasman WHERE council_reference = ?1 LIMIT 1",
            [council_reference],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Appends a row without checking the reference; call [`exists`] first.
pub fn insert(conn: &Connection, row: &ApplicationRow) -> Result<i64> {
    conn.execute(
        "INSERT INTO tasman
         (description, date_scraped, date_received, on_notice_to, address, council_reference,
          applicant, owner, stage_description, stage_status, document_description, title_reference)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            row.description,
            row.date_scraped,
            row.date_received,
            row.on_notice_to,
            row.address,
            row.council_reference,
            row.applicant,
            row.owner,
            row.stage_description,
            row.stage_status,
            row.document_description,
            row.title_reference,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recently inserted rows first.
pub fn fetch_records(conn: &Connection, limit: usize) -> Result<Vec<ApplicationRow>> {
    let sql = format!(
        "SELECT COALESCE(council_reference,''), COALESCE(description,''),
                COALESCE(document_description,''), date_received, on_notice_to,
                COALESCE(date_scraped,''), address, applicant, owner,
                stage_description, stage_status, title_reference
         FROM tasman
         ORDER BY id DESC
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ApplicationRow {
                council_reference: row.get(0)?,
                description: row.get(1)?,
                document_description: row.get(2)?,
                date_received: row.get(3)?,
                on_notice_to: row.get(4)?,
                date_scraped: row.get(5)?,
                address: row.get(6)?,
                applicant: row.get(7)?,
                owner: row.get(8)?,
                stage_description: row.get(9)?,
                stage_status: row.get(10)?,
                title_reference: row.get(11)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub references: usize,
    pub on_notice: usize,
    pub last_scraped: Option<String>,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM tasman", [], |r| r.get(0))?;
    let references: usize = conn.query_row(
        "SELECT COUNT(DISTINCT council_reference) FROM tasman",
        [],
        |r| r.get(0),
    )?;
    let on_notice: usize = conn.query_row(
        "SELECT COUNT(*) FROM tasman WHERE on_notice_to IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let last_scraped: Option<String> =
        conn.query_row("SELECT MAX(date_scraped) FROM tasman", [], |r| r.get(0))?;
    Ok(Stats {
        total,
        references,
        on_notice,
        last_scraped,
    })
}
