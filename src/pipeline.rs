use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;
use tracing::{error, info};

use crate::{db, fetch, parser};

/// Per-run outcome counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// One end-to-end run. The database is only opened once the page is in hand,
/// so a failed fetch leaves storage untouched.
pub async fn run(url: &str, db_path: &Path) -> Result<RunStats> {
    let html = match fetch::fetch_listing(url).await {
        Ok(html) => html,
        Err(e) => {
            error!("Failed to fetch page content: {:#}", e);
            return Err(e);
        }
    };

    let conn = db::connect(db_path)?;
    db::init_schema(&conn)?;

    let date_scraped = chrono::Local::now().date_naive().to_string();
    process_listing(&conn, &html, &date_scraped)
}

/// Extract every entry in `html` and insert those whose reference is new.
pub fn process_listing(conn: &Connection, html: &str, date_scraped: &str) -> Result<RunStats> {
    let results = parser::parse_listing(html, date_scraped);
    let mut stats = RunStats {
        total: results.len(),
        ..Default::default()
    };
    info!("Found {} entries", stats.total);

    for (index, result) in results.into_iter().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                error!("Skipping entry {}: {}", index + 1, e);
                stats.failed += 1;
                continue;
            }
        };

        info!(
            "Extracted Data: Title: {}, Date Received: {}, URL: {}, Council Reference: {}, On Notice To: {}",
            row.description,
            row.date_received.as_deref().unwrap_or("-"),
            row.document_description,
            row.council_reference,
            row.on_notice_to.as_deref().unwrap_or("-"),
        );

        if db::exists(conn, &row.council_reference)? {
            info!(
                "Duplicate entry for {} found. Skipping insertion.",
                row.council_reference
            );
            stats.skipped += 1;
        } else {
            db::insert(conn, &row)?;
            info!("Data for {} saved to database.", row.council_reference);
            stats.saved += 1;
        }
    }

    info!(
        "Run complete: {} entries ({} saved, {} duplicates, {} failed)",
        stats.total, stats.saved, stats.skipped, stats.failed
    );
    Ok(stats)
}
