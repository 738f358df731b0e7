pub mod derive;
pub mod fields;

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::db::ApplicationRow;

static ENTRY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".wpfilebase-file-default").unwrap());

/// Why a single listing entry was rejected. Never fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("entry has no title link")]
    MissingTitle,
    #[error("entry title is empty")]
    EmptyTitle,
    #[error("title link has no href ({description})")]
    MissingLink { description: String },
    #[error("no \"Date:\" cell in details table ({description})")]
    MissingDateLabel { description: String },
    #[error("\"Date:\" cell has no value cell after it ({description})")]
    MissingDateValue { description: String },
}

/// Two-pass pipeline: listing HTML → entry fragments → rows, in document order.
pub fn parse_listing(
    html: &str,
    date_scraped: &str,
) -> Vec<Result<ApplicationRow, ExtractionError>> {
    let doc = Html::parse_document(html);
    let rows: Vec<_> = doc
        .select(&ENTRY_SEL)
        .map(|fragment| -> Result<ApplicationRow, ExtractionError> {
            let entry = fields::extract_entry(fragment)?;
            Ok(derive::build_row(entry, date_scraped))
        })
        .collect();
    rows
}
