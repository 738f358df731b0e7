use std::sync::LazyLock;

use regex::Regex;

use crate::db::ApplicationRow;
use crate::parser::fields::Entry;

const REFERENCE_SEPARATOR: &str = " - ";

static NOTICE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,2} (?:January|February|March|April|May|June|July|August|September|October|November|December|(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?) \d{4}\b",
    )
    .unwrap()
});

/// Council reference: everything before the first " - " in the title, trimmed.
/// A title without the separator is its own reference.
pub fn council_reference(description: &str) -> String {
    let description = description.trim();
    match description.split_once(REFERENCE_SEPARATOR) {
        Some((head, _)) => head.trim().to_string(),
        None => description.to_string(),
    }
}

/// First "14 March 2025"-shaped date in `text`. Best effort: any day/month/year
/// run in the title matches, related to the notice period or not.
pub fn notice_date(text: &str) -> Option<String> {
    NOTICE_DATE_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn build_row(entry: Entry, date_scraped: &str) -> ApplicationRow {
    ApplicationRow {
        council_reference: council_reference(&entry.description),
        description: entry.description,
        document_description: entry.document_description,
        date_received: Some(entry.date_received),
        on_notice_to: entry.on_notice_to,
        date_scraped: date_scraped.to_string(),
        address: None,
        applicant: None,
        owner: None,
        stage_description: None,
        stage_status: None,
        title_reference: None,
    }
}
