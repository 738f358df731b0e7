use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::parser::derive::notice_date;
use crate::parser::ExtractionError;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".filetitle a").unwrap());
static DETAIL_CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".details tr td").unwrap());

const DATE_LABEL: &str = "Date:";

/// Raw fields of one listing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub description: String,
    pub document_description: String,
    pub on_notice_to: Option<String>,
    pub date_received: String,
}

pub fn extract_entry(fragment: ElementRef<'_>) -> Result<Entry, ExtractionError> {
    let title = fragment
        .select(&TITLE_SEL)
        .next()
        .ok_or(ExtractionError::MissingTitle)?;

    let description = element_text(title);
    if description.is_empty() {
        return Err(ExtractionError::EmptyTitle);
    }

    let document_description = title
        .value()
        .attr("href")
        .map(|href| href.trim().to_string())
        .ok_or_else(|| ExtractionError::MissingLink {
            description: description.clone(),
        })?;

    let on_notice_to = notice_date(&description);
    let date_received = date_received(fragment, &description)?;

    Ok(Entry {
        description,
        document_description,
        on_notice_to,
        date_received,
    })
}

/// Value cell following the first "Date:" label in the details table.
fn date_received(fragment: ElementRef<'_>, description: &str) -> Result<String, ExtractionError> {
    let label = fragment
        .select(&DETAIL_CELL_SEL)
        .find(|cell| element_text(*cell).contains(DATE_LABEL))
        .ok_or_else(|| ExtractionError::MissingDateLabel {
            description: description.to_string(),
        })?;

    label
        .next_siblings()
        .find_map(ElementRef::wrap)
        .map(element_text)
        .ok_or_else(|| ExtractionError::MissingDateValue {
            description: description.to_string(),
        })
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn entry_html(body: &str) -> Html {
        Html::parse_document(&format!(
            "<html><body><div class=\"wpfilebase-file-default\">{}</div></body></html>",
            body
        ))
    }

    fn extract(body: &str) -> Result<Entry, ExtractionError> {
        let doc = entry_html(body);
        let sel = Selector::parse(".wpfilebase-file-default").unwrap();
        let fragment = doc.select(&sel).next().unwrap();
        extract_entry(fragment)
    }

    const DETAILS: &str =
        "<table class=\"details\"><tr><td>Date:</td><td>  12 June 2025  </td></tr></table>";

    #[test]
    fn full_entry() {
        let e = extract(&format!(
            "<div class=\"filetitle\"><a href=\"/docs/pln25001.pdf\"> PLN-25-001 - Dwelling Extension </a></div>{}",
            DETAILS
        ))
        .unwrap();
        assert_eq!(e.description, "PLN-25-001 - Dwelling Extension");
        assert_eq!(e.document_description, "/docs/pln25001.pdf");
        assert_eq!(e.date_received, "12 June 2025");
        assert_eq!(e.on_notice_to, None);
    }

    #[test]
    fn notice_date_from_title() {
        let e = extract(&format!(
            "<div class=\"filetitle\"><a href=\"/d.pdf\">PLN-25-009 - Shed - closes 14 March 2025</a></div>{}",
            DETAILS
        ))
        .unwrap();
        assert_eq!(e.on_notice_to.as_deref(), Some("14 March 2025"));
    }

    #[test]
    fn nested_title_markup() {
        let e = extract(&format!(
            "<div class=\"filetitle\"><a href=\"/d.pdf\"><span>PLN-25-010</span> - Pool</a></div>{}",
            DETAILS
        ))
        .unwrap();
        assert_eq!(e.description, "PLN-25-010 - Pool");
    }

    #[test]
    fn missing_title() {
        let err = extract(DETAILS).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingTitle));
    }

    #[test]
    fn blank_title() {
        let err = extract(&format!(
            "<div class=\"filetitle\"><a href=\"/d.pdf\">   </a></div>{}",
            DETAILS
        ))
        .unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyTitle));
    }

    #[test]
    fn missing_href() {
        let err = extract(&format!(
            "<div class=\"filetitle\"><a>PLN-25-011 - Carport</a></div>{}",
            DETAILS
        ))
        .unwrap_err();
        assert!(matches!(err, ExtractionError::MissingLink { .. }));
    }

    #[test]
    fn missing_date_label() {
        let err = extract(
            "<div class=\"filetitle\"><a href=\"/d.pdf\">PLN-25-012 - Fence</a></div>\
             <table class=\"details\"><tr><td>Size:</td><td>1 MB</td></tr></table>",
        )
        .unwrap_err();
        assert!(
            matches!(err, ExtractionError::MissingDateLabel { ref description } if description == "PLN-25-012 - Fence")
        );
    }

    #[test]
    fn missing_date_value() {
        let err = extract(
            "<div class=\"filetitle\"><a href=\"/d.pdf\">PLN-25-013 - Deck</a></div>\
             <table class=\"details\"><tr><td>Date:</td></tr></table>",
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::MissingDateValue { .. }));
    }

    #[test]
    fn date_label_outside_details_ignored() {
        let err = extract(
            "<div class=\"filetitle\"><a href=\"/d.pdf\">PLN-25-014 - Deck</a></div>\
             <table><tr><td>Date:</td><td>1 May 2025</td></tr></table>",
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::MissingDateLabel { .. }));
    }
}
