use scraper::{ElementRef, Html};

use crate::formats::{CategoryDirectory, CategoryEntry};
use crate::html::{SelectorError, selector, text_of};

pub const LABELS_SELECTOR: &str = "#z_labels";
pub const SLIDER_SELECTOR: &str = "#z_slider";

#[derive(Debug, thiserror::Error)]
pub enum LandingError {
    #[error("landing page has no element matching {0:?}")]
    MissingElement(&'static str),
    #[error("label entry {index} has no {missing} element")]
    IncompleteLabel { index: usize, missing: &'static str },
    #[error("slider is not valid json: {0}")]
    SliderJson(#[from] serde_json::Error),
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

pub fn read_labels(document: &Html) -> Result<CategoryDirectory, LandingError> {
    let container = document
        .select(&selector(LABELS_SELECTOR)?)
        .next()
        .ok_or(LandingError::MissingElement(LABELS_SELECTOR))?;
    parse_labels(container)
}

/// Every `li` must carry a link (name) and a span (count); one malformed
/// entry fails the whole directory. A repeated name keeps its first count.
pub fn parse_labels(container: ElementRef<'_>) -> Result<CategoryDirectory, LandingError> {
    let item_sel = selector("li")?;
    let link_sel = selector("a")?;
    let count_sel = selector("span")?;

    let mut entries = Vec::new();
    for (index, item) in container.select(&item_sel).enumerate() {
        let link = item
            .select(&link_sel)
            .next()
            .ok_or(LandingError::IncompleteLabel {
                index,
                missing: "a",
            })?;
        let count = item
            .select(&count_sel)
            .next()
            .ok_or(LandingError::IncompleteLabel {
                index,
                missing: "span",
            })?;

        let name = text_of(link);
        if entries.iter().any(|entry: &CategoryEntry| entry.name == name) {
            tracing::debug!(index, %name, "skip repeated label");
            continue;
        }
        entries.push(CategoryEntry {
            name,
            count: text_of(count)
                .chars()
                .filter(char::is_ascii_digit)
                .collect(),
        });
    }

    Ok(CategoryDirectory { entries })
}

pub fn read_slider(document: &Html) -> Result<serde_json::Value, LandingError> {
    let element = document
        .select(&selector(SLIDER_SELECTOR)?)
        .next()
        .ok_or(LandingError::MissingElement(SLIDER_SELECTOR))?;
    parse_slider(&text_of(element))
}

pub fn parse_slider(text: &str) -> Result<serde_json::Value, LandingError> {
    Ok(serde_json::from_str(text)?)
}
