use scraper::{ElementRef, Selector};

#[derive(Debug, thiserror::Error)]
#[error("invalid css selector {css:?}: {message}")]
pub struct SelectorError {
    pub css: String,
    pub message: String,
}

pub fn selector(css: &str) -> Result<Selector, SelectorError> {
    Selector::parse(css).map_err(|err| SelectorError {
        css: css.to_owned(),
        message: err.to_string(),
    })
}

pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
