use scraper::{ElementRef, Html, Selector};

use crate::formats::{FEATURED, PostRecord};
use crate::html::{SelectorError, selector, text_of};

pub const POST_SELECTOR: &str = ".post-outer-container";
pub const THUMB_SELECTOR: &str = "img#z_thumb";
pub const INFO_SELECTOR: &str = "div#z_info";
pub const TITLE_SELECTOR: &str = ".post-title.entry-title";
pub const LABEL_TAG_SELECTOR: &str = ".post-labels a";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Re-tag posts found under the featured pseudo-category with their
    /// first non-featured label.
    pub label_aware: bool,
    /// Only treat a block as a post when it has at least one label tag.
    pub require_label_tags: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("thumbnail has no src attribute")]
    MissingThumbnailSrc,
    #[error("metadata is not valid json: {0}")]
    Metadata(#[from] serde_json::Error),
}

pub struct PostExtractor {
    options: ExtractOptions,
    post: Selector,
    thumb: Selector,
    info: Selector,
    title: Selector,
    label_tag: Selector,
}

struct PostBlock<'a> {
    thumb: ElementRef<'a>,
    info: ElementRef<'a>,
    title: ElementRef<'a>,
    labels: Vec<String>,
}

impl PostExtractor {
    pub fn new(options: ExtractOptions) -> Result<Self, SelectorError> {
        Ok(Self {
            options,
            post: selector(POST_SELECTOR)?,
            thumb: selector(THUMB_SELECTOR)?,
            info: selector(INFO_SELECTOR)?,
            title: selector(TITLE_SELECTOR)?,
            label_tag: selector(LABEL_TAG_SELECTOR)?,
        })
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Blocks without a thumbnail, metadata or title are not posts and are
    /// passed over silently; unreadable metadata drops only that post.
    pub fn extract(&self, document: &Html, category: &str) -> Vec<PostRecord> {
        let mut records = Vec::new();
        for element in document.select(&self.post) {
            let Some(block) = self.locate(element) else {
                continue;
            };
            let title = block_title(&block);
            match self.read_post(&block, category) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(category, title = %title, %err, "skip post");
                }
            }
        }
        records
    }

    fn locate<'a>(&self, element: ElementRef<'a>) -> Option<PostBlock<'a>> {
        let thumb = element.select(&self.thumb).next()?;
        let info = element.select(&self.info).next()?;
        let title = element.select(&self.title).next()?;

        let labels: Vec<String> = element
            .select(&self.label_tag)
            .map(|tag| text_of(tag).trim().to_owned())
            .collect();
        if self.options.require_label_tags && labels.is_empty() {
            return None;
        }

        Some(PostBlock {
            thumb,
            info,
            title,
            labels,
        })
    }

    fn read_post(&self, block: &PostBlock<'_>, category: &str) -> Result<PostRecord, PostError> {
        let thumb = block
            .thumb
            .value()
            .attr("src")
            .ok_or(PostError::MissingThumbnailSrc)?;
        let record: PostRecord = serde_json::from_str(&text_of(block.info))?;

        Ok(record
            .with("t", thumb)
            .with("n", block_title(block))
            .with("c", self.resolve_category(category, &block.labels)))
    }

    fn resolve_category<'a>(&self, category: &'a str, labels: &'a [String]) -> &'a str {
        if !self.options.label_aware || category != FEATURED {
            return category;
        }
        resolve_featured_label(labels).unwrap_or(category)
    }
}

fn block_title(block: &PostBlock<'_>) -> String {
    text_of(block.title).trim().to_owned()
}

/// First label that names a real category rather than the featured one.
pub fn resolve_featured_label(labels: &[String]) -> Option<&str> {
    labels
        .iter()
        .map(String::as_str)
        .find(|label| !label.is_empty() && *label != FEATURED)
}
