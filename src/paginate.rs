use anyhow::Context as _;
use scraper::Html;
use url::Url;

use crate::fetch::PageFetcher;
use crate::html::selector;

pub const OLDER_POSTS_SELECTOR: &str = ".blog-pager-older-link";

pub fn category_url(base: &Url, category: &str) -> anyhow::Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("base url cannot carry a path: {base}"))?
        .pop_if_empty()
        .extend(["search", "label", category]);
    Ok(url)
}

pub fn older_posts_link(document: &Html, current: &Url) -> anyhow::Result<Option<Url>> {
    let Some(link) = document.select(&selector(OLDER_POSTS_SELECTOR)?).next() else {
        return Ok(None);
    };
    let Some(href) = link.value().attr("href") else {
        return Ok(None);
    };
    let next = current
        .join(href.trim())
        .with_context(|| format!("resolve older posts link {href:?} on {current}"))?;
    Ok(Some(next))
}

#[derive(Debug)]
pub struct ListingPage {
    pub url: Url,
    pub document: Html,
}

/// Ends at the first page without an "older posts" link. A fetch error is
/// yielded once and ends the iteration.
pub struct CategoryPages<F> {
    fetcher: F,
    next: Option<Url>,
}

impl<F: PageFetcher> CategoryPages<F> {
    pub fn new(fetcher: F, first: Url) -> Self {
        Self {
            fetcher,
            next: Some(first),
        }
    }

    pub fn for_category(fetcher: F, base: &Url, category: &str) -> anyhow::Result<Self> {
        Ok(Self::new(fetcher, category_url(base, category)?))
    }

    fn load(&mut self, url: Url) -> anyhow::Result<ListingPage> {
        tracing::info!(%url, "fetch listing page");
        let body = self.fetcher.fetch(&url)?;
        let document = Html::parse_document(&body);
        self.next = older_posts_link(&document, &url)?;
        Ok(ListingPage { url, document })
    }
}

impl<F: PageFetcher> Iterator for CategoryPages<F> {
    type Item = anyhow::Result<ListingPage>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.next.take()?;
        Some(self.load(url))
    }
}
