use anyhow::Context as _;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> anyhow::Result<String>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        (**self).fetch(url)
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, concat!("labelcrawl/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;

        response
            .text()
            .with_context(|| format!("read response body: {url}"))
    }
}
