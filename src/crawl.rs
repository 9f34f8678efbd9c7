use std::path::{Path, PathBuf};

use anyhow::Context as _;
use url::Url;

use crate::cli::CrawlArgs;
use crate::collect::Collection;
use crate::export;
use crate::extract::{ExtractOptions, PostExtractor};
use crate::fetch::{HttpFetcher, PageFetcher};

#[derive(Debug, Clone)]
pub struct CrawlPlan {
    pub base: Url,
    pub out_dir: PathBuf,
    pub db: Option<PathBuf>,
    pub priority: Vec<String>,
    pub extract: ExtractOptions,
}

impl CrawlPlan {
    pub fn from_args(args: &CrawlArgs) -> anyhow::Result<Self> {
        let base = Url::parse(&args.url).context("parse --url")?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!("--url must be http/https: {base}");
        }

        Ok(Self {
            base,
            out_dir: PathBuf::from(&args.out),
            db: args.db.as_ref().map(PathBuf::from),
            priority: args.priority.clone(),
            extract: ExtractOptions {
                label_aware: args.label_aware,
                require_label_tags: args.require_label_tags,
            },
        })
    }
}

pub fn run(args: CrawlArgs) -> anyhow::Result<()> {
    let plan = CrawlPlan::from_args(&args)?;
    let fetcher = HttpFetcher::new()?;
    execute(&fetcher, &plan)?;
    Ok(())
}

pub fn execute<F: PageFetcher>(fetcher: &F, plan: &CrawlPlan) -> anyhow::Result<Collection> {
    tracing::info!(base = %plan.base, out = %plan.out_dir.display(), "start crawl");
    std::fs::create_dir_all(&plan.out_dir)
        .with_context(|| format!("create output dir: {}", plan.out_dir.display()))?;

    let extractor = PostExtractor::new(plan.extract)?;
    let collection = crate::collect::collect(fetcher, &plan.base, &extractor)?;

    export::write_category_documents(&plan.out_dir, &collection);
    write_merged_outputs(&plan.out_dir, &collection, &plan.priority);
    if let Some(db) = plan.db.as_deref() {
        export_database(db, &collection);
    }

    tracing::info!("crawl completed");
    Ok(collection)
}

fn write_merged_outputs(out_dir: &Path, collection: &Collection, priority: &[String]) {
    if let Err(err) = export::write_collected(out_dir, &collection.accumulated) {
        tracing::error!("failed to save collected data: {err:#}");
    }

    let full = crate::merge::merge(&collection.accumulated, priority);
    let full_path = out_dir.join(export::FULL_FILE);
    match export::write_full(&full_path, &full) {
        Ok(()) => tracing::info!(path = %full_path.display(), "saved merged document"),
        Err(err) => tracing::error!("failed to save merged document: {err:#}"),
    }
}

fn export_database(db: &Path, collection: &Collection) {
    if let Err(err) = crate::sql::export_to_path(db, &collection.accumulated) {
        tracing::error!(db = %db.display(), "failed to export to database: {err:#}");
    }
}
