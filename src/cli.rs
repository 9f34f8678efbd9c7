use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Crawl(CrawlArgs),
    Merge(MergeArgs),
    ToSql(ToSqlArgs),
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Blog base URL (must be http/https).
    #[arg(long)]
    pub url: String,

    /// Output directory for the JSON documents.
    #[arg(long)]
    pub out: String,

    /// SQLite database to append the crawl to.
    #[arg(long)]
    pub db: Option<String>,

    /// Categories listed first in `full.json`, in this order.
    #[arg(long, value_delimiter = ',', default_values_t = crate::merge::default_priority())]
    pub priority: Vec<String>,

    /// File featured posts under their first non-featured label.
    #[arg(long)]
    pub label_aware: bool,

    /// Ignore post blocks that carry no label tags.
    #[arg(long)]
    pub require_label_tags: bool,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Input path to `collected.json` (written by `crawl`).
    #[arg(long)]
    pub input: String,

    /// Output file path for the merged document.
    #[arg(long)]
    pub out: String,

    /// Categories listed first, in this order.
    #[arg(long, value_delimiter = ',', default_values_t = crate::merge::default_priority())]
    pub priority: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ToSqlArgs {
    /// Input path to `collected.json` (written by `crawl`).
    #[arg(long)]
    pub input: String,

    /// SQLite database file (created when missing).
    #[arg(long)]
    pub db: String,
}
