use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    labelcrawl::logging::init().context("init logging")?;

    let cli = labelcrawl::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        labelcrawl::cli::Command::Crawl(args) => {
            labelcrawl::crawl::run(args).context("crawl")?;
        }
        labelcrawl::cli::Command::Merge(args) => {
            labelcrawl::merge::run(args).context("merge")?;
        }
        labelcrawl::cli::Command::ToSql(args) => {
            labelcrawl::sql::run(args).context("to-sql")?;
        }
    }

    Ok(())
}
