use std::path::Path;

use anyhow::{Context as _, Result};
use rusqlite::{Connection, OptionalExtension as _, Transaction, params};

use crate::cli::ToSqlArgs;
use crate::collect::Accumulated;
use crate::formats::PostRecord;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("open database: {}", path.display()))?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS author (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            url  TEXT
        );

        CREATE TABLE IF NOT EXISTS item (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            title     TEXT NOT NULL,
            size      TEXT NOT NULL,
            thumbnail TEXT NOT NULL,
            author    INTEGER REFERENCES author(id),
            category  INTEGER NOT NULL REFERENCES categories(id),
            preview   TEXT,
            url       TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub categories: usize,
    pub items: usize,
    pub skipped: usize,
}

pub fn export(conn: &mut Connection, accumulated: &Accumulated) -> Result<ExportStats> {
    let tx = conn.transaction()?;
    let mut stats = ExportStats::default();

    for group in accumulated.groups() {
        let category_id = category_id(&tx, &group.name)
            .with_context(|| format!("category: {}", group.name))?;
        stats.categories += 1;

        for record in &group.items {
            match insert_item(&tx, category_id, record) {
                Ok(()) => stats.items += 1,
                Err(err) => {
                    stats.skipped += 1;
                    tracing::warn!(
                        category = %group.name,
                        title = %record.title().unwrap_or_default(),
                        "skip item: {err:#}"
                    );
                }
            }
        }
    }

    tx.commit()?;
    Ok(stats)
}

fn insert_item(tx: &Transaction<'_>, category_id: i64, record: &PostRecord) -> Result<()> {
    let title = record.title().context("post has no title")?;
    let size = record.size().context("post has no size")?;
    let thumbnail = record.thumbnail().context("post has no thumbnail")?;
    let url = record.url().context("post has no url")?;

    let author_id = match record.author_name() {
        Some(name) => Some(author_id(tx, &name, record.author_url().as_deref())?),
        None => None,
    };

    tx.execute(
        "INSERT INTO item (title, size, thumbnail, author, category, preview, url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            title,
            size,
            thumbnail,
            author_id,
            category_id,
            record.preview(),
            url
        ],
    )?;
    Ok(())
}

fn category_id(tx: &Transaction<'_>, name: &str) -> Result<i64> {
    let existing = tx
        .query_row(
            "SELECT id FROM categories WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    tx.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
    Ok(tx.last_insert_rowid())
}

/// The url is stored only when the author is first seen.
fn author_id(tx: &Transaction<'_>, name: &str, url: Option<&str>) -> Result<i64> {
    let existing = tx
        .query_row(
            "SELECT id FROM author WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    tx.execute(
        "INSERT INTO author (name, url) VALUES (?1, ?2)",
        params![name, url],
    )?;
    Ok(tx.last_insert_rowid())
}

pub fn export_to_path(path: &Path, accumulated: &Accumulated) -> Result<ExportStats> {
    let mut conn = connect(path)?;
    init_schema(&conn).context("create schema")?;
    let stats = export(&mut conn, accumulated)?;
    tracing::info!(
        db = %path.display(),
        categories = stats.categories,
        items = stats.items,
        skipped = stats.skipped,
        "data saved to database"
    );
    Ok(stats)
}

pub fn run(args: ToSqlArgs) -> Result<()> {
    let accumulated = crate::export::read_collected(Path::new(&args.input))?;
    export_to_path(Path::new(&args.db), &accumulated)?;
    Ok(())
}
