use std::fs::OpenOptions;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;

use crate::collect::{Accumulated, Collection};
use crate::formats::{FEATURED, FullDocument, MainDocument};

pub const MAIN_FILE: &str = "main.json";
pub const FULL_FILE: &str = "full.json";
pub const COLLECTED_FILE: &str = "collected.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Pretty,
    Compact,
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, layout: Layout) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("open output: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let written = match layout {
        Layout::Pretty => serde_json::to_writer_pretty(&mut out, value),
        Layout::Compact => serde_json::to_writer(&mut out, value),
    };
    written.with_context(|| format!("serialize output: {}", path.display()))?;
    out.flush()
        .with_context(|| format!("flush output: {}", path.display()))?;
    Ok(())
}

/// Logs instead of failing; one unwritable file never stops the others.
fn save<T: Serialize + ?Sized>(path: &Path, value: &T, layout: Layout) -> bool {
    match write_json(path, value, layout) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "saved");
            true
        }
        Err(err) => {
            tracing::error!(path = %path.display(), "failed to save: {err:#}");
            false
        }
    }
}

/// A category whose file would overwrite one of the run's own outputs gets
/// a `.category.json` suffix instead.
pub fn category_file_name(category: &str) -> String {
    let stem: String = category
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    let file = format!("{stem}.json");
    if [MAIN_FILE, FULL_FILE, COLLECTED_FILE]
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&file))
    {
        tracing::warn!(category, "category file name is reserved; writing {stem}.category.json");
        return format!("{stem}.category.json");
    }
    file
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl WriteReport {
    fn record(&mut self, path: PathBuf, ok: bool) {
        if ok {
            self.written.push(path);
        } else {
            self.failed.push(path);
        }
    }
}

/// One file per category, with the featured pseudo-category folded into
/// `main.json` together with the directory and slider.
pub fn write_category_documents(out_dir: &Path, collection: &Collection) -> WriteReport {
    let mut report = WriteReport::default();

    for group in &collection.accumulated.categories {
        if group.name == FEATURED {
            let main = MainDocument {
                featured: &group.items,
                categories: collection.directory.without(FEATURED),
                slider: &collection.accumulated.slider,
            };
            let path = out_dir.join(MAIN_FILE);
            let ok = save(&path, &main, Layout::Pretty);
            report.record(path, ok);
        } else {
            let path = out_dir.join(category_file_name(&group.name));
            let ok = save(&path, &group.items, Layout::Pretty);
            report.record(path, ok);
        }
    }

    if collection.featured().is_none() {
        tracing::warn!("no {FEATURED} category listed; {MAIN_FILE} not written");
    }

    report
}

pub fn write_collected(out_dir: &Path, accumulated: &Accumulated) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(COLLECTED_FILE);
    let value = accumulated.to_json()?;
    write_json(&path, &value, Layout::Compact)?;
    Ok(path)
}

pub fn write_full(path: &Path, document: &FullDocument) -> anyhow::Result<()> {
    write_json(path, document, Layout::Compact)
}

pub fn read_collected(path: &Path) -> anyhow::Result<Accumulated> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read collected data: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse collected data: {}", path.display()))?;
    Accumulated::from_json(value)
}
