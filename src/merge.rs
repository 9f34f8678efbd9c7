use std::path::Path;

use crate::cli::MergeArgs;
use crate::collect::{Accumulated, Group};
use crate::formats::{CategoryItems, FEATURED, FullDocument, NormalizedItem, PostRecord, SLIDER};

pub const DEFAULT_PRIORITY: [&str; 4] = ["Emoji", "Color", "Stylish", "Myanmar"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("post has no {0}")]
pub struct MissingField(pub &'static str);

/// Canonical item for one record. `keep_category` retains the `c` tag,
/// which only carries information for slider and featured items.
pub fn normalize(record: &PostRecord, keep_category: bool) -> Result<NormalizedItem, MissingField> {
    let required = |value: Option<String>, field| value.ok_or(MissingField(field));

    Ok(NormalizedItem {
        n: required(record.title(), "title")?,
        s: required(record.size(), "size")?,
        u: required(record.url(), "url")?,
        t: required(record.thumbnail(), "thumbnail")?,
        p: record.preview(),
        a: record.author_name(),
        a_l: record.author_url(),
        c: if keep_category {
            record.category()
        } else {
            None
        },
    })
}

fn normalize_group(group: &Group, keep_category: bool) -> Vec<NormalizedItem> {
    group
        .items
        .iter()
        .filter_map(|record| match normalize(record, keep_category) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(
                    group = %group.name,
                    title = %record.title().unwrap_or_default(),
                    %err,
                    "leave post out of merged document"
                );
                None
            }
        })
        .collect()
}

/// Names in `priority` first, in that order; the rest keep encounter order.
pub fn order_categories(categories: &mut [CategoryItems], priority: &[String]) {
    categories.sort_by_key(|category| {
        priority
            .iter()
            .position(|name| *name == category.name)
            .unwrap_or(priority.len())
    });
}

pub fn merge(accumulated: &Accumulated, priority: &[String]) -> FullDocument {
    let mut document = FullDocument::default();

    for group in accumulated.groups() {
        let hoisted = group.name.to_lowercase();
        if hoisted == SLIDER.to_lowercase() {
            document.slider.extend(normalize_group(&group, true));
        } else if hoisted == FEATURED.to_lowercase() {
            document.featured.extend(normalize_group(&group, true));
        } else {
            document.categories.push(CategoryItems {
                items: normalize_group(&group, false),
                name: group.name,
            });
        }
    }

    order_categories(&mut document.categories, priority);
    document
}

pub fn run(args: MergeArgs) -> anyhow::Result<()> {
    let accumulated = crate::export::read_collected(Path::new(&args.input))?;
    let document = merge(&accumulated, &args.priority);
    crate::export::write_full(Path::new(&args.out), &document)?;
    tracing::info!(
        out = %args.out,
        categories = document.categories.len(),
        "saved merged document"
    );
    Ok(())
}

pub fn default_priority() -> Vec<String> {
    DEFAULT_PRIORITY.iter().map(|name| (*name).to_owned()).collect()
}
