use anyhow::Context as _;
use scraper::Html;
use url::Url;

use crate::extract::PostExtractor;
use crate::fetch::PageFetcher;
use crate::formats::{CategoryDirectory, FEATURED, PostRecord, SLIDER};
use crate::landing;
use crate::paginate::CategoryPages;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub items: Vec<PostRecord>,
}

/// Everything a crawl gathered, keyed the way `collected.json` stores it:
/// `{"Slider": <payload>, "<category>": [records], ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulated {
    pub slider: serde_json::Value,
    pub categories: Vec<Group>,
}

impl Default for Accumulated {
    fn default() -> Self {
        Self {
            slider: serde_json::Value::Object(serde_json::Map::new()),
            categories: Vec::new(),
        }
    }
}

impl Accumulated {
    #[must_use]
    pub fn with_category(mut self, group: Group) -> Self {
        self.categories.push(group);
        self
    }

    pub fn category(&self, name: &str) -> Option<&Group> {
        self.categories.iter().find(|group| group.name == name)
    }

    pub fn groups(&self) -> Vec<Group> {
        let mut groups = Vec::with_capacity(self.categories.len() + 1);
        groups.push(Group {
            name: SLIDER.to_owned(),
            items: slider_items(&self.slider),
        });
        groups.extend(self.categories.iter().cloned());
        groups
    }

    pub fn to_json(&self) -> anyhow::Result<serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert(SLIDER.to_owned(), self.slider.clone());
        for group in &self.categories {
            let items = serde_json::to_value(&group.items)
                .with_context(|| format!("serialize category: {}", group.name))?;
            map.insert(group.name.clone(), items);
        }
        Ok(serde_json::Value::Object(map))
    }

    pub fn from_json(value: serde_json::Value) -> anyhow::Result<Self> {
        let serde_json::Value::Object(map) = value else {
            anyhow::bail!("collected data must be a json object");
        };

        let mut accumulated = Self::default();
        for (name, value) in map {
            if name == SLIDER {
                accumulated.slider = value;
                continue;
            }
            let items: Vec<PostRecord> = serde_json::from_value(value)
                .with_context(|| format!("parse collected category: {name}"))?;
            accumulated.categories.push(Group { name, items });
        }
        Ok(accumulated)
    }
}

pub fn slider_items(slider: &serde_json::Value) -> Vec<PostRecord> {
    let Some(entries) = slider.as_array() else {
        tracing::debug!("slider payload is not a list; no slider items");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(
            |(index, entry)| match serde_json::from_value(entry.clone()) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(index, %err, "skip slider entry");
                    None
                }
            },
        )
        .collect()
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub directory: CategoryDirectory,
    pub accumulated: Accumulated,
}

impl Collection {
    pub fn featured(&self) -> Option<&Group> {
        self.accumulated.category(FEATURED)
    }
}

pub fn collect<F: PageFetcher>(
    fetcher: &F,
    base: &Url,
    extractor: &PostExtractor,
) -> anyhow::Result<Collection> {
    tracing::info!(%base, "fetch landing page");
    let body = fetcher.fetch(base).context("fetch landing page")?;
    let document = Html::parse_document(&body);

    let slider = landing::read_slider(&document).unwrap_or_else(|err| {
        tracing::error!(%err, "failed to read slider; using empty payload");
        serde_json::Value::Object(serde_json::Map::new())
    });
    let directory = landing::read_labels(&document).unwrap_or_else(|err| {
        tracing::error!(%err, "failed to read labels; no categories");
        CategoryDirectory::default()
    });
    tracing::info!(categories = directory.len(), "read category directory");

    let mut accumulated = Accumulated {
        slider,
        categories: Vec::with_capacity(directory.len()),
    };
    for name in directory.names() {
        let group = collect_category(fetcher, base, name, extractor)
            .with_context(|| format!("collect category: {name}"))?;
        accumulated = accumulated.with_category(group);
    }

    Ok(Collection {
        directory,
        accumulated,
    })
}

pub fn collect_category<F: PageFetcher>(
    fetcher: &F,
    base: &Url,
    category: &str,
    extractor: &PostExtractor,
) -> anyhow::Result<Group> {
    tracing::info!(category, "collect category");
    let mut items = Vec::new();
    let mut pages = 0_usize;
    for page in CategoryPages::for_category(fetcher, base, category)? {
        let page = page?;
        pages += 1;
        items.extend(extractor.extract(&page.document, category));
    }

    tracing::info!(category, pages, posts = items.len(), "collected category");
    Ok(Group {
        name: category.to_owned(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractOptions;
    use crate::paginate::tests::CannedFetcher;

    const BASE: &str = "https://b.test/";

    fn post(title: &str, info: &str) -> String {
        format!(
            r#"<div class="post-outer-container">
  <h3 class="post-title entry-title">{title}</h3>
  <img id="z_thumb" src="https://img.test/{title}.png"/>
  <div id="z_info">{info}</div>
</div>"#
        )
    }

    fn listing(posts: &[String], older: Option<&str>) -> String {
        let pager = older
            .map(|href| format!(r#"<a class="blog-pager-older-link" href="{href}">Older</a>"#))
            .unwrap_or_default();
        format!("<html><body>{}{pager}</body></html>", posts.concat())
    }

    #[test]
    fn two_page_category_with_one_bad_post() -> anyhow::Result<()> {
        let fetcher = CannedFetcher::default()
            .with_page(
                "https://b.test/search/label/Emoji",
                &listing(
                    &[
                        post("A", r#"{"u": "a"}"#),
                        post("Bad", "{oops"),
                        post("B", r#"{"u": "b"}"#),
                    ],
                    Some("/search/label/Emoji?max=2"),
                ),
            )
            .with_page(
                "https://b.test/search/label/Emoji?max=2",
                &listing(&[post("C", r#"{"u": "c"}"#)], None),
            );
        let extractor = PostExtractor::new(ExtractOptions::default())?;

        let group = collect_category(&fetcher, &Url::parse(BASE)?, "Emoji", &extractor)?;

        let titles: Vec<_> = group.items.iter().filter_map(PostRecord::title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(fetcher.requested.borrow().len(), 2);
        Ok(())
    }

    #[test]
    fn collect_walks_every_listed_category() -> anyhow::Result<()> {
        let landing = r#"<html><body>
  <div id="z_slider">not json</div>
  <div id="z_labels"><ul>
    <li><a>Featured</a><span>(1)</span></li>
    <li><a>Color</a><span>(1)</span></li>
  </ul></div></body></html>"#;
        let fetcher = CannedFetcher::default()
            .with_page(BASE, landing)
            .with_page(
                "https://b.test/search/label/Featured",
                &listing(&[post("F", "{}")], None),
            )
            .with_page(
                "https://b.test/search/label/Color",
                &listing(&[post("C", "{}")], None),
            );
        let extractor = PostExtractor::new(ExtractOptions::default())?;

        let collection = collect(&fetcher, &Url::parse(BASE)?, &extractor)?;

        assert_eq!(collection.directory.len(), 2);
        assert_eq!(
            collection.accumulated.slider,
            serde_json::Value::Object(serde_json::Map::new())
        );
        assert_eq!(collection.featured().map(|g| g.items.len()), Some(1));
        let names: Vec<_> = collection
            .accumulated
            .groups()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Slider", "Featured", "Color"]);
        Ok(())
    }

    #[test]
    fn category_fetch_failure_aborts_the_run() -> anyhow::Result<()> {
        let landing = r#"<div id="z_slider">[]</div>
  <div id="z_labels"><ul><li><a>Gone</a><span>(1)</span></li></ul></div>"#;
        let fetcher = CannedFetcher::default().with_page(BASE, landing);
        let extractor = PostExtractor::new(ExtractOptions::default())?;

        let err = collect(&fetcher, &Url::parse(BASE)?, &extractor)
            .expect_err("missing category page must fail");
        assert!(format!("{err:#}").contains("collect category: Gone"));
        Ok(())
    }

    #[test]
    fn accumulated_round_trips_through_collected_json() -> anyhow::Result<()> {
        let accumulated = Accumulated {
            slider: serde_json::json!([{"n": "S", "c": "Emoji"}]),
            categories: vec![Group {
                name: "Emoji".to_owned(),
                items: vec![PostRecord::default().with("n", "E")],
            }],
        };

        let json = accumulated.to_json()?;
        let keys: Vec<_> = json.as_object().map(|m| m.keys().cloned().collect()).unwrap_or_default();
        assert_eq!(keys, vec!["Slider", "Emoji"]);
        assert_eq!(Accumulated::from_json(json)?, accumulated);
        Ok(())
    }

    #[test]
    fn slider_entries_that_are_not_objects_are_dropped() {
        let items = slider_items(&serde_json::json!([{"n": "ok"}, 3, "text"]));
        assert_eq!(items.len(), 1);
        assert!(slider_items(&serde_json::json!({})).is_empty());
    }
}
