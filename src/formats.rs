use serde::ser::SerializeMap as _;
use serde::{Deserialize, Serialize, Serializer};

pub const FEATURED: &str = "Featured";

pub const SLIDER: &str = "Slider";

/// One post as scraped from a listing page: the inline metadata object,
/// written back out exactly as parsed.
///
/// The metadata has used different key names over time (`title`/`n`,
/// `size`/`s`, `url`/`u`, ...); the accessors try the long name first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostRecord {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl PostRecord {
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_owned(), serde_json::Value::String(value.into()));
        self
    }

    pub fn title(&self) -> Option<String> {
        self.first_non_empty(&["title", "n"])
    }

    pub fn size(&self) -> Option<String> {
        self.first_non_empty(&["size", "s"])
    }

    pub fn url(&self) -> Option<String> {
        self.first_non_empty(&["url", "u"])
    }

    pub fn thumbnail(&self) -> Option<String> {
        self.first_non_empty(&["thumbnail", "t"])
    }

    pub fn preview(&self) -> Option<String> {
        self.first_non_empty(&["preview", "p"])
    }

    pub fn author_name(&self) -> Option<String> {
        self.first_non_empty(&["author", "a"])
    }

    pub fn author_url(&self) -> Option<String> {
        self.first_non_empty(&["author_url", "a_l"])
    }

    pub fn category(&self) -> Option<String> {
        self.first_non_empty(&["c"])
    }

    fn first_non_empty(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key).and_then(scalar_text))
            .find(|text| !text.trim().is_empty())
    }
}

/// Strings, numbers and booleans read as text; anything else as absent.
fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub count: String,
}

/// Category name to post count, in the order the landing page lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDirectory {
    pub entries: Vec<CategoryEntry>,
}

impl CategoryDirectory {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.name != name)
                .cloned()
                .collect(),
        }
    }
}

impl Serialize for CategoryDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub n: String,
    pub s: String,
    pub u: String,
    pub t: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItems {
    pub name: String,
    pub items: Vec<NormalizedItem>,
}

/// `full.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDocument {
    pub slider: Vec<NormalizedItem>,
    pub featured: Vec<NormalizedItem>,
    pub categories: Vec<CategoryItems>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MainDocument<'a> {
    pub featured: &'a [PostRecord],
    pub categories: CategoryDirectory,
    pub slider: &'a serde_json::Value,
}
