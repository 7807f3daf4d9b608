use serde::{Deserialize, Serialize};

use crate::core::release_date;
use crate::document::{DocumentHost, ElementId};

/// Dataset keys read from every item element
pub mod keys {
    pub const TITLE: &str = "title";
    pub const DEVELOPER: &str = "developer";
    pub const PUBLISHER: &str = "publisher";
    pub const CATEGORY: &str = "category";
    pub const YEAR: &str = "year";
    pub const RELEASE_DATE: &str = "release-date";
}

/// Item fields in their original case, as displayed and exported
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub release_date: String,
}

impl ItemRecord {
    /// Release date for display, raw text when unparsable
    pub fn display_release_date(&self) -> String {
        release_date::format_release_date(&self.release_date)
    }
}

/// One catalog entry, read once from its element.
///
/// Searchable fields are lower-cased at construction; the original text is
/// kept in [`CatalogItem::record`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub element: ElementId,
    pub title: String,
    pub developer: String,
    pub publisher: String,
    pub category: String,
    pub year: String,
    pub release_date: String,
    record: ItemRecord,
}

impl CatalogItem {
    /// Read an item from its element; absent attributes become empty strings
    pub fn from_element<D: DocumentHost + ?Sized>(document: &D, element: ElementId) -> Self {
        let read = |key: &str| {
            document
                .dataset(element, key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let record = ItemRecord {
            title: read(keys::TITLE),
            developer: read(keys::DEVELOPER),
            publisher: read(keys::PUBLISHER),
            category: read(keys::CATEGORY),
            release_date: read(keys::RELEASE_DATE),
        };

        if record.title.is_empty() {
            tracing::debug!("Item element {} has no title", element);
        }

        Self::new(element, record, read(keys::YEAR))
    }

    /// Build an item from already-known display fields
    pub fn new(element: ElementId, record: ItemRecord, year: impl Into<String>) -> Self {
        Self {
            element,
            title: record.title.to_lowercase(),
            developer: record.developer.to_lowercase(),
            publisher: record.publisher.to_lowercase(),
            category: record.category.to_lowercase(),
            year: year.into(),
            release_date: record.release_date.clone(),
            record,
        }
    }

    /// Original-cased fields
    pub fn record(&self) -> &ItemRecord {
        &self.record
    }

    /// True when the lower-cased query is empty or occurs in title, developer or publisher
    pub fn matches_query(&self, query: &str) -> bool {
        query.is_empty()
            || self.title.contains(query)
            || self.developer.contains(query)
            || self.publisher.contains(query)
    }

    /// True when the filter is the `"all"` sentinel or equals the item category
    pub fn matches_category(&self, category: &str) -> bool {
        category == crate::controller::ALL_CATEGORIES || self.category == category
    }

    /// Date used by the year sort modes
    pub fn sort_date(&self) -> Option<chrono::NaiveDate> {
        release_date::release_sort_date(&self.release_date, &self.year)
    }
}

/// Year as integer or string in database files
fn deserialize_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearValue {
        Int(i64),
        String(String),
        Null,
    }

    Ok(match Option::<YearValue>::deserialize(deserializer)? {
        Some(YearValue::Int(i)) => i.to_string(),
        Some(YearValue::String(s)) => s.trim().to_string(),
        Some(YearValue::Null) | None => String::new(),
    })
}

/// One game in a `<console>_games.json` database
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameEntry {
    #[serde(default, alias = "name")]
    pub title: String,

    #[serde(default)]
    pub developer: String,

    #[serde(default)]
    pub publisher: String,

    /// Falls back to the database's console when empty
    #[serde(default)]
    pub category: String,

    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: String,

    #[serde(default, alias = "releaseDate")]
    pub release_date: String,
}

/// A `<console>_games.json` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameDatabase {
    pub games: Vec<GameEntry>,

    #[serde(default)]
    pub last_updated: Option<String>,
}

impl GameDatabase {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StaticDocument;

    fn record(title: &str, developer: &str, publisher: &str, category: &str) -> ItemRecord {
        ItemRecord {
            title: title.to_string(),
            developer: developer.to_string(),
            publisher: publisher.to_string(),
            category: category.to_string(),
            release_date: String::new(),
        }
    }

    #[test]
    fn test_item_lowercases_searchable_fields() {
        let item = CatalogItem::new(0, record("Chrono Trigger", "Square", "Square", "SNES"), "1995");
        assert_eq!(item.title, "chrono trigger");
        assert_eq!(item.category, "snes");
        assert_eq!(item.record().title, "Chrono Trigger");
        assert_eq!(item.record().category, "SNES");
    }

    #[test]
    fn test_query_matching() {
        let item = CatalogItem::new(0, record("Sonic", "Sonic Team", "Sega", "genesis"), "1991");
        assert!(item.matches_query(""));
        assert!(item.matches_query("sonic"));
        assert!(item.matches_query("team"));
        assert!(item.matches_query("sega"));
        assert!(!item.matches_query("nintendo"));
        assert!(!item.matches_query("Sonic"));
    }

    #[test]
    fn test_category_matching() {
        let item = CatalogItem::new(0, record("Sonic", "Sonic Team", "Sega", "Genesis"), "1991");
        assert!(item.matches_category("all"));
        assert!(item.matches_category("genesis"));
        assert!(!item.matches_category("snes"));
    }

    #[test]
    fn test_from_element_defaults_missing_attributes() {
        let doc = StaticDocument::from_items(vec![vec![("title", "Pong")]]);
        let item = CatalogItem::from_element(&doc, 0);
        assert_eq!(item.title, "pong");
        assert_eq!(item.developer, "");
        assert_eq!(item.year, "");
        assert_eq!(item.sort_date(), None);
    }

    #[test]
    fn test_game_entry_year_int_or_string() {
        let db = GameDatabase::from_json(
            r#"{"games": [
                {"title": "A", "year": 1994},
                {"name": "B", "year": "1995", "releaseDate": "1995-03-11"},
                {"title": "C", "year": null},
                {"title": "D", "year": "TBA"}
            ], "last_updated": "2024-01-01"}"#,
        )
        .unwrap();

        assert_eq!(db.games[0].year, "1994");
        assert_eq!(db.games[1].title, "B");
        assert_eq!(db.games[1].release_date, "1995-03-11");
        assert_eq!(db.games[2].year, "");
        assert_eq!(db.games[3].year, "TBA");
        assert_eq!(db.last_updated.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_record_json_uses_camel_case() {
        let mut r = record("Chrono Trigger", "Square", "Square", "snes");
        r.release_date = "1995-03-11".to_string();
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"releaseDate\":\"1995-03-11\""));
    }
}
