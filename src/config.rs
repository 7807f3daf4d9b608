use std::time::Duration;

/// Element lookup rules used when reading a pre-rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSelectors {
    /// Class carried by every item element
    pub item_class: String,
    /// Attribute carrying a counter's target value
    pub counter_attribute: String,
    /// Id of the "Showing X of Y games" text node
    pub results_id: String,
    /// Id of the search box
    pub search_id: String,
}

impl Default for HtmlSelectors {
    fn default() -> Self {
        Self {
            item_class: "game-card".to_string(),
            counter_attribute: "data-count".to_string(),
            results_id: "results-count".to_string(),
            search_id: "search-input".to_string(),
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub selectors: HtmlSelectors,
    /// Marker applied to items that become visible again
    pub revealed_marker: String,
    /// File stem of downloads (`<name>.json` / `<name>.csv`)
    pub export_basename: String,
    /// Key that focuses the search box when pressed with Ctrl/Cmd
    pub focus_search_key: char,
    /// Key that exports JSON when pressed with Ctrl/Cmd
    pub export_key: char,
    /// Count-up duration of animated counters
    pub counter_duration: Duration,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            selectors: HtmlSelectors::default(),
            revealed_marker: "revealed".to_string(),
            export_basename: "games-data".to_string(),
            focus_search_key: 'k',
            export_key: 'e',
            counter_duration: Duration::from_millis(2000),
        }
    }
}

impl CatalogOptions {
    /// Defaults overlaid with `GAMEDB_ITEM_CLASS`, `GAMEDB_EXPORT_NAME` and `GAMEDB_COUNTER_MS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(class) = lookup("GAMEDB_ITEM_CLASS").filter(|v| !v.trim().is_empty()) {
            options.selectors.item_class = class.trim().to_string();
        }

        if let Some(name) = lookup("GAMEDB_EXPORT_NAME").filter(|v| !v.trim().is_empty()) {
            options.export_basename = name.trim().to_string();
        }

        match lookup("GAMEDB_COUNTER_MS").map(|v| v.parse::<u64>()) {
            Some(Ok(ms)) => options.counter_duration = Duration::from_millis(ms),
            Some(Err(e)) => tracing::warn!("⚠️ Ignoring GAMEDB_COUNTER_MS: {}", e),
            None => {}
        }

        options
    }
}
