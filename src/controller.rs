use crate::config::CatalogOptions;
use crate::core::{CatalogItem, ItemRecord, ResultsCounter};
use crate::document::{DocumentHost, ElementId};
use crate::export::{self, ExportFile, ExportFormat};
use crate::sort::{self, SortKey};

/// Category filter value that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

/// Search, filter, sort and export over the item elements of one page.
///
/// The controller owns its host document handle and is the only writer of
/// its item state. `items` is fixed after [`load`](Self::load); `visible`
/// holds indices into `items` in document order.
pub struct CatalogController<D: DocumentHost> {
    document: D,
    options: CatalogOptions,
    items: Vec<CatalogItem>,
    visible: Vec<usize>,
    shown: Vec<bool>,
    query: String,
    category: String,
    sort_key: SortKey,
    loaded: bool,
}

impl<D: DocumentHost> CatalogController<D> {
    /// Create a controller with default options
    pub fn new(document: D) -> Self {
        Self::with_options(document, CatalogOptions::default())
    }

    pub fn with_options(document: D, options: CatalogOptions) -> Self {
        Self {
            document,
            options,
            items: Vec::new(),
            visible: Vec::new(),
            shown: Vec::new(),
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort_key: SortKey::None,
            loaded: false,
        }
    }

    /// Read every item element from the document, in document order.
    ///
    /// Only the first call reads the document; later calls leave the item
    /// list untouched. Returns the number of items.
    pub fn load(&mut self) -> usize {
        if self.loaded {
            tracing::warn!("⚠️ Catalog already loaded, keeping {} items", self.items.len());
            return self.items.len();
        }

        let elements = self.document.item_elements();
        self.items = elements
            .into_iter()
            .map(|element| CatalogItem::from_element(&self.document, element))
            .collect();
        self.visible = (0..self.items.len()).collect();
        self.shown = vec![true; self.items.len()];
        self.loaded = true;

        for item in &self.items {
            self.document.set_visible(item.element, true);
        }

        tracing::info!("✅ Loaded {} catalog items", self.items.len());
        self.results_counter();
        self.items.len()
    }

    /// Store the lower-cased search text and refilter
    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_lowercase();
        self.recompute();
    }

    /// Store the category selection and refilter; empty means [`ALL_CATEGORIES`]
    pub fn set_category(&mut self, value: &str) {
        let value = value.trim().to_lowercase();
        self.category = if value.is_empty() {
            ALL_CATEGORIES.to_string()
        } else {
            value
        };
        self.recompute();
    }

    /// Recompute the visible set and update element display state
    pub fn recompute(&mut self) {
        let query = self.query.as_str();
        let category = self.category.as_str();

        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches_query(query) && item.matches_category(category))
            .map(|(i, _)| i)
            .collect();

        let mut next_shown = vec![false; self.items.len()];
        for &i in &self.visible {
            next_shown[i] = true;
        }

        for (i, item) in self.items.iter().enumerate() {
            let show = next_shown[i];
            self.document.set_visible(item.element, show);
            if show && !self.shown[i] {
                self.document.add_marker(item.element, &self.options.revealed_marker);
            }
        }
        self.shown = next_shown;

        tracing::debug!(
            "Filter query={:?} category={:?}: {} of {} visible",
            self.query,
            self.category,
            self.visible.len(),
            self.items.len()
        );

        self.results_counter();
    }

    /// Reorder the displayed visible elements; membership is unchanged.
    ///
    /// Hidden elements follow the sorted visible ones in their previous order.
    pub fn sort(&mut self, key: SortKey) {
        let mut order = self.visible.clone();
        sort::sort_indices(&self.items, &mut order, key);

        let elements: Vec<ElementId> = order.iter().map(|&i| self.items[i].element).collect();
        self.document.reorder(&elements);
        self.sort_key = key;

        tracing::debug!("Sorted {} visible items by {}", elements.len(), key);
    }

    /// Serialize the visible items and hand the file to the document.
    ///
    /// Returns the file, or `None` when serialization failed (logged).
    pub fn export(&mut self, format: ExportFormat) -> Option<ExportFile> {
        let records: Vec<ItemRecord> = self.visible_items().map(|item| item.record().clone()).collect();

        match export::export_records(&records, format, &self.options.export_basename) {
            Ok(file) => {
                tracing::info!("📦 Exported {} items to {}", records.len(), file.file_name);
                self.document.download(&file);
                Some(file)
            }
            Err(e) => {
                tracing::warn!("⚠️ Export to {} failed: {}", format, e);
                None
            }
        }
    }

    /// Write "Showing X of Y games" to the page, if it has a target for it
    pub fn results_counter(&mut self) -> ResultsCounter {
        let counter = ResultsCounter {
            visible: self.visible.len(),
            total: self.items.len(),
        };
        if !self.document.set_results_text(&counter.to_string()) {
            tracing::trace!("No results target on page");
        }
        counter
    }

    /// Focus the page's search box; false when there is none
    pub fn focus_search(&mut self) -> bool {
        self.document.focus_search()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Indices into [`items`](Self::items) of the visible set
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.visible.iter().map(move |&i| &self.items[i])
    }

    /// Distinct categories in first-seen order (selector options)
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !item.category.is_empty() && !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Last sort applied
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StaticDocument;

    fn two_games() -> CatalogController<StaticDocument> {
        let doc = StaticDocument::from_items(vec![
            vec![
                ("title", "Chrono Trigger"),
                ("developer", "Square"),
                ("publisher", "Square"),
                ("category", "snes"),
                ("release-date", "1995-03-11"),
            ],
            vec![
                ("title", "Sonic"),
                ("developer", "Sonic Team"),
                ("publisher", "Sega"),
                ("category", "genesis"),
                ("release-date", "1991-06-23"),
            ],
        ]);
        let mut controller = CatalogController::new(doc);
        controller.load();
        controller
    }

    #[test]
    fn test_load_shows_everything() {
        let controller = two_games();
        assert_eq!(controller.items().len(), 2);
        assert_eq!(controller.visible(), &[0, 1]);
        assert_eq!(controller.document().results_text(), Some("Showing 2 of 2 games"));
    }

    #[test]
    fn test_load_twice_keeps_items() {
        let mut controller = two_games();
        controller.set_query("sonic");
        assert_eq!(controller.load(), 2);
        assert_eq!(controller.visible(), &[1]);
    }

    #[test]
    fn test_query_category_conjunction() {
        let mut controller = two_games();

        controller.set_query("CHRONO");
        assert_eq!(controller.visible(), &[0]);

        controller.set_query("");
        controller.set_category("genesis");
        assert_eq!(controller.visible(), &[1]);

        controller.set_query("chrono");
        assert!(controller.visible().is_empty());
        assert_eq!(controller.document().results_text(), Some("Showing 0 of 2 games"));
    }

    #[test]
    fn test_revealed_marker_on_transition_only() {
        let mut controller = two_games();
        assert!(!controller.document().has_marker(0, "revealed"));

        controller.set_query("sonic");
        assert!(!controller.document().is_visible(0));
        assert!(!controller.document().has_marker(1, "revealed"));

        controller.set_query("");
        assert!(controller.document().is_visible(0));
        assert!(controller.document().has_marker(0, "revealed"));
        assert!(!controller.document().has_marker(1, "revealed"));
    }

    #[test]
    fn test_empty_category_means_all() {
        let mut controller = two_games();
        controller.set_category("snes");
        controller.set_category("  ");
        assert_eq!(controller.category(), ALL_CATEGORIES);
        assert_eq!(controller.visible(), &[0, 1]);
    }

    #[test]
    fn test_sort_keeps_membership() {
        let mut controller = two_games();
        controller.sort(SortKey::YearAscending);
        assert_eq!(controller.document().container_order(), &[1, 0]);
        assert_eq!(controller.visible(), &[0, 1]);
        assert_eq!(controller.sort_key(), SortKey::YearAscending);
    }

    #[test]
    fn test_export_visible_only() {
        let mut controller = two_games();
        controller.set_category("snes");
        let file = controller.export(ExportFormat::Csv).unwrap();
        assert_eq!(file.file_name, "games-data.csv");
        assert_eq!(file.contents.lines().count(), 2);
        assert!(file.contents.contains("\"Chrono Trigger\""));
        assert_eq!(controller.document().downloads().len(), 1);
    }

    #[test]
    fn test_categories() {
        let controller = two_games();
        assert_eq!(controller.categories(), vec!["snes", "genesis"]);
    }
}
