use std::collections::{BTreeMap, BTreeSet};

use crate::config::HtmlSelectors;
use crate::core::item::{keys, GameDatabase};
use crate::document::html::start_tags;
use crate::document::{DocumentHost, ElementId};
use crate::export::ExportFile;

/// What an element is to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Item,
    Counter,
}

/// One element of a [`StaticDocument`]
#[derive(Debug, Clone, PartialEq)]
pub struct StaticElement {
    pub kind: ElementKind,
    /// `data-*` attributes, keyed without the `data-` prefix
    pub dataset: BTreeMap<String, String>,
    pub visible: bool,
    pub markers: BTreeSet<String>,
    pub text: Option<String>,
}

impl StaticElement {
    fn new(kind: ElementKind, dataset: BTreeMap<String, String>) -> Self {
        Self {
            kind,
            dataset,
            visible: true,
            markers: BTreeSet::new(),
            text: None,
        }
    }
}

/// In-memory host document.
///
/// Holds the elements of a page and records every change the catalog makes:
/// visibility, markers, container order, results text and downloads.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    elements: Vec<StaticElement>,
    container_order: Vec<ElementId>,
    results_text: Option<String>,
    has_results_target: bool,
    has_search_box: bool,
    search_focused: bool,
    downloads: Vec<ExportFile>,
}

impl StaticDocument {
    /// Empty page with a results target and a search box
    pub fn new() -> Self {
        Self {
            has_results_target: true,
            has_search_box: true,
            ..Default::default()
        }
    }

    /// Page with one item element per attribute list (keys without `data-`)
    pub fn from_items<I, A, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut doc = Self::new();
        for attrs in items {
            let dataset = attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
            doc.push_element(StaticElement::new(ElementKind::Item, dataset));
        }
        doc
    }

    /// Page generated from a console database; entries without a category get `category`
    pub fn from_game_database(db: &GameDatabase, category: &str) -> Self {
        let mut doc = Self::new();
        doc.append_game_database(db, category);
        doc
    }

    /// Append the entries of another console database as item elements
    pub fn append_game_database(&mut self, db: &GameDatabase, category: &str) {
        for game in &db.games {
            let category = if game.category.is_empty() {
                category
            } else {
                game.category.as_str()
            };

            let dataset = [
                (keys::TITLE, game.title.as_str()),
                (keys::DEVELOPER, game.developer.as_str()),
                (keys::PUBLISHER, game.publisher.as_str()),
                (keys::CATEGORY, category),
                (keys::YEAR, game.year.as_str()),
                (keys::RELEASE_DATE, game.release_date.as_str()),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

            self.push_element(StaticElement::new(ElementKind::Item, dataset));
        }
    }

    /// Read item and counter elements from a pre-rendered page
    pub fn parse_html(html: &str, selectors: &HtmlSelectors) -> Self {
        let mut doc = Self::default();

        for tag in start_tags(html) {
            match tag.attribute("id") {
                Some(id) if id == selectors.results_id => doc.has_results_target = true,
                Some(id) if id == selectors.search_id => doc.has_search_box = true,
                _ => {}
            }

            let kind = if tag.has_class(&selectors.item_class) {
                ElementKind::Item
            } else if tag.attribute(&selectors.counter_attribute).is_some() {
                ElementKind::Counter
            } else {
                continue;
            };

            let dataset = tag
                .attributes
                .iter()
                .filter_map(|(k, v)| k.strip_prefix("data-").map(|k| (k.to_string(), v.clone())))
                .collect();

            doc.push_element(StaticElement::new(kind, dataset));
        }

        tracing::debug!(
            "Parsed page: {} elements, results target: {}, search box: {}",
            doc.elements.len(),
            doc.has_results_target,
            doc.has_search_box
        );

        doc
    }

    /// Add an animated counter element counting up to `target`
    pub fn add_counter(&mut self, target: u64) -> ElementId {
        let dataset = [("count".to_string(), target.to_string())].into_iter().collect();
        self.push_element(StaticElement::new(ElementKind::Counter, dataset))
    }

    fn push_element(&mut self, element: StaticElement) -> ElementId {
        let id = self.elements.len();
        if element.kind == ElementKind::Item {
            self.container_order.push(id);
        }
        self.elements.push(element);
        id
    }

    /// Drop the optional results target
    pub fn without_results_target(mut self) -> Self {
        self.has_results_target = false;
        self
    }

    /// Drop the optional search box
    pub fn without_search_box(mut self) -> Self {
        self.has_search_box = false;
        self
    }

    pub fn element(&self, id: ElementId) -> Option<&StaticElement> {
        self.elements.get(id)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.elements.get(id).map(|e| e.visible).unwrap_or(false)
    }

    pub fn has_marker(&self, id: ElementId, marker: &str) -> bool {
        self.elements
            .get(id)
            .map(|e| e.markers.contains(marker))
            .unwrap_or(false)
    }

    /// Item elements in their current container order
    pub fn container_order(&self) -> &[ElementId] {
        &self.container_order
    }

    /// Visible item elements in container order
    pub fn displayed(&self) -> Vec<ElementId> {
        self.container_order
            .iter()
            .copied()
            .filter(|&id| self.is_visible(id))
            .collect()
    }

    pub fn results_text(&self) -> Option<&str> {
        self.results_text.as_deref()
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn downloads(&self) -> &[ExportFile] {
        &self.downloads
    }

    /// Hand pending downloads to the caller
    pub fn take_downloads(&mut self) -> Vec<ExportFile> {
        std::mem::take(&mut self.downloads)
    }
}

impl DocumentHost for StaticDocument {
    fn item_elements(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind == ElementKind::Item)
            .map(|(id, _)| id)
            .collect()
    }

    fn dataset(&self, id: ElementId, key: &str) -> Option<String> {
        self.elements.get(id)?.dataset.get(key).cloned()
    }

    fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(element) = self.elements.get_mut(id) {
            element.visible = visible;
        }
    }

    fn add_marker(&mut self, id: ElementId, marker: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.markers.insert(marker.to_string());
        }
    }

    fn reorder(&mut self, order: &[ElementId]) {
        // Elements not named keep their relative order after the named ones
        let named: BTreeSet<ElementId> = order.iter().copied().collect();
        let present: BTreeSet<ElementId> = self.container_order.iter().copied().collect();
        let mut reordered: Vec<ElementId> = order.iter().copied().filter(|id| present.contains(id)).collect();
        reordered.extend(self.container_order.iter().filter(|id| !named.contains(*id)));
        self.container_order = reordered;
    }

    fn set_results_text(&mut self, text: &str) -> bool {
        if self.has_results_target {
            self.results_text = Some(text.to_string());
        }
        self.has_results_target
    }

    fn focus_search(&mut self) -> bool {
        if self.has_search_box {
            self.search_focused = true;
        }
        self.has_search_box
    }

    fn download(&mut self, file: &ExportFile) {
        self.downloads.push(file.clone());
    }

    fn counter_elements(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind == ElementKind::Counter)
            .map(|(id, _)| id)
            .collect()
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.text = Some(text.to_string());
        }
    }
}
