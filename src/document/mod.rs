pub mod html;
pub mod static_doc;

use crate::export::ExportFile;

pub use static_doc::{StaticDocument, StaticElement};

/// Handle to an element owned by the host document
pub type ElementId = usize;

/// Host page as seen by the catalog.
///
/// Optional targets (results text, search box) may be absent; the matching
/// methods report that through their return value and otherwise do nothing.
pub trait DocumentHost {
    /// Item elements in document order
    fn item_elements(&self) -> Vec<ElementId>;

    /// `data-<key>` attribute of an element
    fn dataset(&self, id: ElementId, key: &str) -> Option<String>;

    /// Show or hide an element
    fn set_visible(&mut self, id: ElementId, visible: bool);

    /// Add a visual marker (CSS class) to an element
    fn add_marker(&mut self, id: ElementId, marker: &str);

    /// Reorder item elements inside their container
    fn reorder(&mut self, order: &[ElementId]);

    /// Write the results count text; false when the page has no target for it
    fn set_results_text(&mut self, text: &str) -> bool;

    /// Focus the search box; false when the page has none
    fn focus_search(&mut self) -> bool;

    /// Offer a file for download
    fn download(&mut self, file: &ExportFile);

    /// Animated counter elements
    fn counter_elements(&self) -> Vec<ElementId>;

    /// Replace the text content of an element
    fn set_text(&mut self, id: ElementId, text: &str);
}
