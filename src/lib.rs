//! # GameDB Catalog
//!
//! Interactivity over a pre-rendered game catalog page:
//! - Substring search over title, developer and publisher
//! - Single-valued category filter
//! - Stable sort by title, developer, publisher or release date
//! - JSON/CSV export of the visible games
//! - Animated counters and keyboard shortcuts
//! - Completion report of per-console game databases
//!
//! The page is reached through the [`DocumentHost`] trait; [`StaticDocument`]
//! is an in-memory page built from HTML or console databases.
//!
//! ## Example Usage
//!
//! ```rust
//! use gamedb_catalog::{CatalogController, SortKey, StaticDocument};
//!
//! let page = StaticDocument::from_items(vec![
//!     vec![("title", "Chrono Trigger"), ("category", "snes"), ("release-date", "1995-03-11")],
//!     vec![("title", "Sonic the Hedgehog"), ("category", "genesis"), ("release-date", "1991-06-23")],
//! ]);
//!
//! let mut catalog = CatalogController::new(page);
//! catalog.load();
//! catalog.set_query("chrono");
//! catalog.sort(SortKey::YearDescending);
//!
//! assert_eq!(catalog.visible().len(), 1);
//! assert_eq!(catalog.document().results_text(), Some("Showing 1 of 2 games"));
//! ```

pub mod animation;
pub mod config;
pub mod controller;
pub mod core;
pub mod document;
pub mod error;
pub mod events;
pub mod export;
pub mod progress;
pub mod sort;

// Re-export primary types
pub use config::{CatalogOptions, HtmlSelectors};
pub use controller::{CatalogController, ALL_CATEGORIES};
pub use core::{CatalogItem, GameDatabase, GameEntry, ItemRecord, ResultsCounter};
pub use document::{DocumentHost, ElementId, StaticDocument};
pub use error::{CatalogError, Result};
pub use events::{run_event_loop, CatalogEvent, EventBinder, EventOutcome, KeyPress};
pub use export::{ExportFile, ExportFormat};
pub use progress::ProgressTracker;
pub use sort::SortKey;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
