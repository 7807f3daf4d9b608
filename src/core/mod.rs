pub mod count;
pub mod item;
pub mod release_date;

pub use count::{format_count, ResultsCounter};
pub use item::{CatalogItem, GameDatabase, GameEntry, ItemRecord};
pub use release_date::{format_release_date, parse_release_date};
