use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::core::CatalogItem;
use crate::error::{CatalogError, Result};

/// Display order of the visible items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Document order
    #[default]
    None,
    Title,
    Developer,
    Publisher,
    /// Oldest first
    YearAscending,
    /// Newest first
    YearDescending,
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "default" => Ok(SortKey::None),
            "title" | "name" => Ok(SortKey::Title),
            "developer" => Ok(SortKey::Developer),
            "publisher" => Ok(SortKey::Publisher),
            "year" | "year-asc" | "year-ascending" | "oldest" => Ok(SortKey::YearAscending),
            "year-desc" | "year-descending" | "newest" => Ok(SortKey::YearDescending),
            other => Err(CatalogError::UnknownSortKey(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::None => "none",
            SortKey::Title => "title",
            SortKey::Developer => "developer",
            SortKey::Publisher => "publisher",
            SortKey::YearAscending => "year-ascending",
            SortKey::YearDescending => "year-descending",
        })
    }
}

/// Dated items first; undated items last in both directions
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of `order` (indices into `items`) by `key`.
///
/// Text keys compare the lower-cased fields; ties keep their input order.
/// [`SortKey::None`] restores ascending index (document) order.
pub fn sort_indices(items: &[CatalogItem], order: &mut [usize], key: SortKey) {
    match key {
        SortKey::None => order.sort_unstable(),
        SortKey::Title => order.sort_by(|&a, &b| items[a].title.cmp(&items[b].title)),
        SortKey::Developer => order.sort_by(|&a, &b| items[a].developer.cmp(&items[b].developer)),
        SortKey::Publisher => order.sort_by(|&a, &b| items[a].publisher.cmp(&items[b].publisher)),
        SortKey::YearAscending | SortKey::YearDescending => {
            let descending = key == SortKey::YearDescending;
            let dates: Vec<Option<NaiveDate>> = items.iter().map(CatalogItem::sort_date).collect();
            order.sort_by(|&a, &b| compare_dates(dates[a], dates[b], descending));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemRecord;

    fn item(id: usize, title: &str, release_date: &str) -> CatalogItem {
        let record = ItemRecord {
            title: title.to_string(),
            release_date: release_date.to_string(),
            ..Default::default()
        };
        CatalogItem::new(id, record, "")
    }

    #[test]
    fn test_parse_sort_keys() {
        assert_eq!("year-desc".parse::<SortKey>().unwrap(), SortKey::YearDescending);
        assert_eq!("Year-Ascending".parse::<SortKey>().unwrap(), SortKey::YearAscending);
        assert_eq!("title".parse::<SortKey>().unwrap(), SortKey::Title);
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::None);
        assert!("rating".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_year_descending() {
        let items = vec![item(0, "Sonic", "1991-06-23"), item(1, "Chrono", "1994-03-11")];
        let mut order = vec![0, 1];
        sort_indices(&items, &mut order, SortKey::YearDescending);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_undated_items_sort_last_both_ways() {
        let items = vec![
            item(0, "A", "TBA"),
            item(1, "B", "1994-03-11"),
            item(2, "C", "1991-06-23"),
            item(3, "D", ""),
        ];

        let mut order = vec![0, 1, 2, 3];
        sort_indices(&items, &mut order, SortKey::YearAscending);
        assert_eq!(order, vec![2, 1, 0, 3]);

        let mut order = vec![0, 1, 2, 3];
        sort_indices(&items, &mut order, SortKey::YearDescending);
        assert_eq!(order, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_title_sort_is_case_insensitive_and_stable() {
        let items = vec![
            item(0, "zelda", ""),
            item(1, "Contra", ""),
            item(2, "Zelda", ""),
            item(3, "contra", ""),
        ];
        let mut order = vec![0, 1, 2, 3];
        sort_indices(&items, &mut order, SortKey::Title);
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_none_restores_document_order() {
        let items = vec![item(0, "B", ""), item(1, "A", ""), item(2, "C", "")];
        let mut order = vec![2, 0, 1];
        sort_indices(&items, &mut order, SortKey::None);
        assert_eq!(order, vec![0, 1, 2]);
    }
}
