use chrono::NaiveDate;

/// Full-date layouts accepted on item elements, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%d %B %Y",
    "%m/%d/%Y",
];

/// Parse a release date as written on the page.
///
/// Accepts full dates (ISO, slashed, `March 11, 1994`, `11 March 1994`),
/// `YYYY-MM` (first of the month) and bare `YYYY` (January 1st).
/// Returns `None` for anything else.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    if let Some((year, month)) = raw.split_once('-') {
        if let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) {
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }

    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.parse::<i32>().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    None
}

/// Date used to order items by year: the release date, else the year field.
pub fn release_sort_date(release_date: &str, year: &str) -> Option<NaiveDate> {
    parse_release_date(release_date).or_else(|| parse_release_date(year))
}

/// Render a release date for display (`March 11, 1994`), or the raw text if unparsable.
pub fn format_release_date(raw: &str) -> String {
    match parse_release_date(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}
