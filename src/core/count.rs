use std::fmt;

/// Integer with `,` thousands separators (`1234567` → `1,234,567`)
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// "Showing X of Y games"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultsCounter {
    pub visible: usize,
    pub total: usize,
}

impl fmt::Display for ResultsCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} of {} games",
            format_count(self.visible as u64),
            format_count(self.total as u64)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(123456), "123,456");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_results_counter_text() {
        let counter = ResultsCounter { visible: 12, total: 1716 };
        assert_eq!(counter.to_string(), "Showing 12 of 1,716 games");
    }
}
