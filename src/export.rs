use std::fmt;
use std::str::FromStr;

use crate::core::ItemRecord;
use crate::error::{CatalogError, Result};

/// CSV header row, in record field order
pub const CSV_HEADER: [&str; 5] = ["Title", "Developer", "Publisher", "Category", "Release Date"];

/// Download format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(CatalogError::UnknownExportFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A serialized download ready to hand to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

/// Serialize records in `format`, naming the file `<basename>.<ext>`
pub fn export_records(records: &[ItemRecord], format: ExportFormat, basename: &str) -> Result<ExportFile> {
    let contents = match format {
        ExportFormat::Json => to_json(records)?,
        ExportFormat::Csv => to_csv(records),
    };

    Ok(ExportFile {
        file_name: format!("{}.{}", basename, format.extension()),
        mime_type: format.mime_type().to_string(),
        contents,
    })
}

/// Pretty-printed JSON array
pub fn to_json(records: &[ItemRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Read back a JSON export
pub fn from_json(json: &str) -> Result<Vec<ItemRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Every field double-quoted; embedded quotes are doubled
pub fn to_csv(records: &[ItemRecord]) -> String {
    let mut out = String::new();
    push_csv_row(&mut out, &CSV_HEADER);

    for r in records {
        push_csv_row(
            &mut out,
            &[
                r.title.as_str(),
                r.developer.as_str(),
                r.publisher.as_str(),
                r.category.as_str(),
                r.release_date.as_str(),
            ],
        );
    }

    out
}

fn push_csv_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrono_trigger() -> ItemRecord {
        ItemRecord {
            title: "Chrono Trigger".to_string(),
            developer: "Square".to_string(),
            publisher: "Square".to_string(),
            category: "snes".to_string(),
            release_date: "1995-03-11".to_string(),
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(CatalogError::UnknownExportFormat(f)) if f == "xml"
        ));
        assert_eq!(ExportFormat::default(), ExportFormat::Json);
    }

    #[test]
    fn test_export_file_name() {
        let file = export_records(&[chrono_trigger()], ExportFormat::Csv, "games-data").unwrap();
        assert_eq!(file.file_name, "games-data.csv");
        assert_eq!(file.mime_type, "text/csv");

        let file = export_records(&[], ExportFormat::Json, "games-data").unwrap();
        assert_eq!(file.file_name, "games-data.json");
        assert_eq!(file.contents, "[]");
    }

    #[test]
    fn test_json_is_pretty_and_camel_case() {
        let json = to_json(&[chrono_trigger()]).unwrap();
        assert!(json.contains("\n  {\n    \"title\": \"Chrono Trigger\""));
        assert!(json.contains("\"releaseDate\": \"1995-03-11\""));
    }

    #[test]
    fn test_json_reimport_keeps_case() {
        let records = vec![chrono_trigger()];
        let json = to_json(&records).unwrap();
        assert_eq!(from_json(&json).unwrap(), records);
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let csv = to_csv(&[chrono_trigger()]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], r#""Title","Developer","Publisher","Category","Release Date""#);
        assert_eq!(lines[1], r#""Chrono Trigger","Square","Square","snes","1995-03-11""#);
    }

    #[test]
    fn test_csv_escapes_quotes_and_keeps_commas() {
        let record = ItemRecord {
            title: "Say \"Cheese\", Mario".to_string(),
            ..Default::default()
        };
        let csv = to_csv(&[record]);
        assert_eq!(csv.lines().nth(1).unwrap(), r#""Say ""Cheese"", Mario","","","","""#);
    }
}
