//! CSV and JSON export of adapter responses.

use crate::response::{
    CompaniesResponse, CompanyAnalyticsResponse, CompanySummary, Mover, PerformersResponse,
    SectorBreakdownResponse, SectorCompaniesResponse,
};
use karachi_data::{SectorActivity, SectorRollup};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Flat company row; every column present on every record.
#[derive(Debug, Serialize)]
struct CompanyRecord<'a> {
    symbol: &'a str,
    name: &'a str,
    sector: &'a str,
    market_cap: f64,
    price: Option<f64>,
    change: Option<f64>,
    pe: Option<f64>,
    sector_share: Option<f64>,
}

impl<'a> CompanyRecord<'a> {
    fn new(summary: &'a CompanySummary, sector_share: Option<f64>) -> Self {
        Self {
            symbol: &summary.symbol,
            name: &summary.name,
            sector: &summary.sector,
            market_cap: summary.market_cap,
            price: summary.price,
            change: summary.change,
            pe: summary.pe,
            sector_share,
        }
    }
}

/// Flat mover row, tagged with the list it belongs to.
#[derive(Debug, Serialize)]
struct MoverRecord<'a> {
    list: &'a str,
    rank: usize,
    symbol: &'a str,
    name: &'a str,
    sector: &'a str,
    price: f64,
    change: f64,
    volume: u64,
}

impl<'a> MoverRecord<'a> {
    fn rows(list: &'a str, movers: &'a [Mover]) -> impl Iterator<Item = Self> + 'a {
        movers.iter().enumerate().map(move |(i, m)| Self {
            list,
            rank: i + 1,
            symbol: &m.symbol,
            name: m.name.as_deref().unwrap_or(""),
            sector: m.sector.as_deref().unwrap_or(""),
            price: m.price,
            change: m.change,
            volume: m.volume,
        })
    }
}

#[derive(Debug, Serialize)]
struct FieldRecord<'a> {
    section: &'a str,
    field: &'a str,
    value: String,
}

fn write_csv<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

fn write_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

impl Exporter for Vec<CompanySummary> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.iter().map(|c| CompanyRecord::new(c, None))),
            _ => write_json(self, format),
        }
    }
}

impl Exporter for CompaniesResponse {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();
                output.push_str(&format!(
                    "# Page: {} of {} ({} companies)\n",
                    self.page,
                    self.pages(),
                    self.total
                ));
                output.push_str(&self.companies.export_to_string(format)?);
                Ok(output)
            }
            _ => write_json(self, format),
        }
    }
}

impl Exporter for Vec<SectorRollup> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self),
            _ => write_json(self, format),
        }
    }
}

impl Exporter for SectorBreakdownResponse {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();
                output.push_str(&format!("# Last Updated: {}\n", self.last_updated.to_rfc3339()));
                output.push_str(&format!("# Total Market Cap (M): {:.2}\n", self.total_market_cap));
                output.push_str(&self.sectors.export_to_string(format)?);
                Ok(output)
            }
            _ => write_json(self, format),
        }
    }
}

impl Exporter for SectorCompaniesResponse {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(
                self.companies
                    .iter()
                    .map(|c| CompanyRecord::new(&c.summary, Some(c.sector_share))),
            ),
            _ => write_json(self, format),
        }
    }
}

impl Exporter for Vec<SectorActivity> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self),
            _ => write_json(self, format),
        }
    }
}

impl Exporter for CompanyAnalyticsResponse {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let fields = flatten_fields(&serde_json::to_value(self)?);
                write_csv(fields.iter().map(|(section, field, value)| FieldRecord {
                    section,
                    field,
                    value: value.clone(),
                }))
            }
            _ => write_json(self, format),
        }
    }
}

impl Exporter for PerformersResponse {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();
                output.push_str(&format!("# Index: {}\n", self.index));
                output.push_str(&format!("# Last Updated: {}\n", self.last_updated.to_rfc3339()));
                output.push_str(&write_csv(
                    MoverRecord::rows("gainers", &self.gainers)
                        .chain(MoverRecord::rows("losers", &self.losers))
                        .chain(MoverRecord::rows("volumeLeaders", &self.volume_leaders)),
                )?);
                Ok(output)
            }
            _ => write_json(self, format),
        }
    }
}

/// (section, field, value) triples of a two-level JSON object.
fn flatten_fields(value: &serde_json::Value) -> Vec<(String, String, String)> {
    let Some(sections) = value.as_object() else {
        return Vec::new();
    };
    sections
        .iter()
        .filter_map(|(section, body)| body.as_object().map(|fields| (section, fields)))
        .flat_map(|(section, fields)| {
            fields.iter().map(move |(field, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (section.clone(), field.clone(), text)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::SectorCompany;
    use chrono::Utc;

    fn summary(symbol: &str, pe: Option<f64>) -> CompanySummary {
        CompanySummary {
            symbol: symbol.to_string(),
            name: format!("{symbol} Limited"),
            sector: "Banking".to_string(),
            market_cap: 1_000.0,
            price: Some(100.0),
            change: Some(-0.5),
            pe,
        }
    }

    fn rollup(name: &str, market_cap: f64, percentage: f64) -> SectorRollup {
        SectorRollup {
            name: name.to_string(),
            market_cap,
            percentage,
            companies_count: 2,
            avg_pe: 6.5,
            avg_change: 1.25,
        }
    }

    #[test]
    fn test_performers_csv_tags_each_list() {
        let mover = |symbol: &str, change: f64, volume: u64| Mover {
            symbol: symbol.to_string(),
            name: None,
            sector: Some("Banking".to_string()),
            price: 100.0,
            change,
            volume,
        };
        let mut performers = PerformersResponse::empty("KSE100", Utc::now());
        performers.gainers = vec![mover("HBL", 2.1, 10), mover("LUCK", 1.5, 5)];
        performers.losers = vec![mover("UBL", -0.85, 3)];
        performers.volume_leaders = vec![mover("HBL", 2.1, 10)];

        let csv = performers.export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "# Index: KSE100");
        assert_eq!(lines[2], "list,rank,symbol,name,sector,price,change,volume");
        assert_eq!(lines[3], "gainers,1,HBL,,Banking,100.0,2.1,10");
        assert_eq!(lines[5], "losers,1,UBL,,Banking,100.0,-0.85,3");
        assert_eq!(lines[6], "volumeLeaders,1,HBL,,Banking,100.0,2.1,10");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_company_csv_has_stable_columns() {
        let companies = vec![summary("HBL", Some(6.2)), summary("UBL", None)];
        let csv = companies.export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "symbol,name,sector,market_cap,price,change,pe,sector_share"
        );
        assert!(lines[1].starts_with("HBL,"));
        assert!(lines[2].contains(",,"));
    }

    #[test]
    fn test_companies_response_csv_header() {
        let response = CompaniesResponse {
            companies: vec![summary("HBL", None)],
            total: 45,
            page: 2,
            limit: 20,
        };
        let csv = response.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("# Page: 2 of 3 (45 companies)\n"));
        assert!(csv.contains("HBL"));
    }

    #[test]
    fn test_breakdown_csv() {
        let breakdown = SectorBreakdownResponse::new(
            vec![rollup("Banking", 750.0, 75.0), rollup("Cement", 250.0, 25.0)],
            Utc::now(),
        );
        let csv = breakdown.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("# Total Market Cap (M): 1000.00"));
        assert!(csv.contains("name,marketCap,percentage,companiesCount,avgPE,performance1M"));
        assert!(csv.contains("Banking,750.0,75.0,2,6.5,1.25"));
    }

    #[test]
    fn test_breakdown_json() {
        let breakdown = SectorBreakdownResponse::new(vec![rollup("Banking", 1.0, 100.0)], Utc::now());
        let json = breakdown.export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"totalMarketCap\""));
        assert!(!json.contains('\n'));

        let pretty = breakdown.export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(pretty.contains("  "));
    }

    #[test]
    fn test_sector_companies_csv_share_column() {
        let response = SectorCompaniesResponse {
            sector: "Banking".to_string(),
            companies: vec![SectorCompany {
                summary: summary("HBL", Some(6.2)),
                sector_share: 62.5,
            }],
            total: 1,
            market_cap: 1_600.0,
        };
        let csv = response.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",62.5"));
    }

    #[test]
    fn test_activity_csv() {
        let activity = vec![SectorActivity {
            name: "CEMENT".to_string(),
            advance: 8,
            decline: 9,
            unchanged: 1,
            turnover: 18_400_210.0,
            market_cap_billions: 1_120.4,
        }];
        let csv = activity.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("name,advance,decline,unchanged,turnover,marketCapBillions"));
        assert!(csv.contains("CEMENT,8,9,1"));
    }

    #[test]
    fn test_flatten_fields() {
        let value = serde_json::json!({
            "company": {"symbol": "HBL", "marketCap": 10.5},
            "ratios": {"pe": 6.2}
        });
        let fields = flatten_fields(&value);
        assert!(fields.contains(&("company".to_string(), "symbol".to_string(), "HBL".to_string())));
        assert!(fields.contains(&("ratios".to_string(), "pe".to_string(), "6.2".to_string())));
    }

    #[test]
    fn test_export_to_file() {
        let companies = vec![summary("HBL", Some(6.2))];
        let path = std::env::temp_dir().join("karachi_export_test.json");

        companies.export_to_file(&path, ExportFormat::Json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"HBL\""));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
