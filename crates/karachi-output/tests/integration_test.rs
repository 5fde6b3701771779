//! Integration tests for response rendering and export.

use chrono::Utc;
use karachi_data::{CompanyIdentity, EnrichedCompany, Fundamentals, IndexMetric, SectorRollup};
use karachi_output::{
    CompaniesResponse, CompanyAnalyticsResponse, CompanySummary, ExportFormat, Exporter,
    SectorBreakdownResponse, TextReport,
};

fn enriched(symbol: &str, sector: &str, metric: Option<f64>, pe: Option<f64>) -> EnrichedCompany {
    EnrichedCompany::new(
        CompanyIdentity {
            symbol: symbol.to_string(),
            name: format!("{symbol} Limited"),
            sector: sector.to_string(),
            clearing_type: "CDS".to_string(),
            shares_outstanding: 2_000_000,
            free_float: 500_000,
            listed_in: "KSE100".to_string(),
        },
        metric.map(|cap| IndexMetric {
            symbol: symbol.to_string(),
            price: 100.0,
            change_percent: 1.0,
            volume: 0,
            market_cap_millions: cap,
        }),
        pe.map(|pe| Fundamentals {
            pe: Some(pe),
            ..Fundamentals::empty(symbol)
        }),
    )
}

#[test]
fn test_company_listing_workflow() {
    let companies = [
        enriched("HBL", "COMMERCIAL BANKS", Some(485_000.0), Some(6.2)),
        enriched("TRG", "TECHNOLOGY & COMMUNICATION", None, None),
    ];
    let response = CompaniesResponse {
        companies: companies.iter().map(CompanySummary::from).collect(),
        total: 2,
        page: 1,
        limit: 20,
    };

    let json = response.export_to_string(ExportFormat::Json).unwrap();
    let parsed: CompaniesResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, response);

    let ascii = response.to_ascii_table();
    assert!(ascii.contains("HBL"));
    assert!(ascii.contains("485000.00"));

    let markdown = response.to_markdown();
    assert!(markdown.contains("| Symbol |"));
    assert!(markdown.contains("| TRG |"));
}

#[test]
fn test_analytics_without_enrichment() {
    let bare = enriched("TRG", "TECHNOLOGY & COMMUNICATION", None, None);
    let analytics = CompanyAnalyticsResponse::from(&bare);

    assert_eq!(analytics.financials.market_cap, 0.0);
    assert!(analytics.ratios.pe.is_none());
    assert!(analytics.performance.price.is_none());

    let json = serde_json::to_value(&analytics).unwrap();
    assert!(json["ratios"].as_object().unwrap().is_empty());

    let csv = analytics.export_to_string(ExportFormat::Csv).unwrap();
    assert!(csv.starts_with("section,field,value"));
    assert!(csv.contains("company,symbol,TRG"));
    assert!(analytics.to_ascii_table().contains("P/E:                      -"));
}

#[test]
fn test_breakdown_round_trip_through_json() {
    let breakdown = SectorBreakdownResponse::new(
        vec![SectorRollup {
            name: "Banking".to_string(),
            market_cap: 485_000.0,
            percentage: 100.0,
            companies_count: 1,
            avg_pe: 6.2,
            avg_change: 2.1,
        }],
        Utc::now(),
    );

    let json = breakdown.export_to_string(ExportFormat::PrettyJson).unwrap();
    assert!(json.contains("\"avgPE\": 6.2"));
    assert!(json.contains("\"performance1M\": 2.1"));

    let parsed: SectorBreakdownResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, breakdown);
}
