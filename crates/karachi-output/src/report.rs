//! Plain-text and Markdown rendering of adapter responses.

use crate::response::{
    CompaniesResponse, CompanyAnalyticsResponse, CompanySummary, Mover, PerformersResponse,
    SectorBreakdownResponse, SectorCompaniesResponse,
};
use karachi_data::SectorActivity;

/// Human-readable renderings of a response.
pub trait TextReport {
    /// Fixed-width table for terminal display.
    fn to_ascii_table(&self) -> String;

    /// Markdown for documentation.
    fn to_markdown(&self) -> String;
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

fn company_line(c: &CompanySummary) -> String {
    format!(
        "{:<10} {:<32} {:>14.2} {:>10} {:>8} {:>8}\n",
        c.symbol,
        truncate(&c.name, 32),
        c.market_cap,
        opt(c.price, 2),
        opt(c.change, 2),
        opt(c.pe, 2)
    )
}

fn company_header() -> String {
    format!(
        "{:<10} {:<32} {:>14} {:>10} {:>8} {:>8}\n",
        "Symbol", "Name", "Mkt Cap (M)", "Price", "Chg %", "P/E"
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

impl TextReport for SectorBreakdownResponse {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nSector Breakdown\n");
        output.push_str(&format!("Updated: {}\n", self.last_updated.format("%Y-%m-%d %H:%M:%S UTC")));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.sectors.is_empty() {
            output.push_str("No sector data available.\n");
        } else {
            output.push_str(&format!(
                "{:<30} {:>14} {:>8} {:>6} {:>8} {:>9}\n",
                "Sector", "Mkt Cap (M)", "Share", "Cos", "Avg P/E", "Avg Chg"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for sector in &self.sectors {
                output.push_str(&format!(
                    "{:<30} {:>14.2} {:>7.2}% {:>6} {:>8.2} {:>8.2}%\n",
                    truncate(&sector.name, 30),
                    sector.market_cap,
                    sector.percentage,
                    sector.companies_count,
                    sector.avg_pe,
                    sector.avg_change
                ));
            }
            output.push_str(&"-".repeat(80));
            output.push('\n');
        }

        output.push_str(&format!("{:<30} {:>14.2}\n", "Total", self.total_market_cap));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Sector Breakdown\n\n");
        output.push_str(&format!(
            "**Updated:** {}  \n**Total Market Cap:** {:.2}M\n\n",
            self.last_updated.format("%Y-%m-%d %H:%M:%S UTC"),
            self.total_market_cap
        ));

        if self.sectors.is_empty() {
            output.push_str("_No sector data available._\n");
            return output;
        }

        output.push_str("| Sector | Market Cap (M) | Share | Companies | Avg P/E | Avg Change |\n");
        output.push_str("|--------|---------------:|------:|----------:|--------:|-----------:|\n");
        for sector in &self.sectors {
            output.push_str(&format!(
                "| {} | {:.2} | {:.2}% | {} | {:.2} | {:.2}% |\n",
                sector.name,
                sector.market_cap,
                sector.percentage,
                sector.companies_count,
                sector.avg_pe,
                sector.avg_change
            ));
        }

        output
    }
}

impl TextReport for CompaniesResponse {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nCompanies (page {} of {}, {} total)\n",
            self.page,
            self.pages().max(1),
            self.total
        ));
        output.push_str(&"=".repeat(88));
        output.push('\n');
        output.push_str(&company_header());
        output.push_str(&"-".repeat(88));
        output.push('\n');
        for company in &self.companies {
            output.push_str(&company_line(company));
        }
        output.push_str(&"=".repeat(88));
        output.push('\n');

        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# Companies\n\nPage {} of {} ({} total)\n\n",
            self.page,
            self.pages().max(1),
            self.total
        ));
        output.push_str("| Symbol | Name | Sector | Market Cap (M) | Price | Change | P/E |\n");
        output.push_str("|--------|------|--------|---------------:|------:|-------:|----:|\n");
        for c in &self.companies {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2} | {} | {} | {} |\n",
                c.symbol,
                c.name,
                c.sector,
                c.market_cap,
                opt(c.price, 2),
                opt(c.change, 2),
                opt(c.pe, 2)
            ));
        }

        output
    }
}

impl TextReport for SectorCompaniesResponse {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} ({} companies, {:.2}M)\n",
            self.sector, self.total, self.market_cap
        ));
        output.push_str(&"=".repeat(88));
        output.push('\n');
        output.push_str(&company_header().replace('\n', &format!(" {:>7}\n", "Share")));
        output.push_str(&"-".repeat(88));
        output.push('\n');
        for company in &self.companies {
            let line = company_line(&company.summary);
            output.push_str(line.trim_end_matches('\n'));
            output.push_str(&format!(" {:>6.2}%\n", company.sector_share));
        }
        output.push_str(&"=".repeat(88));
        output.push('\n');

        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.sector));
        output.push_str(&format!(
            "**Companies:** {}  \n**Market Cap:** {:.2}M\n\n",
            self.total, self.market_cap
        ));
        output.push_str("| Symbol | Name | Market Cap (M) | Share | Change | P/E |\n");
        output.push_str("|--------|------|---------------:|------:|-------:|----:|\n");
        for c in &self.companies {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {:.2}% | {} | {} |\n",
                c.summary.symbol,
                c.summary.name,
                c.summary.market_cap,
                c.sector_share,
                opt(c.summary.change, 2),
                opt(c.summary.pe, 2)
            ));
        }

        output
    }
}

impl TextReport for Vec<SectorActivity> {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nSector Activity\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<34} {:>5} {:>5} {:>5} {:>8} {:>18}\n",
            "Sector", "Adv", "Dec", "Unch", "A/D", "Turnover"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');
        for sector in self {
            output.push_str(&format!(
                "{:<34} {:>5} {:>5} {:>5} {:>8} {:>18.0}\n",
                truncate(&sector.name, 34),
                sector.advance,
                sector.decline,
                sector.unchanged,
                opt(sector.advance_decline_ratio(), 2),
                sector.turnover
            ));
        }
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Sector Activity\n\n");
        output.push_str("| Sector | Advance | Decline | Unchanged | Turnover | Market Cap (B) |\n");
        output.push_str("|--------|--------:|--------:|----------:|---------:|---------------:|\n");
        for sector in self {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:.0} | {:.2} |\n",
                sector.name,
                sector.advance,
                sector.decline,
                sector.unchanged,
                sector.turnover,
                sector.market_cap_billions
            ));
        }

        output
    }
}

impl PerformersResponse {
    fn sections(&self) -> [(&'static str, &[Mover]); 3] {
        [
            ("Gainers", self.gainers.as_slice()),
            ("Losers", self.losers.as_slice()),
            ("Volume Leaders", self.volume_leaders.as_slice()),
        ]
    }
}

impl TextReport for PerformersResponse {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{} Performers\n", self.index));
        output.push_str(&format!("Updated: {}\n", self.last_updated.format("%Y-%m-%d %H:%M:%S UTC")));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        for (title, movers) in self.sections() {
            output.push_str(&format!("\n{title}:\n"));
            output.push_str(&format!(
                "{:<10} {:<32} {:>10} {:>8} {:>14}\n",
                "Symbol", "Name", "Price", "Chg %", "Volume"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');
            if movers.is_empty() {
                output.push_str("  (none)\n");
            }
            for m in movers {
                output.push_str(&format!(
                    "{:<10} {:<32} {:>10.2} {:>8.2} {:>14}\n",
                    m.symbol,
                    truncate(m.name.as_deref().unwrap_or("-"), 32),
                    m.price,
                    m.change,
                    m.volume
                ));
            }
        }
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {} Performers\n", self.index));
        for (title, movers) in self.sections() {
            output.push_str(&format!("\n## {title}\n\n"));
            output.push_str("| Symbol | Name | Price | Change % | Volume |\n");
            output.push_str("|--------|------|------:|---------:|-------:|\n");
            for m in movers {
                output.push_str(&format!(
                    "| {} | {} | {:.2} | {:.2} | {} |\n",
                    m.symbol,
                    m.name.as_deref().unwrap_or("-"),
                    m.price,
                    m.change,
                    m.volume
                ));
            }
        }

        output
    }
}

impl TextReport for CompanyAnalyticsResponse {
    fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let company = &self.company;

        output.push_str(&format!("\n{} - {}\n", company.symbol, company.name));
        output.push_str(&format!("Sector: {}\n", company.sector));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str("\nFinancials:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  Market Cap:               {:.2}M\n",
            self.financials.market_cap
        ));
        output.push_str(&format!(
            "  Shares Outstanding:       {}\n",
            self.financials.shares_outstanding
        ));
        output.push_str(&format!(
            "  Free Float:               {} ({}%)\n",
            self.financials.free_float,
            opt(self.financials.free_float_percent, 1)
        ));

        output.push_str("\nRatios:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!("  P/E:                      {}\n", opt(self.ratios.pe, 2)));
        output.push_str(&format!(
            "  Earnings Yield:           {}%\n",
            opt(self.ratios.earnings_yield, 2)
        ));

        let perf = &self.performance;
        output.push_str("\nPerformance:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!("  Price:                    {}\n", opt(perf.price, 2)));
        output.push_str(&format!("  Change (1D):              {}%\n", opt(perf.change_1d, 2)));
        output.push_str(&format!(
            "  52-Week Range:            {} - {}\n",
            opt(perf.low_52w, 2),
            opt(perf.high_52w, 2)
        ));
        output.push_str(&format!(
            "  Range Position:           {}%\n",
            opt(perf.range_position, 1)
        ));

        if let Some(description) = &company.description {
            output.push('\n');
            output.push_str(description);
            output.push('\n');
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');

        output
    }

    fn to_markdown(&self) -> String {
        let mut output = String::new();
        let company = &self.company;
        let perf = &self.performance;

        output.push_str(&format!("# {} - {}\n\n", company.symbol, company.name));
        output.push_str(&format!("**Sector:** {}\n\n", company.sector));
        if let Some(description) = &company.description {
            output.push_str(&format!("> {description}\n\n"));
        }

        output.push_str("## Financials\n\n");
        output.push_str(&format!("- **Market Cap:** {:.2}M\n", self.financials.market_cap));
        output.push_str(&format!(
            "- **Shares Outstanding:** {}\n",
            self.financials.shares_outstanding
        ));
        output.push_str(&format!("- **Free Float:** {}\n\n", self.financials.free_float));

        output.push_str("## Ratios\n\n");
        output.push_str(&format!("- **P/E:** {}\n", opt(self.ratios.pe, 2)));
        output.push_str(&format!(
            "- **Earnings Yield:** {}%\n\n",
            opt(self.ratios.earnings_yield, 2)
        ));

        output.push_str("## Performance\n\n");
        output.push_str(&format!("- **Price:** {}\n", opt(perf.price, 2)));
        output.push_str(&format!("- **Change (1D):** {}%\n", opt(perf.change_1d, 2)));
        output.push_str(&format!(
            "- **52-Week Range:** {} - {}\n",
            opt(perf.low_52w, 2),
            opt(perf.high_52w, 2)
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use karachi_data::SectorRollup;

    fn breakdown() -> SectorBreakdownResponse {
        SectorBreakdownResponse::new(
            vec![
                SectorRollup {
                    name: "COMMERCIAL BANKS".to_string(),
                    market_cap: 834_800.5,
                    percentage: 73.54,
                    companies_count: 2,
                    avg_pe: 6.2,
                    avg_change: 0.625,
                },
                SectorRollup {
                    name: "CEMENT".to_string(),
                    market_cap: 300_440.0,
                    percentage: 26.46,
                    companies_count: 1,
                    avg_pe: 0.0,
                    avg_change: 1.52,
                },
            ],
            Utc.with_ymd_and_hms(2025, 3, 14, 10, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_breakdown_ascii_table() {
        let table = breakdown().to_ascii_table();
        assert!(table.contains("Sector Breakdown"));
        assert!(table.contains("2025-03-14 10:30:00 UTC"));
        assert!(table.contains("COMMERCIAL BANKS"));
        assert!(table.contains("73.54%"));
        assert!(table.contains("1135240.50"));
    }

    #[test]
    fn test_breakdown_markdown() {
        let md = breakdown().to_markdown();
        assert!(md.starts_with("# Sector Breakdown"));
        assert!(md.contains("| CEMENT | 300440.00 | 26.46% | 1 | 0.00 | 1.52% |"));
    }

    #[test]
    fn test_empty_breakdown() {
        let empty = SectorBreakdownResponse::empty(Utc::now());
        assert!(empty.to_ascii_table().contains("No sector data available."));
        assert!(empty.to_markdown().contains("_No sector data available._"));
    }

    #[test]
    fn test_companies_table_missing_values() {
        let response = CompaniesResponse {
            companies: vec![CompanySummary {
                symbol: "TRG".to_string(),
                name: "TRG Pakistan Limited".to_string(),
                sector: "TECHNOLOGY & COMMUNICATION".to_string(),
                market_cap: 0.0,
                price: None,
                change: None,
                pe: None,
            }],
            total: 1,
            page: 1,
            limit: 20,
        };
        let table = response.to_ascii_table();
        assert!(table.contains("page 1 of 1, 1 total"));
        assert!(table.contains("TRG"));
        assert!(response.to_markdown().contains("| - | - | - |"));
    }

    #[test]
    fn test_performers_report() {
        let mut performers =
            PerformersResponse::empty("KSE100", Utc.with_ymd_and_hms(2025, 3, 14, 10, 30, 0).unwrap());
        performers.gainers.push(Mover {
            symbol: "HBL".to_string(),
            name: Some("Habib Bank Limited".to_string()),
            sector: None,
            price: 142.5,
            change: 2.1,
            volume: 5_120_330,
        });

        let table = performers.to_ascii_table();
        assert!(table.contains("KSE100 Performers"));
        assert!(table.contains("Habib Bank Limited"));
        assert!(table.contains("5120330"));
        assert_eq!(table.matches("(none)").count(), 2);

        let markdown = performers.to_markdown();
        assert!(markdown.contains("## Volume Leaders"));
        assert!(markdown.contains("| HBL | Habib Bank Limited | 142.50 | 2.10 | 5120330 |"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd~");
    }
}
