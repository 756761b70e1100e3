//! Text reports for screening results.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::screening::{CallPick, PutCandidate};

const TITLE_RULE: &str = "----------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Fixed-width column layout.
struct TableFormat {
    headers: &'static [&'static str],
    widths: &'static [usize],
    alignments: &'static [Align],
}

const PUT_TABLE: TableFormat = TableFormat {
    headers: &["Symbol", "Expiration", "Type", "Strike", "Contracts", "Premium", "Exercise"],
    widths: &[10, 12, 6, 10, 11, 12, 12],
    alignments: &[
        Align::Left,
        Align::Left,
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ],
};

const CALL_TABLE: TableFormat = TableFormat {
    headers: &["Expiration", "DTE", "Strike", "Bid", "Delta", "Theta", "Annual %", "If Called %"],
    widths: &[12, 6, 10, 8, 8, 8, 11, 13],
    alignments: &[
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ],
};

impl TableFormat {
    fn row(&self, cells: &[String]) -> String {
        cells
            .iter()
            .zip(self.widths.iter().zip(self.alignments))
            .map(|(cell, (&width, align))| match align {
                Align::Left => format!("{:<width$}", cell),
                Align::Right => format!("{:>width$}", cell),
            })
            .collect()
    }

    fn header(&self) -> String {
        let cells: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        self.row(&cells)
    }

    fn separator(&self) -> String {
        "-".repeat(self.widths.iter().sum())
    }
}

fn fixed(value: Decimal, dp: usize) -> String {
    format!("{:.*}", dp, value)
}

/// Report for ranked cash-secured put candidates.
pub fn format_put_report(
    funds: Decimal,
    target_date: NaiveDate,
    candidates: &[PutCandidate],
) -> String {
    let mut lines = vec![
        "Options Analysis Report".to_string(),
        TITLE_RULE.to_string(),
        format!("Available Funds: ${}", fixed(funds, 2)),
        format!("Expiration: {}", target_date),
        String::new(),
        "PUT Options:".to_string(),
        PUT_TABLE.header(),
        PUT_TABLE.separator(),
    ];

    if candidates.is_empty() {
        lines.push(format!("No PUT candidates expiring {}", target_date));
    }
    for candidate in candidates {
        lines.push(PUT_TABLE.row(&[
            candidate.contract.symbol.clone(),
            candidate.expiration.to_string(),
            candidate.contract.option_type.as_str().to_string(),
            fixed(candidate.strike, 2),
            fixed(candidate.max_contracts, 0),
            fixed(candidate.premium_income, 0),
            fixed(candidate.exercise_value, 0),
        ]));
    }

    lines.join("\n")
}

/// Report for covered call picks on one underlying.
pub fn format_call_report(symbol: &str, as_of: NaiveDate, picks: &[CallPick]) -> String {
    let mut lines = vec![
        format!("Covered Call Analysis: {}", symbol),
        TITLE_RULE.to_string(),
    ];
    if let Some(first) = picks.first() {
        lines.push(format!("Current Price: ${}", fixed(first.underlying_price, 2)));
    }
    lines.push(format!("As Of: {}", as_of));
    lines.push(String::new());
    lines.push(CALL_TABLE.header());
    lines.push(CALL_TABLE.separator());

    if picks.is_empty() {
        lines.push(format!("No covered call candidates for {}", symbol));
    }
    for pick in picks {
        lines.push(CALL_TABLE.row(&[
            pick.expiration.to_string(),
            pick.days_to_expiration.to_string(),
            fixed(pick.strike, 2),
            fixed(pick.bid, 2),
            format!("{:.3}", pick.delta),
            format!("{:.3}", pick.theta),
            fixed(pick.annualized_return_pct, 2),
            fixed(pick.return_if_called_pct, 2),
        ]));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{OptionContract, OptionType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contract(option_type: OptionType, strike: i64, bid: Decimal) -> OptionContract {
        OptionContract {
            symbol: "XYZ".to_string(),
            option_symbol: String::new(),
            underlying_price: Decimal::from(100),
            option_type,
            strike: Some(Decimal::from(strike)),
            expiration: Some(date(2025, 4, 4)),
            bid: Some(bid),
            underlying_volume: 5_000_000,
            is_standard: true,
            delta: Some(0.45),
            theta: Some(-0.021),
        }
    }

    #[test]
    fn test_put_report_rows() {
        let put = contract(OptionType::Put, 20, Decimal::new(150, 2));
        let candidate = PutCandidate::price(&put, Decimal::from(25_000))
            .unwrap()
            .unwrap();
        let report = format_put_report(Decimal::from(25_000), date(2025, 4, 4), &[candidate]);

        assert!(report.contains("Available Funds: $25000.00"));
        let row = report.lines().last().unwrap();
        assert!(row.starts_with("XYZ       2025-04-04  PUT"));
        assert!(row.contains("20.00"));
        assert!(row.ends_with("        1800       24000"));
        assert_eq!(row.len(), PUT_TABLE.widths.iter().sum::<usize>());
    }

    #[test]
    fn test_call_report_rows() {
        let call = contract(OptionType::Call, 95, Decimal::from(2));
        let pick = CallPick::price(&call, date(2025, 4, 4)).unwrap();
        let report = format_call_report("XYZ", date(2025, 4, 4), &[pick]);

        assert!(report.contains("Current Price: $100.00"));
        let row = report.lines().last().unwrap();
        assert!(row.starts_with("2025-04-04"));
        assert!(row.contains("730.00"));
        assert!(row.ends_with("-3.00"));
    }

    #[test]
    fn test_empty_reports() {
        let puts = format_put_report(Decimal::from(100), date(2025, 4, 4), &[]);
        assert!(puts.ends_with("No PUT candidates expiring 2025-04-04"));

        let calls = format_call_report("XYZ", date(2025, 4, 4), &[]);
        assert!(calls.ends_with("No covered call candidates for XYZ"));
    }
}
