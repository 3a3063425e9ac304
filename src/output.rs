//! Output formatting module for cloudspend
//!
//! This module renders usage and cost reports in two formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! Both formats keep report order: containers as they were listed, cost
//! categories as they were first seen.
//!
//! # Examples
//!
//! ```
//! use cloudspend::output::get_formatter;
//! use cloudspend::report_types::UsageReport;
//!
//! let report = UsageReport {
//!     containers: Vec::new(),
//!     total_objects: 0,
//!     total_size_bytes: 0,
//!     total_size_human: "0 B".to_string(),
//!     estimated_monthly_cost: 0.0,
//! };
//!
//! let formatter = get_formatter(true);
//! assert!(formatter.format_usage(&report).contains("\"total_size_bytes\""));
//! ```

use crate::report_types::{CategoryAmount, CostReport, CostSummary, UsageReport};
use prettytable::{Table, format, row};
use serde_json::json;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a storage usage report
    fn format_usage(&self, report: &UsageReport) -> String;

    /// Format a billing report
    fn format_cost(&self, report: &CostReport) -> String;
}

/// Table formatter for human-readable output
///
/// Object counts carry thousands separators; billing totals are shown in
/// cents and storage estimates to six decimal places.
pub struct TableFormatter;

impl TableFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let digits = n.to_string();
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result
    }

    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    fn format_estimate(amount: f64) -> String {
        format!("${amount:.6}")
    }

    fn currency_label(report: &CostReport) -> &str {
        report.currency.as_deref().unwrap_or("USD")
    }
}

impl OutputFormatter for TableFormatter {
    fn format_usage(&self, report: &UsageReport) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Bucket", b -> "Objects", b -> "Size"]);

        for usage in &report.containers {
            table.add_row(row![
                usage.name,
                r -> Self::format_number(usage.object_count),
                r -> usage.size_human
            ]);
        }

        table.add_row(row![
            b -> "TOTAL",
            br -> Self::format_number(report.total_objects),
            br -> report.total_size_human
        ]);

        let mut output = table.to_string();
        output.push_str(&format!(
            "\nEstimated monthly storage cost: {}\n",
            Self::format_estimate(report.estimated_monthly_cost)
        ));
        output
    }

    fn format_cost(&self, report: &CostReport) -> String {
        let mut output = format!(
            "Costs for {} ({} granularity)\n\n",
            report.range,
            report.granularity.to_string().to_lowercase()
        );

        match &report.summary {
            CostSummary::Total { total_cost } => {
                output.push_str(&format!(
                    "Total cost: {} {}\n",
                    Self::format_currency(*total_cost),
                    Self::currency_label(report)
                ));
            }
            CostSummary::Breakdown { by_category } => {
                if by_category.is_empty() {
                    output.push_str("No costs recorded in this period.\n");
                    return output;
                }

                let mut table = Table::new();
                table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
                table.set_titles(row![
                    b -> "Service",
                    b -> format!("Cost ({})", Self::currency_label(report))
                ]);
                for entry in by_category {
                    table.add_row(row![entry.category, r -> entry.amount]);
                }
                output.push_str(&table.to_string());
            }
        }

        output
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn category_json(amount: &CategoryAmount) -> serde_json::Value {
        match amount {
            CategoryAmount::Whole(v) => json!(v),
            CategoryAmount::Fractional(_) => json!(amount.to_string()),
            CategoryAmount::Negligible { rounded, raw } => json!({
                "rounded": rounded,
                "raw": raw,
            }),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_usage(&self, report: &UsageReport) -> String {
        let output = json!({
            "buckets": report.containers.iter().map(|c| json!({
                "name": c.name.as_str(),
                "object_count": c.object_count,
                "size_bytes": c.size_bytes,
                "size_human": c.size_human,
            })).collect::<Vec<_>>(),
            "totals": {
                "object_count": report.total_objects,
                "total_size_bytes": report.total_size_bytes,
                "total_size_human": report.total_size_human,
                "estimated_monthly_cost": report.estimated_monthly_cost,
            }
        });

        serde_json::to_string_pretty(&output).unwrap_or_default()
    }

    fn format_cost(&self, report: &CostReport) -> String {
        let mut output = json!({
            "start": report.range.start.format("%Y-%m-%d").to_string(),
            "end": report.range.end.format("%Y-%m-%d").to_string(),
            "granularity": report.granularity,
            "currency": report.currency,
        });

        match &report.summary {
            CostSummary::Total { total_cost } => {
                output["mode"] = json!("total");
                output["total_cost"] = json!(total_cost);
            }
            CostSummary::Breakdown { by_category } => {
                output["mode"] = json!("breakdown");
                output["by_category"] = json!(
                    by_category
                        .iter()
                        .map(|c| json!({
                            "category": c.category,
                            "amount": Self::category_json(&c.amount),
                        }))
                        .collect::<Vec<_>>()
                );
            }
        }

        serde_json::to_string_pretty(&output).unwrap_or_default()
    }
}

/// Get the appropriate formatter based on output preference
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::DateRange;
    use crate::report_types::{CategoryCost, ContainerUsage};
    use crate::types::{ContainerName, Granularity};
    use chrono::NaiveDate;

    fn usage_report() -> UsageReport {
        UsageReport {
            containers: vec![
                ContainerUsage {
                    name: ContainerName::new("zeta-logs"),
                    object_count: 1_234_567,
                    size_bytes: 1536,
                    size_human: "1.5 KB".to_string(),
                },
                ContainerUsage {
                    name: ContainerName::new("alpha-assets"),
                    object_count: 2,
                    size_bytes: 300,
                    size_human: "300 B".to_string(),
                },
            ],
            total_objects: 1_234_569,
            total_size_bytes: 1836,
            total_size_human: "1.79 KB".to_string(),
            estimated_monthly_cost: 0.000039,
        }
    }

    fn cost_report(summary: CostSummary) -> CostReport {
        CostReport {
            range: DateRange {
                start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            },
            granularity: Granularity::Daily,
            currency: Some("USD".to_string()),
            summary,
        }
    }

    fn breakdown_report() -> CostReport {
        cost_report(CostSummary::Breakdown {
            by_category: vec![
                CategoryCost {
                    category: "Amazon S3".to_string(),
                    amount: CategoryAmount::Fractional(12.345),
                },
                CategoryCost {
                    category: "AWS Lambda".to_string(),
                    amount: CategoryAmount::Whole(12),
                },
                CategoryCost {
                    category: "Tax".to_string(),
                    amount: CategoryAmount::Negligible {
                        rounded: 0.0,
                        raw: 0.00003,
                    },
                },
            ],
        })
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(TableFormatter::format_number(1234567), "1,234,567");
        assert_eq!(TableFormatter::format_number(999), "999");
        assert_eq!(TableFormatter::format_number(1000), "1,000");
        assert_eq!(TableFormatter::format_number(0), "0");
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(TableFormatter::format_currency(3.1), "$3.10");
        assert_eq!(TableFormatter::format_currency(0.0), "$0.00");
        assert_eq!(TableFormatter::format_estimate(0.023), "$0.023000");
    }

    #[test]
    fn test_usage_table() {
        let output = TableFormatter.format_usage(&usage_report());

        assert!(output.contains("zeta-logs"));
        assert!(output.contains("1,234,567"));
        assert!(output.contains("1.5 KB"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("1.79 KB"));
        assert!(output.contains("$0.000039"));
        assert!(output.find("zeta-logs").unwrap() < output.find("alpha-assets").unwrap());
    }

    #[test]
    fn test_usage_json_keeps_order() {
        let output = JsonFormatter.format_usage(&usage_report());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["buckets"][0]["name"], "zeta-logs");
        assert_eq!(json["buckets"][1]["name"], "alpha-assets");
        assert_eq!(json["totals"]["total_size_bytes"], 1836);
        assert_eq!(json["totals"]["estimated_monthly_cost"], 0.000039);
    }

    #[test]
    fn test_total_cost_table() {
        let report = cost_report(CostSummary::Total { total_cost: 3.1 });
        let output = TableFormatter.format_cost(&report);

        assert!(output.contains("2025-03-01 to 2025-03-31"));
        assert!(output.contains("daily granularity"));
        assert!(output.contains("Total cost: $3.10 USD"));
    }

    #[test]
    fn test_breakdown_table() {
        let output = TableFormatter.format_cost(&breakdown_report());

        assert!(output.contains("12.3450"));
        assert!(output.contains("0.0000 (raw 0.00003)"));
        assert!(output.find("Amazon S3").unwrap() < output.find("AWS Lambda").unwrap());
    }

    #[test]
    fn test_empty_breakdown_table() {
        let report = cost_report(CostSummary::Breakdown {
            by_category: Vec::new(),
        });
        let output = TableFormatter.format_cost(&report);
        assert!(output.contains("No costs recorded"));
    }

    #[test]
    fn test_breakdown_json() {
        let output = JsonFormatter.format_cost(&breakdown_report());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["mode"], "breakdown");
        assert_eq!(json["granularity"], "DAILY");
        assert_eq!(json["start"], "2025-03-01");
        assert_eq!(json["by_category"][0]["category"], "Amazon S3");
        assert_eq!(json["by_category"][0]["amount"], "12.3450");
        assert_eq!(json["by_category"][1]["amount"], 12);
        assert!(json["by_category"][1]["amount"].is_i64());
        assert_eq!(json["by_category"][2]["amount"]["rounded"], 0.0);
        assert_eq!(json["by_category"][2]["amount"]["raw"], 0.00003);
    }

    #[test]
    fn test_get_formatter() {
        let report = cost_report(CostSummary::Total { total_cost: 1.0 });
        assert!(get_formatter(true).format_cost(&report).contains("\"total_cost\""));
        assert!(get_formatter(false).format_cost(&report).contains("Total cost"));
    }
}
