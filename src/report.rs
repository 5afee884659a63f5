use std::fmt::Write;

use chrono::NaiveDate;

use crate::distribution::{category_bands, CurveConfig};
use crate::models::{CategoryMembers, ComparisonRecord, ComparisonReport, DistributionStats};

pub fn format_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

fn text(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Workers sorted by score, highest first. Ties keep roster order.
pub fn ranked(records: &[ComparisonRecord]) -> Vec<&ComparisonRecord> {
    let mut sorted: Vec<&ComparisonRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

fn write_stats(output: &mut String, stats: &DistributionStats) {
    let _ = writeln!(output, "- Workers: {}", stats.count);
    let _ = writeln!(output, "- Mean: {:.2}", stats.mean);
    let _ = writeln!(output, "- Standard deviation: {}", format_opt(stats.std));
    let _ = writeln!(output, "- Skewness: {}", format_opt(stats.skewness));
}

fn write_members(output: &mut String, members: &[CategoryMembers]) {
    for list in members {
        let names: Vec<String> = list
            .members
            .iter()
            .map(|member| match member.position.as_deref() {
                Some(position) => format!("{} ({})", member.id, position),
                None => member.id.clone(),
            })
            .collect();
        let joined = if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        };
        let _ = writeln!(output, "- {}: {}", list.label, joined);
    }
}

pub fn render_markdown(report: &ComparisonReport, generated_on: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# KPI Score Distribution Report");
    let _ = writeln!(output, "Generated on {}", generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Corporate Distribution");
    write_stats(&mut output, &report.corporate);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Supervisor vs Subordinate vs Corporate");

    if report.records.is_empty() {
        let _ = writeln!(output, "No workers in roster.");
    } else {
        let _ = writeln!(
            output,
            "| ID | Name | Position | Supervisor | Score | Supervisor Score | Gap vs Supervisor (%) | Gap vs Corporate (%) | Category |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|");
        for record in report.records.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {:.2} | {} | {} | {} | {} |",
                record.id,
                text(record.name.as_deref()),
                text(record.position.as_deref()),
                text(record.supervisor_id.as_deref()),
                record.score,
                format_opt(record.supervisor_score),
                format_opt(record.gap_vs_supervisor_pct),
                format_opt(record.gap_vs_corporate_pct),
                record.category.map(|c| c.as_str()).unwrap_or("-"),
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Breakdown");
    let _ = writeln!(output, "| Category | Workers | Share (%) |");
    let _ = writeln!(output, "|---|---|---|");
    for share in report.breakdown.iter() {
        let _ = writeln!(
            output,
            "| {} | {} | {:.2} |",
            share.label, share.count, share.percent
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Bands");
    match category_bands(&report.corporate, &CurveConfig::default()) {
        Some(bands) => {
            for band in bands {
                let _ = writeln!(
                    output,
                    "- {} ({}): {:.2} to {:.2}",
                    band.label,
                    band.label.english(),
                    band.lower,
                    band.upper
                );
            }
        }
        None => {
            let _ = writeln!(output, "Distribution is degenerate; no bands.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Category Members");
    write_members(&mut output, &report.members);

    for group in report.groups.iter() {
        let _ = writeln!(output);
        match group.supervisor_name.as_deref() {
            Some(name) => {
                let _ = writeln!(output, "## Team of {} ({})", group.supervisor_id, name);
            }
            None => {
                let _ = writeln!(output, "## Team of {}", group.supervisor_id);
            }
        }
        write_stats(&mut output, &group.stats);
        match group.members.as_deref() {
            Some(members) => write_members(&mut output, members),
            None => {
                let _ = writeln!(
                    output,
                    "Too few or identical scores for a local distribution."
                );
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::build;
    use crate::models::Worker;

    fn sample() -> ComparisonReport {
        build(&[
            Worker::new("1", 100.0).with_name("Ayu"),
            Worker::new("2", 95.0).with_supervisor("1"),
            Worker::new("3", 105.0).with_supervisor("1").with_position("Engineer"),
            Worker::new("4", 98.0).with_supervisor("3"),
        ])
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn renders_corporate_section() {
        let output = render_markdown(&sample(), date());
        assert!(output.contains("Generated on 2026-03-02"));
        assert!(output.contains("- Workers: 4"));
        assert!(output.contains("- Mean: 99.50"));
    }

    #[test]
    fn renders_absent_gaps_as_dash() {
        let output = render_markdown(&sample(), date());
        assert!(output.contains("| 1 | Ayu | - | - | 100.00 | - | - | 0.50 |"));
        assert!(output.contains("| 2 | - | - | 1 | 95.00 | 100.00 | -5.00 |"));
    }

    #[test]
    fn renders_group_sections() {
        let output = render_markdown(&sample(), date());
        assert!(output.contains("## Team of 1 (Ayu)"));
        assert!(output.contains("## Team of 3\n"));
        assert!(output.contains("Too few or identical scores"));
        assert!(output.contains("Engineer"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let report = sample();
        assert_eq!(render_markdown(&report, date()), render_markdown(&report, date()));
    }

    #[test]
    fn ranking_is_descending() {
        let report = sample();
        let ids: Vec<_> = ranked(&report.records).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "4", "2"]);
    }

    #[test]
    fn formats_missing_values() {
        assert_eq!(format_opt(None), "-");
        assert_eq!(format_opt(Some(-5.0)), "-5.00");
    }
}
