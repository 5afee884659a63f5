use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use kpi_distribution::distribution::{category_bands, density_curve, CurveConfig};
use kpi_distribution::models::{CategoryBand, CurvePoint};
use kpi_distribution::report::{format_opt, ranked, render_markdown};
use kpi_distribution::{build, loader, ComparisonReport};

mod logging;

#[derive(Parser)]
#[command(name = "kpi-distribution")]
#[command(about = "KPI score distribution and supervisor comparison for a workforce roster", long_about = None)]
struct Cli {
    /// Roster CSV with NIPP_Pekerja, NIPP_Atasan and Skor_KPI_Final columns
    #[arg(long, env = "KPI_ROSTER_CSV", global = true)]
    csv: Option<PathBuf>,
    /// Log filter, overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print corporate statistics, category shares and top/bottom workers
    Summary {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write the full analysis, including density curves, as JSON
    Export {
        #[arg(long, default_value = "report.json")]
        out: PathBuf,
        #[arg(long, default_value_t = 1000)]
        curve_points: usize,
        #[arg(long, default_value_t = 4.0)]
        span_sd: f64,
    },
    /// List supervisor groups and their local distributions
    Groups,
}

#[derive(Serialize)]
struct GroupCurve<'a> {
    supervisor_id: &'a str,
    curve: Vec<CurvePoint>,
}

#[derive(Serialize)]
struct Export<'a> {
    report: &'a ComparisonReport,
    corporate_curve: Option<Vec<CurvePoint>>,
    corporate_bands: Option<Vec<CategoryBand>>,
    group_curves: Vec<GroupCurve<'a>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    let csv = cli
        .csv
        .context("roster path must be given with --csv or KPI_ROSTER_CSV")?;
    let roster = loader::load_roster(&csv)
        .with_context(|| format!("failed to load roster from {}", csv.display()))?;
    let report = build(&roster);

    match cli.command {
        Commands::Summary { limit } => {
            let stats = &report.corporate;
            println!("Corporate KPI distribution ({} workers):", stats.count);
            println!("- mean {:.2}", stats.mean);
            println!("- std {}", format_opt(stats.std));
            println!("- skewness {}", format_opt(stats.skewness));

            println!("Category shares:");
            for share in report.breakdown.iter() {
                println!(
                    "- {}: {:.2}% ({} workers)",
                    share.label, share.percent, share.count
                );
            }

            let ranking = ranked(&report.records);
            println!("Top workers by score:");
            for record in ranking.iter().take(limit) {
                println!(
                    "- {} ({}) score {:.2}, {}% vs corporate",
                    record.id,
                    record.name.as_deref().unwrap_or("-"),
                    record.score,
                    format_opt(record.gap_vs_corporate_pct)
                );
            }
            println!("Bottom workers by score:");
            for record in ranking.iter().rev().take(limit) {
                println!(
                    "- {} ({}) score {:.2}, {}% vs corporate",
                    record.id,
                    record.name.as_deref().unwrap_or("-"),
                    record.score,
                    format_opt(record.gap_vs_corporate_pct)
                );
            }
        }
        Commands::Report { out } => {
            let markdown = render_markdown(&report, Utc::now().date_naive());
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            out,
            curve_points,
            span_sd,
        } => {
            let config = CurveConfig {
                points: curve_points,
                span_sd,
            };
            let group_curves = report
                .groups
                .iter()
                .filter_map(|group| {
                    density_curve(&group.stats, &config).map(|curve| GroupCurve {
                        supervisor_id: &group.supervisor_id,
                        curve,
                    })
                })
                .collect();
            let export = Export {
                report: &report,
                corporate_curve: density_curve(&report.corporate, &config),
                corporate_bands: category_bands(&report.corporate, &config),
                group_curves,
            };
            let json = serde_json::to_string_pretty(&export)?;
            std::fs::write(&out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Analysis exported to {}.", out.display());
        }
        Commands::Groups => {
            if report.groups.is_empty() {
                println!("No supervisor groups found in roster.");
                return Ok(());
            }
            for group in report.groups.iter() {
                println!(
                    "- {} ({}): {} subordinates, mean {:.2}, std {}",
                    group.supervisor_id,
                    group.supervisor_name.as_deref().unwrap_or("-"),
                    group.stats.count,
                    group.stats.mean,
                    format_opt(group.stats.std)
                );
            }
        }
    }

    Ok(())
}
