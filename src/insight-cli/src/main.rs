//! Campaign Insight: consolidates campaign performance exports and
//! produces KPI summaries, statistics, and comparison reports.

use clap::Parser;
use insight_core::AppConfig;
use insight_metrics::{
    clean, consolidate, derive_kpis, normalize_columns, platform_summary, validate, CleanOptions,
};
use insight_reporting::{
    analyze_platforms, compare_platforms, performance_insights, render_statistics_report,
    write_table_csv, write_table_json, write_text_report,
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

mod ingest;

#[derive(Parser, Debug)]
#[command(name = "campaign-insight")]
#[command(about = "Consolidates campaign performance exports into KPI reports")]
#[command(version)]
struct Cli {
    /// Directory containing the CSV exports to consolidate (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHT__INPUT_DIR")]
    input_dir: Option<String>,

    /// Directory reports are written to (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHT__OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Apply the cleaning pass (drop empty columns, remove duplicate rows)
    #[arg(long, default_value_t = false)]
    clean: bool,

    /// Zero-fill missing volume cells while cleaning (implies --clean)
    #[arg(long, default_value_t = false)]
    fill_missing: bool,

    /// Also export the consolidated table as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campaign_insight=info,insight_metrics=info,insight_reporting=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();
    info!("Campaign Insight starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(input_dir) = cli.input_dir {
        config.input_dir = input_dir;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if cli.clean || cli.fill_missing {
        config.cleaning.enabled = true;
    }
    if cli.fill_missing {
        config.cleaning.fill_missing = true;
    }
    if cli.json {
        config.report.export_json = true;
    }

    info!(
        input_dir = %config.input_dir,
        output_dir = %config.output_dir,
        cleaning = config.cleaning.enabled,
        "Configuration loaded"
    );

    let sources = ingest::read_input_dir(Path::new(&config.input_dir))?;
    let tables: Vec<_> = sources.into_iter().map(|source| source.table).collect();

    let mut table = consolidate(&tables)?;
    normalize_columns(&mut table);

    let report = validate(&table);
    if report.has_issues {
        for column in &report.empty_columns {
            warn!(column = %column, "column has no values");
        }
        if report.duplicate_rows > 0 {
            warn!(rows = report.duplicate_rows, "duplicate rows detected");
        }
        for (column, stat) in &report.missing_values {
            warn!(
                column = %column,
                count = stat.count,
                percentage = stat.percentage,
                "missing values"
            );
        }
        for issue in &report.inconsistencies {
            warn!("{issue}");
        }
    }

    if config.cleaning.enabled {
        let before = table.len();
        table = clean(
            &table,
            CleanOptions {
                remove_duplicates: config.cleaning.remove_duplicates,
                fill_missing: config.cleaning.fill_missing,
            },
        );
        info!(before, after = table.len(), "applied cleaning pass");
    }

    derive_kpis(&mut table);

    let output_dir = Path::new(&config.output_dir);
    fs::create_dir_all(output_dir)?;

    let consolidated = write_table_csv(&table, &output_dir.join(&config.report.consolidated_file))?;
    info!(
        path = %consolidated.path.display(),
        rows = consolidated.rows,
        "consolidated table exported"
    );
    if config.report.export_json {
        let json_name = config.report.consolidated_file.replace(".csv", ".json");
        write_table_json(&table, &output_dir.join(json_name))?;
    }

    match platform_summary(&table) {
        Some(summary) => {
            write_table_csv(&summary, &output_dir.join(&config.report.summary_file))?;

            for insight in performance_insights(&summary) {
                info!("{insight}");
            }

            let stats = analyze_platforms(&table);
            let comparison = compare_platforms(&table);
            let rendered = render_statistics_report(&stats, comparison.as_ref());
            let report_out =
                write_text_report(&rendered, &output_dir.join(&config.report.statistics_file))?;
            info!(path = %report_out.path.display(), "statistics report exported");

            println!("{rendered}");
        }
        None => warn!("no platform column found, skipping platform reports"),
    }

    info!("Consolidation complete");
    Ok(())
}
