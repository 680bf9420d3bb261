//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use labkpi_cli::config::load_config;
use labkpi_cli::export;
use labkpi_core::{
    aggregate_employees, compute_period_metrics, daily_table, monthly_table, qc_counts,
    reviewer_counts, technician_kpis,
};
use labkpi_ingest::{ParsedUpload, ingest_upload};
use labkpi_model::Period;

use crate::cli::{ConfigArgs, ReportArgs};
use crate::summary;

pub fn run_report(args: &ReportArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let period = Period::new(args.start_date.clone(), args.end_date.clone());
    period.validate()?;

    let bytes = fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let extension = args
        .file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let parsed = ingest_upload(&bytes, &extension, &period)?;
    if let Some(path) = &args.records_json {
        write_records_json(path, &parsed)?;
    }

    match &parsed {
        ParsedUpload::Tests(tests) => {
            let year = period
                .start_year()
                .context("period start date has no year")?;
            let monthly = monthly_table(tests, year, config.tat_standard_hours);
            let technicians = technician_kpis(tests);
            let reviewers = reviewer_counts(tests);
            let qc = qc_counts(tests);

            println!("Tests export: {} records", tests.len());
            summary::print_monthly(&monthly);
            if !technicians.is_empty() {
                summary::print_technicians(&technicians);
            }
            if !reviewers.is_empty() {
                summary::print_person_cases("Reviewer", &reviewers);
            }
            if !qc.is_empty() {
                summary::print_person_cases("QC", &qc);
            }
            let daily = args
                .daily
                .then(|| daily_table(tests, &period, config.tat_standard_hours));
            if let Some(daily) = &daily {
                summary::print_daily(daily);
            }
            let metrics = args
                .metrics
                .then(|| compute_period_metrics(&config, &period, tests, &[]))
                .transpose()?;
            if let Some(metrics) = &metrics {
                summary::print_metrics(metrics);
            }

            if let Some(dir) = &args.export_dir {
                fs::create_dir_all(dir)?;
                export::write_monthly_csv(&dir.join("monthly.csv"), &monthly)?;
                export::write_technicians_csv(&dir.join("technicians.csv"), &technicians)?;
                export::write_person_cases_csv(&dir.join("reviewers.csv"), &reviewers)?;
                export::write_person_cases_csv(&dir.join("qc.csv"), &qc)?;
                if let Some(daily) = &daily {
                    export::write_daily_csv(&dir.join("daily.csv"), daily)?;
                }
                if let Some(metrics) = &metrics {
                    export::write_metrics_csv(&dir.join("metrics.csv"), metrics)?;
                }
                println!("Exported tables to {}", dir.display());
            }
        }
        ParsedUpload::Productivity(records) => {
            let employees = aggregate_employees(records, config.hours_per_fte_day);
            println!(
                "Productivity export: {} records in period {} .. {}",
                records.len(),
                period.start_date,
                period.end_date
            );
            summary::print_employees(&employees);
            let metrics = args
                .metrics
                .then(|| compute_period_metrics(&config, &period, &[], records))
                .transpose()?;
            if let Some(metrics) = &metrics {
                summary::print_metrics(metrics);
            }

            if let Some(dir) = &args.export_dir {
                fs::create_dir_all(dir)?;
                export::write_employees_csv(&dir.join("employees.csv"), &employees)?;
                if let Some(metrics) = &metrics {
                    export::write_metrics_csv(&dir.join("metrics.csv"), metrics)?;
                }
                println!("Exported tables to {}", dir.display());
            }
        }
    }
    Ok(())
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Canonical records as JSON, the same shape the ingest produced, so they
/// can be hand-edited and re-fed.
fn write_records_json(path: &Path, parsed: &ParsedUpload) -> Result<()> {
    let json = match parsed {
        ParsedUpload::Tests(tests) => serde_json::to_string_pretty(tests)?,
        ParsedUpload::Productivity(records) => serde_json::to_string_pretty(records)?,
    };
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
