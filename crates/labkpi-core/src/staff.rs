//! Per-person attribution tables: technicians, reviewers, QC performers.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;

use labkpi_ingest::coerce::parse_datetime_text;
use labkpi_ingest::names::{extract_names, is_likely_person_name};
use labkpi_model::{PersonCases, TechnicianKpi, TestRecord};

use crate::case::case_key;

#[derive(Default)]
struct TechAggregate {
    cases: HashSet<String>,
    abnormal: HashSet<String>,
    failures: HashSet<String>,
    tat_by_case: HashMap<String, (f64, usize)>,
}

/// Per-technician KPIs across all uploaded tests, period-independent.
///
/// Multi-attribution: a case analyzed by two technicians counts once
/// toward each. Average TAT is the mean of per-case means, so a case with
/// many rows does not outweigh a case with one.
pub fn technician_kpis(tests: &[TestRecord]) -> Vec<TechnicianKpi> {
    let mut by_tech: BTreeMap<String, TechAggregate> = BTreeMap::new();

    for (idx, record) in tests.iter().enumerate() {
        if !record.is_cyto() {
            continue;
        }
        let techs = attributed_names(record.analyzed_techs.as_deref(), record.analyzed_by.as_deref());
        if techs.is_empty() {
            continue;
        }
        let key = case_key(record, idx);
        let abn = record.abn_norm.map(|c| c.to_ascii_uppercase());
        let row_tat = record.positive_tat().or_else(|| derived_tat_hours(record));

        for tech in techs {
            let agg = by_tech.entry(tech).or_default();
            agg.cases.insert(key.clone());
            if abn == Some('A') {
                agg.abnormal.insert(key.clone());
            }
            if abn == Some('F') {
                agg.failures.insert(key.clone());
            }
            if let Some(tat) = row_tat {
                let entry = agg.tat_by_case.entry(key.clone()).or_insert((0.0, 0));
                entry.0 += tat;
                entry.1 += 1;
            }
        }
    }

    let mut rows: Vec<TechnicianKpi> = by_tech
        .into_iter()
        .map(|(name, agg)| {
            let cases = agg.cases.len();
            let abnormal = agg.abnormal.len();
            let failures = agg.failures.len();
            let mut sum_of_means = 0.0;
            let mut tat_cases = 0usize;
            for (sum, n) in agg.tat_by_case.values() {
                if *n > 0 {
                    sum_of_means += sum / *n as f64;
                    tat_cases += 1;
                }
            }
            TechnicianKpi {
                name,
                cases,
                abnormal,
                failures,
                abn_pct: (cases > 0).then(|| abnormal as f64 * 100.0 / cases as f64),
                fail_pct: (cases > 0).then(|| failures as f64 * 100.0 / cases as f64),
                avg_tat: (tat_cases > 0).then(|| sum_of_means / tat_cases as f64),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.cases.cmp(&a.cases).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Unique-case counts per reviewer. Only rows with a real case number
/// participate, and names must pass the person-plausibility filter.
pub fn reviewer_counts(tests: &[TestRecord]) -> Vec<PersonCases> {
    person_case_counts(tests, |record| {
        (record.reviewers.as_deref(), record.reviewed_by.as_deref())
    })
}

/// Unique-case counts per QC performer, same rules as reviewers.
pub fn qc_counts(tests: &[TestRecord]) -> Vec<PersonCases> {
    person_case_counts(tests, |record| {
        (record.qc_people.as_deref(), record.qc_by.as_deref())
    })
}

fn person_case_counts<'a, F>(tests: &'a [TestRecord], select: F) -> Vec<PersonCases>
where
    F: Fn(&'a TestRecord) -> (Option<&'a [String]>, Option<&'a str>),
{
    let mut by_person: BTreeMap<String, HashSet<&str>> = BTreeMap::new();
    for record in tests {
        if !record.is_cyto() {
            continue;
        }
        let Some(case_no) = record.case_no.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        let (pre_extracted, raw) = select(record);
        let names: Vec<String> = attributed_names(pre_extracted, raw)
            .into_iter()
            .filter(|n| is_likely_person_name(n))
            .collect();
        for name in names {
            by_person.entry(name).or_default().insert(case_no);
        }
    }
    let mut rows: Vec<PersonCases> = by_person
        .into_iter()
        .map(|(name, cases)| PersonCases {
            name,
            cases: cases.len(),
        })
        .collect();
    rows.sort_by(|a, b| b.cases.cmp(&a.cases).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// The pre-extracted name list when the record carries one, else a fresh
/// extraction from the raw cell text.
fn attributed_names(pre_extracted: Option<&[String]>, raw: Option<&str>) -> Vec<String> {
    match pre_extracted {
        Some(names) => names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect(),
        None => raw.map(extract_names).unwrap_or_default(),
    }
}

/// Fallback TAT from the lifecycle timestamps when the TAT column is
/// absent: resulted minus received, in hours, never negative.
fn derived_tat_hours(record: &TestRecord) -> Option<f64> {
    let start: NaiveDateTime = parse_datetime_text(record.received_at.as_deref()?)?;
    let end: NaiveDateTime = parse_datetime_text(record.resulted_at.as_deref()?)?;
    if end < start {
        return None;
    }
    let hours = (end - start).num_seconds() as f64 / 3600.0;
    (hours > 0.0).then_some(hours)
}
