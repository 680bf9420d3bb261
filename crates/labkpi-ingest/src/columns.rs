//! Declarative column detection for the two export shapes.
//!
//! Detection runs once over the normalized header row and returns an
//! immutable index mapping; the row mappers never probe headers again.

use labkpi_model::{KpiError, Result};

use crate::grid::Cell;
use crate::header::{find_index_containing, guess_date_index, index_of_header};

/// Column indexes for a tests/case export. `None` means the column is
/// absent from this file.
#[derive(Debug, Clone, Default)]
pub struct TestColumns {
    pub triage: Option<usize>,
    pub one_case: Option<usize>,
    /// Date-time column implied adjacent to the "1-case" flag.
    pub one_case_datetime: Option<usize>,
    pub reviewed_by: Option<usize>,
    pub reviewed_datetime: Option<usize>,
    /// Strict "Analyzed by" match, used for the adjacent date-time column.
    pub analyzed_by: Option<usize>,
    /// Strict match, else any header containing "analy".
    pub analyzed_any: Option<usize>,
    pub analyzed_datetime: Option<usize>,
    pub qc_by: Option<usize>,
    pub case_no: Option<usize>,
    pub abn_norm: Option<usize>,
    pub tat: Option<usize>,
    pub priority: Option<usize>,
    pub work_date: Option<usize>,
}

impl TestColumns {
    pub fn locate(headers: &[String]) -> Self {
        let triage = find_index_containing(
            headers,
            &[
                "triage date/time (job creation)",
                "triage",
                "job creation",
                "date/time",
                "datetime",
            ],
        );
        let one_case = find_index_containing(headers, &["1-case", "1case"]);
        let reviewed_by = find_index_containing(headers, &["reviewed by", "reviewedby"]);
        let analyzed_by = find_index_containing(headers, &["analyzed by", "analyzedby"]);
        let analyzed_loose = headers
            .iter()
            .position(|h| h.contains("analy"));
        let qc_by = find_index_containing(
            headers,
            &["do qc", "qc by", "quality control", "doqc", "qcby", "qualitycontrol", "qc"],
        );

        let case_variants: &[&str] =
            &["case", "case#", "caseno", "case number", "casenumber", "caseid"];
        let case_no = index_of_header(headers, case_variants)
            .or_else(|| find_index_containing(headers, case_variants));

        Self {
            triage,
            one_case,
            one_case_datetime: one_case.map(|i| i + 1),
            reviewed_by,
            reviewed_datetime: reviewed_by.map(|i| i + 1),
            analyzed_by,
            analyzed_any: analyzed_by.or(analyzed_loose),
            analyzed_datetime: analyzed_by.map(|i| i + 1),
            qc_by,
            case_no,
            abn_norm: index_of_header(headers, &["abn/norm", "abnnorm", "abn_norm"]),
            tat: index_of_header(headers, &["tat"]),
            priority: index_of_header(headers, &["prty", "priority", "prio"]),
            work_date: index_of_header(
                headers,
                &["worksheetdate", "workdate", "date", "workday", "day", "worksheet date"],
            ),
        }
    }

    /// Classification heuristic: any case-lifecycle column, or any of the
    /// core karyotyping columns, marks the file as a tests export.
    pub fn looks_like_tests(&self) -> bool {
        self.triage.is_some()
            || self.one_case_datetime.is_some()
            || self.reviewed_datetime.is_some()
            || self.analyzed_datetime.is_some()
            || self.analyzed_any.is_some()
            || self.case_no.is_some()
            || self.abn_norm.is_some()
            || self.tat.is_some()
    }
}

/// Column indexes for a staff productivity export. The date column is
/// mandatory; everything else degrades to absent fields.
#[derive(Debug, Clone)]
pub struct ProductivityColumns {
    pub date: usize,
    pub staff_id: Option<usize>,
    pub staff_name: Option<usize>,
    pub remote: Option<usize>,
    pub in_lab: Option<usize>,
    pub hours: Option<usize>,
}

impl ProductivityColumns {
    /// Layered lookup: exact variants, then substring tokens, then (for
    /// the hours column) a generic scan for hour-like headers that are not
    /// the remote/in-lab split, and (for the date column) a content-based
    /// guess over sampled rows.
    pub fn locate(headers: &[String], rows: &[Vec<Cell>]) -> Result<Self> {
        let date = index_of_header(
            headers,
            &[
                "date",
                "workdate",
                "dateworked",
                "workday",
                "day",
                "receiveddate",
                "collecteddate",
                "resulteddate",
                "signedoutdate",
                "dos",
                "servicedate",
                "worksheetdate",
            ],
        )
        .or_else(|| guess_date_index(rows))
        .ok_or_else(|| KpiError::MissingDateColumn {
            available: available_headers(headers),
        })?;

        let staff_id = index_of_header(headers, &["staff_id", "staffid", "employeeid", "id"])
            .or_else(|| {
                find_index_containing(
                    headers,
                    &["staffid", "employeeid", "empid", "badgeid", "userid"],
                )
            });
        let staff_name =
            index_of_header(headers, &["staff_name", "name", "employee", "employee_name"])
                .or_else(|| {
                    find_index_containing(
                        headers,
                        &[
                            "staffname",
                            "staff",
                            "employee",
                            "employeename",
                            "fullname",
                            "name",
                            "tech",
                            "technologist",
                            "initials",
                            "operator",
                            "user",
                        ],
                    )
                });
        let remote = index_of_header(headers, &["remote_hours", "remote"]).or_else(|| {
            find_index_containing(headers, &["remotehours", "remotehrs", "remoteh", "remote"])
        });
        let in_lab = index_of_header(headers, &["in_lab_hours", "inlab", "labhours"]).or_else(
            || {
                find_index_containing(
                    headers,
                    &["inlabhours", "inlab", "onsitehours", "onsite", "labhours"],
                )
            },
        );

        let mut hours = index_of_header(headers, &["hours_worked", "hours", "totalhours"])
            .or_else(|| {
                find_index_containing(
                    headers,
                    &[
                        "hoursworked",
                        "totalhours",
                        "workedhours",
                        "hrs",
                        "hr",
                        "duration",
                        "timeworked",
                        "worktime",
                        "totaltime",
                        "totalh",
                        "workedtime",
                    ],
                )
            });
        if hours.is_some() && (hours == remote || hours == in_lab) {
            hours = None;
        }
        if hours.is_none() {
            hours = headers.iter().position(|h| {
                if h.is_empty() {
                    return false;
                }
                let is_hours = h.contains("hour")
                    || h.ends_with("hrs")
                    || h.ends_with("hr")
                    || h.contains("duration")
                    || h.contains("time");
                let is_remote = h.contains("remote");
                let is_in_lab = h.contains("inlab") || h.contains("onsite") || h.contains("lab");
                is_hours && !is_remote && !is_in_lab
            });
        }

        Ok(Self {
            date,
            staff_id,
            staff_name,
            remote,
            in_lab,
            hours,
        })
    }
}

fn available_headers(headers: &[String]) -> String {
    let listed: Vec<&str> = headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(String::as_str)
        .collect();
    if listed.is_empty() {
        "(none)".to_string()
    } else {
        listed.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::normalize_header;

    fn normalized(headers: &[&str]) -> Vec<String> {
        headers.iter().map(|h| normalize_header(h)).collect()
    }

    #[test]
    fn tests_export_detected_by_lifecycle_columns() {
        let headers = normalized(&[
            "Worksheet Date",
            "Triage Date/Time (Job Creation)",
            "Case #",
            "Abn/Norm",
            "TAT",
            "Analyzed by",
            "",
            "Reviewed by",
        ]);
        let cols = TestColumns::locate(&headers);
        assert!(cols.looks_like_tests());
        assert_eq!(cols.triage, Some(1));
        assert_eq!(cols.case_no, Some(2));
        assert_eq!(cols.abn_norm, Some(3));
        assert_eq!(cols.tat, Some(4));
        assert_eq!(cols.analyzed_by, Some(5));
        assert_eq!(cols.analyzed_datetime, Some(6));
        assert_eq!(cols.reviewed_by, Some(7));
        assert_eq!(cols.reviewed_datetime, Some(8));
        assert_eq!(cols.work_date, Some(0));
    }

    #[test]
    fn loose_analyzed_match_counts_as_tests() {
        let headers = normalized(&["Date", "Analysis performed", "Result"]);
        let cols = TestColumns::locate(&headers);
        assert_eq!(cols.analyzed_by, None);
        assert_eq!(cols.analyzed_any, Some(1));
        assert!(cols.looks_like_tests());
    }

    #[test]
    fn productivity_export_is_not_tests() {
        let headers = normalized(&["Date", "Staff Name", "Remote Hours", "In Lab Hours"]);
        assert!(!TestColumns::locate(&headers).looks_like_tests());
    }

    #[test]
    fn productivity_columns_with_layered_fallback() {
        let headers = normalized(&["Work Day", "Employee", "Remote", "On-site", "Time worked"]);
        let cols = ProductivityColumns::locate(&headers, &[]).unwrap();
        assert_eq!(cols.date, 0);
        assert_eq!(cols.staff_name, Some(1));
        assert_eq!(cols.remote, Some(2));
        assert_eq!(cols.in_lab, Some(3));
        assert_eq!(cols.hours, Some(4));
    }

    #[test]
    fn generic_hour_scan_skips_remote_and_in_lab() {
        let headers = normalized(&["Date", "Name", "Remote hrs", "Lab hrs", "Shift duration"]);
        let cols = ProductivityColumns::locate(&headers, &[]).unwrap();
        assert_eq!(cols.remote, Some(2));
        assert_eq!(cols.hours, Some(4));
    }

    #[test]
    fn missing_date_column_reports_available_headers() {
        let headers = normalized(&["Staff Name", "Hours"]);
        let err = ProductivityColumns::locate(&headers, &[]).unwrap_err();
        assert!(err.to_string().contains("staffname, hours"));
    }
}
