//! End-to-end: raw spreadsheet bytes through ingestion and aggregation.

use labkpi_core::{aggregate_employees, monthly_table, technician_kpis};
use labkpi_ingest::{ParsedUpload, ingest_upload};
use labkpi_model::Period;

fn june() -> Period {
    Period::new("2024-06-01", "2024-06-30")
}

#[test]
fn tests_csv_to_monthly_table() {
    let csv = "\
Worksheet Date,Case #,Abn/Norm,TAT,Analyzed by\n\
2024-06-01,C1,N,8,Smith\n\
2024-06-02,C2,N,6,Smith / Doe\n\
2024-06-03,C3,N,10,Doe\n";
    let parsed = ingest_upload(csv.as_bytes(), "csv", &june()).unwrap();
    let ParsedUpload::Tests(tests) = parsed else {
        panic!("expected tests export");
    };

    let table = monthly_table(&tests, 2024, 48.0);
    let row = &table[5];
    assert_eq!(row.total, 3);
    assert_eq!(row.avg_tat, Some(8.0));
    assert_eq!(row.failures, 0);
    assert_eq!(row.abnormal_cases, 0);

    // Equal case counts fall back to name order.
    let techs = technician_kpis(&tests);
    assert_eq!(techs[0].name, "Doe");
    assert_eq!(techs[0].cases, 2);
    assert_eq!(techs[1].name, "Smith");
    assert_eq!(techs[1].cases, 2);
}

#[test]
fn productivity_csv_to_employee_summary() {
    let csv = "\
Date,Staff ID,Name,Hours\n\
2024-06-01,EMP-001,Smith,8\n\
2024-06-02,EMP-001,Smith,8\n";
    let parsed = ingest_upload(csv.as_bytes(), "csv", &june()).unwrap();
    let ParsedUpload::Productivity(records) = parsed else {
        panic!("expected productivity export");
    };

    let employees = aggregate_employees(&records, 8.0);
    assert_eq!(employees.len(), 1);
    let emp = &employees[0];
    assert_eq!(emp.staff_id, "EMP-001");
    assert_eq!(emp.total_hours, 16.0);
    assert_eq!(emp.days_worked, 2);
    assert_eq!(emp.fte_equivalents, Some(2.0));
}
