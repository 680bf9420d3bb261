//! Terminal rendering of the derived KPI tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use labkpi_model::{
    DailyKpiRow, EmployeeSummary, KpiStatus, MonthlyKpiRow, PeriodMetrics, PersonCases,
    TechnicianKpi,
};

pub fn print_monthly(rows: &[MonthlyKpiRow]) {
    let mut table = new_table(&[
        "Month", "Total", "YoY %", "MoM %", "Abn", "Abn %", "Fail", "STAT", "Avg TAT",
        "STAT TAT", "> Std %",
    ]);
    for i in 1..11 {
        align_column(&mut table, i, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.month_name),
            Cell::new(row.total),
            Cell::new(fmt_pct(row.yoy)),
            Cell::new(fmt_pct(row.mom)),
            Cell::new(row.abnormal_cases),
            Cell::new(fmt_pct(row.percent_abnormal)),
            Cell::new(row.failures),
            Cell::new(row.stat_cases),
            Cell::new(fmt_hours(row.avg_tat)),
            Cell::new(fmt_hours(row.stat_avg_tat)),
            Cell::new(fmt_pct(row.tat_over_std_pct)),
        ]);
    }
    println!("{table}");
}

pub fn print_daily(rows: &[DailyKpiRow]) {
    let mut table = new_table(&[
        "Date", "Total", "Abn", "Fail", "STAT", "Avg TAT", "STAT TAT", "> Std %",
    ]);
    for i in 1..8 {
        align_column(&mut table, i, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.date),
            Cell::new(row.total),
            Cell::new(row.abnormal_cases),
            Cell::new(row.failures),
            Cell::new(row.stat_cases),
            Cell::new(fmt_hours(row.avg_tat)),
            Cell::new(fmt_hours(row.stat_avg_tat)),
            Cell::new(fmt_pct(row.tat_over_std_pct)),
        ]);
    }
    println!("{table}");
}

pub fn print_technicians(rows: &[TechnicianKpi]) {
    let mut table = new_table(&[
        "Technician", "Cases", "Abn", "Fail", "Abn %", "Fail %", "Avg TAT",
    ]);
    for i in 1..7 {
        align_column(&mut table, i, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(row.cases),
            Cell::new(row.abnormal),
            Cell::new(row.failures),
            Cell::new(fmt_pct(row.abn_pct)),
            Cell::new(fmt_pct(row.fail_pct)),
            Cell::new(fmt_hours(row.avg_tat)),
        ]);
    }
    println!("{table}");
}

pub fn print_person_cases(title: &str, rows: &[PersonCases]) {
    let mut table = new_table(&[title, "Cases"]);
    align_column(&mut table, 1, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![Cell::new(&row.name), Cell::new(row.cases)]);
    }
    println!("{table}");
}

pub fn print_employees(rows: &[EmployeeSummary]) {
    let mut table = new_table(&[
        "Staff", "Name", "Days", "Hours", "FTE", "Remote", "In lab", "Remote %",
    ]);
    for i in 2..8 {
        align_column(&mut table, i, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.staff_id),
            Cell::new(&row.staff_name),
            Cell::new(row.days_worked),
            Cell::new(format!("{:.2}", row.total_hours)),
            Cell::new(fmt_opt(row.fte_equivalents)),
            Cell::new(format!("{:.2}", row.remote_hours)),
            Cell::new(format!("{:.2}", row.in_lab_hours)),
            Cell::new(fmt_pct(row.remote_pct)),
        ]);
    }
    println!("{table}");
}

pub fn print_metrics(metrics: &PeriodMetrics) {
    println!(
        "Period: {} .. {}",
        metrics.period.start_date, metrics.period.end_date
    );
    let mut table = new_table(&["Metric", "Value", "Status"]);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Cytogenetics volume"),
        Cell::new(metrics.cytogenetics_total_volume.total),
        status_cell(metrics.cytogenetics_total_volume.status),
    ]);
    table.add_row(vec![
        Cell::new("Total volume"),
        Cell::new(metrics.total_volume),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new(format!("Avg TAT (n={})", metrics.tat.count)),
        Cell::new(fmt_hours(metrics.tat.avg_hours)),
        status_cell(metrics.tat.status),
    ]);
    table.add_row(vec![
        Cell::new("TAT min / max"),
        Cell::new(format!(
            "{} / {}",
            fmt_hours(metrics.tat.min_hours),
            fmt_hours(metrics.tat.max_hours)
        )),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("MoM / YoY"),
        Cell::new(format!(
            "{} / {}",
            fmt_pct(metrics.percent_change.mom),
            fmt_pct(metrics.percent_change.yoy)
        )),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Tests per FTE"),
        Cell::new(fmt_opt(metrics.tests_per_fte.value)),
        Cell::new(""),
    ]);
    println!("{table}");
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(status: KpiStatus) -> Cell {
    match status {
        KpiStatus::Ok => Cell::new("ok").fg(Color::Green),
        KpiStatus::Warning => Cell::new("warning").fg(Color::Yellow),
        KpiStatus::Critical => Cell::new("critical").fg(Color::Red),
        KpiStatus::Unknown => Cell::new("n/a").fg(Color::DarkGrey),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// "n/a" keeps empty-sample rates distinct from true zeros.
fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"))
}

fn fmt_hours(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1} h"))
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}
