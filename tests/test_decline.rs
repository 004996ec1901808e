//! Two-period decline comparison.

mod common;

use common::assert_close;
use sales_dashboard::models::{DeclineOutcome, Metric};
use sales_dashboard::period::PeriodPair;
use sales_dashboard::{Dimension, Selection};

#[test]
fn weight_decline_keeps_only_falling_clients() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let options = dashboard.options().unwrap();
    let view = dashboard.filter(&Selection::all(&options)).unwrap();

    let outcome = view.decline().compute(Metric::Weight).unwrap();
    let report = outcome.report().expect("even period count");
    assert_eq!(
        report.period_1,
        vec![
            PeriodPair::new("2024", "janeiro"),
            PeriodPair::new("2024", "fevereiro")
        ]
    );
    assert_eq!(report.period_2_label(), "janeiro/2025, fevereiro/2025");

    // Alfa 100 -> 40 kept; Beta 40 -> 100 and Gama 50 -> 50 excluded
    assert_eq!(report.records.len(), 1);
    let alfa = &report.records[0];
    assert_eq!(alfa.client_name, "Mercado Alfa");
    assert_eq!(alfa.state.as_deref(), Some("SP"));
    assert_close(alfa.period_1, 100.0);
    assert_close(alfa.period_2, 40.0);
    assert_close(alfa.decline, 60.0);
    assert!(outcome.warning().is_none());
}

#[test]
fn revenue_metric_sums_revenue() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let options = dashboard.options().unwrap();
    let view = dashboard.filter(&Selection::all(&options)).unwrap();

    let outcome = view.decline().compute(Metric::Revenue).unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.metric, Metric::Revenue);
    assert_eq!(report.records.len(), 1);
    assert_close(report.records[0].period_1, 1000.0);
    assert_close(report.records[0].period_2, 400.0);
    assert_close(report.total_decline(), 600.0);
}

#[test]
fn odd_period_count_gives_warning_and_no_table() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let options = dashboard.options().unwrap();
    let selection = Selection::all(&options)
        .with_values(Dimension::Year, ["2024"])
        .with_values(Dimension::Month, ["janeiro", "fevereiro", "março"]);
    let view = dashboard.filter(&selection).unwrap();

    let outcome = view.decline().compute(Metric::Weight).unwrap();
    assert_eq!(outcome, DeclineOutcome::InvalidPeriods { count: 3 });
    assert!(outcome.report().is_none());
    let warning = outcome.warning().unwrap();
    assert!(warning.contains("PAR"));
    assert!(warning.contains('3'));
}

#[test]
fn empty_month_selection_gives_distinct_warning() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let options = dashboard.options().unwrap();
    let selection = Selection::all(&options).toggle_all(Dimension::Month, false, &options);
    let view = dashboard.filter(&selection).unwrap();

    let outcome = view.decline().compute(Metric::Weight).unwrap();
    assert_eq!(outcome, DeclineOutcome::InvalidPeriods { count: 0 });
    assert!(outcome.warning().unwrap().contains("Selecione meses e anos"));
}

#[test]
fn client_missing_from_one_half_counts_as_zero() {
    let csv = format!(
        "{}\n{}\n{}\n{}\n",
        common::HEADER,
        "F,SP,C,R,1,Sumiu,P,D,01/2024,30,300,10,0",
        "F,RJ,C,R,2,Ficou,P,D,01/2024,10,100,10,0",
        "F,RJ,C,R,2,Ficou,P,D,01/2025,5,50,10,0"
    );
    let (dashboard, _tmp) = common::dashboard_from_csv(&csv);
    let options = dashboard.options().unwrap();
    let view = dashboard.filter(&Selection::all(&options)).unwrap();

    let outcome = view.decline().compute(Metric::Weight).unwrap();
    let records = &outcome.report().unwrap().records;
    let summary: Vec<(&str, f64, f64)> = records
        .iter()
        .map(|r| (r.client_name.as_str(), r.period_2, r.decline))
        .collect();
    assert_eq!(summary, vec![("Sumiu", 0.0, 30.0), ("Ficou", 5.0, 5.0)]);
}

#[test]
fn equal_declines_sort_by_client_name() {
    let csv = format!(
        "{}\n{}\n{}\n",
        common::HEADER,
        "F,SP,C,R,1,Zulu,P,D,01/2024,10,100,10,0",
        "F,SP,C,R,2,Alpha,P,D,01/2024,10,100,10,0"
    );
    let (dashboard, _tmp) = common::dashboard_from_csv(&csv);
    let options = dashboard.options().unwrap();
    // Two years, one month: 2024 vs 2025 even though 2025 has no rows
    let selection = Selection::all(&options).with_values(Dimension::Year, ["2024", "2025"]);
    let view = dashboard.filter(&selection).unwrap();

    let outcome = view.decline().compute(Metric::Weight).unwrap();
    let names: Vec<&str> = outcome
        .report()
        .unwrap()
        .records
        .iter()
        .map(|r| r.client_name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Zulu"]);
}
