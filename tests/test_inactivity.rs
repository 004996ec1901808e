//! Inactive-client detection relative to a reference date.

mod common;

use chrono::NaiveDate;
use sales_dashboard::{Dimension, Selection};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn everyone_is_inactive_after_their_last_month() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let options = dashboard.options().unwrap();
    let view = dashboard.filter(&Selection::all(&options)).unwrap();

    let report = view.inactivity().as_of(date(2025, 3, 15)).unwrap();
    assert_eq!(report.cutoff, date(2025, 3, 1));
    // Same last date: representative ascending, then client name
    let names: Vec<&str> = report.clients.iter().map(|c| c.client_name.as_str()).collect();
    assert_eq!(names, vec!["Empório Gama", "Mercado Alfa", "Padaria Beta"]);
    assert_eq!(report.clients[0].last_purchase_label(), "fev/2025");
}

#[test]
fn purchase_on_first_day_of_current_month_is_active() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let options = dashboard.options().unwrap();
    let view = dashboard.filter(&Selection::all(&options)).unwrap();

    let report = view.inactivity().as_of(date(2025, 2, 10)).unwrap();
    assert!(report.is_empty());
}

#[test]
fn last_purchase_is_computed_within_the_filter() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let options = dashboard.options().unwrap();
    let selection = Selection::all(&options).with_values(Dimension::Year, ["2024"]);
    let view = dashboard.filter(&selection).unwrap();

    let report = view.inactivity().as_of(date(2024, 2, 15)).unwrap();
    assert_eq!(report.clients.len(), 1);
    let beta = &report.clients[0];
    assert_eq!(beta.client_name, "Padaria Beta");
    assert_eq!(beta.representative, "Bruno");
    assert_eq!(beta.state, "RJ");
    assert_eq!(beta.last_purchase, date(2024, 1, 1));
    assert_eq!(beta.last_purchase_label(), "jan/2024");
}

#[test]
fn newest_last_purchase_comes_first() {
    let csv = format!(
        "{}\n{}\n{}\n{}\n",
        common::HEADER,
        "F,SP,C,Rui,1,Antigo,P,D,03/2023,1,10,10,0",
        "F,SP,C,Rui,2,Recente,P,D,06/2023,1,10,10,0",
        "F,RJ,C,Ana,3,Medio,P,D,03/2023,1,10,10,0"
    );
    let (dashboard, _tmp) = common::dashboard_from_csv(&csv);
    let options = dashboard.options().unwrap();
    let view = dashboard.filter(&Selection::all(&options)).unwrap();

    let report = view.inactivity().before(date(2024, 1, 1)).unwrap();
    let names: Vec<&str> = report.clients.iter().map(|c| c.client_name.as_str()).collect();
    assert_eq!(names, vec!["Recente", "Medio", "Antigo"]);
}

#[test]
fn representative_comes_from_first_matching_row() {
    let csv = format!(
        "{}\n{}\n{}\n",
        common::HEADER,
        "F,SP,C,Primeiro,1,Cliente,P,D,01/2023,1,10,10,0",
        "F,RJ,C,Segundo,1,Cliente,P,D,02/2023,1,10,10,0"
    );
    let (dashboard, _tmp) = common::dashboard_from_csv(&csv);
    let options = dashboard.options().unwrap();
    let view = dashboard.filter(&Selection::all(&options)).unwrap();

    let report = view.inactivity().before(date(2024, 1, 1)).unwrap();
    assert_eq!(report.clients[0].representative, "Primeiro");
    assert_eq!(report.clients[0].state, "SP");
    assert_eq!(report.clients[0].last_purchase, date(2023, 2, 1));
}
