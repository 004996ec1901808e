//! Ingestion tests: header handling, normalization, and fatal failures.

mod common;

use chrono::NaiveDate;
use sales_dashboard::ingest::{read_transactions, PeriodLayout};
use sales_dashboard::{DashboardError, Dimension};

fn row(fields: &str) -> String {
    format!("{}\n{}\n", common::HEADER, fields)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn sample_keeps_valid_rows_and_counts_drops() {
    let ingestion = read_transactions(common::SAMPLE_CSV.as_bytes(), "sample").unwrap();
    assert_eq!(ingestion.summary.rows_read, 11);
    assert_eq!(ingestion.summary.rows_kept, 9);
    assert_eq!(ingestion.summary.rows_dropped, 2);
    assert_eq!(ingestion.summary.period_layout, PeriodLayout::MonthYear);
}

#[test]
fn row_fields_are_normalized() {
    let ingestion = read_transactions(common::SAMPLE_CSV.as_bytes(), "sample").unwrap();
    let gama = &ingestion.transactions[3];
    assert_eq!(gama.row_index, 3);
    assert_eq!(gama.client_name, "Empório Gama");
    assert_eq!(gama.reference_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(gama.year, "2024");
    assert_eq!(gama.month_name, "fevereiro");
    assert_eq!(gama.month_year, "02/2024");
    common::assert_close(gama.revenue, 1000.0);
    common::assert_close(gama.weight_kg, 50.0);
    assert_eq!(gama.avg_price, Some(20.0));
}

#[test]
fn optional_numeric_fields_become_missing() {
    let ingestion = read_transactions(common::SAMPLE_CSV.as_bytes(), "sample").unwrap();
    // Row 6 has an empty BONIF_KG
    assert_eq!(ingestion.transactions[6].row_index, 6);
    assert_eq!(ingestion.transactions[6].bonus_kg, None);
}

#[test]
fn text_fields_are_trimmed_and_blank_kept() {
    let csv = row("  Queijos , SP ,Carlos,Ana,C001,  Mercado Alfa ,P01,,01/2024,1,2,3,4");
    let ingestion = read_transactions(csv.as_bytes(), "inline").unwrap();
    let tx = &ingestion.transactions[0];
    assert_eq!(tx.family, "Queijos");
    assert_eq!(tx.state, "SP");
    assert_eq!(tx.client_name, "Mercado Alfa");
    assert_eq!(tx.product_description, "");
}

#[test]
fn bom_and_header_whitespace_are_stripped() {
    let csv = format!("\u{feff}{}", common::SAMPLE_CSV);
    let ingestion = read_transactions(csv.as_bytes(), "bom").unwrap();
    assert_eq!(ingestion.summary.rows_kept, 9);
}

#[test]
fn rows_missing_required_values_are_dropped() {
    let csv = format!(
        "{}\n{}\n{}\n{}\n",
        common::HEADER,
        "F,SP,C,R,1,A,P,D,,10,100,1,0",
        "F,SP,C,R,1,A,P,D,01/2024,,100,1,0",
        "F,SP,C,R,1,A,P,D,01/2024,10,100,1,0"
    );
    let ingestion = read_transactions(csv.as_bytes(), "inline").unwrap();
    assert_eq!(ingestion.transactions.len(), 1);
    assert_eq!(ingestion.transactions[0].row_index, 2);
}

#[test]
fn reingesting_unchanged_source_is_identical() {
    let first = read_transactions(common::SAMPLE_CSV.as_bytes(), "a").unwrap();
    let second = read_transactions(common::SAMPLE_CSV.as_bytes(), "b").unwrap();
    assert_eq!(first.transactions, second.transactions);
    assert_eq!(first.summary, second.summary);
}

// ---------------------------------------------------------------------------
// Legacy period layout
// ---------------------------------------------------------------------------

#[test]
fn legacy_month_and_year_columns_build_the_period() {
    let csv = "\
FAMILIA,UF,COORDENADOR,REPRESENTANTE,CLIENTE,NOME,PRODUTO,DESCRICAO,MÊS,ANO,FATURA_KG,FATURA_RS,PRECO_MEDIO,BONIF_KG
F,SP,C,R,1,A,P,D,3,2024,10,100,10,0
F,SP,C,R,1,A,P,D,abril,2024,10,100,10,0
F,SP,C,R,1,A,P,D,May,2024,10,100,10,0
";
    let ingestion = read_transactions(csv.as_bytes(), "legacy").unwrap();
    assert_eq!(ingestion.summary.period_layout, PeriodLayout::LegacyMonthAndYear);
    let months: Vec<&str> = ingestion
        .transactions
        .iter()
        .map(|t| t.month_name.as_str())
        .collect();
    assert_eq!(months, vec!["março", "abril", "maio"]);
    assert_eq!(ingestion.transactions[0].month_year, "03/2024");
}

// ---------------------------------------------------------------------------
// Fatal failures
// ---------------------------------------------------------------------------

#[test]
fn missing_columns_are_all_reported() {
    let csv = "FAMILIA,UF,NOME,FATURA_RS\nF,SP,A,10\n";
    let err = read_transactions(csv.as_bytes(), "inline").unwrap_err();
    match err {
        DashboardError::MissingColumns(cols) => {
            assert_eq!(
                cols,
                vec![
                    "FATURA_KG",
                    "PRECO_MEDIO",
                    "BONIF_KG",
                    "COORDENADOR",
                    "REPRESENTANTE",
                    "CLIENTE",
                    "PRODUTO",
                    "DESCRICAO",
                    "MESANO",
                ]
            );
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn only_month_without_year_reports_mesano() {
    let csv = "FAMILIA,UF,COORDENADOR,REPRESENTANTE,CLIENTE,NOME,PRODUTO,DESCRICAO,MÊS,FATURA_KG,FATURA_RS,PRECO_MEDIO,BONIF_KG\n";
    let err = read_transactions(csv.as_bytes(), "inline").unwrap_err();
    assert!(matches!(err, DashboardError::MissingColumns(ref c) if c == &vec!["MESANO".to_string()]));
    assert!(err.to_string().contains("MESANO"));
}

#[test]
fn empty_source_is_fatal() {
    let err = read_transactions("".as_bytes(), "empty.csv").unwrap_err();
    assert!(matches!(err, DashboardError::EmptySource(_)));
}

#[test]
fn header_without_rows_is_empty() {
    let csv = format!("{}\n", common::HEADER);
    let err = read_transactions(csv.as_bytes(), "header-only").unwrap_err();
    assert!(matches!(err, DashboardError::EmptySource(_)));
}

#[test]
fn all_rows_invalid_is_fatal() {
    let csv = row("F,SP,C,R,1,A,P,D,99/2024,10,100,1,0");
    let err = read_transactions(csv.as_bytes(), "inline").unwrap_err();
    assert!(matches!(err, DashboardError::NoValidRows { rows_read: 1 }));
    assert!(err.is_ingestion_failure());
}

#[test]
fn ragged_rows_are_a_csv_error() {
    let csv = row("F,SP,C,R,1,A");
    let err = read_transactions(csv.as_bytes(), "inline").unwrap_err();
    assert!(matches!(err, DashboardError::Csv(_)));
}

#[test]
fn missing_source_file_fails_on_load() {
    let tmp = tempfile::tempdir().unwrap();
    let dashboard = sales_dashboard::SalesDashboard::builder()
        .source(tmp.path().join("nope.csv").to_string_lossy())
        .cache_dir(tmp.path().join("cache"))
        .offline(true)
        .build()
        .unwrap();
    let err = dashboard.load().unwrap_err();
    assert!(matches!(err, DashboardError::SourceUnavailable(_)));
}

// ---------------------------------------------------------------------------
// Loading into DuckDB
// ---------------------------------------------------------------------------

#[test]
fn loaded_table_keeps_every_row_and_field() {
    let (dashboard, _tmp) = common::setup_dashboard();
    let summary = dashboard.load().unwrap();
    assert_eq!(summary.rows_kept, 9);

    let count = dashboard
        .sql("SELECT COUNT(*) AS n FROM sales", &[])
        .unwrap()
        .remove(0)
        .remove("n")
        .unwrap();
    assert_eq!(count, 9);

    let options = dashboard.options().unwrap();
    let view = dashboard
        .filter(&sales_dashboard::Selection::all(&options))
        .unwrap();
    let rows = view.rows(None, None).unwrap();
    let direct = read_transactions(common::SAMPLE_CSV.as_bytes(), "sample").unwrap();
    assert_eq!(rows, direct.transactions);
}

#[test]
fn quotes_and_accents_survive_loading() {
    let csv = row(
        "Laticínios,SP,João,\"Zé \"\"Conceição\"\"\",C9,D'Ávila & Filhos,P9,\"Requeijão, 200g\",03/2024,10,\"1.234,50\",12,0",
    );
    let (dashboard, _tmp) = common::dashboard_from_csv(&csv);
    let options = dashboard.options().unwrap();

    assert_eq!(options.get(Dimension::Client), ["D'Ávila & Filhos"]);
    assert_eq!(options.get(Dimension::Representative), ["Zé \"Conceição\""]);
    assert_eq!(options.get(Dimension::Family), ["Laticínios"]);
    assert_eq!(options.get(Dimension::Month), ["março"]);

    let rows = dashboard
        .filter(&sales_dashboard::Selection::all(&options))
        .unwrap()
        .rows(None, None)
        .unwrap();
    assert_eq!(rows[0].product_description, "Requeijão, 200g");
    assert_eq!(rows[0].revenue, 1234.5);
    assert_eq!(
        rows[0].reference_date,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
}
