//! Unit tests for the SqlBuilder query construction.

use sales_dashboard::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("sales").build();
    assert_eq!(sql, "SELECT *\nFROM sales");
    assert!(params.is_empty());
}

#[test]
fn select_accepts_owned_columns() {
    let cols = vec!["state".to_string(), "SUM(revenue) AS revenue".to_string()];
    let (sql, _) = SqlBuilder::new("sales").select(&cols).build();
    assert!(sql.starts_with("SELECT state, SUM(revenue) AS revenue\n"));
}

#[test]
fn distinct_adds_keyword() {
    let (sql, _) = SqlBuilder::new("sales")
        .select(&["year"])
        .distinct()
        .build();
    assert!(sql.starts_with("SELECT DISTINCT year"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_in_adds_in_clause() {
    let (sql, params) = SqlBuilder::new("sales")
        .where_in("state", &["SP", "RJ", "MG"])
        .build();
    assert!(sql.contains("state IN (?, ?, ?)"));
    assert_eq!(params, vec!["SP", "RJ", "MG"]);
}

#[test]
fn where_in_empty_produces_false() {
    let (sql, params) = SqlBuilder::new("sales").where_in("state", &[]).build();
    assert!(sql.contains("WHERE FALSE"));
    assert!(params.is_empty());
}

#[test]
fn where_conditions_are_and_combined_in_order() {
    let (sql, params) = SqlBuilder::new("sales")
        .where_in("year", &["2024"])
        .where_clause("reference_date < CAST(? AS DATE)", &["2024-02-01"])
        .build();
    assert!(sql.contains("WHERE year IN (?) AND reference_date < CAST(? AS DATE)"));
    assert_eq!(params, vec!["2024", "2024-02-01"]);
}

#[test]
fn where_or_groups_multi_param_conditions() {
    let (sql, params) = SqlBuilder::new("filtered")
        .where_or(&[
            ("(year = ? AND month_name = ?)", vec!["2024".into(), "janeiro".into()]),
            ("(year = ? AND month_name = ?)", vec!["2025".into(), "março".into()]),
        ])
        .build();
    assert!(sql.contains("((year = ? AND month_name = ?) OR (year = ? AND month_name = ?))"));
    assert_eq!(params, vec!["2024", "janeiro", "2025", "março"]);
}

#[test]
fn where_or_empty_is_noop() {
    let (sql, params) = SqlBuilder::new("sales").where_or(&[]).build();
    assert!(!sql.contains("WHERE"));
    assert!(params.is_empty());
}

// ---------------------------------------------------------------------------
// CTEs
// ---------------------------------------------------------------------------

#[test]
fn with_prepends_ctes_and_their_params() {
    let (filter_sql, filter_params) = SqlBuilder::new("sales")
        .where_in("state", &["SP"])
        .build();
    let (sql, params) = SqlBuilder::new("last_purchases")
        .with("filtered", &filter_sql, &filter_params)
        .with(
            "last_purchases",
            "SELECT client_name, MAX(reference_date) AS d FROM filtered GROUP BY client_name",
            &[],
        )
        .where_clause("d < CAST(? AS DATE)", &["2025-01-01"])
        .build();

    assert!(sql.starts_with("WITH filtered AS (\nSELECT *\nFROM sales\nWHERE state IN (?)\n),\nlast_purchases AS ("));
    assert!(sql.contains("FROM last_purchases\nWHERE d < CAST(? AS DATE)"));
    assert_eq!(params, vec!["SP", "2025-01-01"]);
}

// ---------------------------------------------------------------------------
// Joins, grouping, ordering, pagination
// ---------------------------------------------------------------------------

#[test]
fn join_group_and_order_appear_in_sequence() {
    let (sql, _) = SqlBuilder::new("ranked r")
        .join("JOIN filtered f ON f.client_name = r.name")
        .select(&["r.name", "f.year", "SUM(f.revenue) AS revenue"])
        .group_by(&["r.name", "f.year"])
        .order_by(&["r.total DESC", "f.year ASC"])
        .build();
    let join = sql.find("JOIN filtered f").unwrap();
    let group = sql.find("GROUP BY r.name, f.year").unwrap();
    let order = sql.find("ORDER BY r.total DESC, f.year ASC").unwrap();
    assert!(join < group && group < order);
}

#[test]
fn limit_and_offset_together() {
    let (sql, _) = SqlBuilder::new("sales").limit(15).offset(30).build();
    assert!(sql.ends_with("LIMIT 15\nOFFSET 30"));
}
