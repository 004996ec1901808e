//! Shared test fixtures for the sales dashboard integration tests.
//!
//! Provides `setup_dashboard()`, which writes a small sample export into a
//! temporary directory and builds an offline dashboard over it.

#![allow(dead_code)]

use sales_dashboard::{SalesDashboard, Session};
use std::fs;
use std::path::{Path, PathBuf};

/// Nine valid rows for three clients over Jan/Feb of 2024 and 2025, plus two
/// rows that normalization drops (bad period, bad revenue).
///
/// The weight header carries surrounding spaces on purpose.
pub const SAMPLE_CSV: &str = "\
FAMILIA,UF,COORDENADOR,REPRESENTANTE,CLIENTE,NOME,PRODUTO,DESCRICAO,MESANO, FATURA_KG ,FATURA_RS,PRECO_MEDIO,BONIF_KG
Queijos,SP,Carlos,Ana,C001,Mercado Alfa,P01,Queijo Minas,01/2024,60,600,10,6
Manteigas,RJ,Carlos,Bruno,C002,Padaria Beta,P02,Manteiga 200g,01/2024,40,480,12,0
Queijos,SP,Carlos,Ana,C001,Mercado Alfa,P01,Queijo Minas,02/2024,40,400,10,4
Queijos,MG,Dora,Ana,C003,Empório Gama,P01,Queijo Minas,02/2024,50,\"1.000,00\",\"20,00\",0
Queijos,SP,Carlos,Ana,C001,Mercado Alfa,P01,Queijo Minas,01/2025,20,200,10,2
Manteigas,RJ,Carlos,Bruno,C002,Padaria Beta,P02,Manteiga 200g,01/2025,50,600,12,0
Queijos,SP,Carlos,Ana,C001,Mercado Alfa,P01,Queijo Minas,02/2025,20,200,10,
Manteigas,RJ,Carlos,Bruno,C002,Padaria Beta,P02,Manteiga 200g,02/2025,50,600,12,5
Queijos,MG,Dora,Ana,C003,Empório Gama,P01,Queijo Minas,02/2025,50,\"1.000,00\",\"20,00\",0
Queijos,SP,Carlos,Ana,C001,Mercado Alfa,P01,Queijo Minas,13/2025,10,100,10,0
Manteigas,RJ,Carlos,Bruno,C002,Padaria Beta,P02,Manteiga 200g,03/2025,10,abc,12,0
";

pub const HEADER: &str = "FAMILIA,UF,COORDENADOR,REPRESENTANTE,CLIENTE,NOME,PRODUTO,DESCRICAO,MESANO,FATURA_KG,FATURA_RS,PRECO_MEDIO,BONIF_KG";

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Build an offline dashboard over `contents`.
///
/// Returns `(SalesDashboard, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
pub fn dashboard_from_csv(contents: &str) -> (SalesDashboard, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let source = write_file(tmp_dir.path(), "Dados.csv", contents);
    let dashboard = SalesDashboard::builder()
        .source(source.to_string_lossy())
        .cache_dir(tmp_dir.path().join("cache"))
        .annotations_path(tmp_dir.path().join("observacoes_clientes.json"))
        .offline(true)
        .build()
        .unwrap();
    (dashboard, tmp_dir)
}

pub fn setup_dashboard() -> (SalesDashboard, tempfile::TempDir) {
    dashboard_from_csv(SAMPLE_CSV)
}

/// A session with every option selected.
pub fn full_session(dashboard: &SalesDashboard) -> Session {
    Session::new(&dashboard.options().unwrap())
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}
