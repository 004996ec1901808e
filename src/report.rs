//! One render pass over a session snapshot, plus a plain-text renderer.

use chrono::NaiveDate;
use serde::Serialize;

use crate::annotations::AnnotationStore;
use crate::config;
use crate::error::Result;
use crate::locale::{self, format_currency, format_number};
use crate::models::{
    by_average_price, DateTotal, DeclineOutcome, DeclineReport, FamilyShare, InactiveReport,
    Kpis, Metric, MonthYearTotal, ProductTotal, RankedTotal, StateYearTotal,
};
use crate::view::FilteredView;

pub const NO_DATA_MESSAGE: &str = "Nenhum dado encontrado para os filtros selecionados.";

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub kpis: Kpis,
    pub revenue_by_date: Vec<DateTotal>,
    pub revenue_by_month_year: Vec<MonthYearTotal>,
    pub top_representatives: Vec<RankedTotal>,
    pub top_clients: Vec<RankedTotal>,
    pub families: Vec<FamilyShare>,
    pub states_by_year: Vec<StateYearTotal>,
    pub top_products: Vec<ProductTotal>,
    /// The same products as `top_products`, cheapest first.
    pub products_by_price: Vec<ProductTotal>,
    pub inactive: InactiveReport,
    pub decline: DeclineOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportOutcome {
    /// The selection matched no rows; nothing downstream was computed.
    NoData,
    Ready(Box<DashboardReport>),
}

impl ReportOutcome {
    pub fn report(&self) -> Option<&DashboardReport> {
        match self {
            ReportOutcome::Ready(report) => Some(report),
            ReportOutcome::NoData => None,
        }
    }
}

impl DashboardReport {
    /// Compute every section for `view`, with inactivity judged against `today`.
    pub fn compute(view: &FilteredView<'_>, metric: Metric, today: NaiveDate) -> Result<ReportOutcome> {
        if view.is_empty()? {
            tracing::debug!("Selection matched no rows");
            return Ok(ReportOutcome::NoData);
        }

        let rankings = view.rankings();
        let top_products = rankings.products(config::TOP_N)?;
        let products_by_price = by_average_price(&top_products);

        let report = DashboardReport {
            kpis: view.kpis().compute()?,
            revenue_by_date: view.trends().by_date()?,
            revenue_by_month_year: view.trends().by_month_year()?,
            top_representatives: rankings.representatives(config::TOP_N)?,
            top_clients: rankings.clients(config::TOP_N)?,
            families: view.breakdowns().families()?,
            states_by_year: view.breakdowns().states_by_year()?,
            top_products,
            products_by_price,
            inactive: view.inactivity().as_of(today)?,
            decline: view.decline().compute(metric)?,
        };
        Ok(ReportOutcome::Ready(Box::new(report)))
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Render a pass as plain text with pt-BR number formatting.
///
/// Clients with a saved note are marked `[obs]` in the decline table and the
/// note is printed under the row.
pub fn render_text(outcome: &ReportOutcome, notes: &AnnotationStore) -> String {
    let report = match outcome {
        ReportOutcome::NoData => return format!("{}\n", NO_DATA_MESSAGE),
        ReportOutcome::Ready(report) => report,
    };

    let mut out: Vec<String> = Vec::new();
    render_kpis(&mut out, &report.kpis);
    render_charts(&mut out, report);
    render_inactive(&mut out, &report.inactive);
    render_decline(&mut out, &report.decline, notes);
    out.push(String::new());
    out.join("\n")
}

fn heading(out: &mut Vec<String>, title: &str) {
    if !out.is_empty() {
        out.push(String::new());
    }
    out.push(format!("== {} ==", title));
}

fn render_kpis(out: &mut Vec<String>, kpis: &Kpis) {
    heading(out, "Indicadores-Chave de Performance");
    out.push(format!("Venda Total (R$): {}", format_currency(kpis.total_revenue)));
    out.push(format!(
        "Volume Total (Kg): {} Kg",
        format_number(kpis.total_weight_kg, 2)
    ));
    out.push(format!("Clientes Únicos: {}", kpis.distinct_clients));
    out.push(format!(
        "Preço Médio (R$/Kg): {}",
        format_currency(kpis.average_price)
    ));
    out.push(format!(
        "Bonificação (Kg): {} Kg",
        format_number(kpis.total_bonus_kg, 2)
    ));
    out.push(format!(
        "Taxa de Bonificação (%): {}%",
        format_number(kpis.bonus_rate, 2)
    ));
}

fn ranked_line(position: usize, entry: &RankedTotal) -> String {
    let years: Vec<String> = entry
        .by_year
        .iter()
        .map(|y| format!("{}: {}", y.year, format_currency(y.revenue)))
        .collect();
    format!(
        "{:>2}. {}  {}  ({})",
        position,
        entry.name,
        format_currency(entry.total),
        years.join("; ")
    )
}

fn render_charts(out: &mut Vec<String>, report: &DashboardReport) {
    heading(out, "Venda por Data");
    for row in &report.revenue_by_date {
        out.push(format!(
            "{}  {}",
            row.date.format("%d/%m/%Y"),
            format_currency(row.revenue)
        ));
    }

    heading(out, "Venda por Mês e Ano");
    for row in &report.revenue_by_month_year {
        out.push(format!(
            "{}/{}  {}",
            row.month_name,
            row.year,
            format_currency(row.revenue)
        ));
    }

    heading(out, "Top 15 Representantes");
    for (i, entry) in report.top_representatives.iter().enumerate() {
        out.push(ranked_line(i + 1, entry));
    }

    heading(out, "Top 15 Clientes");
    for (i, entry) in report.top_clients.iter().enumerate() {
        out.push(ranked_line(i + 1, entry));
    }

    heading(out, "Participação por Família");
    for row in &report.families {
        out.push(format!(
            "{}  {}  ({}%)",
            row.family,
            format_currency(row.revenue),
            format_number(row.share_pct, 2)
        ));
    }

    heading(out, "Venda por UF e Ano");
    for row in &report.states_by_year {
        out.push(format!(
            "{} {}  {}",
            row.state,
            row.year,
            format_currency(row.revenue)
        ));
    }

    heading(out, "Análise de Produtos");
    for (i, p) in report.top_products.iter().enumerate() {
        out.push(format!(
            "{:>2}. {}  {}  {} Kg",
            i + 1,
            p.label(),
            format_currency(p.revenue),
            format_number(p.weight_kg, 2)
        ));
    }

    heading(out, "Preço Médio dos Top Produtos (R$/Kg)");
    for p in &report.products_by_price {
        out.push(format!("{}  {}", p.label(), format_currency(p.average_price)));
    }
}

fn render_inactive(out: &mut Vec<String>, inactive: &InactiveReport) {
    heading(out, "Análise de Clientes Inativos (Risco de Churn)");
    let reference = locale::month_year_label(inactive.cutoff);
    if inactive.is_empty() {
        out.push(format!(
            "Não há clientes inativos no conjunto de dados filtrado para o mês de {}.",
            reference
        ));
        return;
    }
    out.push(format!(
        "Clientes cuja última compra foi anterior a {}:",
        reference
    ));
    out.push("Nome do Cliente | Representante | UF | Mês da Última Compra".to_string());
    for c in &inactive.clients {
        out.push(format!(
            "{} | {} | {} | {}",
            c.client_name,
            c.representative,
            c.state,
            c.last_purchase_label()
        ));
    }
}

fn render_decline(out: &mut Vec<String>, decline: &DeclineOutcome, notes: &AnnotationStore) {
    heading(out, "Análise de Queda Comparativa (Período 1 vs. Período 2)");
    if let Some(warning) = decline.warning() {
        out.push(warning);
        return;
    }
    let Some(report) = decline.report() else {
        return;
    };
    render_decline_table(out, report, notes);
}

fn render_decline_table(out: &mut Vec<String>, report: &DeclineReport, notes: &AnnotationStore) {
    let metric = report.metric;
    out.push(format!("Período 1: {}", report.period_1_label()));
    out.push(format!("Período 2: {}", report.period_2_label()));

    if report.is_empty() {
        out.push(format!(
            "Nenhum cliente no conjunto filtrado teve queda no {}.",
            metric.label()
        ));
        return;
    }

    out.push(format!(
        "Nome do Cliente | UF | {} | {} | {}",
        metric.period_1_header(),
        metric.period_2_header(),
        metric.decline_header()
    ));
    for r in &report.records {
        let marker = if notes.contains(&r.client_name) { " [obs]" } else { "" };
        out.push(format!(
            "{}{} | {} | {} | {} | {}",
            r.client_name,
            marker,
            r.state.as_deref().unwrap_or("-"),
            format_number(r.period_1, 2),
            format_number(r.period_2, 2),
            format_number(r.decline, 2)
        ));
        if let Some(note) = notes.get(&r.client_name) {
            out.push(format!("    obs: {}", note));
        }
    }
    out.push(format!(
        "Queda total: {}",
        format_number(report.total_decline(), 2)
    ));
}
