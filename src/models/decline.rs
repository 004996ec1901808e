use serde::{Deserialize, Serialize};

use crate::period::PeriodPair;

// ---------------------------------------------------------------------------
// Metric: What the decline analysis sums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Weight,
    Revenue,
}

impl Metric {
    /// Column of the `sales` table this metric sums.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Weight => "weight_kg",
            Metric::Revenue => "revenue",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Weight => "Volume",
            Metric::Revenue => "Venda",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Weight => "(KG)",
            Metric::Revenue => "(R$)",
        }
    }

    pub fn period_1_header(self) -> String {
        format!("{} (Período 1) {}", self.label(), self.unit())
    }

    pub fn period_2_header(self) -> String {
        format!("{} (Período 2) {}", self.label(), self.unit())
    }

    pub fn decline_header(self) -> String {
        format!("Queda no {} {}", self.label(), self.unit())
    }
}

// ---------------------------------------------------------------------------
// DeclineRecord: One client whose metric dropped
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclineRecord {
    #[serde(alias = "client")]
    pub client_name: String,
    pub state: Option<String>,
    pub period_1: f64,
    pub period_2: f64,
    /// `period_1 - period_2`; always strictly positive.
    pub decline: f64,
}

// ---------------------------------------------------------------------------
// DeclineReport / DeclineOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclineReport {
    pub metric: Metric,
    pub period_1: Vec<PeriodPair>,
    pub period_2: Vec<PeriodPair>,
    /// Sorted by decline, largest first.
    pub records: Vec<DeclineRecord>,
}

impl DeclineReport {
    pub fn period_1_label(&self) -> String {
        join_labels(&self.period_1)
    }

    pub fn period_2_label(&self) -> String {
        join_labels(&self.period_2)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_decline(&self) -> f64 {
        self.records.iter().map(|r| r.decline).sum()
    }
}

fn join_labels(periods: &[PeriodPair]) -> String {
    periods
        .iter()
        .map(PeriodPair::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a decline comparison for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclineOutcome {
    /// The selected year/month combinations cannot be split in two halves.
    InvalidPeriods { count: usize },
    Computed(DeclineReport),
}

impl DeclineOutcome {
    pub fn report(&self) -> Option<&DeclineReport> {
        match self {
            DeclineOutcome::Computed(report) => Some(report),
            DeclineOutcome::InvalidPeriods { .. } => None,
        }
    }

    /// User-facing warning when no comparison could be made.
    pub fn warning(&self) -> Option<String> {
        match self {
            DeclineOutcome::InvalidPeriods { count: 0 } => Some(
                "Selecione meses e anos nos filtros para iniciar a análise comparativa \
                 (a seleção deve conter um número par e não nulo de combinações mês/ano)."
                    .to_string(),
            ),
            DeclineOutcome::InvalidPeriods { count } => Some(format!(
                "Selecione um número PAR de meses/anos para comparar os Períodos 1 e 2 \
                 (combinações detectadas: {}).",
                count
            )),
            DeclineOutcome::Computed(_) => None,
        }
    }
}
