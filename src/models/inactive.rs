use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::locale;

/// A client with no purchase on or after the inactivity cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactiveClient {
    pub client_name: String,
    pub representative: String,
    pub state: String,
    pub last_purchase: NaiveDate,
}

impl InactiveClient {
    /// Month of the last purchase, e.g. `fev/2025`.
    pub fn last_purchase_label(&self) -> String {
        locale::month_year_label(self.last_purchase)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactiveReport {
    /// First day of the reference month; purchases before it count as inactive.
    pub cutoff: NaiveDate,
    pub clients: Vec<InactiveClient>,
}

impl InactiveReport {
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
