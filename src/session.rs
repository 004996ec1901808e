//! Immutable interaction state.
//!
//! Every control change produces a new [`Session`]; the previous snapshot is
//! left untouched, so a render pass always works from one consistent state.

use crate::annotations::AnnotationStore;
use crate::error::{DashboardError, Result};
use crate::filter::{Dimension, FilterOptions, Selection};
use crate::models::Metric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    selection: Selection,
    metric: Metric,
    /// Client whose note editor is open, if any.
    open_editor: Option<String>,
}

impl Session {
    /// Initial state: every option selected, weight metric, no editor open.
    pub fn new(options: &FilterOptions) -> Self {
        Self {
            selection: Selection::all(options),
            metric: Metric::default(),
            open_editor: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn editing(&self) -> Option<&str> {
        self.open_editor.as_deref()
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            selection,
            ..self.clone()
        }
    }

    pub fn with_values<I, S>(&self, dim: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_selection(self.selection.with_values(dim, values))
    }

    pub fn toggle_all(&self, dim: Dimension, selected: bool, options: &FilterOptions) -> Self {
        self.with_selection(self.selection.toggle_all(dim, selected, options))
    }

    pub fn with_metric(&self, metric: Metric) -> Self {
        Self {
            metric,
            ..self.clone()
        }
    }

    /// Open the note editor for `client`, closing any other.
    pub fn open_editor(&self, client: &str) -> Self {
        Self {
            open_editor: Some(client.to_string()),
            ..self.clone()
        }
    }

    pub fn close_editor(&self) -> Self {
        Self {
            open_editor: None,
            ..self.clone()
        }
    }

    /// Save `text` as the open client's note and close the editor.
    ///
    /// The store is written to disk before the new snapshot is returned.
    pub fn save_note(&self, store: &mut AnnotationStore, text: &str) -> Result<Self> {
        let client = self.open_editor.as_deref().ok_or_else(|| {
            DashboardError::InvalidArgument("no note editor is open".to_string())
        })?;
        store.set(client, text);
        store.save()?;
        Ok(self.close_editor())
    }
}
