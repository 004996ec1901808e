//! Aggregation queries over a [`FilteredView`](crate::view::FilteredView).
//!
//! Each module provides a query struct that borrows the view and exposes
//! methods returning typed `Result<T>` payloads.

pub mod breakdowns;
pub mod decline;
pub mod inactivity;
pub mod kpis;
pub mod rankings;
pub mod trends;

pub use breakdowns::BreakdownQuery;
pub use decline::DeclineQuery;
pub use inactivity::InactivityQuery;
pub use kpis::KpiQuery;
pub use rankings::RankingQuery;
pub use trends::TrendQuery;
