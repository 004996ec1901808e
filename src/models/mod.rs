pub mod decline;
pub mod inactive;
pub mod kpi;
pub mod series;
pub mod transaction;

pub use decline::*;
pub use inactive::*;
pub use kpi::*;
pub use series::*;
pub use transaction::*;
