//! Trackline - time-series core for step and weight charts
//!
//! Trackline turns raw health-store records into chart-ready sequences through
//! a set of pure transformations: normalization → weekday averaging /
//! day-over-day differences → summary statistics → cursor selection.
//!
//! ## Modules
//!
//! - **Core**: `normalizer`, `weekday`, `differential`, `stats`, `selection`
//! - **Boundary**: `store` (health store interface), `pipeline` (dashboard
//!   assembly), `settings`

pub mod calendar;
pub mod differential;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod selection;
pub mod settings;
pub mod stats;
pub mod store;
pub mod types;
pub mod weekday;
pub mod window;

pub use calendar::Calendar;
pub use differential::DifferentialCalculator;
pub use error::{ComputeError, StoreError};
pub use normalizer::Normalizer;
pub use pipeline::{build_dashboard, Dashboard, DashboardBuilder, DashboardError, MetricChart};
pub use selection::{SelectionFeedback, SelectionResolver};
pub use settings::Settings;
pub use store::{parse_entry_value, HealthStore, MemoryStore};
pub use types::{MetricContext, RawRecord, Sample};
pub use weekday::WeekdayAggregator;

/// Trackline version
pub const TRACKLINE_VERSION: &str = env!("CARGO_PKG_VERSION");
