mod handlers;
mod models;

pub use handlers::{generate_chart, not_found, ValidationError};
pub use models::{ChartEnvelope, GenerateChartRequest};
