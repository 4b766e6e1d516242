mod metrics;
mod production;
mod telemetry;
mod weather;

pub use metrics::*;
pub use production::*;
pub use telemetry::*;
pub use weather::*;
