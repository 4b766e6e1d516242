mod join_metrics;

pub use join_metrics::*;
