mod date_range;
mod fetch_weather;
mod transform_weather;

pub use date_range::*;
pub use fetch_weather::*;
pub use transform_weather::*;
