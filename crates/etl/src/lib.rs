mod domains;
mod error;
mod pipeline;
mod report;
mod schema;
mod utils;

pub use domains::*;
pub use error::*;
pub use pipeline::*;
pub use report::*;
pub use schema::*;
pub use utils::*;
