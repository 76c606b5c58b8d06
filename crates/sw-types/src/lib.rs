pub mod market;
pub mod series;
pub mod errors;

pub use market::*;
pub use series::*;
pub use errors::*;
