pub mod classification;
pub mod report;

pub use classification::*;
pub use report::*;
