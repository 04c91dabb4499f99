//! Record file loading for the arbor pipeline.

mod domain;
mod error;
mod reader;

pub use domain::{LabelColumn, RecordSet};
pub use error::IoError;
pub use reader::RecordReader;
