pub mod batch;
pub mod cli;
pub mod config;
pub mod convert;
pub mod data;
pub mod discovery;
pub mod error;
pub mod report;

pub use batch::{run, RunOptions};
pub use config::Layout;
pub use convert::{convert_filter_file, convert_qe_file};
pub use data::model::Dataset;
pub use report::{BatchReport, Cleanup, RunSummary};
