pub mod config;
pub mod constants;

pub use config::{PolicyConfig, ReaperConfig, ReportConfig, load_config};
