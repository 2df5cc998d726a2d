mod app;
mod config;
mod invoke;
mod report;
mod sink;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use invoke::InvokeError;
pub use report::ReportError;
pub use sink::SinkError;
