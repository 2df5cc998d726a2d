//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;


pub use cli::{BenchArgs, Command, MergeArgs, PlotArgs};
pub use parsers::MergeInput;

pub(crate) use defaults::DEFAULT_USER_AGENT;
