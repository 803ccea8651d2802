// File: crates/tsplot/src/lib.rs
// Summary: Command-line layer over tsplot-core, split from main so the parser can be tested.

pub mod cli;

pub use cli::{about_text, run, ChartCommand, Cli, Command, CommonArgs};
