//! CLI engine: argument parsing, the run handler, and shared helpers

pub mod arg_parser;
pub mod cli;
pub mod tools;

pub use arg_parser::Cli;
pub use cli::{format_totals, handle_run, size_local_dir};
pub use tools::{check_root_and_canonicalize, glob_match, human_bytes, should_include_in_walk};
