//! tugstyle: formatting-preserving auto-fixes for checkstyle violations.
//!
//! The parser and rewrite engine live in `tugstyle-cst`, the rules in
//! `tugstyle-checks`. This crate adds what the `tugstyle` binary needs on
//! top: finding Java files, loading the rule configuration and running the
//! rules over every file.

pub mod config;
pub mod error;
pub mod files;
pub mod runner;

pub use config::ConfigSource;
pub use error::{OutputErrorCode, TugstyleError};
pub use files::{collect_java_files, Selection, SourceFile};
pub use runner::{run, FixReport, RunOptions};
