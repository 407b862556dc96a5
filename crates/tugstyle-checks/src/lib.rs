//! Checkstyle auto-fix rules for Java sources.
//!
//! Rules are built from a [`RuleConfig`] list (read from checkstyle XML or
//! JSON by [`config`]) and applied to a parsed compilation unit with
//! [`rewrite`]:
//!
//! ```ignore
//! use tugstyle_checks::{build_rules, default_rules, rewrite_source};
//!
//! let rules = build_rules(&default_rules());
//! let (fixed, changed) = rewrite_source("class A {}", &rules)?;
//! assert_eq!(fixed, "final class A {}");
//! assert!(changed.contains("checkstyle.FinalClass"));
//! ```

pub mod config;
pub mod error;
pub mod policy;
pub mod rules;
pub mod session;

pub use error::{ConfigError, UnknownOption};
pub use policy::{RightCurlyPolicy, Token};
pub use rules::{
    build_rules, default_rules, EqualsAvoidsNull, FinalClass, RightCurly, RuleConfig,
};
pub use session::{rewrite, rewrite_source, RewriteResult};
