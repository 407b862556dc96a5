//! The rule catalog.
//!
//! Each rule is a plain value holding its options; [`RuleConfig`] is the
//! serializable description of one configured rule.

mod equals_avoids_null;
mod final_class;
mod right_curly;

pub use equals_avoids_null::EqualsAvoidsNull;
pub use final_class::FinalClass;
pub use right_curly::RightCurly;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tugstyle_cst::visitor::Rule;

use crate::policy::{RightCurlyPolicy, Token};

/// One configured rule, as read from a rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule")]
pub enum RuleConfig {
    FinalClass,
    EqualsAvoidsNull {
        #[serde(default, alias = "ignoreEqualsIgnoreCase")]
        ignore_equals_ignore_case: bool,
    },
    RightCurly {
        #[serde(default)]
        option: RightCurlyPolicy,
        #[serde(default = "Token::all")]
        tokens: BTreeSet<Token>,
    },
}

impl RuleConfig {
    /// The rule name reported when the rule changes a file.
    pub fn name(&self) -> &'static str {
        match self {
            RuleConfig::FinalClass => FinalClass::NAME,
            RuleConfig::EqualsAvoidsNull { .. } => EqualsAvoidsNull::NAME,
            RuleConfig::RightCurly { .. } => RightCurly::NAME,
        }
    }

    pub fn build(&self) -> Box<dyn Rule> {
        match self {
            RuleConfig::FinalClass => Box::new(FinalClass),
            RuleConfig::EqualsAvoidsNull {
                ignore_equals_ignore_case,
            } => Box::new(EqualsAvoidsNull::new(*ignore_equals_ignore_case)),
            RuleConfig::RightCurly { option, tokens } => {
                Box::new(RightCurly::new(*option, tokens.clone()))
            }
        }
    }
}

/// Every rule with its default options.
pub fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::FinalClass,
        RuleConfig::EqualsAvoidsNull {
            ignore_equals_ignore_case: false,
        },
        RuleConfig::RightCurly {
            option: RightCurlyPolicy::default(),
            tokens: Token::all(),
        },
    ]
}

/// Instantiates every rule in `configs`, in order.
pub fn build_rules(configs: &[RuleConfig]) -> Vec<Box<dyn Rule>> {
    configs.iter().map(RuleConfig::build).collect()
}
