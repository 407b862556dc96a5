//! Options for the RightCurly rule.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tugstyle_cst::visitor::{Cursor, Tree};
use tugstyle_cst::Formatted;

use crate::error::UnknownOption;

/// Where a closing brace goes relative to the code around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RightCurlyPolicy {
    /// The brace is alone on its line.
    #[default]
    #[serde(alias = "alone")]
    Alone,
    /// The brace shares its line with the next keyword: `} else {`.
    #[serde(alias = "same")]
    Same,
    /// Alone, unless the whole block fits on one line.
    #[serde(alias = "alone_or_singleline")]
    AloneOrSingleline,
}

impl RightCurlyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RightCurlyPolicy::Alone => "ALONE",
            RightCurlyPolicy::Same => "SAME",
            RightCurlyPolicy::AloneOrSingleline => "ALONE_OR_SINGLELINE",
        }
    }
}

impl fmt::Display for RightCurlyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RightCurlyPolicy {
    type Err = UnknownOption;

    /// Accepts checkstyle spellings in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALONE" => Ok(RightCurlyPolicy::Alone),
            "SAME" => Ok(RightCurlyPolicy::Same),
            "ALONE_OR_SINGLELINE" => Ok(RightCurlyPolicy::AloneOrSingleline),
            _ => Err(UnknownOption::new("right curly option", s)),
        }
    }
}

/// A construct whose braces RightCurly looks after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Token {
    #[serde(rename = "LITERAL_TRY")]
    LiteralTry,
    #[serde(rename = "LITERAL_CATCH")]
    LiteralCatch,
    #[serde(rename = "LITERAL_FINALLY")]
    LiteralFinally,
    #[serde(rename = "LITERAL_IF")]
    LiteralIf,
    #[serde(rename = "LITERAL_ELSE")]
    LiteralElse,
}

impl Token {
    pub const ALL: [Token; 5] = [
        Token::LiteralTry,
        Token::LiteralCatch,
        Token::LiteralFinally,
        Token::LiteralIf,
        Token::LiteralElse,
    ];

    /// Every token; the default RightCurly configuration.
    pub fn all() -> BTreeSet<Token> {
        Token::ALL.into_iter().collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Token::LiteralTry => "LITERAL_TRY",
            Token::LiteralCatch => "LITERAL_CATCH",
            Token::LiteralFinally => "LITERAL_FINALLY",
            Token::LiteralIf => "LITERAL_IF",
            Token::LiteralElse => "LITERAL_ELSE",
        }
    }

    /// True if the node at `cursor` is the body of this token's construct:
    /// the `try` block, a `catch` or `finally` block, the branch of an `if`,
    /// or the statement after `else`.
    pub fn matches(&self, cursor: &Cursor<'_>) -> bool {
        let id = cursor.id();
        match (self, cursor.parent_tree()) {
            (Token::LiteralTry, Some(Tree::Try(node))) => node.body.id == id,
            (Token::LiteralCatch, Some(Tree::Catch(node))) => node.body.id == id,
            (Token::LiteralFinally, Some(Tree::Finally(node))) => node.body.id == id,
            (Token::LiteralIf, Some(Tree::If(node))) => node.then_part.id() == id,
            (Token::LiteralElse, Some(Tree::Else(node))) => node.body.id() == id,
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Token {
    type Err = UnknownOption;

    /// Accepts `LITERAL_IF` as well as the bare keyword `if`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let keyword = upper.strip_prefix("LITERAL_").unwrap_or(&upper);
        match keyword {
            "TRY" => Ok(Token::LiteralTry),
            "CATCH" => Ok(Token::LiteralCatch),
            "FINALLY" => Ok(Token::LiteralFinally),
            "IF" => Ok(Token::LiteralIf),
            "ELSE" => Ok(Token::LiteralElse),
            _ => Err(UnknownOption::new("token", s)),
        }
    }
}

/// Parses a checkstyle `tokens` property: a comma separated list.
pub fn parse_tokens(list: &str) -> Result<BTreeSet<Token>, UnknownOption> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(Token::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_checkstyle_spellings() {
        assert_eq!("alone".parse(), Ok(RightCurlyPolicy::Alone));
        assert_eq!(" SAME ".parse(), Ok(RightCurlyPolicy::Same));
        assert_eq!(
            "alone_or_singleline".parse(),
            Ok(RightCurlyPolicy::AloneOrSingleline)
        );
        let err = "sometimes".parse::<RightCurlyPolicy>().unwrap_err();
        assert_eq!(err.to_string(), "unknown right curly option 'sometimes'");
    }

    #[test]
    fn policy_deserializes_from_either_case() {
        let same: RightCurlyPolicy = serde_json::from_str("\"same\"").unwrap();
        let alone: RightCurlyPolicy = serde_json::from_str("\"ALONE_OR_SINGLELINE\"").unwrap();
        assert_eq!(same, RightCurlyPolicy::Same);
        assert_eq!(alone, RightCurlyPolicy::AloneOrSingleline);
        assert_eq!(RightCurlyPolicy::default(), RightCurlyPolicy::Alone);
    }

    #[test]
    fn token_lists() {
        let tokens = parse_tokens("LITERAL_IF, LITERAL_ELSE,").unwrap();
        assert_eq!(
            tokens.into_iter().collect::<Vec<_>>(),
            vec![Token::LiteralIf, Token::LiteralElse]
        );
        assert_eq!(parse_tokens("try,catch").unwrap().len(), 2);
        assert!(parse_tokens("LITERAL_WHILE").is_err());
        assert_eq!(Token::all().len(), 5);
    }
}
