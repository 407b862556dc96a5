//! Reading rule lists from checkstyle XML and from JSON.
//!
//! Checkstyle configurations nest `<module>` elements (`Checker`,
//! `TreeWalker`, checks). Every module naming a supported check becomes one
//! [`RuleConfig`]; modules for other checks are skipped. Properties the
//! rules do not use (`severity`, `id`, ...) are ignored, but a supported
//! property with an unusable value is an error.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::ConfigError;
use crate::policy::{parse_tokens, RightCurlyPolicy, Token};
use crate::rules::RuleConfig;

/// `FinalClass`, `FinalClassCheck` and
/// `com.puppycrawl.tools.checkstyle.checks.design.FinalClassCheck` all name
/// the same check.
fn check_name(module: &str) -> &str {
    let short = module.rsplit('.').next().unwrap_or(module);
    short.strip_suffix("Check").unwrap_or(short)
}

fn properties<'a>(
    module: Node<'a, '_>,
    name: &str,
) -> Result<Vec<(&'a str, &'a str)>, ConfigError> {
    module
        .children()
        .filter(|child| child.has_tag_name("property"))
        .map(|property| {
            let missing = |attribute| ConfigError::MissingAttribute {
                module: name.to_string(),
                attribute,
            };
            let key = property.attribute("name").ok_or_else(|| missing("name"))?;
            let value = property.attribute("value").ok_or_else(|| missing("value"))?;
            Ok((key, value))
        })
        .collect()
}

fn parse_bool(module: &str, property: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::invalid_property(
            module,
            property,
            format!("expected true or false, found '{value}'"),
        )),
    }
}

fn right_curly(module: &str, props: &[(&str, &str)]) -> Result<RuleConfig, ConfigError> {
    let mut option = RightCurlyPolicy::default();
    let mut tokens = Token::all();
    for &(key, value) in props {
        match key {
            "option" => {
                option = value
                    .parse()
                    .map_err(|e| ConfigError::invalid_property(module, key, format!("{e}")))?;
            }
            "tokens" => {
                tokens = parse_tokens(value)
                    .map_err(|e| ConfigError::invalid_property(module, key, format!("{e}")))?;
            }
            _ => {}
        }
    }
    Ok(RuleConfig::RightCurly { option, tokens })
}

fn equals_avoids_null(module: &str, props: &[(&str, &str)]) -> Result<RuleConfig, ConfigError> {
    let mut ignore_equals_ignore_case = false;
    for &(key, value) in props {
        if key == "ignoreEqualsIgnoreCase" {
            ignore_equals_ignore_case = parse_bool(module, key, value)?;
        }
    }
    Ok(RuleConfig::EqualsAvoidsNull {
        ignore_equals_ignore_case,
    })
}

/// Reads the supported checks from a checkstyle configuration, in document
/// order.
pub fn from_checkstyle_xml(text: &str) -> Result<Vec<RuleConfig>, ConfigError> {
    // Checkstyle files start with a DOCTYPE declaration.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;

    let mut rules = Vec::new();
    for module in doc.descendants().filter(|n| n.has_tag_name("module")) {
        let Some(name) = module.attribute("name") else {
            continue;
        };
        let rule = match check_name(name) {
            "FinalClass" => RuleConfig::FinalClass,
            "EqualsAvoidsNull" => equals_avoids_null(name, &properties(module, name)?)?,
            "RightCurly" => right_curly(name, &properties(module, name)?)?,
            _ => {
                tracing::trace!(module = name, "skipping unsupported module");
                continue;
            }
        };
        tracing::debug!(rule = rule.name(), "configured rule");
        rules.push(rule);
    }
    Ok(rules)
}

/// Reads a JSON array of rule objects such as
/// `[{"rule": "RightCurly", "option": "same"}]`.
pub fn from_json(text: &str) -> Result<Vec<RuleConfig>, ConfigError> {
    Ok(serde_json::from_str(text)?)
}
