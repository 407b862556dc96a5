//! Where the rule configuration comes from.

use std::fs;
use std::path::{Path, PathBuf};

use tugstyle_checks::config::{from_checkstyle_xml, from_json};
use tugstyle_checks::{default_rules, RuleConfig};

use crate::error::TugstyleError;

/// One way of supplying the rule configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A checkstyle XML file.
    CheckstyleFile(PathBuf),
    /// Checkstyle XML passed on the command line.
    CheckstyleInline(String),
    /// A JSON array of rule objects.
    JsonFile(PathBuf),
    /// Every rule with its default options.
    Defaults,
}

impl ConfigSource {
    /// Picks the single configured source.
    ///
    /// Exactly one source must be given; supplying none or several is an
    /// argument error.
    pub fn select(
        config_file: Option<PathBuf>,
        config: Option<String>,
        rules_file: Option<PathBuf>,
        all_rules: bool,
    ) -> Result<Self, TugstyleError> {
        let mut sources = Vec::new();
        if let Some(path) = config_file {
            sources.push(ConfigSource::CheckstyleFile(path));
        }
        if let Some(text) = config {
            sources.push(ConfigSource::CheckstyleInline(text));
        }
        if let Some(path) = rules_file {
            sources.push(ConfigSource::JsonFile(path));
        }
        if all_rules {
            sources.push(ConfigSource::Defaults);
        }
        match sources.len() {
            0 => Err(TugstyleError::invalid_args(
                "supply a checkstyle config file via -f, an inline config via -c, \
                 a rules file via --rules, or --all-rules",
            )),
            1 => Ok(sources.remove(0)),
            _ => Err(TugstyleError::invalid_args(
                "only one of -f, -c, --rules and --all-rules may be given",
            )),
        }
    }

    /// Reads and parses the configured rules, in configuration order.
    pub fn load(&self) -> Result<Vec<RuleConfig>, TugstyleError> {
        let rules = match self {
            ConfigSource::CheckstyleFile(path) => from_checkstyle_xml(&read(path)?)?,
            ConfigSource::CheckstyleInline(text) => from_checkstyle_xml(text)?,
            ConfigSource::JsonFile(path) => from_json(&read(path)?)?,
            ConfigSource::Defaults => default_rules(),
        };
        if rules.is_empty() {
            tracing::warn!("configuration enables none of the supported rules");
        }
        Ok(rules)
    }
}

fn read(path: &Path) -> Result<String, TugstyleError> {
    fs::read_to_string(path).map_err(|source| TugstyleError::ConfigRead {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutputErrorCode;
    use tempfile::TempDir;

    #[test]
    fn select_requires_exactly_one_source() {
        let err = ConfigSource::select(None, None, None, false).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);

        let err =
            ConfigSource::select(Some("a.xml".into()), None, None, true).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);

        assert_eq!(
            ConfigSource::select(None, None, None, true).unwrap(),
            ConfigSource::Defaults
        );
    }

    #[test]
    fn load_inline_checkstyle() {
        let source = ConfigSource::CheckstyleInline(
            r#"<module name="Checker"><module name="TreeWalker">
                 <module name="FinalClass"/>
               </module></module>"#
                .to_string(),
        );
        assert_eq!(source.load().unwrap(), vec![RuleConfig::FinalClass]);
    }

    #[test]
    fn load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"[{"rule": "FinalClass"}]"#).unwrap();
        let rules = ConfigSource::JsonFile(path).load().unwrap();
        assert_eq!(rules, vec![RuleConfig::FinalClass]);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigSource::CheckstyleFile(dir.path().join("nope.xml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, TugstyleError::ConfigRead { .. }));
        assert_eq!(err.error_code(), OutputErrorCode::ConfigError);
    }

    #[test]
    fn malformed_xml_is_a_config_error() {
        let err = ConfigSource::CheckstyleInline("<module".to_string())
            .load()
            .unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::ConfigError);
    }
}
