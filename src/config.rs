use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::error::ConfigError;
use super::features::{FeatureDecoder, UnmappedFeature};

/// Circulation used when neither a `days=` line nor a `circulation=` header is given.
pub const DEFAULT_CIRCULATION: &str = "1-6";

/// Compiler settings, read from an optional TOML file such as:
///
/// ```toml
/// default_circulation = "1-5"
/// unmapped_feature = "reject"
///
/// [features]
/// VAC = "v"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    pub default_circulation: String,
    pub unmapped_feature: UnmappedFeature,
    /// Extra feature tokens, overriding the built-in ones
    pub features: BTreeMap<String, String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            default_circulation: DEFAULT_CIRCULATION.to_string(),
            unmapped_feature: UnmappedFeature::default(),
            features: BTreeMap::new(),
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs_err::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn feature_decoder(&self) -> FeatureDecoder {
        FeatureDecoder::new(self.features.clone(), self.unmapped_feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            CompilerConfig::from_toml_str("").unwrap(),
            CompilerConfig::default()
        );
    }

    #[test]
    fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_circulation = \"1-5\"\nunmapped_feature = \"reject\"\n\n[features]\nVAC = \"v\""
        )
        .unwrap();

        let config = CompilerConfig::load(file.path()).unwrap();
        assert_eq!(config.default_circulation, "1-5");
        assert_eq!(config.unmapped_feature, UnmappedFeature::Reject);
        assert_eq!(
            config.feature_decoder().decode("VAC 0").unwrap(),
            vec!["v", ""]
        );
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            CompilerConfig::from_toml_str("circulation = \"1-5\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            CompilerConfig::from_toml_str("unmapped_feature = \"drop\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CompilerConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
