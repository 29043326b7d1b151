use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

use super::error::DecodeError;
use super::utils::strip_bracket_tags;

/// Built-in feature vocabulary: `0` no feature, `NSCO` outside school days, `SCO` school days.
pub const FEATURES: [(&str, &str); 3] = [("0", ""), ("NSCO", "S"), ("SCO", "s")];

/// What to do with a feature token missing from the vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedFeature {
    /// Render as "no feature" and log a warning
    #[default]
    Empty,
    /// Fail the run
    Reject,
}

impl FromStr for UnmappedFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(UnmappedFeature::Empty),
            "reject" => Ok(UnmappedFeature::Reject),
            _ => Err(format!("Invalid unmapped feature policy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureDecoder {
    extra: BTreeMap<String, String>,
    unmapped: UnmappedFeature,
}

impl FeatureDecoder {
    /// `extra` entries take precedence over the built-in vocabulary.
    pub fn new(extra: BTreeMap<String, String>, unmapped: UnmappedFeature) -> Self {
        FeatureDecoder { extra, unmapped }
    }

    /// Decodes a `p=` specification into one feature code per column.
    ///
    /// `NSCO SCO 0 0 SCO` gives `["S", "s", "", "", "s"]`.
    pub fn decode(&self, spec: &str) -> Result<Vec<String>, DecodeError> {
        spec.split(' ')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| self.decode_token(&strip_bracket_tags(token)))
            .collect()
    }

    fn decode_token(&self, token: &str) -> Result<String, DecodeError> {
        if let Some(code) = self.lookup(token) {
            return Ok(code.to_string());
        }
        match self.unmapped {
            UnmappedFeature::Empty => {
                warn!("unknown service feature {token:?}, treated as no feature");
                Ok(String::new())
            }
            UnmappedFeature::Reject => Err(DecodeError::UnknownFeature(token.to_string())),
        }
    }

    fn lookup(&self, token: &str) -> Option<&str> {
        self.extra.get(token).map(String::as_str).or_else(|| {
            FEATURES
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, code)| *code)
        })
    }
}

/// Decodes features with the built-in vocabulary and the default policy.
pub fn decode_features(spec: &str) -> Result<Vec<String>, DecodeError> {
    FeatureDecoder::default().decode(spec)
}
