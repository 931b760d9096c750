// Builder configuration and defaults

use crate::parser::errors::StructureError;
use crate::parser::recognizer::ConstructKind;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Deepest scope nesting a parse accepts before giving up
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Order in which recognizers are tried at each token position
pub const DEFAULT_PRECEDENCE: [ConstructKind; 6] = [
    ConstructKind::Namespace,
    ConstructKind::Class,
    ConstructKind::Struct,
    ConstructKind::Union,
    ConstructKind::Enum,
    ConstructKind::Block,
];

/// Settings for [`StructureParser`](crate::parser::parse::StructureParser).
///
/// Deserializes from kebab-case keys; missing keys take their defaults:
///
/// ```text
/// { "max-depth": 64, "precedence": ["namespace", "struct", "block"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuilderConfig {
    pub max_depth: usize,
    pub precedence: Vec<ConstructKind>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            precedence: DEFAULT_PRECEDENCE.to_vec(),
        }
    }
}

impl BuilderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_precedence(mut self, precedence: impl IntoIterator<Item = ConstructKind>) -> Self {
        self.precedence = precedence.into_iter().collect();
        self
    }

    pub fn validate(&self) -> Result<(), StructureError> {
        if self.max_depth == 0 {
            return Err(StructureError::ZeroDepth);
        }
        if self.precedence.is_empty() {
            return Err(StructureError::EmptyPrecedence);
        }

        let mut seen = FxHashSet::default();
        for &kind in &self.precedence {
            if !seen.insert(kind) {
                return Err(StructureError::DuplicateConstruct(kind));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BuilderConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.precedence.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let config: BuilderConfig = serde_json::from_str(r#"{ "max-depth": 8 }"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.precedence, DEFAULT_PRECEDENCE.to_vec());

        let config: BuilderConfig =
            serde_json::from_str(r#"{ "precedence": ["block", "struct"] }"#).unwrap();
        assert_eq!(config.precedence, vec![ConstructKind::Block, ConstructKind::Struct]);
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            BuilderConfig::default().with_max_depth(0).validate(),
            Err(StructureError::ZeroDepth)
        );
        assert_eq!(
            BuilderConfig::default().with_precedence([]).validate(),
            Err(StructureError::EmptyPrecedence)
        );
        assert_eq!(
            BuilderConfig::default()
                .with_precedence([ConstructKind::Struct, ConstructKind::Block, ConstructKind::Struct])
                .validate(),
            Err(StructureError::DuplicateConstruct(ConstructKind::Struct))
        );
    }
}
