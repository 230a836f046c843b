use crate::{error::ConfigurationError, rule::mask::AlgorithmConfiguration};
use std::{fmt, str::FromStr};

const FIRST_N: &str = "first-n";
const LAST_M: &str = "last-m";
const FROM_X: &str = "from-x";
const TO_Y: &str = "to-y";
const REPLACE_CHAR: &str = "replace-char";
const SPECIAL_CHARS: &str = "special-chars";
const RANDOM_REPLACE_CODES: [&str; 4] = [
    "uppercase-letter-codes",
    "lowercase-letter-codes",
    "digital-codes",
    "special-codes",
];

/// Built-in mask algorithm implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskAlgorithmType {
    Md5,
    KeepFirstNLastM,
    KeepFromXToY,
    MaskFirstNLastM,
    MaskFromXToY,
    MaskBeforeSpecialChars,
    MaskAfterSpecialChars,
    GenericTableRandomReplace,
}

impl MaskAlgorithmType {
    pub const ALL: [MaskAlgorithmType; 8] = [
        MaskAlgorithmType::Md5,
        MaskAlgorithmType::KeepFirstNLastM,
        MaskAlgorithmType::KeepFromXToY,
        MaskAlgorithmType::MaskFirstNLastM,
        MaskAlgorithmType::MaskFromXToY,
        MaskAlgorithmType::MaskBeforeSpecialChars,
        MaskAlgorithmType::MaskAfterSpecialChars,
        MaskAlgorithmType::GenericTableRandomReplace,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MaskAlgorithmType::Md5 => "MD5",
            MaskAlgorithmType::KeepFirstNLastM => "KEEP_FIRST_N_LAST_M",
            MaskAlgorithmType::KeepFromXToY => "KEEP_FROM_X_TO_Y",
            MaskAlgorithmType::MaskFirstNLastM => "MASK_FIRST_N_LAST_M",
            MaskAlgorithmType::MaskFromXToY => "MASK_FROM_X_TO_Y",
            MaskAlgorithmType::MaskBeforeSpecialChars => "MASK_BEFORE_SPECIAL_CHARS",
            MaskAlgorithmType::MaskAfterSpecialChars => "MASK_AFTER_SPECIAL_CHARS",
            MaskAlgorithmType::GenericTableRandomReplace => "GENERIC_TABLE_RANDOM_REPLACE",
        }
    }

    /// Checks that the properties this algorithm needs are present and well-formed.
    pub fn validate_props(&self, config: &AlgorithmConfiguration) -> Result<(), ConfigurationError> {
        match self {
            // salt is optional
            MaskAlgorithmType::Md5 => Ok(()),
            MaskAlgorithmType::KeepFirstNLastM | MaskAlgorithmType::MaskFirstNLastM => {
                self.require_count(config, FIRST_N)?;
                self.require_count(config, LAST_M)?;
                self.require_char(config, REPLACE_CHAR)
            }
            MaskAlgorithmType::KeepFromXToY | MaskAlgorithmType::MaskFromXToY => {
                let from = self.require_count(config, FROM_X)?;
                let to = self.require_count(config, TO_Y)?;
                if from > to {
                    return Err(self.invalid(
                        FROM_X,
                        format!("must not be greater than {TO_Y} ({from} > {to})"),
                    ));
                }
                self.require_char(config, REPLACE_CHAR)
            }
            MaskAlgorithmType::MaskBeforeSpecialChars
            | MaskAlgorithmType::MaskAfterSpecialChars => {
                match config.prop(SPECIAL_CHARS) {
                    Some(chars) if !chars.is_empty() => {}
                    _ => return Err(self.invalid(SPECIAL_CHARS, "must be a non-empty string")),
                }
                self.require_char(config, REPLACE_CHAR)
            }
            MaskAlgorithmType::GenericTableRandomReplace => {
                for key in RANDOM_REPLACE_CODES {
                    if config.props.contains_key(key)
                        && config.prop(key).is_none_or(|codes| codes.trim().is_empty())
                    {
                        return Err(self.invalid(key, "must not be empty when set"));
                    }
                }
                Ok(())
            }
        }
    }

    fn require_count(&self, config: &AlgorithmConfiguration, key: &str) -> Result<u32, ConfigurationError> {
        let raw = config
            .prop(key)
            .ok_or_else(|| self.invalid(key, "is required"))?;
        raw.trim()
            .parse::<u32>()
            .map_err(|_| self.invalid(key, format!("must be a non-negative integer, got `{raw}`")))
    }

    fn require_char(&self, config: &AlgorithmConfiguration, key: &str) -> Result<(), ConfigurationError> {
        let raw = config
            .prop(key)
            .ok_or_else(|| self.invalid(key, "is required"))?;
        if raw.chars().count() != 1 {
            return Err(self.invalid(key, format!("must be exactly one character, got `{raw}`")));
        }
        Ok(())
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> ConfigurationError {
        ConfigurationError::InvalidAlgorithmProperty {
            algorithm_type: self.name().to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for MaskAlgorithmType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaskAlgorithmType::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnknownAlgorithmType(s.to_string()))
    }
}

impl fmt::Display for MaskAlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(
            "keep_first_n_last_m".parse::<MaskAlgorithmType>().unwrap(),
            MaskAlgorithmType::KeepFirstNLastM
        );
        assert!(matches!(
            "AES".parse::<MaskAlgorithmType>(),
            Err(ConfigurationError::UnknownAlgorithmType(name)) if name == "AES"
        ));
    }

    #[test]
    fn test_first_n_last_m_props() {
        let kind = MaskAlgorithmType::MaskFirstNLastM;
        let config = AlgorithmConfiguration::new("MASK_FIRST_N_LAST_M")
            .with_prop("first-n", 3)
            .with_prop("last-m", "4")
            .with_prop("replace-char", "*");
        assert!(kind.validate_props(&config).is_ok());

        let negative = config.clone().with_prop("first-n", -1);
        assert!(matches!(
            kind.validate_props(&negative),
            Err(ConfigurationError::InvalidAlgorithmProperty { key, .. }) if key == "first-n"
        ));

        let wide = config.with_prop("replace-char", "**");
        assert!(matches!(
            kind.validate_props(&wide),
            Err(ConfigurationError::InvalidAlgorithmProperty { key, .. }) if key == "replace-char"
        ));
    }

    #[test]
    fn test_from_x_to_y_bounds() {
        let config = AlgorithmConfiguration::new("KEEP_FROM_X_TO_Y")
            .with_prop("from-x", 5)
            .with_prop("to-y", 2)
            .with_prop("replace-char", "#");
        assert!(MaskAlgorithmType::KeepFromXToY.validate_props(&config).is_err());
    }

    #[test]
    fn test_special_chars_required() {
        let config = AlgorithmConfiguration::new("MASK_AFTER_SPECIAL_CHARS")
            .with_prop("special-chars", "")
            .with_prop("replace-char", "*");
        assert!(MaskAlgorithmType::MaskAfterSpecialChars
            .validate_props(&config)
            .is_err());
    }

    #[test]
    fn test_optional_props() {
        assert!(MaskAlgorithmType::Md5
            .validate_props(&AlgorithmConfiguration::new("MD5"))
            .is_ok());
        assert!(MaskAlgorithmType::GenericTableRandomReplace
            .validate_props(&AlgorithmConfiguration::new("GENERIC_TABLE_RANDOM_REPLACE"))
            .is_ok());
    }
}
