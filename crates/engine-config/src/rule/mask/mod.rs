use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod algorithm;
pub mod checker;

/// Data masking rules of one logical database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskRuleConfiguration {
    #[serde(default)]
    pub tables: Vec<MaskTableRuleConfiguration>,
    /// Algorithms by the name columns refer to them with.
    #[serde(default)]
    pub mask_algorithms: HashMap<String, AlgorithmConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskTableRuleConfiguration {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<MaskColumnRuleConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskColumnRuleConfiguration {
    pub logic_column: String,
    pub mask_algorithm: String,
}

/// Algorithm type plus its properties. Property values may be written as
/// JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmConfiguration {
    #[serde(rename = "type")]
    pub algorithm_type: String,
    #[serde(default)]
    pub props: HashMap<String, serde_json::Value>,
}

impl AlgorithmConfiguration {
    pub fn new(algorithm_type: &str) -> Self {
        Self {
            algorithm_type: algorithm_type.to_string(),
            props: HashMap::new(),
        }
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    /// The property as text, whether it was written as a string or a number.
    pub fn prop(&self, key: &str) -> Option<String> {
        match self.props.get(key)? {
            serde_json::Value::String(value) => Some(value.clone()),
            serde_json::Value::Number(value) => Some(value.to_string()),
            serde_json::Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }
}
