use crate::{
    error::ConfigurationError,
    rule::{
        RuleConfigurationChecker,
        mask::{
            AlgorithmConfiguration, MaskColumnRuleConfiguration, MaskRuleConfiguration,
            MaskTableRuleConfiguration, algorithm::MaskAlgorithmType,
        },
    },
};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

pub const MASK_ORDER: i32 = 50;

const RULE_TYPE: &str = "mask";

/// Validates a mask rule configuration: algorithms first, then tables, then
/// the algorithm each column refers to.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaskRuleConfigurationChecker;

impl RuleConfigurationChecker for MaskRuleConfigurationChecker {
    type Config = MaskRuleConfiguration;

    fn check(&self, database_name: &str, config: &MaskRuleConfiguration) -> Result<(), ConfigurationError> {
        info!(
            "Checking mask rules of database `{database_name}`: {} tables, {} algorithms",
            config.tables.len(),
            config.mask_algorithms.len()
        );

        self.check_mask_algorithms(&config.mask_algorithms)?;
        self.check_tables(database_name, &config.tables, &config.mask_algorithms)?;

        info!("Mask rules of database `{database_name}` are valid");
        Ok(())
    }

    fn order(&self) -> i32 {
        MASK_ORDER
    }
}

impl MaskRuleConfigurationChecker {
    fn check_mask_algorithms(
        &self,
        algorithms: &HashMap<String, AlgorithmConfiguration>,
    ) -> Result<(), ConfigurationError> {
        let mut names: Vec<&String> = algorithms.keys().collect();
        names.sort();
        for name in names {
            let config = &algorithms[name];
            let kind: MaskAlgorithmType = config.algorithm_type.parse()?;
            kind.validate_props(config)?;
        }
        Ok(())
    }

    fn check_tables(
        &self,
        database_name: &str,
        tables: &[MaskTableRuleConfiguration],
        algorithms: &HashMap<String, AlgorithmConfiguration>,
    ) -> Result<(), ConfigurationError> {
        self.check_tables_not_duplicated(database_name, tables)?;
        for table in tables {
            self.check_columns(database_name, &table.name, &table.columns, algorithms)?;
        }
        Ok(())
    }

    fn check_tables_not_duplicated(
        &self,
        database_name: &str,
        tables: &[MaskTableRuleConfiguration],
    ) -> Result<(), ConfigurationError> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for table in tables {
            *counts.entry(table.name.as_str()).or_default() += 1;
        }

        let duplicated: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect();
        if !duplicated.is_empty() {
            return Err(ConfigurationError::DuplicateRule {
                rule_type: RULE_TYPE.to_uppercase(),
                database_name: database_name.to_string(),
                tables: duplicated,
            });
        }
        Ok(())
    }

    fn check_columns(
        &self,
        database_name: &str,
        table_name: &str,
        columns: &[MaskColumnRuleConfiguration],
        algorithms: &HashMap<String, AlgorithmConfiguration>,
    ) -> Result<(), ConfigurationError> {
        for column in columns {
            if !algorithms.contains_key(&column.mask_algorithm) {
                return Err(ConfigurationError::AlgorithmNotFoundOnColumn {
                    rule_type: RULE_TYPE.to_string(),
                    algorithm: column.mask_algorithm.clone(),
                    database_name: database_name.to_string(),
                    table: table_name.to_string(),
                    column: column.logic_column.clone(),
                });
            }
        }
        Ok(())
    }
}
