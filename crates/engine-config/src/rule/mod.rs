use crate::error::ConfigurationError;

pub mod mask;

/// Validates one kind of rule configuration when it is loaded.
///
/// Checkers run in ascending `order()`; the first failure aborts the load.
/// See [`run_checks`].
pub trait RuleConfigurationChecker {
    type Config;

    fn check(&self, database_name: &str, config: &Self::Config) -> Result<(), ConfigurationError>;

    fn order(&self) -> i32;
}

/// A checker bound to the configuration it validates.
pub struct PendingCheck<'a> {
    order: i32,
    run: Box<dyn FnOnce() -> Result<(), ConfigurationError> + 'a>,
}

impl<'a> PendingCheck<'a> {
    pub fn new<C>(checker: C, database_name: &'a str, config: &'a C::Config) -> Self
    where
        C: RuleConfigurationChecker + 'a,
    {
        Self {
            order: checker.order(),
            run: Box::new(move || checker.check(database_name, config)),
        }
    }
}

/// Runs the checks in ascending order, keeping registration order for ties.
/// Stops at the first failure.
pub fn run_checks(mut checks: Vec<PendingCheck<'_>>) -> Result<(), ConfigurationError> {
    checks.sort_by_key(|check| check.order);
    checks.into_iter().try_for_each(|check| (check.run)())
}
