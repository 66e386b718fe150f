use crate::cases::{AccountTest, EntityTest, GlobalUnitTest, SessionTest, TestCase};
use crate::config::{ConfigError, HarnessConfig};
use crate::lifecycle::UsageError;
use std::fmt;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Test usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("Unknown test case: {name}")]
    UnknownCase { name: String },
}

pub type HarnessResult<T> = Result<T, HarnessError>;

/// Ordered collection of test cases, executed one at a time.
pub struct Suite {
    cases: Vec<Box<dyn TestCase>>,
}

impl Suite {
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// The primary object cases, in dependency order.
    pub fn with_default_cases(config: &HarnessConfig) -> HarnessResult<Self> {
        let mut suite = Self::new();
        suite.register(Box::new(SessionTest::new(config.clone())?));
        suite.register(Box::new(GlobalUnitTest::new(config.clone())?));
        suite.register(Box::new(EntityTest::new(config.clone())?));
        suite.register(Box::new(AccountTest::new(config.clone())?));
        Ok(suite)
    }

    pub fn register(&mut self, case: Box<dyn TestCase>) {
        self.cases.push(case);
    }

    pub fn list_cases(&self) -> Vec<&str> {
        self.cases.iter().map(|case| case.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Keep only the named cases. Every name must match a registered case.
    pub fn retain(&mut self, names: &[String]) -> HarnessResult<()> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.cases.iter().any(|case| case.name() == name.as_str()))
        {
            return Err(HarnessError::UnknownCase {
                name: unknown.clone(),
            });
        }

        self.cases
            .retain(|case| names.iter().any(|name| name == case.name()));
        Ok(())
    }

    pub async fn run(&mut self) -> HarnessResult<SuiteReport> {
        let mut report = SuiteReport::default();

        for case in self.cases.iter_mut() {
            info!("Running {}", case.name());
            case.execute().await?;

            report.reports.push(case.report()?);
            match case.test().passed() {
                Some(true) => report.passed += 1,
                _ => report.failed += 1,
            }
        }

        info!(
            "Suite finished: {} passed, {} failed",
            report.passed, report.failed
        );
        Ok(report)
    }
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub reports: Vec<String>,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{}", report)?;
        }
        write!(f, "{} passed, {} failed", self.passed, self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::tests::config;
    use crate::lifecycle::Test;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Behaviour {
        Pass,
        Fail(&'static str),
        Forget,
    }

    struct MockCase {
        test: Test,
        behaviour: Behaviour,
        order: Arc<AtomicUsize>,
        ran_at: Option<usize>,
    }

    impl MockCase {
        fn boxed(name: &str, behaviour: Behaviour, order: &Arc<AtomicUsize>) -> Box<Self> {
            Box::new(Self {
                test: Test::new(name, config()).unwrap(),
                behaviour,
                order: Arc::clone(order),
                ran_at: None,
            })
        }
    }

    #[async_trait]
    impl TestCase for MockCase {
        fn test(&self) -> &Test {
            &self.test
        }

        async fn execute(&mut self) -> Result<(), UsageError> {
            self.ran_at = Some(self.order.fetch_add(1, Ordering::SeqCst));
            match self.behaviour {
                Behaviour::Pass => self.test.record_success(None),
                Behaviour::Fail(note) => self.test.record_failure(Some(note.into())),
                Behaviour::Forget => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_run_collects_reports_in_order() {
        let order = Arc::new(AtomicUsize::new(0));
        let mut suite = Suite::new();
        suite.register(MockCase::boxed("first", Behaviour::Pass, &order));
        suite.register(MockCase::boxed("second", Behaviour::Fail("broken"), &order));
        suite.register(MockCase::boxed("third", Behaviour::Pass, &order));

        let report = suite.run().await.unwrap();

        assert_eq!(
            report.reports,
            vec![
                "[PASS] first".to_string(),
                "[FAIL] second\n       broken".to_string(),
                "[PASS] third".to_string(),
            ]
        );
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        assert_eq!(order.load(Ordering::SeqCst), 3);
        assert_eq!(
            report.to_string(),
            "[PASS] first\n[FAIL] second\n       broken\n[PASS] third\n2 passed, 1 failed"
        );
    }

    #[tokio::test]
    async fn test_case_without_outcome_aborts_run() {
        let order = Arc::new(AtomicUsize::new(0));
        let mut suite = Suite::new();
        suite.register(MockCase::boxed("forgetful", Behaviour::Forget, &order));
        suite.register(MockCase::boxed("never reached", Behaviour::Pass, &order));

        let result = suite.run().await;
        assert!(matches!(
            result,
            Err(HarnessError::Usage(UsageError::Incomplete { .. }))
        ));
        assert_eq!(order.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_cases() {
        let suite = Suite::with_default_cases(&config()).unwrap();
        assert_eq!(
            suite.list_cases(),
            vec![
                SessionTest::NAME,
                GlobalUnitTest::NAME,
                EntityTest::NAME,
                AccountTest::NAME,
            ]
        );
    }

    #[test]
    fn test_retain() {
        let mut suite = Suite::with_default_cases(&config()).unwrap();
        suite
            .retain(&[AccountTest::NAME.to_string()])
            .unwrap();
        assert_eq!(suite.list_cases(), vec![AccountTest::NAME]);

        let mut suite = Suite::with_default_cases(&config()).unwrap();
        assert!(matches!(
            suite.retain(&["Nonexistent".to_string()]),
            Err(HarnessError::UnknownCase { name }) if name == "Nonexistent"
        ));
        assert_eq!(suite.len(), 4);
    }

    #[test]
    fn test_config_error_becomes_harness_error() {
        fn resolve() -> HarnessResult<HarnessConfig> {
            Ok(HarnessConfig::from_lookup(|_| None)?)
        }

        let err = resolve().unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Config(ConfigError::MissingVariable { .. })
        ));
        assert_eq!(
            err.to_string(),
            "Configuration error: AMATINO_TEST_USER_ID env variable required"
        );
    }

    #[tokio::test]
    async fn test_empty_suite() {
        let mut suite = Suite::default();
        assert!(suite.is_empty());
        let report = suite.run().await.unwrap();
        assert!(report.all_passed());
        assert_eq!(report.to_string(), "0 passed, 0 failed");
    }
}
