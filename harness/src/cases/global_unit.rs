use super::{open_session, TestCase};
use crate::config::HarnessConfig;
use crate::lifecycle::{ensure, Failure, Test, UsageError};
use amatino::{GlobalUnit, Retrieve};
use async_trait::async_trait;

pub const USD_UNIT_ID: i64 = 5;

pub struct GlobalUnitTest {
    test: Test,
}

impl GlobalUnitTest {
    pub const NAME: &'static str = "Retrieve Global Unit";

    pub fn new(config: HarnessConfig) -> Result<Self, UsageError> {
        Ok(Self {
            test: Test::new(Self::NAME, config)?,
        })
    }

    async fn scenario(config: &HarnessConfig) -> Result<(), Failure> {
        let session = open_session(config).await?;
        let usd = GlobalUnit::retrieve(&session, &(), USD_UNIT_ID).await?;

        ensure(usd.id == USD_UNIT_ID, "Global Unit IDs do not match")?;
        ensure(
            usd.code == "USD",
            format!("Expected code USD, got {}", usd.code),
        )?;
        Ok(())
    }
}

#[async_trait]
impl TestCase for GlobalUnitTest {
    fn test(&self) -> &Test {
        &self.test
    }

    async fn execute(&mut self) -> Result<(), UsageError> {
        let outcome = Self::scenario(self.test.config()).await;
        self.test.conclude(outcome)
    }
}
