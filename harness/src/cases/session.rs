use super::{open_session, TestCase};
use crate::config::HarnessConfig;
use crate::lifecycle::{ensure, Failure, Test, UsageError};
use amatino::Session;
use async_trait::async_trait;

pub struct SessionTest {
    test: Test,
}

impl SessionTest {
    pub const NAME: &'static str = "Create, delete Session";

    pub fn new(config: HarnessConfig) -> Result<Self, UsageError> {
        Ok(Self {
            test: Test::new(Self::NAME, config)?,
        })
    }

    async fn scenario(config: &HarnessConfig) -> Result<(), Failure> {
        let expected_user = config.credentials.user_id;

        let by_email = open_session(config).await?;
        Self::check_and_delete(by_email, expected_user, "Email").await?;

        let by_user_id =
            Session::create_with_user_id(&config.api, expected_user, &config.credentials.secret)
                .await?;
        Self::check_and_delete(by_user_id, expected_user, "User ID").await
    }

    /// Check the session owner, then delete the session whatever the check
    /// found. A failed check wins over a failed delete.
    async fn check_and_delete(
        session: Session,
        expected_user: i64,
        kind: &str,
    ) -> Result<(), Failure> {
        let check = ensure(
            session.user_id() == expected_user,
            format!(
                "{} session belongs to user {}, expected {}",
                kind,
                session.user_id(),
                expected_user
            ),
        );
        let deleted = session.delete().await;
        check?;
        Ok(deleted?)
    }
}

#[async_trait]
impl TestCase for SessionTest {
    fn test(&self) -> &Test {
        &self.test
    }

    async fn execute(&mut self) -> Result<(), UsageError> {
        let outcome = Self::scenario(self.test.config()).await;
        self.test.conclude(outcome)
    }
}
