use super::global_unit::USD_UNIT_ID;
use super::{create_entity, open_session, TestCase};
use crate::config::HarnessConfig;
use crate::lifecycle::{ensure, Failure, Test, UsageError};
use amatino::{
    AMType, Account, AccountArguments, AccountChanges, Create, Entity, GlobalUnit, Retrieve,
    Session, Update,
};
use async_trait::async_trait;

pub struct AccountTest {
    test: Test,
}

impl AccountTest {
    pub const NAME: &'static str = "Create, retrieve, update Account";

    pub fn new(config: HarnessConfig) -> Result<Self, UsageError> {
        Self::with_name(Self::NAME, config)
    }

    pub fn with_name(name: impl Into<String>, config: HarnessConfig) -> Result<Self, UsageError> {
        Ok(Self {
            test: Test::new(name, config)?,
        })
    }

    async fn create_account(session: &Session, entity: &Entity) -> Result<Account, Failure> {
        let usd = GlobalUnit::retrieve(session, &(), USD_UNIT_ID).await?;
        let arguments = AccountArguments::new("Test account", AMType::Asset, usd.denomination())?
            .with_description("A test Account created by the Rust test suite")?;
        Ok(Account::create(session, entity, arguments).await?)
    }

    async fn scenario(config: &HarnessConfig) -> Result<(), Failure> {
        let session = open_session(config).await?;
        let entity = create_entity(&session).await?;

        let created = Self::create_account(&session, &entity).await?;

        let retrieved = Account::retrieve(&session, &entity, created.id).await?;
        ensure(retrieved.id == created.id, "Account IDs do not match")?;

        let new_name = "Updated account name";
        let updated = retrieved
            .update(&session, AccountChanges::new().with_name(new_name))
            .await?;
        ensure(updated.name == new_name, "Account name was not updated")?;

        Ok(())
    }
}

#[async_trait]
impl TestCase for AccountTest {
    fn test(&self) -> &Test {
        &self.test
    }

    async fn execute(&mut self) -> Result<(), UsageError> {
        let outcome = Self::scenario(self.test.config()).await;
        self.test.conclude(outcome)
    }
}
