use super::{create_entity, open_session, TestCase};
use crate::config::HarnessConfig;
use crate::lifecycle::{ensure, Failure, Test, UsageError};
use amatino::{Entity, EntityChanges, Retrieve, Update};
use async_trait::async_trait;

pub struct EntityTest {
    test: Test,
}

impl EntityTest {
    pub const NAME: &'static str = "Create, retrieve, update Entity";

    pub fn new(config: HarnessConfig) -> Result<Self, UsageError> {
        Ok(Self {
            test: Test::new(Self::NAME, config)?,
        })
    }

    async fn scenario(config: &HarnessConfig) -> Result<(), Failure> {
        let session = open_session(config).await?;
        let created = create_entity(&session).await?;

        let retrieved = Entity::retrieve(&session, &(), created.id).await?;
        ensure(retrieved.id == created.id, "Entity IDs do not match")?;

        let new_name = "Updated entity name";
        let updated = retrieved
            .update(&session, EntityChanges::new().with_name(new_name))
            .await?;
        ensure(updated.name == new_name, "Entity name was not updated")?;

        Ok(())
    }
}

#[async_trait]
impl TestCase for EntityTest {
    fn test(&self) -> &Test {
        &self.test
    }

    async fn execute(&mut self) -> Result<(), UsageError> {
        let outcome = Self::scenario(self.test.config()).await;
        self.test.conclude(outcome)
    }
}
