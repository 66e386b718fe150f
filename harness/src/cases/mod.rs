//! Concrete test cases run against a live Amatino backend.
//!
//! Every case owns its own [`Test`] and opens its own session, so cases share
//! no state and can run in any order.

pub mod account;
pub mod entity;
pub mod global_unit;
pub mod session;

pub use account::AccountTest;
pub use entity::EntityTest;
pub use global_unit::GlobalUnitTest;
pub use session::SessionTest;

use crate::config::HarnessConfig;
use crate::lifecycle::{Test, UsageError};
use amatino::{AmatinoResult, Create, Entity, EntityArguments, Session};
use async_trait::async_trait;
use uuid::Uuid;

/// A scenario with a recorded pass/fail outcome.
///
/// `execute` must record exactly one outcome on every path before it
/// returns; the only errors it may return are lifecycle misuse.
#[async_trait]
pub trait TestCase: Send {
    fn test(&self) -> &Test;

    async fn execute(&mut self) -> Result<(), UsageError>;

    fn name(&self) -> &str {
        self.test().name()
    }

    fn report(&self) -> Result<String, UsageError> {
        self.test().report()
    }
}

pub(crate) async fn open_session(config: &HarnessConfig) -> AmatinoResult<Session> {
    Session::create_with_email(
        &config.api,
        &config.credentials.email,
        &config.credentials.secret,
    )
    .await
}

/// Create a throwaway entity for cases that need somewhere to put objects.
pub(crate) async fn create_entity(session: &Session) -> AmatinoResult<Entity> {
    let arguments = EntityArguments::new(format!("Test entity {}", Uuid::new_v4()))?
        .with_description("An Entity created by the Rust test suite")?;
    Entity::create(session, &(), arguments).await
}
