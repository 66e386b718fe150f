//! Capabilities shared by the API's primary objects.
//!
//! Objects are immutable snapshots of server state. `update` returns a fresh
//! snapshot instead of modifying the receiver; re-fetch with `retrieve` to
//! observe changes made elsewhere.

use crate::error::AmatinoResult;
use crate::session::Session;
use async_trait::async_trait;

#[async_trait]
pub trait Create: Sized {
    /// Object the new one is created inside of, `()` for top-level objects.
    type Scope: Sync + ?Sized;
    type Arguments: Send;

    async fn create(
        session: &Session,
        scope: &Self::Scope,
        arguments: Self::Arguments,
    ) -> AmatinoResult<Self>;
}

#[async_trait]
pub trait Retrieve: Sized {
    type Scope: Sync + ?Sized;

    async fn retrieve(session: &Session, scope: &Self::Scope, id: i64) -> AmatinoResult<Self>;
}

#[async_trait]
pub trait Update: Sized {
    type Changes: Send;

    async fn update(&self, session: &Session, changes: Self::Changes) -> AmatinoResult<Self>;
}
