pub mod account;
pub mod config;
pub mod entity;
pub mod error;
pub mod global_unit;
pub mod object;
pub mod session;
pub mod signature;
pub mod types;

pub use account::{Account, AccountArguments, AccountChanges};
pub use config::ApiConfig;
pub use entity::{Entity, EntityArguments, EntityChanges};
pub use error::{AmatinoError, AmatinoResult};
pub use global_unit::GlobalUnit;
pub use object::{Create, Retrieve, Update};
pub use session::Session;
pub use types::{AMType, Denomination};

pub mod prelude {
    pub use crate::account::*;
    pub use crate::config::*;
    pub use crate::entity::*;
    pub use crate::error::*;
    pub use crate::global_unit::*;
    pub use crate::object::*;
    pub use crate::session::*;
    pub use crate::types::*;
}
