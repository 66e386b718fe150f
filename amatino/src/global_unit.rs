use crate::error::AmatinoResult;
use crate::object::Retrieve;
use crate::session::Session;
use crate::types::{single, Denomination};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

const UNIT_PATH: &str = "/units";

/// A standardised unit of account available to every entity, for example a
/// major currency.
///
/// Global units are defined by the server and cannot be created or modified
/// by users, so only [`Retrieve`] is implemented.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GlobalUnit {
    #[serde(rename = "global_unit_id")]
    pub id: i64,
    pub code: String,
    pub name: String,
    pub priority: i64,
    pub description: String,
    pub exponent: u32,
}

impl GlobalUnit {
    pub fn denomination(&self) -> Denomination {
        Denomination::Global(self.id)
    }
}

#[async_trait]
impl Retrieve for GlobalUnit {
    type Scope = ();

    async fn retrieve(session: &Session, _scope: &(), id: i64) -> AmatinoResult<Self> {
        let units: Vec<GlobalUnit> = session
            .request(
                Method::GET,
                UNIT_PATH,
                &[("global_unit_id", id.to_string())],
                None,
            )
            .await?;
        single(units, "the requested global unit")
    }
}
