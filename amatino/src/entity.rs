use crate::error::AmatinoResult;
use crate::object::{Create, Retrieve, Update};
use crate::session::Session;
use crate::types::{single, validate_description, validate_name};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

const ENTITY_PATH: &str = "/entities";

/// Top-level organisational object, for example a company or a household.
/// Every account and transaction lives inside exactly one entity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entity {
    #[serde(rename = "entity_id")]
    pub id: i64,
    #[serde(rename = "owner")]
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub region_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityArguments {
    name: String,
    description: Option<String>,
    region_id: Option<i64>,
}

impl EntityArguments {
    pub fn new(name: impl Into<String>) -> AmatinoResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            description: None,
            region_id: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> AmatinoResult<Self> {
        let description = description.into();
        validate_description(Some(&description))?;
        self.description = Some(description);
        Ok(self)
    }

    pub fn with_region(mut self, region_id: i64) -> Self {
        self.region_id = Some(region_id);
        self
    }
}

/// Fields to change on an existing entity. Unset fields keep their current
/// value; `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl EntityChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }
}

#[async_trait]
impl Create for Entity {
    type Scope = ();
    type Arguments = EntityArguments;

    async fn create(
        session: &Session,
        _scope: &(),
        arguments: EntityArguments,
    ) -> AmatinoResult<Self> {
        let body = json!([{
            "name": arguments.name,
            "description": arguments.description,
            "region_id": arguments.region_id,
        }]);

        let entities: Vec<Entity> = session
            .request(Method::POST, ENTITY_PATH, &[], Some(&body))
            .await?;
        let entity = single(entities, "the created entity")?;

        info!("Created entity {}", entity.id);
        Ok(entity)
    }
}

#[async_trait]
impl Retrieve for Entity {
    type Scope = ();

    async fn retrieve(session: &Session, _scope: &(), id: i64) -> AmatinoResult<Self> {
        let entities: Vec<Entity> = session
            .request(
                Method::GET,
                ENTITY_PATH,
                &[("entity_id", id.to_string())],
                None,
            )
            .await?;
        single(entities, "the requested entity")
    }
}

#[async_trait]
impl Update for Entity {
    type Changes = EntityChanges;

    async fn update(&self, session: &Session, changes: EntityChanges) -> AmatinoResult<Self> {
        let name = changes.name.unwrap_or_else(|| self.name.clone());
        validate_name(&name)?;
        let description = changes
            .description
            .unwrap_or_else(|| self.description.clone());
        validate_description(description.as_deref())?;

        let body = json!([{
            "entity_id": self.id,
            "name": name,
            "description": description,
        }]);

        let entities: Vec<Entity> = session
            .request(Method::PUT, ENTITY_PATH, &[], Some(&body))
            .await?;
        let updated = single(entities, "the updated entity")?;

        info!("Updated entity {}", updated.id);
        Ok(updated)
    }
}
