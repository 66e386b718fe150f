use crate::entity::Entity;
use crate::error::AmatinoResult;
use crate::object::{Create, Retrieve, Update};
use crate::session::Session;
use crate::types::{
    single, validate_colour, validate_description, validate_name, AMType, Denomination,
};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

const ACCOUNT_PATH: &str = "/accounts";

/// A ledger account inside an entity, denominated in a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub entity_id: i64,
    pub name: String,
    pub am_type: AMType,
    pub description: Option<String>,
    pub parent_account_id: Option<i64>,
    pub denomination: Denomination,
    pub colour: Option<String>,
}

#[derive(Deserialize)]
struct AccountPayload {
    account_id: i64,
    name: String,
    #[serde(rename = "type")]
    am_type: AMType,
    description: Option<String>,
    parent_account_id: Option<i64>,
    global_unit_id: Option<i64>,
    custom_unit_id: Option<i64>,
    colour: Option<String>,
}

impl Account {
    fn from_payload(entity_id: i64, payload: AccountPayload) -> AmatinoResult<Self> {
        Ok(Self {
            id: payload.account_id,
            entity_id,
            name: payload.name,
            am_type: payload.am_type,
            description: payload.description,
            parent_account_id: payload.parent_account_id,
            denomination: Denomination::from_wire(payload.global_unit_id, payload.custom_unit_id)?,
            colour: payload.colour,
        })
    }

    fn from_response(
        entity_id: i64,
        payloads: Vec<AccountPayload>,
        what: &str,
    ) -> AmatinoResult<Self> {
        Self::from_payload(entity_id, single(payloads, what)?)
    }

    fn entity_query(entity_id: i64) -> Vec<(&'static str, String)> {
        vec![("entity_id", entity_id.to_string())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountArguments {
    name: String,
    am_type: AMType,
    denomination: Denomination,
    description: Option<String>,
    parent_account_id: Option<i64>,
    colour: Option<String>,
}

impl AccountArguments {
    pub fn new(
        name: impl Into<String>,
        am_type: AMType,
        denomination: Denomination,
    ) -> AmatinoResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            am_type,
            denomination,
            description: None,
            parent_account_id: None,
            colour: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> AmatinoResult<Self> {
        let description = description.into();
        validate_description(Some(&description))?;
        self.description = Some(description);
        Ok(self)
    }

    pub fn with_parent(mut self, parent_account_id: i64) -> Self {
        self.parent_account_id = Some(parent_account_id);
        self
    }

    pub fn with_colour(mut self, colour: impl Into<String>) -> AmatinoResult<Self> {
        let colour = colour.into();
        validate_colour(Some(&colour))?;
        self.colour = Some(colour);
        Ok(self)
    }
}

/// Fields to change on an existing account. Unset fields keep their current
/// value. For nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub am_type: Option<AMType>,
    pub description: Option<Option<String>>,
    pub parent_account_id: Option<Option<i64>>,
    pub denomination: Option<Denomination>,
    pub colour: Option<Option<String>>,
}

impl AccountChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_am_type(mut self, am_type: AMType) -> Self {
        self.am_type = Some(am_type);
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

    pub fn with_parent(mut self, parent_account_id: i64) -> Self {
        self.parent_account_id = Some(Some(parent_account_id));
        self
    }

    /// Move the account to the top level of its entity's tree.
    pub fn clear_parent(mut self) -> Self {
        self.parent_account_id = Some(None);
        self
    }

    pub fn with_denomination(mut self, denomination: Denomination) -> Self {
        self.denomination = Some(denomination);
        self
    }

    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(Some(colour.into()));
        self
    }

    pub fn clear_colour(mut self) -> Self {
        self.colour = Some(None);
        self
    }
}

#[async_trait]
impl Create for Account {
    type Scope = Entity;
    type Arguments = AccountArguments;

    async fn create(
        session: &Session,
        entity: &Entity,
        arguments: AccountArguments,
    ) -> AmatinoResult<Self> {
        let body = json!([{
            "name": arguments.name,
            "type": arguments.am_type,
            "parent_account_id": arguments.parent_account_id,
            "global_unit_id": arguments.denomination.global_unit_id(),
            "custom_unit_id": arguments.denomination.custom_unit_id(),
            "counterparty_entity_id": null,
            "description": arguments.description,
            "colour": arguments.colour,
        }]);

        let payloads: Vec<AccountPayload> = session
            .request(
                Method::POST,
                ACCOUNT_PATH,
                &Self::entity_query(entity.id),
                Some(&body),
            )
            .await?;
        let account = Self::from_response(entity.id, payloads, "the created account")?;

        info!("Created account {} in entity {}", account.id, entity.id);
        Ok(account)
    }
}

#[async_trait]
impl Retrieve for Account {
    type Scope = Entity;

    async fn retrieve(session: &Session, entity: &Entity, id: i64) -> AmatinoResult<Self> {
        let mut query = Self::entity_query(entity.id);
        query.push(("account_id", id.to_string()));

        let payloads: Vec<AccountPayload> = session
            .request(Method::GET, ACCOUNT_PATH, &query, None)
            .await?;
        Self::from_response(entity.id, payloads, "the requested account")
    }
}

#[async_trait]
impl Update for Account {
    type Changes = AccountChanges;

    async fn update(&self, session: &Session, changes: AccountChanges) -> AmatinoResult<Self> {
        let name = changes.name.unwrap_or_else(|| self.name.clone());
        validate_name(&name)?;
        let description = changes
            .description
            .unwrap_or_else(|| self.description.clone());
        validate_description(description.as_deref())?;
        let colour = changes.colour.unwrap_or_else(|| self.colour.clone());
        validate_colour(colour.as_deref())?;
        let denomination = changes.denomination.unwrap_or(self.denomination);

        let body = json!([{
            "account_id": self.id,
            "name": name,
            "type": changes.am_type.unwrap_or(self.am_type),
            "parent_account_id": changes.parent_account_id.unwrap_or(self.parent_account_id),
            "global_unit_id": denomination.global_unit_id(),
            "custom_unit_id": denomination.custom_unit_id(),
            "counterparty_entity_id": null,
            "description": description,
            "colour": colour,
        }]);

        let payloads: Vec<AccountPayload> = session
            .request(
                Method::PUT,
                ACCOUNT_PATH,
                &Self::entity_query(self.entity_id),
                Some(&body),
            )
            .await?;
        let updated = Self::from_response(self.entity_id, payloads, "the updated account")?;

        info!("Updated account {} in entity {}", updated.id, self.entity_id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmatinoError;
    use crate::session::tests::mock_session;
    use mockito::Matcher;

    fn entity() -> Entity {
        Entity {
            id: 11,
            owner_id: 7,
            name: "Test entity".to_string(),
            description: None,
            region_id: None,
        }
    }

    fn account_body(name: &str) -> String {
        serde_json::json!([{
            "account_id": 101,
            "name": name,
            "type": 1,
            "description": "A test Account",
            "parent_account_id": null,
            "global_unit_id": 5,
            "custom_unit_id": null,
            "counterparty_entity_id": null,
            "colour": null
        }])
        .to_string()
    }

    #[test]
    fn test_arguments_validation() {
        assert!(AccountArguments::new("", AMType::Asset, Denomination::Global(5)).is_err());

        let arguments = AccountArguments::new("Cash", AMType::Asset, Denomination::Global(5))
            .unwrap()
            .with_parent(3)
            .with_colour("ff0000")
            .unwrap();
        assert_eq!(arguments.parent_account_id, Some(3));
        assert_eq!(arguments.colour.as_deref(), Some("ff0000"));

        assert!(AccountArguments::new("Cash", AMType::Asset, Denomination::Global(5))
            .unwrap()
            .with_colour("red")
            .is_err());
    }

    #[tokio::test]
    async fn test_create_account() {
        let mut server = mockito::Server::new_async().await;
        let session = mock_session(&mut server).await;

        let mock = server
            .mock("POST", "/accounts")
            .match_query(Matcher::UrlEncoded("entity_id".into(), "11".into()))
            .match_body(Matcher::PartialJson(serde_json::json!([{
                "name": "Test account",
                "type": 1,
                "global_unit_id": 5,
                "custom_unit_id": null
            }])))
            .with_status(200)
            .with_body(account_body("Test account"))
            .create_async()
            .await;

        let arguments =
            AccountArguments::new("Test account", AMType::Asset, Denomination::Global(5))
                .unwrap()
                .with_description("A test Account")
                .unwrap();
        let account = Account::create(&session, &entity(), arguments).await.unwrap();

        mock.assert_async().await;
        assert_eq!(account.id, 101);
        assert_eq!(account.entity_id, 11);
        assert_eq!(account.am_type, AMType::Asset);
        assert_eq!(account.denomination, Denomination::Global(5));
    }

    #[tokio::test]
    async fn test_retrieve_account() {
        let mut server = mockito::Server::new_async().await;
        let session = mock_session(&mut server).await;

        let _mock = server
            .mock("GET", "/accounts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("entity_id".into(), "11".into()),
                Matcher::UrlEncoded("account_id".into(), "101".into()),
            ]))
            .with_status(200)
            .with_body(account_body("Test account"))
            .create_async()
            .await;

        let account = Account::retrieve(&session, &entity(), 101).await.unwrap();
        assert_eq!(account.id, 101);
        assert_eq!(account.description.as_deref(), Some("A test Account"));
    }

    #[tokio::test]
    async fn test_retrieve_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let session = mock_session(&mut server).await;

        let _mock = server
            .mock("GET", "/accounts")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let result = Account::retrieve(&session, &entity(), 101).await;
        assert!(matches!(
            result,
            Err(AmatinoError::UnexpectedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_account_name() {
        let mut server = mockito::Server::new_async().await;
        let session = mock_session(&mut server).await;

        let mock = server
            .mock("PUT", "/accounts")
            .match_query(Matcher::UrlEncoded("entity_id".into(), "11".into()))
            .match_body(Matcher::PartialJson(serde_json::json!([{
                "account_id": 101,
                "name": "Updated account name",
                "type": 1,
                "global_unit_id": 5
            }])))
            .with_status(200)
            .with_body(account_body("Updated account name"))
            .create_async()
            .await;

        let account = Account {
            id: 101,
            entity_id: 11,
            name: "Test account".to_string(),
            am_type: AMType::Asset,
            description: None,
            parent_account_id: None,
            denomination: Denomination::Global(5),
            colour: None,
        };
        let updated = account
            .update(&session, AccountChanges::new().with_name("Updated account name"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(updated.name, "Updated account name");
        assert_eq!(account.name, "Test account");
    }

    #[tokio::test]
    async fn test_update_clears_nullable_fields() {
        let mut server = mockito::Server::new_async().await;
        let session = mock_session(&mut server).await;

        let mock = server
            .mock("PUT", "/accounts")
            .match_query(Matcher::UrlEncoded("entity_id".into(), "11".into()))
            .match_body(Matcher::PartialJson(serde_json::json!([{
                "account_id": 101,
                "name": "Test account",
                "description": null,
                "parent_account_id": null,
                "colour": null
            }])))
            .with_status(200)
            .with_body(account_body("Test account"))
            .create_async()
            .await;

        let account = Account {
            id: 101,
            entity_id: 11,
            name: "Test account".to_string(),
            am_type: AMType::Asset,
            description: Some("Old description".to_string()),
            parent_account_id: Some(100),
            denomination: Denomination::Global(5),
            colour: Some("ff0000".to_string()),
        };
        let changes = AccountChanges::new()
            .clear_description()
            .clear_parent()
            .clear_colour();
        account.update(&session, changes).await.unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn test_unset_changes_keep_nullable_fields() {
        let changes = AccountChanges::new().with_name("Renamed");
        assert_eq!(changes.description, None);
        assert_eq!(changes.parent_account_id, None);
        assert_eq!(changes.colour, None);

        let changes = changes.with_parent(3).clear_colour();
        assert_eq!(changes.parent_account_id, Some(Some(3)));
        assert_eq!(changes.colour, Some(None));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let session = mock_session(&mut server).await;

        let _mock = server
            .mock("POST", "/accounts")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let arguments =
            AccountArguments::new("Test account", AMType::Asset, Denomination::Global(5)).unwrap();
        let result = Account::create(&session, &entity(), arguments).await;
        match result {
            Err(AmatinoError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
