use crate::config::ApiConfig;
use crate::error::{AmatinoError, AmatinoResult};
use crate::signature::Signature;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

const SESSION_PATH: &str = "/session";

#[derive(Serialize)]
struct NewSessionRequest<'a> {
    secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
}

#[derive(Deserialize)]
struct NewSessionResponse {
    session_id: i64,
    api_key: String,
    user_id: i64,
}

/// An authenticated connection to the Amatino API.
///
/// Every domain operation takes a `&Session`; the session signs each request
/// with its api key.
pub struct Session {
    http_client: reqwest::Client,
    base_url: String,
    session_id: i64,
    api_key: String,
    user_id: i64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub async fn create_with_email(
        config: &ApiConfig,
        email: &str,
        secret: &str,
    ) -> AmatinoResult<Self> {
        if email.trim().is_empty() {
            return Err(AmatinoError::invalid_argument("email cannot be empty"));
        }

        Self::create(
            config,
            NewSessionRequest {
                secret,
                email: Some(email),
                user_id: None,
            },
        )
        .await
    }

    pub async fn create_with_user_id(
        config: &ApiConfig,
        user_id: i64,
        secret: &str,
    ) -> AmatinoResult<Self> {
        Self::create(
            config,
            NewSessionRequest {
                secret,
                email: None,
                user_id: Some(user_id),
            },
        )
        .await
    }

    async fn create(config: &ApiConfig, request: NewSessionRequest<'_>) -> AmatinoResult<Self> {
        config
            .validate()
            .map_err(|message| AmatinoError::InvalidConfig { message })?;

        if request.secret.is_empty() {
            return Err(AmatinoError::invalid_argument("secret cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AmatinoError::InvalidConfig {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let base_url = config.normalized_base_url().to_string();
        let url = format!("{}{}", base_url, SESSION_PATH);

        debug!("Creating session at {}", url);

        let response = http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(AmatinoError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Session creation rejected with status {}", status);
            return Err(AmatinoError::from_status(status, SESSION_PATH, error_text));
        }

        let created: NewSessionResponse = response.json().await.map_err(AmatinoError::Network)?;

        info!(
            "Session {} created for user {}",
            created.session_id, created.user_id
        );

        Ok(Self {
            http_client,
            base_url,
            session_id: created.session_id,
            api_key: created.api_key,
            user_id: created.user_id,
        })
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// End the session server-side. The api key is unusable afterwards.
    pub async fn delete(self) -> AmatinoResult<()> {
        let session_id = self.session_id;
        self.send(Method::DELETE, SESSION_PATH, &[], None).await?;
        info!("Session {} deleted", session_id);
        Ok(())
    }

    /// Perform a signed request and decode the JSON response.
    pub(crate) async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> AmatinoResult<R> {
        let body_text = body.map(serde_json::to_string).transpose()?;
        let text = self.send(method, path, query, body_text).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> AmatinoResult<String> {
        let signature = Signature::sign(
            &self.api_key,
            chrono::Utc::now().timestamp(),
            path,
            body.as_deref(),
        )?;

        let url = format!("{}{}", self.base_url, path);
        debug!("{} {} (session {})", method, url, self.session_id);

        let mut builder = self
            .http_client
            .request(method, &url)
            .header("X-Session-ID", self.session_id.to_string())
            .header("X-Timestamp", signature.timestamp().to_string())
            .header("X-Signature", signature.as_str());

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(body) = body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(AmatinoError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("{} returned {}", path, status);
            return Err(AmatinoError::from_status(status, path, error_text));
        }

        response.text().await.map_err(AmatinoError::Network)
    }
}
