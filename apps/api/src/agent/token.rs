//! Client-credential exchange against the identity service.

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::errors::UpstreamError;

const IDENTITY_SERVICE: &str = "Identity service";

/// Audience of every token requested for the hosted agent.
pub const AGENT_SCOPE: &str = "https://ai.azure.com/.default";

#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct TokenProvider {
    client: Client,
    authority_host: Url,
    credentials: ClientCredentials,
}

impl TokenProvider {
    pub fn new(client: Client, authority_host: Url, credentials: ClientCredentials) -> Self {
        Self {
            client,
            authority_host,
            credentials,
        }
    }

    fn token_url(&self) -> Result<Url, UpstreamError> {
        let mut url = self.authority_host.clone();
        url.path_segments_mut()
            .map_err(|_| {
                UpstreamError::malformed(IDENTITY_SERVICE, "authority host cannot be a base URL")
            })?
            .pop_if_empty()
            .extend([
                self.credentials.tenant_id.as_str(),
                "oauth2",
                "v2.0",
                "token",
            ]);
        Ok(url)
    }

    /// Exchanges the client secret for a bearer token scoped to `AGENT_SCOPE`.
    /// A fresh token is requested on every call.
    pub async fn fetch_token(&self) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(self.token_url()?)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("scope", AGENT_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(IDENTITY_SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: IDENTITY_SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(IDENTITY_SERVICE, e))?;
        Ok(token.access_token)
    }
}
