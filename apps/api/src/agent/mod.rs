//! Hosted agent client — token-authenticated single POST to a pre-deployed agent endpoint.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use tracing::debug;

use crate::chat::service::AgentBackend;
use crate::errors::UpstreamError;

pub mod token;

use token::TokenProvider;

const AGENT_SERVICE: &str = "Hosted agent";
/// The agent endpoint expects the bearer token repeated in this header.
const USER_TOKEN_HEADER: &str = "aml-user-token";

#[derive(Clone)]
pub struct AgentClient {
    client: Client,
    endpoint: Url,
    tokens: TokenProvider,
}

impl AgentClient {
    pub fn new(client: Client, endpoint: Url, tokens: TokenProvider) -> Self {
        Self {
            client,
            endpoint,
            tokens,
        }
    }
}

#[async_trait]
impl AgentBackend for AgentClient {
    async fn respond(&self, message: &str) -> Result<Value, UpstreamError> {
        let token = self.tokens.fetch_token().await?;
        debug!("Hosted agent token acquired");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&token)
            .header(USER_TOKEN_HEADER, &token)
            .json(&json!({ "input": [{ "role": "user", "content": message }] }))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(AGENT_SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                service: AGENT_SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(AGENT_SERVICE, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::token::ClientCredentials;
    use crate::chat::normalize::agent_reply;
    use mockito::{Matcher, Server, ServerGuard};

    async fn token_mock(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/tenant/oauth2/v2.0/token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok-abc","expires_in":3599}"#)
            .create_async()
            .await
    }

    fn client_for(server: &ServerGuard) -> AgentClient {
        let base = Url::parse(&server.url()).unwrap();
        let tokens = TokenProvider::new(
            Client::new(),
            base.clone(),
            ClientCredentials {
                tenant_id: "tenant".to_string(),
                client_id: "client".to_string(),
                client_secret: "secret".to_string(),
            },
        );
        AgentClient::new(Client::new(), base.join("agents/resume/responses").unwrap(), tokens)
    }

    #[tokio::test]
    async fn test_agent_call_carries_token_in_both_headers() {
        let mut server = Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let agent = server
            .mock("POST", "/agents/resume/responses")
            .match_header("authorization", "Bearer tok-abc")
            .match_header("aml-user-token", "tok-abc")
            .match_body(Matcher::Json(json!({
                "input": [{ "role": "user", "content": "What skills am I missing?" }]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "output": [{
                        "type": "message",
                        "role": "assistant",
                        "content": [{ "type": "output_text", "text": "Hello" }]
                    }]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let response = client_for(&server)
            .respond("What skills am I missing?")
            .await
            .unwrap();
        agent.assert_async().await;
        assert_eq!(agent_reply(&response).text, "Hello");
    }

    #[tokio::test]
    async fn test_agent_failure_includes_status_and_body() {
        let mut server = Server::new_async().await;
        let _token = token_mock(&mut server).await;
        let _agent = server
            .mock("POST", "/agents/resume/responses")
            .with_status(403)
            .with_body("principal lacks agent access")
            .create_async()
            .await;

        let err = client_for(&server).respond("hi").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Hosted agent returned 403: principal lacks agent access"
        );
    }

    #[tokio::test]
    async fn test_token_failure_skips_agent_call() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/tenant/oauth2/v2.0/token")
            .with_status(400)
            .with_body("AADSTS7000215")
            .create_async()
            .await;
        let agent = server
            .mock("POST", "/agents/resume/responses")
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server).respond("hi").await.unwrap_err();
        agent.assert_async().await;
        assert!(matches!(err, UpstreamError::Status { status: 400, .. }));
    }
}
