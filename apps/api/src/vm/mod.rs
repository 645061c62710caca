//! Document-analysis VM passthrough.
//!
//! The VM owns parsing, skill extraction and job matching. This client forwards requests
//! verbatim and hands back the remote status and body untouched. Only an unreachable VM is
//! an error here (502); non-2xx responses from a reachable VM are passed through as-is.

pub mod handlers;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

use crate::errors::AppError;

/// Remote status + body, replayed to the caller with a JSON content type.
#[derive(Debug)]
pub struct VmResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for VmResponse {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

#[derive(Clone)]
pub struct VmClient {
    client: Client,
    base_url: Url,
}

impl VmClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Appends escaped path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("VM_API_URL cannot be a base URL")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn forward(&self, request: RequestBuilder) -> Result<VmResponse, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::VmUnreachable(e.to_string()))?;

        // reqwest and axum sit on different `http` versions; go through the raw code.
        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| AppError::VmUnreachable(e.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::VmUnreachable(e.to_string()))?;

        debug!("VM responded {status} ({} bytes)", body.len());
        Ok(VmResponse { status, body })
    }

    /// POST /analyze — raw multipart body, forwarded with the caller's content type.
    pub async fn analyze(&self, content_type: &str, body: Bytes) -> Result<VmResponse, AppError> {
        let request = self
            .client
            .post(self.url(&["analyze"])?)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        self.forward(request).await
    }

    /// GET /documents
    pub async fn list_documents(&self) -> Result<VmResponse, AppError> {
        let request = self.client.get(self.url(&["documents"])?);
        self.forward(request).await
    }

    /// DELETE /documents/{id}
    pub async fn delete_document(&self, id: &str) -> Result<VmResponse, AppError> {
        let request = self.client.delete(self.url(&["documents", id])?);
        self.forward(request).await
    }

    /// POST /match-job — JSON body forwarded unchanged.
    pub async fn match_job(&self, body: Bytes) -> Result<VmResponse, AppError> {
        let request = self
            .client
            .post(self.url(&["match-job"])?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.forward(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(url: &str) -> VmClient {
        VmClient::new(Client::new(), Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_match_job_forwards_body_and_status_verbatim() {
        let mut server = Server::new_async().await;
        let results = r#"[{"filename":"resume.pdf","confidence":0.82,"matchedSkills":["rust"],"missingSkills":["go"],"skillMatchPercent":50}]"#;
        let mock = server
            .mock("POST", "/match-job")
            .match_header("content-type", "application/json")
            .match_body(r#"{"jobDescription":"Rust engineer"}"#)
            .with_status(200)
            .with_body(results)
            .expect(1)
            .create_async()
            .await;

        let response = client_for(&server.url())
            .match_job(Bytes::from_static(br#"{"jobDescription":"Rust engineer"}"#))
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Bytes::from(results));
    }

    #[tokio::test]
    async fn test_remote_error_status_is_passed_through() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/documents")
            .with_status(503)
            .with_body(r#"{"error":"index rebuilding"}"#)
            .create_async()
            .await;

        let response = client_for(&server.url()).list_documents().await.unwrap();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.body, Bytes::from_static(br#"{"error":"index rebuilding"}"#));
    }

    #[tokio::test]
    async fn test_delete_keeps_base_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/documents/5f2b9c")
            .with_status(200)
            .with_body(r#"{"deleted":true}"#)
            .expect(1)
            .create_async()
            .await;

        let response = client_for(&format!("{}/api/", server.url()))
            .delete_document("5f2b9c")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_keeps_multipart_content_type() {
        let mut server = Server::new_async().await;
        let content_type = "multipart/form-data; boundary=XyZ";
        let body = "--XyZ\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.txt\"\r\n\r\nRust\r\n--XyZ--\r\n";
        let mock = server
            .mock("POST", "/analyze")
            .match_header("content-type", content_type)
            .match_body(Matcher::Exact(body.to_string()))
            .with_status(201)
            .with_body(r#"{"id":"doc-1"}"#)
            .expect(1)
            .create_async()
            .await;

        let response = client_for(&server.url())
            .analyze(content_type, Bytes::from(body))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[test]
    fn test_document_id_is_a_single_escaped_segment() {
        let client = client_for("http://10.0.0.4:5000");
        let url = client.url(&["documents", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.4:5000/documents/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_unreachable_vm_is_error() {
        // Grab a free port and release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = client_for(&format!("http://127.0.0.1:{port}"))
            .list_documents()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::VmUnreachable(_)));
    }

    #[tokio::test]
    async fn test_stalled_vm_is_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let http = Client::builder()
            .timeout(std::time::Duration::from_millis(50))
            .build()
            .unwrap();
        let base = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();

        let err = VmClient::new(http, base).list_documents().await.unwrap_err();

        assert!(matches!(err, AppError::VmUnreachable(_)), "got {err:?}");
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
        drop(listener);
    }
}

