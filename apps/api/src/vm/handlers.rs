use axum::{
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap},
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::state::AppState;
use crate::vm::VmResponse;

/// Returns the boundary parameter of a `multipart/*` content type, if it has a non-empty one.
fn multipart_boundary(content_type: &str) -> Option<&str> {
    let (media_type, params) = content_type.split_once(';')?;
    let media_type = media_type.trim();
    if !media_type
        .get(..10)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/"))
    {
        return None;
    }

    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|boundary| !boundary.is_empty())
}

/// POST /vm/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<VmResponse, AppError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if multipart_boundary(content_type).is_none() {
        return Err(AppError::Validation(
            "No multipart boundary found".to_string(),
        ));
    }

    state.vm.analyze(content_type, body?).await
}

/// GET /vm/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
) -> Result<VmResponse, AppError> {
    state.vm.list_documents().await
}

/// DELETE /vm/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<VmResponse, AppError> {
    let Path(id) = id?;
    state.vm.delete_document(&id).await
}

/// POST /vm/match-job
pub async fn handle_match_job(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<VmResponse, AppError> {
    state.vm.match_job(body?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_extracted_from_multipart_content_type() {
        assert_eq!(
            multipart_boundary("multipart/form-data; boundary=----WebKitFormBoundary7MA4"),
            Some("----WebKitFormBoundary7MA4")
        );
        assert_eq!(
            multipart_boundary("Multipart/Form-Data; charset=utf-8; Boundary=\"XyZ\""),
            Some("XyZ")
        );
    }

    #[test]
    fn test_empty_boundary_rejected() {
        assert_eq!(multipart_boundary("multipart/form-data; boundary="), None);
        assert_eq!(multipart_boundary("multipart/form-data; boundary=\"\""), None);
        assert_eq!(multipart_boundary("multipart/form-data"), None);
    }

    #[test]
    fn test_non_multipart_media_type_rejected() {
        assert_eq!(multipart_boundary("application/json; boundary=XyZ"), None);
        assert_eq!(multipart_boundary("text/plain"), None);
        assert_eq!(multipart_boundary(""), None);
    }
}
