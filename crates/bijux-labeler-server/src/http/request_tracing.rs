// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::http::HeaderMap;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_BYTES: usize = 128;

/// Per-request identity, stored in request extensions by the tracing
/// middleware and read back by handlers when they build error bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestTrace {
    pub request_id: String,
}

#[must_use]
pub(crate) fn extract_request_trace(headers: &HeaderMap, state: &AppState) -> RequestTrace {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_BYTES)
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = state
                .request_id_seed
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            format!("req-{id:016x}")
        });

    RequestTrace { request_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerConfig;
    use axum::http::HeaderValue;

    fn state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = ServerConfig {
            data_root: dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let state = AppState::open(cfg).expect("state");
        (dir, state)
    }

    #[test]
    fn propagates_client_request_id() {
        let (_dir, state) = state();
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-abc"));
        assert_eq!(extract_request_trace(&headers, &state).request_id, "req-abc");
    }

    #[test]
    fn generates_sequential_ids_when_absent() {
        let (_dir, state) = state();
        let first = extract_request_trace(&HeaderMap::new(), &state);
        let second = extract_request_trace(&HeaderMap::new(), &state);
        assert!(first.request_id.starts_with("req-"));
        assert_eq!(first.request_id.len(), 20);
        assert_ne!(first.request_id, second.request_id);
    }
}
