//! Outbound HTTP plumbing shared by the provider adapter and the editor client.

use std::sync::Arc;
use std::time::Duration;

use hyper::body::{Bytes, to_bytes};
use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Client, Method, Request, StatusCode, Uri};
use hyper_rustls::HttpsConnector;
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use tokio::time::timeout;
use webpki_roots::TLS_SERVER_ROOTS;

use crate::traits::{AdapterError, AdapterResult};

/// Client type used for both `http://` and `https://` endpoints.
pub type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Status and fully buffered body of a response.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    /// HTTP status returned by the peer.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Bytes,
}

/// Builds a client that negotiates TLS when the URI scheme asks for it.
///
/// The client pools connections and is cheap to clone; build it once and
/// share it.
#[must_use]
pub fn build_https_client() -> HyperClient {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, Arc::new(config)));

    Client::builder().build::<_, Body>(connector)
}

/// Builds a JSON request, attaching a bearer token when one is supplied.
///
/// # Errors
///
/// Returns [`AdapterError::Transport`] when the request cannot be assembled.
pub fn json_request(
    method: Method,
    uri: Uri,
    bearer: Option<&str>,
    payload: Option<Vec<u8>>,
) -> AdapterResult<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(ACCEPT, "application/json");

    if let Some(token) = bearer {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = match payload {
        Some(bytes) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(bytes)
        }
        None => Body::empty(),
    };

    builder
        .body(body)
        .map_err(|err| AdapterError::transport(format!("failed to build request: {err}")))
}

/// Sends the request and buffers the whole response body.
///
/// When `limit` is `None` the call waits as long as the peer takes.
///
/// # Errors
///
/// Returns [`AdapterError::Transport`] on connection failures, timeouts, or
/// body read errors. Non-success statuses are returned to the caller as-is.
pub async fn send_buffered(
    client: &HyperClient,
    request: Request<Body>,
    limit: Option<Duration>,
) -> AdapterResult<BufferedResponse> {
    let pending = client.request(request);
    let response = match limit {
        Some(limit) => timeout(limit, pending)
            .await
            .map_err(|_| AdapterError::transport("request timed out"))?,
        None => pending.await,
    }
    .map_err(|err| AdapterError::transport(format!("request failed: {err}")))?;

    let status = response.status();
    let body = to_bytes(response.into_body())
        .await
        .map_err(|err| AdapterError::transport(format!("failed to read response: {err}")))?;

    Ok(BufferedResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_request_sets_headers() {
        let request = json_request(
            Method::POST,
            Uri::from_static("http://localhost/v1/chat/completions"),
            Some("sk-test"),
            Some(b"{}".to_vec()),
        )
        .unwrap();

        let headers = request.headers();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.method(), Method::POST);
    }

    #[test]
    fn bodiless_request_omits_content_type() {
        let request = json_request(
            Method::GET,
            Uri::from_static("http://localhost/api/templates"),
            None,
            None,
        )
        .unwrap();

        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = build_https_client();
        let request = json_request(
            Method::GET,
            Uri::from_static("http://127.0.0.1:9/unreachable"),
            None,
            None,
        )
        .unwrap();

        let err = send_buffered(&client, request, Some(Duration::from_secs(5)))
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, AdapterError::Transport { .. }));
    }
}
