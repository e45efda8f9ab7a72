//! HTTP request helper shared by the backend client and the upload transport.
//!
//! Requests always carry cookies from the client's store. Mutating requests
//! get JSON serialization and headers unless their body is a multipart form,
//! which is sent untouched. Non-2xx answers are surfaced once through the
//! notifier and returned as [`Error::Status`]; nothing is retried.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::notify::{Notice, SharedNotifier};
use crate::{Error, Result};

const JSON_ACCEPT: &str = "application/json";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Request body variants.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Multipart form, passed to the transport as-is.
    Form(Form),
}

impl RequestBody {
    const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Per-call options merged over the client defaults.
#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn post_json(body: Value) -> Self {
        Self {
            body: RequestBody::Json(body),
            ..Self::new(Method::POST)
        }
    }

    pub fn post_form(form: Form) -> Self {
        Self {
            body: RequestBody::Form(form),
            ..Self::new(Method::POST)
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    Json(Value),
    /// Raw text, used for `204 No Content`.
    Text(String),
}

impl ParsedBody {
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value)?),
            Self::Text(text) if text.trim().is_empty() => Err(Error::InvalidPayload(
                "response body is empty".to_string(),
            )),
            Self::Text(text) => Ok(serde_json::from_str(&text)?),
        }
    }
}

/// Cookie-carrying HTTP client with status-based error surfacing.
#[derive(Clone)]
pub struct RequestClient {
    client: reqwest::Client,
    notifier: SharedNotifier,
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RequestClient")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    pub fn new(notifier: SharedNotifier) -> Result<Self> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { client, notifier })
    }

    pub fn notifier(&self) -> &SharedNotifier {
        &self.notifier
    }

    pub async fn request(&self, url: &str, options: RequestOptions) -> Result<ParsedBody> {
        let RequestOptions {
            method,
            headers: caller_headers,
            body,
        } = options;

        let mut headers = HeaderMap::new();
        let mut builder = self.client.request(method.clone(), url);

        if is_mutating(&method) {
            headers.insert(ACCEPT, HeaderValue::from_static(JSON_ACCEPT));
            match body {
                RequestBody::Form(form) => builder = builder.multipart(form),
                RequestBody::Json(value) => {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                    builder = builder.body(serde_json::to_vec(&value)?);
                }
                RequestBody::Empty => {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                }
            }
        } else if !body.is_empty() {
            tracing::debug!("Dropping request body on {method} {url}");
        }

        for (name, value) in caller_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|error| Error::InvalidInput(format!("Invalid header name: {error}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|error| Error::InvalidInput(format!("Invalid header value: {error}")))?;
            headers.insert(name, value);
        }

        let response = builder.headers(headers).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = status_description(status).map_or_else(
                || {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                },
                ToString::to_string,
            );
            tracing::warn!("{method} {url} failed with HTTP {}", status.as_u16());
            self.notifier.notify(
                Notice::error(format!("Request error {}", status.as_u16()))
                    .with_description(message.clone()),
            );
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(ParsedBody::Text(response.text().await?));
        }
        Ok(ParsedBody::Json(response.json::<Value>().await?))
    }
}

fn is_mutating(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::DELETE
}

/// Localized description for a response status, keyed by code.
fn status_description(status: StatusCode) -> Option<&'static str> {
    let description = match status.as_u16() {
        400 => "The request was malformed and nothing was changed.",
        401 => "You are not signed in or your session has expired.",
        403 => "You are signed in but not allowed to do this.",
        404 => "The requested resource does not exist.",
        406 => "The requested format is not available.",
        410 => "The requested resource was permanently removed.",
        422 => "A validation error occurred while processing the request.",
        500 => "The server encountered an error. Please check the server.",
        502 => "Gateway error.",
        503 => "The service is temporarily unavailable or under maintenance.",
        504 => "The gateway timed out.",
        _ => return None,
    };
    Some(description)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::notify::{MemoryNotifier, NoticeLevel};

    fn client() -> (RequestClient, MemoryNotifier) {
        let notifier = MemoryNotifier::new();
        let client = RequestClient::new(Arc::new(notifier.clone())).unwrap();
        (client, notifier)
    }

    #[tokio::test]
    async fn get_parses_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 10000})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, notifier) = client();
        let body = client
            .request(&format!("{}/token", server.uri()), RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(body, ParsedBody::Json(json!({"code": 10000})));
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn post_serializes_json_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .and(header("content-type", JSON_CONTENT_TYPE))
            .and(header("accept", JSON_ACCEPT))
            .and(body_json(json!({"fileKeys": ["a"], "expireInSeconds": 60})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client();
        let body = client
            .request(
                &format!("{}/files", server.uri()),
                RequestOptions::post_json(json!({"fileKeys": ["a"], "expireInSeconds": 60})),
            )
            .await
            .unwrap();
        assert_eq!(body, ParsedBody::Json(json!({"ok": true})));
    }

    #[tokio::test]
    async fn caller_headers_override_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/files/key"))
            .and(header("accept", "text/plain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 10000})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client();
        client
            .request(
                &format!("{}/files/key", server.uri()),
                RequestOptions::delete().header("Accept", "text/plain"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_content_resolves_to_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (client, _) = client();
        let body = client
            .request(&server.uri(), RequestOptions::delete())
            .await
            .unwrap();
        assert_eq!(body, ParsedBody::Text(String::new()));
        assert!(body.into_json::<Value>().is_err());
    }

    #[tokio::test]
    async fn error_status_notifies_once_and_rejects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let (client, notifier) = client();
        let error = client
            .request(&server.uri(), RequestOptions::get())
            .await
            .unwrap_err();

        match error {
            Error::Status { status, message } => {
                assert_eq!(status, 503);
                assert!(message.contains("temporarily unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Request error 503");
    }

    #[tokio::test]
    async fn unknown_status_falls_back_to_reason_phrase() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(418))
            .mount(&server)
            .await;

        let (client, _) = client();
        match client
            .request(&server.uri(), RequestOptions::get())
            .await
            .unwrap_err()
        {
            Error::Status { message, .. } => assert_eq!(message, "I'm a teapot"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn form_body_keeps_multipart_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("accept", JSON_ACCEPT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "k"})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _) = client();
        let form = Form::new().text("key", "k");
        client
            .request(&server.uri(), RequestOptions::post_form(form))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[test]
    fn parsed_text_body_parses_as_json() {
        let body = ParsedBody::Text(r#"{"code": 10000}"#.to_string());
        let value: Value = body.into_json().unwrap();
        assert_eq!(value, json!({"code": 10000}));
    }
}
