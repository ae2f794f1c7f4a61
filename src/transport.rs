// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Read-only access to the GitHub REST API.
///
/// Fetchers talk to GitHub through the [`Transport`] trait so the status code
/// of every read stays visible: several endpoints treat a non-success status
/// as an empty collection rather than a failure.
use std::future::Future;

use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::AnalyzerConfig,
    error::{Error, FetchError},
};

/// Raw response of a single GET request.
#[derive(Debug, Clone, PartialEq,)]
pub struct ApiResponse
{
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body, [`Value::Null`] when the body is empty or is not
    /// JSON on a non-success response.
    pub body:   Value,
}

impl ApiResponse
{
    /// Creates a response with the provided status and body.
    pub fn new(status: u16, body: Value,) -> Self
    {
        Self {
            status,
            body,
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self,) -> bool
    {
        (200..300).contains(&self.status,)
    }

    /// Returns the body when the status is 2xx.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] naming the route and status otherwise.
    pub fn into_success(self, route: &str,) -> Result<Value, FetchError,>
    {
        if self.is_success() {
            Ok(self.body,)
        } else {
            Err(FetchError::Status {
                route: route.to_owned(), status: self.status,
            },)
        }
    }

    /// Returns the array body of a 2xx response, or an empty list for any
    /// other status or body shape.
    pub fn into_collection(self,) -> Vec<Value,>
    {
        match self.body {
            Value::Array(items,) if self.is_success() => items,
            _ => Vec::new(),
        }
    }
}

/// Stateless, idempotent GET reads keyed by API route.
///
/// Routes are paths relative to the API root such as `/users/octocat`.
/// Implementations return `Err` only for transport failures and undecodable
/// success bodies; non-success statuses are ordinary responses.
pub trait Transport: Send + Sync + 'static
{
    /// Performs a GET request against `route`.
    fn get(&self, route: &str,) -> impl Future<Output = Result<ApiResponse, FetchError,>,> + Send;
}

/// [`Transport`] backed by an [`Octocrab`] client.
#[derive(Debug, Clone,)]
pub struct OctocrabTransport
{
    client:   Octocrab,
    base_url: String,
}

impl OctocrabTransport
{
    /// Builds a client from the analyzer configuration.
    ///
    /// The token, when present, is sent unchanged with every request. The
    /// client never retries: every read reaches the API exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unusable base URL and
    /// [`Error::Service`] when the underlying client cannot be initialized.
    pub fn from_config(config: &AnalyzerConfig,) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder()
            .add_retry_config(RetryConfig::None,)
            .base_uri(config.api_url.as_str(),)
            .map_err(|e| {
                Error::validation(format!("invalid API base URL '{}': {e}", config.api_url),)
            },)?;
        if let Some(token,) = config.token.as_deref() {
            builder = builder.personal_token(token.to_owned(),);
        }

        let client = builder.build().map_err(|e| {
            Error::service(format!("failed to initialize GitHub client: {e}"),)
        },)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/',).to_owned(),
        },)
    }
}

impl Transport for OctocrabTransport
{
    async fn get(&self, route: &str,) -> Result<ApiResponse, FetchError,>
    {
        let url = format!("{}{route}", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            ._get(url.as_str(),)
            .await
            .map_err(|e| FetchError::transport(route, e,),)?;
        let status = response.status().as_u16();
        let text = self
            .client
            .body_to_string(response,)
            .await
            .map_err(|e| FetchError::transport(route, format!("unreadable body: {e}"),),)?;

        let body = decode_body(&text, (200..300).contains(&status,),).map_err(|e| {
            FetchError::Decode {
                route: route.to_owned(), message: e.to_string(),
            }
        },)?;

        Ok(ApiResponse::new(status, body,),)
    }
}

/// Decodes a response body, tolerating garbage on error responses.
fn decode_body(text: &str, success: bool,) -> Result<Value, serde_json::Error,>
{
    if text.trim().is_empty() {
        return Ok(Value::Null,);
    }

    match serde_json::from_str(text,) {
        Ok(value,) => Ok(value,),
        Err(_,) if !success => Ok(Value::Null,),
        Err(error,) => Err(error,),
    }
}


#[cfg(test)]
mod tests
{
    use std::{
        io::{Read, Write},
        net::TcpListener,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use serde_json::json;

    use super::{ApiResponse, OctocrabTransport, Transport, decode_body};
    use crate::config::AnalyzerConfig;

    /// Serves `500` with an empty JSON object to every connection and counts
    /// the requests received.
    fn failing_server() -> (String, Arc<AtomicUsize,>,)
    {
        let listener = TcpListener::bind("127.0.0.1:0",).expect("bind local listener",);
        let address = listener.local_addr().expect("local address",);
        let requests = Arc::new(AtomicUsize::new(0,),);
        let counter = Arc::clone(&requests,);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream,) = stream else {
                    continue;
                };
                let mut received = Vec::new();
                let mut buffer = [0_u8; 1024];
                while !received.windows(4,).any(|window| window == b"\r\n\r\n",) {
                    match stream.read(&mut buffer,) {
                        Ok(0,) | Err(_,) => break,
                        Ok(read,) => received.extend_from_slice(&buffer[..read],),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst,);
                let _ = stream.write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\n\
                      Content-Length: 2\r\nConnection: close\r\n\r\n{}",
                );
            }
        },);

        (format!("http://{address}"), requests,)
    }

    #[tokio::test]
    async fn server_errors_are_not_retried()
    {
        let (api_url, requests,) = failing_server();
        let config = AnalyzerConfig::default().with_overrides(Some(&api_url,), None,);
        let transport = OctocrabTransport::from_config(&config,).expect("client",);

        let response = transport.get("/users/octocat",).await.expect("response",);

        assert_eq!(response, ApiResponse::new(500, json!({})));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn success_statuses_expose_the_body()
    {
        let response = ApiResponse::new(200, json!({ "login": "octocat" }),);
        let body = response.into_success("/users/octocat",).expect("success",);
        assert_eq!(body["login"], "octocat");
    }

    #[test]
    fn failure_statuses_name_route_and_status()
    {
        let response = ApiResponse::new(404, json!({ "message": "Not Found" }),);
        let error = response.into_success("/users/ghost",).expect_err("404 must fail",);
        assert_eq!(error.to_string(), "GET /users/ghost returned HTTP 404");
    }

    #[test]
    fn collections_fall_back_to_empty()
    {
        assert!(ApiResponse::new(403, json!([{ "login": "x" }]),).into_collection().is_empty());
        assert!(ApiResponse::new(200, json!({ "message": "odd" }),).into_collection().is_empty());
        assert_eq!(ApiResponse::new(200, json!([1, 2]),).into_collection().len(), 2);
    }

    #[test]
    fn decode_body_tolerates_empty_and_error_payloads()
    {
        assert_eq!(decode_body("", true,).expect("empty",), serde_json::Value::Null);
        assert_eq!(decode_body("<html>", false,).expect("tolerated",), serde_json::Value::Null);
        assert!(decode_body("<html>", true,).is_err());
        assert_eq!(decode_body("[1]", true,).expect("json",), json!([1]));
    }
}
