//! Blocking HTTP exchange used by both committers.
//!
//! A [`Transport`] turns one [`ApiRequest`] into one [`ApiResponse`]. Every
//! HTTP status comes back as a response; only failures that never produced a
//! response (DNS, TLS, connection reset, ...) are errors.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::error::RemoteError;

/// `User-Agent` sent with every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("filepush/", env!("CARGO_PKG_VERSION"));

/// The HTTP methods the providers' file APIs need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

/// One outgoing API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn put(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    /// Header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response with any status code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    pub status: u16,
    /// Header names are stored lowercase.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Deserialize the body, naming `context` in the error.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T, RemoteError> {
        serde_json::from_str(&self.body).map_err(|source| RemoteError::Decode {
            context: context.to_owned(),
            source,
        })
    }
}

/// Performs one blocking HTTP exchange.
pub trait Transport {
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, RemoteError>;
}

// ---------------------------------------------------------------------------
// ureq
// ---------------------------------------------------------------------------

/// [`Transport`] backed by a `ureq` agent with its default timeouts.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, RemoteError> {
        tracing::debug!("{} {}", request.method.as_str(), request.url);

        let mut call = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }
        let result = match request.body {
            Some(body) => call.send_json(body),
            None => call.call(),
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(RemoteError::Transport {
                    url: request.url,
                    message: err.to_string(),
                })
            }
        };

        let status = response.status();
        let headers = response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                response
                    .header(&name)
                    .map(|value| (name.to_ascii_lowercase(), value.to_owned()))
            })
            .collect();
        let body = response
            .into_string()
            .map_err(|err| RemoteError::Transport {
                url: request.url.clone(),
                message: err.to_string(),
            })?;

        tracing::debug!("HTTP {status} from {}", request.url);
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let mut response = ApiResponse {
            status: 201,
            ..Default::default()
        };
        assert!(response.is_success());
        response.status = 304;
        assert!(!response.is_success());
    }

    #[test]
    fn response_header_lookup_is_case_insensitive() {
        let mut response = ApiResponse::default();
        response
            .headers
            .insert("x-next-page".into(), "2".into());
        assert_eq!(response.header("X-Next-Page"), Some("2"));
        assert_eq!(response.header("x-total"), None);
    }

    #[test]
    fn request_header_lookup_is_case_insensitive() {
        let request = ApiRequest::get("https://example.test").header("PRIVATE-TOKEN", "abc");
        assert_eq!(request.header_value("private-token"), Some("abc"));
    }

    #[test]
    fn json_decode_error_names_context() {
        let response = ApiResponse {
            status: 200,
            body: "not json".into(),
            ..Default::default()
        };
        let err = response
            .json::<serde_json::Value>("GET /projects")
            .unwrap_err();
        assert!(err.to_string().contains("GET /projects"));
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        // Port 9 on localhost refuses connections on any sane test machine.
        let transport = UreqTransport::new();
        let err = transport
            .execute(ApiRequest::get("http://127.0.0.1:9/projects"))
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }), "got: {err}");
    }
}
