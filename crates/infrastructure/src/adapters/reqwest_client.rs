//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It sends every request exactly as built by a clause: no redirects are
//! followed and no status is turned into an error.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ldpcheck_application::ports::{HttpClient, HttpClientError};
use ldpcheck_domain::{
    HarnessConfig, Header, Headers, HttpMethod, RequestBody, RequestSpec, ResponseSnapshot,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Url};

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` and implements the `HttpClient` port from the
/// application layer.
pub struct ReqwestHttpClient {
    client: Client,
    timeout_ms: u64,
    credentials: Option<(String, Option<String>)>,
}

impl ReqwestHttpClient {
    /// Creates a client from the harness configuration.
    ///
    /// Configuration applied:
    /// - Per-request timeout: `timeout_ms`
    /// - Redirects: never followed
    /// - User-Agent: `user_agent`
    /// - Basic credentials, when a user name is set
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &HarnessConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            timeout_ms: config.timeout_ms,
            credentials: config
                .credentials()
                .map(|(user, password)| (user.to_string(), password.map(str::to_string))),
        })
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, timeout_ms: u64) -> Self {
        Self {
            client,
            timeout_ms,
            credentials: None,
        }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Attaches the request body.
    ///
    /// Raw payloads get a `Content-Type` and, when named, a
    /// `Content-Disposition`, unless the request already sets them.
    /// Multipart uploads let reqwest write the boundary content type.
    fn build_body(
        mut builder: reqwest::RequestBuilder,
        headers: &Headers,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder, HttpClientError> {
        match body {
            RequestBody::None => Ok(builder),

            RequestBody::Binary {
                content,
                content_type,
                file_name,
            } => {
                if !headers.contains("Content-Type") {
                    builder = builder.header("Content-Type", content_type);
                }
                if let Some(name) = file_name
                    && !headers.contains("Content-Disposition")
                {
                    builder = builder
                        .header("Content-Disposition", format!("attachment; filename=\"{name}\""));
                }
                Ok(builder.body(content.clone()))
            }

            RequestBody::Multipart {
                field,
                file_name,
                content_type,
                content,
            } => {
                let part = Part::bytes(content.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(|e| HttpClientError::InvalidBody(format!("invalid MIME type: {e}")))?;
                Ok(builder.multipart(Form::new().part(field.clone(), part)))
            }
        }
    }

    /// Maps reqwest errors to domain `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = error
            .url()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        if error.is_connect() {
            let message = full_message(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError { host, message };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        HttpClientError::Other(full_message(error))
    }

    /// Copies every response header, keeping repeated ones.
    fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
        map.iter()
            .map(|(name, value)| {
                Header::new(
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }
}

/// Joins an error with its sources, which is where reqwest keeps the cause.
fn full_message(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSnapshot, HttpClientError> {
        let url = request
            .parse_url()
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.url)))?;

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);

        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, password.as_ref());
        }

        builder = Self::build_body(builder, &request.headers, &request.body)?;

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

        let status = response.status().as_u16();
        let headers = Self::collect_headers(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout_ms))?
            .to_vec();

        let snapshot = ResponseSnapshot::new(
            request.method,
            request.url.clone(),
            status,
            headers,
            body,
            start.elapsed(),
        );
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status,
            elapsed = %snapshot.duration_display(),
            "request"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Head),
            Method::HEAD
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new(&HarnessConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_multipart_mime() {
        let body = RequestBody::Multipart {
            field: "file".to_string(),
            file_name: "a.bin".to_string(),
            content_type: "not a mime type".to_string(),
            content: vec![1],
        };
        let builder = Client::new().post("https://example.com");
        let result = ReqwestHttpClient::build_body(builder, &Headers::new(), &body);
        assert!(matches!(result, Err(HttpClientError::InvalidBody(_))));
    }

    #[test]
    fn test_response_headers_keep_repeats() {
        let mut map = reqwest::header::HeaderMap::new();
        map.append("link", "<a>; rel=\"type\"".parse().unwrap());
        map.append("link", "<b>; rel=\"type\"".parse().unwrap());
        let headers = ReqwestHttpClient::collect_headers(&map);
        assert_eq!(headers.get_all("Link").count(), 2);
    }
}
