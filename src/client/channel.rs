//! HTTP transport to the national API.
//!
//! One mutually authenticated `reqwest` client per channel. Every call reads
//! the full body, then classifies the outcome: a success status returns the
//! content; anything else is a [`TransportError`] carrying status and body.

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use super::config::NfseConfig;
use crate::core::{NfseError, TransportError};
use crate::xml::{self, XmlDocument, XmlError};

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// HTTP method of an endpoint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Head => reqwest::Method::HEAD,
            Self::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Head => f.write_str("HEAD"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// A call against a path relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    pub method: Method,
    pub path: String,
    /// XML payload, sent as `application/xml`.
    pub body: Option<Vec<u8>>,
}

impl EndpointRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self {
            method: Method::Head,
            path: path.into(),
            body: None,
        }
    }

    pub fn post_xml(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body.into()),
        }
    }
}

/// A completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl EndpointResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the declared media type is some flavor of XML.
    pub fn is_xml(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("xml"))
    }
}

/// Transport channel shared by every endpoint façade.
///
/// Safe to use from many tasks at once. After [`close`](Self::close) every
/// call fails with [`NfseError::Configuration`].
pub struct NfseChannel {
    base_url: String,
    base: Url,
    http: Mutex<Option<reqwest::Client>>,
}

impl fmt::Debug for NfseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NfseChannel")
            .field("base_url", &self.base_url)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl NfseChannel {
    /// Validate `config` and build the underlying HTTP client.
    pub fn new(config: NfseConfig) -> Result<Self, NfseError> {
        config.validate()?;
        let base = Url::parse(&config.base_url)
            .map_err(|e| NfseError::Configuration(format!("base URL is not a valid URL: {e}")))?;
        let certificate = config
            .certificate
            .as_ref()
            .ok_or_else(|| NfseError::Configuration("client certificate is required".into()))?;
        let identity = reqwest::Identity::from_pem(certificate.pem()).map_err(|e| {
            NfseError::Configuration(format!("client certificate cannot be loaded: {e}"))
        })?;

        if !config.validate_server_certificate {
            warn!(
                base_url = %config.base_url,
                "server certificate validation is disabled; do not use in production"
            );
        }

        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .danger_accept_invalid_certs(!config.validate_server_certificate)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| NfseError::Configuration(format!("HTTP client cannot be built: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base,
            http: Mutex::new(Some(http)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Release the connection pool. Idempotent.
    pub fn close(&self) {
        let mut guard = self.http.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!(base_url = %self.base_url, "channel closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn client(&self) -> Result<reqwest::Client, NfseError> {
        self.http
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| NfseError::Configuration("channel is closed".into()))
    }

    /// Base URL with `path` appended verbatim.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Request path built from raw `segments`.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?`, `#` and `%`
    /// inside caller input stay inside that segment. Empty, `.` and `..`
    /// segments are rejected.
    pub fn path_for<S: AsRef<str>>(&self, segments: &[S]) -> Result<String, NfseError> {
        if let Some(bad) = segments
            .iter()
            .map(AsRef::as_ref)
            .find(|s| matches!(*s, "" | "." | ".."))
        {
            return Err(NfseError::invalid(
                "path",
                format!("'{bad}' is not a valid path segment"),
            ));
        }
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_path("/");
        url.path_segments_mut()
            .map_err(|()| {
                NfseError::Configuration(format!("base URL '{}' cannot carry a path", self.base_url))
            })?
            .extend(segments);
        Ok(url.path().to_string())
    }

    /// Perform the exchange without classifying the status.
    async fn send(&self, request: &EndpointRequest) -> Result<EndpointResponse, NfseError> {
        let http = self.client()?;
        let url = self.url_for(&request.path);
        debug!(method = %request.method, path = %request.path, "sending request");

        let mut builder = http.request(request.method.as_reqwest(), &url);
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, XML_CONTENT_TYPE).body(body.clone());
        }

        let resp = builder.send().await.map_err(|e| {
            warn!(method = %request.method, path = %request.path, error = %e, "request failed");
            TransportError::new(format!("{} {} failed: {e}", request.method, request.path))
                .caused_by(e)
        })?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await.map_err(|e| {
            warn!(method = %request.method, path = %request.path, status, error = %e, "reading response body failed");
            let mut err = TransportError::new(format!(
                "{} {} returned HTTP {status} but the body could not be read: {e}",
                request.method, request.path
            ))
            .caused_by(e);
            err.status = Some(status);
            err
        })?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
            warn!(method = %request.method, path = %request.path, status, "response body is not UTF-8");
            let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
            TransportError::with_response(
                format!(
                    "{} {} returned HTTP {status} with a body that is not valid UTF-8: {e}",
                    request.method, request.path
                ),
                status,
                lossy,
            )
            .caused_by(e)
        })?;

        debug!(
            method = %request.method,
            path = %request.path,
            status,
            content_type = content_type.as_deref().unwrap_or(""),
            body_len = body.len(),
            "received response"
        );
        Ok(EndpointResponse {
            status,
            content_type,
            body,
        })
    }

    /// Perform the exchange; a non-success status is a [`TransportError`].
    pub async fn execute(&self, request: EndpointRequest) -> Result<EndpointResponse, NfseError> {
        let resp = self.send(&request).await?;
        if !resp.is_success() {
            warn!(method = %request.method, path = %request.path, status = resp.status, "non-success status");
            return Err(TransportError::with_response(
                format!("{} {} returned HTTP {}", request.method, request.path, resp.status),
                resp.status,
                resp.body,
            )
            .into());
        }
        Ok(resp)
    }

    pub async fn get(&self, path: &str) -> Result<EndpointResponse, NfseError> {
        self.execute(EndpointRequest::get(path)).await
    }

    /// GET returning the raw body.
    pub async fn get_text(&self, path: &str) -> Result<String, NfseError> {
        Ok(self.get(path).await?.body)
    }

    /// True only for exactly HTTP 200. Other statuses are `false`, not errors.
    pub async fn head(&self, path: &str) -> Result<bool, NfseError> {
        let resp = self.send(&EndpointRequest::head(path)).await?;
        Ok(resp.status == 200)
    }

    pub async fn post_xml(
        &self,
        path: &str,
        body: impl Into<Vec<u8>>,
    ) -> Result<EndpointResponse, NfseError> {
        self.execute(EndpointRequest::post_xml(path, body)).await
    }

    /// GET a typed document. The response must declare an XML content type.
    pub async fn get_document<T: XmlDocument>(&self, path: &str) -> Result<T, NfseError> {
        let resp = self.get(path).await?;
        if !resp.is_xml() {
            warn!(path, content_type = resp.content_type.as_deref().unwrap_or(""), "unsupported response format");
            return Err(TransportError::with_response(
                format!(
                    "GET {path} returned unsupported content type '{}', expected XML",
                    resp.content_type.as_deref().unwrap_or("")
                ),
                resp.status,
                resp.body,
            )
            .into());
        }
        decode_response(Method::Get, path, resp)
    }

    /// POST a typed document and parse the typed reply.
    pub async fn post_document<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, NfseError>
    where
        Req: XmlDocument,
        Resp: XmlDocument,
    {
        let body = xml::to_xml_bytes(request).map_err(request_error::<Req>)?;
        let resp = self.post_xml(path, body).await?;
        decode_response(Method::Post, path, resp)
    }
}

fn request_error<T: XmlDocument>(err: XmlError) -> NfseError {
    NfseError::invalid(T::ROOT, err.to_string())
}

fn decode_response<T: XmlDocument>(
    method: Method,
    path: &str,
    resp: EndpointResponse,
) -> Result<T, NfseError> {
    xml::from_xml(&resp.body).map_err(|e| {
        warn!(%method, path, status = resp.status, error = %e, "response could not be parsed");
        TransportError::with_response(
            format!("{method} {path} returned a body that is not a valid <{}>: {e}", T::ROOT),
            resp.status,
            resp.body.clone(),
        )
        .caused_by(e)
        .into()
    })
}

impl TransportError {
    /// The call was aborted by the configured timeout.
    pub fn is_timeout(&self) -> bool {
        self.find_cause::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_timeout)
    }

    /// No connection could be established (DNS, refused, TLS handshake).
    pub fn is_connect(&self) -> bool {
        self.find_cause::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_connect)
    }
}
