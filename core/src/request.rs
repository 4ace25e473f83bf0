//! Builder for outbound HTTP request descriptors.
//!
//! # Design
//! `RequestSpecBuilder` accumulates configuration in plain fields and
//! snapshots it into an immutable `RequestDescriptor` on `build()`. The URL is
//! resolved once, at build time, so a descriptor always carries a ready-to-send
//! `HttpRequest`. Building never touches the network.

use std::collections::BTreeMap;

use tracing::debug;
use url::{form_urlencoded, Url};

use crate::error::ConfigurationError;
use crate::http::{HttpMethod, HttpRequest};

/// Immutable, fully specified HTTP request.
///
/// Produced by `RequestSpecBuilder::build`. Headers and query parameters are
/// unique by key; the query string is emitted in key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    base_address: Url,
    path: String,
    method: HttpMethod,
    headers: BTreeMap<String, String>,
    query_parameters: BTreeMap<String, String>,
    url: Url,
    request: HttpRequest,
}

impl RequestDescriptor {
    pub fn base_address(&self) -> &Url {
        &self.base_address
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn query_parameters(&self) -> &BTreeMap<String, String> {
        &self.query_parameters
    }

    /// Base address joined with the path, plus the encoded query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request as handed to a `Transport`.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

/// Accumulates the pieces of a request and assembles a `RequestDescriptor`.
///
/// Setters return `&mut Self` so calls can be chained. Adding a header or
/// parameter whose key is already present overwrites the earlier value.
#[derive(Debug, Clone, Default)]
pub struct RequestSpecBuilder {
    base_address: Option<Url>,
    path: String,
    method: HttpMethod,
    headers: BTreeMap<String, String>,
    query_parameters: BTreeMap<String, String>,
}

impl RequestSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and store the base address. Fails if `value` is not an absolute URL.
    pub fn set_base_address(&mut self, value: &str) -> Result<&mut Self, ConfigurationError> {
        let url = Url::parse(value).map_err(|e| ConfigurationError::InvalidBaseAddress {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        self.base_address = Some(url);
        Ok(self)
    }

    pub fn set_path(&mut self, value: &str) -> &mut Self {
        self.path = value.to_string();
        self
    }

    pub fn set_method(&mut self, value: HttpMethod) -> &mut Self {
        self.method = value;
        self
    }

    pub fn add_header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn add_parameter(&mut self, key: &str, value: &str) -> &mut Self {
        self.query_parameters.insert(key.to_string(), value.to_string());
        self
    }

    /// Assemble the descriptor. Requires `set_base_address` to have succeeded.
    pub fn build(&self) -> Result<RequestDescriptor, ConfigurationError> {
        let base_address = self
            .base_address
            .clone()
            .ok_or(ConfigurationError::MissingBaseAddress)?;

        let url = resolve_url(&base_address, &self.path, &self.query_parameters)?;
        let request = HttpRequest {
            method: self.method,
            url: url.to_string(),
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };
        debug!(method = %self.method, url = %url, headers = self.headers.len(), "built request descriptor");

        Ok(RequestDescriptor {
            base_address,
            path: self.path.clone(),
            method: self.method,
            headers: self.headers.clone(),
            query_parameters: self.query_parameters.clone(),
            url,
            request,
        })
    }
}

/// Join `path` onto `base` and attach `parameters` as the query string.
///
/// Any query or fragment already present on `base` is dropped. The path is
/// split on `/` and appended segment by segment; empty segments are skipped.
fn resolve_url(
    base: &Url,
    path: &str,
    parameters: &BTreeMap<String, String>,
) -> Result<Url, ConfigurationError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    let path_segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    if !path_segments.is_empty() {
        let mut segments = url.path_segments_mut().map_err(|()| ConfigurationError::InvalidPath {
            path: path.to_string(),
            reason: "base address cannot carry a path".to_string(),
        })?;
        // Each segment is percent-encoded, so '?' and '#' stay in the path.
        segments.pop_if_empty().extend(path_segments);
    }

    if !parameters.is_empty() {
        url.set_query(Some(&encode_query(parameters)));
    }
    Ok(url)
}

/// Percent-encode `parameters` as `k=v&k=v`, spaces as `%20`.
fn encode_query(parameters: &BTreeMap<String, String>) -> String {
    parameters
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// byte_serialize escapes a literal '+' as %2B, so every remaining '+' is a space.
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
