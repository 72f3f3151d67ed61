//! Request values produced by the builders in [`crate::api_root`]

use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Zone, ZonePagedQueryResponse};

use crate::{ClientResult, HttpClient};

/// One fully described API call, executed with [`ApiRequest::execute_blocking`]
///
/// `T` is the response payload, `B` the JSON body (`()` for bodiless calls).
#[derive(Debug, Clone)]
pub struct ApiRequest<T, B = ()> {
    pub(crate) http: HttpClient,
    pub(crate) method: Method,
    /// Unencoded path segments below the base URL
    pub(crate) segments: Vec<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<B>,
    _response: PhantomData<fn() -> T>,
}

impl<T, B> ApiRequest<T, B>
where
    T: DeserializeOwned,
    B: Serialize,
{
    pub(crate) fn new(http: HttpClient, method: Method, segments: Vec<String>) -> Self {
        Self {
            http,
            method,
            segments,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            _response: PhantomData,
        }
    }

    pub(crate) fn with_body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter (repeatable names are kept in order)
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Expand a reference in the response
    pub fn with_expand(self, expand: impl Into<String>) -> Self {
        self.with_query_param("expand", expand.into())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolved request URL (path segments and query percent-encoded)
    pub fn url(&self) -> ClientResult<reqwest::Url> {
        self.http.url(&self.segments, &self.query)
    }

    /// Send the request and block until the response is decoded
    pub fn execute_blocking(&self) -> ClientResult<T> {
        self.http.execute(self)
    }
}

/// `DELETE` of a single zone; the API requires the current version
#[derive(Debug, Clone)]
pub struct ZoneDeleteRequest {
    inner: ApiRequest<Zone>,
}

impl ZoneDeleteRequest {
    pub(crate) fn new(inner: ApiRequest<Zone>) -> Self {
        Self { inner }
    }

    /// Version token the deletion is conditional on
    pub fn add_version(mut self, version: i64) -> Self {
        self.inner = self.inner.with_query_param("version", version);
        self
    }

    /// Also erase personal data tied to the resource
    pub fn with_data_erasure(mut self, data_erasure: bool) -> Self {
        self.inner = self.inner.with_query_param("dataErasure", data_erasure);
        self
    }

    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.inner = self.inner.with_expand(expand);
        self
    }

    pub fn url(&self) -> ClientResult<reqwest::Url> {
        self.inner.url()
    }

    pub fn execute_blocking(&self) -> ClientResult<Zone> {
        self.inner.execute_blocking()
    }
}

/// `GET` on the zones collection
#[derive(Debug, Clone)]
pub struct ZoneQueryRequest {
    inner: ApiRequest<ZonePagedQueryResponse>,
}

impl ZoneQueryRequest {
    pub(crate) fn new(inner: ApiRequest<ZonePagedQueryResponse>) -> Self {
        Self { inner }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.inner = self.inner.with_query_param("limit", limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.inner = self.inner.with_query_param("offset", offset);
        self
    }

    /// Query predicate, e.g. `key="zone-1"`
    pub fn with_where(mut self, predicate: impl Into<String>) -> Self {
        self.inner = self.inner.with_query_param("where", predicate.into());
        self
    }

    /// Sort expression, e.g. `createdAt desc`
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.inner = self.inner.with_query_param("sort", sort.into());
        self
    }

    pub fn with_with_total(mut self, with_total: bool) -> Self {
        self.inner = self.inner.with_query_param("withTotal", with_total);
        self
    }

    pub fn url(&self) -> ClientResult<reqwest::Url> {
        self.inner.url()
    }

    pub fn execute_blocking(&self) -> ClientResult<ZonePagedQueryResponse> {
        self.inner.execute_blocking()
    }
}
