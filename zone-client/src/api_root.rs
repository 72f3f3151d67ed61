//! Fluent request builders
//!
//! ```no_run
//! use zone_client::{ApiRoot, ClientConfig, ZoneDraft};
//!
//! # fn example() -> Result<(), zone_client::ClientError> {
//! let config = ClientConfig::from_env()?;
//! let root = ApiRoot::new(config.build_http_client()?);
//!
//! let draft = ZoneDraft::builder("Europe").key("europe").build();
//! let zone = root.with_project_key(&config.project_key).zones().post(draft).execute_blocking()?;
//!
//! root.with_project_key(&config.project_key)
//!     .zones()
//!     .with_id(&zone.id)
//!     .delete()
//!     .add_version(zone.version)
//!     .execute_blocking()?;
//! # Ok(())
//! # }
//! ```

use reqwest::Method;
use shared::{Zone, ZoneDraft, ZonePagedQueryResponse, ZoneUpdate};

use crate::HttpClient;
use crate::request::{ApiRequest, ZoneDeleteRequest, ZoneQueryRequest};

/// Entry point of the request builder chain
#[derive(Debug, Clone)]
pub struct ApiRoot {
    http: HttpClient,
}

impl ApiRoot {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Scope subsequent requests to a project
    pub fn with_project_key(&self, project_key: impl Into<String>) -> ProjectRequestBuilder {
        ProjectRequestBuilder {
            http: self.http.clone(),
            project_key: project_key.into(),
        }
    }
}

/// `/{projectKey}`
#[derive(Debug, Clone)]
pub struct ProjectRequestBuilder {
    http: HttpClient,
    project_key: String,
}

impl ProjectRequestBuilder {
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    pub fn zones(&self) -> ZonesRequestBuilder {
        ZonesRequestBuilder {
            http: self.http.clone(),
            project_key: self.project_key.clone(),
        }
    }
}

/// `/{projectKey}/zones`
#[derive(Debug, Clone)]
pub struct ZonesRequestBuilder {
    http: HttpClient,
    project_key: String,
}

impl ZonesRequestBuilder {
    fn segments(&self) -> Vec<String> {
        vec![self.project_key.clone(), "zones".to_string()]
    }

    /// Query zones
    pub fn get(&self) -> ZoneQueryRequest {
        ZoneQueryRequest::new(ApiRequest::new(
            self.http.clone(),
            Method::GET,
            self.segments(),
        ))
    }

    /// Create a zone
    pub fn post(&self, draft: ZoneDraft) -> ApiRequest<Zone, ZoneDraft> {
        ApiRequest::new(self.http.clone(), Method::POST, self.segments()).with_body(draft)
    }

    /// `/{projectKey}/zones/{ID}`
    pub fn with_id(&self, id: impl Into<String>) -> ZoneByRequestBuilder {
        let mut segments = self.segments();
        segments.push(id.into());
        ZoneByRequestBuilder {
            http: self.http.clone(),
            segments,
        }
    }

    /// `/{projectKey}/zones/key={key}`
    pub fn with_key(&self, key: impl AsRef<str>) -> ZoneByRequestBuilder {
        let mut segments = self.segments();
        segments.push(format!("key={}", key.as_ref()));
        ZoneByRequestBuilder {
            http: self.http.clone(),
            segments,
        }
    }
}

/// A single zone addressed by id or key
#[derive(Debug, Clone)]
pub struct ZoneByRequestBuilder {
    http: HttpClient,
    segments: Vec<String>,
}

impl ZoneByRequestBuilder {
    pub fn get(&self) -> ApiRequest<Zone> {
        ApiRequest::new(self.http.clone(), Method::GET, self.segments.clone())
    }

    /// Apply update actions (conditional on `update.version`)
    pub fn post(&self, update: ZoneUpdate) -> ApiRequest<Zone, ZoneUpdate> {
        ApiRequest::new(self.http.clone(), Method::POST, self.segments.clone()).with_body(update)
    }

    pub fn delete(&self) -> ZoneDeleteRequest {
        ZoneDeleteRequest::new(ApiRequest::new(
            self.http.clone(),
            Method::DELETE,
            self.segments.clone(),
        ))
    }
}
