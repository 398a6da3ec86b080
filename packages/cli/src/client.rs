use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::services::{CardService, SpaceService, UserService};

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Deadlines applied to API calls.
///
/// `request` bounds ordinary calls end to end. `transfer` bounds calls that
/// carry file bytes (uploads and full-content downloads), which can be
/// hundreds of megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub request: Duration,
    pub transfer: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(10),
            transfer: Duration::from_secs(60 * 60),
        }
    }
}

/// Blocking HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    timeouts: Timeouts,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeouts(base_url, Timeouts::default())
    }

    pub fn with_timeouts(base_url: &str, timeouts: Timeouts) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        // No client-wide deadline; each request sets its own.
        let http = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(None)
            .build()?;
        Ok(Self {
            http,
            base_url,
            timeouts,
        })
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn cards(&self) -> CardService<'_> {
        CardService::new(self)
    }

    pub fn spaces(&self) -> SpaceService<'_> {
        SpaceService::new(self)
    }

    /// Append path segments to the base URL. Each segment is
    /// percent-encoded, so ids and emails can be passed as-is.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.get(url).timeout(self.timeouts.request))
    }

    /// A GET whose response may carry file bytes; 404 yields `None`.
    pub(crate) fn get_transfer<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, ClientError> {
        let url = self.endpoint(segments)?;
        match self.send(self.http.get(url).timeout(self.timeouts.transfer)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Like [`get`](Self::get), but a 404 yields `None`.
    pub(crate) fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, ClientError> {
        match self.get(segments) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.post(url).json(body).timeout(self.timeouts.request))
    }

    /// A POST whose body may carry file bytes.
    pub(crate) fn post_transfer<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.post(url).json(body).timeout(self.timeouts.transfer))
    }

    pub(crate) fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.put(url).json(body).timeout(self.timeouts.request))
    }

    pub(crate) fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.patch(url).json(body).timeout(self.timeouts.request))
    }

    pub(crate) fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        self.send(self.http.delete(url).timeout(self.timeouts.request))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send()?;
        let status = response.status();
        let url = response.url().clone();
        let text = response.text()?;
        debug!(%url, status = status.as_u16(), bytes = text.len(), "API response");

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}
