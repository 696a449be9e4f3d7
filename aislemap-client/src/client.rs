use aislemap_core::api::{
    MapSaveRequest, MapSaveResponse, ProductGroupsGetResponse, ProductLocationChangeDescription,
    ProductLocationChangeResponse, ProductLocationGetResponse,
};
use aislemap_core::{AisleStructureEntry, ChangeSet, iso_date};
use chrono::{DateTime, Utc};
use reqwest::RequestBuilder;
use reqwest::header::{COOKIE, REFERER};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::ClientError;
use crate::types::{Endpoints, ProductQuery, Session};

const CSRF_HEADER: &str = "X-CSRFToken";

/// Aborts a change set submission that never settled.
struct PendingSubmission<'a> {
    set: &'a mut ChangeSet,
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.set.abort_submission().is_ok() {
            warn!("location change submission abandoned");
        }
    }
}

/// Client for the store map REST endpoints.
pub struct StoreMapClient {
    http: reqwest::Client,
    base_url: Url,
    endpoints: Endpoints,
    session: Session,
}

impl StoreMapClient {
    /// Creates an anonymous client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            endpoints: Endpoints::default(),
            session: Session::default(),
        })
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.cookie_header() {
            Some(cookies) => request.header(COOKIE, cookies),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let request = self.http.get(url).query(params);
        let response = self.authenticated(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Posts a write request. Save endpoints report partial failures as an
    /// error status with a regular response body, so such bodies are
    /// returned rather than turned into errors.
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        what: &'static str,
        body: &B,
    ) -> Result<T, ClientError> {
        let token = self
            .session
            .csrf_token
            .as_deref()
            .ok_or(ClientError::MissingCsrfToken(what))?;

        let response = self
            .authenticated(self.http.post(url))
            .header(CSRF_HEADER, token)
            .header(REFERER, self.base_url.as_str())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<T>(&text) {
            Ok(parsed) => {
                if !status.is_success() {
                    warn!(status = status.as_u16(), "{what} reported a failure");
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(api_error(status, &text)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetches one page of products with their current locations.
    #[instrument(skip(self, query), fields(filter = %query.filter, page = query.page))]
    pub async fn get_products(
        &self,
        query: &ProductQuery,
        valid_at: &DateTime<Utc>,
    ) -> Result<ProductLocationGetResponse, ClientError> {
        let url = self.url(&self.endpoints.locations)?;
        let params = query.to_params(&iso_date(valid_at));
        debug!("Fetching products");
        self.get_json(url, &params).await
    }

    /// Fetches the map, its tiles and the store structure.
    #[instrument(skip(self))]
    pub async fn get_product_groups(
        &self,
        valid_at: &DateTime<Utc>,
    ) -> Result<ProductGroupsGetResponse, ClientError> {
        let url = self.url(&self.endpoints.groups)?;
        debug!("Fetching product groups");
        self.get_json(url, &[("validAt", iso_date(valid_at))]).await
    }

    /// Fetches the aisle structure of the current store.
    #[instrument(skip(self))]
    pub async fn get_aisle_structure(&self) -> Result<Vec<AisleStructureEntry>, ClientError> {
        let url = self.url(&self.endpoints.aisles)?;
        self.get_json(url, &[]).await
    }

    /// Sends a prepared batch of location changes.
    #[instrument(skip(self, description), fields(changes = description.changes.len()))]
    pub async fn save_changes(
        &self,
        description: &ProductLocationChangeDescription,
    ) -> Result<ProductLocationChangeResponse, ClientError> {
        let url = self.url(&self.endpoints.locations)?;
        debug!("Saving location changes");
        self.post_json(url, "saving location changes", description).await
    }

    /// Submits every pending change of `set`, effective at `date`.
    ///
    /// The set is locked against edits and further submissions until the
    /// request settles. A partial save drops the changes the server applied.
    /// If the returned future is dropped before the request settles, the
    /// submission is aborted and every change stays pending.
    pub async fn submit_change_set(
        &self,
        set: &mut ChangeSet,
        date: &DateTime<Utc>,
    ) -> Result<ProductLocationChangeResponse, ClientError> {
        let description = set.begin_submission(iso_date(date))?;
        let mut pending = PendingSubmission { set };
        let result = self.save_changes(&description).await;
        match &result {
            Ok(response) if response.success => pending.set.finish_submission(true)?,
            Ok(response) if response.warning => pending.set.finish_partial_submission()?,
            _ => pending.set.finish_submission(false)?,
        }
        result
    }

    /// Saves a new version of the store map.
    #[instrument(skip(self, request), fields(tiles = request.tiles.len()))]
    pub async fn save_map(&self, request: &MapSaveRequest) -> Result<MapSaveResponse, ClientError> {
        let url = self.url(&self.endpoints.map_save)?;
        debug!("Saving map");
        self.post_json(url, "saving the map", request).await
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| {
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            reason.to_string()
        });
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
