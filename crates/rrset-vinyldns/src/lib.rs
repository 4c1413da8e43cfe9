// # VinylDNS API Client
//
// HTTP implementation of `DnsApi` for the VinylDNS REST API.
//
// ## Behavior
//
// - One HTTP request per trait call
// - No retries, no sleeping: the convergence poller owns scheduling
// - Every non-2xx response becomes `Error::Api` carrying the status code, so
//   the poller can tell a 404 ("change not visible yet") from real failures
// - Transport failures (connect, timeout) become `Error::Http`
//
// ## Security
//
// - The bearer token is never logged and is redacted from `Debug`
//
// ## API Reference
//
// - Create: POST `/zones/:zone_id/recordsets`
// - Update: PUT `/zones/:zone_id/recordsets/:record_set_id`
// - Delete: DELETE `/zones/:zone_id/recordsets/:record_set_id`
// - Get: GET `/zones/:zone_id/recordsets/:record_set_id`
// - Change: GET `/zones/:zone_id/recordsets/:record_set_id/changes/:change_id`

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use rrset_core::config::ClientConfig;
use rrset_core::traits::DnsApi;
use rrset_core::types::{RecordSet, RecordSetChange, RecordSetUpdate};
use rrset_core::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of GET on a single record set
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetRecordSetResponse {
    record_set: RecordSet,
}

/// VinylDNS API client
///
/// Stateless apart from the connection pool; safe to share between
/// concurrent operations.
pub struct VinylDnsClient {
    /// Base URL without trailing slash
    base_url: String,

    /// Bearer token
    /// ⚠️ NEVER log this value
    api_token: Option<String>,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for VinylDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VinylDnsClient")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl VinylDnsClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `api_url`: Base URL of the API, e.g. `https://vinyldns.example.com`
    /// - `api_token`: Optional bearer token sent with every request
    /// - `timeout`: Per-request timeout
    pub fn new(
        api_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = api_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("VinylDNS API URL cannot be empty"));
        }
        if matches!(api_token.as_deref(), Some("")) {
            return Err(Error::config("VinylDNS API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_token,
            client,
        })
    }

    /// Create a client from the shared client configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.api_url.clone(),
            config.api_token.clone(),
            config.http_timeout(),
        )
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn record_sets_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/recordsets", self.base_url, zone_id)
    }

    fn record_set_url(&self, zone_id: &str, record_set_id: &str) -> String {
        format!("{}/{}", self.record_sets_url(zone_id), record_set_id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a successful JSON response
    ///
    /// `what` names the operation in error messages.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("{what}: HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("{what}: failed to read response: {e}")))?;

        if !status.is_success() {
            let code = status.as_u16();
            tracing::debug!("{} returned {}: {}", what, code, body);

            // Map HTTP status codes to specific messages; the code itself is
            // always preserved for callers
            let message = match code {
                401 | 403 => format!(
                    "{what}: authentication failed or permission denied. Status: {status}"
                ),
                404 => format!("{what}: not found: {body}"),
                409 => format!("{what}: conflict: {body}"),
                429 => format!("{what}: rate limit exceeded. Status: {status}"),
                500..=599 => format!("{what}: VinylDNS server error: {status} - {body}"),
                _ => format!("{what}: request failed: {status} - {body}"),
            };
            return Err(Error::api(code, message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DnsApi for VinylDnsClient {
    async fn create_record_set(&self, record_set: &RecordSet) -> Result<RecordSetUpdate> {
        tracing::info!(
            "Submitting create for {} record set {} in zone {}",
            record_set.record_type,
            record_set.name,
            record_set.zone_id
        );

        let url = self.record_sets_url(&record_set.zone_id);
        let builder = self.request(Method::POST, &url).json(record_set);
        let update: RecordSetUpdate = self.send(builder, "create record set").await?;

        tracing::debug!("Create accepted, change {}", update.change_id);
        Ok(update)
    }

    async fn update_record_set(&self, record_set: &RecordSet) -> Result<RecordSetUpdate> {
        let record_set_id = record_set
            .id
            .as_deref()
            .ok_or_else(|| Error::invalid_input("record set update requires an id"))?;
        tracing::info!(
            "Submitting update for record set {} ({})",
            record_set.name,
            record_set_id
        );

        let url = self.record_set_url(&record_set.zone_id, record_set_id);
        let builder = self.request(Method::PUT, &url).json(record_set);
        let update: RecordSetUpdate = self.send(builder, "update record set").await?;

        tracing::debug!("Update accepted, change {}", update.change_id);
        Ok(update)
    }

    async fn delete_record_set(&self, zone_id: &str, record_set_id: &str) -> Result<RecordSetUpdate> {
        tracing::info!("Submitting delete for record set {}", record_set_id);

        let url = self.record_set_url(zone_id, record_set_id);
        let update: RecordSetUpdate = self
            .send(self.request(Method::DELETE, &url), "delete record set")
            .await?;

        tracing::debug!("Delete accepted, change {}", update.change_id);
        Ok(update)
    }

    async fn get_record_set(&self, zone_id: &str, record_set_id: &str) -> Result<RecordSet> {
        tracing::debug!("Fetching record set {}", record_set_id);

        let url = self.record_set_url(zone_id, record_set_id);
        let response: GetRecordSetResponse = self
            .send(self.request(Method::GET, &url), "get record set")
            .await?;

        Ok(response.record_set)
    }

    async fn record_set_change(
        &self,
        zone_id: &str,
        record_set_id: &str,
        change_id: &str,
    ) -> Result<RecordSetChange> {
        let url = format!(
            "{}/changes/{}",
            self.record_set_url(zone_id, record_set_id),
            change_id
        );
        self.send(self.request(Method::GET, &url), "get record set change")
            .await
    }

    fn client_name(&self) -> &'static str {
        "vinyldns"
    }
}
