/// Storage download-token rotation.
///
/// Three sequential HTTP calls: authorize against the storage API, request a
/// bucket-scoped download token, then overwrite the edge worker script with
/// that token embedded.
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Longest validity the storage API grants a download token: one week.
pub const MAX_VALID_SECS: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_WORKER_NAME: &str = "reroute-backblaze";

const B2_AUTHORIZE_URL: &str = "https://api.backblazeb2.com/b2api/v2/b2_authorize_account";
const B2_DOWNLOAD_AUTH_PATH: &str = "/b2api/v2/b2_get_download_authorization";
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, thiserror::Error)]
pub enum RotateError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("token validity must be between 1 and 604800 seconds (one week), got {0}")]
    InvalidDuration(u64),

    #[error("{what} failed: {source}")]
    Http {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{what} returned {status}: {body}")]
    Status {
        what: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Secrets and identifiers, read from the environment.
pub struct Credentials {
    pub key_id: String,
    pub app_key: String,
    pub bucket_id: String,
    pub account_id: String,
    pub worker_api_token: String,
}

impl Credentials {
    /// Read credentials through `lookup` (normally `std::env::var`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RotateError> {
        let get = |name: &'static str| lookup(name).filter(|v| !v.is_empty()).ok_or(RotateError::MissingEnv(name));
        Ok(Credentials {
            key_id: get("B2_APP_KEY_ID")?,
            app_key: get("B2_APP_KEY")?,
            bucket_id: get("BUCKET_SOURCE_ID")?,
            account_id: get("CF_ACCOUNT_ID")?,
            worker_api_token: get("CF_WORKER_API")?,
        })
    }

    pub fn from_env() -> Result<Self, RotateError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Base URLs for the storage and edge-worker APIs.
pub struct Endpoints {
    pub authorize_url: String,
    pub cloudflare_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            authorize_url: B2_AUTHORIZE_URL.to_string(),
            cloudflare_base: CLOUDFLARE_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAuthorization {
    pub authorization_token: String,
    pub api_url: String,
    pub download_url: Option<String>,
    pub recommended_part_size: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DownloadAuthorizationRequest<'a> {
    bucket_id: &'a str,
    file_name_prefix: &'a str,
    valid_duration_in_seconds: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadAuthorizationResponse {
    authorization_token: String,
}

pub fn validate_duration(valid_secs: u64) -> Result<u64, RotateError> {
    if valid_secs == 0 || valid_secs > MAX_VALID_SECS {
        return Err(RotateError::InvalidDuration(valid_secs));
    }
    Ok(valid_secs)
}

pub fn worker_script_url(cloudflare_base: &str, account_id: &str, worker_name: &str) -> String {
    format!(
        "{}/accounts/{account_id}/workers/scripts/{worker_name}",
        cloudflare_base.trim_end_matches('/')
    )
}

pub struct Rotator {
    client: Client,
    endpoints: Endpoints,
    max_retries: usize,
}

impl Rotator {
    pub fn new(client: Client, endpoints: Endpoints, max_retries: usize) -> Self {
        Rotator { client, endpoints, max_retries }
    }

    /// Send a request, retrying with a 1-second delay on network errors and
    /// non-success statuses.
    async fn send_with_retries(
        &self,
        what: &'static str,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<Response, RotateError> {
        let mut attempt = 0;
        loop {
            let result = match build().send().await {
                Err(source) => Err(RotateError::Http { what, source }),
                Ok(resp) if !resp.status().is_success() => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    Err(RotateError::Status {
                        what,
                        status,
                        body: body.chars().take(200).collect(),
                    })
                }
                Ok(resp) => Ok(resp),
            };

            match result {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(what, attempt, max = self.max_retries, error = %e, "retrying");
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn authorize_account(&self, creds: &Credentials) -> Result<AccountAuthorization, RotateError> {
        let what = "account authorization";
        let resp = self
            .send_with_retries(what, || {
                self.client
                    .get(&self.endpoints.authorize_url)
                    .basic_auth(&creds.key_id, Some(&creds.app_key))
            })
            .await?;
        let auth: AccountAuthorization = resp
            .json()
            .await
            .map_err(|source| RotateError::Http { what, source })?;
        debug!(
            api_url = %auth.api_url,
            download_url = ?auth.download_url,
            part_size = ?auth.recommended_part_size,
            "authorized"
        );
        Ok(auth)
    }

    pub async fn download_authorization(
        &self,
        account: &AccountAuthorization,
        bucket_id: &str,
        valid_secs: u64,
    ) -> Result<String, RotateError> {
        let what = "download authorization";
        let url = format!("{}{B2_DOWNLOAD_AUTH_PATH}", account.api_url.trim_end_matches('/'));
        let body = DownloadAuthorizationRequest {
            bucket_id,
            file_name_prefix: "",
            valid_duration_in_seconds: valid_secs,
        };
        let resp = self
            .send_with_retries(what, || {
                self.client
                    .post(&url)
                    .header(reqwest::header::AUTHORIZATION, &account.authorization_token)
                    .json(&body)
            })
            .await?;
        let data: DownloadAuthorizationResponse = resp
            .json()
            .await
            .map_err(|source| RotateError::Http { what, source })?;
        info!(bucket_id, valid_secs, "download token issued");
        Ok(data.authorization_token)
    }

    pub async fn deploy_worker(
        &self,
        account_id: &str,
        worker_name: &str,
        api_token: &str,
        script: &str,
    ) -> Result<(), RotateError> {
        let url = worker_script_url(&self.endpoints.cloudflare_base, account_id, worker_name);
        self.send_with_retries("worker deployment", || {
            self.client
                .put(&url)
                .bearer_auth(api_token)
                .header(reqwest::header::CONTENT_TYPE, "application/javascript")
                .body(script.to_string())
        })
        .await?;
        info!(worker_name, bytes = script.len(), "worker deployed");
        Ok(())
    }
}
