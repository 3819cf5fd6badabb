//! HTTP client for the Panorama XML API

use crate::traits::PanoramaApi;
use crate::xml::{self, ApiError, ApiResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for a Panorama appliance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name or address of the management interface
    pub host: String,
    /// API key sent with every request
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Skip TLS certificate verification (appliances ship self-signed certs)
    pub accept_invalid_certs: bool,
    /// Delay between commit job status checks
    pub commit_poll_interval: Duration,
    /// Maximum commit job status checks before giving up
    pub commit_max_polls: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            api_key: String::new(),
            timeout: Duration::from_secs(60),
            accept_invalid_certs: false,
            commit_poll_interval: Duration::from_secs(2),
            commit_max_polls: 300, // ten minutes at the default interval
        }
    }
}

/// [`PanoramaApi`] over HTTPS
pub struct PanoramaClient {
    http: reqwest::Client,
    config: ClientConfig,
    endpoint: String,
}

impl PanoramaClient {
    /// Create a client for the appliance described by `config`
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint_for(&config.host),
            config,
        })
    }

    /// The `/api/` URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, params: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        debug!(
            "Panorama request: {}",
            params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ")
        );

        let response = self
            .http
            .get(&self.endpoint)
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        ApiResponse::parse(response.text().await?)
    }

    /// Poll a commit job until it finishes
    async fn wait_for_job(&self, job: u64) -> Result<(), ApiError> {
        let cmd = xml::show_job_cmd(job);

        for _ in 0..self.config.commit_max_polls {
            let response = self.request(&[("type", "op"), ("cmd", cmd.as_str())]).await?;

            if let Some(status) = response.job_status()? {
                if status.is_finished() {
                    if status.succeeded() {
                        info!("Commit job {} finished", job);
                        return Ok(());
                    }
                    return Err(ApiError::CommitFailed {
                        job,
                        result: status.result,
                        details: status.details.unwrap_or_default(),
                    });
                }
                debug!(
                    "Commit job {} is {} ({}%)",
                    job,
                    status.status,
                    status.progress.as_deref().unwrap_or("?")
                );
            }

            tokio::time::sleep(self.config.commit_poll_interval).await;
        }

        Err(ApiError::CommitTimeout {
            job,
            polls: self.config.commit_max_polls,
        })
    }
}

fn endpoint_for(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}/api/", host)
    } else {
        format!("https://{}/api/", host)
    }
}

#[async_trait]
impl PanoramaApi for PanoramaClient {
    async fn op(&self, cmd: &str) -> Result<ApiResponse, ApiError> {
        self.request(&[("type", "op"), ("cmd", cmd)]).await
    }

    async fn set_config(&self, xpath: &str, element: &str) -> Result<ApiResponse, ApiError> {
        self.request(&[
            ("type", "config"),
            ("action", "set"),
            ("xpath", xpath),
            ("element", element),
        ])
        .await
    }

    async fn delete_config(&self, xpath: &str) -> Result<ApiResponse, ApiError> {
        self.request(&[("type", "config"), ("action", "delete"), ("xpath", xpath)])
            .await
    }

    async fn commit(&self) -> Result<(), ApiError> {
        let response = self
            .request(&[("type", "commit"), ("cmd", xml::COMMIT_CMD)])
            .await?;

        match response.job_id()? {
            Some(job) => self.wait_for_job(job).await,
            None => {
                debug!(
                    "Nothing to commit: {}",
                    response.message().unwrap_or("no job enqueued")
                );
                Ok(())
            }
        }
    }

    async fn vm_auth_key(&self, validity_days: u32) -> Result<String, ApiError> {
        self.op(&xml::vm_auth_key_cmd(validity_days))
            .await?
            .vm_auth_key()
    }
}
