//! HTTP reachability probe.

use crate::check::ports::{Probe, ProbeError, ProbeReport, ProbeResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;
use std::time::Instant;

/// Probe that issues a GET request and inspects the response status.
///
/// Transport-level failures (refused connection, DNS miss) are reported as
/// an unhealthy target rather than a probe error: reachability is exactly
/// what this probe observes.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: Url,
    expected_status: Option<u16>,
}

impl HttpProbe {
    /// Creates an HTTP probe for the given URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidTarget`] when the URL does not parse.
    pub fn new(client: Client, url: &str) -> Result<Self, ProbeError> {
        let parsed =
            Url::parse(url).map_err(|err| ProbeError::InvalidTarget(format!("{url}: {err}")))?;
        Ok(Self {
            client,
            url: parsed,
            expected_status: None,
        })
    }

    /// Requires an exact response status instead of any 2xx.
    #[must_use]
    pub const fn with_expected_status(mut self, status: u16) -> Self {
        self.expected_status = Some(status);
        self
    }

    /// Returns the probed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self) -> ProbeResult<ProbeReport> {
        let started = Instant::now();
        let response = match self.client.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                return Ok(ProbeReport::unhealthy(format!(
                    "request to {} failed: {err}",
                    self.url
                )));
            }
        };

        let status = response.status();
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let detail = json!({
            "url": self.url.as_str(),
            "status": status.as_u16(),
            "elapsed_ms": elapsed_ms,
        });

        let healthy = self
            .expected_status
            .map_or_else(|| status.is_success(), |expected| status.as_u16() == expected);

        let report = if healthy {
            ProbeReport::healthy(format!("{} responded {status} in {elapsed_ms}ms", self.url))
        } else {
            ProbeReport::unhealthy(format!("{} responded {status}", self.url))
        };
        Ok(report.with_detail(detail))
    }
}
