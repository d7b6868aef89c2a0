use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use crate::pipeline::identity::IdentityProfile;
use crate::pipeline::profile::SiteProfile;
use crate::pipeline::traits::{Fetch, FetchError, RawDocument};

/// Plain HTTP fetcher. One GET per call, headers from the identity
/// profile, client-level timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, identity: &IdentityProfile) -> Result<RawDocument, FetchError> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, identity.user_agent)
            .header(ACCEPT, identity.accept)
            .header(ACCEPT_LANGUAGE, identity.accept_language);
        if let Some(referer) = &identity.referer {
            request = request.header(REFERER, referer.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(RawDocument {
            bytes: body.len(),
            status: status.as_u16(),
            body,
        })
    }
}

/// One outbound request, recorded for the retry decision and the log.
/// Discarded once the call resolves.
#[derive(Debug)]
pub struct FetchAttempt {
    pub identity: &'static str,
    pub status: Option<u16>,
    pub bytes: usize,
    pub elapsed: Duration,
    pub at: DateTime<Utc>,
}

/// Drives the retry loop for one scrape call: walks the profile's
/// identity chain, retries retryable failures with exponential backoff,
/// and rotates identity when a document fails the content check. Total
/// outbound requests are capped by the profile's retry policy.
pub async fn fetch_listing(
    fetcher: &dyn Fetch,
    profile: &SiteProfile,
    url: &str,
) -> Result<RawDocument, FetchError> {
    let policy = &profile.retry;
    let mut attempts = 0u32;
    let mut identity_idx = 0usize;
    let mut last_err: Option<FetchError> = None;

    while attempts < policy.max_attempts && identity_idx < profile.identities.len() {
        let identity = &profile.identities[identity_idx];

        if attempts > 0 {
            let delay = policy.delay(attempts);
            debug!(?delay, "backing off before next attempt");
            tokio::time::sleep(delay).await;
        }
        attempts += 1;

        let at = Utc::now();
        let started = Instant::now();
        let outcome = fetcher.fetch(url, identity).await;

        let attempt = FetchAttempt {
            identity: identity.name,
            status: match &outcome {
                Ok(doc) => Some(doc.status),
                Err(FetchError::Status(s)) => Some(*s),
                Err(_) => None,
            },
            bytes: outcome.as_ref().map(|d| d.bytes).unwrap_or(0),
            elapsed: started.elapsed(),
            at,
        };
        debug!(
            identity = attempt.identity,
            status = ?attempt.status,
            bytes = attempt.bytes,
            elapsed_ms = attempt.elapsed.as_millis() as u64,
            at = %attempt.at,
            attempts,
            "fetch attempt resolved"
        );

        match outcome {
            Ok(document) => {
                if profile.content_check.passes(&document) {
                    return Ok(document);
                }
                warn!(
                    identity = identity.name,
                    bytes = document.bytes,
                    "document failed content check, rotating identity"
                );
                identity_idx += 1;
                last_err = Some(FetchError::Blocked);
            }
            Err(err) if err.retryable() => {
                warn!(identity = identity.name, error = %err, "retryable fetch failure");
                last_err = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_err.unwrap_or(FetchError::Blocked))
}
