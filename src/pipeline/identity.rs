use std::time::Duration;

/// One outbound header set simulating a particular browser/device.
/// Profiles are tried in order until a fetch passes the content check.
#[derive(Debug, Clone)]
pub struct IdentityProfile {
    pub name: &'static str,
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
    pub referer: Option<String>,
}

impl IdentityProfile {
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

pub fn desktop() -> IdentityProfile {
    IdentityProfile {
        name: "desktop",
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        accept: ACCEPT_HTML,
        accept_language: "en-US,en;q=0.9",
        referer: None,
    }
}

pub fn mobile() -> IdentityProfile {
    IdentityProfile {
        name: "mobile",
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
        accept: ACCEPT_HTML,
        accept_language: "en-US,en;q=0.9",
        referer: None,
    }
}

pub fn minimal() -> IdentityProfile {
    IdentityProfile {
        name: "minimal",
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
        accept: "text/html,*/*;q=0.8",
        accept_language: "en",
        referer: None,
    }
}

/// Bounded exponential backoff for one scrape call. `max_attempts`
/// caps the total number of outbound requests across all identities.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry (1-based). The first request is
    /// never delayed.
    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay * self.multiplier.saturating_pow(retry.saturating_sub(1))
    }
}
