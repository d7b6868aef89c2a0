pub mod cars_com;
pub mod manheim;

use anyhow::Result;
use url::Url;

use crate::pipeline::profile::SiteProfile;
use crate::pipeline::ScrapeError;

/// Keywords that mark the input as pasted listing data rather than a
/// listing URL. An explicit guard, checked before routing.
const DATA_KEYWORDS: &[&str] = &[
    "odometer",
    "colour",
    "transmission",
    "engine",
    "body",
    "features",
    "details",
    "build year",
    "compliance",
    "make:",
    "model:",
    "vin",
];

/// The read-only catalog of supported sources. Built once at startup;
/// shared by every scrape call for the process lifetime.
pub struct Catalog {
    profiles: Vec<SiteProfile>,
}

impl Catalog {
    pub fn new() -> Result<Self> {
        Ok(Self {
            profiles: vec![cars_com::profile()?, manheim::profile()?],
        })
    }

    /// Validates the input and routes it to a site profile by host
    /// suffix. Never touches the network.
    pub fn resolve(&self, raw: &str) -> Result<&SiteProfile, ScrapeError> {
        let host = validate(raw)?;
        self.profiles
            .iter()
            .find(|p| host_matches(&host, p.host_suffix))
            .ok_or_else(|| ScrapeError::UnsupportedSource {
                host,
                supported: self.supported().join(", "),
            })
    }

    pub fn supported(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.host_suffix).collect()
    }

    pub fn sites(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.profiles.iter().map(|p| (p.host_suffix, p.display_name))
    }
}

fn validate(raw: &str) -> Result<String, ScrapeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidUrl("URL is required".to_string()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ScrapeError::InvalidUrl(
            "URL must start with http:// or https://".to_string(),
        ));
    }

    let lower = trimmed.to_lowercase();
    if let Some(keyword) = DATA_KEYWORDS.iter().find(|k| lower.contains(*k)) {
        return Err(ScrapeError::InvalidUrl(format!(
            "input contains {keyword:?} and looks like listing data, not a listing URL"
        )));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;
    match parsed.host_str() {
        Some(host) => Ok(host.to_lowercase()),
        None => Err(ScrapeError::InvalidUrl("URL has no host".to_string())),
    }
}

/// Registered-domain suffix match with a label boundary, so
/// `notcars.com` does not route to cars.com.
fn host_matches(host: &str, suffix: &str) -> bool {
    host == suffix || host.ends_with(&format!(".{suffix}"))
}
