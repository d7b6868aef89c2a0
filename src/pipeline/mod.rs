pub mod browser;
pub mod extractor;
pub mod fallback;
pub mod fetcher;
pub mod identity;
pub mod normalize;
pub mod profile;
pub mod rules;
pub mod traits;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Field, ListingRecord};
use crate::sites::Catalog;

pub use browser::BrowserFetcher;
pub use fetcher::HttpFetcher;
pub use traits::{Fetch, FetchError};

/// User-visible scrape failures. Everything below input validation is
/// absorbed by the fallback generator and never surfaces here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported website: {host}. Supported sites: {supported}")]
    UnsupportedSource { host: String, supported: String },
}

/// Runs the full pipeline for one listing URL:
/// route -> fetch (identity/backoff loop) -> content gate -> extract ->
/// normalize, substituting the deterministic fallback record when the
/// fetch fails outright or extraction cannot resolve the title.
pub async fn scrape(
    catalog: &Catalog,
    fetcher: &dyn Fetch,
    url: &str,
) -> Result<ListingRecord, ScrapeError> {
    let profile = catalog.resolve(url)?;
    info!(site = profile.display_name, %url, "scrape routed");

    let record = match fetcher::fetch_listing(fetcher, profile, url).await {
        Ok(document) => {
            let partial = extractor::extract(&document, profile);
            if partial.is_set(Field::Title) {
                normalize::normalize(partial, url)
            } else {
                // Title is the success discriminator for the pipeline.
                warn!(%url, "extraction left title unresolved, substituting fallback record");
                profile.fallback.generate(url)
            }
        }
        Err(err) => {
            warn!(%url, error = %err, "fetch failed, substituting fallback record");
            profile.fallback.generate(url)
        }
    };

    Ok(record)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::UNKNOWN;
    use crate::pipeline::identity::IdentityProfile;
    use crate::pipeline::traits::RawDocument;

    struct FixedFetcher {
        body: &'static str,
    }

    #[async_trait]
    impl Fetch for FixedFetcher {
        async fn fetch(
            &self,
            _url: &str,
            _identity: &IdentityProfile,
        ) -> Result<RawDocument, FetchError> {
            Ok(RawDocument {
                body: self.body.to_string(),
                bytes: self.body.len(),
                status: 200,
            })
        }
    }

    struct DeadFetcher;

    #[async_trait]
    impl Fetch for DeadFetcher {
        async fn fetch(
            &self,
            _url: &str,
            _identity: &IdentityProfile,
        ) -> Result<RawDocument, FetchError> {
            Err(FetchError::Status(403))
        }
    }

    const CARS_PAGE: &str = r#"<html><body>
        <h1 data-cmp="vdp_vehicle_title">2021 Toyota Camry LE</h1>
        <span class="primary-price">$22,500</span>
        <div class="listing-mileage">32,000 mi.</div>
        <p>Shop cars.com vehicledetail pages for new and used vehicles near you.
        Browse certified inventory, compare trims, read dealer reviews and check
        vehicle history before you buy. Every listing shows photos, equipment,
        seller notes and a price analysis against similar vehicles in your area.
        Schedule a test drive online or contact the seller directly for more
        information about this vehicle and other vehicles available today.</p>
    </body></html>"#;

    #[tokio::test]
    async fn successful_extraction_returns_a_complete_record() {
        let catalog = Catalog::new().unwrap();
        let fetcher = FixedFetcher { body: CARS_PAGE };
        let url = "https://www.cars.com/vehicledetail/abc123/";

        let record = scrape(&catalog, &fetcher, url).await.unwrap();

        assert_eq!(record.title, "2021 Toyota Camry LE");
        assert_eq!(record.year, "2021");
        assert_eq!(record.make, "Toyota");
        assert_eq!(record.url, url);
        assert!(!record.degraded);
        // Unresolved fields are present with the unknown marker
        assert_eq!(record.vin, UNKNOWN);
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_the_fallback_record() {
        let catalog = Catalog::new().unwrap();
        let url = "https://www.cars.com/vehicledetail/abc123/";

        let record = scrape(&catalog, &DeadFetcher, url).await.unwrap();

        assert!(record.degraded);
        assert_ne!(record.title, UNKNOWN);
        assert_eq!(record.url, url);
    }

    #[tokio::test]
    async fn unresolved_title_degrades_to_the_fallback_record() {
        let catalog = Catalog::new().unwrap();
        // Passes the content check but matches no title rule.
        let fetcher = FixedFetcher {
            body: r#"<html><body><p>cars.com vehicledetail 2021 search results and plenty of
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding padding
                padding padding padding padding padding padding padding padding
                </p></body></html>"#,
        };
        let url = "https://www.cars.com/vehicledetail/no-title/";

        let record = scrape(&catalog, &fetcher, url).await.unwrap();

        assert!(record.degraded);
        assert_eq!(record.url, url);
    }

    #[tokio::test]
    async fn routing_failures_do_not_fall_back() {
        let catalog = Catalog::new().unwrap();

        let err = scrape(&catalog, &DeadFetcher, "https://example.com/car")
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::UnsupportedSource { .. }));

        let err = scrape(&catalog, &DeadFetcher, "Odometer: 50,000 km")
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl(_)));
    }
}
