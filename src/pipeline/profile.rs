use anyhow::{anyhow, Context, Result};
use regex::Regex;
use scraper::Selector;

use crate::models::Field;
use crate::pipeline::fallback::FallbackCatalog;
use crate::pipeline::identity::{IdentityProfile, RetryPolicy};
use crate::pipeline::rules::{FieldRule, RuleSpec};
use crate::pipeline::traits::RawDocument;

/// Everything the pipeline needs to scrape one supported source.
/// Built once at startup and read-only afterwards.
pub struct SiteProfile {
    pub host_suffix: &'static str,
    pub display_name: &'static str,
    pub identities: Vec<IdentityProfile>,
    pub retry: RetryPolicy,
    pub content_check: ContentCheck,
    pub rules: Vec<(Field, Vec<FieldRule>)>,
    pub images: ImageRules,
    pub features: FeatureRules,
    pub fallback: FallbackCatalog,
}

impl std::fmt::Debug for SiteProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteProfile")
            .field("host_suffix", &self.host_suffix)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl SiteProfile {
    pub fn compile_rules(
        specs: Vec<(Field, Vec<RuleSpec>)>,
    ) -> Result<Vec<(Field, Vec<FieldRule>)>> {
        specs
            .into_iter()
            .map(|(field, rules)| {
                let compiled = rules
                    .into_iter()
                    .map(FieldRule::compile)
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("rules for {}", field.name()))?;
                Ok((field, compiled))
            })
            .collect()
    }
}

/// Decides whether a fetched document is a real listing page rather
/// than a block page, interstitial, or empty shell. Failing this check
/// makes the fetch loop rotate to the next identity; it is not a field.
pub struct ContentCheck {
    min_bytes: usize,
    markers: Vec<&'static str>,
    year_token: Option<Regex>,
}

impl ContentCheck {
    pub fn new(min_bytes: usize, markers: Vec<&'static str>, require_year: bool) -> Result<Self> {
        let year_token = if require_year {
            Some(Regex::new(r"\b(?:19|20)\d{2}\b").context("year token pattern")?)
        } else {
            None
        };
        Ok(Self {
            min_bytes,
            markers,
            year_token,
        })
    }

    pub fn passes(&self, document: &RawDocument) -> bool {
        if document.bytes < self.min_bytes {
            return false;
        }
        if !self.markers.is_empty() {
            let lower = document.body.to_lowercase();
            if !self.markers.iter().any(|m| lower.contains(&m.to_lowercase())) {
                return false;
            }
        }
        match &self.year_token {
            Some(re) => re.is_match(&document.body),
            None => true,
        }
    }
}

/// Image collector configuration: gallery selectors, URL prefix for
/// relative sources, and keep/skip keyword filters.
pub struct ImageRules {
    pub selectors: Vec<Selector>,
    pub base_url: &'static str,
    pub keep: Vec<&'static str>,
    pub skip: Vec<&'static str>,
    pub limit: usize,
}

impl ImageRules {
    pub fn compile(
        selectors: &[&'static str],
        base_url: &'static str,
        keep: Vec<&'static str>,
        skip: Vec<&'static str>,
        limit: usize,
    ) -> Result<Self> {
        Ok(Self {
            selectors: compile_selectors(selectors)?,
            base_url,
            keep,
            skip,
            limit,
        })
    }
}

/// Feature collector configuration: item selectors inside feature
/// sections plus a catalog of known feature names matched in the text.
pub struct FeatureRules {
    pub item_selectors: Vec<Selector>,
    pub known: Vec<&'static str>,
    pub limit: usize,
}

impl FeatureRules {
    pub fn compile(
        item_selectors: &[&'static str],
        known: Vec<&'static str>,
        limit: usize,
    ) -> Result<Self> {
        Ok(Self {
            item_selectors: compile_selectors(item_selectors)?,
            known,
            limit,
        })
    }
}

fn compile_selectors(selectors: &[&'static str]) -> Result<Vec<Selector>> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).map_err(|e| anyhow!("bad selector {s:?}: {e:?}")))
        .collect()
}
