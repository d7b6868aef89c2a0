use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;
use tracing::debug;

use crate::models::{Field, PartialRecord};
use crate::pipeline::profile::{FeatureRules, ImageRules, SiteProfile};
use crate::pipeline::rules::normalize_whitespace;
use crate::pipeline::traits::RawDocument;

/// Applies the profile's field rules against one document snapshot.
/// Fields resolve independently; the first rule match that passes
/// validity wins per field.
pub fn extract(document: &RawDocument, profile: &SiteProfile) -> PartialRecord {
    let html = Html::parse_document(&document.body);
    let text = plain_text(&html);

    let mut partial = PartialRecord::default();
    for (field, rules) in &profile.rules {
        for rule in rules {
            if let Some(value) = rule.apply(&html, &text) {
                debug!(field = field.name(), %value, "field resolved");
                partial.set(*field, value);
                break;
            }
        }
    }

    partial.images = collect_images(&html, &profile.images);
    partial.features = collect_features(&html, &text, &profile.features);

    if let Some(title) = partial.get(Field::Title).map(str::to_string) {
        apply_title_split(&mut partial, &title);
    }

    partial
}

/// Plain-text form of the document for pattern rules. Text nodes are
/// joined with newlines so spec-sheet lines like "Key: Value" keep
/// their boundaries.
fn plain_text(html: &Html) -> String {
    html.root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Year / make / model / variant derived from a listing title.
#[derive(Debug, Default, PartialEq)]
pub struct TitleParts {
    pub year: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
}

fn title_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // "2021 Chevrolet Silverado LTZ Premium" -> year make model variant
            Regex::new(r"^((?:19|20)\d{2})\s+([A-Za-z][\w-]*)\s+([A-Za-z0-9-]+)\s+(.+)$")
                .expect("title pattern"),
            // "2020 Toyota Camry" -> year make model
            Regex::new(r"^((?:19|20)\d{2})\s+([A-Za-z][\w-]*)\s+(\S+)$").expect("title pattern"),
            // "Toyota Camry 2020" -> make model(+variant) year
            Regex::new(r"^([A-Za-z][\w-]*)\s+(.+?)\s+((?:19|20)\d{2})$").expect("title pattern"),
        ]
    })
}

/// Splits a title with a fixed pattern priority: most structured form
/// first, generic whitespace split last. Never fails outright; worst
/// case the whole remainder lands in `model` and `variant` stays unset.
pub fn split_title(title: &str) -> TitleParts {
    let title = normalize_whitespace(title);
    if title.is_empty() {
        return TitleParts::default();
    }

    let [structured, year_make_model, trailing_year] = title_patterns();

    if let Some(caps) = structured.captures(&title) {
        return TitleParts {
            year: Some(caps[1].to_string()),
            make: Some(caps[2].to_string()),
            model: Some(caps[3].to_string()),
            variant: Some(caps[4].to_string()),
        };
    }

    if let Some(caps) = year_make_model.captures(&title) {
        return TitleParts {
            year: Some(caps[1].to_string()),
            make: Some(caps[2].to_string()),
            model: Some(caps[3].to_string()),
            variant: None,
        };
    }

    if let Some(caps) = trailing_year.captures(&title) {
        let (model, variant) = split_model_variant(&caps[2]);
        return TitleParts {
            year: Some(caps[3].to_string()),
            make: Some(caps[1].to_string()),
            model: Some(model),
            variant,
        };
    }

    // Generic split: first word is the make, the remainder is the model.
    let mut words = title.split_whitespace();
    let make = words.next().map(str::to_string);
    let rest = words.collect::<Vec<_>>().join(" ");
    TitleParts {
        year: find_year(&title),
        make,
        model: if rest.is_empty() { None } else { Some(rest) },
        variant: None,
    }
}

fn split_model_variant(model_variant: &str) -> (String, Option<String>) {
    let mut words = model_variant.split_whitespace();
    let model = words.next().unwrap_or(model_variant).to_string();
    let variant = words.collect::<Vec<_>>().join(" ");
    if variant.is_empty() {
        (model, None)
    } else {
        (model, Some(variant))
    }
}

fn find_year(text: &str) -> Option<String> {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    let year = YEAR.get_or_init(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern"));
    year.find(text).map(|m| m.as_str().to_string())
}

/// Derived fields overwrite rule-extracted values: the title is the
/// most reliable source for year/make/model/variant on every supported
/// site.
fn apply_title_split(partial: &mut PartialRecord, title: &str) {
    let parts = split_title(title);
    if let Some(year) = parts.year {
        partial.set(Field::Year, year);
    }
    if let Some(make) = parts.make {
        partial.set(Field::Make, make);
    }
    if let Some(model) = parts.model {
        partial.set(Field::Model, model);
    }
    if let Some(variant) = parts.variant {
        partial.set(Field::Variant, variant);
    }
}

fn collect_images(html: &Html, rules: &ImageRules) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();

    for selector in &rules.selectors {
        for element in html.select(selector) {
            let src = element
                .value()
                .attr("src")
                .or_else(|| element.value().attr("data-src"))
                .or_else(|| element.value().attr("data-lazy"))
                .or_else(|| element.value().attr("data-original"));
            let Some(src) = src else { continue };

            let absolute = absolutize(src, rules.base_url);
            let lower = absolute.to_lowercase();
            if !rules.keep.is_empty() && !rules.keep.iter().any(|k| lower.contains(k)) {
                continue;
            }
            if rules.skip.iter().any(|s| lower.contains(s)) {
                continue;
            }
            if images.contains(&absolute) {
                continue;
            }

            images.push(absolute);
            if images.len() >= rules.limit {
                return images;
            }
        }
    }

    images
}

fn absolutize(src: &str, base_url: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{base_url}{src}")
    } else if src.starts_with("http") {
        src.to_string()
    } else {
        format!("{base_url}/{src}")
    }
}

fn collect_features(html: &Html, text: &str, rules: &FeatureRules) -> Vec<String> {
    let mut features: Vec<String> = Vec::new();

    for selector in &rules.item_selectors {
        for element in html.select(selector) {
            let item = normalize_whitespace(&element.text().collect::<String>());
            if item.len() > 3 && item.len() < 100 && !features.contains(&item) {
                features.push(item);
            }
        }
    }

    let lower = text.to_lowercase();
    for known in &rules.known {
        if lower.contains(&known.to_lowercase()) {
            let known = known.to_string();
            if !features.contains(&known) {
                features.push(known);
            }
        }
    }

    features.truncate(rules.limit);
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingRecord;
    use crate::pipeline::fallback::FallbackCatalog;
    use crate::pipeline::identity::{self, RetryPolicy};
    use crate::pipeline::profile::ContentCheck;
    use crate::pipeline::rules::RuleSpec;

    #[test]
    fn structured_title_splits_into_all_parts() {
        let parts = split_title("2021 Toyota Camry LE");
        assert_eq!(parts.year.as_deref(), Some("2021"));
        assert_eq!(parts.make.as_deref(), Some("Toyota"));
        assert!(parts.model.as_deref().unwrap().starts_with("Camry"));
        assert!(parts.variant.as_deref().unwrap().contains("LE"));
    }

    #[test]
    fn year_make_model_without_variant() {
        let parts = split_title("2020 Toyota Camry");
        assert_eq!(parts.year.as_deref(), Some("2020"));
        assert_eq!(parts.make.as_deref(), Some("Toyota"));
        assert_eq!(parts.model.as_deref(), Some("Camry"));
        assert_eq!(parts.variant, None);
    }

    #[test]
    fn trailing_year_form() {
        let parts = split_title("Ford Ranger XLT 2020");
        assert_eq!(parts.year.as_deref(), Some("2020"));
        assert_eq!(parts.make.as_deref(), Some("Ford"));
        assert_eq!(parts.model.as_deref(), Some("Ranger"));
        assert_eq!(parts.variant.as_deref(), Some("XLT"));
    }

    #[test]
    fn split_never_fails_outright() {
        let parts = split_title("Commodore Wagon Special");
        assert_eq!(parts.make.as_deref(), Some("Commodore"));
        assert_eq!(parts.model.as_deref(), Some("Wagon Special"));
        assert_eq!(parts.variant, None);

        assert_eq!(split_title("   "), TitleParts::default());
    }

    #[test]
    fn hyphenated_makes_survive() {
        let parts = split_title("2020 Mercedes-Benz C200 Base");
        assert_eq!(parts.make.as_deref(), Some("Mercedes-Benz"));
        assert_eq!(parts.model.as_deref(), Some("C200"));
    }

    fn test_profile() -> SiteProfile {
        let rules = SiteProfile::compile_rules(vec![
            (
                Field::Title,
                vec![
                    RuleSpec::css("h1.vehicle-title").len(10, 150),
                    RuleSpec::css("h1"),
                ],
            ),
            (
                Field::Price,
                vec![RuleSpec::css("span.primary-price")
                    .refine(r"\$[\d,]+")
                    .min_number(1000)],
            ),
            (
                Field::Vin,
                vec![RuleSpec::pattern(r"(?i)VIN[:\s]+([A-HJ-NPR-Z0-9]{17})")],
            ),
        ])
        .unwrap();

        SiteProfile {
            host_suffix: "example.com",
            display_name: "Example",
            identities: vec![identity::desktop()],
            retry: RetryPolicy::default(),
            content_check: ContentCheck::new(0, vec![], false).unwrap(),
            rules,
            images: ImageRules::compile(
                &["div.gallery img"],
                "https://www.example.com",
                vec!["vehicle", "photo"],
                vec!["logo", "banner"],
                15,
            )
            .unwrap(),
            features: FeatureRules::compile(
                &["ul.features li"],
                vec!["Sunroof", "Bluetooth"],
                20,
            )
            .unwrap(),
            fallback: FallbackCatalog::new(vec![ListingRecord::unknown("")], false),
        }
    }

    fn fixture() -> RawDocument {
        let body = r#"<html><body>
            <h1 class="vehicle-title">2021 Toyota Camry LE</h1>
            <span class="primary-price">$22,500 or best offer</span>
            <div class="specs">VIN: 4T1C11AK3MU123456</div>
            <div class="gallery">
                <img src="/photos/vehicle-1.jpg">
                <img data-src="//cdn.example.com/vehicle-2-photo.jpg">
                <img src="/assets/logo.png">
            </div>
            <ul class="features"><li>Air Conditioning</li><li>ok</li></ul>
            <p>Extras include a sunroof.</p>
        </body></html>"#
            .to_string();
        RawDocument {
            bytes: body.len(),
            body,
            status: 200,
        }
    }

    #[test]
    fn extract_resolves_fields_and_derives_title_parts() {
        let profile = test_profile();
        let partial = extract(&fixture(), &profile);

        assert_eq!(partial.get(Field::Title), Some("2021 Toyota Camry LE"));
        assert_eq!(partial.get(Field::Price), Some("$22,500"));
        assert_eq!(partial.get(Field::Vin), Some("4T1C11AK3MU123456"));
        // Derived from the title
        assert_eq!(partial.get(Field::Year), Some("2021"));
        assert_eq!(partial.get(Field::Make), Some("Toyota"));
        assert_eq!(partial.get(Field::Model), Some("Camry"));
        assert_eq!(partial.get(Field::Variant), Some("LE"));
    }

    #[test]
    fn image_collector_resolves_and_filters_sources() {
        let profile = test_profile();
        let partial = extract(&fixture(), &profile);

        assert_eq!(
            partial.images,
            vec![
                "https://www.example.com/photos/vehicle-1.jpg".to_string(),
                "https://cdn.example.com/vehicle-2-photo.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn feature_collector_merges_items_and_known_tokens() {
        let profile = test_profile();
        let partial = extract(&fixture(), &profile);

        // "ok" is below the minimum item length
        assert_eq!(
            partial.features,
            vec!["Air Conditioning".to_string(), "Sunroof".to_string()]
        );
    }
}
