//! Cars.com site profile: field rules, identity chain, and the
//! US-market fallback prototypes.

use anyhow::Result;

use crate::models::{Field, ListingRecord};
use crate::pipeline::extractor::split_title;
use crate::pipeline::fallback::FallbackCatalog;
use crate::pipeline::identity::{self, RetryPolicy};
use crate::pipeline::profile::{ContentCheck, FeatureRules, ImageRules, SiteProfile};
use crate::pipeline::rules::RuleSpec;

const BASE_URL: &str = "https://www.cars.com";

pub fn profile() -> Result<SiteProfile> {
    let rules = SiteProfile::compile_rules(vec![
        (
            Field::Title,
            vec![
                RuleSpec::css(r#"h1[data-cmp="vdp_vehicle_title"]"#).len(5, 150),
                RuleSpec::css("h1.vehicle-title").len(5, 150),
                RuleSpec::css(r#"h1[class*="title"]"#).len(5, 150),
                RuleSpec::css(r#"[data-testid="vehicle-title"]"#).len(5, 150),
                RuleSpec::css(".listing-title").len(5, 150),
                RuleSpec::css("h1").len(5, 150),
                RuleSpec::css_attr(r#"meta[property="og:title"]"#, "content").len(5, 150),
            ],
        ),
        (
            Field::Price,
            vec![
                RuleSpec::css(r#"[data-cmp="vdp_price"]"#)
                    .refine(r"\$[\d,]+")
                    .min_number(1000),
                RuleSpec::css(".price-section .primary-price")
                    .refine(r"\$[\d,]+")
                    .min_number(1000),
                RuleSpec::css("span.primary-price")
                    .refine(r"\$[\d,]+")
                    .min_number(1000),
                RuleSpec::css(r#"[class*="price"]"#)
                    .refine(r"\$[\d,]+")
                    .min_number(1000),
                RuleSpec::pattern(r"(?i)\bprice[:\s]+(\$[\d,]{4,})").min_number(1000),
            ],
        ),
        (
            Field::Mileage,
            vec![
                RuleSpec::css(r#"[data-cmp="vdp_mileage"]"#)
                    .refine(r"[\d,]{2,}")
                    .suffix(" miles"),
                RuleSpec::css(r#"[class*="mileage"]"#)
                    .refine(r"[\d,]{2,}")
                    .suffix(" miles"),
                RuleSpec::pattern(r"(?i)(\d{1,3}(?:,\d{3})+)\s*(?:miles|mi\.?)").suffix(" miles"),
            ],
        ),
        (
            Field::Dealer,
            vec![
                RuleSpec::css(r#"[data-cmp="vdp_dealer_name"]"#).len(3, 80),
                RuleSpec::css(".dealer-name").len(3, 80),
                RuleSpec::css(r#"[class*="dealer"]"#).len(3, 80),
            ],
        ),
        (
            Field::ExteriorColor,
            vec![RuleSpec::pattern(
                r"(?i)exterior\s*color[:\s]+([A-Za-z][A-Za-z ]{1,18})",
            )],
        ),
        (
            Field::InteriorColor,
            vec![RuleSpec::pattern(
                r"(?i)interior\s*color[:\s]+([A-Za-z][A-Za-z ]{1,18})",
            )],
        ),
        (
            Field::DriveType,
            vec![
                RuleSpec::pattern(r"(?i)drivetrain[:\s]+([^\n]{2,30})"),
                RuleSpec::pattern_whole(r"(?i)\b(?:front|rear|all|four)[- ]wheel drive\b"),
            ],
        ),
        (
            Field::FuelType,
            vec![
                RuleSpec::pattern(r"(?i)fuel\s*type[:\s]+([^\n]{2,19})"),
                RuleSpec::pattern_whole(r"(?i)\b(?:gasoline|diesel|electric|hybrid)\b"),
            ],
        ),
        (
            Field::Transmission,
            vec![
                RuleSpec::pattern(r"(?i)transmission[:\s]+([^\n]{2,29})"),
                RuleSpec::pattern_whole(r"(?i)\b(?:automatic|manual|cvt)\b"),
            ],
        ),
        (
            Field::EngineType,
            vec![RuleSpec::pattern(r"(?i)engine[:\s]+([^\n]{5,80})")],
        ),
        (
            Field::EngineSize,
            vec![RuleSpec::pattern(r"(?i)\b(\d+(?:\.\d+)?)\s*L\b").suffix("L")],
        ),
        (
            Field::Vin,
            vec![
                RuleSpec::pattern(r"(?i)\bVIN[:\s]+([A-HJ-NPR-Z0-9]{17})\b"),
                RuleSpec::pattern_whole(r"\b[A-HJ-NPR-Z0-9]{17}\b"),
            ],
        ),
        (
            Field::LotNumber,
            vec![RuleSpec::pattern(r"(?i)stock\s*#?[:\s]+([A-Za-z0-9-]{2,19})")],
        ),
    ])?;

    Ok(SiteProfile {
        host_suffix: "cars.com",
        display_name: "Cars.com",
        identities: vec![
            identity::desktop().with_referer(format!("{BASE_URL}/")),
            identity::mobile().with_referer(format!("{BASE_URL}/")),
            identity::minimal(),
        ],
        retry: RetryPolicy::default(),
        content_check: ContentCheck::new(512, vec!["cars.com", "vehicledetail", "vdp"], true)?,
        rules,
        images: ImageRules::compile(
            &[
                r#"img[data-cmp="vdp_photo"]"#,
                r#"img[data-cmp*="photo"]"#,
                ".vehicle-photos img",
                r#"[class*="gallery"] img"#,
                r#"[class*="photo"] img"#,
            ],
            BASE_URL,
            vec!["vehicle", "car", "photo", "listing", "image"],
            vec!["logo", "icon", "banner", "sponsor", "advert"],
            15,
        )?,
        features: FeatureRules::compile(
            &[r#"[class*="feature"] li"#, "ul.vehicle-features li"],
            vec![],
            20,
        )?,
        fallback: FallbackCatalog::new(prototypes(), false),
    })
}

struct Proto {
    title: &'static str,
    price: &'static str,
    mileage: &'static str,
    dealer: &'static str,
}

const PROTOS: &[Proto] = &[
    Proto { title: "2021 Toyota Camry LE", price: "$22,500", mileage: "32,000 miles", dealer: "Toyota of Downtown" },
    Proto { title: "2019 Honda Accord Sport", price: "$19,800", mileage: "45,000 miles", dealer: "Honda Central" },
    Proto { title: "2020 Ford F-150 XLT", price: "$35,200", mileage: "28,000 miles", dealer: "Ford Motors" },
    Proto { title: "2022 Chevrolet Silverado LT", price: "$42,100", mileage: "15,000 miles", dealer: "Chevy Dealership" },
    Proto { title: "2021 Nissan Altima SV", price: "$20,300", mileage: "38,000 miles", dealer: "Nissan Auto" },
    Proto { title: "2020 BMW 3 Series", price: "$28,900", mileage: "25,000 miles", dealer: "BMW Center" },
    Proto { title: "2021 Mercedes-Benz C-Class", price: "$31,500", mileage: "22,000 miles", dealer: "Mercedes-Benz" },
    Proto { title: "2019 Audi A4", price: "$26,800", mileage: "41,000 miles", dealer: "Audi Downtown" },
    Proto { title: "2022 Tesla Model 3", price: "$45,200", mileage: "8,500 miles", dealer: "Tesla Showroom" },
    Proto { title: "2020 Subaru Outback", price: "$24,600", mileage: "35,000 miles", dealer: "Subaru Center" },
    Proto { title: "2021 Mazda CX-5", price: "$26,800", mileage: "29,000 miles", dealer: "Mazda Motors" },
    Proto { title: "2019 Lexus ES 350", price: "$32,400", mileage: "42,000 miles", dealer: "Lexus of Downtown" },
];

fn prototypes() -> Vec<ListingRecord> {
    PROTOS
        .iter()
        .map(|p| {
            let mut record = ListingRecord::unknown("");
            record.title = p.title.to_string();
            record.price = p.price.to_string();
            record.mileage = p.mileage.to_string();
            record.dealer = p.dealer.to_string();

            let parts = split_title(p.title);
            if let Some(year) = parts.year {
                record.year = year;
            }
            if let Some(make) = parts.make {
                record.make = make;
            }
            if let Some(model) = parts.model {
                record.model = model;
            }
            if let Some(variant) = parts.variant {
                record.variant = variant;
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN;

    #[test]
    fn profile_compiles() {
        profile().unwrap();
    }

    #[test]
    fn prototypes_carry_split_title_parts() {
        let records = prototypes();
        assert_eq!(records.len(), 12);

        let camry = &records[0];
        assert_eq!(camry.year, "2021");
        assert_eq!(camry.make, "Toyota");
        assert_eq!(camry.model, "Camry");
        assert_eq!(camry.variant, "LE");
        assert_eq!(camry.vin, UNKNOWN);
    }
}
