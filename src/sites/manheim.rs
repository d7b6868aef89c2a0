//! Manheim Australia site profile. Auction pages state most specs as
//! "Key: Value" lines, so pattern rules dominate; the AU-market
//! fallback prototypes mirror typical auction stock.

use anyhow::Result;

use crate::models::{Field, ListingRecord};
use crate::pipeline::fallback::FallbackCatalog;
use crate::pipeline::identity::{self, RetryPolicy};
use crate::pipeline::profile::{ContentCheck, FeatureRules, ImageRules, SiteProfile};
use crate::pipeline::rules::RuleSpec;

const BASE_URL: &str = "https://www.manheim.com.au";

pub fn profile() -> Result<SiteProfile> {
    let rules = SiteProfile::compile_rules(vec![
        (
            Field::Title,
            vec![
                RuleSpec::css(r#"h1[class*="title"]"#).len(10, 150),
                RuleSpec::css(r#"h1[class*="vehicle"]"#).len(10, 150),
                RuleSpec::css(".vehicle-title").len(10, 150),
                RuleSpec::css(".lot-title").len(10, 150),
                RuleSpec::css(r#"[class*="lot-title"]"#).len(10, 150),
                RuleSpec::css("h1").len(10, 150),
                RuleSpec::css_attr(r#"meta[property="og:title"]"#, "content").len(10, 150),
            ],
        ),
        (
            Field::Price,
            vec![
                RuleSpec::css(r#"[class*="price"]"#)
                    .refine(r"(?:AUD\s*)?\$[\d,]+")
                    .min_number(1000),
                RuleSpec::css(r#"[class*="bid"]"#)
                    .refine(r"(?:AUD\s*)?\$[\d,]+")
                    .min_number(1000),
                RuleSpec::css(".current-bid")
                    .refine(r"(?:AUD\s*)?\$[\d,]+")
                    .min_number(1000),
                RuleSpec::pattern(r"(?i)\b((?:AUD\s*)?\$[\d,]{4,})").min_number(1000),
            ],
        ),
        (
            Field::Mileage,
            vec![
                RuleSpec::pattern(r"(?i)odometer[:\s]+(\d{1,3}(?:,\d{3})*)\s*KM").suffix(" KM"),
                RuleSpec::pattern(r"(?i)(\d{1,3}(?:,\d{3})*)\s*KM\s+showing").suffix(" KM"),
                RuleSpec::css(r#"[class*="odometer"]"#)
                    .refine(r"[\d,]{2,}")
                    .suffix(" KM"),
            ],
        ),
        (
            Field::OdometerShowing,
            vec![RuleSpec::pattern(
                r"(?i)\d[\d,]*\s*KM\s+(showing|not\s+showing)",
            )],
        ),
        (
            Field::Dealer,
            vec![RuleSpec::constant("Manheim Australia")],
        ),
        (
            Field::Year,
            vec![
                RuleSpec::pattern(r"(?i)build\s+year[:\s]+(\d{4})"),
                RuleSpec::pattern(r"(?i)model\s+year[:\s]+(\d{4})"),
                RuleSpec::pattern(r"(?i)\byear[:\s]+(\d{4})"),
            ],
        ),
        (
            Field::Transmission,
            vec![
                RuleSpec::pattern(r"(?i)transmission[:\s]+([A-Za-z0-9 ]{2,29})"),
                RuleSpec::pattern(r"(?i)\btrans[:\s]+([A-Za-z0-9 ]{2,29})"),
            ],
        ),
        (
            Field::FuelType,
            vec![RuleSpec::pattern(
                r"(?i)fuel(?:\s+type)?[:\s]+([A-Za-z][A-Za-z ]{1,19})",
            )],
        ),
        (
            Field::EngineSize,
            vec![
                RuleSpec::pattern(r"(?i)engine[:\s]+\d+\s+cyl\s+([\d.]+)\s*L").suffix("L"),
                RuleSpec::pattern(r"(?i)\b([\d.]+)\s*L\b").suffix("L"),
            ],
        ),
        (
            Field::EngineCylinders,
            vec![RuleSpec::pattern(r"(?i)(\d+)\s*cyl\b")],
        ),
        (
            Field::EngineType,
            vec![RuleSpec::pattern(
                r"(?i)engine[:\s]+\d+\s+cyl\s+[\d.]+\s*L\s+([A-Za-z ]{3,40})",
            )],
        ),
        (
            Field::ExteriorColor,
            vec![
                RuleSpec::pattern(r"(?i)\bcolour[:\s]+([A-Za-z][A-Za-z ]{1,18})"),
                RuleSpec::pattern(r"(?i)body\s+colour[:\s]+([A-Za-z][A-Za-z ]{1,18})"),
            ],
        ),
        (
            Field::BodyColour,
            vec![
                RuleSpec::pattern(r"(?i)body\s+colour[:\s]+([A-Za-z][A-Za-z ]{1,18})"),
                RuleSpec::pattern(r"(?i)\bcolour[:\s]+([A-Za-z][A-Za-z ]{1,18})"),
            ],
        ),
        (
            Field::Doors,
            vec![RuleSpec::pattern(r"(?i)doors?[:\s]+(\d{1,2})\b")],
        ),
        (
            Field::Seats,
            vec![RuleSpec::pattern(r"(?i)seats?[:\s]+(\d{1,2})\b")],
        ),
        (
            Field::BodyType,
            vec![RuleSpec::pattern(
                r"(?i)body(?:\s+type)?[:\s]+([A-Za-z0-9 ]{2,49})",
            )],
        ),
        (
            Field::DriveType,
            vec![
                RuleSpec::pattern(r"(?i)drive\s+type[:\s]+([A-Za-z0-9 ]{2,29})"),
                RuleSpec::pattern(r"(?i)\bdrive[:\s]+([A-Za-z0-9 ]{2,29})"),
            ],
        ),
        (
            Field::Vin,
            vec![
                RuleSpec::pattern(r"(?i)\bVIN[:\s]+([A-HJ-NPR-Z0-9]{17})\b"),
                RuleSpec::css(r#"[class*="vin"]"#).refine(r"[A-HJ-NPR-Z0-9]{17}"),
                RuleSpec::css(r#"[class*="chassis"]"#).refine(r"[A-HJ-NPR-Z0-9]{17}"),
            ],
        ),
        (
            Field::Location,
            vec![
                RuleSpec::css(".auction-location").len(3, 60),
                RuleSpec::css(r#"[class*="location"]"#).len(3, 60),
                RuleSpec::pattern(r"(?i)location[:\s]+([^\n]{3,60})"),
            ],
        ),
        (
            Field::AuctionDate,
            vec![
                RuleSpec::css(".auction-date").len(3, 40),
                RuleSpec::css(".sale-date").len(3, 40),
                RuleSpec::pattern(r"(?i)auction\s+date[:\s]+([^\n]{3,40})"),
            ],
        ),
        (
            Field::LotNumber,
            vec![
                RuleSpec::pattern(r"(?i)lot\s*#?\s*(\d+)\b"),
                RuleSpec::css(r#"[class*="lot"]"#).refine(r"(?i)lot\s*#?\s*(\d+)"),
            ],
        ),
        (
            Field::ComplianceDate,
            vec![RuleSpec::pattern(
                r"(?i)compliance(?:\s+date)?[:\s]+(\d{2}/\d{4})",
            )],
        ),
        (
            Field::RegExpiry,
            vec![RuleSpec::pattern(
                r"(?i)reg(?:istration)?\.?\s*expiry[:\s]+([A-Za-z0-9/]+)",
            )],
        ),
    ])?;

    Ok(SiteProfile {
        host_suffix: "manheim.com.au",
        display_name: "Manheim Australia",
        identities: vec![
            identity::desktop().with_referer(format!("{BASE_URL}/")),
            identity::mobile().with_referer(format!("{BASE_URL}/")),
            identity::minimal(),
        ],
        retry: RetryPolicy::default(),
        content_check: ContentCheck::new(512, vec!["manheim", "odometer", "lot"], true)?,
        rules,
        images: ImageRules::compile(
            &[
                ".vehicle-images img",
                ".lot-images img",
                r#"[class*="gallery"] img"#,
                r#"[class*="carousel"] img"#,
                r#"[class*="slider"] img"#,
            ],
            BASE_URL,
            vec!["vehicle", "car", "lot", "auction", "manheim"],
            vec!["logo", "icon", "banner", "header", "footer", "button"],
            15,
        )?,
        features: FeatureRules::compile(
            &[
                r#"[class*="feature"] li"#,
                r#"[class*="option"] li"#,
                r#"[class*="equipment"] li"#,
            ],
            vec![
                "Air Conditioning",
                "Airbag",
                "Leather",
                "Metallic paint",
                "Service Books",
                "Sunroof",
                "Bluetooth",
                "Navigation",
                "Cruise Control",
                "Power Steering",
                "ABS",
                "Central Locking",
                "Electric Windows",
                "Power Mirrors",
            ],
            20,
        )?,
        fallback: FallbackCatalog::new(prototypes(), true),
    })
}

struct Proto {
    title: &'static str,
    price: &'static str,
    mileage: &'static str,
    year: &'static str,
    make: &'static str,
    model: &'static str,
    variant: &'static str,
    transmission: &'static str,
    fuel: &'static str,
    engine_size: &'static str,
    cylinders: &'static str,
    color: &'static str,
    doors: &'static str,
    seats: &'static str,
    body: &'static str,
    drive: &'static str,
    vin: &'static str,
    compliance: &'static str,
    features: &'static [&'static str],
}

const PROTOS: &[Proto] = &[
    Proto {
        title: "2021 Toyota Camry Ascent Sport",
        price: "AUD $28,500",
        mileage: "45,000 KM",
        year: "2021",
        make: "Toyota",
        model: "Camry",
        variant: "Ascent Sport",
        transmission: "Automatic",
        fuel: "Petrol",
        engine_size: "2.5L",
        cylinders: "4",
        color: "White",
        doors: "4",
        seats: "5",
        body: "Sedan",
        drive: "Front Wheel Drive",
        vin: "1HGBH41JXMN109186",
        compliance: "03/2021",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Service Books"],
    },
    Proto {
        title: "2019 Holden Commodore LT",
        price: "AUD $22,800",
        mileage: "62,000 KM",
        year: "2019",
        make: "Holden",
        model: "Commodore",
        variant: "LT",
        transmission: "Automatic",
        fuel: "Petrol",
        engine_size: "3.6L",
        cylinders: "6",
        color: "Silver",
        doors: "4",
        seats: "5",
        body: "Sedan",
        drive: "Rear Wheel Drive",
        vin: "6G1FK5H60KL123456",
        compliance: "02/2019",
        features: &["Air Conditioning", "Airbag", "Metallic paint", "Service Books"],
    },
    Proto {
        title: "2020 Ford Ranger XLT",
        price: "AUD $42,100",
        mileage: "38,000 KM",
        year: "2020",
        make: "Ford",
        model: "Ranger",
        variant: "XLT",
        transmission: "Manual",
        fuel: "Diesel",
        engine_size: "2.0L",
        cylinders: "4",
        color: "Black",
        doors: "4",
        seats: "5",
        body: "4D Dual Cab Utility",
        drive: "Four Wheel Drive",
        vin: "1FTFW1ET5LFA12345",
        compliance: "01/2020",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Service Books", "Sunroof"],
    },
    Proto {
        title: "2022 Mazda CX-5 Maxx Sport",
        price: "AUD $35,200",
        mileage: "15,000 KM",
        year: "2022",
        make: "Mazda",
        model: "CX-5",
        variant: "Maxx Sport",
        transmission: "Automatic",
        fuel: "Petrol",
        engine_size: "2.5L",
        cylinders: "4",
        color: "Blue",
        doors: "5",
        seats: "5",
        body: "SUV",
        drive: "All Wheel Drive",
        vin: "JM3KFBDV5N0123456",
        compliance: "04/2022",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Metallic paint", "Service Books"],
    },
    Proto {
        title: "2021 Subaru Outback 2.5i",
        price: "AUD $31,800",
        mileage: "28,000 KM",
        year: "2021",
        make: "Subaru",
        model: "Outback",
        variant: "2.5i",
        transmission: "CVT",
        fuel: "Petrol",
        engine_size: "2.5L",
        cylinders: "4",
        color: "Green",
        doors: "5",
        seats: "5",
        body: "Wagon",
        drive: "All Wheel Drive",
        vin: "4S4BSANC5M3123456",
        compliance: "03/2021",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Service Books", "Sunroof"],
    },
    Proto {
        title: "2019 BMW 320i",
        price: "AUD $38,500",
        mileage: "55,000 KM",
        year: "2019",
        make: "BMW",
        model: "320i",
        variant: "Base",
        transmission: "Automatic",
        fuel: "Petrol",
        engine_size: "2.0L",
        cylinders: "4",
        color: "Black",
        doors: "4",
        seats: "5",
        body: "Sedan",
        drive: "Rear Wheel Drive",
        vin: "WBA3A5G50KP123456",
        compliance: "02/2019",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Metallic paint", "Service Books", "Sunroof"],
    },
    Proto {
        title: "2020 Mercedes-Benz C200",
        price: "AUD $45,200",
        mileage: "32,000 KM",
        year: "2020",
        make: "Mercedes-Benz",
        model: "C200",
        variant: "Base",
        transmission: "Automatic",
        fuel: "Petrol",
        engine_size: "1.5L",
        cylinders: "4",
        color: "White",
        doors: "4",
        seats: "5",
        body: "Sedan",
        drive: "Rear Wheel Drive",
        vin: "WDD2050461A123456",
        compliance: "01/2020",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Metallic paint", "Service Books"],
    },
    Proto {
        title: "2021 Audi A4 35 TFSI",
        price: "AUD $42,800",
        mileage: "25,000 KM",
        year: "2021",
        make: "Audi",
        model: "A4",
        variant: "35 TFSI",
        transmission: "Automatic",
        fuel: "Petrol",
        engine_size: "2.0L",
        cylinders: "4",
        color: "Silver",
        doors: "4",
        seats: "5",
        body: "Sedan",
        drive: "Front Wheel Drive",
        vin: "WAUZZZ8V1MA123456",
        compliance: "03/2021",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Metallic paint", "Service Books", "Sunroof"],
    },
    Proto {
        title: "2022 Tesla Model 3 Standard Range",
        price: "AUD $58,900",
        mileage: "8,500 KM",
        year: "2022",
        make: "Tesla",
        model: "Model 3",
        variant: "Standard Range",
        transmission: "Automatic",
        fuel: "Electric",
        engine_size: "N/A",
        cylinders: "N/A",
        color: "White",
        doors: "4",
        seats: "5",
        body: "Sedan",
        drive: "Rear Wheel Drive",
        vin: "5YJ3E1EA4NF123456",
        compliance: "04/2022",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Service Books", "Sunroof"],
    },
    Proto {
        title: "2019 Nissan Navara ST-X",
        price: "AUD $36,500",
        mileage: "48,000 KM",
        year: "2019",
        make: "Nissan",
        model: "Navara",
        variant: "ST-X",
        transmission: "Manual",
        fuel: "Diesel",
        engine_size: "2.3L",
        cylinders: "4",
        color: "Red",
        doors: "4",
        seats: "5",
        body: "4D Dual Cab Utility",
        drive: "Four Wheel Drive",
        vin: "1N6BD0CT9KN123456",
        compliance: "02/2019",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Service Books"],
    },
    Proto {
        title: "2020 Hyundai i30 SR",
        price: "AUD $24,200",
        mileage: "41,000 KM",
        year: "2020",
        make: "Hyundai",
        model: "i30",
        variant: "SR",
        transmission: "Manual",
        fuel: "Petrol",
        engine_size: "1.6L",
        cylinders: "4",
        color: "Orange",
        doors: "5",
        seats: "5",
        body: "Hatchback",
        drive: "Front Wheel Drive",
        vin: "KMHD35LE5LU123456",
        compliance: "01/2020",
        features: &["Air Conditioning", "Airbag", "Metallic paint", "Service Books"],
    },
    Proto {
        title: "2021 Mitsubishi Triton GLS",
        price: "AUD $32,800",
        mileage: "35,000 KM",
        year: "2021",
        make: "Mitsubishi",
        model: "Triton",
        variant: "GLS",
        transmission: "Automatic",
        fuel: "Diesel",
        engine_size: "2.4L",
        cylinders: "4",
        color: "Grey",
        doors: "4",
        seats: "5",
        body: "4D Dual Cab Utility",
        drive: "Four Wheel Drive",
        vin: "MMALR05H1M0123456",
        compliance: "03/2021",
        features: &["Air Conditioning", "Airbag", "Leather Trim", "Service Books"],
    },
];

fn prototypes() -> Vec<ListingRecord> {
    PROTOS
        .iter()
        .map(|p| {
            let mut record = ListingRecord::unknown("");
            record.title = p.title.to_string();
            record.price = p.price.to_string();
            record.mileage = p.mileage.to_string();
            record.odometer_showing = "Showing".to_string();
            record.dealer = "Manheim Australia".to_string();
            record.year = p.year.to_string();
            record.make = p.make.to_string();
            record.model = p.model.to_string();
            record.variant = p.variant.to_string();
            record.transmission = p.transmission.to_string();
            record.fuel_type = p.fuel.to_string();
            record.engine_size = p.engine_size.to_string();
            record.engine_cylinders = p.cylinders.to_string();
            record.engine_type = "Direct Injection".to_string();
            record.exterior_color = p.color.to_string();
            record.body_colour = p.color.to_string();
            record.doors = p.doors.to_string();
            record.seats = p.seats.to_string();
            record.body_type = p.body.to_string();
            record.drive_type = p.drive.to_string();
            record.vin = p.vin.to_string();
            record.location = "Melbourne, VIC".to_string();
            record.compliance_date = p.compliance.to_string();
            record.reg_expiry = "UnReg".to_string();
            record.features = p.features.iter().map(|f| f.to_string()).collect();
            record
        })
        .collect()
}
