use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical marker for a field the pipeline could not resolve.
pub const UNKNOWN: &str = "N/A";

/// Scalar fields a site profile can declare extraction rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Price,
    Mileage,
    OdometerShowing,
    Dealer,
    Year,
    Make,
    Model,
    Variant,
    Transmission,
    FuelType,
    EngineSize,
    EngineCylinders,
    EngineType,
    ExteriorColor,
    BodyColour,
    InteriorColor,
    Doors,
    Seats,
    BodyType,
    DriveType,
    Vin,
    Location,
    AuctionDate,
    LotNumber,
    ComplianceDate,
    RegExpiry,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Price => "Price",
            Field::Mileage => "Mileage",
            Field::OdometerShowing => "OdometerShowing",
            Field::Dealer => "Dealer",
            Field::Year => "Year",
            Field::Make => "Make",
            Field::Model => "Model",
            Field::Variant => "Variant",
            Field::Transmission => "Transmission",
            Field::FuelType => "FuelType",
            Field::EngineSize => "EngineSize",
            Field::EngineCylinders => "EngineCylinders",
            Field::EngineType => "EngineType",
            Field::ExteriorColor => "ExteriorColor",
            Field::BodyColour => "BodyColour",
            Field::InteriorColor => "InteriorColor",
            Field::Doors => "Doors",
            Field::Seats => "Seats",
            Field::BodyType => "BodyType",
            Field::DriveType => "DriveType",
            Field::Vin => "VIN",
            Field::Location => "Location",
            Field::AuctionDate => "AuctionDate",
            Field::LotNumber => "LotNumber",
            Field::ComplianceDate => "ComplianceDate",
            Field::RegExpiry => "RegExpiry",
        }
    }
}

/// Best-effort extraction result before normalization. Scalar values are
/// keyed by [`Field`]; the list-valued fields have their own collectors.
#[derive(Debug, Default)]
pub struct PartialRecord {
    values: HashMap<Field, String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
}

impl PartialRecord {
    /// Stores a value unless it is blank. Rules only produce non-empty
    /// matches; this guards direct callers.
    pub fn set(&mut self, field: Field, value: String) {
        if !value.trim().is_empty() {
            self.values.insert(field, value);
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

/// Normalized vehicle listing. Every field is always present in the
/// serialized output; unresolved scalars carry [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Mileage")]
    pub mileage: String,
    #[serde(rename = "OdometerShowing")]
    pub odometer_showing: String,
    #[serde(rename = "Dealer")]
    pub dealer: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Variant")]
    pub variant: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "FuelType")]
    pub fuel_type: String,
    #[serde(rename = "EngineSize")]
    pub engine_size: String,
    #[serde(rename = "EngineCylinders")]
    pub engine_cylinders: String,
    #[serde(rename = "EngineType")]
    pub engine_type: String,
    #[serde(rename = "ExteriorColor")]
    pub exterior_color: String,
    #[serde(rename = "BodyColour")]
    pub body_colour: String,
    #[serde(rename = "InteriorColor")]
    pub interior_color: String,
    #[serde(rename = "Doors")]
    pub doors: String,
    #[serde(rename = "Seats")]
    pub seats: String,
    #[serde(rename = "BodyType")]
    pub body_type: String,
    #[serde(rename = "DriveType")]
    pub drive_type: String,
    #[serde(rename = "VIN")]
    pub vin: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "AuctionDate")]
    pub auction_date: String,
    #[serde(rename = "LotNumber")]
    pub lot_number: String,
    #[serde(rename = "ComplianceDate")]
    pub compliance_date: String,
    #[serde(rename = "RegExpiry")]
    pub reg_expiry: String,
    #[serde(rename = "Features")]
    pub features: Vec<String>,
    #[serde(rename = "Images")]
    pub images: Vec<String>,
    #[serde(rename = "URL")]
    pub url: String,
    /// True when the record was substituted by the fallback generator
    /// instead of extracted from the live document.
    pub degraded: bool,
}

impl ListingRecord {
    /// A record with every scalar set to [`UNKNOWN`] and the given URL.
    pub fn unknown(url: &str) -> Self {
        Self {
            title: UNKNOWN.to_string(),
            price: UNKNOWN.to_string(),
            mileage: UNKNOWN.to_string(),
            odometer_showing: UNKNOWN.to_string(),
            dealer: UNKNOWN.to_string(),
            year: UNKNOWN.to_string(),
            make: UNKNOWN.to_string(),
            model: UNKNOWN.to_string(),
            variant: UNKNOWN.to_string(),
            transmission: UNKNOWN.to_string(),
            fuel_type: UNKNOWN.to_string(),
            engine_size: UNKNOWN.to_string(),
            engine_cylinders: UNKNOWN.to_string(),
            engine_type: UNKNOWN.to_string(),
            exterior_color: UNKNOWN.to_string(),
            body_colour: UNKNOWN.to_string(),
            interior_color: UNKNOWN.to_string(),
            doors: UNKNOWN.to_string(),
            seats: UNKNOWN.to_string(),
            body_type: UNKNOWN.to_string(),
            drive_type: UNKNOWN.to_string(),
            vin: UNKNOWN.to_string(),
            location: UNKNOWN.to_string(),
            auction_date: UNKNOWN.to_string(),
            lot_number: UNKNOWN.to_string(),
            compliance_date: UNKNOWN.to_string(),
            reg_expiry: UNKNOWN.to_string(),
            features: Vec::new(),
            images: Vec::new(),
            url: url.to_string(),
            degraded: false,
        }
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Price => &mut self.price,
            Field::Mileage => &mut self.mileage,
            Field::OdometerShowing => &mut self.odometer_showing,
            Field::Dealer => &mut self.dealer,
            Field::Year => &mut self.year,
            Field::Make => &mut self.make,
            Field::Model => &mut self.model,
            Field::Variant => &mut self.variant,
            Field::Transmission => &mut self.transmission,
            Field::FuelType => &mut self.fuel_type,
            Field::EngineSize => &mut self.engine_size,
            Field::EngineCylinders => &mut self.engine_cylinders,
            Field::EngineType => &mut self.engine_type,
            Field::ExteriorColor => &mut self.exterior_color,
            Field::BodyColour => &mut self.body_colour,
            Field::InteriorColor => &mut self.interior_color,
            Field::Doors => &mut self.doors,
            Field::Seats => &mut self.seats,
            Field::BodyType => &mut self.body_type,
            Field::DriveType => &mut self.drive_type,
            Field::Vin => &mut self.vin,
            Field::Location => &mut self.location,
            Field::AuctionDate => &mut self.auction_date,
            Field::LotNumber => &mut self.lot_number,
            Field::ComplianceDate => &mut self.compliance_date,
            Field::RegExpiry => &mut self.reg_expiry,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_record_serializes_every_declared_key() {
        let record = ListingRecord::unknown("https://www.cars.com/vehicledetail/x/");
        let value = serde_json::to_value(&record).unwrap();
        let map = value.as_object().unwrap();

        // 27 scalars + Features + Images + URL + degraded
        assert_eq!(map.len(), 31);
        assert_eq!(map["Title"], UNKNOWN);
        assert_eq!(map["VIN"], UNKNOWN);
        assert_eq!(map["URL"], "https://www.cars.com/vehicledetail/x/");
        assert_eq!(map["degraded"], false);
        assert!(map["Features"].as_array().unwrap().is_empty());
    }

    #[test]
    fn partial_record_ignores_blank_values() {
        let mut partial = PartialRecord::default();
        partial.set(Field::Title, "  ".to_string());
        partial.set(Field::Price, "$22,500".to_string());

        assert!(!partial.is_set(Field::Title));
        assert_eq!(partial.get(Field::Price), Some("$22,500"));
    }

    #[test]
    fn set_field_targets_the_named_slot() {
        let mut record = ListingRecord::unknown("https://example.invalid/");
        record.set_field(Field::Vin, "1HGBH41JXMN109186".to_string());
        record.set_field(Field::DriveType, "Four Wheel Drive".to_string());

        assert_eq!(record.vin, "1HGBH41JXMN109186");
        assert_eq!(record.drive_type, "Four Wheel Drive");
        assert_eq!(record.title, UNKNOWN);
    }
}
