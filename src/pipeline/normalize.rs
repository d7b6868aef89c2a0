use crate::models::{ListingRecord, PartialRecord};

/// Fills every unresolved field with the unknown marker so the output
/// always carries the full declared schema. Runs only after a
/// successful extraction; full failures go through the fallback
/// generator instead.
pub fn normalize(partial: PartialRecord, url: &str) -> ListingRecord {
    let mut record = ListingRecord::unknown(url);

    for (field, value) in partial.iter() {
        if !value.trim().is_empty() {
            record.set_field(field, value.to_string());
        }
    }
    record.features = partial.features;
    record.images = partial.images;

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, UNKNOWN};

    #[test]
    fn empty_partial_yields_a_fully_unknown_record() {
        let record = normalize(PartialRecord::default(), "https://www.cars.com/x");

        assert_eq!(record.title, UNKNOWN);
        assert_eq!(record.price, UNKNOWN);
        assert_eq!(record.reg_expiry, UNKNOWN);
        assert!(record.features.is_empty());
        assert_eq!(record.url, "https://www.cars.com/x");
        assert!(!record.degraded);
    }

    #[test]
    fn resolved_fields_are_carried_over() {
        let mut partial = PartialRecord::default();
        partial.set(Field::Title, "2021 Toyota Camry LE".to_string());
        partial.set(Field::Price, "$22,500".to_string());
        partial.features.push("Sunroof".to_string());

        let record = normalize(partial, "https://www.cars.com/x");

        assert_eq!(record.title, "2021 Toyota Camry LE");
        assert_eq!(record.price, "$22,500");
        assert_eq!(record.features, vec!["Sunroof".to_string()]);
        assert_eq!(record.mileage, UNKNOWN);
    }
}
