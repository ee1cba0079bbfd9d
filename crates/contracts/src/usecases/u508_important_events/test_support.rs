use super::catalog::{BasicDataUnit, EntityCategory, ImportantEventsBasicData};

/// Catalog `{A: [1, 2], B: [3]}`
pub fn catalog_ab() -> ImportantEventsBasicData {
    let category = |name: &str, ids: &[i64]| EntityCategory {
        plural_name: format!("{}Entities", name),
        entity_name: name.to_string(),
        label: name.to_string(),
        units: ids
            .iter()
            .map(|id| BasicDataUnit {
                id: *id,
                description: format!("unit {}", id),
            })
            .collect(),
    };
    ImportantEventsBasicData {
        categories: vec![category("A", &[1, 2]), category("B", &[3])],
    }
}
