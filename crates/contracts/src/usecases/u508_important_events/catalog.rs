use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One selectable row of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicDataUnit {
    pub id: i64,
    pub description: String,
}

impl BasicDataUnit {
    pub fn is_displayable(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Catalog as it travels over the wire: plural category key -> units
pub type BasicDataWire = BTreeMap<String, Vec<BasicDataUnit>>;

/// Mapping between a plural catalog key and the form-state name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNameMapping {
    pub plural_name: String,
    pub entity_name: String,
    pub label: String,
}

/// Ordered mapping table; its order is the order sections are shown in
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityNameMap {
    pub entries: Vec<EntityNameMapping>,
}

impl EntityNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        plural_name: impl Into<String>,
        entity_name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.entries.push(EntityNameMapping {
            plural_name: plural_name.into(),
            entity_name: entity_name.into(),
            label: label.into(),
        });
        self
    }

    /// Sections of the important events questionnaire
    pub fn standard() -> Self {
        Self::new()
            .with(
                "eventEntities",
                "event",
                "Which of these events happened in the past year?",
            )
            .with(
                "areaEntities",
                "area",
                "Which areas of your life did they affect?",
            )
            .with(
                "impactEntities",
                "impact",
                "How strongly do they still affect you?",
            )
    }

    pub fn by_plural(&self, plural_name: &str) -> Option<&EntityNameMapping> {
        self.entries.iter().find(|e| e.plural_name == plural_name)
    }

    /// Build the typed catalog from the wire map.
    ///
    /// Categories follow the table order. Table entries absent from the wire
    /// are skipped; wire keys absent from the table are an error. Categories
    /// without a single described unit are left out.
    pub fn resolve(&self, wire: BasicDataWire) -> Result<ImportantEventsBasicData, CatalogError> {
        if let Some(unknown) = wire.keys().find(|k| self.by_plural(k).is_none()) {
            return Err(CatalogError::UnmappedCategory(unknown.clone()));
        }

        let mut wire = wire;
        let categories = self
            .entries
            .iter()
            .filter_map(|mapping| {
                wire.remove(&mapping.plural_name)
                    .filter(|units| units.iter().any(BasicDataUnit::is_displayable))
                    .map(|units| EntityCategory {
                        plural_name: mapping.plural_name.clone(),
                        entity_name: mapping.entity_name.clone(),
                        label: mapping.label.clone(),
                        units,
                    })
            })
            .collect::<Vec<_>>();

        for category in &categories {
            let mut seen = std::collections::BTreeSet::new();
            if let Some(dup) = category.units.iter().find(|u| !seen.insert(u.id)) {
                return Err(CatalogError::DuplicateUnit {
                    entity_name: category.entity_name.clone(),
                    id: dup.id,
                });
            }
        }

        Ok(ImportantEventsBasicData { categories })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog category '{0}' has no entry in the name map")]
    UnmappedCategory(String),
    #[error("unit {id} appears twice in category '{entity_name}'")]
    DuplicateUnit { entity_name: String, id: i64 },
}

/// One section of the form together with its units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCategory {
    pub plural_name: String,
    pub entity_name: String,
    pub label: String,
    pub units: Vec<BasicDataUnit>,
}

impl EntityCategory {
    pub fn contains(&self, id: i64) -> bool {
        self.units.iter().any(|u| u.id == id)
    }
}

/// Typed, ordered catalog of selectable units
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportantEventsBasicData {
    pub categories: Vec<EntityCategory>,
}

impl ImportantEventsBasicData {
    pub fn category(&self, entity_name: &str) -> Option<&EntityCategory> {
        self.categories.iter().find(|c| c.entity_name == entity_name)
    }

    /// Back to the plural-keyed wire shape
    pub fn to_wire(&self) -> BasicDataWire {
        self.categories
            .iter()
            .map(|c| (c.plural_name.clone(), c.units.clone()))
            .collect()
    }

    /// Sections to render. Units without a description are left out.
    pub fn sections(&self) -> Vec<FormSection> {
        self.categories
            .iter()
            .map(|c| FormSection {
                label: c.label.clone(),
                entity_name: c.entity_name.clone(),
                entities_data: c
                    .units
                    .iter()
                    .filter(|u| u.is_displayable())
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}

/// Render metadata for one fieldset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    pub label: String,
    pub entity_name: String,
    pub entities_data: Vec<BasicDataUnit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: i64, description: &str) -> BasicDataUnit {
        BasicDataUnit {
            id,
            description: description.into(),
        }
    }

    #[test]
    fn test_resolve_follows_map_order() {
        let mut wire = BasicDataWire::new();
        wire.insert("impactEntities".into(), vec![unit(7, "Strongly")]);
        wire.insert("eventEntities".into(), vec![unit(1, "Moved"), unit(2, "New job")]);

        let catalog = EntityNameMap::standard().resolve(wire).unwrap();
        let names: Vec<_> = catalog.categories.iter().map(|c| c.entity_name.as_str()).collect();
        assert_eq!(names, vec!["event", "impact"]);
        assert_eq!(catalog.category("event").unwrap().units.len(), 2);
    }

    #[test]
    fn test_resolve_rejects_unmapped_key() {
        let mut wire = BasicDataWire::new();
        wire.insert("petEntities".into(), vec![unit(1, "Cat")]);
        assert_eq!(
            EntityNameMap::standard().resolve(wire),
            Err(CatalogError::UnmappedCategory("petEntities".into()))
        );
    }

    #[test]
    fn test_resolve_rejects_duplicate_ids() {
        let mut wire = BasicDataWire::new();
        wire.insert("eventEntities".into(), vec![unit(1, "Moved"), unit(1, "Again")]);
        assert!(matches!(
            EntityNameMap::standard().resolve(wire),
            Err(CatalogError::DuplicateUnit { id: 1, .. })
        ));
    }

    #[test]
    fn test_sections_skip_blank_descriptions() {
        let map = EntityNameMap::new().with("AEntities", "A", "Section A");
        let mut wire = BasicDataWire::new();
        wire.insert("AEntities".into(), vec![unit(1, "One"), unit(2, "  ")]);
        let sections = map.resolve(wire).unwrap().sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label, "Section A");
        assert_eq!(sections[0].entities_data, vec![unit(1, "One")]);
    }

    #[test]
    fn test_resolve_drops_category_without_described_units() {
        let map = EntityNameMap::new()
            .with("AEntities", "A", "Section A")
            .with("BEntities", "B", "Section B")
            .with("CEntities", "C", "Section C");
        let mut wire = BasicDataWire::new();
        wire.insert("AEntities".into(), vec![unit(1, "One")]);
        wire.insert("BEntities".into(), vec![unit(2, ""), unit(3, " ")]);
        wire.insert("CEntities".into(), vec![]);

        let catalog = map.resolve(wire).unwrap();
        assert_eq!(catalog.categories.len(), 1);
        assert_eq!(catalog.categories[0].entity_name, "A");
        assert_eq!(catalog.sections().len(), 1);
    }

    #[test]
    fn test_wire_json_shape() {
        let json = r#"{"AEntities":[{"id":1,"description":"One"}]}"#;
        let wire: BasicDataWire = serde_json::from_str(json).unwrap();
        let map = EntityNameMap::new().with("AEntities", "A", "Section A");
        let catalog = map.resolve(wire).unwrap();
        assert_eq!(serde_json::to_string(&catalog.to_wire()).unwrap(), json);
    }
}
