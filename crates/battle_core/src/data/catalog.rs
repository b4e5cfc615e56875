//! Unit catalog: the ordered list of templates an army is composed from.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::unit::UnitTemplate;

/// Ordered collection of unit templates.
///
/// Order matters: it is the final tie-break when the composer ranks
/// templates with identical scores.
///
/// # Example RON
///
/// ```ron
/// UnitCatalog(
///     units: [
///         UnitTemplate(name: "Swordsman", unit_type: "Infantry", health: 100, base_attack: 20, cost: 12),
///         UnitTemplate(name: "Archer", unit_type: "Archer", health: 50, base_attack: 30, cost: 15, attack_type: Ranged),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCatalog {
    /// Templates in catalog order.
    #[serde(default)]
    pub units: Vec<UnitTemplate>,
}

impl UnitCatalog {
    /// Wrap a list of templates.
    #[must_use]
    pub fn new(units: Vec<UnitTemplate>) -> Self {
        Self { units }
    }

    /// Parse a catalog from a RON string. `origin` labels parse errors.
    pub fn from_ron_str(ron: &str, origin: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| BattleError::DataParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Look up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UnitTemplate> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Templates the composer can pick (positive cost).
    pub fn selectable(&self) -> impl Iterator<Item = &UnitTemplate> {
        self.units.iter().filter(|u| u.cost > 0)
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the catalog holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Check catalog consistency.
    ///
    /// Validates that:
    /// - Every template has a name
    /// - Names are unique
    /// - Cost and health are positive
    ///
    /// Returns one [`BattleError::InvalidTemplate`] per problem. Unnamed
    /// templates are reported by catalog position.
    #[must_use]
    pub fn validate(&self) -> Vec<BattleError> {
        let mut errors = Vec::new();
        let invalid = |name: &str, reason: &str| BattleError::InvalidTemplate {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        for (index, unit) in self.units.iter().enumerate() {
            let unnamed = unit.name.trim().is_empty();
            let label = if unnamed {
                format!("#{index}")
            } else {
                unit.name.clone()
            };
            if unnamed {
                errors.push(invalid(&label, "no name"));
            }
            if unit.cost == 0 {
                errors.push(invalid(&label, "zero cost, will never be picked"));
            }
            if unit.health == 0 {
                errors.push(invalid(&label, "zero health"));
            }
            if self.units[..index].iter().any(|u| u.name == unit.name) {
                errors.push(invalid(&label, "duplicate name"));
            }
        }

        errors
    }
}

impl From<Vec<UnitTemplate>> for UnitCatalog {
    fn from(units: Vec<UnitTemplate>) -> Self {
        Self::new(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> UnitCatalog {
        UnitCatalog::new(vec![
            UnitTemplate::new("Swordsman", "Infantry", 100, 20, 12),
            UnitTemplate::new("Archer", "Archer", 50, 30, 15),
        ])
    }

    #[test]
    fn test_get() {
        let catalog = create_test_catalog();
        assert!(catalog.get("Archer").is_some());
        assert!(catalog.get("Dragon").is_none());
    }

    #[test]
    fn test_validate_valid_data() {
        let catalog = create_test_catalog();
        let errors = catalog.validate();
        assert!(errors.is_empty(), "Errors: {errors:?}");
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut catalog = create_test_catalog();
        catalog.units.push(UnitTemplate::new("Archer", "Archer", 0, 30, 0));

        let errors = catalog.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(
            e,
            BattleError::InvalidTemplate { name, .. } if name == "Archer"
        )));
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("zero cost")));
        assert!(messages.iter().any(|m| m.contains("zero health")));
        assert!(messages.iter().any(|m| m.contains("duplicate name")));
    }

    #[test]
    fn test_validate_labels_unnamed_templates() {
        let mut catalog = create_test_catalog();
        catalog.units.push(UnitTemplate::new(" ", "Militia", 10, 1, 1));

        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Invalid unit template '#2': no name"
        );
    }

    #[test]
    fn test_selectable_skips_free_units() {
        let mut catalog = create_test_catalog();
        catalog.units.push(UnitTemplate::new("Peasant", "Militia", 10, 1, 0));
        assert_eq!(catalog.selectable().count(), 2);
    }

    #[test]
    fn test_from_ron_str() {
        let ron = r#"UnitCatalog(units: [
            UnitTemplate(name: "Knight", unit_type: "Cavalry", health: 120, base_attack: 25, cost: 20, attack_bonuses: {"Archer": 50}),
        ])"#;
        let catalog = UnitCatalog::from_ron_str(ron, "inline").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.units[0].attack_bonuses.get("Archer"), Some(&50));
    }

    #[test]
    fn test_from_ron_str_error_carries_origin() {
        let err = UnitCatalog::from_ron_str("UnitCatalog(units: 5)", "units.ron").unwrap_err();
        assert!(err.to_string().contains("units.ron"));
    }
}
