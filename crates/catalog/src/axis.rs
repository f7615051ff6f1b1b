use serde::{Deserialize, Serialize};

use tiendita_core::{DomainError, DomainResult, Entity, VariantTypeId};

/// A named axis of product variation (e.g. "Talla", "Color") together with
/// its ordered list of allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantType {
    id: VariantTypeId,
    name: String,
    values: Vec<String>,
}

impl VariantType {
    /// Create a new axis with no values yet.
    ///
    /// The name is trimmed; an empty trimmed name is rejected.
    pub fn new(name: &str) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("variant type name cannot be empty"));
        }
        Ok(Self {
            id: VariantTypeId::new(),
            name: name.to_string(),
            values: Vec::new(),
        })
    }

    /// Rehydrate an axis with known id and values (session seeding).
    pub fn with_values(id: VariantTypeId, name: &str, values: Vec<String>) -> DomainResult<Self> {
        let mut axis = Self::new(name)?;
        axis.id = id;
        for value in &values {
            axis.push_value(value)?;
        }
        Ok(axis)
    }

    pub fn id_typed(&self) -> VariantTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Append an allowed value.
    ///
    /// The value is trimmed. Empty values are rejected with a validation
    /// error; a value already present on this axis is rejected as a conflict
    /// (duplicate values would produce duplicate combinations with
    /// independently editable stock).
    pub fn push_value(&mut self, value: &str) -> DomainResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::validation("variant value cannot be empty"));
        }
        if self.values.iter().any(|v| v == value) {
            return Err(DomainError::conflict(format!(
                "value '{value}' already exists on axis '{}'",
                self.name
            )));
        }
        self.values.push(value.to_string());
        Ok(())
    }

    /// Remove an allowed value. Returns `NotFound` if absent.
    pub fn remove_value(&mut self, value: &str) -> DomainResult<()> {
        let before = self.values.len();
        self.values.retain(|v| v != value);
        if self.values.len() == before {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    /// Rename the axis. Safe at any time: stock combinations are keyed by
    /// the axis id, never by this display name.
    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("variant type name cannot be empty"));
        }
        self.name = name.to_string();
        Ok(())
    }
}

impl Entity for VariantType {
    type Id = VariantTypeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Legacy flat product field an axis can project onto.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyField {
    Sizes,
    Colors,
}

/// One reserved-axis-name → legacy-field binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LegacyAxisBinding {
    pub axis_name: &'static str,
    pub field: LegacyField,
}

/// The fixed mapping from reserved axis names onto the legacy flat
/// `Product.sizes`/`Product.colors` fields.
///
/// Kept as an explicit table so the coupling is visible in one place;
/// existing consumers of the flat fields depend on these two names.
pub const LEGACY_AXIS_BINDINGS: &[LegacyAxisBinding] = &[
    LegacyAxisBinding {
        axis_name: LegacyField::Sizes.axis_name(),
        field: LegacyField::Sizes,
    },
    LegacyAxisBinding {
        axis_name: LegacyField::Colors.axis_name(),
        field: LegacyField::Colors,
    },
];

impl LegacyField {
    /// Binding lookup by axis display name. Unknown names do not project.
    pub fn for_axis_name(name: &str) -> Option<LegacyField> {
        LEGACY_AXIS_BINDINGS
            .iter()
            .find(|b| b.axis_name == name)
            .map(|b| b.field)
    }

    /// Reserved axis name for this field (used when seeding axes from a
    /// stored product's flat fields).
    pub const fn axis_name(self) -> &'static str {
        match self {
            LegacyField::Sizes => "Talla",
            LegacyField::Colors => "Color",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_axis_trims_name() {
        let axis = VariantType::new("  Talla ").unwrap();
        assert_eq!(axis.name(), "Talla");
        assert!(axis.values().is_empty());
    }

    #[test]
    fn new_axis_rejects_blank_name() {
        let err = VariantType::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn push_value_trims_and_appends_in_order() {
        let mut axis = VariantType::new("Talla").unwrap();
        axis.push_value(" S ").unwrap();
        axis.push_value("M").unwrap();
        assert_eq!(axis.values(), ["S", "M"]);
    }

    #[test]
    fn push_value_rejects_blank() {
        let mut axis = VariantType::new("Talla").unwrap();
        let err = axis.push_value("  ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn push_value_rejects_duplicate() {
        let mut axis = VariantType::new("Talla").unwrap();
        axis.push_value("S").unwrap();
        let err = axis.push_value("S").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(axis.values(), ["S"]);
    }

    #[test]
    fn remove_value_drops_only_the_named_value() {
        let mut axis = VariantType::new("Color").unwrap();
        axis.push_value("Rojo").unwrap();
        axis.push_value("Azul").unwrap();
        axis.remove_value("Rojo").unwrap();
        assert_eq!(axis.values(), ["Azul"]);
    }

    #[test]
    fn remove_value_missing_is_not_found() {
        let mut axis = VariantType::new("Color").unwrap();
        let err = axis.remove_value("Rojo").unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn rename_keeps_id_and_values() {
        let mut axis = VariantType::new("Tamano").unwrap();
        axis.push_value("S").unwrap();
        let id = axis.id_typed();
        axis.rename("Talla").unwrap();
        assert_eq!(axis.id_typed(), id);
        assert_eq!(axis.name(), "Talla");
        assert_eq!(axis.values(), ["S"]);
    }

    #[test]
    fn binding_table_covers_reserved_names() {
        assert_eq!(LegacyField::for_axis_name("Talla"), Some(LegacyField::Sizes));
        assert_eq!(LegacyField::for_axis_name("Color"), Some(LegacyField::Colors));
        assert_eq!(LegacyField::for_axis_name("Material"), None);
    }

    #[test]
    fn binding_table_round_trips_names() {
        assert_eq!(LegacyField::Sizes.axis_name(), "Talla");
        assert_eq!(LegacyField::Colors.axis_name(), "Color");
    }
}
