use serde::{Deserialize, Serialize};

use tiendita_core::{DomainError, DomainResult, Entity, ProductId};

use crate::axis::{LegacyField, VariantType};

/// Catalog product record.
///
/// `sizes` and `colors` are legacy flat projections of the "Talla" and
/// "Color" variant axes; they are written only through
/// [`Product::apply_axis_projections`] so the coupling stays in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    sku: String,
    /// Price in smallest currency unit (e.g. cents).
    price: u64,
    /// ISO currency code (e.g. "EUR").
    currency: Option<String>,
    sizes: Vec<String>,
    colors: Vec<String>,
}

impl Product {
    pub fn new(id: ProductId, name: &str, sku: &str, price: u64) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let sku = sku.trim();
        if sku.is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            sku: sku.to_string(),
            price,
            currency: None,
            sizes: Vec::new(),
            colors: Vec::new(),
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_price(&mut self, price: u64) {
        self.price = price;
    }

    pub fn set_currency(&mut self, currency: Option<String>) {
        self.currency = currency;
    }

    /// Project the current axis values onto the legacy flat fields.
    ///
    /// Axes bound in the legacy table overwrite their field; a bound axis
    /// that is absent clears its field. Unbound axes do not project.
    pub fn apply_axis_projections(&mut self, axes: &[VariantType]) {
        self.sizes = Self::projected_values(axes, LegacyField::Sizes);
        self.colors = Self::projected_values(axes, LegacyField::Colors);
    }

    fn projected_values(axes: &[VariantType], field: LegacyField) -> Vec<String> {
        axes.iter()
            .find(|a| LegacyField::for_axis_name(a.name()) == Some(field))
            .map(|a| a.values().to_vec())
            .unwrap_or_default()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new(ProductId::new(), "Camisa lino", "CAM-001", 4500).unwrap()
    }

    #[test]
    fn new_rejects_blank_name_and_sku() {
        let err = Product::new(ProductId::new(), "  ", "CAM-001", 4500).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = Product::new(ProductId::new(), "Camisa", "  ", 4500).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn projections_fill_sizes_and_colors_from_reserved_axes() {
        let mut p = product();
        let mut talla = VariantType::new("Talla").unwrap();
        talla.push_value("S").unwrap();
        talla.push_value("M").unwrap();
        let mut color = VariantType::new("Color").unwrap();
        color.push_value("Rojo").unwrap();

        p.apply_axis_projections(&[talla, color]);
        assert_eq!(p.sizes(), ["S", "M"]);
        assert_eq!(p.colors(), ["Rojo"]);
    }

    #[test]
    fn projections_ignore_unbound_axes() {
        let mut p = product();
        let mut material = VariantType::new("Material").unwrap();
        material.push_value("Lino").unwrap();

        p.apply_axis_projections(&[material]);
        assert!(p.sizes().is_empty());
        assert!(p.colors().is_empty());
    }

    #[test]
    fn projections_clear_fields_when_axis_removed() {
        let mut p = product();
        let mut talla = VariantType::new("Talla").unwrap();
        talla.push_value("S").unwrap();
        p.apply_axis_projections(std::slice::from_ref(&talla));
        assert_eq!(p.sizes(), ["S"]);

        p.apply_axis_projections(&[]);
        assert!(p.sizes().is_empty());
    }
}
