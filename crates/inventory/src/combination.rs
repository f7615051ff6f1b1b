use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tiendita_core::{ValueObject, VariantTypeId};
use tiendita_catalog::VariantType;

/// One specific choice of a value for every currently-defined variant axis.
///
/// Keyed by the axis **id**, never the display name, so axis renames cannot
/// orphan stock. The empty combination represents the base product with no
/// variants. Equality is structural (same id→value pairs, order-independent);
/// the `BTreeMap` keeps key order canonical by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination(BTreeMap<VariantTypeId, String>);

impl Combination {
    /// The empty combination (base product, no variants).
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, axis: VariantTypeId) -> Option<&str> {
        self.0.get(&axis).map(String::as_str)
    }

    pub fn contains_axis(&self, axis: VariantTypeId) -> bool {
        self.0.contains_key(&axis)
    }

    /// Set (or replace) the value picked for one axis.
    pub fn with(mut self, axis: VariantTypeId, value: impl Into<String>) -> Self {
        self.0.insert(axis, value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariantTypeId, &str)> {
        self.0.iter().map(|(id, v)| (*id, v.as_str()))
    }

    /// Canonical key: `id1=v1&id2=v2` with ids in sorted order.
    ///
    /// Useful for hashing, debugging and external keys. Equality of
    /// combinations never relies on this string.
    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        for (i, (id, value)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(&id.to_string());
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

impl ValueObject for Combination {}

impl FromIterator<(VariantTypeId, String)> for Combination {
    fn from_iter<I: IntoIterator<Item = (VariantTypeId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Every combination obtainable by picking exactly one value from each axis.
///
/// - no axes → exactly one empty combination;
/// - any axis with zero values collapses the whole product to zero
///   combinations, regardless of its position;
/// - otherwise the output is the full Cartesian product in stable order:
///   the first axis varies slowest, the last varies fastest.
///
/// Pure and total; safe to recompute on every edit.
pub fn generate_combinations(axes: &[VariantType]) -> Vec<Combination> {
    if axes.iter().any(|a| a.values().is_empty()) {
        return Vec::new();
    }

    let mut combos = vec![Combination::empty()];
    for axis in axes {
        let mut next = Vec::with_capacity(combos.len() * axis.values().len());
        for combo in &combos {
            for value in axis.values() {
                next.push(combo.clone().with(axis.id_typed(), value.clone()));
            }
        }
        combos = next;
    }
    combos
}

/// Render a combination as `"Talla: S | Color: Rojo"`.
///
/// Axis names are resolved through `axes` and rendered in the order the axes
/// appear there; entries whose axis is no longer known fall back to the raw
/// id. Display only, never used for equality.
pub fn format_combination(combo: &Combination, axes: &[VariantType]) -> String {
    let mut parts: Vec<String> = axes
        .iter()
        .filter_map(|axis| {
            combo
                .get(axis.id_typed())
                .map(|value| format!("{}: {}", axis.name(), value))
        })
        .collect();

    // Entries for axes missing from the list still render, keyed by raw id.
    let known: Vec<VariantTypeId> = axes.iter().map(|a| a.id_typed()).collect();
    for (id, value) in combo.iter() {
        if !known.contains(&id) {
            parts.push(format!("{id}: {value}"));
        }
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn axis(name: &str, values: &[&str]) -> VariantType {
        let mut a = VariantType::new(name).unwrap();
        for v in values {
            a.push_value(v).unwrap();
        }
        a
    }

    #[test]
    fn no_axes_yields_the_single_empty_combination() {
        let combos = generate_combinations(&[]);
        assert_eq!(combos, vec![Combination::empty()]);
    }

    #[test]
    fn two_axes_yield_product_in_first_axis_slowest_order() {
        let talla = axis("Talla", &["S", "M"]);
        let color = axis("Color", &["Rojo", "Azul"]);
        let (tid, cid) = (talla.id_typed(), color.id_typed());

        let combos = generate_combinations(&[talla, color]);
        let expected = vec![
            Combination::empty().with(tid, "S").with(cid, "Rojo"),
            Combination::empty().with(tid, "S").with(cid, "Azul"),
            Combination::empty().with(tid, "M").with(cid, "Rojo"),
            Combination::empty().with(tid, "M").with(cid, "Azul"),
        ];
        assert_eq!(combos, expected);
    }

    #[test]
    fn axis_with_no_values_collapses_to_zero_combinations() {
        let empty = axis("Talla", &[]);
        assert!(generate_combinations(std::slice::from_ref(&empty)).is_empty());

        // Position does not matter.
        let color = axis("Color", &["Rojo"]);
        assert!(generate_combinations(&[color, empty]).is_empty());
    }

    #[test]
    fn repeated_calls_produce_identical_order() {
        let axes = [axis("Talla", &["S", "M", "L"]), axis("Color", &["Rojo", "Azul"])];
        assert_eq!(generate_combinations(&axes), generate_combinations(&axes));
    }

    #[test]
    fn structural_equality_ignores_insertion_order() {
        let (a, b) = (VariantTypeId::new(), VariantTypeId::new());
        let one = Combination::empty().with(a, "S").with(b, "Rojo");
        let two = Combination::empty().with(b, "Rojo").with(a, "S");
        assert_eq!(one, two);
        assert_eq!(one.canonical_key(), two.canonical_key());
    }

    #[test]
    fn canonical_key_sorts_by_axis_id() {
        let mut ids = [VariantTypeId::new(), VariantTypeId::new()];
        ids.sort();
        let combo = Combination::empty().with(ids[1], "M").with(ids[0], "S");
        assert_eq!(combo.canonical_key(), format!("{}=S&{}=M", ids[0], ids[1]));
    }

    #[test]
    fn format_renders_axis_order_with_names() {
        let talla = axis("Talla", &["S"]);
        let color = axis("Color", &["Rojo"]);
        let combo = Combination::empty()
            .with(color.id_typed(), "Rojo")
            .with(talla.id_typed(), "S");
        assert_eq!(format_combination(&combo, &[talla, color]), "Talla: S | Color: Rojo");
    }

    #[test]
    fn format_falls_back_to_raw_id_for_unknown_axis() {
        let id = VariantTypeId::new();
        let combo = Combination::empty().with(id, "S");
        assert_eq!(format_combination(&combo, &[]), format!("{id}: S"));
    }

    proptest! {
        /// Output length is the product of value-list lengths (0 when any
        /// list is empty, 1 when there are no axes).
        #[test]
        fn combination_count_is_product_of_value_counts(
            sizes in proptest::collection::vec(0usize..4, 0..4)
        ) {
            let axes: Vec<VariantType> = sizes
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    let mut a = VariantType::new(&format!("Axis{i}")).unwrap();
                    for v in 0..n {
                        a.push_value(&format!("v{v}")).unwrap();
                    }
                    a
                })
                .collect();

            let expected: usize = sizes.iter().product();
            let combos = generate_combinations(&axes);
            prop_assert_eq!(combos.len(), expected);

            // Every combination picks exactly one value per axis.
            for combo in &combos {
                prop_assert_eq!(combo.len(), axes.len());
                for a in &axes {
                    let picked = combo.get(a.id_typed()).unwrap();
                    prop_assert!(a.values().iter().any(|v| v == picked));
                }
            }
        }
    }
}
