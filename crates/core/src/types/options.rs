//! Cart/order line customization options.

use serde::{Deserialize, Serialize};

use crate::ExtraId;

/// Kind of a purchasable add-on.
///
/// Stored as an explicit column on `extras` rather than the id-range
/// convention the café used historically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "extra_kind", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    /// Alternative milk (oat, almond, ...).
    Milk,
    /// Flavored syrup shot.
    Syrup,
}

impl std::fmt::Display for ExtraKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Milk => f.write_str("milk"),
            Self::Syrup => f.write_str("syrup"),
        }
    }
}

/// The full option tuple attached to a cart line or order line.
///
/// Two cart lines for the same product are "the same line" exactly when
/// their option tuples are equal; equality here drives the merge-on-add
/// behavior of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LineOptions {
    /// Sugar cubes, 0-3.
    pub sugar_quantity: i16,
    /// Dusting of cinnamon.
    pub has_cinnamon: bool,
    /// Selected alternative milk, if any.
    pub milk_extra_id: Option<ExtraId>,
    /// Selected syrup, if any.
    pub syrup_extra_id: Option<ExtraId>,
    /// Condensed milk topping.
    pub has_condensed_milk: bool,
}

impl LineOptions {
    /// Maximum number of sugar cubes per line.
    pub const MAX_SUGAR: i16 = 3;

    /// True when no option is selected (the default tuple).
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Validate the fields that have numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns a field name / message pair for out-of-range values.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        if !(0..=Self::MAX_SUGAR).contains(&self.sugar_quantity) {
            return Err((
                "sugar_quantity",
                format!("sugar quantity must be between 0 and {}", Self::MAX_SUGAR),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain() {
        assert!(LineOptions::default().is_plain());
        let with_milk = LineOptions {
            milk_extra_id: Some(ExtraId::new(6)),
            ..Default::default()
        };
        assert!(!with_milk.is_plain());
    }

    #[test]
    fn test_equality_drives_merging() {
        let a = LineOptions {
            sugar_quantity: 2,
            milk_extra_id: Some(ExtraId::new(6)),
            ..Default::default()
        };
        let b = a;
        let c = LineOptions {
            syrup_extra_id: Some(ExtraId::new(7)),
            ..a
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sugar_range_validation() {
        let ok = LineOptions {
            sugar_quantity: 3,
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let too_sweet = LineOptions {
            sugar_quantity: 4,
            ..Default::default()
        };
        assert_eq!(too_sweet.validate().unwrap_err().0, "sugar_quantity");
    }
}
