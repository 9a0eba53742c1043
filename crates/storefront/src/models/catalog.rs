//! Catalog domain models: categories, sizes, extras, products.
//!
//! Option eligibility and stock management are derived from explicit policy
//! columns (on the category and the product), never from id or name literals.

use rust_decimal::Decimal;
use serde::Serialize;

use demitasse_core::{
    CategoryId, ExtraId, ExtraKind, LineOptions, NutritionFactsId, ProductId, SizeId,
};

/// A menu category ("Hearty food", "Drinks", "Coffee", "Desserts").
///
/// Carries the policy flags that used to be hard-coded id lists: whether
/// stock is tracked for its products and which customization options its
/// products may offer.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub stock_managed: bool,
    pub allows_sugar: bool,
    pub allows_cinnamon: bool,
    pub allows_milk: bool,
    pub allows_syrup: bool,
}

/// A drink size ("Small" / 200ml, "Medium" / 300ml, "Large" / 400ml).
#[derive(Debug, Clone, Serialize)]
pub struct Size {
    pub id: SizeId,
    pub name: String,
    pub volume: String,
}

/// Size name of the default variation shown for a product group.
pub const DEFAULT_SIZE_NAME: &str = "Medium";

/// Nutritional facts attached to a product variation.
#[derive(Debug, Clone, Serialize)]
pub struct NutritionFacts {
    pub id: NutritionFactsId,
    pub kilocalories: Option<i32>,
    pub proteins: Option<i32>,
    pub fats: Option<i32>,
    pub carbohydrates: Option<i32>,
}

/// A purchasable add-on (alternative milk or syrup).
#[derive(Debug, Clone, Serialize)]
pub struct Extra {
    pub id: ExtraId,
    pub name: String,
    pub kind: ExtraKind,
    pub price: Decimal,
}

/// A product variation: one row of the menu, one concrete size/price.
///
/// Multiple rows sharing a `name` within a category are variations of one
/// conceptual menu item; [`crate::services::catalog`] groups them for
/// display.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub photo: Option<String>,
    pub description: Option<String>,
    pub category: Category,
    pub size: Option<Size>,
    pub nutrition_facts_id: Option<NutritionFactsId>,
    pub stock_count: i32,
    /// False for drinks served strictly black (americano, espresso).
    pub allows_extras: bool,
    /// True only for items traditionally served with condensed milk.
    pub allows_condensed_milk: bool,
    /// True for items whose price varies within one menu entry.
    pub variable_price: bool,
}

impl Product {
    /// Whether orders decrement this product's `stock_count`.
    #[must_use]
    pub const fn is_stock_managed(&self) -> bool {
        self.category.stock_managed
    }

    /// Whether the product can currently be ordered.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.is_stock_managed() || self.stock_count > 0
    }

    #[must_use]
    pub const fn can_add_sugar(&self) -> bool {
        self.category.allows_sugar
    }

    #[must_use]
    pub const fn can_add_cinnamon(&self) -> bool {
        self.category.allows_cinnamon
    }

    /// Milk add-ons require both the category flag and the per-product
    /// override (black coffees never take milk).
    #[must_use]
    pub const fn can_add_milk(&self) -> bool {
        self.category.allows_milk && self.allows_extras
    }

    #[must_use]
    pub const fn can_add_syrup(&self) -> bool {
        self.category.allows_syrup && self.allows_extras
    }

    #[must_use]
    pub const fn can_add_condensed_milk(&self) -> bool {
        self.allows_condensed_milk
    }

    /// Drop every option the product is not eligible for, keeping the rest.
    ///
    /// This is deliberately silent: submitting a cinnamon flag for a
    /// dessert, or milk for an americano, simply loses that option instead
    /// of failing the whole request.
    #[must_use]
    pub fn sanitize_options(&self, options: LineOptions) -> LineOptions {
        LineOptions {
            sugar_quantity: if self.can_add_sugar() {
                options.sugar_quantity
            } else {
                0
            },
            has_cinnamon: self.can_add_cinnamon() && options.has_cinnamon,
            milk_extra_id: options.milk_extra_id.filter(|_| self.can_add_milk()),
            syrup_extra_id: options.syrup_extra_id.filter(|_| self.can_add_syrup()),
            has_condensed_milk: self.can_add_condensed_milk() && options.has_condensed_milk,
        }
    }

    /// Maximum quantity a single cart line may hold for this product.
    #[must_use]
    pub fn max_line_quantity(&self) -> i32 {
        if self.is_stock_managed() {
            self.stock_count.min(crate::services::cart::MAX_LINE_QUANTITY)
        } else {
            crate::services::cart::MAX_LINE_QUANTITY
        }
    }
}

/// Look up an extra by id, restricted to a kind.
///
/// Used when pricing a line: a milk slot must point at a milk extra, a
/// syrup slot at a syrup, regardless of what id the client submitted.
#[must_use]
pub fn find_extra(extras: &[Extra], id: ExtraId, kind: ExtraKind) -> Option<&Extra> {
    extras.iter().find(|e| e.id == id && e.kind == kind)
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    pub fn coffee_category() -> Category {
        Category {
            id: CategoryId::new(3),
            name: "Coffee".to_owned(),
            stock_managed: false,
            allows_sugar: true,
            allows_cinnamon: true,
            allows_milk: true,
            allows_syrup: true,
        }
    }

    pub fn drinks_category() -> Category {
        Category {
            id: CategoryId::new(2),
            name: "Drinks".to_owned(),
            stock_managed: false,
            allows_sugar: true,
            allows_cinnamon: false,
            allows_milk: false,
            allows_syrup: true,
        }
    }

    pub fn dessert_category() -> Category {
        Category {
            id: CategoryId::new(4),
            name: "Desserts".to_owned(),
            stock_managed: true,
            allows_sugar: false,
            allows_cinnamon: false,
            allows_milk: false,
            allows_syrup: false,
        }
    }

    pub fn product(id: i32, name: &str, price: &str, category: Category) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            slug: name.to_lowercase().replace(' ', "-"),
            price: price.parse().unwrap(),
            photo: None,
            description: None,
            category,
            size: None,
            nutrition_facts_id: None,
            stock_count: 0,
            allows_extras: true,
            allows_condensed_milk: false,
            variable_price: false,
        }
    }

    pub fn oat_milk() -> Extra {
        Extra {
            id: ExtraId::new(6),
            name: "Oat milk".to_owned(),
            kind: ExtraKind::Milk,
            price: "50.00".parse().unwrap(),
        }
    }

    pub fn caramel_syrup() -> Extra {
        Extra {
            id: ExtraId::new(7),
            name: "Caramel syrup".to_owned(),
            kind: ExtraKind::Syrup,
            price: "40.00".parse().unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_stock_managed_follows_category() {
        let latte = product(1, "Latte", "250.00", coffee_category());
        let cheesecake = product(2, "Cheesecake", "320.00", dessert_category());
        assert!(!latte.is_stock_managed());
        assert!(cheesecake.is_stock_managed());
    }

    #[test]
    fn test_availability() {
        let mut cheesecake = product(2, "Cheesecake", "320.00", dessert_category());
        assert!(!cheesecake.is_available());
        cheesecake.stock_count = 3;
        assert!(cheesecake.is_available());

        // Non-stock-managed products are always available
        let latte = product(1, "Latte", "250.00", coffee_category());
        assert!(latte.is_available());
    }

    #[test]
    fn test_black_coffee_blocks_milk_and_syrup() {
        let mut americano = product(3, "Americano", "150.00", coffee_category());
        americano.allows_extras = false;

        assert!(americano.can_add_sugar());
        assert!(americano.can_add_cinnamon());
        assert!(!americano.can_add_milk());
        assert!(!americano.can_add_syrup());
    }

    #[test]
    fn test_sanitize_strips_milk_for_americano() {
        let mut americano = product(3, "Americano", "150.00", coffee_category());
        americano.allows_extras = false;

        let requested = LineOptions {
            sugar_quantity: 1,
            milk_extra_id: Some(ExtraId::new(6)),
            syrup_extra_id: Some(ExtraId::new(7)),
            ..Default::default()
        };
        let kept = americano.sanitize_options(requested);

        assert_eq!(kept.sugar_quantity, 1);
        assert_eq!(kept.milk_extra_id, None);
        assert_eq!(kept.syrup_extra_id, None);
    }

    #[test]
    fn test_sanitize_strips_everything_for_plain_dessert() {
        let cheesecake = product(2, "Cheesecake", "320.00", dessert_category());
        let requested = LineOptions {
            sugar_quantity: 3,
            has_cinnamon: true,
            milk_extra_id: Some(ExtraId::new(6)),
            syrup_extra_id: Some(ExtraId::new(7)),
            has_condensed_milk: true,
        };
        assert!(cheesecake.sanitize_options(requested).is_plain());
    }

    #[test]
    fn test_sanitize_keeps_condensed_milk_when_allowed() {
        let mut pancakes = product(5, "Cheese pancakes", "180.00", dessert_category());
        pancakes.allows_condensed_milk = true;

        let requested = LineOptions {
            has_condensed_milk: true,
            ..Default::default()
        };
        assert!(pancakes.sanitize_options(requested).has_condensed_milk);
    }

    #[test]
    fn test_max_line_quantity() {
        let latte = product(1, "Latte", "250.00", coffee_category());
        assert_eq!(latte.max_line_quantity(), 10);

        let mut cheesecake = product(2, "Cheesecake", "320.00", dessert_category());
        cheesecake.stock_count = 4;
        assert_eq!(cheesecake.max_line_quantity(), 4);
        cheesecake.stock_count = 25;
        assert_eq!(cheesecake.max_line_quantity(), 10);
    }

    #[test]
    fn test_find_extra_checks_kind() {
        let extras = vec![oat_milk(), caramel_syrup()];
        assert!(find_extra(&extras, ExtraId::new(6), ExtraKind::Milk).is_some());
        // A syrup id in the milk slot never matches
        assert!(find_extra(&extras, ExtraId::new(7), ExtraKind::Milk).is_none());
    }
}
