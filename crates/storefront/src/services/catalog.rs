//! Menu presentation logic: grouping product variations and picking the
//! featured selection for the home page.

use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use serde::Serialize;

use demitasse_core::CategoryId;

use crate::models::catalog::{Category, DEFAULT_SIZE_NAME, Product};

/// Price prefix shown when one menu entry spans several prices.
const FROM_PREFIX: &str = "from";

/// One menu entry: all variations sharing a name within a category,
/// collapsed for list display.
#[derive(Debug, Clone, Serialize)]
pub struct ProductGroup {
    pub name: String,
    pub category_id: CategoryId,
    /// Slug of the variation the entry links to.
    pub slug: String,
    pub photo: Option<String>,
    pub min_price: Decimal,
    /// `"from"` when the displayed price is a lower bound.
    pub price_prefix: Option<&'static str>,
    pub has_variations: bool,
    pub available: bool,
}

/// Collapse product variations into menu entries.
///
/// Variations share an entry when they share a name within one category.
/// The entry links to the default variation, the size named
/// [`DEFAULT_SIZE_NAME`] when present, otherwise the first variation.
#[must_use]
pub fn group_products(products: &[Product]) -> Vec<ProductGroup> {
    let mut groups: Vec<ProductGroup> = Vec::new();
    let mut seen: Vec<(CategoryId, &str)> = Vec::new();

    for product in products {
        let key = (product.category.id, product.name.as_str());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        let variations: Vec<&Product> = products
            .iter()
            .filter(|p| p.category.id == product.category.id && p.name == product.name)
            .collect();

        let default = variations
            .iter()
            .find(|p| {
                p.size
                    .as_ref()
                    .is_some_and(|size| size.name == DEFAULT_SIZE_NAME)
            })
            .copied()
            .unwrap_or(product);

        let min_price = variations
            .iter()
            .map(|p| p.price)
            .min()
            .unwrap_or(product.price);
        let has_variations = variations.len() > 1;
        let ranged = has_variations || variations.iter().any(|p| p.variable_price);

        groups.push(ProductGroup {
            name: product.name.clone(),
            category_id: product.category.id,
            slug: default.slug.clone(),
            photo: default.photo.clone(),
            min_price,
            price_prefix: ranged.then_some(FROM_PREFIX),
            has_variations,
            available: variations.iter().any(|p| p.is_available()),
        });
    }

    groups
}

/// Menu entries belonging to one category, in grouping order.
#[must_use]
pub fn groups_in_category(groups: &[ProductGroup], category_id: CategoryId) -> Vec<ProductGroup> {
    groups
        .iter()
        .filter(|g| g.category_id == category_id)
        .cloned()
        .collect()
}

/// Pick a random featured selection for the home page.
///
/// Only available entries qualify. The selection carries at least one
/// coffee and one food entry whenever the menu has them, with the rest
/// filled at random. Returns fewer than `count` when the menu is short.
#[must_use]
pub fn pick_featured(
    groups: &[ProductGroup],
    categories: &[Category],
    count: usize,
) -> Vec<ProductGroup> {
    let category_of = |g: &ProductGroup| categories.iter().find(|c| c.id == g.category_id);
    let is_food = |g: &ProductGroup| category_of(g).is_some_and(|c| c.stock_managed);
    // Cinnamon eligibility singles out the coffee categories.
    let is_coffee = |g: &ProductGroup| category_of(g).is_some_and(|c| c.allows_cinnamon);

    let available: Vec<&ProductGroup> = groups.iter().filter(|g| g.available).collect();
    let mut rng = rand::rng();

    let coffees: Vec<&ProductGroup> = available
        .iter()
        .copied()
        .filter(|g| is_coffee(g))
        .collect();
    let foods: Vec<&ProductGroup> = available.iter().copied().filter(|g| is_food(g)).collect();

    let mut picks: Vec<&ProductGroup> = Vec::with_capacity(count);
    picks.extend(coffees.choose(&mut rng).copied());
    picks.extend(foods.choose(&mut rng).copied());
    picks.truncate(count);

    let fill = count.saturating_sub(picks.len());
    let remaining: Vec<&ProductGroup> = available
        .into_iter()
        .filter(|g| {
            !picks
                .iter()
                .any(|p| p.category_id == g.category_id && p.name == g.name)
        })
        .collect();
    picks.extend(remaining.choose_multiple(&mut rng, fill).copied());

    picks.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::test_fixtures::*;
    use crate::models::catalog::Size;
    use demitasse_core::SizeId;

    fn sized(id: i32, name: &str, price: &str, size_id: i32, size_name: &str) -> Product {
        let mut p = product(id, name, price, coffee_category());
        p.slug = format!("{}-{}", p.slug, size_name.to_lowercase());
        p.size = Some(Size {
            id: SizeId::new(size_id),
            name: size_name.to_owned(),
            volume: "300ml".to_owned(),
        });
        p
    }

    #[test]
    fn test_groups_collapse_by_name() {
        let products = vec![
            sized(1, "Latte", "220.00", 1, "Small"),
            sized(2, "Latte", "250.00", 2, "Medium"),
            sized(3, "Latte", "280.00", 3, "Large"),
            product(4, "Espresso", "120.00", coffee_category()),
        ];
        let groups = group_products(&products);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Latte");
        assert!(groups[0].has_variations);
        assert!(!groups[1].has_variations);
    }

    #[test]
    fn test_default_variation_is_medium() {
        let products = vec![
            sized(1, "Latte", "220.00", 1, "Small"),
            sized(2, "Latte", "250.00", 2, "Medium"),
        ];
        let groups = group_products(&products);
        assert_eq!(groups[0].slug, "latte-medium");
    }

    #[test]
    fn test_default_falls_back_to_first_variation() {
        let products = vec![
            sized(1, "Latte", "220.00", 1, "Small"),
            sized(3, "Latte", "280.00", 3, "Large"),
        ];
        let groups = group_products(&products);
        assert_eq!(groups[0].slug, "latte-small");
    }

    #[test]
    fn test_min_price_and_from_prefix() {
        let products = vec![
            sized(1, "Latte", "280.00", 3, "Large"),
            sized(2, "Latte", "220.00", 1, "Small"),
        ];
        let groups = group_products(&products);
        assert_eq!(groups[0].min_price, "220.00".parse().unwrap());
        assert_eq!(groups[0].price_prefix, Some("from"));
    }

    #[test]
    fn test_variable_price_forces_prefix_on_single_variation() {
        let mut chips = product(9, "Chips", "90.00", dessert_category());
        chips.variable_price = true;
        chips.stock_count = 5;
        let groups = group_products(&[chips]);
        assert_eq!(groups[0].price_prefix, Some("from"));
    }

    #[test]
    fn test_fixed_price_single_variation_has_no_prefix() {
        let latte = product(1, "Latte", "250.00", coffee_category());
        let groups = group_products(&[latte]);
        assert_eq!(groups[0].price_prefix, None);
    }

    #[test]
    fn test_out_of_stock_group_is_unavailable() {
        let cheesecake = product(2, "Cheesecake", "320.00", dessert_category());
        let groups = group_products(&[cheesecake]);
        assert!(!groups[0].available);
    }

    #[test]
    fn test_featured_only_picks_available() {
        let categories = vec![coffee_category(), dessert_category()];
        let mut cheesecake = product(2, "Cheesecake", "320.00", dessert_category());
        cheesecake.stock_count = 0;
        let latte = product(1, "Latte", "250.00", coffee_category());
        let groups = group_products(&[cheesecake, latte]);

        let featured = pick_featured(&groups, &categories, 4);
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].name, "Latte");
    }

    #[test]
    fn test_featured_always_includes_a_coffee_and_a_food() {
        let categories = vec![coffee_category(), drinks_category(), dessert_category()];
        let mut products = vec![
            product(1, "Latte", "250.00", coffee_category()),
            product(2, "Black tea", "150.00", drinks_category()),
            product(3, "Green tea", "150.00", drinks_category()),
            product(4, "Lemonade", "180.00", drinks_category()),
            product(5, "Orange juice", "200.00", drinks_category()),
        ];
        let mut cheesecake = product(6, "Cheesecake", "320.00", dessert_category());
        cheesecake.stock_count = 3;
        products.push(cheesecake);
        let groups = group_products(&products);

        // One coffee among four teas: random fill alone would often miss it.
        for _ in 0..20 {
            let featured = pick_featured(&groups, &categories, 4);
            assert_eq!(featured.len(), 4);
            assert!(featured.iter().any(|g| g.name == "Latte"));
            assert!(featured.iter().any(|g| g.name == "Cheesecake"));
        }
    }
}
