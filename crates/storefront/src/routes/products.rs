//! Product detail page handler.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use demitasse_core::ProductId;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::models::catalog::{Extra, NutritionFacts, Product, Size};
use crate::state::AppState;

/// One selectable variation on the detail page.
#[derive(Debug, Serialize)]
pub struct VariationView {
    pub id: ProductId,
    pub slug: String,
    pub price: Decimal,
    pub size: Option<Size>,
    pub available: bool,
}

/// Which customizations the product accepts, with the selectable extras.
#[derive(Debug, Serialize)]
pub struct OptionsView {
    pub can_add_sugar: bool,
    pub max_sugar: i16,
    pub can_add_cinnamon: bool,
    pub can_add_condensed_milk: bool,
    pub milks: Vec<Extra>,
    pub syrups: Vec<Extra>,
}

/// Product detail page props.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    #[serde(flatten)]
    pub product: Product,
    pub variations: Vec<VariationView>,
    pub options: OptionsView,
    pub nutrition_facts: Option<NutritionFacts>,
    pub max_quantity: i32,
}

/// Product detail: the variation behind `slug`, its sibling variations,
/// and everything the customer can customize.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductPage>> {
    let repo = CatalogRepository::new(state.pool());
    let product = repo
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    let variations = repo
        .variations_of(product.category.id, &product.name)
        .await?
        .into_iter()
        .map(|p| VariationView {
            available: p.is_available(),
            id: p.id,
            slug: p.slug,
            price: p.price,
            size: p.size,
        })
        .collect();

    let nutrition_facts = match product.nutrition_facts_id {
        Some(id) => repo.get_nutrition_facts(id).await?,
        None => None,
    };

    let extras = state.extras().await?;
    let of_kind = |kind| -> Vec<Extra> {
        extras.iter().filter(|e| e.kind == kind).cloned().collect()
    };
    let options = OptionsView {
        can_add_sugar: product.can_add_sugar(),
        max_sugar: demitasse_core::LineOptions::MAX_SUGAR,
        can_add_cinnamon: product.can_add_cinnamon(),
        can_add_condensed_milk: product.can_add_condensed_milk(),
        milks: if product.can_add_milk() {
            of_kind(demitasse_core::ExtraKind::Milk)
        } else {
            Vec::new()
        },
        syrups: if product.can_add_syrup() {
            of_kind(demitasse_core::ExtraKind::Syrup)
        } else {
            Vec::new()
        },
    };

    let max_quantity = product.max_line_quantity();
    Ok(Json(ProductPage {
        product,
        variations,
        options,
        nutrition_facts,
        max_quantity,
    }))
}
