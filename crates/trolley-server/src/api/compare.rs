//! Comparison endpoints: per-product store comparison, basket totals,
//! cross-brand type comparison, and specials matching.

use std::collections::{BTreeMap, HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trolley_classify::{
    extract_brand, extract_product_type, extract_special_type, is_similar_type,
    normalize_product_type, types_match,
};
use trolley_db::{SpecialRow, StorePriceRow};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const BRAND_MATCH_LIMIT: usize = 20;
const TYPE_CANDIDATE_LIMIT: i64 = 1000;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct StorePriceItem {
    pub(super) store_id: i64,
    pub(super) store_name: String,
    pub(super) store_slug: String,
    pub(super) price: Decimal,
    pub(super) unit_price: Option<Decimal>,
    pub(super) was_price: Option<Decimal>,
    pub(super) is_special: bool,
    /// Difference to the cheapest store, absent on the cheapest row.
    pub(super) savings: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub(super) struct PriceComparison {
    product_id: i64,
    product_name: String,
    stores: Vec<StorePriceItem>,
    cheapest_store: Option<String>,
    price_difference: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BasketRequest {
    product_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct BasketStoreTotal {
    store_name: String,
    store_slug: String,
    total: Decimal,
    items_found: usize,
    items_missing: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct BasketComparison {
    basket_size: usize,
    stores: Vec<BasketStoreTotal>,
    cheapest_store: Option<String>,
    cheapest_total: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandPriceInfo {
    product_id: i64,
    brand: Option<String>,
    product_name: String,
    image_url: Option<String>,
    store_prices: Vec<StorePriceItem>,
    cheapest_price: Option<Decimal>,
    cheapest_store: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TypeComparison {
    product_type: String,
    size: Option<String>,
    category_id: Option<i64>,
    brands: Vec<BrandPriceInfo>,
    cheapest_overall: Option<Decimal>,
    cheapest_brand: Option<String>,
    cheapest_store: Option<String>,
    total_options: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct SpecialPriceItem {
    special_id: i64,
    store_id: i64,
    store_name: String,
    store_slug: String,
    price: Decimal,
    was_price: Option<Decimal>,
    discount_percent: Option<i32>,
    unit_price: Option<String>,
    image_url: Option<String>,
    product_url: Option<String>,
    valid_to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandMatchResult {
    product_name: String,
    brand: Option<String>,
    size: Option<String>,
    stores: Vec<SpecialPriceItem>,
    cheapest_store: Option<String>,
    price_spread: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BrandMatchQuery {
    search: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TypeMatchResult {
    product_type: String,
    category_id: Option<i64>,
    reference: SpecialPriceItem,
    similar: Vec<SpecialPriceItem>,
    cheapest_price: Decimal,
    total_options: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandProductsResult {
    brand: Option<String>,
    reference: SpecialPriceItem,
    brand_products: Vec<SpecialPriceItem>,
    cheapest_price: Decimal,
    total_products: usize,
    stores_with_brand: Vec<String>,
}

fn store_price_item(row: StorePriceRow) -> StorePriceItem {
    StorePriceItem {
        store_id: row.store_id,
        store_name: row.store_name,
        store_slug: row.store_slug,
        price: row.price,
        unit_price: row.unit_price,
        was_price: row.was_price,
        is_special: row.is_special,
        savings: None,
    }
}

fn special_price_item(row: &SpecialRow) -> SpecialPriceItem {
    SpecialPriceItem {
        special_id: row.id,
        store_id: row.store_id,
        store_name: row.store_name.clone(),
        store_slug: row.store_slug.clone(),
        price: row.price,
        was_price: row.was_price,
        discount_percent: row.discount_percent,
        unit_price: row.unit_price.clone(),
        image_url: row.image_url.clone(),
        product_url: row.product_url.clone(),
        valid_to: row.valid_to,
    }
}

// ---------------------------------------------------------------------------
// Product comparison
// ---------------------------------------------------------------------------

/// Latest price per store for one product, cheapest first, with per-store
/// savings against the cheapest.
pub(super) async fn compare_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<PriceComparison>>, ApiError> {
    let product = trolley_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "product"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    let rows = trolley_db::latest_price_per_store(&state.pool, product_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut stores: Vec<StorePriceItem> = rows.into_iter().map(store_price_item).collect();

    let min_price = stores.first().map(|s| s.price);
    let cheapest_store = stores.first().map(|s| s.store_name.clone());
    if let Some(min_price) = min_price {
        if stores.len() > 1 {
            for store in &mut stores {
                if store.price > min_price {
                    store.savings = Some(store.price - min_price);
                }
            }
        }
    }

    let price_difference = match (stores.first(), stores.last()) {
        (Some(first), Some(last)) if stores.len() > 1 => Some(last.price - first.price),
        _ => None,
    };

    Ok(Json(ApiResponse {
        data: PriceComparison {
            product_id,
            product_name: product.name,
            cheapest_store,
            price_difference,
            stores,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Total basket price per store over a list of products.
pub(super) async fn compare_basket(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<BasketRequest>,
) -> Result<Json<ApiResponse<BasketComparison>>, ApiError> {
    if request.product_ids.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "product_ids must not be empty",
        ));
    }

    let stores = trolley_db::list_stores(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    struct Running {
        store_name: String,
        store_slug: String,
        total: Decimal,
        items_found: usize,
        items_missing: Vec<String>,
    }

    let mut totals: BTreeMap<i64, Running> = stores
        .iter()
        .map(|s| {
            (
                s.id,
                Running {
                    store_name: s.name.clone(),
                    store_slug: s.slug.clone(),
                    total: Decimal::ZERO,
                    items_found: 0,
                    items_missing: Vec::new(),
                },
            )
        })
        .collect();

    for product_id in &request.product_ids {
        let product = match trolley_db::get_product(&state.pool, *product_id).await {
            Ok(product) => product,
            Err(trolley_db::DbError::NotFound) => continue,
            Err(e) => return Err(map_db_error(req_id.0.clone(), &e)),
        };

        let prices = trolley_db::latest_price_per_store(&state.pool, *product_id)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
        let by_store: HashMap<i64, &StorePriceRow> =
            prices.iter().map(|p| (p.store_id, p)).collect();

        for (store_id, running) in &mut totals {
            if let Some(price) = by_store.get(store_id) {
                running.total += price.price;
                running.items_found += 1;
            } else {
                running.items_missing.push(product.name.clone());
            }
        }
    }

    let stores: Vec<BasketStoreTotal> = totals
        .into_values()
        .map(|r| BasketStoreTotal {
            store_name: r.store_name,
            store_slug: r.store_slug,
            total: r.total,
            items_found: r.items_found,
            items_missing: r.items_missing,
        })
        .collect();

    let cheapest = stores
        .iter()
        .filter(|s| s.items_found > 0)
        .min_by_key(|s| s.total);

    Ok(Json(ApiResponse {
        data: BasketComparison {
            basket_size: request.product_ids.len(),
            cheapest_store: cheapest.map(|s| s.store_name.clone()),
            cheapest_total: cheapest.map(|s| s.total),
            stores,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Compare every brand of the same product type and size.
///
/// "Dairy Farmers Full Cream Milk 2L" pulls in all other brands of
/// "Full Cream Milk 2L"; brands come back sorted by their cheapest price.
pub(super) async fn compare_product_type(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<ApiResponse<TypeComparison>>, ApiError> {
    let product = trolley_db::get_product(&state.pool, product_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "product"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    let product_type = extract_product_type(&product.name, product.brand.as_deref());
    let normalized = normalize_product_type(&product_type);

    let candidates = trolley_db::type_candidates(
        &state.pool,
        product.category_id,
        product.size.as_deref(),
        TYPE_CANDIDATE_LIMIT,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut matched: Vec<_> = candidates
        .into_iter()
        .filter(|candidate| {
            let candidate_type =
                extract_product_type(&candidate.name, candidate.brand.as_deref());
            let candidate_normalized = normalize_product_type(&candidate_type);
            candidate_normalized == normalized || types_match(&normalized, &candidate_normalized)
        })
        .collect();

    if matched.is_empty() {
        matched.push(product.clone());
    }

    let mut brands: Vec<BrandPriceInfo> = Vec::new();
    let mut cheapest_overall: Option<Decimal> = None;
    let mut cheapest_brand: Option<String> = None;
    let mut cheapest_store: Option<String> = None;

    for candidate in matched {
        let rows = trolley_db::latest_price_per_store(&state.pool, candidate.id)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
        if rows.is_empty() {
            continue;
        }

        let store_prices: Vec<StorePriceItem> = rows.into_iter().map(store_price_item).collect();
        let brand_cheapest = store_prices.first().map(|s| (s.price, s.store_name.clone()));

        if let Some((price, store)) = &brand_cheapest {
            if cheapest_overall.is_none_or(|overall| *price < overall) {
                cheapest_overall = Some(*price);
                cheapest_brand = Some(
                    candidate
                        .brand
                        .clone()
                        .unwrap_or_else(|| candidate.name.clone()),
                );
                cheapest_store = Some(store.clone());
            }
        }

        brands.push(BrandPriceInfo {
            product_id: candidate.id,
            brand: candidate.brand,
            product_name: candidate.name,
            image_url: candidate.image_url,
            cheapest_price: brand_cheapest.as_ref().map(|(price, _)| *price),
            cheapest_store: brand_cheapest.map(|(_, store)| store),
            store_prices,
        });
    }

    brands.sort_by(|a, b| a.cheapest_price.cmp(&b.cheapest_price));
    let total_options = brands.iter().map(|b| b.store_prices.len()).sum();

    Ok(Json(ApiResponse {
        data: TypeComparison {
            product_type,
            size: product.size,
            category_id: product.category_id,
            brands,
            cheapest_overall,
            cheapest_brand,
            cheapest_store,
            total_options,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Specials comparison
// ---------------------------------------------------------------------------

/// Find the same product on special across stores.
///
/// Groups current specials by brand + name + size and keeps groups present
/// at more than one store, cheapest store first. Results are ordered by how
/// many stores carry the product.
pub(super) async fn compare_specials_brand_match(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<BrandMatchQuery>,
) -> Result<Json<ApiResponse<Vec<BrandMatchResult>>>, ApiError> {
    if query.search.trim().len() < 2 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "search must be at least 2 characters",
        ));
    }

    let today = Utc::now().date_naive();
    let specials = trolley_db::search_current_specials(&state.pool, today, query.search.trim())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    // Group identical products: brand + name + size, lowercased.
    let mut groups: BTreeMap<String, Vec<&SpecialRow>> = BTreeMap::new();
    for special in &specials {
        let key = normalize_product_key(
            &special.name,
            special.brand.as_deref(),
            special.size.as_deref(),
        );
        groups.entry(key).or_default().push(special);
    }

    let mut results: Vec<BrandMatchResult> = Vec::new();
    for group in groups.values() {
        let unique_stores: HashSet<i64> = group.iter().map(|s| s.store_id).collect();
        if unique_stores.len() < 2 && group.len() < 2 {
            continue;
        }

        // Cheapest row per store.
        let mut per_store: HashMap<i64, &SpecialRow> = HashMap::new();
        for special in group.iter().copied() {
            per_store
                .entry(special.store_id)
                .and_modify(|existing| {
                    if special.price < existing.price {
                        *existing = special;
                    }
                })
                .or_insert(special);
        }

        let mut stores: Vec<SpecialPriceItem> =
            per_store.values().map(|s| special_price_item(s)).collect();
        stores.sort_by(|a, b| a.price.cmp(&b.price));

        let price_spread = match (stores.first(), stores.last()) {
            (Some(first), Some(last)) if stores.len() > 1 => Some(last.price - first.price),
            _ => None,
        };

        results.push(BrandMatchResult {
            product_name: group[0].name.clone(),
            brand: group[0].brand.clone(),
            size: group[0].size.clone(),
            cheapest_store: stores.first().map(|s| s.store_name.clone()),
            price_spread,
            stores,
        });
    }

    // More stores carrying the product means a more useful comparison.
    results.sort_by(|a, b| b.stores.len().cmp(&a.stores.len()));
    results.truncate(BRAND_MATCH_LIMIT);

    Ok(Json(ApiResponse {
        data: results,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Find same-type specials across brands and stores.
///
/// Given "Dairy Farmers Full Cream Milk 2L" on special, surfaces every other
/// 2L milk currently on special regardless of brand.
pub(super) async fn compare_specials_type_match(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(special_id): Path<i64>,
) -> Result<Json<ApiResponse<TypeMatchResult>>, ApiError> {
    let reference = trolley_db::get_special(&state.pool, special_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "special"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    let product_type = extract_special_type(&reference.name, reference.brand.as_deref());

    let today = Utc::now().date_naive();
    let candidates = trolley_db::type_match_candidates(
        &state.pool,
        today,
        special_id,
        reference.category_id,
        reference.size.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let similar: Vec<SpecialPriceItem> = candidates
        .iter()
        .filter(|candidate| {
            let candidate_type = extract_special_type(&candidate.name, candidate.brand.as_deref());
            is_similar_type(&product_type, &candidate_type)
        })
        .map(special_price_item)
        .collect();

    let reference_item = special_price_item(&reference);
    let cheapest_price = similar
        .iter()
        .map(|s| s.price)
        .chain(std::iter::once(reference_item.price))
        .min()
        .unwrap_or(reference_item.price);
    let total_options = similar.len() + 1;

    Ok(Json(ApiResponse {
        data: TypeMatchResult {
            product_type,
            category_id: reference.category_id,
            reference: reference_item,
            similar,
            cheapest_price,
            total_options,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Every product from the reference special's brand currently on special,
/// across all stores.
pub(super) async fn get_brand_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(special_id): Path<i64>,
) -> Result<Json<ApiResponse<BrandProductsResult>>, ApiError> {
    let reference = trolley_db::get_special(&state.pool, special_id)
        .await
        .map_err(|e| match e {
            trolley_db::DbError::NotFound => ApiError::not_found(req_id.0.clone(), "special"),
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    // Catalogue lines sometimes arrive without a brand field; recover it
    // from the name using brands seen elsewhere in the data.
    let brand = match reference.brand.clone() {
        Some(brand) => Some(brand),
        None => {
            let known = trolley_db::distinct_special_brands(&state.pool)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
            let known_refs: Vec<&str> = known.iter().map(String::as_str).collect();
            extract_brand(&reference.name, &known_refs)
        }
    };

    let reference_item = special_price_item(&reference);

    let Some(brand) = brand else {
        return Ok(Json(ApiResponse {
            data: BrandProductsResult {
                brand: None,
                cheapest_price: reference_item.price,
                total_products: 1,
                stores_with_brand: vec![reference.store_name],
                reference: reference_item,
                brand_products: Vec::new(),
            },
            meta: ResponseMeta::new(req_id.0),
        }));
    };

    let today = Utc::now().date_naive();
    let rows = trolley_db::current_specials_by_brand(&state.pool, today, &brand)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut stores_with_brand: HashSet<String> = HashSet::new();
    stores_with_brand.insert(reference.store_name.clone());

    let brand_products: Vec<SpecialPriceItem> = rows
        .iter()
        .inspect(|row| {
            stores_with_brand.insert(row.store_name.clone());
        })
        .filter(|row| row.id != reference.id)
        .map(special_price_item)
        .collect();

    let cheapest_price = brand_products
        .iter()
        .map(|p| p.price)
        .chain(std::iter::once(reference_item.price))
        .min()
        .unwrap_or(reference_item.price);

    let mut stores_with_brand: Vec<String> = stores_with_brand.into_iter().collect();
    stores_with_brand.sort();

    Ok(Json(ApiResponse {
        data: BrandProductsResult {
            brand: Some(brand),
            cheapest_price,
            total_products: brand_products.len() + 1,
            stores_with_brand,
            reference: reference_item,
            brand_products,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Grouping key for identical products: brand, name, and size, lowercased.
fn normalize_product_key(name: &str, brand: Option<&str>, size: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if let Some(brand) = brand {
        parts.push(brand.trim().to_lowercase());
    }
    parts.push(name.trim().to_lowercase());
    if let Some(size) = size {
        parts.push(size.trim().to_lowercase());
    }
    parts.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_product_key_includes_brand_and_size() {
        assert_eq!(
            normalize_product_key("Dairy Milk 180g", Some("Cadbury"), Some("180g")),
            "cadbury|dairy milk 180g|180g"
        );
    }

    #[test]
    fn normalize_product_key_without_brand() {
        assert_eq!(normalize_product_key("Bananas", None, None), "bananas");
    }
}
