//! Live integration tests for trolley-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/trolley-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use trolley_core::stores::StoreConfig;
use trolley_core::NormalizedSpecial;
use trolley_db::{
    category_ids_with_children, clear_expired_specials, create_alert, create_product, create_user,
    evaluate_alerts_for_price, get_category_by_slug, get_special, get_store_by_slug, insert_price,
    latest_price_per_store, list_alerts_for_user, list_notifications_for_user, list_specials,
    price_history, price_history_stats, search_current_specials, specials_stats,
    unread_notification_count, upsert_special, upsert_store_product, NewAlert, SpecialFilters,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn store_config(name: &str) -> StoreConfig {
    StoreConfig {
        name: name.to_string(),
        logo_url: None,
        website_url: Some(format!("https://www.{}.com.au", name.to_lowercase())),
        catalogue_url: None,
        specials_day: Some("wednesday".to_string()),
    }
}

async fn seed_two_stores(pool: &sqlx::PgPool) -> (i64, i64) {
    let stores = vec![store_config("Woolworths"), store_config("Coles")];
    trolley_db::seed::seed_stores(pool, &stores)
        .await
        .expect("seed stores");

    let woolworths = get_store_by_slug(pool, "woolworths").await.expect("woolworths");
    let coles = get_store_by_slug(pool, "coles").await.expect("coles");
    (woolworths.id, coles.id)
}

fn make_special(name: &str, code: &str, price: i64) -> NormalizedSpecial {
    NormalizedSpecial {
        name: name.to_string(),
        brand: None,
        size: None,
        raw_category: None,
        price: Decimal::new(price, 2),
        was_price: Some(Decimal::new(price * 2, 2)),
        discount_percent: Some(50),
        unit_price: None,
        store_product_code: Some(code.to_string()),
        product_url: None,
        image_url: None,
        valid_from: NaiveDate::from_ymd_opt(2026, 3, 4),
        valid_to: NaiveDate::from_ymd_opt(2026, 3, 10),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 7).expect("valid date")
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn seed_stores_is_idempotent(pool: sqlx::PgPool) {
    let stores = vec![store_config("Woolworths")];
    let first = trolley_db::seed::seed_stores(&pool, &stores)
        .await
        .expect("first seed");
    let second = trolley_db::seed::seed_stores(&pool, &stores)
        .await
        .expect("second seed");

    assert_eq!(first, 1);
    assert_eq!(second, 1);

    let row = get_store_by_slug(&pool, "woolworths").await.expect("store");
    assert_eq!(row.name, "Woolworths");
    assert_eq!(row.specials_day.as_deref(), Some("wednesday"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn seed_categories_builds_the_tree(pool: sqlx::PgPool) {
    let count = trolley_db::seed::seed_categories(&pool)
        .await
        .expect("seed categories");
    assert!(count > 90, "expected the full taxonomy, got {count}");

    let pantry = get_category_by_slug(&pool, "pantry").await.expect("pantry");
    assert!(pantry.parent_id.is_none());

    let canned = get_category_by_slug(&pool, "canned-food")
        .await
        .expect("canned-food");
    assert_eq!(canned.parent_id, Some(pantry.id));

    let family = category_ids_with_children(&pool, "pantry")
        .await
        .expect("family");
    assert!(family.contains(&pantry.id));
    assert!(family.contains(&canned.id));
}

// ---------------------------------------------------------------------------
// Specials
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_special_updates_in_place_for_same_week(pool: sqlx::PgPool) {
    let (woolworths, _) = seed_two_stores(&pool).await;

    let first = upsert_special(&pool, woolworths, None, &make_special("Tim Tam 200g", "123", 275))
        .await
        .expect("first upsert");
    let second = upsert_special(&pool, woolworths, None, &make_special("Tim Tam 200g", "123", 250))
        .await
        .expect("second upsert");

    assert_eq!(first, second, "same week + code should update in place");

    let row = get_special(&pool, first).await.expect("get special");
    assert_eq!(row.price, Decimal::new(250, 2));
    assert_eq!(row.store_slug, "woolworths");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_specials_filters_by_store_and_discount(pool: sqlx::PgPool) {
    let (woolworths, coles) = seed_two_stores(&pool).await;

    upsert_special(&pool, woolworths, None, &make_special("Tim Tam 200g", "1", 275))
        .await
        .expect("upsert");
    let mut small_discount = make_special("Milk 2L", "2", 420);
    small_discount.discount_percent = Some(10);
    upsert_special(&pool, coles, None, &small_discount)
        .await
        .expect("upsert");

    let filters = SpecialFilters {
        store_slug: Some("coles"),
        limit: 50,
        ..Default::default()
    };
    let coles_rows = list_specials(&pool, today(), filters).await.expect("list");
    assert_eq!(coles_rows.len(), 1);
    assert_eq!(coles_rows[0].name, "Milk 2L");

    let filters = SpecialFilters {
        min_discount: Some(40),
        limit: 50,
        ..Default::default()
    };
    let deep_discounts = list_specials(&pool, today(), filters).await.expect("list");
    assert_eq!(deep_discounts.len(), 1);
    assert_eq!(deep_discounts[0].name, "Tim Tam 200g");
}

#[sqlx::test(migrations = "../../migrations")]
async fn expired_specials_are_hidden_and_clearable(pool: sqlx::PgPool) {
    let (woolworths, _) = seed_two_stores(&pool).await;

    let mut expired = make_special("Old Special", "9", 100);
    expired.valid_from = NaiveDate::from_ymd_opt(2026, 2, 1);
    expired.valid_to = NaiveDate::from_ymd_opt(2026, 2, 7);
    upsert_special(&pool, woolworths, None, &expired)
        .await
        .expect("upsert");

    let rows = list_specials(
        &pool,
        today(),
        SpecialFilters {
            limit: 50,
            ..Default::default()
        },
    )
    .await
    .expect("list");
    assert!(rows.is_empty(), "expired specials must not be listed");

    let cleared = clear_expired_specials(&pool, today()).await.expect("clear");
    assert_eq!(cleared, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_current_specials_matches_name_and_brand(pool: sqlx::PgPool) {
    let (woolworths, coles) = seed_two_stores(&pool).await;

    let mut branded = make_special("Dairy Milk 180g", "10", 350);
    branded.brand = Some("Cadbury".to_string());
    upsert_special(&pool, woolworths, None, &branded).await.expect("upsert");

    let mut branded_coles = make_special("Dairy Milk 180g", "11", 325);
    branded_coles.brand = Some("Cadbury".to_string());
    upsert_special(&pool, coles, None, &branded_coles).await.expect("upsert");

    let rows = search_current_specials(&pool, today(), "cadbury")
        .await
        .expect("search");
    assert_eq!(rows.len(), 2);
    // Grouping order: name first, then price ascending.
    assert_eq!(rows[0].price, Decimal::new(325, 2));
}

#[sqlx::test(migrations = "../../migrations")]
async fn specials_stats_counts_per_store(pool: sqlx::PgPool) {
    let (woolworths, _) = seed_two_stores(&pool).await;

    upsert_special(&pool, woolworths, None, &make_special("Tim Tam 200g", "1", 275))
        .await
        .expect("upsert");

    let stats = specials_stats(&pool, today()).await.expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.per_store.len(), 2, "all stores appear, even empty ones");

    let woolworths_count = stats
        .per_store
        .iter()
        .find(|s| s.store_slug == "woolworths")
        .expect("woolworths row");
    assert_eq!(woolworths_count.count, 1);
}

// ---------------------------------------------------------------------------
// Catalog products and prices
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn latest_price_per_store_picks_newest_observation(pool: sqlx::PgPool) {
    let (woolworths, coles) = seed_two_stores(&pool).await;

    let product = create_product(&pool, "Full Cream Milk 2L", Some("Pauls"), None, None, Some("2L"), None)
        .await
        .expect("product");

    let woolworths_listing =
        upsert_store_product(&pool, product, woolworths, Some("100"), None, None, None)
            .await
            .expect("listing");
    let coles_listing = upsert_store_product(&pool, product, coles, Some("200"), None, None, None)
        .await
        .expect("listing");

    // Two observations at Woolworths; only the newer should surface.
    insert_price(&pool, woolworths_listing, Decimal::new(450, 2), None, None, false, "feed", None, None)
        .await
        .expect("price");
    insert_price(&pool, woolworths_listing, Decimal::new(420, 2), None, None, true, "feed", None, None)
        .await
        .expect("price");
    insert_price(&pool, coles_listing, Decimal::new(440, 2), None, None, false, "feed", None, None)
        .await
        .expect("price");

    let latest = latest_price_per_store(&pool, product).await.expect("latest");
    assert_eq!(latest.len(), 2);
    // Cheapest first.
    assert_eq!(latest[0].store_slug, "woolworths");
    assert_eq!(latest[0].price, Decimal::new(420, 2));
    assert!(latest[0].is_special);
    assert_eq!(latest[1].price, Decimal::new(440, 2));
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_product_reuses_existing_name_brand_size(pool: sqlx::PgPool) {
    let first = create_product(&pool, "Tasty Cheese 500g", Some("Bega"), None, None, Some("500g"), None)
        .await
        .expect("first");
    let second = create_product(&pool, "Tasty Cheese 500g", Some("Bega"), None, None, Some("500g"), None)
        .await
        .expect("second");

    assert_eq!(first, second);
}

#[sqlx::test(migrations = "../../migrations")]
async fn price_history_window_and_stats(pool: sqlx::PgPool) {
    let (woolworths, _) = seed_two_stores(&pool).await;

    let product = create_product(&pool, "Tim Tam 200g", Some("Arnott's"), None, None, Some("200g"), None)
        .await
        .expect("product");
    let listing = upsert_store_product(&pool, product, woolworths, Some("1"), None, None, None)
        .await
        .expect("listing");

    insert_price(&pool, listing, Decimal::new(350, 2), None, None, false, "feed", None, None)
        .await
        .expect("price");
    insert_price(&pool, listing, Decimal::new(250, 2), None, None, true, "feed", None, None)
        .await
        .expect("price");

    let since = Utc::now() - chrono::Duration::days(30);
    let history = price_history(&pool, product, since, None).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].price, Decimal::new(350, 2), "oldest first");

    let stats = price_history_stats(&pool, product, since).await.expect("stats");
    assert_eq!(stats.price_points, 2);
    assert_eq!(stats.special_count, 1);
    assert_eq!(stats.min_price, Some(Decimal::new(250, 2)));
    assert_eq!(stats.max_price, Some(Decimal::new(350, 2)));
    assert_eq!(stats.current_min, Some(Decimal::new(250, 2)));
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn alert_fires_on_drop_and_advances_last_seen(pool: sqlx::PgPool) {
    let (woolworths, _) = seed_two_stores(&pool).await;

    let user = create_user(&pool, "shopper@example.com", None).await.expect("user");
    let product = create_product(&pool, "Full Cream Milk 2L", Some("Pauls"), None, None, Some("2L"), None)
        .await
        .expect("product");
    let listing = upsert_store_product(&pool, product, woolworths, Some("1"), None, None, None)
        .await
        .expect("listing");

    create_alert(
        &pool,
        &NewAlert {
            user_id: user,
            product_id: product,
            alert_type: "price_drop".to_string(),
            threshold_price: None,
            notify_any_drop: true,
            notify_special: false,
        },
    )
    .await
    .expect("alert");

    // First observation: nothing to compare against, no notification.
    let price_one = insert_price(&pool, listing, Decimal::new(450, 2), None, None, false, "feed", None, None)
        .await
        .expect("price");
    let fired = evaluate_alerts_for_price(&pool, product, price_one, Decimal::new(450, 2), false)
        .await
        .expect("evaluate");
    assert_eq!(fired, 0);

    // Price drops: the alert fires with old/new recorded.
    let price_two = insert_price(&pool, listing, Decimal::new(400, 2), None, None, false, "feed", None, None)
        .await
        .expect("price");
    let fired = evaluate_alerts_for_price(&pool, product, price_two, Decimal::new(400, 2), false)
        .await
        .expect("evaluate");
    assert_eq!(fired, 1);

    let notifications = list_notifications_for_user(&pool, user, false, 50)
        .await
        .expect("notifications");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].old_price, Some(Decimal::new(450, 2)));
    assert_eq!(notifications[0].new_price, Some(Decimal::new(400, 2)));
    assert_eq!(unread_notification_count(&pool, user).await.expect("count"), 1);

    let alerts = list_alerts_for_user(&pool, user, true).await.expect("alerts");
    assert_eq!(alerts[0].last_price_seen, Some(Decimal::new(400, 2)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn alert_threshold_fires_at_or_below(pool: sqlx::PgPool) {
    let (woolworths, _) = seed_two_stores(&pool).await;

    let user = create_user(&pool, "shopper@example.com", None).await.expect("user");
    let product = create_product(&pool, "Olive Oil 1L", None, None, None, Some("1L"), None)
        .await
        .expect("product");
    let listing = upsert_store_product(&pool, product, woolworths, Some("1"), None, None, None)
        .await
        .expect("listing");

    create_alert(
        &pool,
        &NewAlert {
            user_id: user,
            product_id: product,
            alert_type: "threshold".to_string(),
            threshold_price: Some(Decimal::new(1000, 2)),
            notify_any_drop: false,
            notify_special: false,
        },
    )
    .await
    .expect("alert");

    let above = insert_price(&pool, listing, Decimal::new(1200, 2), None, None, false, "feed", None, None)
        .await
        .expect("price");
    assert_eq!(
        evaluate_alerts_for_price(&pool, product, above, Decimal::new(1200, 2), false)
            .await
            .expect("evaluate"),
        0
    );

    let at_threshold = insert_price(&pool, listing, Decimal::new(1000, 2), None, None, false, "feed", None, None)
        .await
        .expect("price");
    assert_eq!(
        evaluate_alerts_for_price(&pool, product, at_threshold, Decimal::new(1000, 2), false)
            .await
            .expect("evaluate"),
        1
    );
}
