//! Offline unit tests for trolley-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use trolley_core::{AppConfig, Environment};
use trolley_db::{PoolConfig, SpecialFilters, SpecialSort, StorePriceRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        stores_path: PathBuf::from("./config/stores.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        cache_specials_ttl_secs: 300,
        cache_stats_ttl_secs: 600,
        history_default_days: 90,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn special_filters_default_is_unfiltered() {
    let filters = SpecialFilters::default();
    assert!(filters.store_slug.is_none());
    assert!(filters.category_ids.is_none());
    assert!(!filters.include_uncategorized);
    assert!(filters.search.is_none());
    assert!(filters.min_discount.is_none());
    assert_eq!(filters.sort, SpecialSort::Discount);
}

/// Compile-time smoke test: confirm [`StorePriceRow`] has the fields the
/// comparison endpoints rely on. No database required.
#[test]
fn store_price_row_has_expected_fields() {
    use chrono::Utc;
    use rust_decimal::Decimal;

    let row = StorePriceRow {
        store_id: 1_i64,
        store_name: "Woolworths".to_string(),
        store_slug: "woolworths".to_string(),
        price: Decimal::new(450, 2),
        unit_price: None,
        was_price: Some(Decimal::new(550, 2)),
        is_special: true,
        recorded_at: Utc::now(),
    };

    assert_eq!(row.store_slug, "woolworths");
    assert_eq!(row.price, Decimal::new(450, 2));
    assert!(row.is_special);
    assert!(row.unit_price.is_none());
}
