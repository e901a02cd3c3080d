//! Command implementations for the trolley CLI.

use std::collections::HashMap;
use std::path::Path;

use sqlx::PgPool;

/// Run migrations, then seed stores from YAML and categories from the
/// classifier taxonomy.
pub async fn seed(pool: &PgPool, stores_path: &Path) -> anyhow::Result<()> {
    let applied = trolley_db::run_migrations(pool).await?;
    println!("migrations applied: {applied}");

    let stores_file = trolley_core::load_stores(stores_path)?;
    let stores = trolley_db::seed::seed_stores(pool, &stores_file.stores).await?;
    println!("stores seeded: {stores}");

    let categories = trolley_db::seed::seed_categories(pool).await?;
    println!("categories seeded: {categories}");

    Ok(())
}

/// Import one specials feed document and print the run summary.
pub async fn ingest(pool: &PgPool, feed_path: &Path) -> anyhow::Result<()> {
    let feed = trolley_ingest::load_feed(feed_path)?;
    let summary = trolley_ingest::import_feed(pool, &feed).await?;

    println!("store:          {}", summary.store_slug);
    println!("run id:         {}", summary.run_id);
    println!("items found:    {}", summary.items_found);
    println!("items imported: {}", summary.items_imported);
    println!("items failed:   {}", summary.items_failed);
    println!("categorized:    {}", summary.categorized);
    println!("prices saved:   {}", summary.prices_recorded);
    println!("alerts fired:   {}", summary.notifications_fired);

    Ok(())
}

/// Re-run the classifier over uncategorized specials.
pub async fn categorize(pool: &PgPool, dry_run: bool, limit: i64) -> anyhow::Result<()> {
    let uncategorized = trolley_db::list_uncategorized_specials(pool, limit).await?;
    if uncategorized.is_empty() {
        println!("nothing to categorize");
        return Ok(());
    }

    let mut per_slug: HashMap<&'static str, usize> = HashMap::new();
    let mut unmatched = 0usize;

    for special in &uncategorized {
        let slug = trolley_classify::categorize(&special.name, special.brand.as_deref());

        let Some(slug) = slug else {
            unmatched += 1;
            continue;
        };

        if !dry_run {
            let category = trolley_db::get_category_by_slug(pool, slug).await?;
            trolley_db::set_special_category(pool, special.id, category.id).await?;
        }
        *per_slug.entry(slug).or_default() += 1;
    }

    let mut rows: Vec<_> = per_slug.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    let mode = if dry_run { " (dry run)" } else { "" };
    println!("categorized {} of {}{mode}:", uncategorized.len() - unmatched, uncategorized.len());
    for (slug, count) in rows {
        println!("  {slug:<28} {count}");
    }
    if unmatched > 0 {
        println!("  {:<28} {unmatched}", "(no match)");
    }

    Ok(())
}

/// Evaluate every active alert against its product's current cheapest price.
pub async fn check_alerts(pool: &PgPool) -> anyhow::Result<()> {
    let product_ids = trolley_db::list_products_with_active_alerts(pool).await?;
    if product_ids.is_empty() {
        println!("no active alerts");
        return Ok(());
    }

    let mut fired = 0usize;
    let mut checked = 0usize;

    for product_id in product_ids {
        let Some(price) = trolley_db::cheapest_current_price(pool, product_id).await? else {
            tracing::debug!(product_id, "check-alerts: no price observations yet");
            continue;
        };

        checked += 1;
        fired += trolley_db::evaluate_alerts_for_price(
            pool,
            product_id,
            price.id,
            price.price,
            price.is_special,
        )
        .await?;
    }

    println!("products checked: {checked}");
    println!("alerts fired:     {fired}");

    Ok(())
}

/// Print the latest price per store for a product, cheapest first.
pub async fn compare(pool: &PgPool, product_id: i64) -> anyhow::Result<()> {
    let product = trolley_db::get_product(pool, product_id).await?;
    let prices = trolley_db::latest_price_per_store(pool, product_id).await?;

    let brand = product.brand.as_deref().unwrap_or("-");
    println!("{} ({brand})", product.name);

    if prices.is_empty() {
        println!("no price observations");
        return Ok(());
    }

    let cheapest = prices[0].price;
    for row in &prices {
        let special = if row.is_special { " special" } else { "" };
        let delta = if row.price > cheapest {
            format!("  (+{})", row.price - cheapest)
        } else {
            String::new()
        };
        println!("  {:<12} ${}{special}{delta}", row.store_name, row.price);
    }

    Ok(())
}
