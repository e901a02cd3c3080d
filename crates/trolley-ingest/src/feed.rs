//! Loading and validating feed documents from disk.

use std::path::Path;

use trolley_core::SpecialsFeed;

use crate::IngestError;

/// Reads and parses a specials feed JSON document.
///
/// # Errors
///
/// Returns [`IngestError::FeedIo`] if the file cannot be read, or
/// [`IngestError::FeedParse`] if it is not a valid feed document.
pub fn load_feed(path: &Path) -> Result<SpecialsFeed, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::FeedIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let feed: SpecialsFeed =
        serde_json::from_str(&content).map_err(|e| IngestError::FeedParse {
            path: path.display().to_string(),
            source: e,
        })?;

    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_feed_missing_file_is_io_error() {
        let result = load_feed(Path::new("/nonexistent/feed.json"));
        assert!(matches!(result, Err(IngestError::FeedIo { .. })));
    }

    #[test]
    fn feed_document_parses() {
        let json = r#"{
            "store": "woolworths",
            "provider": "salefinder",
            "fetched_at": "2026-03-04T06:00:00Z",
            "valid_from": "2026-03-04",
            "valid_to": "2026-03-10",
            "items": [
                {
                    "name": "Tim Tam Original 200g",
                    "brand": "Arnott's",
                    "size": "200g",
                    "category": null,
                    "price": "$2.75",
                    "was_price": "$5.50",
                    "unit_price": "$1.38 per 100g",
                    "store_product_code": "761384",
                    "product_url": null,
                    "image_url": null
                }
            ]
        }"#;

        let feed: SpecialsFeed = serde_json::from_str(json).expect("parse feed");
        assert_eq!(feed.store, "woolworths");
        assert_eq!(feed.item_count(), 1);
        assert_eq!(feed.items[0].brand.as_deref(), Some("Arnott's"));
    }
}
