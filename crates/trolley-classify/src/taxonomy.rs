//! The unified category taxonomy.
//!
//! Two levels: parent categories (the department view shown in the UI) and
//! leaf subcategories (what the categorizer actually emits when it can).
//! Every slug the rule tables in [`crate::rules`] can produce is defined
//! here, so resolving a classification against the `categories` table never
//! dangles.

/// A single category definition, seeded into the `categories` table.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDef {
    pub slug: &'static str,
    pub name: &'static str,
    /// Parent slug; `None` for top-level departments.
    pub parent: Option<&'static str>,
    /// Ordering within the parent (or among departments).
    pub display_order: i32,
    pub icon: Option<&'static str>,
}

const fn parent(slug: &'static str, name: &'static str, order: i32, icon: &'static str) -> CategoryDef {
    CategoryDef {
        slug,
        name,
        parent: None,
        display_order: order,
        icon: Some(icon),
    }
}

const fn leaf(slug: &'static str, name: &'static str, p: &'static str, order: i32) -> CategoryDef {
    CategoryDef {
        slug,
        name,
        parent: Some(p),
        display_order: order,
        icon: None,
    }
}

pub const PARENT_CATEGORIES: &[CategoryDef] = &[
    parent("fruit-veg", "Fruit & Veg", 1, "🥬"),
    parent("meat-seafood", "Poultry, Meat & Seafood", 2, "🥩"),
    parent("deli", "Deli & Charcuterie", 3, "🥪"),
    parent("dairy-eggs-fridge", "Dairy, Eggs & Fridge", 4, "🥛"),
    parent("bakery", "Bakery", 5, "🍞"),
    parent("pantry", "Pantry", 6, "🥫"),
    parent("snacks-confectionery", "Snacks & Confectionery", 7, "🍿"),
    parent("drinks", "Drinks", 8, "🥤"),
    parent("freezer", "Freezer", 9, "❄️"),
    parent("international", "International Foods", 10, "🌍"),
    parent("liquor", "Liquor", 11, "🍷"),
    parent("health", "Health & Wellness", 12, "💊"),
    parent("beauty", "Beauty", 13, "💄"),
    parent("personal-care", "Personal Care", 14, "🧼"),
    parent("cleaning-household", "Cleaning & Household", 15, "🧹"),
    parent("baby", "Baby", 16, "👶"),
    parent("pet", "Pet", 17, "🐕"),
];

pub const LEAF_CATEGORIES: &[CategoryDef] = &[
    // Fruit & Veg
    leaf("fresh-fruit", "Fresh Fruit", "fruit-veg", 1),
    leaf("fresh-vegetables", "Fresh Vegetables", "fruit-veg", 2),
    leaf("salad", "Salads", "fruit-veg", 3),
    leaf("prepared-vegetables", "Prepared Vegetables", "fruit-veg", 4),
    leaf("organic-produce", "Organic Produce", "fruit-veg", 5),
    leaf("herbs-garlic-chillies", "Herbs, Garlic & Chillies", "fruit-veg", 6),
    // Poultry, Meat & Seafood
    leaf("beef-veal", "Beef & Veal", "meat-seafood", 1),
    leaf("chicken", "Chicken", "meat-seafood", 2),
    leaf("pork", "Pork", "meat-seafood", 3),
    leaf("lamb", "Lamb", "meat-seafood", 4),
    leaf("seafood", "Seafood", "meat-seafood", 5),
    leaf("mince-burgers", "Mince & Burgers", "meat-seafood", 6),
    leaf("sausages-bbq", "Sausages & BBQ", "meat-seafood", 7),
    leaf("turkey-duck", "Turkey & Duck", "meat-seafood", 8),
    // Deli & Charcuterie
    leaf("cold-cuts-salami", "Cold Cuts & Salami", "deli", 1),
    leaf("deli-cheese", "Deli Cheese", "deli", 2),
    leaf("olives-antipasto", "Olives & Antipasto", "deli", 3),
    leaf("dips-spreads", "Dips & Spreads", "deli", 4),
    leaf("cooked-meats", "Cooked Meats", "deli", 5),
    // Dairy, Eggs & Fridge
    leaf("milk", "Milk", "dairy-eggs-fridge", 1),
    leaf("cheese", "Cheese", "dairy-eggs-fridge", 2),
    leaf("yoghurt", "Yoghurt", "dairy-eggs-fridge", 3),
    leaf("eggs", "Eggs", "dairy-eggs-fridge", 4),
    leaf("butter-cream", "Butter & Cream", "dairy-eggs-fridge", 5),
    leaf("cream-custard", "Cream & Custard", "dairy-eggs-fridge", 6),
    leaf("chilled-desserts", "Chilled Desserts", "dairy-eggs-fridge", 7),
    // Bakery
    leaf("bread", "Bread", "bakery", 1),
    leaf("bread-rolls-wraps", "Rolls & Wraps", "bakery", 2),
    leaf("cakes-tarts", "Cakes & Tarts", "bakery", 3),
    leaf("pastries-croissants", "Pastries & Croissants", "bakery", 4),
    leaf("muffins-donuts", "Muffins & Donuts", "bakery", 5),
    leaf("gluten-free-bakery", "Gluten Free Bakery", "bakery", 6),
    // Pantry
    leaf("pasta-noodles", "Pasta & Noodles", "pantry", 1),
    leaf("rice-grains", "Rice & Grains", "pantry", 2),
    leaf("canned-food", "Canned Food", "pantry", 3),
    leaf("sauces-condiments", "Sauces & Condiments", "pantry", 4),
    leaf("breakfast-cereals", "Breakfast Cereals", "pantry", 5),
    leaf("cooking-oils", "Cooking Oils", "pantry", 6),
    leaf("spreads-honey", "Spreads & Honey", "pantry", 7),
    leaf("baking-supplies", "Baking Supplies", "pantry", 8),
    leaf("herbs-spices", "Herbs & Spices", "pantry", 9),
    // Snacks & Confectionery
    leaf("chips-crisps", "Chips & Crisps", "snacks-confectionery", 1),
    leaf("chocolate", "Chocolate", "snacks-confectionery", 2),
    leaf("biscuits", "Biscuits", "snacks-confectionery", 3),
    leaf("lollies", "Lollies", "snacks-confectionery", 4),
    leaf("nuts-snacks", "Nuts & Savoury Snacks", "snacks-confectionery", 5),
    leaf("popcorn-pretzels", "Popcorn & Pretzels", "snacks-confectionery", 6),
    leaf("muesli-snack-bars", "Muesli & Snack Bars", "snacks-confectionery", 7),
    // Drinks
    leaf("soft-drinks", "Soft Drinks", "drinks", 1),
    leaf("water", "Water", "drinks", 2),
    leaf("juice", "Juice", "drinks", 3),
    leaf("coffee-tea", "Coffee & Tea", "drinks", 4),
    leaf("energy-drinks", "Energy Drinks", "drinks", 5),
    leaf("cordial-mixers", "Cordial & Mixers", "drinks", 6),
    leaf("sports-drinks", "Sports Drinks", "drinks", 7),
    // Freezer
    leaf("ice-cream-frozen-desserts", "Ice Cream & Frozen Desserts", "freezer", 1),
    leaf("frozen-meals", "Frozen Meals", "freezer", 2),
    leaf("frozen-vegetables", "Frozen Vegetables", "freezer", 3),
    leaf("frozen-chips-wedges", "Frozen Chips & Wedges", "freezer", 4),
    leaf("frozen-seafood", "Frozen Seafood", "freezer", 5),
    leaf("frozen-meat-poultry", "Frozen Meat & Poultry", "freezer", 6),
    leaf("frozen-pizza", "Frozen Pizza", "freezer", 7),
    leaf("frozen-pastry", "Frozen Pastry", "freezer", 8),
    // International Foods
    leaf("asian-foods", "Asian Foods", "international", 1),
    leaf("mexican-foods", "Mexican Foods", "international", 2),
    leaf("indian-foods", "Indian Foods", "international", 3),
    leaf("italian-foods", "Italian Foods", "international", 4),
    leaf("middle-eastern-foods", "Middle Eastern Foods", "international", 5),
    leaf("european-foods", "European Foods", "international", 6),
    // Liquor
    leaf("non-alcoholic-drinks", "Non-Alcoholic Drinks", "liquor", 1),
    // Health & Wellness
    leaf("pain-relief", "Pain Relief", "health", 1),
    leaf("cold-flu", "Cold & Flu", "health", 2),
    leaf("digestive-health", "Digestive Health", "health", 3),
    // Beauty
    leaf("skincare", "Skincare", "beauty", 1),
    leaf("makeup-cosmetics", "Makeup & Cosmetics", "beauty", 2),
    leaf("suncare", "Suncare", "beauty", 3),
    leaf("fragrance", "Fragrance", "beauty", 4),
    // Personal Care
    leaf("hair-care", "Hair Care", "personal-care", 1),
    leaf("body-wash-soap", "Body Wash & Soap", "personal-care", 2),
    leaf("deodorant", "Deodorant", "personal-care", 3),
    leaf("oral-care", "Oral Care", "personal-care", 4),
    leaf("shaving-hair-removal", "Shaving & Hair Removal", "personal-care", 5),
    leaf("feminine-care", "Feminine Care", "personal-care", 6),
    // Cleaning & Household
    leaf("laundry", "Laundry", "cleaning-household", 1),
    leaf("dishwashing", "Dishwashing", "cleaning-household", 2),
    leaf("cleaning-products", "Cleaning Products", "cleaning-household", 3),
    leaf("paper-products", "Paper Products", "cleaning-household", 4),
    leaf("air-fresheners", "Air Fresheners", "cleaning-household", 5),
    leaf("pest-control", "Pest Control", "cleaning-household", 6),
    leaf("batteries-electricals", "Batteries & Electricals", "cleaning-household", 7),
    // Baby
    leaf("baby-food", "Baby Food", "baby", 1),
    leaf("baby-formula", "Baby Formula", "baby", 2),
    leaf("baby-care", "Baby Care", "baby", 3),
    // Pet
    leaf("dog-food", "Dog Food", "pet", 1),
    leaf("cat-food", "Cat Food", "pet", 2),
    leaf("pet-treats", "Pet Treats", "pet", 3),
];

/// Look up a category definition by slug, leaf or parent.
#[must_use]
pub fn find(slug: &str) -> Option<&'static CategoryDef> {
    LEAF_CATEGORIES
        .iter()
        .chain(PARENT_CATEGORIES.iter())
        .find(|c| c.slug == slug)
}

/// Returns the parent slug for a leaf, or `None` for parents and unknown slugs.
#[must_use]
pub fn parent_of(slug: &str) -> Option<&'static str> {
    LEAF_CATEGORIES
        .iter()
        .find(|c| c.slug == slug)
        .and_then(|c| c.parent)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::rules;

    #[test]
    fn slugs_are_unique() {
        let mut seen = HashSet::new();
        for cat in LEAF_CATEGORIES.iter().chain(PARENT_CATEGORIES.iter()) {
            assert!(seen.insert(cat.slug), "duplicate slug: {}", cat.slug);
        }
    }

    #[test]
    fn every_leaf_parent_exists() {
        for cat in LEAF_CATEGORIES {
            let parent = cat.parent.expect("leaf must have a parent");
            assert!(
                PARENT_CATEGORIES.iter().any(|p| p.slug == parent),
                "leaf {} references unknown parent {parent}",
                cat.slug
            );
        }
    }

    #[test]
    fn every_rule_slug_is_defined() {
        for rule in rules::leaf_rules() {
            assert!(
                find(rule.slug).is_some(),
                "leaf rule {} has no taxonomy entry",
                rule.slug
            );
        }
        for rule in rules::parent_rules() {
            assert!(
                PARENT_CATEGORIES.iter().any(|p| p.slug == rule.slug),
                "parent rule {} has no taxonomy entry",
                rule.slug
            );
        }
    }

    #[test]
    fn parent_of_resolves_leaves() {
        assert_eq!(parent_of("canned-food"), Some("pantry"));
        assert_eq!(parent_of("beef-veal"), Some("meat-seafood"));
        assert_eq!(parent_of("pantry"), None);
        assert_eq!(parent_of("nonexistent"), None);
    }
}
