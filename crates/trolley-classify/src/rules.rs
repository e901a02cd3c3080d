//! Hand-tuned categorization rule tables.
//!
//! Each category carries a keyword list (substring match against the
//! lowercased product text), a regex pattern list, and an exclusion list that
//! vetoes the category outright. Leaf rules are consulted before parent
//! rules; ambiguity between matching categories is resolved by the priority
//! table — specific product types outrank categories whose trigger words
//! commonly appear as descriptors ("sauce", "bbq").
//!
//! The lists are tuned against real catalogue data from the four chains.
//! Known traps encoded below: "John West Tuna In Tomato Sauce" is canned
//! food, not sauce; "Arnott's Shapes BBQ" is a biscuit, not barbecue meat;
//! "hot dog rolls" are bakery, not meat; Disney "Frozen" toothbrushes are
//! not freezer goods.

use std::sync::LazyLock;

use regex::Regex;

/// Priority weights added to a category's match score. Higher wins ties.
/// Categories absent from this table weigh [`DEFAULT_PRIORITY`].
const CATEGORY_PRIORITY: &[(&str, i32)] = &[
    // Specific product types (highest)
    ("canned-food", 90),
    ("seafood", 85),
    ("beef-veal", 85),
    ("chicken", 85),
    ("pork", 85),
    ("lamb", 85),
    ("sausages-bbq", 80),
    ("mince-burgers", 80),
    ("frozen-meals", 75),
    ("frozen-seafood", 75),
    ("frozen-meat-poultry", 75),
    // Medium priority
    ("chips-crisps", 70),
    ("biscuits", 70),
    ("chocolate", 70),
    ("milk", 70),
    ("cheese", 70),
    ("yoghurt", 70),
    ("bread", 70),
    ("pasta-noodles", 70),
    ("rice-grains", 70),
    ("soft-drinks", 70),
    ("juice", 70),
    ("water", 70),
    // Descriptor-prone categories
    ("sauces-condiments", 40),
    ("breakfast-cereals", 50),
    // Parent fallbacks (lowest)
    ("meat-seafood", 30),
    ("dairy-eggs-fridge", 30),
    ("pantry", 20),
    ("drinks", 20),
    ("freezer", 20),
    ("snacks-confectionery", 25),
    ("bakery", 25),
];

const DEFAULT_PRIORITY: i32 = 50;

/// Patterns marking secondary descriptors rather than the primary product.
/// Stripped before a second categorization attempt.
const DESCRIPTOR_PATTERN_DEFS: &[&str] = &[
    r"\s+in\s+\w+(\s+\w+)?\s+sauce",
    r"\s+in\s+(tomato|onion|oil|brine|springwater|water)",
    r"\s+with\s+\w+(\s+&\s+\w+)?",
    r"\s+\w+\s+flavou?red?",
    r"\s+style\s+\w+",
    r"\s+\d+\s*(g|ml|l|kg|pk|pack)$",
];

/// A raw rule definition. Keywords are plain substrings; patterns are regex
/// source compiled case-insensitively at first use.
struct RuleDef {
    slug: &'static str,
    keywords: &'static [&'static str],
    patterns: &'static [&'static str],
    exclude: &'static [&'static str],
}

/// A rule set with its patterns compiled and priority resolved.
pub struct RuleSet {
    pub slug: &'static str,
    pub keywords: &'static [&'static str],
    pub patterns: Vec<Regex>,
    pub exclude: &'static [&'static str],
    pub priority: i32,
}

const fn rule(
    slug: &'static str,
    keywords: &'static [&'static str],
    patterns: &'static [&'static str],
    exclude: &'static [&'static str],
) -> RuleDef {
    RuleDef {
        slug,
        keywords,
        patterns,
        exclude,
    }
}

// ---------------------------------------------------------------------------
// Leaf (subcategory) rules — consulted first for the most specific match
// ---------------------------------------------------------------------------

#[rustfmt::skip]
const LEAF_RULE_DEFS: &[RuleDef] = &[
    // Meat & seafood
    rule("beef-veal",
        &["beef", "veal", "steak", "rump", "scotch fillet", "porterhouse", "t-bone", "sirloin",
          "eye fillet", "brisket", "silverside", "corned beef", "beef roast", "beef strips"],
        &[r"beef\s+", r"veal\s+", r"angus", r"\bkg\b.*beef"],
        &["beef flavour", "beef flavor", "beef stock", "beef broth", "beef noodle", "beef jerky",
          "twisties", "shapes", "chips", "crackers", "biscuit", "cup noodle", "instant noodle",
          "soup mix"]),
    rule("chicken",
        &["chicken breast", "chicken thigh", "chicken wing", "chicken drumstick", "chicken maryland",
          "chicken tenderloin", "chicken fillet", "chicken schnitzel", "whole chicken", "chicken pieces"],
        &[r"chicken\s+(breast|thigh|wing|drum|maryland|tender|fillet|schnitzel)", r"chook", r"\bkg\b.*chicken"],
        &["chicken salt", "chicken flavour", "chicken flavor", "chicken stock", "chicken noodle",
          "chicken soup", "chicken cup", "chicken twisties", "chicken chips", "chicken crackers",
          "chicken crispy", "chicken seasoning", "rotisserie", "bbq chicken"]),
    rule("pork",
        &["pork chop", "pork loin", "pork belly", "pork roast", "pork mince", "pork steak",
          "pork fillet", "pork shoulder", "pork ribs", "pork cutlet", "pork scotch"],
        &[r"pork\s+(chop|loin|belly|roast|mince|steak|fillet|shoulder|rib|cutlet|scotch)", r"\bkg\b.*pork"],
        &["pork crackling", "pork rind", "pork flavour", "pork flavor", "pork scratchings",
          "chips", "snack"]),
    rule("lamb",
        &["lamb chop", "lamb cutlet", "lamb leg", "lamb roast", "lamb shank", "lamb shoulder",
          "lamb rack", "lamb mince", "lamb loin", "lamb backstrap"],
        &[r"lamb\s+(chop|cutlet|leg|roast|shank|shoulder|rack|mince|loin|backstrap)", r"\bkg\b.*lamb"],
        &["lamb flavour", "lamb flavor", "lamb stock", "lamb broth"]),
    rule("seafood",
        &["salmon fillet", "salmon portions", "tuna steak", "prawns", "king prawns", "tiger prawns",
          "shrimp", "barramundi", "snapper", "cod fillet", "hoki", "flathead", "calamari", "squid",
          "octopus", "mussels", "oyster", "crab", "lobster", "scallop", "basa", "dory", "perch",
          "trout", "whiting", "blue whiting", "ocean royale"],
        &[r"seafood", r"fish\s+fillet", r"(salmon|tuna|prawn|barramundi|snapper|whiting)\s+\d+g",
          r"fresh\s+(salmon|tuna|prawns|fish)", r"fillets?\s+\d+"],
        &["fish oil", "fish sauce", "fish fingers", "fish crackers", "fish shaped", "goldfish",
          "fish stock", "tuna can", "canned tuna", "tinned"]),
    rule("mince-burgers",
        &["beef mince", "pork mince", "lamb mince", "chicken mince", "turkey mince", "burger patty",
          "beef patty", "patties", "rissole", "rissoles", "meat patty"],
        &[r"(beef|pork|lamb|chicken|turkey)\s+mince", r"mince\s+\d+g", r"burger\s+patty", r"patties\s+\d+"],
        &["burger rings", "burger sauce", "burger seasoning", "burger buns", "burger cheese",
          "mince pie", "fruit mince"]),
    rule("sausages-bbq",
        &["sausage", "snag", "banger", "bratwurst", "kransky", "frankfurter", "wiener", "weiner",
          "cabanossi", "chipolata"],
        &[r"sausage", r"beef\s+sausage", r"pork\s+sausage", r"bbq\s+meat", r"bbq\s+pack"],
        &["shapes", "chips", "pringles", "sauce", "rolls", "buns", "bread", "flavour", "flavor",
          "seasoning", "marinade", "rub", "cracker", "biscuit", "crisp", "snack", "ring",
          "twisties", "franklin", "water", "sparkling"]),
    rule("turkey-duck",
        &["turkey", "duck", "goose"],
        &[r"turkey\s+", r"duck\s+"],
        &[]),

    // Dairy
    rule("milk",
        &["full cream milk", "skim milk", "lite milk", "lactose free milk", "almond milk",
          "oat milk", "soy milk", "fresh milk", "long life milk", "uht milk", "a2 milk",
          "jersey milk"],
        &[r"\d+\s*l(itre)?.*milk", r"milk\s+\d+\s*l", r"(pauls|pura|dairy farmers|devondale|so good).*milk"],
        &["milk chocolate", "milky bar", "milky way", "milk bottle", "milk biscuit",
          "condensed milk", "evaporated milk", "coconut milk", "milk powder"]),
    rule("cheese",
        &["cheddar cheese", "tasty cheese", "mozzarella cheese", "parmesan cheese", "brie cheese",
          "camembert", "feta cheese", "haloumi", "gouda cheese", "swiss cheese", "cream cheese",
          "cottage cheese", "ricotta", "cheese slices", "cheese block", "shredded cheese"],
        &[r"cheese\s+\d+g", r"cheese\s+slices", r"(bega|kraft|coon|mainland|philadelphia).*cheese",
          r"slices\s+\d+\s*pk"],
        &["cheese crackers", "cheese shapes", "cheetos", "cheese twisties", "cheese & onion",
          "cheese flavour", "cheese flavor", "cheese rings", "cheeseburger", "mac & cheese",
          "mac and cheese", "nacho cheese"]),
    rule("yoghurt",
        &["yoghurt", "yogurt", "greek yoghurt", "natural yoghurt", "chobani", "yoplait", "activia",
          "vaalia", "jalna", "farmers union", "siggi's"],
        &[r"yogh?urt\s+\d+", r"(chobani|yoplait|vaalia|jalna)"],
        &["yoghurt coating", "yoghurt covered", "yoghurt drops", "frozen yoghurt", "frozen yogurt"]),
    rule("eggs",
        &["free range eggs", "cage free eggs", "dozen eggs", "barn laid eggs", "organic eggs",
          "large eggs", "extra large eggs", "jumbo eggs"],
        &[r"\d+\s*eggs?\s*(dozen|pk|pack)", r"eggs?\s+\d+\s*pk", r"(farm|barn|free range|cage free).*eggs"],
        &["egg noodles", "easter egg", "scotch egg", "egg custard", "egg tart", "chocolate egg",
          "egg wash", "egg replacer"]),
    rule("butter-cream",
        &["salted butter", "unsalted butter", "spreadable butter", "margarine", "thickened cream",
          "pure cream", "sour cream", "cooking cream", "double cream", "light cream"],
        &[r"butter\s+\d+g", r"cream\s+\d+ml", r"(devondale|mainland|western star|flora|nuttelex).*butter"],
        &["ice cream", "cream biscuit", "cream cheese", "butter chicken", "peanut butter",
          "body butter", "cocoa butter", "shea butter", "cream puff", "cream filling",
          "cookies & cream", "cookies and cream"]),
    rule("cream-custard",
        &["custard", "vanilla custard", "chocolate custard", "caramel custard", "paul's custard",
          "dairy dessert", "rice pudding"],
        &[r"custard\s+\d+", r"(paul|dairy farmers).*custard"],
        &["custard powder", "custard tart"]),
    rule("chilled-desserts",
        &["cheesecake", "mousse", "tiramisu", "panna cotta", "creme brulee", "chilled dessert",
          "chocolate mousse", "mango mousse"],
        &[r"(cheesecake|mousse|tiramisu|panna cotta)\s*\d*g"],
        &["cheesecake mix", "mousse powder"]),

    // Drinks
    rule("soft-drinks",
        &["coca-cola", "coca cola", "coke", "pepsi", "sprite", "fanta", "solo", "lift", "sunkist",
          "schweppes", "lemonade", "soft drink", "kirks", "bundaberg"],
        &[r"(coca|pepsi|sprite|fanta|solo|kirks|schweppes).*\d+\s*(ml|l|pack)", r"soft\s+drink"],
        &["coke zero sugar snack", "lemonade scone"]),
    rule("water",
        &["spring water", "mineral water", "sparkling water", "still water", "purified water",
          "alkaline water", "bottled water", "san pellegrino", "evian", "pump water",
          "mount franklin"],
        &[r"water\s+\d+\s*(ml|l|pack)", r"\d+\s*(ml|l).*water", r"(mount franklin|pump|evian|voss)"],
        &["coconut water", "rose water", "rice water", "micellar water", "tonic water", "soda water"]),
    rule("juice",
        &["orange juice", "apple juice", "fruit juice", "vegetable juice", "tomato juice",
          "cranberry juice", "grape juice", "pineapple juice", "mango juice", "nudie",
          "daily juice", "berri"],
        &[r"juice\s+\d+\s*(ml|l)", r"\d+\s*(ml|l).*juice", r"(nudie|berri|golden circle).*juice"],
        &["juice bar", "vape juice", "e-juice"]),
    rule("coffee-tea",
        &["instant coffee", "ground coffee", "coffee beans", "coffee capsules", "coffee pods",
          "tea bags", "green tea", "herbal tea", "black tea", "nescafe", "moccona", "lavazza",
          "vittoria", "twinings", "lipton", "t2"],
        &[r"coffee\s+\d+g", r"tea\s+\d+\s*(bag|pk)", r"(nescafe|moccona|lavazza|vittoria)"],
        &["coffee table", "coffee mug", "coffee cup", "iced coffee", "coffee milk"]),
    rule("energy-drinks",
        &["energy drink", "red bull", "v energy", "mother energy", "monster energy", "rockstar",
          "nos", "prime energy"],
        &[r"energy\s+drink", r"(red bull|mother|monster|rockstar).*\d+\s*(ml|pack)"],
        &["energy bar", "energy ball", "energy bites"]),
    rule("cordial-mixers",
        &["cordial", "lime cordial", "lemon cordial", "orange cordial", "tonic water", "soda water",
          "dry ginger ale", "lemon lime bitters"],
        &[r"(lime|lemon|orange)\s+cordial", r"(tonic|soda)\s+water"],
        &[]),
    rule("sports-drinks",
        &["gatorade", "powerade", "maximus", "hydralyte", "electrolyte drink", "sports drink"],
        &[r"(gatorade|powerade|maximus)\s*\d*ml", r"electrolyte\s+(drink|powder)"],
        &[]),

    // Pantry
    rule("pasta-noodles",
        &["dried pasta", "spaghetti", "penne", "fettuccine", "linguine", "fusilli", "rigatoni",
          "lasagne sheets", "egg noodles", "rice noodles", "ramen noodles", "udon", "san remo",
          "barilla"],
        &[r"pasta\s+\d+g", r"noodles?\s+\d+g", r"(san remo|barilla|la zara)"],
        &["pasta sauce", "pasta bake", "fresh pasta", "pasta salad"]),
    rule("rice-grains",
        &["basmati rice", "jasmine rice", "brown rice", "white rice", "long grain rice",
          "arborio rice", "quinoa", "couscous", "bulgur", "pearl barley", "sunrice",
          "ben's original"],
        &[r"rice\s+\d+\s*(g|kg)", r"(sunrice|ben's original|uncle ben)"],
        &["rice crackers", "rice cakes", "rice paper", "rice noodles", "rice pudding",
          "rice bran oil", "rice flour"]),
    rule("canned-food",
        &["canned tomatoes", "diced tomatoes", "crushed tomatoes", "canned tuna", "canned salmon",
          "baked beans", "canned corn", "canned beetroot", "chickpeas", "kidney beans",
          "black beans", "lentils", "spc", "edgell", "heinz beans",
          // Canned tuna/seafood brands, always canned products
          "john west", "sirena", "safcol", "greenseas"],
        &[r"(john west|sirena|safcol|greenseas)\s+\w+", r"(canned|tinned)\s+\w+", r"\d+g\s*(can|tin)",
          r"(spc|edgell|annalisa).*\d+g", r"tuna\s+(in|with)\s+"],
        &["can opener", "garbage can", "tuna steak", "fresh tuna", "sashimi"]),
    rule("sauces-condiments",
        &["tomato sauce", "bbq sauce", "barbecue sauce", "soy sauce", "worcestershire", "ketchup",
          "mustard", "relish", "aioli", "hot sauce", "chilli sauce", "sweet chilli sauce",
          "sriracha", "tabasco", "masterfoods sauce", "fountain sauce"],
        &[r"(tomato|bbq|soy|worcester|chilli|hot|sweet chilli|teriyaki|oyster)\s+sauce\s+\d+",
          r"(heinz|masterfoods|fountain|rosella).*sauce\s+\d+", r"ketchup\s+\d+", r"mayonnaise\s+\d+"],
        &[// Seafood products with sauce descriptors
          "tuna", "john west", "salmon", "sardine", "mackerel", "anchovies", "sirena", "safcol",
          "greenseas",
          // Meat products
          "chicken", "beef", "pork", "lamb",
          // Descriptor shapes (product IN sauce, not sauce itself)
          "in sauce", "with sauce", "in tomato", "in onion", "in oil", "in brine", "in springwater",
          "& mayonnaise", "with mayonnaise", "with corn", "with chilli", "with sweet",
          // Cooking sauces (different category)
          "pasta sauce", "simmer sauce", "cooking sauce", "stir fry sauce", "curry sauce",
          "satay sauce", "soup", "casserole"]),
    rule("breakfast-cereals",
        &["weet-bix", "weetbix", "cornflakes", "nutri-grain", "muesli", "granola", "rolled oats",
          "porridge", "special k", "coco pops", "froot loops", "cheerios", "all bran",
          "just right", "sultana bran"],
        &[r"cereal\s+\d+g", r"breakfast\s+cereal", r"(kellogg|sanitarium|uncle tobys)"],
        &["cereal bar", "breakfast bar"]),
    rule("cooking-oils",
        &["olive oil", "extra virgin olive oil", "vegetable oil", "canola oil", "sunflower oil",
          "coconut oil", "avocado oil", "peanut oil", "sesame oil"],
        &[r"(olive|vegetable|canola|sunflower|coconut|avocado)\s+oil\s*\d*"],
        &["oil spray", "fish oil"]),
    rule("spreads-honey",
        &["honey", "manuka honey", "jam", "strawberry jam", "apricot jam", "peanut butter",
          "vegemite", "nutella", "hazelnut spread", "marmalade", "lemon curd", "maple syrup",
          "golden syrup", "treacle"],
        &[r"(strawberry|apricot|raspberry)\s+jam", r"(peanut|almond|cashew)\s+butter",
          r"honey\s+\d+g", r"maple\s+syrup"],
        &["honey chicken", "honey soy"]),
    rule("baking-supplies",
        &["flour", "plain flour", "self raising flour", "sugar", "caster sugar", "brown sugar",
          "icing sugar", "baking powder", "baking soda", "bicarbonate", "yeast", "vanilla essence",
          "chocolate chips", "cocoa powder"],
        &[r"(plain|self raising|bread)\s+flour", r"(caster|brown|icing)\s+sugar", r"baking\s+(powder|soda)"],
        &[]),
    rule("herbs-spices",
        &["dried basil", "dried oregano", "dried thyme", "paprika", "cumin", "turmeric", "cinnamon",
          "nutmeg", "black pepper", "sea salt", "garlic powder", "onion powder", "mixed herbs",
          "italian herbs"],
        &[r"(paprika|cumin|turmeric|cinnamon|nutmeg)\s*\d*g", r"(garlic|onion)\s+powder"],
        &["fresh herbs"]),

    // Snacks
    rule("chips-crisps",
        &["potato chips", "corn chips", "tortilla chips", "smiths chips", "thins", "pringles",
          "doritos", "kettle chips", "red rock deli", "twisties", "cheezels", "burger rings",
          "cheetos", "grain waves", "cc's", "samboy", "vege chips"],
        &[r"chips\s+\d+g", r"crisps\s+\d+g", r"(smiths|kettle|doritos|pringles|red rock|twisties|cheezels)"],
        &["fish and chips", "fish & chips", "frozen chips", "oven chips", "hot chips"]),
    rule("chocolate",
        &["chocolate block", "chocolate bar", "cadbury", "lindt", "ferrero rocher", "mars bar",
          "snickers", "twix", "kit kat", "toblerone", "maltesers", "m&m", "bounty", "milky way",
          "picnic", "crunchie", "cherry ripe", "boost", "kinder"],
        &[r"chocolate\s+\d+g", r"(cadbury|lindt|nestle|ferrero).*\d+g", r"choc\s+\d+g"],
        &["chocolate milk", "hot chocolate", "chocolate spread", "chocolate sauce", "chocolate chip",
          "chocolate flavour", "chocolate flavor"]),
    rule("biscuits",
        &["tim tam", "oreo", "arnott's", "arnotts", "shapes", "scotch finger", "monte carlo",
          "shortbread", "anzac biscuit", "digestive", "nice biscuit", "cream biscuit",
          "chocolate biscuit", "teddy bear biscuit", "tiny teddy", "iced vovo", "kingston",
          "delta cream"],
        &[r"biscuit\s+\d+g", r"cookies?\s+\d+g", r"(arnott|tim tam|oreo|shapes)"],
        &["dog biscuit", "cat biscuit", "pet biscuit"]),
    rule("lollies",
        &["lollies", "candy", "gummy bears", "gummy worms", "jelly beans", "licorice", "allsorts",
          "snakes", "party mix", "sour worms", "sour straps", "mentos", "skittles", "starburst",
          "lifesavers", "tic tac", "minties", "fantales", "redskins", "milkos"],
        &[r"lollies\s+\d+g", r"candy\s+\d+g", r"(haribo|allen|darrell lea)"],
        &["lollipop stick", "lolly bag"]),
    rule("nuts-snacks",
        &["roasted peanuts", "salted peanuts", "almonds", "cashews", "macadamia nuts", "walnuts",
          "pistachios", "mixed nuts", "trail mix", "beer nuts", "honey roasted peanuts",
          "salted cashews"],
        &[r"nuts\s+\d+g", r"(roasted|salted|honey)\s+(peanuts|almonds|cashews|macadamia)",
          r"(cobram|forresters).*nuts"],
        &["coconut", "doughnut", "donut", "hazelnut spread", "nutella"]),
    rule("popcorn-pretzels",
        &["popcorn", "microwave popcorn", "butter popcorn", "caramel popcorn", "cobs popcorn",
          "pretzels", "pretzel twists", "rice crackers", "rice snacks"],
        &[r"(butter|caramel|microwave|salted|sweet)\s+popcorn", r"popcorn\s+\d+g", r"cobs.*popcorn",
          r"pretzel\s*\d*g", r"rice\s+cracker"],
        &[]),
    rule("muesli-snack-bars",
        &["muesli bar", "nut bar", "protein bar", "fruit bar", "breakfast bar", "carman's bar",
          "be natural bar", "uncle toby's bar"],
        &[r"(muesli|nut|protein|fruit|breakfast)\s+bar", r"(carman|be natural|uncle toby)"],
        &[]),

    // Freezer
    rule("ice-cream-frozen-desserts",
        &["ice cream", "gelato", "sorbet", "frozen yogurt", "magnum", "cornetto", "paddle pop",
          "streets", "peters", "connoisseur", "ben & jerry", "haagen dazs", "bulla", "weis bar",
          "zooper dooper", "calippo", "gaytime"],
        &[r"ice\s*cream\s+\d+", r"(streets|peters|bulla|connoisseur).*\d+"],
        &["ice cream cone", "ice cream scoop", "ice cream maker"]),
    rule("frozen-meals",
        &["frozen meal", "ready meal", "tv dinner", "lean cuisine", "healthy choice",
          "weight watchers meal", "on the menu", "youfoodz"],
        &[r"frozen\s+meal", r"ready\s+meal", r"(lean cuisine|healthy choice|on the menu)"],
        &["meal kit", "meal prep container"]),
    rule("frozen-vegetables",
        &["frozen peas", "frozen corn", "frozen vegetables", "frozen beans", "frozen spinach",
          "frozen broccoli", "frozen stir fry vegetables", "frozen mixed vegetables",
          "birds eye vegetables", "mccain vegetables"],
        &[r"frozen\s+(pea|corn|veg|bean|spinach|broccoli|carrot)", r"(birds eye|mccain).*vegetables"],
        &[]),
    rule("frozen-chips-wedges",
        &["frozen chips", "oven chips", "potato wedges", "hash browns", "potato gems",
          "frozen crinkle cut", "frozen straight cut", "steakhouse chips", "mccain chips",
          "birds eye chips"],
        &[r"frozen\s+chips?", r"oven\s+chips?", r"(mccain|birds eye).*chips", r"hash\s*brown"],
        &["fish and chips meal", "cheese & onion", "cheese and onion", "sour cream",
          "salt & vinegar", "chicken", "bbq", "smiths", "thins", "pringles", "sprinters"]),
    rule("frozen-seafood",
        &["frozen prawns", "frozen fish", "frozen salmon", "frozen basa", "fish fingers",
          "crumbed fish", "frozen calamari", "frozen squid"],
        &[r"frozen\s+(prawns|fish|salmon|basa|calamari)", r"fish\s+fingers"],
        &[]),
    rule("frozen-meat-poultry",
        &["frozen chicken", "frozen beef", "frozen mince", "frozen sausages", "frozen burgers",
          "chicken nuggets", "chicken tenders"],
        &[r"frozen\s+(chicken|beef|mince|sausage|burger)", r"chicken\s+(nuggets|tenders|strips)"],
        &[]),
    rule("frozen-pizza",
        &["frozen pizza", "mccain pizza", "dr oetker pizza", "pizza base", "pizza pocket"],
        &[r"frozen\s+pizza", r"(mccain|dr oetker).*pizza"],
        &["pizza sauce", "pizza seasoning"]),
    rule("frozen-pastry",
        &["sausage roll", "meat pie", "party pie", "beef pie", "chicken pie", "spring roll",
          "dim sim", "samosa", "puff pastry", "shortcrust pastry", "filo pastry"],
        &[r"(sausage|meat|party|beef|chicken)\s+(roll|pie)", r"(spring roll|dim sim|samosa)\s*\d*"],
        &[]),

    // Cleaning & household
    rule("laundry",
        &["laundry", "washing powder", "fabric softener", "stain remover", "omo", "cold power",
          "dynamo", "napisan"],
        &[r"laundry\s+", r"washing\s+powder"],
        &[]),
    rule("dishwashing",
        &["dishwashing", "dish soap", "dishwasher tablets", "rinse aid", "finish", "fairy",
          "morning fresh"],
        &[r"dishwash", r"dish\s+"],
        &[]),
    rule("cleaning-products",
        &["surface spray", "bathroom cleaner", "kitchen cleaner", "glass cleaner", "floor cleaner",
          "ajax", "windex", "mr muscle"],
        &[r"cleaner\s+", r"spray\s+\d+"],
        &[]),
    rule("paper-products",
        &["toilet paper", "paper towel", "tissues", "kleenex", "sorbent", "quilton"],
        &[r"toilet\s+paper", r"paper\s+towel"],
        &[]),
    rule("air-fresheners",
        &["air freshener", "room spray", "glade", "febreze", "airwick", "scented candle",
          "reed diffuser", "car freshener", "odour eliminator"],
        &[r"air\s+freshener", r"(glade|febreze|airwick)\s*", r"scented\s+candle"],
        &[]),
    rule("pest-control",
        &["insect spray", "fly spray", "ant bait", "cockroach bait", "mosquito repellent",
          "mortein", "raid", "baygon", "mouse trap", "rat bait"],
        &[r"(insect|fly|bug)\s+spray", r"(ant|cockroach|mouse|rat)\s+(bait|trap)", r"(mortein|raid|baygon)"],
        &[]),
    rule("batteries-electricals",
        &["batteries", "aa batteries", "aaa batteries", "9v battery", "duracell", "energizer",
          "light bulb", "led bulb", "extension cord", "power board"],
        &[r"(aa|aaa|9v|c|d)\s*batteries", r"(duracell|energizer)\s*\d*pk", r"(light|led)\s+bulb"],
        &[]),

    // Personal care
    rule("hair-care",
        &["shampoo", "conditioner", "hair treatment", "hair mask", "hair gel", "hair spray",
          "head & shoulders", "pantene", "tresemme"],
        &[r"shampoo", r"conditioner"],
        &[]),
    rule("body-wash-soap",
        &["body wash", "soap", "shower gel", "bath", "dove", "palmolive"],
        &[r"body\s+wash", r"shower\s+gel"],
        &[]),
    rule("deodorant",
        &["deodorant", "antiperspirant", "roll on", "rexona", "lynx", "dove deo", "nivea deo"],
        &[r"deodorant", r"antiperspirant"],
        &[]),
    rule("oral-care",
        &["toothpaste", "toothbrush", "mouthwash", "dental", "colgate", "oral-b", "sensodyne",
          "listerine"],
        &[r"toothpaste", r"toothbrush", r"mouthwash"],
        &[]),
    rule("shaving-hair-removal",
        &["razor", "razor blades", "shaving cream", "shaving gel", "shaving foam", "aftershave",
          "wax strips", "hair removal cream", "epilator", "electric shaver"],
        &[r"(gillette|schick|bic)\s+razor", r"shaving\s+(cream|gel|foam)", r"wax\s+strips"],
        &[]),
    rule("feminine-care",
        &["tampons", "pads", "sanitary pads", "panty liners", "feminine wash", "period underwear",
          "libra", "carefree", "u by kotex"],
        &[r"(tampons|pads|liners)\s*\d*", r"(libra|carefree|kotex)"],
        &[]),

    // Fruit & veg
    rule("fresh-fruit",
        &["fresh apple", "fresh banana", "fresh orange", "fresh mandarin", "fresh grapes",
          "fresh strawberries", "fresh blueberries", "fresh raspberries", "fresh mango",
          "fresh pineapple", "watermelon", "rockmelon", "honeydew", "fresh pear", "fresh peach",
          "nectarine", "fresh plum", "fresh kiwi", "fresh avocado", "passionfruit", "papaya",
          "pink lady apple", "granny smith", "royal gala"],
        &[r"fresh\s+(apple|banana|orange|grape|strawberr|mango|pear)",
          r"australian\s+(mango|peach|grape|apple)", r"(gala|fuji|pink lady)\s+apple"],
        &["apple juice", "banana bread", "orange juice", "dried fruit", "fruit bar", "fruit snack",
          "juice", "pulp", "cordial", "ham", "spiced", "canned", "labeller", "blue ", "dymo"]),
    rule("fresh-vegetables",
        &["fresh broccoli", "fresh carrot", "fresh potato", "fresh onion", "fresh tomato",
          "fresh lettuce", "fresh spinach", "fresh kale", "fresh cabbage", "fresh cauliflower",
          "fresh capsicum", "fresh cucumber", "fresh zucchini", "fresh eggplant", "fresh mushroom",
          "fresh celery", "fresh asparagus", "fresh beetroot", "fresh pumpkin", "sweet potato",
          "loose carrots", "loose potatoes", "loose onions"],
        &[r"fresh\s+(broccoli|carrot|potato|onion|tomato|lettuce)", r"baby\s+(spinach|carrots|corn)",
          r"bunch\s+(celery|asparagus)", r"(woolworths|coles)\s+(carrot|potato|onion|tomato)"],
        &["frozen", "canned", "tinned", "chips", "sauce", "popcorn", "corn chips", "sweet corn"]),
    rule("salad",
        &["salad mix", "salad bag", "coleslaw mix", "salad kit", "caesar salad", "garden salad",
          "rocket salad", "baby spinach salad", "mixed leaves"],
        &[r"salad\s+(mix|bag|kit|bowl)", r"mixed\s+leaves"],
        &["salad dressing", "pasta salad", "potato salad"]),
    rule("prepared-vegetables",
        &["stir fry vegetables", "vegetable medley", "pre-cut vegetables", "diced vegetables",
          "sliced vegetables", "vegetable tray", "party platter vegetables"],
        &[r"(stir fry|cut|diced|sliced)\s+veg", r"veg.*medley"],
        &[]),
    rule("organic-produce",
        &["organic apple", "organic banana", "organic carrot", "organic spinach", "organic tomato",
          "organic avocado", "certified organic"],
        &[r"organic\s+(apple|banana|carrot|spinach|tomato|veg|fruit)"],
        &[]),
    rule("herbs-garlic-chillies",
        &["fresh basil", "fresh parsley", "fresh coriander", "fresh mint", "fresh rosemary",
          "fresh thyme", "garlic bulb", "fresh ginger", "fresh chilli", "spring onion", "shallot",
          "lemongrass"],
        &[r"fresh\s+(basil|parsley|coriander|mint|rosemary|thyme|dill|ginger|chilli)", r"garlic\s+bulb"],
        &["garlic bread", "garlic sauce", "dried herbs", "ginger cookies", "ginger biscuit",
          "ginger beer", "ginger ale", "ginger nut", "chilli sauce", "chilli oil", "chilli flakes",
          "sweet chilli", "chilli con", "chilli powder"]),

    // Deli
    rule("cold-cuts-salami",
        &["sliced ham", "leg ham", "salami", "prosciutto", "pastrami", "mortadella", "pepperoni",
          "chorizo slices", "ham off the bone", "smoked salmon slices"],
        &[r"sliced\s+(ham|salami|turkey|chicken)", r"(don|primo|hans).*sliced"],
        &[]),
    rule("deli-cheese",
        &["deli brie", "deli camembert", "deli blue cheese", "deli gouda", "deli gruyere",
          "specialty cheese", "cheese wheel"],
        &[r"deli\s+cheese", r"specialty\s+cheese"],
        &[]),
    rule("olives-antipasto",
        &["kalamata olives", "green olives", "stuffed olives", "marinated olives",
          "sundried tomatoes", "antipasto platter", "chargrilled vegetables",
          "marinated artichokes", "marinated feta"],
        &[r"(kalamata|green|stuffed|marinated)\s+olives", r"antipasto"],
        &[]),
    rule("dips-spreads",
        &["hummus", "tzatziki", "guacamole", "beetroot dip", "french onion dip", "spinach dip",
          "basil pesto", "tapenade", "baba ganoush"],
        &[r"(hummus|tzatziki|guacamole|pesto)\s*\d*g", r"(beetroot|french onion|spinach)\s+dip"],
        &["chip dip", "sauce"]),
    rule("cooked-meats",
        &["rotisserie chicken", "roast chicken", "bbq chicken", "roast beef", "roast pork",
          "roast lamb", "hot roast"],
        &[r"(rotisserie|roast|bbq)\s+(chicken|beef|pork|lamb)"],
        &["roast chicken flavour", "roast beef flavour"]),

    // Bakery
    rule("bread",
        &["white bread", "wholemeal bread", "multigrain bread", "sourdough bread", "rye bread",
          "sliced bread", "bread loaf", "sandwich bread", "tip top bread", "helga's bread",
          "wonder white"],
        &[r"(white|wholemeal|multigrain|sourdough|rye)\s+bread", r"bread\s+\d+g",
          r"(tip top|helga|abbott|wonder white)"],
        &["bread crumbs", "bread mix"]),
    rule("bread-rolls-wraps",
        &["bread rolls", "dinner rolls", "burger buns", "hot dog rolls", "hot dog buns",
          "brioche buns", "wraps", "tortilla wraps", "pita bread", "naan bread", "flatbread",
          "lebanese bread", "mountain bread"],
        &[r"(bread|dinner|burger|hot dog)\s+(roll|bun)", r"(tortilla|pita|naan|flatbread)\s*\d*"],
        &["sausage roll", "spring roll"]),
    rule("cakes-tarts",
        &["chocolate cake", "sponge cake", "mud cake", "cheesecake", "carrot cake", "fruit cake",
          "apple tart", "custard tart", "lemon tart", "fruit tart"],
        &[r"(chocolate|sponge|mud|carrot|fruit)\s+cake", r"(apple|custard|lemon|fruit)\s+tart"],
        &[]),
    rule("pastries-croissants",
        &["croissant", "danish pastry", "pain au chocolat", "almond croissant", "butter croissant",
          "apple turnover", "custard danish", "cinnamon scroll"],
        &[r"croissant\s*\d*", r"danish\s+pastry", r"(pain au chocolat|turnover|scroll)"],
        &[]),
    rule("muffins-donuts",
        &["chocolate muffin", "blueberry muffin", "banana muffin", "bran muffin", "donut",
          "doughnut", "cinnamon donut", "glazed donut", "jam donut"],
        &[r"(chocolate|blueberry|banana|bran)\s+muffin", r"(cinnamon|glazed|jam)\s+donut"],
        &[]),
    rule("gluten-free-bakery",
        &["gluten free bread", "gluten free wraps", "gluten free muffin", "gluten free cake",
          "gluten free rolls"],
        &[r"gluten\s+free\s+(bread|wrap|muffin|cake|roll)"],
        &[]),

    // International
    rule("asian-foods",
        &["soy sauce", "teriyaki sauce", "hoisin sauce", "oyster sauce", "fish sauce", "rice paper",
          "rice noodles", "wonton wrappers", "tofu", "tempeh", "miso paste", "curry paste",
          "coconut milk"],
        &[r"(soy|teriyaki|hoisin|oyster|fish)\s+sauce", r"(rice|wonton)\s+(paper|wrapper|noodle)",
          r"(miso|curry)\s+paste"],
        &[]),
    rule("mexican-foods",
        &["taco shells", "taco kit", "tortilla chips", "salsa", "guacamole", "refried beans",
          "burrito kit", "enchilada sauce", "nacho cheese", "jalapeno"],
        &[r"(taco|burrito|enchilada)\s+(shell|kit|sauce)", r"tortilla\s+chips"],
        &[]),
    rule("indian-foods",
        &["curry paste", "tikka masala", "butter chicken sauce", "korma", "vindaloo", "naan bread",
          "poppadoms", "mango chutney", "lime pickle", "basmati rice"],
        &[r"(tikka|butter chicken|korma|vindaloo|rogan josh)\s*(sauce|paste)?", r"(naan|poppadom|papadum)"],
        &[]),
    rule("italian-foods",
        &["pasta sauce", "bolognese sauce", "napolitana sauce", "pesto", "pizza sauce",
          "sun dried tomatoes", "balsamic vinegar", "risotto rice", "arborio rice", "parmesan"],
        &[r"(bolognese|napolitana|arrabbiata|puttanesca)\s+sauce", r"(balsamic|red wine)\s+vinegar"],
        &[]),
    rule("middle-eastern-foods",
        &["hummus", "tahini", "falafel", "za'atar", "dukkah", "harissa", "pomegranate molasses",
          "lebanese bread", "pita chips"],
        &[r"(hummus|tahini|falafel|dukkah|harissa)\s*\d*g", r"za'atar"],
        &[]),
    rule("european-foods",
        &["sauerkraut", "pierogi", "bratwurst", "german mustard", "polish sausage", "greek feta",
          "dolmades", "tzatziki"],
        &[r"(sauerkraut|pierogi|bratwurst|dolmades)"],
        &[]),

    // Liquor
    rule("non-alcoholic-drinks",
        &["non alcoholic beer", "non alcoholic wine", "alcohol free beer", "alcohol free wine",
          "zero alcohol", "0% alcohol"],
        &[r"(non alcoholic|alcohol free|zero alcohol|0%)\s+(beer|wine|cider)"],
        &[]),

    // Beauty
    rule("skincare",
        &["face wash", "cleanser", "moisturiser", "moisturizer", "face cream", "serum", "eye cream",
          "face mask", "exfoliator", "toner", "micellar water"],
        &[r"(face|facial)\s+(wash|cleanser|cream|mask|scrub)", r"(olay|neutrogena|garnier|l'oreal|loreal).*face"],
        &[]),
    rule("makeup-cosmetics",
        &["foundation", "concealer", "mascara", "lipstick", "lip gloss", "eyeshadow", "eyeliner",
          "blush", "bronzer", "primer", "setting spray", "makeup remover"],
        &[r"(maybelline|revlon|rimmel|covergirl)\s+", r"(foundation|mascara|lipstick|eyeshadow)\s*\d*"],
        &[]),
    rule("suncare",
        &["sunscreen", "sunblock", "spf", "sun lotion", "after sun", "tan lotion", "tanning",
          "cancer council"],
        &[r"sunscreen\s+spf", r"spf\s*\d+", r"(cancer council|banana boat|nivea sun)"],
        &[]),
    rule("fragrance",
        &["perfume", "cologne", "eau de toilette", "eau de parfum", "body spray", "body mist",
          "aftershave"],
        &[r"(eau de|body)\s+(toilette|parfum|spray|mist)", r"(perfume|cologne|aftershave)\s*\d*ml"],
        &[]),

    // Health
    rule("pain-relief",
        &["panadol", "nurofen", "paracetamol", "ibuprofen", "aspirin", "pain relief",
          "headache tablets", "deep heat", "voltaren", "tiger balm"],
        &[r"(panadol|nurofen|paracetamol|ibuprofen|aspirin)\s*\d*", r"pain\s+relief"],
        &[]),
    rule("cold-flu",
        &["cold and flu", "cough syrup", "cough medicine", "throat lozenges", "strepsils",
          "butter menthol", "vicks", "nasal spray", "decongestant", "codral", "lemsip"],
        &[r"(cold|flu)\s+(tablet|capsule|liquid)", r"(strepsils|vicks|codral|lemsip)"],
        &[]),
    rule("digestive-health",
        &["antacid", "gaviscon", "mylanta", "quick eze", "probiotics", "inner health", "yakult",
          "metamucil", "fibre supplement", "laxative"],
        &[r"(gaviscon|mylanta|quick eze|metamucil)\s*\d*", r"probiotic\s*\d*"],
        &[]),

    // Baby
    rule("baby-food",
        &["baby puree", "baby food pouch", "baby cereal", "baby snacks", "baby rusks", "heinz baby",
          "rafferty's garden", "only organic baby"],
        &[r"baby\s+(puree|food|cereal|snack|rusk)", r"(heinz|rafferty|only organic).*baby"],
        &[]),
    rule("baby-formula",
        &["infant formula", "baby formula", "toddler milk", "aptamil", "s26", "karicare", "nan",
          "a2 platinum"],
        &[r"(infant|baby|toddler)\s+(formula|milk)", r"(aptamil|s26|karicare|nan)\s*\d*"],
        &[]),
    rule("baby-care",
        &["baby wash", "baby shampoo", "baby lotion", "nappy cream", "sudocrem", "baby powder",
          "baby oil", "nappy bags"],
        &[r"baby\s+(wash|shampoo|lotion|powder|oil)", r"nappy\s+(cream|bag)"],
        &[]),

    // Pet
    rule("dog-food",
        &["dry dog food", "wet dog food", "dog biscuits", "pedigree", "optimum dog", "supercoat",
          "black hawk dog", "advance dog", "royal canin dog"],
        &[r"(dry|wet)\s+dog\s+food", r"(pedigree|optimum|supercoat|advance|royal canin).*dog"],
        &[]),
    rule("cat-food",
        &["dry cat food", "wet cat food", "cat biscuits", "whiskas", "dine cat", "fancy feast",
          "purina cat", "advance cat", "royal canin cat", "meow mix"],
        &[r"(dry|wet)\s+cat\s+food", r"\bcat\s+(food|treats|biscuits)"],
        &["sardine", "fish", "salmon", "tuna", "ocean"]),
    rule("pet-treats",
        &["dog treats", "cat treats", "dog chews", "dental sticks", "schmackos",
          "pedigree dentastix", "greenies"],
        &[r"(dog|cat)\s+(treat|chew|stick)", r"(schmackos|dentastix|greenies)"],
        &[]),
];

// ---------------------------------------------------------------------------
// Parent (department) rules — the fallback when no leaf matches
// ---------------------------------------------------------------------------

#[rustfmt::skip]
const PARENT_RULE_DEFS: &[RuleDef] = &[
    rule("fruit-veg",
        // Only clear fresh produce with unambiguous names
        &["broccolini", "beetroot", "zucchini", "capsicum", "cucumber", "asparagus", "celery",
          "leek", "fennel", "bok choy", "choy sum",
          "avocado", "rockmelon", "honeydew", "watermelon", "passionfruit", "mandarin", "nectarine",
          "kiwi", "papaya", "dragonfruit"],
        &[r"australian (mango|peach|grape|apple|orange|strawberr|blueberr|raspberr)",
          r"fresh (lettuce|spinach|kale|cabbage|mushroom|tomato|potato|onion)",
          r"bunch each",
          r"oakleaf|iceberg|cos lettuce",
          r"truss.*tomato|cocktail tomato|cherry tomato",
          r"punnet.*g$",
          r"per 200g|per kg|each$",
          r"woolworths (mushroom|lettuce|onion|potato|tomato|broccoli|carrot)",
          r"coles (kale|lettuce|salad mix|strawberr)",
          r"^coles (strawberr|banana|apple|orange)"],
        // Everything that borrows produce words
        &["airpods", "iphone", "ipad", "macbook", "samsung", "phone", "tablet", "earbuds",
          "headphone", "speaker", "watch", "camera", "generation",
          "lemonade", "soft drink", "drink", "mineral water", "sparkling", "sports", "fanta",
          "sprite", "solo", "schweppes", "coca", "cola", "pepsi", "gatorade", "powerade", "juice",
          "cordial", "squash", "soda", "fizzy", "energy", "smoothie", "milk", "ml", "litre",
          "bottle", "can", "pack",
          "popcorn", "corn chips", "tortilla", "chip", "crisps", "pretzels", "doritos", "pringles",
          "thins", "grain waves", "smiths", "cheetos", "cracker", "biscuit", "cookie", "shapes",
          "bar", "pudding", "delights", "dip", "dips",
          "cake", "muffin", "bread", "pastry", "croissant", "tart", "pie", "bagel", "wrap",
          "wraps", "mission",
          "ravioli", "pasta", "risotto", "sausage", "salmon", "beef", "pork", "chicken", "lamb",
          "ham", "bacon", "tuna", "fish", "ricotta", "agnolotti", "melters", "fries", "kitchen",
          "sauce", "paste", "stock", "broth", "seasoning", "dressing", "powder", "bolognese",
          "passata", "baked beans", "spc", "annalisa", "john west",
          "frozen", "ice cream", "ice block", "gelato", "sorbet", "calippo", "streets", "mini",
          "yoghurt", "yogurt", "cheese", "yoplait", "petit", "pouch",
          "l'oreal", "loreal", "shampoo", "conditioner", "cream", "lotion",
          "dishwashing", "detergent", "cleaning", "fairy", "finish",
          "mamia", "baby", "infant", "toddler",
          "wine", "beer", "cider", "vodka", "gin", "rum", "whisky",
          "salad co", "salad kit", "coleslaw", "caesar", "asian style", "ranch salad",
          "green goddess", "kaleslaw", "french onion"]),
    rule("meat-seafood",
        &["chicken breast", "chicken thigh", "beef steak", "lamb chop", "pork chop", "beef mince",
          "lamb mince", "pork mince", "sausage", "bacon rashers", "turkey breast", "duck breast",
          "veal schnitzel", "beef roast", "lamb roast", "pork roast", "beef ribs", "pork ribs",
          "lamb cutlet", "beef fillet", "rump steak", "scotch fillet", "eye fillet", "t-bone",
          "porterhouse",
          "salmon fillet", "tuna steak", "prawns", "king prawns", "barramundi fillet",
          "snapper fillet", "fish fillet", "calamari", "squid", "octopus", "mussels", "oyster",
          "crab", "lobster", "scallop", "marinara mix",
          "frankfurter", "kransky", "chorizo"],
        &[r"\bkg\b.*meat", r"per\s*kg", r"fresh\s+seafood"],
        &["ice cream", "frozen", "dessert", "gelato", "sorbet", "peters drumstick", "paddle pop",
          "magnum", "cornetto",
          // Snacks with meat flavours
          "crackers", "biscuit", "shapes", "cracker", "chips", "cheetos", "balls", "twisties",
          "burger rings", "pringles", "doritos", "thins", "snack", "bbq flavour", "bbq flavor",
          "barbecue flavour", "barbecue flavor", "chicken flavour", "chicken flavor",
          "beef flavour", "beef flavor",
          "noodles", "noodle", "stock", "broth", "soup", "sauce", "flavour", "flavor", "seasoning",
          "marinade", "rub", "spice mix",
          "fish oil", "oil capsule", "supplement", "vitamin", "capsules", "tablets",
          "shampoo", "conditioner", "serum", "moisturiser", "moisturizer", "cream", "lotion",
          "l'oreal", "loreal", "dermaveen", "soap",
          // Bakery lookalikes ("hot dog rolls")
          "crumpet", "muffin", "rolls", "buns", "bread", "brioche",
          "dog food", "cat food", "pet food", "dog treat", "cat treat", "julius", "whiskas",
          "pedigree", "dine", "fancy feast",
          // "roast" matches roasted nuts
          "peanut", "macadamia", "almond", "cashew", "walnut", "pistachio", "roasted & salted",
          "roasted and salted", "mixed nuts", "forresters",
          "canned", "tinned", "can "]),
    rule("deli",
        &["deli", "sliced", "salami", "prosciutto", "pastrami", "mortadella", "chorizo",
          "pepperoni", "kransky", "kabana", "twiggy", "devon", "continental", "olives",
          "antipasto", "hummus", "dip", "tzatziki", "guacamole", "pate", "terrine",
          "the fresh salad co"],
        &[r"deli\s+", r"sliced\s+(ham|chicken|turkey|roast)",
          r"(potato|coleslaw|pasta|lentil|cous cous) salad", r"tabbouleh"],
        &[]),
    rule("dairy-eggs-fridge",
        &["milk", "cheese", "yoghurt", "yogurt", "butter", "cream", "eggs", "custard",
          "sour cream", "cottage cheese", "ricotta", "feta", "fetta", "brie", "camembert",
          "cheddar", "parmesan", "mozzarella", "haloumi", "tasty", "cream cheese", "margarine",
          "spread", "kefir", "quark", "havarti", "gouda", "swiss", "emmental", "edam", "colby",
          "gruyere", "emporium selection"],
        &[r"\bl\b.*milk", r"dairy\s+", r"\begg\b", r"slices?\s*\d+g"],
        &[]),
    rule("bakery",
        &["bread", "loaf", "bread rolls", "burger buns", "hot dog rolls", "hot dog buns",
          "croissant", "bagel", "english muffin", "cake", "donut", "doughnut", "pastry",
          "danish pastry", "tart", "scone", "crumpet", "brioche", "focaccia", "ciabatta",
          "sourdough", "rye bread", "wholemeal bread", "multigrain bread", "white bread", "wraps",
          "tortilla", "pita bread", "naan bread", "flatbread", "hot cross bun", "fruit loaf",
          "banana bread"],
        &[r"bakery\s+", r"sliced\s+bread", r"fresh\s+baked", r"(tip top|abbott|helga|wonder white)"],
        &["bread crumbs", "breadcrumbs"]),
    rule("pantry",
        &["pasta", "spaghetti", "penne", "fettuccine", "rice", "noodles", "cereal", "oats",
          "muesli", "granola", "sauce", "tomato paste", "oil", "olive oil", "vegetable oil",
          "flour", "sugar", "honey", "jam", "peanut butter", "vegemite", "nutella", "spread",
          "canned", "tinned", "beans", "chickpeas", "lentils", "tuna", "soup", "stock", "broth",
          "gravy", "seasoning", "spice", "herbs", "salt", "pepper", "vinegar", "soy sauce",
          "coconut", "curry", "mayonnaise", "mayo", "ketchup", "mustard", "relish", "aioli",
          "stonemill", "hillcrest", "oh so natural"],
        &[r"cooking\s+", r"baking\s+", r"canned\s+", r"diced tomato", r"tomatoes? \d+g",
          r"chick ?peas?", r"4 bean mix", r"bean mix", r"ground\s+\d+g", r"leaves\s+\d+g",
          r"quinoa|power grain|fruity rings|hooroos", r"cup noodle"],
        &[]),
    rule("drinks",
        &["water", "juice", "soft drink", "soda", "cola", "lemonade", "coffee", "tea", "cordial",
          "energy drink", "sports drink", "mineral water", "sparkling", "coconut water",
          "kombucha", "iced tea", "iced coffee", "flavoured milk", "up & go", "powerade",
          "gatorade", "mother", "v energy", "red bull", "westcliff", "quick 2 go", "alcafe",
          "expressi"],
        &[r"\bl\b.*drink", r"sparkling\s+", r"mineral\s+", r"(tropical|apple|raspberry) drink",
          r"liquid breakfast", r"drink \d+ pack", r"capsule|hot choc sachets|latte capsules"],
        &[]),
    rule("freezer",
        &["ice cream", "gelato", "sorbet", "frozen pizza", "frozen chips", "nuggets",
          "fish fingers", "ice block", "icy pole", "zooper dooper", "frozen pies",
          "sausage rolls", "party pies", "dim sim", "spring rolls", "frozen berries",
          "frozen vegetables", "frozen peas", "frozen corn", "frozen meals", "ready meals",
          "frozen dessert", "waffles", "orchard & vine", "seasons pride", "earth grown"],
        &[r"frozen\s+", r"ice\s+cream", r"(mixed )?berries \d+g", r"blueberries \d+g",
          r"samosa|spring roll|dim sim", r"gratin \d+g", r"french fries|steakhouse fries|chips \d+kg",
          r"veggie burger|plant.based"],
        // Licensed-character "Frozen" merchandise and pizza-flavoured snacks
        &["toothbrush", "oral b", "oral-b", "spiderman", "disney",
          "shapes", "arnott", "crackers", "cracker", "vege chips",
          "frozen shoulder", "frozen moment"]),
    rule("snacks-confectionery",
        &["chocolate", "chips", "crisps", "lollies", "candy", "biscuit", "cookie", "cracker",
          "popcorn", "pretzels", "rice crackers", "muesli bar", "protein bar", "snack bar",
          "tim tam", "shapes", "twisties", "doritos", "pringles", "oreo", "m&m", "snickers",
          "mars", "twix", "kit kat", "cadbury", "nestle", "lindt", "gummy", "jelly", "licorice",
          "mints", "chewing gum", "5gum", "cheetos", "puffs", "burger rings", "cheezels",
          "in a biskit", "thins", "cc's", "grain waves", "kettle", "samboy", "arnott", "ferrero",
          "raffaello", "rocher", "kinder", "maltesers", "favourites", "forresters",
          "dominion naturals", "sweet vine"],
        &[r"cadbury\s+", r"nestle\s+", r"smith", r"red rock", r"snack", r"gift\s+box",
          r"natural (almonds?|cashews?|macadamia|walnut|pistachio)",
          r"(almonds?|cashews?|macadamias?) \d+g",
          r"dried (fig|apricot|mango|apple|cranberr|garland)",
          r"(cowboy|superfood|trail) mix",
          r"snakes|party mix|lollies",
          r"oat bar|protein.*pudding",
          r"bbq\s+(shapes|chips|flavour|flavor)", r"barbecue\s+(shapes|chips|flavour)",
          r"(arnott|shapes).*bbq"],
        &["roasted nuts", "salted nuts", "mixed nuts"]),
    rule("international",
        &["asian", "mexican", "italian", "indian", "thai", "chinese", "japanese", "korean",
          "vietnamese", "middle eastern", "greek", "taco", "burrito", "enchilada", "salsa",
          "curry paste", "satay", "teriyaki", "miso", "tofu", "tempeh", "wonton", "dumpling",
          "ramen", "udon", "soba", "rice paper", "fish sauce", "sriracha", "nongshim",
          "shin ramyun", "stir fry", "kimchi", "gochujang"],
        &[r"asian\s+", r"mexican\s+", r"indian\s+", r"stir\s+fry"],
        &[]),
    rule("liquor",
        &["craft beer", "pale ale", "dry gin", "spiced rum", "white rum", "dark rum", "vodka",
          "whisky", "whiskey", "tequila", "bourbon", "scotch", "brandy", "liqueur", "champagne",
          "prosecco", "sparkling wine", "apple cider", "lager", "stout", "port wine", "sherry",
          "vermouth", "aperol", "campari", "cabernet", "shiraz", "chardonnay", "merlot", "pinot",
          "sauvignon", "tempranillo", "rioja", "riesling", "moscato", "sangria", "jack daniel",
          "johnnie walker", "jim beam", "corona", "heineken", "carlton", "victoria bitter",
          "coopers", "xxxx gold", "-196"],
        &[r"\bbeer\b", r"\bwine\b", r"\bgin\b", r"\bale\b", r"\brum\b", r"\bcider\b",
          r"\bspirits?\b", r"\d+\s*ml.*alcohol", r"750\s*m(l|illilitre)", r"docg|vintage \d{4}"],
        &["ginger", "original", "vinegar", "cinnamon", "cumberland", "goldenvale", "oats",
          "porridge", "rice", "chips", "crackers", "biscuit", "maple", "whiting", "fish",
          "fillet"]),
    rule("beauty",
        &["makeup", "cosmetics", "foundation", "mascara", "lipstick", "eyeliner", "eyeshadow",
          "blush", "concealer", "primer", "nail polish", "perfume", "fragrance", "cologne",
          "moisturiser", "serum", "face mask", "cleanser", "toner", "sunscreen", "l'oreal",
          "loreal", "revitalift", "maybelline", "rimmel", "olay", "nivea face", "neutrogena",
          "garnier", "dove", "anti-wrinkle", "anti wrinkle", "skin care", "skincare"],
        &[r"beauty\s+", r"cosmetic", r"face\s+(cream|wash|scrub)"],
        &[]),
    rule("personal-care",
        &["shampoo", "conditioner", "soap", "body wash", "deodorant", "toothpaste", "toothbrush",
          "mouthwash", "razor", "shaving", "hair dye", "hair colour", "styling", "gel", "mousse",
          "hairspray", "lotion", "body lotion", "hand cream", "lip balm", "cotton", "feminine",
          "tampon", "pad", "sanitary", "prince", "nivea men"],
        &[r"shampoo\s+", r"body\s+wash", r"tooth",
          r"shave foam|blade.*cartridge|replacement cartridge"],
        &[]),
    rule("health",
        &["vitamin", "supplement", "panadol", "nurofen", "aspirin", "cold", "flu", "allergy",
          "hayfever", "bandage", "band-aid", "first aid", "pain relief", "antacid", "probiotic",
          "fish oil", "multivitamin", "protein powder", "collagen", "nature's way", "swisse",
          "blackmores", "cenovis", "ostelin", "vitagummie", "omega", "glucosamine", "magnesium",
          "zinc", "melatonin", "echinacea", "turmeric", "elderberry", "essential health"],
        &[r"vitamin\s+", r"supplement", r"pain\s+relief", r"\d+mg\s+tablet", r"electrolyte"],
        &[]),
    rule("cleaning-household",
        &["detergent", "laundry", "washing", "cleaning", "wipes", "bleach", "disinfectant",
          "air freshener", "surface spray", "bathroom", "kitchen", "floor", "glass cleaner",
          "stain remover", "fabric", "paper towel", "toilet paper", "tissues", "bin bags",
          "garbage", "dishwashing", "dish soap", "rinse aid", "dishwasher tablets", "sponge",
          "cloth", "mop", "broom", "gloves", "biozet", "omo", "cold power", "dynamo", "napisan",
          "vanish", "finish", "fairy", "morning fresh", "palmolive", "ajax", "dettol", "glen 20",
          "pine o cleen", "exit mould", "battery", "batteries", "duracell", "energizer",
          "light bulb", "blu tack", "adhesive", "tape", "marker", "pen", "stationery",
          "power force"],
        &[r"cleaning\s+", r"spray\s+", r"wipes", r"liquid\s+\d",
          r"mould away|oven cleaner|sandwich bag"],
        &[]),
    rule("baby",
        &["nappy", "nappies", "diaper", "formula", "baby food", "baby wipes", "baby wash",
          "baby shampoo", "baby lotion", "baby powder", "sippy cup", "bottle", "dummy",
          "pacifier", "teething", "huggies", "pampers", "aptamil", "s26", "karicare", "mamia"],
        &[r"baby\s+", r"infant", r"toddler", r"12\+ months"],
        &[]),
    rule("pet",
        &["dog food", "cat food", "pet food", "kitty litter", "cat litter", "dog treats",
          "cat treats", "pet treats", "flea", "tick", "worming", "pet shampoo", "bird seed",
          "fish food", "whiskas", "pedigree", "dine", "fancy feast", "royal canin", "advance",
          "black hawk", "optimum"],
        &[r"pet\s+food", r"dog\s+food", r"dog\s+treat", r"cat\s+food", r"cat\s+treat"],
        &["chewing gum", "5gum", "gum tropical", "gum peppermint", "gum spearmint"]),
];

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

fn compile(defs: &'static [RuleDef]) -> Vec<RuleSet> {
    defs.iter()
        .map(|def| RuleSet {
            slug: def.slug,
            keywords: def.keywords,
            patterns: def
                .patterns
                .iter()
                .map(|p| {
                    Regex::new(&format!("(?i){p}"))
                        .unwrap_or_else(|e| panic!("invalid pattern for {}: {e}", def.slug))
                })
                .collect(),
            exclude: def.exclude,
            priority: priority_for(def.slug),
        })
        .collect()
}

static LEAF_RULES: LazyLock<Vec<RuleSet>> = LazyLock::new(|| compile(LEAF_RULE_DEFS));
static PARENT_RULES: LazyLock<Vec<RuleSet>> = LazyLock::new(|| compile(PARENT_RULE_DEFS));
static DESCRIPTOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DESCRIPTOR_PATTERN_DEFS
        .iter()
        .map(|p| {
            Regex::new(&format!("(?i){p}"))
                .unwrap_or_else(|e| panic!("invalid descriptor pattern: {e}"))
        })
        .collect()
});

/// Compiled leaf (subcategory) rule sets, in definition order.
#[must_use]
pub fn leaf_rules() -> &'static [RuleSet] {
    &LEAF_RULES
}

/// Compiled parent (department) rule sets, in definition order.
#[must_use]
pub fn parent_rules() -> &'static [RuleSet] {
    &PARENT_RULES
}

/// Compiled descriptor-stripping patterns.
#[must_use]
pub fn descriptor_patterns() -> &'static [Regex] {
    &DESCRIPTOR_PATTERNS
}

/// Priority weight for a category slug; unknown slugs get the default.
#[must_use]
pub fn priority_for(slug: &str) -> i32 {
    CATEGORY_PRIORITY
        .iter()
        .find(|(s, _)| *s == slug)
        .map_or(DEFAULT_PRIORITY, |(_, p)| *p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        // Forces both LazyLocks; a bad pattern panics here rather than at
        // first classification in production.
        assert!(!leaf_rules().is_empty());
        assert!(!parent_rules().is_empty());
        assert!(!descriptor_patterns().is_empty());
    }

    #[test]
    fn priority_lookup_known_slug() {
        assert_eq!(priority_for("canned-food"), 90);
        assert_eq!(priority_for("sauces-condiments"), 40);
    }

    #[test]
    fn priority_lookup_unknown_slug_uses_default() {
        assert_eq!(priority_for("eggs"), DEFAULT_PRIORITY);
    }

    #[test]
    fn specific_types_outrank_descriptor_categories() {
        assert!(priority_for("canned-food") > priority_for("sauces-condiments"));
        assert!(priority_for("biscuits") > priority_for("sausages-bbq") - 20);
        assert!(priority_for("seafood") > priority_for("meat-seafood"));
    }

    #[test]
    fn rule_slugs_are_unique_within_each_table() {
        let mut seen = std::collections::HashSet::new();
        for r in leaf_rules() {
            assert!(seen.insert(r.slug), "duplicate leaf rule: {}", r.slug);
        }
        seen.clear();
        for r in parent_rules() {
            assert!(seen.insert(r.slug), "duplicate parent rule: {}", r.slug);
        }
    }
}
