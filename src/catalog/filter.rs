/// Food groups that never make it into the catalog.
const EXCLUDED_GROUPS: &[&str] = &[
    "0300", // baby foods
    "0800", // breakfast cereals
    "1400", // beverages
    "2100", // fast foods
    "3600", // restaurant foods
];

/// Matched against the description as-is.
const EXCLUDED_PHRASES: &[&str] = &[
    "Lemonade",
    "Ice cream",
    "dehydrated flakes",
    "Alcoholic beverage",
    "freeze-dried",
    "Celery flakes",
    "dehydrated",
    "Candies",
    "Tea,",
    // manufactured, likely to contain additives
    "surimi",
    "MORNINGSTAR",
    "Meat extender",
    "with low-calorie sweeteners",
    "instant breakfast powder",
    "Orange-flavor drink",
    "Fruit-flavored drink",
    "Leavening agents",
    "Reddi Wip",
    "Frozen novelties",
    // added nutrients
    "Formulated bar,",
    "Soy protein isolate",
    "Soy protein concentrate",
    "PAM cooking spray",
    "Seal,",
    // access
    "Egg Mix, USDA Commodity",
    "Game meat",
    "Butterbur, canned",
    // cost
    "Spices,",
];

/// Matched against the lowercased description.
const EXCLUDED_PHRASES_CI: &[&str] = &[
    // meat
    "beef,",
    "pork,",
    "pork skins,",
    "chicken,",
    "smelt,",
    "salmon,",
    "fish,",
    "mutton,",
    "turkey,",
    "trout,",
    "lamb,",
    "caribou,",
    " meat,",
    // manufactured
    "liver cheese,",
    "big franks,",
    // added nutrients
    " acid,",
    " added ",
    " supplement",
    " fortified",
    " seal,",
    "mollusks",
    // organ meats
    " brain",
    " liver ",
    " liver,",
    " kidney",
    " lungs,",
    " chitterlings",
    " intestine",
    // high-mercury fish
    " mackerel,",
    " marlin,",
    " orange roughy,",
    " shark,",
    " swordfish,",
    " tilefish,",
    " tuna,",
    " bluefish,",
    " grouper,",
    " sea bass",
    " bass,",
    " carp,",
    " cod,",
    " croaker,",
    " halibut,",
    " jacksmelt,",
    " lobster,",
    " mahi mahi,",
    " monkfish,",
    " perch,",
    " sablefish,",
    " skate,",
    " snapper,",
    " weakfish,",
    " whale,",
];

const EXCLUDED_MANUFACTURERS: &[&str] = &["Campbell Soup Co."];

/// Exclusion rules applied to food descriptions during import.
#[derive(Debug, Clone)]
pub struct FoodFilter {
    pub groups: Vec<String>,
    pub phrases: Vec<String>,
    /// Stored lowercase.
    pub phrases_ci: Vec<String>,
    pub manufacturers: Vec<String>,
}

impl Default for FoodFilter {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            groups: owned(EXCLUDED_GROUPS),
            phrases: owned(EXCLUDED_PHRASES),
            phrases_ci: EXCLUDED_PHRASES_CI.iter().map(|s| s.to_lowercase()).collect(),
            manufacturers: owned(EXCLUDED_MANUFACTURERS),
        }
    }
}

impl FoodFilter {
    /// A filter that keeps everything.
    pub fn permissive() -> Self {
        Self {
            groups: Vec::new(),
            phrases: Vec::new(),
            phrases_ci: Vec::new(),
            manufacturers: Vec::new(),
        }
    }

    /// Check whether a food should be dropped.
    pub fn excludes(&self, group: &str, description: &str, manufacturer: &str) -> bool {
        if self.groups.iter().any(|g| g == group) {
            return true;
        }
        if self.manufacturers.iter().any(|m| m == manufacturer) {
            return true;
        }
        if self.phrases.iter().any(|p| description.contains(p.as_str())) {
            return true;
        }

        let lower = description.to_lowercase();
        self.phrases_ci.iter().any(|p| lower.contains(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_group() {
        let filter = FoodFilter::default();
        assert!(filter.excludes("1400", "Water, bottled", ""));
        assert!(!filter.excludes("1100", "Spinach, raw", ""));
    }

    #[test]
    fn test_case_sensitive_phrase() {
        let filter = FoodFilter::default();
        assert!(filter.excludes("1900", "Candies, milk chocolate", ""));
        // "Spices," is case sensitive; a lowercase match is not a spice entry
        assert!(!filter.excludes("1100", "Peppers, spices, raw", ""));
    }

    #[test]
    fn test_case_insensitive_phrase() {
        let filter = FoodFilter::default();
        assert!(filter.excludes("1500", "Fish, Tuna, light, canned", ""));
        assert!(filter.excludes("1300", "Beef, ground, raw", ""));
        assert!(!filter.excludes("1600", "Beans, black, mature seeds, raw", ""));
    }

    #[test]
    fn test_manufacturer() {
        let filter = FoodFilter::default();
        assert!(filter.excludes("0600", "Soup, tomato", "Campbell Soup Co."));
    }

    #[test]
    fn test_permissive_keeps_all() {
        let filter = FoodFilter::permissive();
        assert!(!filter.excludes("1400", "Beef, Tea, Candies", "Campbell Soup Co."));
    }
}
