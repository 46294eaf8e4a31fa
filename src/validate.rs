// Named-pattern validation for untrusted string fields.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Registry of named validation patterns. Adding a field constraint means
/// adding one entry here and referencing it by name at the call site.
static PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    let mut patterns = HashMap::new();
    // English letters, digits, '-' and '_', 1..=15 chars, leading alphanumeric.
    patterns.insert(
        "name_en_15",
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,14}$").expect("valid name_en_15 pattern"),
    );
    patterns
});

/// Check `value` against the named pattern. Unknown pattern names reject.
pub fn matches(pattern_name: &str, value: &str) -> bool {
    PATTERNS
        .get(pattern_name)
        .is_some_and(|re| re.is_match(value))
}

/// Site names use the `name_en_15` constraint.
pub fn site_name_is_valid(name: &str) -> bool {
    matches("name_en_15", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_site_names() {
        for name in ["PlantA", "plant-1", "a", "Site_15_chars_x", "X9"] {
            assert!(site_name_is_valid(name), "expected {name:?} to validate");
        }
    }

    #[test]
    fn rejects_out_of_pattern_names() {
        for name in [
            "",
            " PlantA",
            "Plant A",
            "-leading-dash",
            "_leading_underscore",
            "sixteen-chars-ab",
            "植物",
            "plant!",
        ] {
            assert!(!site_name_is_valid(name), "expected {name:?} to be rejected");
        }
    }

    #[test]
    fn unknown_pattern_rejects() {
        assert!(!matches("no_such_pattern", "anything"));
    }
}
