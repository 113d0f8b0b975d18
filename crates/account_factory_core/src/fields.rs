//! Pure format checks for individual account-request fields.
//!
//! These functions never touch the network; duplicate-email and live-OU
//! checks live in [`crate::validate`] on top of fetched snapshots.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const REQUIRED_CUSTOM_FIELDS: [&str; 3] = ["environment", "cost_center", "project"];
pub const REQUIRED_ACCOUNT_TAGS: [&str; 3] = ["Environment", "CostCenter", "Project"];

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern should compile")
});

static ACCOUNT_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-_]+$").expect("account name pattern should compile"));

static OU_PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-_/]+$").expect("OU path pattern should compile"));

/// ASCII `local@domain.tld` shape with a two-letter-plus TLD. No DNS or
/// mailbox verification.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_account_name(account_name: &str) -> bool {
    ACCOUNT_NAME_PATTERN.is_match(account_name)
}

/// Format-only OU check, used when no live OU snapshot is available.
pub fn is_valid_ou_path(ou_path: &str) -> bool {
    OU_PATH_PATTERN.is_match(ou_path)
}

pub fn has_required_custom_fields(custom_fields: &BTreeMap<String, Value>) -> bool {
    REQUIRED_CUSTOM_FIELDS
        .iter()
        .all(|field| custom_fields.contains_key(*field))
}

pub fn has_required_account_tags(account_tags: &BTreeMap<String, String>) -> bool {
    REQUIRED_ACCOUNT_TAGS
        .iter()
        .all(|tag| account_tags.contains_key(*tag))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_plain_and_tagged_addresses() {
        assert!(is_valid_email("ops@example.com"));
        assert!(is_valid_email("team+sandbox_01@sub.example.io"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("user@example.com extra"));
    }

    #[test]
    fn account_name_allows_word_characters_and_hyphens_only() {
        assert!(is_valid_account_name("workload-prod_01"));
        assert!(!is_valid_account_name(""));
        assert!(!is_valid_account_name("has space"));
        assert!(!is_valid_account_name("slash/not-allowed"));
    }

    #[test]
    fn ou_path_additionally_allows_slashes() {
        assert!(is_valid_ou_path("Workloads/Prod"));
        assert!(is_valid_ou_path("ou-abcd-11111111"));
        assert!(!is_valid_ou_path(""));
        assert!(!is_valid_ou_path("bad path"));
    }

    #[test]
    fn required_custom_fields_must_all_be_present() {
        let complete = BTreeMap::from([
            ("environment".to_string(), json!("prod")),
            ("cost_center".to_string(), json!("cc-42")),
            ("project".to_string(), json!("atlas")),
        ]);
        assert!(has_required_custom_fields(&complete));

        let mut missing = complete.clone();
        missing.remove("cost_center");
        assert!(!has_required_custom_fields(&missing));
        assert!(!has_required_custom_fields(&BTreeMap::new()));
    }

    #[test]
    fn required_account_tags_must_all_be_present() {
        let complete = BTreeMap::from([
            ("Environment".to_string(), "prod".to_string()),
            ("CostCenter".to_string(), "cc-42".to_string()),
            ("Project".to_string(), "atlas".to_string()),
        ]);
        assert!(has_required_account_tags(&complete));

        let lowercase_keys = BTreeMap::from([
            ("environment".to_string(), "prod".to_string()),
            ("costcenter".to_string(), "cc-42".to_string()),
            ("project".to_string(), "atlas".to_string()),
        ]);
        assert!(!has_required_account_tags(&lowercase_keys));
    }
}
