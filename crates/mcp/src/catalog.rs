//! Static option lists for server and site creation, plus helpers that
//! narrow Forge's `/regions` payload.

use serde::Serialize;
use serde_json::{Value, json};

/// One selectable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogOption {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

const fn option(id: &'static str, name: &'static str) -> CatalogOption {
    CatalogOption { id, name, default: None }
}

const fn choice(id: &'static str, name: &'static str, default: bool) -> CatalogOption {
    CatalogOption {
        id,
        name,
        default: Some(default),
    }
}

pub const PROVIDERS: &[CatalogOption] = &[
    option("ocean2", "Digital Ocean"),
    option("akamai", "Linode (Akamai)"),
    option("vultr2", "Vultr"),
    option("aws", "AWS"),
    option("hetzner", "Hetzner"),
    option("custom", "Custom"),
];

pub const DATABASE_TYPES: &[CatalogOption] = &[
    option("mysql8", "MySQL 8"),
    option("mariadb106", "MariaDB 10.6"),
    option("mariadb1011", "MariaDB 10.11"),
    option("mariadb114", "MariaDB 11.4"),
    option("postgres", "PostgreSQL (latest)"),
    option("postgres13", "PostgreSQL 13"),
    option("postgres14", "PostgreSQL 14"),
    option("postgres15", "PostgreSQL 15"),
    option("postgres16", "PostgreSQL 16"),
    option("postgres17", "PostgreSQL 17"),
];

pub const UBUNTU_VERSIONS: &[CatalogOption] = &[
    choice("24.04", "Ubuntu 24.04 LTS (Noble Numbat)", true),
    choice("22.04", "Ubuntu 22.04 LTS (Jammy Jellyfish)", false),
    choice("20.04", "Ubuntu 20.04 LTS (Focal Fossa)", false),
];

pub const STATIC_PHP_VERSIONS: &[CatalogOption] = &[
    choice("php84", "PHP 8.4", true),
    choice("php83", "PHP 8.3", false),
    choice("php82", "PHP 8.2", false),
    choice("php81", "PHP 8.1", false),
    choice("php80", "PHP 8.0", false),
    choice("php74", "PHP 7.4", false),
    choice("php73", "PHP 7.3", false),
    choice("php72", "PHP 7.2", false),
    choice("php70", "PHP 7.0", false),
    choice("php56", "PHP 5.6", false),
];

pub const PROJECT_TYPES: &[CatalogOption] = &[
    choice("php", "PHP / Laravel / Symfony", true),
    choice("html", "Static HTML / Nuxt.js / Next.js", false),
];

/// Regions Forge offers for one provider. Unknown providers yield an empty list.
pub fn regions_for(regions: &Value, provider: &str) -> Value {
    let list = regions
        .pointer(&format!("/regions/{provider}"))
        .filter(|value| value.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));
    json!({ "regions": list, "allowCustom": true })
}

/// Sizes available in one region of one provider.
pub fn sizes_for(regions: &Value, provider: &str, region: &str) -> Value {
    let sizes = regions
        .pointer(&format!("/regions/{provider}"))
        .and_then(Value::as_array)
        .and_then(|list| list.iter().find(|entry| entry["id"] == region))
        .and_then(|entry| entry.get("sizes"))
        .filter(|value| value.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));
    json!({ "sizes": sizes, "allowCustom": true })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> Value {
        json!({
            "regions": {
                "ocean2": [
                    {"id": "fra1", "name": "Frankfurt", "sizes": [{"id": "s-1vcpu-1gb"}]},
                    {"id": "ams3", "name": "Amsterdam", "sizes": []}
                ]
            }
        })
    }

    #[test]
    fn exactly_one_default_per_choice_list() {
        for list in [UBUNTU_VERSIONS, STATIC_PHP_VERSIONS, PROJECT_TYPES] {
            let defaults = list.iter().filter(|option| option.default == Some(true)).count();
            assert_eq!(defaults, 1);
        }
    }

    #[test]
    fn plain_options_omit_the_default_flag() {
        let rendered = serde_json::to_value(PROVIDERS[0]).unwrap();
        assert_eq!(rendered, json!({"id": "ocean2", "name": "Digital Ocean"}));
    }

    #[test]
    fn regions_are_filtered_by_provider() {
        let filtered = regions_for(&regions(), "ocean2");
        assert_eq!(filtered["regions"].as_array().unwrap().len(), 2);
        assert_eq!(filtered["allowCustom"], true);
        assert_eq!(regions_for(&regions(), "vultr2")["regions"], json!([]));
    }

    #[test]
    fn sizes_come_from_the_matching_region() {
        let sizes = sizes_for(&regions(), "ocean2", "fra1");
        assert_eq!(sizes["sizes"], json!([{"id": "s-1vcpu-1gb"}]));
        assert_eq!(sizes_for(&regions(), "ocean2", "nyc1")["sizes"], json!([]));
    }
}
