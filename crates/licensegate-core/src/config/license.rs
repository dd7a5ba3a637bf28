//! License issuance configuration.

use serde::{Deserialize, Serialize};

/// License issuance and seeding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Namespace tag prepended to generated keys (`{prefix}-{hex}`).
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Limit assigned when a license is created without one.
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    /// Whether default licenses are seeded at startup.
    #[serde(default = "default_true")]
    pub seed_on_startup: bool,
    /// Licenses inserted at startup if absent.
    #[serde(default = "default_seed")]
    pub seed: Vec<SeedLicense>,
}

/// A license inserted at startup when no record with its key exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedLicense {
    /// License key.
    pub key: String,
    /// Whether the license starts active.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Lifetime usage ceiling.
    pub limit: i64,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            default_limit: default_limit(),
            seed_on_startup: true,
            seed: default_seed(),
        }
    }
}

fn default_key_prefix() -> String {
    "lgk".to_string()
}

fn default_limit() -> i64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_seed() -> Vec<SeedLicense> {
    vec![
        SeedLicense {
            key: "lgk-demo-key".to_string(),
            active: true,
            limit: 1000,
        },
        SeedLicense {
            key: "lgk-test-key".to_string(),
            active: true,
            limit: 100,
        },
        SeedLicense {
            key: "lgk-disabled-key".to_string(),
            active: false,
            limit: 0,
        },
    ]
}
