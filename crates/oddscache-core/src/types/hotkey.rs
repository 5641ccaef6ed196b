//! Hot-key record: the demand signal driving the odds tier (spec §3, §4.3).

use serde::{Deserialize, Serialize};

/// Default sport id used when a legacy record carries no metadata (spec §4.3).
pub const DEFAULT_SPORT_ID: &str = "unknown";

/// Metadata carried alongside a hot-key mark. At minimum the sport id needed
/// to re-address the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotKeyMetadata {
    #[serde(default = "default_sport")]
    pub sport_id: String,
}

fn default_sport() -> String {
    DEFAULT_SPORT_ID.to_string()
}

impl HotKeyMetadata {
    pub fn new(sport_id: impl Into<String>) -> Self {
        Self {
            sport_id: sport_id.into(),
        }
    }
}

impl Default for HotKeyMetadata {
    fn default() -> Self {
        Self {
            sport_id: default_sport(),
        }
    }
}

/// A live hot-key entry as returned by `HotKeyRegistry::list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotKeyRecord {
    pub id: String,
    pub metadata: HotKeyMetadata,
}
