//! Data model types shared across the edge cache (spec §3).

mod entry;
mod hotkey;
mod tier;
mod work_item;

pub use entry::CacheEntry;
pub use hotkey::{HotKeyMetadata, HotKeyRecord, DEFAULT_SPORT_ID};
pub use tier::{tier, TierDescriptor, TierId, TIERS};
pub use work_item::WorkItem;
