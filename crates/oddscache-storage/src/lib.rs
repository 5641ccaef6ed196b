//! oddscache-storage: `CacheStore` implementations (spec §4.1, §9).
//!
//! The in-memory backend is the only one with stale-while-revalidate;
//! the external backend degrades to TTL-only (`supports_swr() == false`).

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::{MemoryCacheStore, MemoryConfig};

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "redis")]
pub use redis::{RedisCacheStore, RedisConfig};

#[cfg(feature = "memory")]
pub mod factory;

#[cfg(feature = "memory")]
pub use factory::build_store;
