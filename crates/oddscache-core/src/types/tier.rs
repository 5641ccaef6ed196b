//! Tier descriptors: the seven recognized refresh classes (spec §3).

use std::time::Duration;

/// Identity of a refresh tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TierId {
    Bootstrap,
    MatchList,
    TopEvents,
    Banners,
    Sidebar,
    Odds,
    OnDemand,
}

impl TierId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierId::Bootstrap => "bootstrap",
            TierId::MatchList => "matchList",
            TierId::TopEvents => "topEvents",
            TierId::Banners => "banners",
            TierId::Sidebar => "sidebar",
            TierId::Odds => "odds",
            TierId::OnDemand => "onDemand",
        }
    }
}

/// A tier's refresh cadence and cache lifetime. `interval` is `None` for
/// tiers that are never timer-driven (`bootstrap` fires once at start,
/// `onDemand` only on request).
#[derive(Debug, Clone, Copy)]
pub struct TierDescriptor {
    pub id: TierId,
    pub interval: Option<Duration>,
    pub cache_ttl: Duration,
}

/// Defaults from spec §3's tier table.
pub const TIERS: &[TierDescriptor] = &[
    TierDescriptor {
        id: TierId::Bootstrap,
        interval: None,
        cache_ttl: Duration::from_secs(86_400),
    },
    TierDescriptor {
        id: TierId::MatchList,
        interval: Some(Duration::from_secs(60)),
        cache_ttl: Duration::from_secs(120),
    },
    TierDescriptor {
        id: TierId::TopEvents,
        interval: Some(Duration::from_secs(3_600)),
        cache_ttl: Duration::from_secs(7_200),
    },
    TierDescriptor {
        id: TierId::Banners,
        interval: Some(Duration::from_secs(3_600)),
        cache_ttl: Duration::from_secs(7_200),
    },
    TierDescriptor {
        id: TierId::Sidebar,
        interval: Some(Duration::from_secs(86_400)),
        cache_ttl: Duration::from_secs(172_800),
    },
    TierDescriptor {
        id: TierId::Odds,
        interval: Some(Duration::from_secs(1)),
        cache_ttl: Duration::from_secs(2),
    },
    TierDescriptor {
        id: TierId::OnDemand,
        interval: None,
        cache_ttl: Duration::from_secs(86_400),
    },
];

pub fn tier(id: TierId) -> &'static TierDescriptor {
    TIERS
        .iter()
        .find(|t| t.id == id)
        .expect("TIERS table covers every TierId variant")
}
