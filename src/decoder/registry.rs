use std::collections::HashSet;
use std::sync::Arc;

use alloy_primitives::Address;
use arc_swap::ArcSwap;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::settings::RegistrySettings;

/// Key under which the persisted address cache records its freshness.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheType {
    AerodromePoolAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolsAndGauges {
    pub pools: HashSet<Address>,
    pub gauges: HashSet<Address>,
}

/// Remote query and local persistence of the pool/gauge address sets.
pub trait AddressSource: Send + Sync {
    /// When the persisted cache was last filled from a remote query.
    fn last_queried(&self, cache: CacheType) -> Result<Option<DateTime<Utc>>, Error>;

    fn query(&self) -> Result<PoolsAndGauges, Error>;

    fn save(&self, data: &PoolsAndGauges) -> Result<(), Error>;

    fn read_cache(&self) -> Result<PoolsAndGauges, Error>;
}

/// Immutable view of the registered addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSnapshot {
    pub pools: HashSet<Address>,
    pub gauges: HashSet<Address>,
    /// Pools plus the router: every address a swap leg may point at.
    pub protocol_addresses: HashSet<Address>,
}

impl AddressSnapshot {
    pub fn new(data: PoolsAndGauges, router: Address) -> Self {
        let mut protocol_addresses = data.pools.clone();
        protocol_addresses.insert(router);
        Self {
            pools: data.pools,
            gauges: data.gauges,
            protocol_addresses,
        }
    }

    pub fn is_pool(&self, address: &Address) -> bool {
        self.pools.contains(address)
    }

    pub fn is_gauge(&self, address: &Address) -> bool {
        self.gauges.contains(address)
    }
}

pub struct AddressRegistry<S> {
    source: S,
    cache_type: CacheType,
    router: Address,
    refresh_interval: Duration,
    snapshot: ArcSwap<AddressSnapshot>,
    /// Serializes refreshes and remembers the last one done by this process.
    last_refresh: Mutex<Option<DateTime<Utc>>>,
}

impl<S: AddressSource> AddressRegistry<S> {
    /// Builds the registry from the persisted cache without querying remotely.
    pub fn new(source: S, router: Address, settings: &RegistrySettings) -> Result<Self, Error> {
        let cached = source.read_cache()?;
        tracing::debug!(
            pools = cached.pools.len(),
            gauges = cached.gauges.len(),
            "loaded address cache"
        );
        Ok(Self {
            source,
            cache_type: settings.cache_type,
            router,
            refresh_interval: settings.refresh_interval(),
            snapshot: ArcSwap::from_pointee(AddressSnapshot::new(cached, router)),
            last_refresh: Mutex::new(None),
        })
    }

    pub fn snapshot(&self) -> Arc<AddressSnapshot> {
        self.snapshot.load_full()
    }

    /// Current `(pools, gauges)`.
    pub fn addresses(&self) -> (HashSet<Address>, HashSet<Address>) {
        let snapshot = self.snapshot.load();
        (snapshot.pools.clone(), snapshot.gauges.clone())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn is_stale_at(
        &self,
        last_refresh: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<bool, Error> {
        let persisted = self.source.last_queried(self.cache_type)?;
        let latest = persisted.max(last_refresh);
        Ok(latest.is_none_or(|at| now.signed_duration_since(at) > self.refresh_interval))
    }

    pub fn ensure_fresh(&self) -> Result<bool, Error> {
        self.ensure_fresh_at(Utc::now())
    }

    /// Refreshes the address sets if the cache is stale at `now`.
    ///
    /// Stale: query remotely, persist, then swap the new sets in as one unit.
    /// Fresh with nothing in memory: load the persisted cache. Otherwise no-op.
    /// Returns whether the in-memory sets changed. Query errors propagate and
    /// leave the current sets in place.
    pub fn ensure_fresh_at(&self, now: DateTime<Utc>) -> Result<bool, Error> {
        let mut last_refresh = self.last_refresh.lock();

        if self.is_stale_at(*last_refresh, now)? {
            tracing::debug!(cache = %self.cache_type, "address cache is stale, querying");
            let data = self.source.query()?;
            self.source.save(&data)?;
            *last_refresh = Some(now);
            self.store(data);
            return Ok(true);
        }

        if !self.snapshot.load().pools.is_empty() {
            return Ok(false);
        }

        let cached = self.source.read_cache()?;
        let current = self.snapshot.load();
        if cached.pools == current.pools && cached.gauges == current.gauges {
            return Ok(false);
        }
        self.store(cached);
        Ok(true)
    }

    fn store(&self, data: PoolsAndGauges) {
        tracing::debug!(
            cache = %self.cache_type,
            pools = data.pools.len(),
            gauges = data.gauges.len(),
            "replacing address sets"
        );
        self.snapshot.store(Arc::new(AddressSnapshot::new(data, self.router)));
    }
}
