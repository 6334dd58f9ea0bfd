#![forbid(unsafe_code)]

//! An in-memory city feature layer answering paged extent queries.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use recyclist::{DataProvider, Error, FetchError, FetchResult, PageQuery};

use crate::city::City;

const EMBEDDED: &str = include_str!("../assets/cities.json");

/// Cities sorted by object id, queried by offset, count and extent.
#[derive(Debug)]
pub struct CityLayer {
    cities: Vec<City>,
    latency: Duration,
    fail_every: u32,
    queries: AtomicU32,
}

impl CityLayer {
    /// Parse a JSON array of city features.
    pub fn from_json(json: &str) -> recyclist::Result<Self> {
        let mut cities: Vec<City> = serde_json::from_str(json)
            .map_err(|err| Error::Data(format!("invalid city data: {err}")))?;
        cities.sort_by_key(|city| city.objectid);
        tracing::debug!(features = cities.len(), "city layer loaded");
        Ok(Self {
            cities,
            latency: Duration::ZERO,
            fail_every: 0,
            queries: AtomicU32::new(0),
        })
    }

    /// The layer bundled with the demo.
    pub fn embedded() -> recyclist::Result<Self> {
        Self::from_json(EMBEDDED)
    }

    /// Simulated round-trip time per query.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every `n`-th query with [`FetchError::Unavailable`]; 0 disables.
    #[must_use]
    pub fn with_fail_every(mut self, n: u32) -> Self {
        self.fail_every = n;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Queries answered or failed so far.
    #[must_use]
    pub fn query_count(&self) -> u32 {
        self.queries.load(Ordering::Relaxed)
    }

    /// City by object id.
    #[must_use]
    pub fn feature(&self, objectid: u32) -> Option<&City> {
        self.cities
            .binary_search_by_key(&objectid, |city| city.objectid)
            .ok()
            .and_then(|pos| self.cities.get(pos))
    }
}

impl DataProvider<City> for CityLayer {
    fn fetch(&self, query: &PageQuery) -> FetchResult<Vec<City>> {
        let n = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        if self.fail_every > 0 && n % self.fail_every == 0 {
            return Err(FetchError::Unavailable(format!("query {n} dropped")));
        }
        if query.page_size == 0 {
            return Err(FetchError::InvalidQuery("page size must be positive".into()));
        }
        if let Some(extent) = query.filter
            && (extent.xmin.is_nan() || extent.ymin.is_nan())
        {
            return Err(FetchError::InvalidQuery("extent has NaN edges".into()));
        }

        let page: Vec<City> = self
            .cities
            .iter()
            .filter(|city| {
                query
                    .filter
                    .is_none_or(|extent| extent.contains(city.location()))
            })
            .skip(query.start)
            .take(query.page_size)
            .cloned()
            .collect();
        tracing::trace!(start = query.start, returned = page.len(), "layer query");
        Ok(page)
    }
}
