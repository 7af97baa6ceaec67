//! Asynchronous client for the reference data behind the calculator form.
//!
//! - Countries and exchange rates come from public JSON endpoints.
//! - HS codes walk the configured source chain (see [`super::hs_codes`]).
//! - Results are kept in a session cache; a failed refresh serves stale data.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use time::format_description::well_known::{Iso8601, Rfc2822};
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::config::ReferenceConfig;
#[cfg(not(target_arch = "wasm32"))]
use super::config::USER_AGENT;
use super::hs_codes::{load_chain, HsCodeLoad};
use crate::domain::{Country, RateTable, BASE_CURRENCY};
use crate::util::elapsed_since;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected payload: {0}")]
    Decode(String),
    #[error("{0} returned no entries")]
    Empty(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: OffsetDateTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: OffsetDateTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

/// Rate table plus the publication date reported by the provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeRates {
    pub table: RateTable,
    pub as_of: Option<Date>,
}

#[derive(Default)]
struct ReferenceCache {
    countries: Option<Cached<Vec<Country>>>,
    rates: Option<Cached<ExchangeRates>>,
    hs_codes: Option<Cached<HsCodeLoad>>,
}

impl ReferenceCache {
    fn clear(&mut self) {
        self.countries = None;
        self.rates = None;
        self.hs_codes = None;
    }
}

#[derive(Clone)]
pub struct ReferenceClient {
    http: Client,
    config: Arc<ReferenceConfig>,
    cache: Arc<Mutex<ReferenceCache>>,
}

impl ReferenceClient {
    pub fn new() -> Result<Self, ReferenceError> {
        Self::with_config(ReferenceConfig::new()?)
    }

    pub fn with_config(config: ReferenceConfig) -> Result<Self, ReferenceError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.user_agent(USER_AGENT);
        let http = builder.build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(ReferenceCache::default())),
        })
    }

    pub fn config(&self) -> &ReferenceConfig {
        &self.config
    }

    pub async fn get_countries(&self) -> Result<CachedPayload<Vec<Country>>, ReferenceError> {
        if let Some(payload) = self.cache_lookup(|cache| cache.countries.as_ref()).await {
            return Ok(payload);
        }

        match self.fetch_countries().await {
            Ok(countries) => {
                info!(count = countries.len(), "loaded countries");
                let fetched_at = OffsetDateTime::now_utc();
                self.cache.lock().await.countries = Some(Cached::new(countries.clone(), fetched_at));
                Ok(CachedPayload::new(countries, fetched_at, CacheStatus::Fresh))
            }
            Err(err) => {
                warn!(error = %err, "country fetch failed");
                let cache = self.cache.lock().await;
                let stale = cache.countries.as_ref().map(Cached::stale);
                stale.ok_or(err)
            }
        }
    }

    pub async fn get_exchange_rates(&self) -> Result<CachedPayload<ExchangeRates>, ReferenceError> {
        if let Some(payload) = self.cache_lookup(|cache| cache.rates.as_ref()).await {
            return Ok(payload);
        }

        match self.fetch_exchange_rates().await {
            Ok(rates) => {
                info!(
                    count = rates.table.len(),
                    base = rates.table.base(),
                    as_of = ?rates.as_of,
                    "loaded exchange rates"
                );
                let fetched_at = OffsetDateTime::now_utc();
                self.cache.lock().await.rates = Some(Cached::new(rates.clone(), fetched_at));
                Ok(CachedPayload::new(rates, fetched_at, CacheStatus::Fresh))
            }
            Err(err) => {
                warn!(error = %err, "exchange rate fetch failed");
                let cache = self.cache.lock().await;
                let stale = cache.rates.as_ref().map(Cached::stale);
                stale.ok_or(err)
            }
        }
    }

    /// Walk the HS code chain. Never fails: the built-in list ends every chain.
    pub async fn get_hs_codes(&self) -> CachedPayload<HsCodeLoad> {
        if let Some(payload) = self.cache_lookup(|cache| cache.hs_codes.as_ref()).await {
            return payload;
        }

        let load = load_chain(&self.http, &self.config.hs_code_sources).await;
        let fetched_at = OffsetDateTime::now_utc();
        // Only cache real data so the remote sources get retried next time.
        if !load.is_fallback() {
            self.cache.lock().await.hs_codes = Some(Cached::new(load.clone(), fetched_at));
        }
        CachedPayload::new(load, fetched_at, CacheStatus::Fresh)
    }

    pub async fn clear_cache(&self) {
        debug!("clearing reference cache");
        self.cache.lock().await.clear();
    }

    async fn fetch_countries(&self) -> Result<Vec<Country>, ReferenceError> {
        let body = fetch_text(&self.http, self.config.countries_url.clone()).await?;
        let countries = parse_countries(&body)?;
        if countries.is_empty() {
            return Err(ReferenceError::Empty("country list"));
        }
        Ok(countries)
    }

    async fn fetch_exchange_rates(&self) -> Result<ExchangeRates, ReferenceError> {
        let body = fetch_text(&self.http, self.config.rates_url.clone()).await?;
        parse_exchange_rates(&body)
    }

    async fn cache_lookup<T, F>(&self, select: F) -> Option<CachedPayload<T>>
    where
        T: Clone,
        F: FnOnce(&ReferenceCache) -> Option<&Cached<T>>,
    {
        let cache = self.cache.lock().await;
        select(&*cache).and_then(|entry| entry.if_fresh(self.config.ttl))
    }
}

struct Cached<T> {
    value: T,
    fetched_at: OffsetDateTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: OffsetDateTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        (elapsed_since(self.fetched_at) <= ttl).then(|| {
            CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Cached)
        })
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

pub(crate) async fn fetch_text(http: &Client, url: Url) -> Result<String, ReferenceError> {
    debug!(%url, "requesting reference data");
    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

#[derive(Debug, Deserialize)]
struct CountryDto {
    #[serde(default)]
    name: Option<CountryNameDto>,
    #[serde(default)]
    cca2: Option<String>,
    #[serde(default)]
    currencies: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    flags: Option<FlagsDto>,
}

#[derive(Debug, Deserialize)]
struct CountryNameDto {
    common: String,
}

#[derive(Debug, Deserialize)]
struct FlagsDto {
    #[serde(default)]
    svg: Option<String>,
}

impl CountryDto {
    fn into_country(self) -> Option<Country> {
        let name = self.name?.common;
        let code = self.cca2?;
        if name.trim().is_empty() || code.trim().is_empty() {
            return None;
        }
        Some(Country {
            name,
            code,
            currency: self
                .currencies
                .and_then(|map| map.keys().next().cloned())
                .unwrap_or_default(),
            flag: self.flags.and_then(|flags| flags.svg).unwrap_or_default(),
        })
    }
}

/// Countries sorted by name; entries without a name or code are dropped.
pub fn parse_countries(body: &str) -> Result<Vec<Country>, ReferenceError> {
    let entries: Vec<CountryDto> = serde_json::from_str(body)?;
    let mut countries: Vec<Country> = entries
        .into_iter()
        .filter_map(CountryDto::into_country)
        .collect();
    countries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(countries)
}

#[derive(Debug, Deserialize)]
struct RatesDto {
    rates: BTreeMap<String, serde_json::Value>,
    #[serde(default, alias = "base_code")]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time_last_update_utc: Option<String>,
}

/// Parse a `{ "rates": { code: rate } }` payload.
///
/// Non-numeric rates are skipped. The base defaults to USD and is added at
/// 1.0 when the provider leaves it out of the map.
pub fn parse_exchange_rates(body: &str) -> Result<ExchangeRates, ReferenceError> {
    let dto: RatesDto = serde_json::from_str(body)?;
    let base = dto
        .base
        .map(|code| code.trim().to_ascii_uppercase())
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| BASE_CURRENCY.to_string());

    let mut table = RateTable::new(
        base.clone(),
        dto.rates.into_iter().filter_map(|(code, value)| {
            value
                .as_f64()
                .filter(|rate| rate.is_finite() && *rate > 0.0)
                .map(|rate| (code.to_ascii_uppercase(), rate))
        }),
    );
    if table.is_empty() {
        return Err(ReferenceError::Empty("exchange rate table"));
    }
    if !table.contains(&base) {
        table.insert(base, 1.0);
    }

    let as_of = dto
        .date
        .as_deref()
        .and_then(|raw| Date::parse(raw, &Iso8601::DATE).ok())
        .or_else(|| {
            dto.time_last_update_utc
                .as_deref()
                .and_then(|raw| OffsetDateTime::parse(raw, &Rfc2822).ok())
                .map(|dt| dt.date())
        });

    Ok(ExchangeRates { table, as_of })
}
