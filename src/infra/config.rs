//! Endpoints and cache settings for the reference-data client.

use std::time::Duration;

use url::Url;

use super::hs_codes::HsCodeSource;
use super::reference::ReferenceError;

pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v3.1/all?fields=name,cca2,currencies,flags";
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";
pub const DEFAULT_HS_CODES_URL: &str =
    "https://raw.githubusercontent.com/datasets/harmonized-system/main/data/harmonized-system.csv";
pub const DEFAULT_HS_SECTIONS_URL: &str =
    "https://raw.githubusercontent.com/datasets/harmonized-system/main/data/sections.csv";

/// Reference lists only change between sessions, so one fetch per hour is plenty.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);
pub const USER_AGENT: &str = concat!("tariff-calculator/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct ReferenceConfig {
    pub countries_url: Url,
    pub rates_url: Url,
    /// Tried in order; the built-in list backs the last one.
    pub hs_code_sources: Vec<HsCodeSource>,
    pub ttl: Duration,
}

impl ReferenceConfig {
    pub fn new() -> Result<Self, ReferenceError> {
        Ok(Self {
            countries_url: Url::parse(DEFAULT_COUNTRIES_URL)?,
            rates_url: Url::parse(DEFAULT_RATES_URL)?,
            hs_code_sources: vec![HsCodeSource::FlatFiles {
                codes_url: Url::parse(DEFAULT_HS_CODES_URL)?,
                sections_url: Url::parse(DEFAULT_HS_SECTIONS_URL)?,
            }],
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_countries_url(mut self, url: &str) -> Result<Self, ReferenceError> {
        self.countries_url = Url::parse(url)?;
        Ok(self)
    }

    pub fn with_rates_url(mut self, url: &str) -> Result<Self, ReferenceError> {
        self.rates_url = Url::parse(url)?;
        Ok(self)
    }

    pub fn with_hs_code_sources(mut self, sources: Vec<HsCodeSource>) -> Self {
        self.hs_code_sources = sources;
        self
    }

    /// Put a remote JSON `{code, description}` list ahead of the configured sources.
    pub fn with_primary_hs_code_url(mut self, url: &str) -> Result<Self, ReferenceError> {
        self.hs_code_sources
            .insert(0, HsCodeSource::RemoteJson(Url::parse(url)?));
        Ok(self)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}
