use std::{collections::HashMap, time::Duration};

use time::OffsetDateTime;

use super::calculator::compute_impact;
use super::currency::RateTable;
use super::entities::{CalculationResult, Country, HsCode, TariffCalculation};
use super::validation::{advisories, validate, Advisory, ValidationError};
use crate::util::elapsed_since;

/// Everything the calculator page owns for one browser session.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub calculation: TariffCalculation,
    pub result: Option<CalculationResult>,
    pub validation_error: Option<ValidationError>,
    pub advisories: Vec<Advisory>,
    pub countries: Vec<Country>,
    pub hs_codes: Vec<HsCode>,
    pub rates: RateTable,
    pub sources: SourceStatuses,
    /// Bumped by every reset; results started under an older value are dropped.
    generation: u64,
    pending: Option<u64>,
}

/// Validated snapshot handed to a deferred computation.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCalculation {
    pub generation: u64,
    pub input: TariffCalculation,
    pub rates: RateTable,
}

impl PendingCalculation {
    pub fn compute(&self) -> CalculationResult {
        compute_impact(&self.input, &self.rates)
    }
}

impl AppState {
    /// Validate the current form. On success the error is cleared, the state
    /// is marked as calculating and a snapshot is returned for computation.
    pub fn begin_calculation(&mut self) -> Result<PendingCalculation, ValidationError> {
        self.advisories = advisories(&self.calculation, &self.rates);
        if let Err(err) = validate(&self.calculation) {
            self.validation_error = Some(err);
            return Err(err);
        }
        self.validation_error = None;
        self.pending = Some(self.generation);
        Ok(PendingCalculation {
            generation: self.generation,
            input: self.calculation.clone(),
            rates: self.rates.clone(),
        })
    }

    /// Store a deferred result. Returns `false` and discards it when the form
    /// was reset after the calculation began.
    pub fn finish_calculation(&mut self, generation: u64, result: CalculationResult) -> bool {
        if self.pending != Some(generation) {
            return false;
        }
        self.pending = None;
        self.result = Some(result);
        true
    }

    pub fn is_calculating(&self) -> bool {
        self.pending.is_some()
    }

    /// Synchronous calculate: validate then compute into `result`.
    pub fn calculate(&mut self) -> Result<CalculationResult, ValidationError> {
        let pending = self.begin_calculation()?;
        let result = pending.compute();
        self.finish_calculation(pending.generation, result);
        Ok(result)
    }

    /// Clear the form and drop the last result. Reference data is kept and
    /// any calculation still in flight is abandoned.
    pub fn reset(&mut self) {
        self.calculation = TariffCalculation::default();
        self.result = None;
        self.validation_error = None;
        self.advisories.clear();
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_loading(&self) -> bool {
        ReferenceResource::ALL
            .iter()
            .any(|resource| self.sources.get(*resource).is_none())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceResource {
    Countries,
    HsCodes,
    ExchangeRates,
}

impl ReferenceResource {
    pub const ALL: [ReferenceResource; 3] = [
        ReferenceResource::Countries,
        ReferenceResource::HsCodes,
        ReferenceResource::ExchangeRates,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceResource::Countries => "Countries",
            ReferenceResource::HsCodes => "HS Codes",
            ReferenceResource::ExchangeRates => "Exchange Rates",
        }
    }
}

/// Where a reference list came from on its last load.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceStatus {
    /// Human-readable origin, e.g. `"restcountries.com"` or `"built-in list"`.
    pub origin: String,
    pub entries: usize,
    pub loaded_at: OffsetDateTime,
    /// True when a fallback replaced the primary data.
    pub degraded: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SourceStatuses {
    entries: HashMap<ReferenceResource, SourceStatus>,
}

impl SourceStatuses {
    pub fn record(&mut self, resource: ReferenceResource, status: SourceStatus) {
        self.entries.insert(resource, status);
    }

    pub fn get(&self, resource: ReferenceResource) -> Option<&SourceStatus> {
        self.entries.get(&resource)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn age(&self, resource: ReferenceResource) -> Option<Duration> {
        self.get(resource)
            .map(|status| elapsed_since(status.loaded_at))
    }
}
