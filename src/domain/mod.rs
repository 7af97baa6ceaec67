//! Tariff impact logic lives here. Nothing in this module performs I/O.

pub mod app_state;
pub mod calculator;
pub mod currency;
pub mod entities;
pub mod form;
pub mod report;
pub mod validation;

pub use app_state::{
    AppState, PendingCalculation, ReferenceResource, SourceStatus, SourceStatuses,
};
pub use calculator::{compute_impact, ConvertedCosts};
pub use currency::{convert, RateTable};
pub use entities::{
    group_by_section, CalculationResult, Country, CurrencyCode, HsCode, TariffCalculation,
    BASE_CURRENCY,
};
pub use form::FormField;
pub use report::{report_rows, serialize, EXPORT_FILENAME, EXPORT_MIME};
pub use validation::{advisories, validate, Advisory, RateKind, ValidationError};
