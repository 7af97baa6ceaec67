//! Landed-cost impact of tariff changes on a single import.
//!
//! `domain` holds the pure calculation and session state, `infra` fetches the
//! reference lists (countries, exchange rates, HS codes) and `util` carries
//! the small helpers shared with the UI binary.

pub mod domain;
pub mod infra;
pub mod util;
