//! Gatekeeping checks run before a calculation, plus non-blocking advisories.

use std::fmt;

use thiserror::Error;

use super::currency::RateTable;
use super::entities::TariffCalculation;

/// First rule an input violates. The display text is shown to the user as-is.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Product name is required")]
    ProductNameRequired,
    #[error("HS Code is required")]
    HsCodeRequired,
    #[error("Origin country is required")]
    OriginCountryRequired,
    #[error("Destination country is required")]
    DestinationCountryRequired,
    #[error("Quantity must be greater than 0")]
    QuantityNotPositive,
    #[error("Unit price must be greater than 0")]
    UnitPriceNotPositive,
}

/// Check `input` in fixed priority order and stop at the first failure.
///
/// Tariff rates, origin/destination equality and currency support are left
/// alone here; see [`advisories`].
pub fn validate(input: &TariffCalculation) -> Result<(), ValidationError> {
    if input.product_name.is_empty() {
        return Err(ValidationError::ProductNameRequired);
    }
    if input.hs_code.is_empty() {
        return Err(ValidationError::HsCodeRequired);
    }
    if input.origin_country.is_empty() {
        return Err(ValidationError::OriginCountryRequired);
    }
    if input.destination_country.is_empty() {
        return Err(ValidationError::DestinationCountryRequired);
    }
    if input.quantity <= 0 {
        return Err(ValidationError::QuantityNotPositive);
    }
    // `!(x > 0)` so a NaN price is rejected too.
    if !(input.unit_price > 0.0) {
        return Err(ValidationError::UnitPriceNotPositive);
    }
    Ok(())
}

/// Something unusual about an input that does not stop the calculation.
#[derive(Clone, Debug, PartialEq)]
pub enum Advisory {
    NegativeTariffRate { which: RateKind, rate: f64 },
    TariffRateAbove100 { which: RateKind, rate: f64 },
    SameOriginAndDestination,
    UnsupportedCurrency(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateKind {
    Current,
    Proposed,
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateKind::Current => write!(f, "Current"),
            RateKind::Proposed => write!(f, "Proposed"),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::NegativeTariffRate { which, rate } => {
                write!(f, "{which} tariff rate is negative ({rate}%)")
            }
            Advisory::TariffRateAbove100 { which, rate } => {
                write!(f, "{which} tariff rate exceeds 100% ({rate}%)")
            }
            Advisory::SameOriginAndDestination => {
                write!(f, "Origin and destination country are the same")
            }
            Advisory::UnsupportedCurrency(code) => write!(
                f,
                "No exchange rate for {code}; amounts are used without conversion"
            ),
        }
    }
}

/// Collect advisories for `input`. Never blocks a calculation.
pub fn advisories(input: &TariffCalculation, rates: &RateTable) -> Vec<Advisory> {
    let mut found = Vec::new();

    for (which, rate) in [
        (RateKind::Current, input.current_tariff_rate),
        (RateKind::Proposed, input.proposed_tariff_rate),
    ] {
        if rate < 0.0 {
            found.push(Advisory::NegativeTariffRate { which, rate });
        } else if rate > 100.0 {
            found.push(Advisory::TariffRateAbove100 { which, rate });
        }
    }

    if !input.origin_country.is_empty() && input.origin_country == input.destination_country {
        found.push(Advisory::SameOriginAndDestination);
    }

    if !input.is_base_currency() && !rates.contains(&input.currency) {
        found.push(Advisory::UnsupportedCurrency(input.currency.clone()));
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TariffCalculation {
        TariffCalculation {
            product_name: "Sweater".into(),
            hs_code: "6110.20".into(),
            origin_country: "VN".into(),
            destination_country: "US".into(),
            quantity: 3,
            unit_price: 12.5,
            ..TariffCalculation::default()
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert_eq!(validate(&valid()), Ok(()));
    }

    #[test]
    fn reports_each_rule_in_order() {
        let cases = [
            (
                TariffCalculation { product_name: String::new(), ..valid() },
                "Product name is required",
            ),
            (
                TariffCalculation { hs_code: String::new(), ..valid() },
                "HS Code is required",
            ),
            (
                TariffCalculation { origin_country: String::new(), ..valid() },
                "Origin country is required",
            ),
            (
                TariffCalculation { destination_country: String::new(), ..valid() },
                "Destination country is required",
            ),
            (
                TariffCalculation { quantity: 0, ..valid() },
                "Quantity must be greater than 0",
            ),
            (
                TariffCalculation { unit_price: -1.0, ..valid() },
                "Unit price must be greater than 0",
            ),
        ];
        for (input, message) in cases {
            let err = validate(&input).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn first_failing_rule_wins() {
        let input = TariffCalculation {
            product_name: String::new(),
            quantity: 0,
            ..valid()
        };
        assert_eq!(validate(&input), Err(ValidationError::ProductNameRequired));

        let blank = TariffCalculation::default();
        assert_eq!(validate(&blank), Err(ValidationError::ProductNameRequired));
    }

    #[test]
    fn nan_unit_price_is_rejected() {
        let input = TariffCalculation { unit_price: f64::NAN, ..valid() };
        assert_eq!(validate(&input), Err(ValidationError::UnitPriceNotPositive));
    }

    #[test]
    fn unusual_rates_pass_validation_but_raise_advisories() {
        let input = TariffCalculation {
            current_tariff_rate: -5.0,
            proposed_tariff_rate: 250.0,
            destination_country: "VN".into(),
            currency: "XYZ".into(),
            ..valid()
        };
        assert_eq!(validate(&input), Ok(()));

        let rates = RateTable::new("USD", [("USD", 1.0)]);
        let found = advisories(&input, &rates);
        assert_eq!(
            found,
            vec![
                Advisory::NegativeTariffRate { which: RateKind::Current, rate: -5.0 },
                Advisory::TariffRateAbove100 { which: RateKind::Proposed, rate: 250.0 },
                Advisory::SameOriginAndDestination,
                Advisory::UnsupportedCurrency("XYZ".into()),
            ]
        );
        assert_eq!(found[2].to_string(), "Origin and destination country are the same");
    }

    #[test]
    fn plain_input_has_no_advisories() {
        assert!(advisories(&valid(), &RateTable::default()).is_empty());
    }
}
