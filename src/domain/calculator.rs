use super::currency::{convert, RateTable};
use super::entities::{CalculationResult, TariffCalculation, BASE_CURRENCY};

/// Monetary inputs after normalization to the base currency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvertedCosts {
    pub unit_price: f64,
    pub shipping_cost: f64,
    pub logistics_cost: f64,
    pub additional_duties: f64,
}

impl ConvertedCosts {
    /// Convert each monetary field individually. Base-currency input is taken as-is.
    pub fn from_input(input: &TariffCalculation, rates: &RateTable) -> Self {
        if input.is_base_currency() {
            return Self {
                unit_price: input.unit_price,
                shipping_cost: input.shipping_cost,
                logistics_cost: input.logistics_cost,
                additional_duties: input.additional_duties,
            };
        }

        let to_base = |amount: f64| convert(amount, &input.currency, BASE_CURRENCY, rates);
        Self {
            unit_price: to_base(input.unit_price),
            shipping_cost: to_base(input.shipping_cost),
            logistics_cost: to_base(input.logistics_cost),
            additional_duties: to_base(input.additional_duties),
        }
    }

    pub fn additional_costs(&self) -> f64 {
        self.shipping_cost + self.logistics_cost + self.additional_duties
    }
}

/// Landed cost under the current and proposed tariff rate.
///
/// Expects input that already passed [`validate`](super::validation::validate).
/// A zero current landed cost yields an infinite or NaN percentage rather
/// than panicking.
pub fn compute_impact(input: &TariffCalculation, rates: &RateTable) -> CalculationResult {
    let costs = ConvertedCosts::from_input(input, rates);

    let import_value = input.quantity as f64 * costs.unit_price;
    let current_tariff_amount = import_value * (input.current_tariff_rate / 100.0);
    let proposed_tariff_amount = import_value * (input.proposed_tariff_rate / 100.0);
    let additional_costs = costs.additional_costs();

    let current_landed_cost = import_value + current_tariff_amount + additional_costs;
    let proposed_landed_cost = import_value + proposed_tariff_amount + additional_costs;

    let tariff_impact = proposed_landed_cost - current_landed_cost;
    let percentage_increase = (tariff_impact / current_landed_cost) * 100.0;

    CalculationResult {
        import_value,
        current_tariff_amount,
        proposed_tariff_amount,
        current_landed_cost,
        proposed_landed_cost,
        tariff_impact,
        percentage_increase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TariffCalculation {
        TariffCalculation {
            product_name: "Laptop".into(),
            hs_code: "8471.30".into(),
            origin_country: "CN".into(),
            destination_country: "US".into(),
            quantity: 100,
            unit_price: 10.0,
            currency: "USD".into(),
            current_tariff_rate: 5.0,
            proposed_tariff_rate: 25.0,
            shipping_cost: 200.0,
            logistics_cost: 50.0,
            additional_duties: 0.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn base_currency_example() {
        let input = sample();
        let costs = ConvertedCosts::from_input(&input, &RateTable::default());
        assert_eq!(costs.additional_costs(), 250.0);

        let result = compute_impact(&input, &RateTable::default());
        assert_eq!(result.import_value, 1000.0);
        assert_eq!(result.current_tariff_amount, 50.0);
        assert_eq!(result.proposed_tariff_amount, 250.0);
        assert_eq!(result.current_landed_cost, 1300.0);
        assert_eq!(result.proposed_landed_cost, 1500.0);
        assert_eq!(result.tariff_impact, 200.0);
        assert!((result.percentage_increase - 15.3846).abs() < 1e-3);
    }

    #[test]
    fn foreign_currency_is_normalized_field_by_field() {
        let rates = RateTable::new("USD", [("USD", 1.0), ("EUR", 0.9)]);
        let input = TariffCalculation {
            currency: "EUR".into(),
            ..sample()
        };

        let costs = ConvertedCosts::from_input(&input, &rates);
        assert!(close(costs.unit_price, 10.0 / 0.9));
        assert!(close(costs.shipping_cost, 200.0 / 0.9));
        assert!(close(costs.logistics_cost, 50.0 / 0.9));
        assert_eq!(costs.additional_duties, 0.0);

        let result = compute_impact(&input, &rates);
        assert!(close(result.import_value, 1000.0 / 0.9));
        assert!(close(result.current_tariff_amount, 50.0 / 0.9));
        assert!(close(result.current_landed_cost, 1300.0 / 0.9));
        // Scaling every monetary input leaves the ratio unchanged.
        assert!((result.percentage_increase - 15.3846).abs() < 1e-3);
    }

    #[test]
    fn unknown_currency_uses_raw_amounts() {
        let rates = RateTable::new("USD", [("USD", 1.0)]);
        let input = TariffCalculation {
            currency: "ZZZ".into(),
            ..sample()
        };
        assert_eq!(
            compute_impact(&input, &rates),
            compute_impact(&sample(), &rates)
        );
    }

    #[test]
    fn zero_landed_cost_yields_nan_not_panic() {
        let input = TariffCalculation {
            unit_price: 0.0,
            shipping_cost: 0.0,
            logistics_cost: 0.0,
            ..sample()
        };
        let result = compute_impact(&input, &RateTable::default());
        assert_eq!(result.current_landed_cost, 0.0);
        assert!(result.percentage_increase.is_nan());
    }

    #[test]
    fn tariff_decrease_gives_negative_impact() {
        let input = TariffCalculation {
            current_tariff_rate: 25.0,
            proposed_tariff_rate: 5.0,
            ..sample()
        };
        let result = compute_impact(&input, &RateTable::default());
        assert_eq!(result.tariff_impact, -200.0);
        assert!(result.percentage_increase < 0.0);
    }
}
