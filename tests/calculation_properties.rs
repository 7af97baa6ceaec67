use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use tariff_calculator::domain::{
    compute_impact, convert, serialize, validate, RateTable, TariffCalculation, ValidationError,
};

fn price(cents: u32) -> f64 {
    f64::from(cents % 10_000_000 + 1) / 100.0
}

fn rate(tenths: u16) -> f64 {
    f64::from(tenths % 1_000) / 10.0
}

fn input(quantity: u16, cents: u32, current: u16, proposed: u16, extra: u32) -> TariffCalculation {
    TariffCalculation {
        product_name: "Widget".into(),
        hs_code: "8471.30".into(),
        origin_country: "CN".into(),
        destination_country: "US".into(),
        quantity: i64::from(quantity) + 1,
        unit_price: price(cents),
        current_tariff_rate: rate(current),
        proposed_tariff_rate: rate(proposed),
        shipping_cost: f64::from(extra % 100_000),
        ..TariffCalculation::default()
    }
}

fn example_rates() -> RateTable {
    RateTable::new("USD", [("USD", 1.0), ("EUR", 0.9)])
}

#[quickcheck]
fn base_currency_import_value_is_quantity_times_price(quantity: u16, cents: u32) -> bool {
    let calc = input(quantity, cents, 0, 0, 0);
    let result = compute_impact(&calc, &RateTable::default());
    result.import_value == calc.quantity as f64 * calc.unit_price
}

#[quickcheck]
fn impact_is_difference_of_landed_costs(
    quantity: u16,
    cents: u32,
    current: u16,
    proposed: u16,
    extra: u32,
) -> bool {
    let result = compute_impact(
        &input(quantity, cents, current, proposed, extra),
        &example_rates(),
    );
    result.tariff_impact == result.proposed_landed_cost - result.current_landed_cost
}

#[quickcheck]
fn percentage_is_impact_over_current_landed_cost(
    quantity: u16,
    cents: u32,
    current: u16,
    proposed: u16,
    extra: u32,
) -> bool {
    let result = compute_impact(
        &input(quantity, cents, current, proposed, extra),
        &example_rates(),
    );
    result.current_landed_cost > 0.0
        && result.percentage_increase
            == (result.tariff_impact / result.current_landed_cost) * 100.0
}

#[quickcheck]
fn calculation_is_repeatable(quantity: u16, cents: u32, current: u16, proposed: u16) -> bool {
    let mut calc = input(quantity, cents, current, proposed, 50);
    calc.currency = "EUR".into();
    let rates = example_rates();
    compute_impact(&calc, &rates) == compute_impact(&calc, &rates)
}

#[quickcheck]
fn conversion_round_trips(amount: i32, eur: u16, gbp: u16) -> TestResult {
    if eur == 0 || gbp == 0 {
        return TestResult::discard();
    }
    let table = RateTable::new(
        "USD",
        [
            ("USD", 1.0),
            ("EUR", f64::from(eur) / 100.0),
            ("GBP", f64::from(gbp) / 100.0),
        ],
    );
    let amount = f64::from(amount);
    let back = convert(convert(amount, "EUR", "GBP", &table), "GBP", "EUR", &table);
    TestResult::from_bool((back - amount).abs() <= amount.abs() * 1e-9)
}

#[quickcheck]
fn conversion_with_unknown_code_is_identity(amount: i32) -> bool {
    let amount = f64::from(amount);
    let table = example_rates();
    convert(amount, "XYZ", "USD", &table) == amount
        && convert(amount, "USD", "XYZ", &table) == amount
        && convert(amount, "EUR", "EUR", &RateTable::default()) == amount
}

#[test]
fn validator_reports_first_failure_in_field_order() {
    let mut calc = TariffCalculation::default();
    let expected = [
        ValidationError::ProductNameRequired,
        ValidationError::HsCodeRequired,
        ValidationError::OriginCountryRequired,
        ValidationError::DestinationCountryRequired,
        ValidationError::QuantityNotPositive,
        ValidationError::UnitPriceNotPositive,
    ];

    for (step, err) in expected.into_iter().enumerate() {
        assert_eq!(validate(&calc), Err(err), "step {step}");
        match err {
            ValidationError::ProductNameRequired => calc.product_name = "Laptop".into(),
            ValidationError::HsCodeRequired => calc.hs_code = "8471.30".into(),
            ValidationError::OriginCountryRequired => calc.origin_country = "CN".into(),
            ValidationError::DestinationCountryRequired => {
                calc.destination_country = "US".into()
            }
            ValidationError::QuantityNotPositive => calc.quantity = 1,
            ValidationError::UnitPriceNotPositive => calc.unit_price = 0.01,
        }
    }
    assert_eq!(validate(&calc), Ok(()));
}

#[test]
fn validation_messages_are_user_facing() {
    assert_eq!(
        ValidationError::QuantityNotPositive.to_string(),
        "Quantity must be greater than 0"
    );
    assert_eq!(ValidationError::HsCodeRequired.to_string(), "HS Code is required");
}

fn worked_example(currency: &str) -> TariffCalculation {
    TariffCalculation {
        product_name: "Laptop".into(),
        hs_code: "8471.30".into(),
        origin_country: "CN".into(),
        destination_country: "US".into(),
        quantity: 100,
        unit_price: 10.0,
        currency: currency.into(),
        current_tariff_rate: 5.0,
        proposed_tariff_rate: 25.0,
        shipping_cost: 200.0,
        logistics_cost: 50.0,
        additional_duties: 0.0,
    }
}

#[test]
fn usd_worked_example_and_export() {
    let result = compute_impact(&worked_example("USD"), &example_rates());
    assert_eq!(result.import_value, 1000.0);
    assert_eq!(result.current_tariff_amount, 50.0);
    assert_eq!(result.proposed_tariff_amount, 250.0);
    assert_eq!(result.current_landed_cost, 1300.0);
    assert_eq!(result.proposed_landed_cost, 1500.0);
    assert_eq!(result.tariff_impact, 200.0);
    assert!((result.percentage_increase - 15.384_615).abs() < 1e-5);

    let csv = serialize(&result);
    assert_eq!(csv.lines().nth(1), Some("Import Value,1000.00"));
    assert_eq!(csv.lines().last(), Some("Percentage Increase,15.38%"));
}

#[test]
fn eur_worked_example_scales_by_rate() {
    let result = compute_impact(&worked_example("EUR"), &example_rates());
    let unit = 10.0 / 0.9;
    assert!((result.import_value - 100.0 * unit).abs() < 1e-9);
    assert!((result.import_value - 1111.11).abs() < 0.01);
    let additional = (200.0 + 50.0) / 0.9;
    assert!((result.current_landed_cost - (result.import_value * 1.05 + additional)).abs() < 1e-9);
}
