use super::entities::CalculationResult;

/// File name offered when the report is downloaded.
pub const EXPORT_FILENAME: &str = "tariff-calculation.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// Fixed-order `(metric, value)` pairs for a result, values already formatted.
pub fn report_rows(result: &CalculationResult) -> [(&'static str, String); 7] {
    [
        ("Import Value", money(result.import_value)),
        ("Current Tariff Amount", money(result.current_tariff_amount)),
        ("Proposed Tariff Amount", money(result.proposed_tariff_amount)),
        ("Current Landed Cost", money(result.current_landed_cost)),
        ("Proposed Landed Cost", money(result.proposed_landed_cost)),
        ("Tariff Impact", money(result.tariff_impact)),
        (
            "Percentage Increase",
            format!("{}%", money(result.percentage_increase)),
        ),
    ]
}

/// Two-column comma-separated table with a `Metric,Value` header.
///
/// Cells are not escaped; every value is a pre-formatted number.
pub fn serialize(result: &CalculationResult) -> String {
    let mut lines = Vec::with_capacity(8);
    lines.push("Metric,Value".to_string());
    lines.extend(
        report_rows(result)
            .into_iter()
            .map(|(metric, value)| format!("{metric},{value}")),
    );
    lines.join("\n")
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}
