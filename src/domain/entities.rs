use serde::{Deserialize, Serialize};

/// Currency every rate table is expressed against and every result is reported in.
pub const BASE_CURRENCY: &str = "USD";

/// ISO 4217 currency code, e.g. `"EUR"`.
pub type CurrencyCode = String;

/// The calculator form as the user is editing it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TariffCalculation {
    pub product_name: String,
    pub hs_code: String,
    /// ISO 3166-1 alpha-2 code.
    pub origin_country: String,
    /// ISO 3166-1 alpha-2 code.
    pub destination_country: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub currency: CurrencyCode,
    /// Percent, so `5.0` means 5 %.
    pub current_tariff_rate: f64,
    /// Percent, so `25.0` means 25 %.
    pub proposed_tariff_rate: f64,
    pub shipping_cost: f64,
    pub logistics_cost: f64,
    pub additional_duties: f64,
}

impl Default for TariffCalculation {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            hs_code: String::new(),
            origin_country: String::new(),
            destination_country: String::new(),
            quantity: 0,
            unit_price: 0.0,
            currency: BASE_CURRENCY.to_string(),
            current_tariff_rate: 0.0,
            proposed_tariff_rate: 0.0,
            shipping_cost: 0.0,
            logistics_cost: 0.0,
            additional_duties: 0.0,
        }
    }
}

impl TariffCalculation {
    pub fn is_base_currency(&self) -> bool {
        self.currency == BASE_CURRENCY
    }
}

/// Output of one successful calculation, in base currency.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub import_value: f64,
    pub current_tariff_amount: f64,
    pub proposed_tariff_amount: f64,
    pub current_landed_cost: f64,
    pub proposed_landed_cost: f64,
    pub tariff_impact: f64,
    pub percentage_increase: f64,
}

/// Country reference entry used by the origin/destination pickers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
    /// First listed currency, empty when the country has none.
    pub currency: String,
    /// URL of an SVG flag.
    pub flag: String,
}

/// Harmonized System classification entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsCode {
    pub code: String,
    pub description: String,
    /// Section name when the source provides one.
    #[serde(default)]
    pub section: Option<String>,
}

impl HsCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            section: None,
        }
    }

    /// Label used by the HS code picker.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.description)
    }
}

/// Group codes by section, sections in order of first appearance.
/// Codes without a section share one `None` group.
pub fn group_by_section(codes: &[HsCode]) -> Vec<(Option<&str>, Vec<&HsCode>)> {
    let mut groups: Vec<(Option<&str>, Vec<&HsCode>)> = Vec::new();
    for code in codes {
        let section = code.section.as_deref();
        match groups.iter_mut().find(|(key, _)| *key == section) {
            Some((_, members)) => members.push(code),
            None => groups.push((section, vec![code])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coded(code: &str, section: Option<&str>) -> HsCode {
        HsCode {
            section: section.map(str::to_string),
            ..HsCode::new(code, "item")
        }
    }

    #[test]
    fn groups_follow_first_appearance() {
        let codes = vec![
            coded("8471.30", Some("machinery")),
            coded("6110.20", Some("textiles")),
            coded("8517.12", Some("machinery")),
            coded("9504.50", None),
        ];
        let groups = group_by_section(&codes);

        let shape: Vec<_> = groups
            .iter()
            .map(|(section, members)| {
                (*section, members.iter().map(|c| c.code.as_str()).collect::<Vec<_>>())
            })
            .collect();
        assert_eq!(
            shape,
            vec![
                (Some("machinery"), vec!["8471.30", "8517.12"]),
                (Some("textiles"), vec!["6110.20"]),
                (None, vec!["9504.50"]),
            ]
        );
    }

    #[test]
    fn builtin_style_codes_form_one_unlabelled_group() {
        let codes = vec![HsCode::new("8471.30", "a"), HsCode::new("8517.12", "b")];
        let groups = group_by_section(&codes);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, None);
        assert_eq!(groups[0].1.len(), 2);
    }
}
