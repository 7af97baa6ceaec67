//! Field-by-field editing of a [`TariffCalculation`] from raw input text.

use super::entities::{TariffCalculation, BASE_CURRENCY};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    ProductName,
    HsCode,
    OriginCountry,
    DestinationCountry,
    Quantity,
    UnitPrice,
    Currency,
    CurrentTariffRate,
    ProposedTariffRate,
    ShippingCost,
    LogisticsCost,
    AdditionalDuties,
}

impl FormField {
    pub const ALL: [FormField; 12] = [
        FormField::ProductName,
        FormField::HsCode,
        FormField::OriginCountry,
        FormField::Quantity,
        FormField::UnitPrice,
        FormField::Currency,
        FormField::DestinationCountry,
        FormField::CurrentTariffRate,
        FormField::ProposedTariffRate,
        FormField::ShippingCost,
        FormField::LogisticsCost,
        FormField::AdditionalDuties,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::ProductName => "Product Name",
            FormField::HsCode => "HS Code",
            FormField::OriginCountry => "Origin Country",
            FormField::DestinationCountry => "Destination Country",
            FormField::Quantity => "Quantity",
            FormField::UnitPrice => "Unit Price",
            FormField::Currency => "Currency",
            FormField::CurrentTariffRate => "Current Tariff Rate (%)",
            FormField::ProposedTariffRate => "Proposed Tariff Rate (%)",
            FormField::ShippingCost => "Shipping Cost",
            FormField::LogisticsCost => "Logistics Cost",
            FormField::AdditionalDuties => "Additional Duties",
        }
    }

    /// Step attribute for numeric inputs, `None` for text and pickers.
    pub fn step(&self) -> Option<&'static str> {
        match self {
            FormField::Quantity => Some("1"),
            FormField::CurrentTariffRate | FormField::ProposedTariffRate => Some("0.1"),
            FormField::UnitPrice
            | FormField::ShippingCost
            | FormField::LogisticsCost
            | FormField::AdditionalDuties => Some("0.01"),
            _ => None,
        }
    }
}

impl TariffCalculation {
    /// Store one edited field. Unparseable numbers become zero.
    pub fn apply(&mut self, field: FormField, raw: &str) {
        match field {
            FormField::ProductName => self.product_name = raw.to_string(),
            FormField::HsCode => self.hs_code = raw.to_string(),
            FormField::OriginCountry => self.origin_country = raw.to_string(),
            FormField::DestinationCountry => self.destination_country = raw.to_string(),
            FormField::Quantity => self.quantity = parse_int_prefix(raw).unwrap_or(0),
            FormField::UnitPrice => self.unit_price = parse_float_prefix(raw).unwrap_or(0.0),
            FormField::Currency => {
                let code = raw.trim().to_ascii_uppercase();
                self.currency = if code.is_empty() {
                    BASE_CURRENCY.to_string()
                } else {
                    code
                };
            }
            FormField::CurrentTariffRate => {
                self.current_tariff_rate = parse_float_prefix(raw).unwrap_or(0.0)
            }
            FormField::ProposedTariffRate => {
                self.proposed_tariff_rate = parse_float_prefix(raw).unwrap_or(0.0)
            }
            FormField::ShippingCost => self.shipping_cost = parse_float_prefix(raw).unwrap_or(0.0),
            FormField::LogisticsCost => {
                self.logistics_cost = parse_float_prefix(raw).unwrap_or(0.0)
            }
            FormField::AdditionalDuties => {
                self.additional_duties = parse_float_prefix(raw).unwrap_or(0.0)
            }
        }
    }

    /// Current value of `field` as input text. Zero quantity and unit price render blank.
    pub fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::ProductName => self.product_name.clone(),
            FormField::HsCode => self.hs_code.clone(),
            FormField::OriginCountry => self.origin_country.clone(),
            FormField::DestinationCountry => self.destination_country.clone(),
            FormField::Quantity if self.quantity == 0 => String::new(),
            FormField::Quantity => self.quantity.to_string(),
            FormField::UnitPrice if self.unit_price == 0.0 => String::new(),
            FormField::UnitPrice => self.unit_price.to_string(),
            FormField::Currency => self.currency.clone(),
            FormField::CurrentTariffRate => self.current_tariff_rate.to_string(),
            FormField::ProposedTariffRate => self.proposed_tariff_rate.to_string(),
            FormField::ShippingCost => self.shipping_cost.to_string(),
            FormField::LogisticsCost => self.logistics_cost.to_string(),
            FormField::AdditionalDuties => self.additional_duties.to_string(),
        }
    }
}

/// Leading optional sign plus digits, so `"12 boxes"` reads as 12.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Leading decimal literal (`[+-]digits[.digits][e[+-]digits]`) or
/// `[+-]Infinity`, read in one pass. Out-of-range exponents saturate to
/// infinity; a missing literal is `None`.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(bytes.first().is_some_and(|b| matches!(b, b'+' | b'-')));
    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].parse().ok();
    }

    let int_digits = digits_from(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    text[..end].parse().ok()
}
