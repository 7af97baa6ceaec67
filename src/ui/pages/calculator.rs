use dioxus::prelude::*;
use dioxus::core::spawn_forever;
use tracing::{debug, info, warn};

use tariff_calculator::domain::{
    group_by_section, report_rows, serialize, AppState, CalculationResult, FormField,
    BASE_CURRENCY, EXPORT_FILENAME, EXPORT_MIME,
};
use tariff_calculator::util::delay;

use crate::{
    app::CALCULATION_DELAY,
    ui::components::{
        form_field::{Choice, ChoiceGroup, FieldInput},
        kpi_card::KpiCard,
        toast::{push_toast, ToastKind, ToastMessage},
    },
};

#[component]
pub fn CalculatorPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    if state.with(|st| st.is_loading()) {
        return rsx! {
            div { class: "tc-card tc-loading", "Loading reference data..." }
        };
    }

    let calculation = state.with(|st| st.calculation.clone());
    let validation_error = state.with(|st| st.validation_error);
    let advisories = state.with(|st| st.advisories.clone());
    let result = state.with(|st| st.result);
    let calculating = state.with(|st| st.is_calculating());

    let hs_choices = state.with(|st| {
        group_by_section(&st.hs_codes)
            .into_iter()
            .map(|(section, codes)| ChoiceGroup {
                label: section.map(str::to_string),
                choices: codes
                    .into_iter()
                    .map(|code| Choice::new(code.code.clone(), code.label()))
                    .collect(),
            })
            .collect::<Vec<_>>()
    });
    let country_choices = state.with(|st| {
        st.countries
            .iter()
            .map(|country| {
                Choice::new(
                    country.code.clone(),
                    format!("{} ({})", country.name, country.code),
                )
            })
            .collect::<Vec<_>>()
    });
    let country_choices = vec![ChoiceGroup::flat(country_choices)];
    let currency_choices = state.with(|st| {
        let mut codes = vec![BASE_CURRENCY.to_string()];
        codes.extend(
            st.rates
                .codes()
                .filter(|code| *code != BASE_CURRENCY)
                .map(str::to_string),
        );
        // Keep a typed-in code selectable even when no rate backs it.
        if !codes.contains(&st.calculation.currency) {
            codes.push(st.calculation.currency.clone());
        }
        let choices = codes
            .into_iter()
            .map(|code| Choice::new(code.clone(), code))
            .collect();
        vec![ChoiceGroup::flat(choices)]
    });

    let on_change = move |(field, raw): (FormField, String)| {
        state.with_mut(|st| st.calculation.apply(field, &raw));
    };

    let on_calculate = move |_: MouseEvent| {
        let Ok(pending) = state.with_mut(|st| {
            if st.is_calculating() {
                return Err(None);
            }
            st.begin_calculation().map_err(Some)
        }) else {
            return;
        };
        // Owned by the app root so leaving the page does not drop the result.
        let _task = spawn_forever(async move {
            delay(CALCULATION_DELAY).await;
            let result = pending.compute();
            let landed = state.with_mut(|st| st.finish_calculation(pending.generation, result));
            if landed {
                info!(
                    product = %pending.input.product_name,
                    hs_code = %pending.input.hs_code,
                    impact = result.tariff_impact,
                    "calculated tariff impact"
                );
                push_toast(toasts, ToastKind::Success, "Impact analysis updated.");
            } else {
                debug!(generation = pending.generation, "dropped result of a reset calculation");
            }
        });
    };

    let on_reset = move |_: MouseEvent| {
        state.with_mut(|st| st.reset());
    };

    let on_download = move |_: MouseEvent| {
        if let Some(result) = state.with(|st| st.result) {
            download_report(&result);
            push_toast(
                toasts,
                ToastKind::Info,
                format!("Saved {EXPORT_FILENAME}."),
            );
        }
    };

    let choices_for = |field: FormField| match field {
        FormField::HsCode => Some(hs_choices.clone()),
        FormField::OriginCountry | FormField::DestinationCountry => Some(country_choices.clone()),
        FormField::Currency => Some(currency_choices.clone()),
        _ => None,
    };
    let placeholder_for = |field: FormField| match field {
        FormField::ProductName => Some("e.g. Laptop computers".to_string()),
        FormField::HsCode => Some("Select an HS code".to_string()),
        FormField::OriginCountry | FormField::DestinationCountry => {
            Some("Select a country".to_string())
        }
        FormField::Quantity => Some("0".to_string()),
        FormField::UnitPrice => Some("0.00".to_string()),
        _ => None,
    };

    rsx! {
        section { class: "tc-card",
            h2 { "Import Details" }
            if let Some(err) = validation_error {
                div { class: "tc-banner error", role: "alert", "{err}" }
            }
            div { class: "tc-grid",
                for field in FormField::ALL {
                    FieldInput {
                        key: "{field:?}",
                        field,
                        value: calculation.display_value(field),
                        choices: choices_for(field),
                        placeholder: placeholder_for(field),
                        onchange: on_change,
                    }
                }
            }
            if !advisories.is_empty() {
                div { class: "tc-banner warning", style: "margin-top: 1.25rem;",
                    ul {
                        for advisory in advisories {
                            li { "{advisory}" }
                        }
                    }
                }
            }
            div { class: "tc-actions",
                button {
                    class: "tc-button primary",
                    disabled: calculating,
                    onclick: on_calculate,
                    if calculating { "Calculating..." } else { "Calculate Impact" }
                }
                button { class: "tc-button outline", onclick: on_reset, "Reset" }
            }
        }

        if let Some(result) = result {
            ResultPanel { result, on_download }
        }
    }
}

#[component]
fn ResultPanel(result: CalculationResult, on_download: EventHandler<MouseEvent>) -> Element {
    let impact_hint = if result.tariff_impact >= 0.0 {
        "Extra cost under the proposed rate"
    } else {
        "Saving under the proposed rate"
    };
    let rows = report_rows(&result);

    rsx! {
        section { class: "tc-card",
            h2 { "Impact Analysis" }
            p { class: "tc-muted", "Amounts in {BASE_CURRENCY}." }
            div { class: "tc-kpis",
                KpiCard {
                    title: "Import Value".to_string(),
                    value: format!("{:.2}", result.import_value),
                    description: Some("Quantity × unit price".to_string()),
                }
                KpiCard {
                    title: "Current Landed Cost".to_string(),
                    value: format!("{:.2}", result.current_landed_cost),
                    description: Some(format!("Tariff {:.2}", result.current_tariff_amount)),
                }
                KpiCard {
                    title: "Proposed Landed Cost".to_string(),
                    value: format!("{:.2}", result.proposed_landed_cost),
                    description: Some(format!("Tariff {:.2}", result.proposed_tariff_amount)),
                }
                KpiCard {
                    title: "Tariff Impact".to_string(),
                    value: format!("{:.2}", result.tariff_impact),
                    description: Some(format!("{impact_hint} ({:.2}%)", result.percentage_increase)),
                    accent: true,
                }
            }
            table { class: "tc-table",
                thead {
                    tr {
                        th { "Metric" }
                        th { "Value" }
                    }
                }
                tbody {
                    for (metric, value) in rows {
                        tr { key: "{metric}",
                            td { "{metric}" }
                            td { class: "num", "{value}" }
                        }
                    }
                }
            }
            div { class: "tc-actions",
                button {
                    class: "tc-button outline",
                    onclick: move |evt: MouseEvent| on_download.call(evt),
                    "Download CSV"
                }
            }
        }
    }
}

/// Hand the report to the browser as a file download.
fn download_report(result: &CalculationResult) {
    let payload = serde_json::to_string(&serialize(result)).unwrap_or_else(|_| "\"\"".to_string());
    let script = format!(
        r#"(() => {{
            const blob = new Blob([{payload}], {{ type: "{EXPORT_MIME}" }});
            const url = URL.createObjectURL(blob);
            const link = document.createElement('a');
            link.href = url;
            link.download = "{EXPORT_FILENAME}";
            document.body.appendChild(link);
            link.click();
            document.body.removeChild(link);
            URL.revokeObjectURL(url);
            return true;
        }})()"#
    );
    let eval = document::eval(&script);
    spawn(async move {
        if let Err(err) = eval.await {
            warn!(error = ?err, "report download failed");
        }
    });
}
