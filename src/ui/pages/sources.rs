use dioxus::prelude::*;
use tracing::info;

use tariff_calculator::{
    domain::{AppState, ReferenceResource},
    infra::ReferenceClient,
    util::humanize_age,
};

use crate::{
    app::ReloadTrigger,
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
};

#[derive(Clone, PartialEq)]
struct SourceRow {
    label: &'static str,
    origin: String,
    entries: usize,
    age: String,
    degraded: bool,
}

#[component]
pub fn SourcesPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<Option<ReferenceClient>>();
    let reload = use_context::<ReloadTrigger>();

    let (rows, pending) = state.with(|st| {
        let mut rows = Vec::new();
        let mut pending = Vec::new();
        for resource in ReferenceResource::ALL {
            match (st.sources.get(resource), st.sources.age(resource)) {
                (Some(status), Some(age)) => rows.push(SourceRow {
                    label: resource.label(),
                    origin: status.origin.clone(),
                    entries: status.entries,
                    age: humanize_age(age),
                    degraded: status.degraded,
                }),
                _ => pending.push(resource.label()),
            }
        }
        (rows, pending)
    });
    let currency_count = state.with(|st| st.rates.len());

    let on_refresh = move |_: MouseEvent| {
        let client = client.clone();
        spawn(async move {
            if let Some(client) = client {
                client.clear_cache().await;
            }
            info!("reference data refresh requested");
            state.with_mut(|st| st.sources.clear());
            reload.fire();
            push_toast(toasts, ToastKind::Info, "Refreshing reference data...");
        });
    };

    rsx! {
        section { class: "tc-card",
            h2 { "Reference Data" }
            p { class: "tc-muted",
                "Lists are fetched once per session and cached in memory. "
                "{currency_count} currencies have exchange rates."
            }
            ul { class: "tc-status",
                for row in rows {
                    li { key: "{row.label}",
                        div {
                            strong { "{row.label}" }
                            div { class: "meta", "{row.origin} · {row.entries} entries · {row.age} ago" }
                        }
                        if row.degraded {
                            span { class: "tc-badge degraded", "Fallback" }
                        } else {
                            span { class: "tc-badge ok", "Live" }
                        }
                    }
                }
                for label in pending {
                    li { key: "{label}",
                        strong { "{label}" }
                        span { class: "meta", "Loading..." }
                    }
                }
            }
            div { class: "tc-actions",
                button { class: "tc-button outline", onclick: on_refresh, "Refresh Reference Data" }
            }
        }
    }
}
