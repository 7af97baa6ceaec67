use std::time::Duration;

use dioxus::{prelude::*, signals::Signal};
use time::OffsetDateTime;
use tracing::{info, warn};

use tariff_calculator::{
    domain::{AppState, RateTable, ReferenceResource, SourceStatus, BASE_CURRENCY},
    infra::{builtin_hs_codes, hs_codes::BUILTIN_LABEL, CacheStatus, ReferenceClient},
    util::{assets, version::APP_NAME},
};

use crate::ui::{
    components::toast::{push_toast, Toast, ToastKind, ToastMessage},
    pages::{CalculatorPage, SourcesPage},
    shell::Shell,
};

/// Pause before a result appears, so the pending state is visible.
pub const CALCULATION_DELAY: Duration = Duration::from_millis(500);

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Calculator {},
    #[route("/sources")]
    Sources {},
}

/// Bumped to make every reference loader run again.
#[derive(Clone, Copy)]
pub struct ReloadTrigger(pub Signal<u32>);

impl ReloadTrigger {
    pub fn fire(mut self) {
        self.0.with_mut(|generation| *generation += 1);
    }
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let client = use_hook(|| match ReferenceClient::new() {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(error = %err, "reference client unavailable");
            None
        }
    });
    use_context_provider(|| client.clone());

    let reload = use_signal(|| 0u32);
    use_context_provider(|| ReloadTrigger(reload));

    let _countries = use_resource({
        let client = client.clone();
        move || {
            let generation = reload();
            let client = client.clone();
            async move { load_countries(client, state, toasts, generation).await }
        }
    });

    let _rates = use_resource({
        let client = client.clone();
        move || {
            let generation = reload();
            let client = client.clone();
            async move { load_exchange_rates(client, state, toasts, generation).await }
        }
    });

    let _hs_codes = use_resource({
        let client = client.clone();
        move || {
            let generation = reload();
            let client = client.clone();
            async move { load_hs_codes(client, state, toasts, generation).await }
        }
    });

    rsx! {
        document::Title { "{APP_NAME}" }
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

fn host_of(url: &url::Url) -> String {
    url.host_str().unwrap_or("unknown host").to_string()
}

fn record(
    mut state: Signal<AppState>,
    resource: ReferenceResource,
    origin: String,
    entries: usize,
    degraded: bool,
) {
    state.with_mut(|st| {
        st.sources.record(
            resource,
            SourceStatus {
                origin,
                entries,
                loaded_at: OffsetDateTime::now_utc(),
                degraded,
            },
        )
    });
}

async fn load_countries(
    client: Option<ReferenceClient>,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    generation: u32,
) {
    info!(generation, "[countries] loading");
    let Some(client) = client else {
        push_toast(toasts, ToastKind::Error, "Country list unavailable.");
        record(state, ReferenceResource::Countries, "unavailable".into(), 0, true);
        return;
    };
    let origin = host_of(&client.config().countries_url);

    match client.get_countries().await {
        Ok(payload) => {
            let count = payload.data.len();
            let stale = payload.status == CacheStatus::Stale;
            if stale {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    "Country list served from cache; the refresh failed.",
                );
            }
            state.with_mut(|st| st.countries = payload.data);
            record(state, ReferenceResource::Countries, origin, count, stale);
        }
        Err(err) => {
            warn!(error = %err, "[countries] falling back to an empty list");
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to load countries: {err}"),
            );
            state.with_mut(|st| st.countries.clear());
            record(state, ReferenceResource::Countries, origin, 0, true);
        }
    }
}

async fn load_exchange_rates(
    client: Option<ReferenceClient>,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    generation: u32,
) {
    info!(generation, "[rates] loading");
    let Some(client) = client else {
        push_toast(
            toasts,
            ToastKind::Error,
            "Exchange rates unavailable; amounts will not be converted.",
        );
        record(state, ReferenceResource::ExchangeRates, "unavailable".into(), 0, true);
        return;
    };
    let origin = host_of(&client.config().rates_url);

    match client.get_exchange_rates().await {
        Ok(payload) => {
            let count = payload.data.table.len();
            let stale = payload.status == CacheStatus::Stale;
            if stale {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    "Exchange rates served from cache; the refresh failed.",
                );
            }
            let origin = match payload.data.as_of {
                Some(date) => format!("{origin} ({date})"),
                None => origin,
            };
            state.with_mut(|st| st.rates = payload.data.table);
            record(state, ReferenceResource::ExchangeRates, origin, count, stale);
        }
        Err(err) => {
            warn!(error = %err, "[rates] falling back to an empty table");
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to load exchange rates: {err}. Amounts will not be converted."),
            );
            state.with_mut(|st| st.rates = RateTable::empty(BASE_CURRENCY));
            record(state, ReferenceResource::ExchangeRates, origin, 0, true);
        }
    }
}

async fn load_hs_codes(
    client: Option<ReferenceClient>,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    generation: u32,
) {
    info!(generation, "[hs-codes] loading");
    let Some(client) = client else {
        let codes = builtin_hs_codes();
        let count = codes.len();
        state.with_mut(|st| st.hs_codes = codes);
        record(state, ReferenceResource::HsCodes, BUILTIN_LABEL.into(), count, true);
        return;
    };

    let payload = client.get_hs_codes().await;
    let load = payload.data;
    if load.is_fallback() {
        for failure in &load.failures {
            warn!(failure = %failure, "[hs-codes] source skipped");
        }
        push_toast(
            toasts,
            ToastKind::Warning,
            format!("HS code lookup fell back to the {}.", load.source),
        );
    }
    let count = load.codes.len();
    let degraded = load.is_fallback();
    state.with_mut(|st| st.hs_codes = load.codes);
    record(state, ReferenceResource::HsCodes, load.source, count, degraded);
}

#[component]
pub fn Calculator() -> Element {
    rsx! { Shell { CalculatorPage {} } }
}

#[component]
pub fn Sources() -> Element {
    rsx! { Shell { SourcesPage {} } }
}
