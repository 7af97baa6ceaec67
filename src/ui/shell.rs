use dioxus::prelude::*;

use tariff_calculator::util::version::{version_label, APP_NAME};

use crate::app::Route;

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        div { class: "tc-shell",
            header { class: "tc-header",
                div {
                    h1 { "{APP_NAME}" }
                    p { "Landed-cost impact of a tariff change on one import" }
                }
                nav { class: "tc-nav",
                    NavButton {
                        active: matches!(current_route, Route::Calculator {}),
                        onclick: move |_| { nav.push(Route::Calculator {}); },
                        label: "Calculator",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Sources {}),
                        onclick: move |_| { nav.push(Route::Sources {}); },
                        label: "Data Sources",
                    }
                }
            }
            main { class: "tc-main", {children} }
            footer { class: "tc-footer", "{APP_NAME} {version_label()}" }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: if active { "active" } else { "" },
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
