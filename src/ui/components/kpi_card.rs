use dioxus::prelude::*;

#[component]
pub fn KpiCard(
    title: String,
    value: String,
    description: Option<String>,
    #[props(default)] accent: bool,
) -> Element {
    let value_class = if accent { "value accent" } else { "value" };
    rsx! {
        div {
            class: "tc-kpi",
            h3 { "{title}" }
            p { class: "{value_class}", "{value}" }
            if let Some(desc) = description {
                p { class: "hint", "{desc}" }
            }
        }
    }
}
