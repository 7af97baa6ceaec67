use dioxus::prelude::*;

use tariff_calculator::domain::FormField;

/// One `<option>` of a picker.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Options sharing an `<optgroup>`; unlabelled groups render inline.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceGroup {
    pub label: Option<String>,
    pub choices: Vec<Choice>,
}

impl ChoiceGroup {
    pub fn flat(choices: Vec<Choice>) -> Self {
        Self {
            label: None,
            choices,
        }
    }
}

/// Labelled input for one calculation field. Renders a `<select>` when
/// `choices` is given, a number input when the field has a step, text otherwise.
#[component]
pub fn FieldInput(
    field: FormField,
    value: String,
    choices: Option<Vec<ChoiceGroup>>,
    placeholder: Option<String>,
    onchange: EventHandler<(FormField, String)>,
) -> Element {
    let id = format!("field-{field:?}").to_lowercase();
    let placeholder = placeholder.unwrap_or_default();

    rsx! {
        div { class: "tc-field",
            label { r#for: "{id}", "{field.label()}" }
            match (choices, field.step()) {
                (Some(groups), _) => rsx! {
                    select {
                        id: "{id}",
                        value: "{value}",
                        onchange: move |evt: FormEvent| onchange.call((field, evt.value())),
                        if !placeholder.is_empty() {
                            option { value: "", disabled: true, selected: value.is_empty(), "{placeholder}" }
                        }
                        for group in groups {
                            if let Some(label) = group.label {
                                optgroup { key: "{label}", label: "{label}",
                                    for choice in group.choices {
                                        option {
                                            key: "{choice.value}",
                                            value: "{choice.value}",
                                            selected: choice.value == value,
                                            "{choice.label}"
                                        }
                                    }
                                }
                            } else {
                                for choice in group.choices {
                                    option {
                                        key: "{choice.value}",
                                        value: "{choice.value}",
                                        selected: choice.value == value,
                                        "{choice.label}"
                                    }
                                }
                            }
                        }
                    }
                },
                (None, Some(step)) => rsx! {
                    input {
                        id: "{id}",
                        r#type: "number",
                        step: step,
                        placeholder: "{placeholder}",
                        value: "{value}",
                        oninput: move |evt: FormEvent| onchange.call((field, evt.value())),
                    }
                },
                (None, None) => rsx! {
                    input {
                        id: "{id}",
                        r#type: "text",
                        placeholder: "{placeholder}",
                        value: "{value}",
                        oninput: move |evt: FormEvent| onchange.call((field, evt.value())),
                    }
                },
            }
        }
    }
}
