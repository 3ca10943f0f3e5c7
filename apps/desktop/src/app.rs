//! The query form — one input, one submit button, one read-only answer area.

use dioxus::prelude::*;

use crate::client;

static APP_CSS: Asset = asset!("/assets/styles/app.css");

#[component]
pub fn App() -> Element {
    let mut input_value = use_signal(String::new);
    let mut entity_summary = use_signal(String::new);

    rsx! {
        document::Stylesheet { href: APP_CSS }

        div {
            class: "app",

            header {
                class: "app-header",
                h1 { "Legal Insights" }
            }

            div {
                class: "app-body",

                div {
                    class: "query-row",

                    input {
                        class: "query-input",
                        r#type: "text",
                        value: "{input_value}",
                        placeholder: "Enter Entity",
                        autofocus: true,
                        oninput: move |e: Event<FormData>| {
                            input_value.set(e.value());
                        },
                    }

                    button {
                        class: "query-submit",
                        onclick: move |_| {
                            // Value is read at submission time; each click is an
                            // independent request with no cancellation, so
                            // overlapping submissions resolve last-writer-wins.
                            let entity = input_value();
                            tracing::debug!(entity = entity.as_str(), "Submitting query");
                            spawn(async move {
                                let summary =
                                    client::fetch_entity_summary(&client::api_base_url(), &entity)
                                        .await;
                                entity_summary.set(summary);
                            });
                        },
                        "Submit"
                    }
                }

                // Answer area appears only once a submission has completed
                if !entity_summary().is_empty() {
                    div {
                        class: "entity-summary",
                        textarea {
                            class: "summary-text",
                            readonly: true,
                            value: "{entity_summary}",
                        }
                    }
                }
            }
        }
    }
}
