use maud::{Markup, PreEscaped, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

/// The element the generated insights are swapped into.
pub const INSIGHTS_ID: &str = "insights";

/// Hides the idle button label while a request is running.
const INDICATOR_STYLE: &str = r#"
    .htmx-request .idle-label,
    .htmx-request.idle-label {
        display: none;
    }
"#;

/// How often a page opened mid-request checks whether the request is done.
const LOADING_POLL_TRIGGER: &str = "every 2s";

/// The insights text with its line breaks kept, or the prompt to generate
/// some when there is none yet.
pub fn insights_card(text: Option<&str>) -> Markup {
    html! {
        div class={ (CARD_STYLE) " w-full" }
        {
            @if let Some(text) = text
            {
                h2 class="text-lg font-semibold" { "AI-Generated Insights" }
                hr class="my-2 border-gray-300 dark:border-gray-600";
                p class="text-gray-700 dark:text-gray-300" style="white-space: pre-line"
                {
                    (text)
                }
            }
            @else
            {
                p class="text-center text-gray-500 dark:text-gray-400"
                {
                    "Click \"Generate AI Insights\" to get started."
                }
            }
        }
    }
}

/// The insights page.
///
/// While a request started elsewhere is still running the page reloads its
/// `main` element until the request is done, which re-enables the button.
pub fn insights_page_view(latest: Option<&str>, is_loading: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::INSIGHTS_VIEW).into_html();
    let poll_url = is_loading.then_some(endpoints::INSIGHTS_VIEW);
    let poll_trigger = is_loading.then_some(LOADING_POLL_TRIGGER);

    let content = html! {
        (nav_bar)

        main
            class=(PAGE_CONTAINER_STYLE)
            hx-get=[poll_url]
            hx-trigger=[poll_trigger]
            hx-select=[is_loading.then_some("main")]
            hx-target=[is_loading.then_some("this")]
            hx-swap=[is_loading.then_some("outerHTML")]
            hx-disinherit=[is_loading.then_some("*")]
        {
            section class="w-full max-w-2xl space-y-6"
            {
                h1 class="text-xl font-bold text-center" { "Financial Insights" }

                div class="mx-auto max-w-xs"
                {
                    button
                        type="button"
                        id="generate-insights"
                        class=(BUTTON_PRIMARY_STYLE)
                        hx-post=(endpoints::INSIGHTS_API)
                        hx-target={ "#" (INSIGHTS_ID) }
                        hx-swap="innerHTML"
                        hx-disabled-elt="this"
                        hx-indicator=".insights-indicator"
                        disabled[is_loading]
                    {
                        span class="htmx-indicator insights-indicator"
                        {
                            (loading_spinner())
                            "Generating..."
                        }
                        span class="idle-label insights-indicator"
                        {
                            @if is_loading { "Generating..." } @else { "Generate AI Insights" }
                        }
                    }
                }

                div
                    class="htmx-indicator insights-indicator text-center"
                {
                    (loading_spinner())
                    "Generating insights..."
                }

                div id=(INSIGHTS_ID)
                {
                    (insights_card(latest))
                }
            }
        }
    };

    base(
        "Insights",
        &[HeadElement::Style(PreEscaped(INDICATOR_STYLE.to_owned()))],
        &content,
    )
}
