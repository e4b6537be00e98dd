use maud::{Markup, html};

use crate::{
    endpoints,
    goal::{Goal, GoalDraft, progress_label, progress_percent},
    html::{form_input, format_currency},
    record::RecordView,
    store::Record,
};

impl RecordView for Goal {
    type Draft = GoalDraft;

    const TITLE: &'static str = "Goals";
    const NOUN: &'static str = "Goal";
    const PAGE: &'static str = endpoints::GOALS_VIEW;
    const CREATE: &'static str = endpoints::GOALS_API;
    const RECORD: &'static str = endpoints::GOAL;
    const EDIT_FORM: &'static str = endpoints::EDIT_GOAL_FORM;
    const EMPTY_FORM: &'static str = endpoints::GOAL_FORM;
    const STREAM: &'static str = endpoints::GOALS_STREAM;
    const EMPTY_MESSAGE: &'static str = "No goals found. Add a new goal to get started!";

    fn card(record: &Record<Self>) -> Markup {
        let goal = &record.fields;
        let percent = progress_percent(goal.current_amount, goal.target_amount);
        let label = progress_label(percent);

        html! {
            div class="text-sm font-semibold text-gray-900 dark:text-white" { (goal.name) }

            p class="mt-1 text-sm tabular-nums text-gray-500 dark:text-gray-400"
            {
                (format_currency(goal.current_amount)) " / " (format_currency(goal.target_amount))
            }

            div
                class="mt-2 w-full h-4 rounded-full bg-gray-200 dark:bg-gray-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=(percent.round())
            {
                div
                    class="h-4 rounded-full bg-blue-600 text-xs font-medium text-center text-white leading-4"
                    style={ "width: " (percent) "%" }
                {
                    (label)
                }
            }
        }
    }

    fn form_fields(draft: &GoalDraft) -> Markup {
        html! {
            (form_input("Goal", "name", "text", &draft.name, "Goal Title (e.g. Rent)"))
            (form_input("Goal amount", "targetAmount", "number", &draft.target_amount, "Goal Amount"))
            (form_input("Current saved", "currentAmount", "number", &draft.current_amount, "Current Saved"))
        }
    }
}
