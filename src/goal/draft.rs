use serde::Deserialize;

use crate::{
    goal::Goal,
    record::{Draft, DraftError, number, required},
};

/// The goal form as typed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_amount: String,
    #[serde(default)]
    pub current_amount: String,
}

impl Draft for GoalDraft {
    type Kind = Goal;

    fn from_record(fields: &Goal) -> Self {
        Self {
            name: fields.name.clone(),
            target_amount: fields.target_amount.to_string(),
            current_amount: fields.current_amount.to_string(),
        }
    }

    fn parse(&self) -> Result<Goal, DraftError> {
        Ok(Goal {
            name: required("Goal name", &self.name)?,
            target_amount: number("Goal amount", &self.target_amount)?,
            current_amount: number("Current saved", &self.current_amount)?,
        })
    }
}
