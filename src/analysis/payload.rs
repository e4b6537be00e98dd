//! The request body of the analysis endpoint and the prompt built from it.

use serde::Deserialize;
use serde_json::Value;

/// The records to analyze.
///
/// Both keys are optional and a `null` reads the same as a missing key. The
/// elements are passed to the model as they were posted.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    transactions: Option<Vec<Value>>,
    #[serde(default)]
    goals: Option<Vec<Value>>,
}

impl AnalyzeRequest {
    pub fn new(transactions: Vec<Value>, goals: Vec<Value>) -> Self {
        Self {
            transactions: Some(transactions),
            goals: Some(goals),
        }
    }

    pub fn transactions(&self) -> &[Value] {
        self.transactions.as_deref().unwrap_or_default()
    }

    pub fn goals(&self) -> &[Value] {
        self.goals.as_deref().unwrap_or_default()
    }
}

/// Build the prompt asking for three insights about the posted records.
pub fn build_prompt(request: &AnalyzeRequest) -> String {
    let transactions = Value::from(request.transactions().to_vec());
    let goals = Value::from(request.goals().to_vec());

    format!(
        "Based on this user's transactions and goals, provide 3 friendly financial insights.\n\n\
        Transactions:\n{transactions:#}\n\n\
        Goals:\n{goals:#}\n\n\
        Use a helpful, encouraging tone. Be specific."
    )
}

#[cfg(test)]
mod prompt_tests {
    use serde_json::json;

    use super::{AnalyzeRequest, build_prompt};

    #[test]
    fn missing_and_null_keys_are_empty() {
        let missing: AnalyzeRequest = serde_json::from_value(json!({})).unwrap();
        let null: AnalyzeRequest =
            serde_json::from_value(json!({ "transactions": null, "goals": null })).unwrap();

        assert!(missing.transactions().is_empty());
        assert!(missing.goals().is_empty());
        assert!(null.transactions().is_empty());
        assert!(null.goals().is_empty());
    }

    #[test]
    fn prompt_embeds_pretty_printed_records() {
        let request = AnalyzeRequest::new(
            vec![json!({ "amount": 50, "category": "food" })],
            vec![],
        );

        let prompt = build_prompt(&request);

        assert!(prompt.starts_with(
            "Based on this user's transactions and goals, provide 3 friendly financial insights."
        ));
        assert!(prompt.contains(
            "Transactions:\n[\n  {\n    \"amount\": 50,\n    \"category\": \"food\"\n  }\n]"
        ));
        assert!(prompt.contains("Goals:\n[]"));
        assert!(prompt.ends_with("Use a helpful, encouraging tone. Be specific."));
    }
}
