//! Typed view of the invocation payload.
//!
//! The runtime hands the handler an untyped JSON object whose `body` field
//! is itself a JSON document encoded as a string. [`NutritionRequest::from_payload`]
//! performs a single validating parse and reports every missing or invalid
//! field at once.

use crate::error::SuggestError;
use serde_json::{Map, Value};

/// Nutritional goals for one meal.
///
/// Values are passed to the prompt as given; no range checks are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionTargets {
    pub meal_time: String,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
    pub target_energy: i64,
    pub energy_unit: String,
    pub weight_unit: String,
}

/// One menu-suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionRequest {
    /// The menu PDF, base64-encoded.
    pub pdf: String,
    pub targets: NutritionTargets,
}

impl NutritionRequest {
    /// Parse the raw invocation payload (`{"body": "<json string>", ...}`).
    ///
    /// A `body` that is already a JSON object is accepted as well, which is
    /// what direct (non-API-Gateway) invocations tend to send.
    pub fn from_payload(payload: &Value) -> Result<Self, SuggestError> {
        let body = payload
            .get("body")
            .ok_or_else(|| SuggestError::InvalidPayload("missing 'body' field".into()))?;

        match body {
            Value::String(raw) => Self::from_body_str(raw),
            Value::Object(fields) => Self::from_fields(fields),
            other => Err(SuggestError::InvalidPayload(format!(
                "'body' must be a JSON string, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Parse the JSON text carried in `body`.
    pub fn from_body_str(raw: &str) -> Result<Self, SuggestError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| SuggestError::InvalidPayload(format!("'body' is not valid JSON: {e}")))?;
        match value {
            Value::Object(fields) => Self::from_fields(&fields),
            other => Err(SuggestError::InvalidPayload(format!(
                "'body' must encode a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, SuggestError> {
        let mut problems = Vec::new();

        let pdf = text_field(fields, "pdf", &mut problems);
        let meal_time = text_field(fields, "mealTime", &mut problems);
        let protein = int_field(fields, "protein", &mut problems);
        let carbs = int_field(fields, "carbs", &mut problems);
        let fat = int_field(fields, "fat", &mut problems);
        let target_energy = int_field(fields, "targetEnergy", &mut problems);
        let energy_unit = text_field(fields, "energyUnit", &mut problems);
        let weight_unit = text_field(fields, "weightUnit", &mut problems);

        if !problems.is_empty() {
            return Err(SuggestError::InputField { fields: problems });
        }

        // Every field is Some once `problems` is empty.
        match (
            pdf,
            meal_time,
            protein,
            carbs,
            fat,
            target_energy,
            energy_unit,
            weight_unit,
        ) {
            (
                Some(pdf),
                Some(meal_time),
                Some(protein),
                Some(carbs),
                Some(fat),
                Some(target_energy),
                Some(energy_unit),
                Some(weight_unit),
            ) => Ok(Self {
                pdf,
                targets: NutritionTargets {
                    meal_time,
                    protein,
                    carbs,
                    fat,
                    target_energy,
                    energy_unit,
                    weight_unit,
                },
            }),
            _ => Err(SuggestError::Internal(
                "request fields validated but incomplete".into(),
            )),
        }
    }
}

/// Read a text field. Numbers and booleans are accepted in their JSON form.
fn text_field(fields: &Map<String, Value>, name: &str, problems: &mut Vec<String>) -> Option<String> {
    match fields.get(name) {
        None | Some(Value::Null) => {
            problems.push(format!("{name} (missing)"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Some(v.to_string()),
        Some(other) => {
            problems.push(format!("{name} (expected text, got {})", json_type_name(other)));
            None
        }
    }
}

/// Read an integer given either as a JSON integer or as a decimal string.
fn int_field(fields: &Map<String, Value>, name: &str, problems: &mut Vec<String>) -> Option<i64> {
    let parsed = match fields.get(name) {
        None | Some(Value::Null) => {
            problems.push(format!("{name} (missing)"));
            return None;
        }
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Number(n)) => n.as_i64(),
        Some(_) => None,
    };

    if parsed.is_none() {
        let shown = match fields.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        };
        problems.push(format!("{name} (not an integer: '{shown}')"));
    }
    parsed
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
