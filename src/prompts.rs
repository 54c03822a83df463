//! Prompts for the menu-suggestion completion.
//!
//! Every piece of prompt text sent to the model lives here.

use crate::request::NutritionTargets;
use std::fmt::Write as _;

/// Fixed system instruction describing the JSON shape of every option.
///
/// The same text is sent with every request.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a helpful assistant, that generates a response that just contains a JSON array, that follows this structure for each option: {
  "optionName": "",
  "energyAndMacros": {
    "energy": "",
    "protein": "",
    "carbs": "",
    "fat": ""
  }}"#;

/// Opening sentence of the user instruction.
pub const INTRODUCTION: &str = "I'm looking for the best food options to choose from at a restaurant to meet my nutritional goals. Here are my specific requirements:\n";

/// Closing directive of the user instruction.
pub const CLOSING_DIRECTIVE: &str = "Please provide a list of the 5 best options available at this type of restaurant that match these nutritional targets as closely as possible.";

/// The two instructions sent to the model, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Pair the fixed system instruction with a user instruction built from
    /// `menu_text` and `targets`.
    pub fn for_request(menu_text: &str, targets: &NutritionTargets) -> Self {
        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            user: build_user_prompt(menu_text, targets),
        }
    }
}

/// Build the per-request user instruction.
///
/// Clause order is fixed: meal time, energy, protein, carbs, fat, menu,
/// closing directive. The menu text is embedded verbatim.
pub fn build_user_prompt(menu_text: &str, targets: &NutritionTargets) -> String {
    let mut prompt = String::with_capacity(
        INTRODUCTION.len() + CLOSING_DIRECTIVE.len() + menu_text.len() + 160,
    );

    prompt.push_str(INTRODUCTION);
    // Writing into a String cannot fail.
    let _ = write!(prompt, "Meal Time: {},", targets.meal_time);
    let _ = write!(
        prompt,
        "Target Energy: {} {},",
        targets.target_energy, targets.energy_unit
    );
    let _ = write!(
        prompt,
        "Target Protein: {} {},",
        targets.protein, targets.weight_unit
    );
    let _ = write!(prompt, "Target Carbs: {} {},", targets.carbs, targets.weight_unit);
    let _ = write!(prompt, "Target Fat: {} {},", targets.fat, targets.weight_unit);
    let _ = write!(prompt, "This is the restaurant menu {}.", menu_text);
    prompt.push_str(CLOSING_DIRECTIVE);

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> NutritionTargets {
        NutritionTargets {
            meal_time: "lunch".into(),
            protein: 40,
            carbs: 50,
            fat: 15,
            target_energy: 600,
            energy_unit: "kcal".into(),
            weight_unit: "g".into(),
        }
    }

    #[test]
    fn lunch_scenario_clauses() {
        let p = build_user_prompt("Burger $5", &lunch());
        assert!(p.contains("Meal Time: lunch,"));
        assert!(p.contains("Target Energy: 600 kcal,"));
        assert!(p.contains("Target Protein: 40 g,"));
        assert!(p.contains("Target Carbs: 50 g,"));
        assert!(p.contains("Target Fat: 15 g,"));
        assert!(p.contains("This is the restaurant menu Burger $5."));
        assert!(p.starts_with(INTRODUCTION));
        assert!(p.ends_with(CLOSING_DIRECTIVE));
    }

    #[test]
    fn clauses_appear_once_in_fixed_order() {
        let p = build_user_prompt("Salad $7\nSoup $4", &lunch());
        let clauses = [
            "Meal Time: lunch,",
            "Target Energy: 600 kcal,",
            "Target Protein: 40 g,",
            "Target Carbs: 50 g,",
            "Target Fat: 15 g,",
            "This is the restaurant menu Salad $7\nSoup $4.",
            CLOSING_DIRECTIVE,
        ];
        let mut last = 0;
        for clause in clauses {
            assert_eq!(p.matches(clause).count(), 1, "clause {clause:?} in {p:?}");
            let at = p.find(clause).unwrap();
            assert!(at >= last, "clause {clause:?} out of order");
            last = at;
        }
    }

    #[test]
    fn length_grows_with_menu_text() {
        let targets = lunch();
        let mut previous = 0;
        for menu in ["", "a", "Burger $5", "Burger $5\nFries $2\nShake $4"] {
            let len = build_user_prompt(menu, &targets).len();
            assert!(len >= previous);
            previous = len;
        }
    }

    #[test]
    fn negative_values_are_not_altered() {
        let mut targets = lunch();
        targets.fat = -3;
        targets.target_energy = 0;
        let p = build_user_prompt("", &targets);
        assert!(p.contains("Target Fat: -3 g,"));
        assert!(p.contains("Target Energy: 0 kcal,"));
        assert!(p.contains("This is the restaurant menu ."));
    }

    #[test]
    fn system_instruction_names_every_field() {
        for field in ["optionName", "energyAndMacros", "energy", "protein", "carbs", "fat"] {
            assert!(SYSTEM_INSTRUCTION.contains(&format!("\"{field}\"")), "{field}");
        }
        let prompt = Prompt::for_request("x", &lunch());
        assert_eq!(prompt.system, SYSTEM_INSTRUCTION);
    }
}
