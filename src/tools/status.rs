//! NutriLens Status Tool
//!
//! Runtime status of the service and usage instructions for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// How to use the NutriLens tools, for AI assistants
pub const NUTRITION_INSTRUCTIONS: &str = r#"
# NutriLens Instructions

NutriLens keeps one user profile and daily logs (meals, water, blood sugar,
medication reminders), and computes personalized nutrition targets from the
profile.

---

## 1. Set up the profile first

Targets, recommendations, screening and daily summaries all need a profile.

**Tool:** `set_profile`
- `gender`: "male" or "female"
- `height_cm`, `weight_kg`, `age_years`: must be positive
- `goals`: any of `weight_loss`, `muscle_gain`, `maintain_weight`,
  `diabetes_management`, `heart_health`, `energy_boost`, `better_sleep`
- `medical_conditions`: e.g. `diabetes`, `hypertension`, `heart_disease`,
  `kidney_disease`, `celiac_disease`, `ibs`
- `allergies`: e.g. `peanuts`, `tree_nuts`, `dairy`, `eggs`, `wheat`, `soy`,
  `shellfish`, `fish`, `gluten`

Use `update_profile` to change individual fields later (weight changes are the
common case). Unknown goal, condition or allergy tags are kept but have no
effect on calculations.

---

## 2. How targets are calculated

| Step | Rule |
|------|------|
| BMR | Mifflin-St Jeor: 10 x kg + 6.25 x cm - 5 x age, +5 (male) / -161 (female) |
| TDEE | BMR x 1.55 (moderate activity), rounded |
| Calories | weight_loss -500, muscle_gain +300, maintain_weight resets to 0; never below 1200 |
| Macros | 30/40/30 protein/carbs/fat; muscle_gain 35/40/25; weight_loss 35/35/30; diabetes_management 30/30/40 |
| Water | kg x 33 ml / 250 ml per glass, between 6 and 12 glasses |

Call `explain_targets` to show the user each step with their numbers.
`calculate_targets` works without a stored profile (for "what if" questions).

---

## 3. Logging a meal from a photo

1. `analyze_meal_photo` with exactly one of `image_path`, `image_base64` or
   `image_url`. The result lists detected foods with portions, nutrition,
   allergen flags and health warnings, plus a screening report against the
   profile.
2. **Always relay allergen alerts to the user before logging.** Ask whether
   to drop flagged items.
3. `log_meal` with the items to keep. Set `meal_type` (breakfast, lunch,
   dinner, snack) and `date` (YYYY-MM-DD, defaults to today).

Set `log: true` on `analyze_meal_photo` to log all detected items in one step
when the user has already confirmed.

Meals can also be logged by hand: pass items with `name`, `portion` and
`calories`/`protein`/`carbs`/`fat`.

For ideas, `suggest_meals` asks the analysis backend for meals that fit what
is left of the day's targets. Log the one the user picks with `log_meal`.

---

## 4. Other daily logs

| What | Tools |
|------|-------|
| Water | `log_water` (glasses, negative to undo), `get_water` |
| Blood sugar | `log_blood_sugar` (mg/dL + measurement type), `list_blood_sugar` |
| Medications | `add_medication_reminder`, `list_medication_reminders`, `mark_medication_taken`, `set_medication_active`, `delete_medication_reminder` |

Blood sugar status bands:
- fasting / before_meal: <70 low, <=100 normal, <=125 elevated, above high
- after_meal / bedtime / random: <70 low, <=140 normal, <=180 elevated, above high

---

## 5. Progress

- `get_daily_summary`: consumed vs. target calories, macros and water for a date
- `get_insights`: protein against target, goal tips and a hydration reminder
- `get_streak`: current and longest logging streak, earned badges

---

## Dates

All dates are `YYYY-MM-DD`. When the user says "today" or "yesterday", resolve
it from a reliable clock rather than guessing; omitted dates default to the
server's local date.

## Medical note

Guidance is general information, not medical advice. For conditions like
kidney disease or diabetes, suggest the user confirm targets with their care
team.
"#;

/// Runtime status of the NutriLens service
#[derive(Debug, Clone, Serialize)]
pub struct NutriLensStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Meal analysis endpoint, if configured
    pub analysis_url: Option<String>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    analysis_url: Option<String>,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, analysis_url: Option<String>) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            analysis_url,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NutriLensStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriLensStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            analysis_url: self.analysis_url.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/nutrilens.db"), None);
        let status = tracker.get_status();

        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert!(status.analysis_url.is_none());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_instructions_name_every_logging_tool() {
        for tool in [
            "set_profile",
            "analyze_meal_photo",
            "log_meal",
            "log_water",
            "log_blood_sugar",
            "add_medication_reminder",
            "suggest_meals",
            "get_daily_summary",
            "get_insights",
            "get_streak",
        ] {
            assert!(NUTRITION_INSTRUCTIONS.contains(tool), "{}", tool);
        }
    }
}
