//! Progress MCP Tools
//!
//! Logging streaks, badges, the daily summary and its insights. Everything
//! here is derived from stored meals and water on each call.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::water::water_goal;
use super::{format_date, resolve_date, today};
use crate::db::Database;
use crate::models::{Meal, Nutrition, UserProfile, WaterLog};
use crate::nutrition::calculator::round_half_up;
use crate::nutrition::goals::{self, has_tag};
use crate::nutrition::{calculate_nutrition_targets, NutritionTargets};

/// Streak counts over a set of logged dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_logs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BadgeRule {
    TotalLogs(u32),
    LongestStreak(u32),
}

struct BadgeDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    rule: BadgeRule,
}

const BADGES: &[BadgeDef] = &[
    BadgeDef {
        id: "first_log",
        name: "First Log",
        description: "Logged your first meal",
        rule: BadgeRule::TotalLogs(1),
    },
    BadgeDef {
        id: "week_streak",
        name: "Week Warrior",
        description: "Logged meals 7 days in a row",
        rule: BadgeRule::LongestStreak(7),
    },
    BadgeDef {
        id: "dedication",
        name: "Dedicated",
        description: "Logged meals 14 days in a row",
        rule: BadgeRule::LongestStreak(14),
    },
    BadgeDef {
        id: "month_streak",
        name: "Monthly Master",
        description: "Logged meals 30 days in a row",
        rule: BadgeRule::LongestStreak(30),
    },
    BadgeDef {
        id: "century",
        name: "Century",
        description: "Logged meals on 100 days",
        rule: BadgeRule::TotalLogs(100),
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

/// Response for get_streak
#[derive(Debug, Serialize)]
pub struct StreakResponse {
    #[serde(flatten)]
    pub stats: StreakStats,
    pub last_logged: Option<String>,
    pub badges: Vec<Badge>,
}

/// Consumed versus target for a day
#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: String,
    /// None until a profile exists
    pub targets: Option<NutritionTargets>,
    pub consumed: Nutrition,
    /// Target minus consumed; negative when over
    pub remaining: Option<Nutrition>,
    pub meals_logged: usize,
    pub water_glasses: i64,
    pub water_goal_glasses: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Trend,
    Gap,
    Timing,
    Tip,
}

/// One short observation about a day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub id: &'static str,
    pub kind: InsightKind,
    pub title: &'static str,
    pub message: String,
}

impl Insight {
    fn new(id: &'static str, kind: InsightKind, title: &'static str, message: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            title,
            message: message.into(),
        }
    }
}

/// Response for get_insights
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub date: String,
    pub insights: Vec<Insight>,
}

/// Current and longest runs of consecutive dates
///
/// The current streak only counts when the latest run reaches today or
/// yesterday. Duplicate dates count once.
pub fn compute_streak(dates: &[NaiveDate], today: NaiveDate) -> StreakStats {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().filter(|d| *d <= today).collect();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for day in &days {
        run = match previous {
            Some(p) if *day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    let current = match previous {
        Some(last) if today - last <= Duration::days(1) => run,
        _ => 0,
    };

    StreakStats {
        current_streak: current,
        longest_streak: longest,
        total_logs: days.len() as u32,
    }
}

/// Every badge with whether the stats have earned it
pub fn badges_for(stats: &StreakStats) -> Vec<Badge> {
    BADGES
        .iter()
        .map(|b| Badge {
            id: b.id,
            name: b.name,
            description: b.description,
            earned: match b.rule {
                BadgeRule::TotalLogs(n) => stats.total_logs >= n,
                BadgeRule::LongestStreak(n) => stats.longest_streak >= n,
            },
        })
        .collect()
}

/// Insights for a day's summary
///
/// Protein is measured against the day's computed protein target, so the
/// protein insights need a profile. The hydration tip is always last.
pub fn generate_insights<S: AsRef<str>>(summary: &DailySummary, goals: &[S]) -> Vec<Insight> {
    let mut insights = Vec::new();

    let protein_pct = summary
        .targets
        .as_ref()
        .filter(|t| t.protein_g > 0 && summary.consumed.protein > 0.0)
        .map(|t| summary.consumed.protein / t.protein_g as f64 * 100.0);

    match protein_pct {
        Some(pct) if pct > 120.0 => insights.push(Insight::new(
            "protein-high",
            InsightKind::Trend,
            "Protein Intake",
            format!(
                "Your protein intake is {}% above target today. Great for muscle building!",
                round_half_up(pct - 100.0)
            ),
        )),
        Some(pct) if pct < 50.0 && summary.meals_logged > 0 => insights.push(Insight::new(
            "protein-low",
            InsightKind::Gap,
            "Protein Gap",
            "Consider adding protein-rich foods like eggs, chicken, or legumes to meet your daily target.",
        )),
        _ => {}
    }

    if summary.meals_logged == 0 {
        insights.push(Insight::new(
            "first-meal",
            InsightKind::Tip,
            "Get Started",
            "Upload your first meal to begin tracking! Take a photo of your breakfast to kickstart your nutrition journey.",
        ));
    }

    if has_tag(goals, goals::WEIGHT_LOSS) {
        insights.push(Insight::new(
            "weight-loss-tip",
            InsightKind::Tip,
            "Weight Loss Tip",
            "Eating protein with every meal helps maintain muscle mass while losing fat. Aim for 30g per meal.",
        ));
    }

    if has_tag(goals, goals::DIABETES_MANAGEMENT) {
        insights.push(Insight::new(
            "diabetes-tip",
            InsightKind::Timing,
            "Blood Sugar Tip",
            "Pair carbs with protein or healthy fats to slow glucose absorption and prevent blood sugar spikes.",
        ));
    }

    if insights.is_empty() {
        insights.push(Insight::new(
            "default-1",
            InsightKind::Tip,
            "Nutrition Tip",
            "Colorful vegetables provide diverse micronutrients. Try to include 5 different colors on your plate today!",
        ));
    }

    insights.push(Insight::new(
        "hydration",
        InsightKind::Tip,
        "Stay Hydrated",
        "Drinking water before meals can help with portion control and improve digestion.",
    ));

    insights
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Meal logging streak and badges
pub fn get_streak(db: &Database) -> Result<StreakResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let raw = Meal::list_dates(&conn).map_err(|e| format!("Failed to list meal dates: {}", e))?;
    let dates: Vec<NaiveDate> = raw
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .collect();

    let stats = compute_streak(&dates, today());

    Ok(StreakResponse {
        last_logged: dates.iter().max().map(|d| format_date(*d)),
        badges: badges_for(&stats),
        stats,
    })
}

/// Targets, consumption and water for a date
pub fn get_daily_summary(db: &Database, date: Option<&str>) -> Result<DailySummary, String> {
    let date = format_date(resolve_date(date)?);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::get(&conn).map_err(|e| format!("Failed to load profile: {}", e))?;
    let consumed = Meal::day_totals(&conn, &date)
        .map_err(|e| format!("Failed to total meals: {}", e))?
        .rounded();
    let meals_logged = Meal::list_for_date(&conn, &date)
        .map_err(|e| format!("Failed to list meals: {}", e))?
        .len();
    let water_glasses =
        WaterLog::day_total(&conn, &date).map_err(|e| format!("Failed to total water: {}", e))?;

    let targets = profile
        .as_ref()
        .map(|p| calculate_nutrition_targets(p.gender(), &p.biometrics(), &p.goals));
    let remaining = targets.as_ref().map(|t| {
        Nutrition::new(
            t.target_calories as f64 - consumed.calories,
            t.protein_g as f64 - consumed.protein,
            t.carbs_g as f64 - consumed.carbs,
            t.fats_g as f64 - consumed.fat,
        )
        .rounded()
    });

    Ok(DailySummary {
        date,
        targets,
        consumed,
        remaining,
        meals_logged,
        water_glasses,
        water_goal_glasses: water_goal(profile.as_ref()),
    })
}

/// Insights for a date, using the profile's goals when one exists
pub fn get_insights(db: &Database, date: Option<&str>) -> Result<InsightsResponse, String> {
    let summary = get_daily_summary(db, date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let goals = UserProfile::get(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .map(|p| p.goals)
        .unwrap_or_default();

    Ok(InsightsResponse {
        insights: generate_insights(&summary, &goals),
        date: summary.date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealCreate, MealItemCreate, MealType, ProfileData};
    use crate::nutrition::{ActivityLevel, Gender};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_streak_ending_today() {
        let dates = [d("2026-10-17"), d("2026-10-18"), d("2026-10-19"), d("2026-10-19")];
        let stats = compute_streak(&dates, d("2026-10-19"));
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_logs, 3);
    }

    #[test]
    fn test_streak_ending_yesterday_still_counts() {
        let dates = [d("2026-10-17"), d("2026-10-18")];
        assert_eq!(compute_streak(&dates, d("2026-10-19")).current_streak, 2);
    }

    #[test]
    fn test_broken_streak() {
        let dates = [
            d("2026-10-01"),
            d("2026-10-02"),
            d("2026-10-03"),
            d("2026-10-04"),
            d("2026-10-16"),
        ];
        let stats = compute_streak(&dates, d("2026-10-19"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 4);
        assert_eq!(stats.total_logs, 5);

        assert_eq!(compute_streak(&[], d("2026-10-19")), StreakStats {
            current_streak: 0,
            longest_streak: 0,
            total_logs: 0,
        });
    }

    #[test]
    fn test_badges() {
        let stats = StreakStats {
            current_streak: 0,
            longest_streak: 14,
            total_logs: 20,
        };
        let earned: Vec<&str> = badges_for(&stats)
            .into_iter()
            .filter(|b| b.earned)
            .map(|b| b.id)
            .collect();
        assert_eq!(earned, vec!["first_log", "week_streak", "dedication"]);
    }

    #[test]
    fn test_daily_summary() {
        let db = Database::in_memory().unwrap();

        let empty = get_daily_summary(&db, Some("2026-10-19")).unwrap();
        assert!(empty.targets.is_none());
        assert_eq!(empty.water_goal_glasses, 8);

        {
            let mut conn = db.get_conn().unwrap();
            UserProfile::upsert(
                &conn,
                &ProfileData {
                    first_name: "Alex".into(),
                    last_name: String::new(),
                    email: None,
                    gender: Gender::Male,
                    height_cm: 170.0,
                    weight_kg: 70.0,
                    age_years: 30,
                    activity_level: ActivityLevel::Moderate,
                    goals: vec!["weight_loss".into()],
                    medical_conditions: vec![],
                    allergies: vec![],
                    water_goal_glasses: None,
                    notifications_enabled: true,
                },
            )
            .unwrap();
            Meal::create(
                &mut conn,
                &MealCreate {
                    date: "2026-10-19".into(),
                    meal_type: MealType::Dinner,
                    name: None,
                    image_ref: None,
                    notes: None,
                    items: vec![MealItemCreate {
                        name: "Pasta".into(),
                        confidence: 1.0,
                        portion: "1 plate".into(),
                        nutrition: Nutrition::new(2100.0, 60.0, 250.0, 80.0),
                        allergens: vec![],
                        health_warnings: vec![],
                    }],
                    totals: None,
                },
            )
            .unwrap();
            WaterLog::add(&conn, "2026-10-19", 4).unwrap();
        }

        let summary = get_daily_summary(&db, Some("2026-10-19")).unwrap();
        assert_eq!(summary.meals_logged, 1);
        assert_eq!(summary.water_glasses, 4);
        assert_eq!(summary.water_goal_glasses, 9);

        let remaining = summary.remaining.unwrap();
        assert_eq!(remaining.calories, 2007.0 - 2100.0);
        assert_eq!(remaining.protein, 176.0 - 60.0);
        assert_eq!(remaining.fat, 67.0 - 80.0);
    }

    #[test]
    fn test_get_streak_from_meals() {
        let db = Database::in_memory().unwrap();
        let response = get_streak(&db).unwrap();
        assert_eq!(response.stats.total_logs, 0);
        assert!(response.last_logged.is_none());
        assert!(response.badges.iter().all(|b| !b.earned));
    }

    const NO_GOALS: [&str; 0] = [];

    fn summary(protein_target: Option<i64>, protein: f64, meals_logged: usize) -> DailySummary {
        let targets = protein_target.map(|protein_g| NutritionTargets {
            bmr: 1618,
            tdee: 2507,
            target_calories: 2507,
            protein_g,
            carbs_g: 219,
            fats_g: 84,
            water_glasses: 9,
        });
        DailySummary {
            date: "2026-10-19".into(),
            targets,
            consumed: Nutrition::new(0.0, protein, 0.0, 0.0),
            remaining: None,
            meals_logged,
            water_glasses: 0,
            water_goal_glasses: 8,
        }
    }

    fn ids(insights: &[Insight]) -> Vec<&'static str> {
        insights.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_insights_protein_high() {
        let insights = generate_insights(&summary(Some(100), 135.4, 2), &NO_GOALS);
        assert_eq!(ids(&insights), vec!["protein-high", "hydration"]);
        assert_eq!(insights[0].kind, InsightKind::Trend);
        assert_eq!(
            insights[0].message,
            "Your protein intake is 35% above target today. Great for muscle building!"
        );

        // Between 50% and 120% says nothing about protein
        let at_edge = generate_insights(&summary(Some(100), 119.0, 2), &NO_GOALS);
        assert_eq!(ids(&at_edge), vec!["default-1", "hydration"]);
    }

    #[test]
    fn test_insights_protein_gap_needs_a_meal() {
        let insights = generate_insights(&summary(Some(176), 40.0, 1), &NO_GOALS);
        assert_eq!(ids(&insights), vec!["protein-low", "hydration"]);
        assert_eq!(insights[0].kind, InsightKind::Gap);

        // Zero protein skips the protein rules entirely
        let nothing = generate_insights(&summary(Some(176), 0.0, 1), &NO_GOALS);
        assert_eq!(ids(&nothing), vec!["default-1", "hydration"]);
    }

    #[test]
    fn test_insights_without_targets_skip_protein() {
        let insights = generate_insights(&summary(None, 500.0, 3), &NO_GOALS);
        assert_eq!(ids(&insights), vec!["default-1", "hydration"]);
    }

    #[test]
    fn test_insights_first_meal_and_goal_tips() {
        let insights = generate_insights(
            &summary(Some(176), 0.0, 0),
            &["weight_loss", "diabetes_management"],
        );
        assert_eq!(
            ids(&insights),
            vec!["first-meal", "weight-loss-tip", "diabetes-tip", "hydration"]
        );
        assert_eq!(insights[2].kind, InsightKind::Timing);
        assert_eq!(insights[2].title, "Blood Sugar Tip");
        assert_eq!(insights[3].title, "Stay Hydrated");
    }

    #[test]
    fn test_get_insights_without_profile() {
        let db = Database::in_memory().unwrap();
        let response = get_insights(&db, Some("2026-10-19")).unwrap();
        assert_eq!(response.date, "2026-10-19");
        assert_eq!(ids(&response.insights), vec!["first-meal", "hydration"]);
    }
}
