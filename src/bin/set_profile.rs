//! Utility to set the user profile from the command line
//!
//! Usage:
//!   set_profile <first_name> <male|female> <height_cm> <weight_kg> <age_years>
//!               [goals=a,b] [conditions=a,b] [allergies=a,b] [water=glasses]

use nutrilens::config::Config;
use nutrilens::db::{migrations, Database};
use nutrilens::tools::profile::{set_profile, ProfileInput};

const USAGE: &str = "usage: set_profile <first_name> <male|female> <height_cm> <weight_kg> <age_years> \
                     [goals=a,b] [conditions=a,b] [allergies=a,b] [water=glasses]";

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_args(args: &[String]) -> Result<ProfileInput, String> {
    if args.len() < 5 {
        return Err(USAGE.to_string());
    }
    let number = |name: &str, v: &str| -> Result<f64, String> {
        v.parse::<f64>().map_err(|_| format!("{} must be a number, got '{}'", name, v))
    };

    let mut input = ProfileInput {
        first_name: args[0].clone(),
        gender: args[1].clone(),
        height_cm: number("height_cm", &args[2])?,
        weight_kg: number("weight_kg", &args[3])?,
        age_years: args[4]
            .parse()
            .map_err(|_| format!("age_years must be a whole number, got '{}'", args[4]))?,
        notifications_enabled: true,
        complete_onboarding: true,
        ..Default::default()
    };

    for extra in &args[5..] {
        match extra.split_once('=') {
            Some(("goals", v)) => input.goals = split_list(v),
            Some(("conditions", v)) => input.medical_conditions = split_list(v),
            Some(("allergies", v)) => input.allergies = split_list(v),
            Some(("water", v)) => {
                input.water_goal_glasses = Some(
                    v.parse()
                        .map_err(|_| format!("water must be a whole number, got '{}'", v))?,
                )
            }
            _ => return Err(format!("Unknown argument '{}'\n{}", extra, USAGE)),
        }
    }
    Ok(input)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = parse_args(&args)?;

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let saved = set_profile(&database, input)?;
    let t = &saved.targets;
    println!("Profile set for {}:", saved.profile.full_name());
    println!("  BMI: {} ({})", saved.bmi.bmi, saved.bmi.category.as_str());
    println!("  BMR: {} kcal | TDEE: {} kcal", t.bmr, t.tdee);
    println!("  Target: {} kcal", t.target_calories);
    println!(
        "  Protein {} g | Carbs {} g | Fat {} g",
        t.protein_g, t.carbs_g, t.fats_g
    );
    println!("  Water: {} glasses", t.water_glasses);

    Ok(())
}
