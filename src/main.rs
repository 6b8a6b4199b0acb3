//! NutriLens
//!
//! An MCP server for personalized nutrition tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nutrilens::analysis::{FoodAnalyzer, HttpFoodAnalyzer};
use nutrilens::build_info;
use nutrilens::config::Config;
use nutrilens::db;
use nutrilens::mcp::NutriLensService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries MCP
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilens=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let analyzer: Option<Arc<dyn FoodAnalyzer>> = match &config.analysis_url {
        Some(url) => {
            let analyzer = HttpFoodAnalyzer::new(url, config.analysis_timeout)?;
            info!("Meal analysis endpoint: {}", analyzer.endpoint());
            Some(Arc::new(analyzer))
        }
        None => {
            warn!("No analysis endpoint configured; analyze_meal_photo is disabled");
            None
        }
    };

    let service = NutriLensService::new(&config, database, analyzer);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
