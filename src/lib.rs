//! NutriLens Library
//!
//! Personalized nutrition targets, dietary guidance, meal photo analysis and
//! daily health logs, served over MCP.

pub mod analysis;
pub mod build_info;
pub mod config;
pub mod db;
pub mod guidance;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
