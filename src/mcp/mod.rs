//! MCP server wiring

pub mod server;

pub use server::NutriLensService;
