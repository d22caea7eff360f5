pub mod config;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::{build_router, AppState, Application};
