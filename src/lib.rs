//! Inventory Server - small-business inventory, order and invoicing API
//!
//! # Overview
//!
//! A single-binary REST service over embedded SurrealDB:
//!
//! - **Database** (`db`): models and repositories on embedded SurrealDB
//! - **Auth** (`auth`): JWT + Argon2, admin-only accounts
//! - **HTTP API** (`api`): RESTful routes per resource
//! - **Core** (`core`): configuration, shared state, server runner
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT service, bearer middleware
//! ├── api/           # HTTP routes and handlers
//! ├── services/      # HTTP service (router assembly, listener)
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, money helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Prepare the process environment: .env, working directories, logging.
/// Must run before anything logs.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____ __  ___ _____
   /  _//  |/  // ___/
   / /  / /|_/ / \__ \
 _/ /  / /  / / ___/ /
/___/ /_/  /_/ /____/

 Inventory Management System
    "#
    );
}
