use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::UserRepository;
use crate::services::HttpService;

/// Server state holding shared references to every service
///
/// Cloning is shallow: the database handle and services are Arc-backed.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | immutable configuration |
/// | db | Surreal<Db> | embedded database |
/// | jwt_service | Arc<JwtService> | token generation/validation |
/// | http | HttpService | router + HTTP server |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB on RocksDB)
    pub db: Surreal<Db>,
    /// JWT service (shared ownership)
    pub jwt_service: Arc<JwtService>,
    /// HTTP service
    pub http: HttpService,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// Order of operations:
    /// 1. Work directory layout (database + log dirs)
    /// 2. Database connection
    /// 3. Admin account seeding (when `ADMIN_EMAIL`/`ADMIN_PASSWORD` are set)
    /// 4. Router construction (late, needs the state itself)
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(&config.database_dir())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let http = HttpService::new(config.clone());

        let state = Self {
            config: config.clone(),
            db,
            jwt_service,
            http: http.clone(),
        };

        if let (Some(email), Some(password)) =
            (&state.config.admin_email, &state.config.admin_password)
        {
            let users = UserRepository::new(state.get_db());
            match users.ensure_admin(email, password).await {
                Ok(()) => tracing::info!(email = %email, "Admin account ready"),
                Err(e) => tracing::error!(error = %e, "Failed to seed admin account"),
            }
        }

        // Late initialization: the router needs the finished state
        http.initialize(state.clone());

        state
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the working directory
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
