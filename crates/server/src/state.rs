use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::audit::AuditLog;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthConfig;
use service::auth::AuthService;
use service::media::MediaStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: MediaStore,
    pub audit: AuditLog,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, cfg: &configs::AppConfig) -> Self {
        let auth = AuthService::new(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            AuthConfig::from_app(&cfg.auth),
        );
        Self {
            db,
            media: MediaStore::new(&cfg.media),
            audit: AuditLog::new(&cfg.audit.path),
            auth: Arc::new(auth),
        }
    }
}
