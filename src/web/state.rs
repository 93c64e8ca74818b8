use crate::config::AppConfig;
use crate::db::store::EmployeeStore;
use crate::llm::LlmManager;

/// Shared application state for the web server
pub struct AppState {
    pub config: AppConfig,
    pub store: EmployeeStore,
    pub llm: LlmManager,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, store: EmployeeStore, llm: LlmManager) -> Self {
        Self {
            config,
            store,
            llm,
            startup_time: chrono::Utc::now(),
        }
    }
}
