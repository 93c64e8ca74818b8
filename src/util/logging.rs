use tracing_subscriber::{EnvFilter, fmt};

/// Initializes tracing/logging based on environment variables. Setting
/// CREWBASE_LOG_FORMAT=json switches to structured JSON output.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let wants_json = std::env::var("CREWBASE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if wants_json {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(false)
            .init();
    }
}
