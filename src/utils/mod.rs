use std::{env, path::PathBuf, sync::Once};

const DEFAULT_DIR_NAME: &str = ".spendlog";
const EXPORT_DIR: &str = "exports";
pub const HOME_ENV: &str = "SPENDLOG_HOME";

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// `spendlog=info` directive; output goes to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spendlog=info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Home directory override from `SPENDLOG_HOME`, if set.
pub fn home_override() -> Option<PathBuf> {
    env::var_os(HOME_ENV).map(PathBuf::from)
}

/// Application directory, defaulting to `~/.spendlog`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = home_override() {
        return custom;
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Export target used when `SPENDLOG_HOME` is set and no export dir is configured.
pub fn sandboxed_export_dir() -> Option<PathBuf> {
    home_override().map(|home| home.join(EXPORT_DIR))
}
