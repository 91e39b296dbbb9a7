pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod document;
pub mod events;
pub mod posts;
pub mod render;
pub mod state;
pub mod stats;

use feedboard_shared::constants::APP_NAME;
use feedboard_shared::Result;
use feedboard_store::Database;
use tracing_subscriber::{fmt, EnvFilter};

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use dispatch::{ActionKind, AlwaysConfirm, Confirm, DispatchOutcome, RawEvent};
pub use events::Notice;
pub use posts::PostStore;
pub use render::RenderFrame;
pub use state::Session;

/// Install the global tracing subscriber.  `RUST_LOG` overrides the default
/// filter.  Calling this more than once is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("feedboard_client=debug,feedboard_store=info,warn")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Open the dashboard against the configured SQLite database.
pub fn open_dashboard<C: Confirm>(config: &DashboardConfig, confirm: C) -> Result<Dashboard<Database, C>> {
    let db = config.open_database()?;
    tracing::info!(app = APP_NAME, path = ?db.path(), "starting dashboard");
    Ok(Dashboard::open(config, db, confirm))
}
