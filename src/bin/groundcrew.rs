//! Console front end for the crew job tracker.
//!
//! Usage:
//!
//! ```text
//! groundcrew < commands.txt
//! ```
//!
//! Each input line is `<user-id> <message>`; replies go to stdout and logs
//! to stderr. With `DATABASE_URL` set the tracker persists to `PostgreSQL`,
//! otherwise it keeps everything in memory. The daily reset runs in the
//! background until the input ends or the process receives Ctrl-C.

use groundcrew::app::{App, AppError, InMemoryRepositories, PostgresRepositories};
use groundcrew::assignment::ports::AssignmentRepository;
use groundcrew::config::AppConfig;
use groundcrew::job::ports::JobRepository;
use groundcrew::reset::ports::ResetLedger;
use groundcrew::staff::ports::EmployeeRepository;
use groundcrew::{console, db, telemetry};
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let dotenv = dotenvy::dotenv();
    telemetry::init()?;
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable environment file"),
    }

    let config = AppConfig::from_env()?;
    let clock = Arc::new(DefaultClock);
    if let Some(url) = config.database_url.as_deref() {
        let pool = db::connect(url, config.db_pool_size)?;
        db::apply_schema(&pool).await?;
        tracing::info!("using PostgreSQL storage");
        let app = App::assemble(&config, PostgresRepositories::postgres(&pool), clock)?;
        run(&app, &config).await
    } else {
        tracing::info!("using in-memory storage");
        let app = App::assemble(&config, InMemoryRepositories::in_memory(), clock)?;
        run(&app, &config).await
    }
}

async fn run<J, A, S, L>(app: &App<J, A, S, L, DefaultClock>, config: &AppConfig) -> Result<(), AppError>
where
    J: JobRepository + 'static,
    A: AssignmentRepository + 'static,
    S: EmployeeRepository + 'static,
    L: ResetLedger + 'static,
{
    let roster = app.sync_roster(config).await?;
    tracing::info!(
        active = roster.len(),
        developer_mode = config.developer_mode,
        "groundcrew ready"
    );

    let shutdown = CancellationToken::new();
    let scheduler = app.spawn_scheduler(shutdown.clone());
    let interrupt = tokio::spawn({
        let token = shutdown.clone();
        async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "cannot listen for Ctrl-C");
                return;
            }
            tracing::info!("interrupt received");
            token.cancel();
        }
    });

    let mut stdout = tokio::io::stdout();
    let served = console::serve(
        app.dispatcher(),
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        &shutdown,
    )
    .await;

    shutdown.cancel();
    interrupt.abort();
    scheduler.await?;
    let handled = served?;
    tracing::info!(handled, "groundcrew stopped");
    Ok(())
}
