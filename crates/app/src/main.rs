use std::sync::Arc;

use engine::{Engine, LocalStore};
use migration::{Migrator, MigratorTrait};
use server::ServerConfig;
use settings::Database;

mod scheduler;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "easymoney={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::warn!("no server settings found, nothing to run");
        return Ok(());
    };

    tracing::info!("Found server settings...");
    let engine = match build_engine(&server.database).await {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("failed to initialize storage: {err}");
            return Err(err);
        }
    };

    if settings.reset.schedule_hourly {
        tracing::info!("hourly data reset enabled");
        tasks.spawn(scheduler::run_hourly_reset(engine.clone()));
    }

    let config = ServerConfig {
        reset_secret: settings.reset.secret,
    };
    tasks.spawn(async move {
        let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
        let addr = format!("{}:{}", bind, server.port);
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!("failed to bind server listener: {err}");
                return;
            }
        };
        if let Err(err) = server::run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn build_engine(
    config: &Database,
) -> Result<Engine, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Local(path) => {
            let store = LocalStore::open(path).await?;
            tracing::info!("using local store at {}", store.path().display());
            return Ok(Engine::builder().store(Arc::new(store)).build().await?);
        }
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(Engine::builder().database(database).build().await?)
}
