use std::{process, sync::Arc};

use quill::{
    application::{
        error::AppError,
        posts::PostService,
        repos::{PostsRepo, PostsWriteRepo},
    },
    cache::{CacheConfig, CacheStore, MemoryCache, RedisCache},
    config::{self, CacheBackend},
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{ApiState, build_api_router},
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    info!(target = "quill::migrate", "Migrations applied");
    repositories.close().await;
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let cache = init_cache(&settings.cache).await?;

    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();

    let posts = PostService::new(
        posts_repo,
        posts_write_repo,
        cache,
        CacheConfig::from(&settings.cache),
    )
    .with_store_timeout(settings.request.store_timeout);

    let api_state = ApiState {
        posts: Arc::new(posts),
        environment: settings.server.environment.clone(),
        request_timeout: settings.request.timeout,
    };

    let result = serve_http(&settings, api_state).await;

    repositories.close().await;
    info!(target = "quill::server", "Database pool closed");

    result
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = PostgresRepositories::connect(&settings.database)
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn init_cache(settings: &config::CacheSettings) -> Result<Arc<dyn CacheStore>, AppError> {
    match settings.backend {
        CacheBackend::Redis => {
            let cache = RedisCache::connect(&settings.host, settings.port)
                .await
                .map_err(|err| AppError::from(InfraError::from(err)))?;
            cache
                .ping()
                .await
                .map_err(|err| AppError::from(InfraError::from(err)))?;
            Ok(Arc::new(cache))
        }
        CacheBackend::Memory => {
            info!(
                target = "quill::cache",
                capacity = settings.memory_capacity.get(),
                "Using in-process cache"
            );
            Ok(Arc::new(MemoryCache::new(settings.memory_capacity)))
        }
    }
}

async fn serve_http(settings: &config::Settings, api_state: ApiState) -> Result<(), AppError> {
    let router = build_api_router(api_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::Bind(err)))?;

    info!(
        target = "quill::server",
        addr = %settings.server.addr,
        environment = %settings.server.environment,
        "Starting server"
    );

    let stop = Arc::new(Notify::new());
    let stop_signal = stop.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { stop_signal.notified().await });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut server => {
            return flatten_server_result(joined);
        }
        _ = shutdown_signal() => {}
    }

    info!(
        target = "quill::server",
        grace_seconds = settings.server.graceful_shutdown.as_secs(),
        "Shutting down server"
    );
    stop.notify_one();

    match tokio::time::timeout(settings.server.graceful_shutdown, &mut server).await {
        Ok(joined) => flatten_server_result(joined),
        Err(_) => {
            warn!(
                target = "quill::server",
                "Graceful shutdown window elapsed; aborting in-flight requests"
            );
            server.abort();
            Ok(())
        }
    }
}

fn flatten_server_result(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match joined {
        Ok(result) => result.map_err(|err| AppError::unexpected(format!("server error: {err}"))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "quill::server", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "quill::server", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
