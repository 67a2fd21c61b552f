use std::{io, net::SocketAddr, path::PathBuf, sync::Arc};

use http::{HeaderValue, Method, header};

use clap::Parser;

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::{Next, from_fn},
    response::Response,
};

use axum_server::Handle;

use music_clicker::{
    app::{AppState, error::AppErrorKind},
    auth::{Authenticator, token::generate_secret},
    cli::{Args, Command, show_user},
    config::{Config, read_config},
    routes,
    store::UserStore,
};

use anyhow::Error;

use sqlx::pool::PoolOptions;

use tokio::{main, select, signal};

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
};

#[main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    fmt::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Args::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => PathBuf::from("config.toml"),
    };

    // Read config file
    let config = Arc::new(read_config(config_path)?);

    if let Some(Command::GenerateSecret) = cli.command.as_ref() {
        tracing::info!("generated! set AUTH_SECRET or auth.secret on boot");
        println!("{}", generate_secret());
        return Ok(());
    }

    let store = open_store(&config).await?;

    // Run any pending commands
    if let Some(Command::ShowUser(command)) = cli.command.as_ref() {
        show_user(command, &store).await?;
        return Ok(());
    }

    if config.auth.secret.is_none() {
        tracing::warn!("no auth secret set! clients are trusted to name themselves");
        tracing::warn!("generate a secret with `music-clicker generate-secret`");
    }

    // Create app state
    let state = AppState {
        store,
        auth: Authenticator::from_config(&config.auth),
        config: config.clone(),
    };

    let mut cors = CorsLayer::new();
    if let Some(origin) = config.server.frontend_origin.as_ref() {
        cors = cors
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                music_clicker::auth::header::X_USERNAME,
            ])
            .allow_credentials(true);

        tracing::info!(%origin, "allowing cross-origin requests");
    }

    // Finalize router
    let router = Router::new()
        .merge(routes::router(state).layer(from_fn(security_headers)))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    let method = req.method();
                    let uri = req.uri();

                    // axum automatically adds this extension.
                    let matched_path = req
                        .extensions()
                        .get::<MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::debug_span!("request", %method, %uri, matched_path)
                })
                // By default `TraceLayer` will log 5xx responses but we're doing our specific
                // logging of errors so disable that
                .on_failure(()),
        )
        .layer(from_fn(log_app_errors));

    let handle = Handle::new();

    // run shutdown task to detect shutdowns
    tokio::spawn(shutdown_signal(handle.clone()));

    let addr: SocketAddr = ([0, 0, 0, 0], config.http.port).into();

    tracing::info!("listening on {} (http)", addr);

    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    tracing::info!("shutting down");

    Ok(())
}

async fn open_store(config: &Config) -> Result<UserStore, Error> {
    match config.server.database_url.as_ref() {
        Some(database_url) => {
            tracing::info!("establishing connection to database");

            // Connect to sqlite database
            let db = PoolOptions::new().connect(database_url).await?;
            Ok(UserStore::open_sqlite(db).await?)
        }
        None => {
            tracing::info!(data_dir = %config.server.data_dir.display(), "storing users on disk");

            Ok(UserStore::open_dir(&config.server.data_dir).await?)
        }
    }
}

async fn security_headers(request: Request, next: Next) -> Response {
    let mut res = next.run(request).await;

    res.headers_mut().extend([
        (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("frame-ancestors 'none'"),
        ),
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
    ]);

    res
}

// Stolen from: https://github.com/tokio-rs/axum/blob/main/examples/error-handling/src/main.rs
async fn log_app_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    // If the response contains an AppError Extension, log it.
    if let Some(err) = response.extensions().get::<Arc<AppErrorKind>>() {
        tracing::error!(?err, "an unexpected error occurred inside a handler");
    }
    response
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    select! {
        _ = ctrl_c => { handle.shutdown() }
        _ = terminate => { handle.shutdown() }
    }
}
