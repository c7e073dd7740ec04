use std::{
    env,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use bookkeeper_rs::{
    AppState, RateLimits, Store, SystemClock, build_router, graceful_shutdown, logging_middleware,
};

/// The REST API server for bookkeeper_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: Option<PathBuf>,

    /// The address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5001)]
    port: u16,

    /// The canonical timezone used to work out the current budget month, e.g. "Pacific/Auckland".
    #[arg(long, env = "TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// File path to write debug logs to.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    log_path: PathBuf,

    /// How many GET requests a client may make to one admin route per window.
    #[arg(long, env = "RATE_LIMIT_READS", default_value_t = 100)]
    rate_limit_reads: u32,

    /// How many other requests a client may make to one admin route per window.
    #[arg(long, env = "RATE_LIMIT_WRITES", default_value_t = 50)]
    rate_limit_writes: u32,

    /// The length of a rate limit window in seconds.
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 60)]
    rate_limit_window_secs: u64,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    setup_logging(&args.log_path);

    let admin_secret = env::var("ADMIN_SECRET").ok();
    if admin_secret.as_deref().is_none_or(str::is_empty) {
        tracing::warn!("ADMIN_SECRET is not set, all admin requests will be rejected");
    }

    let Some(clock) = SystemClock::new(&args.timezone) else {
        tracing::error!(
            "Could not get local timezone \"{}\", it must be a valid, canonical timezone name",
            args.timezone
        );
        exit(1);
    };

    let store = Store::open(args.db_path.as_deref());
    let state = AppState::new(admin_secret.as_deref(), store, clock).with_rate_limits(RateLimits {
        reads: args.rate_limit_reads,
        writes: args.rate_limit_writes,
        window: Duration::from_secs(args.rate_limit_window_secs),
    });

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = SocketAddr::new(args.host, args.port);
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service_with_connect_info::<SocketAddr>())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        exit(1);
    }
}

fn setup_logging(log_path: &Path) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(log_file) => log_file,
        Err(error) => {
            eprintln!("Could not create log file {}: {error}", log_path.display());
            exit(1);
        }
    };

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged when they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
