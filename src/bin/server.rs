use std::{
    env,
    error::Error,
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use buddy::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The web server for Buddy, a personal finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// Directory containing an SSL certificate `cert.pem` and key `key.pem`.
    #[arg(long)]
    cert_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The IP address to listen on.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: IpAddr,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    ///
    /// Decides what "today" is for transaction dates and cookie expiry.
    #[arg(long, env = "TZ", default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging()?;

    let args = Args::parse();

    let address = SocketAddr::new(args.address, args.port);

    let cert_dir = PathBuf::from(&args.cert_path);
    let tls = RustlsConfig::from_pem_file(cert_dir.join("cert.pem"), cert_dir.join("key.pem"))
        .await
        .inspect_err(|error| tracing::error!("Could not read cert.pem and key.pem: {error}"))?;

    let secret = env::var("SECRET")
        .inspect_err(|_| tracing::error!("SECRET is not set, cannot encrypt session cookies"))?;

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection, &secret, &args.timezone)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = with_request_spans(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("Serving Buddy on https://{address} in {}", args.timezone);
    axum_server::bind_rustls(address, tls)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log INFO and above to stdout, and everything from DEBUG up to `debug.log`.
fn setup_logging() -> Result<(), std::io::Error> {
    let debug_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    let terminal = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(filter::LevelFilter::INFO);
    let file = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(debug_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry().with(terminal).with(file).init();

    Ok(())
}

/// Wrap each request in a span named after its method, URI and route.
fn with_request_spans(router: Router) -> Router {
    let spans = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str);

            tracing::debug_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                route,
            )
        })
        // Handlers log their own failures.
        .on_failure(());

    router.layer(spans)
}
