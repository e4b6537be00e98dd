use std::{env, net::SocketAddr, sync::Arc};

use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spendsight::{DEFAULT_MODEL, Gemini, build_analysis_router, graceful_shutdown};

/// The analysis endpoint that turns transactions and goals into insights.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the endpoint from.
    #[arg(short, long, default_value_t = 3001)]
    port: u16,

    /// The Gemini model to generate insights with.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let api_key = env::var("GEMINI_API_KEY")
        .expect("The environment variable 'GEMINI_API_KEY' must be set");

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let router = build_analysis_router(Arc::new(Gemini::new(&args.model, api_key)))
        .layer(TraceLayer::new_for_http());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("Analysis endpoint listening on {addr} with model {}", args.model);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}
