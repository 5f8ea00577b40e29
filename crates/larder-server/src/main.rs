// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Larder server binary.

use clap::{Parser, Subcommand};
use larder_server::{create_app_state, create_router, StoreSessionResolver};
use larder_server_auth::ServiceRole;
use larder_server_config::{EventSinkKind, LogFormat, ServerConfig};
use larder_server_db::{MemoryStore, User, UserStore};
use larder_server_events::{
	HttpSink, MessageSink, NoopPublisher, Publisher, QueuedPublisher, TracingSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::{
	cors::{Any, CorsLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Larder server - HTTP server for household meal planning.
#[derive(Parser, Debug)]
#[command(name = "larder-server", about = "Larder meal planning server", version)]
struct Args {
	/// Config file to use instead of /etc/larder/server.toml
	#[arg(long, env = "LARDER_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);
	match config.logging.format {
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json())
			.init(),
		LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

fn create_publisher(config: &ServerConfig) -> Result<Arc<dyn Publisher>, Box<dyn std::error::Error>> {
	let events = &config.events;
	let sink: Arc<dyn MessageSink> = match events.sink {
		EventSinkKind::None => {
			tracing::info!("data change events disabled");
			return Ok(Arc::new(NoopPublisher));
		}
		EventSinkKind::Log => Arc::new(TracingSink::new()),
		EventSinkKind::Http => {
			let endpoint = events
				.http_endpoint
				.clone()
				.ok_or("events.http_endpoint is required for the http sink")?;
			Arc::new(HttpSink::new(
				endpoint,
				Duration::from_secs(events.http_timeout_secs),
			)?)
		}
	};

	tracing::info!(
		sink = ?events.sink,
		queue_capacity = events.queue_capacity,
		workers = events.workers,
		topic = %events.data_changes_topic,
		"starting data change publisher"
	);
	Ok(Arc::new(QueuedPublisher::new(
		events.queue_capacity,
		events.workers,
		vec![sink],
	)))
}

/// Registers a service admin under the configured development token.
async fn register_dev_session(
	store: &Arc<MemoryStore>,
	sessions: &StoreSessionResolver<MemoryStore>,
	token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
	let mut admin = User::new("dev-admin", "dev-admin@larder.local");
	admin.service_roles = vec![ServiceRole::ServiceAdmin.to_string()];
	store.create_user(&CancellationToken::new(), &admin).await?;
	sessions.register(token, admin.id).await;
	tracing::warn!(user_id = %admin.id, "development session registered for a service admin");
	Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => larder_server_config::load_config_with_file(path)?,
		None => larder_server_config::load_config()?,
	};

	init_tracing(&config);
	larder_server_auth::rbac::init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		environment = %config.auth.environment,
		"starting larder-server"
	);

	let store = Arc::new(MemoryStore::new());
	let sessions = Arc::new(StoreSessionResolver::new(Arc::clone(&store)));
	if let Some(token) = &config.auth.dev_session_token {
		register_dev_session(&store, &sessions, token).await?;
	}

	let publisher = create_publisher(&config)?;
	let state = create_app_state(Arc::clone(&store), sessions, publisher, &config);

	let app = create_router(state)
		.layer(TimeoutLayer::new(Duration::from_secs(
			config.http.request_timeout_secs,
		)))
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
