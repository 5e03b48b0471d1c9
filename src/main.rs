//! VOD Streamer - signed URLs and range-based video streaming.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vod_streamer::{
    config::Config,
    server::{create_router, RouterConfig},
    store::FsVideoSource,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Video root: {}", config.video_root.display());
    info!("  TTL: {}s", config.ttl);
    info!("  Chunk size: {} bytes", config.chunk_size);
    info!("  Base URL: {}", config.public_base_url());

    // Auth status with warning if disabled
    if config.auth_enabled {
        info!("  Auth: enabled");
    } else {
        warn!("  Auth: DISABLED - the stream endpoint is publicly accessible");
        warn!("        Enable for production: --auth-enabled --auth-secret=<secret>");
    }

    // Check the video root before serving
    match count_videos(&config.video_root) {
        Ok(count) => {
            info!("  Found {} video(s) in {}", count, config.video_root.display());
        }
        Err(e) => {
            error!(
                "Video root {} is not readable: {}",
                config.video_root.display(),
                e
            );
            error!("Create the directory or point --video-root / VOD_VIDEO_ROOT at it");
            return ExitCode::FAILURE;
        }
    }

    let source = FsVideoSource::new(config.video_root.clone());
    let router = create_router(source, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("");
    info!("Try these endpoints:");
    info!("  curl http://{}/health", addr);
    info!("  curl 'http://{}/videos?video_name=<name>'", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Count the .mp4 files in the video root.
fn count_videos(root: &std::path::Path) -> Result<usize, std::io::Error> {
    let count = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("mp4"))
                .unwrap_or(false)
        })
        .count();

    Ok(count)
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "vod_streamer=debug,tower_http=debug"
    } else {
        "vod_streamer=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = if config.auth_enabled {
        RouterConfig::new(config.auth_secret_or_empty())
    } else {
        RouterConfig::without_auth()
    };

    router_config = router_config
        .with_ttl(config.ttl_duration())
        .with_chunk_size(config.chunk_size)
        .with_base_url(config.public_base_url())
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
