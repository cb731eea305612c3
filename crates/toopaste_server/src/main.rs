//! Toopaste server entrypoint.

use std::time::Duration;
use toopaste_core::{constants::DEFAULT_ADMIN_PASSWORD, DEFAULT_PORT};
use toopaste_server::{config::Config, db::Database, serve_router, sweeper, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    purge: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--purge-expired" => flags.purge = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "toopaste=info,toopaste_server=info,toopaste_core=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;

    if cli_flags.purge {
        let removed = database.pastes.purge_expired(chrono::Utc::now())?;
        println!("Purged {} expired paste(s)", removed);
        return Ok(());
    }

    if config.admin_password == DEFAULT_ADMIN_PASSWORD {
        tracing::warn!("ADMIN_PASSWORD is unset; admin routes accept the default password");
    }

    let state = AppState::new(config.clone(), database);

    let sweeper_handle = (config.sweep_interval_secs > 0).then(|| {
        tracing::info!(
            "Sweeping expired pastes every {}s",
            config.sweep_interval_secs
        );
        sweeper::spawn_expiry_sweeper(
            state.store.clone(),
            Duration::from_secs(config.sweep_interval_secs),
        )
    });

    let allow_public = toopaste_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = toopaste_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("Toopaste running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    if let Some(handle) = sweeper_handle {
        handle.abort();
    }

    serve_result?;
    tracing::info!("Toopaste stopped");

    Ok(())
}

fn print_help() {
    println!("Toopaste Server\n");
    println!("Usage: toopaste [OPTIONS]\n");
    println!("Options:");
    println!("  --purge-expired   Delete expired pastes and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH              Database directory (default: ~/.cache/toopaste/db)");
    println!(
        "  PORT                 Server port (default: {})",
        DEFAULT_PORT
    );
    println!(
        "  BIND                 Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
    println!("  ALLOW_PUBLIC_ACCESS  Allow non-loopback binds and CORS from any origin");
    println!("  ADMIN_PASSWORD       Password for the 'admin' user on DELETE routes");
    println!("  DEFAULT_THEME        Highlighting theme when the visitor has none");
    println!("  PAGE_TITLE           Title reported by the index route");
    println!("  RECENT_PASTES_LIMIT  Default size of the recent pastes listing");
    println!("  PREFERRED_LANGUAGES  Comma-separated language tags listed first");
    println!("  ANNOUNCE_URL         Webhook that receives new-paste announcements");
    println!("  BASE_URL             Public URL used in announcement links");
    println!("  SWEEP_INTERVAL_SECS  Seconds between expired-paste sweeps (0 disables)");
    println!("  MAX_BODY_SIZE        Maximum request body in bytes (default: 10MB)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
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
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["toopaste".to_string(), "--purge".to_string()],
                "Unknown option",
            ),
            (
                vec!["toopaste".to_string(), "serve".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_supported_options() {
        let args = vec![
            "toopaste".to_string(),
            "--purge-expired".to_string(),
            "-h".to_string(),
        ];
        let flags = parse_cli_flags(&args).expect("known options should parse");
        assert_eq!(
            flags,
            CliFlags {
                help: true,
                purge: true,
            }
        );
    }
}
