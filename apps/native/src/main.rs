#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

mod hotkey;
mod stdio_surface;
mod windowing;

use std::env;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use hopcore_config::Settings;
use hopcore_index::IndexStore;
use hopcore_shell::SystemShell;
use hopd::{Collaborators, LauncherService};
use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_tracing();
    std::panic::set_hook(Box::new(|info| {
        error!("panic: {info}");
    }));

    let settings = load_settings();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("hop-worker")
        .build()
        .context("failed to start async runtime")?;

    let roots = hopcore_config::default_roots();
    if roots.is_empty() {
        warn!("no home directory found, index will stay empty");
    }

    let collaborators = Collaborators {
        launcher: Arc::new(stdio_surface::StdioLauncher),
        chrome: windowing::platform_chrome(),
        shell: Arc::new(SystemShell),
    };
    let service = Arc::new(LauncherService::new(
        settings.clone(),
        roots,
        Arc::new(IndexStore::new()),
        collaborators,
        runtime.handle().clone(),
    ));

    if settings.warm_index_on_start {
        // Detached; sessions pick up whatever snapshot is current.
        drop(service.warm_index());
    }

    let registration = match hotkey::register(&settings.hotkey) {
        Ok(registration) => registration,
        Err(err) => {
            error!(hotkey = %settings.hotkey, error = %format!("{err:#}"), "hotkey unavailable");
            return Err(err);
        }
    };
    stdio_surface::spawn_request_reader(Arc::clone(&service))
        .context("failed to start request reader")?;

    info!(hotkey = %settings.hotkey, "hop ready");
    registration.run(|| {
        service.toggle();
    });

    Ok(())
}

fn load_settings() -> Settings {
    let Some(path) = Settings::default_path() else {
        debug!("no config directory, using default settings");
        return Settings::default();
    };
    match Settings::load_from(&path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "falling back to default settings");
            Settings::default()
        }
    }
}

/// `RUST_LOG` wins; otherwise `HOP_DEBUG=1` turns on debug output. When
/// `HOP_LOG_DIR` is set, logs are also written to `hop.<pid>.log` there.
fn init_tracing() {
    let verbose = env::var("HOP_DEBUG").ok().as_deref() == Some("1");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    let file_layer = env::var_os("HOP_LOG_DIR")
        .map(PathBuf::from)
        .and_then(|dir| {
            fs::create_dir_all(&dir).ok()?;
            let path = dir.join(format!("hop.{}.log", std::process::id()));
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
        .map(|file| {
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
