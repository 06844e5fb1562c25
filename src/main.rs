//! stratum - Demo walking the overlay lifecycle over an in-memory host

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;

use stratum::config::{ConfigError, Settings};
use stratum::domain::{ElementId, Rect, Side, ToastOptions, ToastVariant, Viewport};
use stratum::host::{FocusHost, MemoryHost};
use stratum::overlay::{HoverTarget, TokioClock};
use stratum::services::{self, timer_driver};
use stratum::ui::components::{Dialog, Sheet, Tooltip};
use stratum::ui::{Key, Keystroke};
use stratum::Runtime;

fn load_settings() -> anyhow::Result<Settings> {
    match Settings::default_path() {
        Ok(path) => Settings::load(&path)
            .with_context(|| format!("loading settings from {}", path.display())),
        Err(ConfigError::NoConfigDir) => {
            tracing::warn!("no config directory, using default settings");
            Ok(Settings::default())
        }
        Err(e) => Err(e.into()),
    }
}

fn demo_host() -> MemoryHost {
    let id = |s: &str| ElementId::from(s);
    let mut host = MemoryHost::new(Viewport::new(1280.0, 800.0));
    host.add("page", None)
        .add_focusable("new-project", Some(&id("page")))
        .add_focusable("settings", Some(&id("page")))
        .add_focusable("help", Some(&id("page")))
        .set_rect(&id("help"), Rect::new(1200.0, 20.0, 32.0, 32.0));
    host.add_detached("project-dialog")
        .add_focusable("project-name", Some(&id("project-dialog")))
        .add_focusable("create", Some(&id("project-dialog")));
    host.add_detached("settings-sheet")
        .add_focusable("theme", Some(&id("settings-sheet")));
    host.add_detached("help-tip");
    host
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting stratum demo");

    let settings = load_settings()?;
    let idle_tick = settings.driver.idle_tick();
    let mut runtime = Runtime::new(demo_host(), Arc::new(TokioClock), settings);
    runtime.events().subscribe(|event| tracing::info!(?event, "overlay event"));

    let dialog = Dialog::new("project-dialog")
        .trigger("new-project")
        .mount(&mut runtime);
    let sheet = Sheet::new("settings-sheet")
        .trigger("settings")
        .position(Side::Right)
        .mount(&mut runtime);
    let tip = Tooltip::new("help", "help-tip", "Keyboard shortcuts").mount(&mut runtime);

    let _binding = services::bind(runtime.toaster().clone());
    let shared = runtime.into_shared();
    let (shutdown, shutdown_rx) = watch::channel(false);
    let driver = timer_driver::spawn(Arc::clone(&shared), idle_tick, shutdown_rx);

    {
        let mut rt = shared.lock().unwrap_or_else(PoisonError::into_inner);
        rt.host_mut().set_focus(&ElementId::from("new-project"));
        rt.trigger_click(dialog)?;
        tracing::info!(focused = ?rt.host().active_element(), "dialog open");
        rt.handle_key(&Keystroke::key(Key::Escape));
        tracing::info!(focused = ?rt.host().active_element(), "dialog closed");

        rt.trigger_click(sheet)?;
        rt.handle_pointer_down(&ElementId::from("page"));

        rt.pointer_enter(tip, HoverTarget::Trigger)?;
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    {
        let mut rt = shared.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(open = rt.is_open(tip)?, "tooltip after hover delay");
        rt.pointer_leave(tip, HoverTarget::Trigger)?;
    }

    services::toast_with(
        ToastOptions::message("Project created")
            .variant(ToastVariant::Success)
            .duration(Duration::from_millis(1500)),
    );
    services::toast_with(
        ToastOptions::message("Sync finished")
            .description("All changes saved")
            .duration(Duration::from_millis(2500)),
    );

    loop {
        tokio::time::sleep(Duration::from_millis(250)).await;
        let remaining = shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .toaster()
            .len();
        if remaining == 0 {
            break;
        }
        tracing::info!(remaining, "waiting for toasts");
    }

    shutdown.send(true).context("stopping timer driver")?;
    driver.await.context("timer driver task")?;
    tracing::info!("demo finished");
    Ok(())
}
