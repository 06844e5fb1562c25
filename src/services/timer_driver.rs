//! Async driver for overlay and toast timers.
//!
//! The runtime and the toast queue never sleep themselves. This driver
//! runs on tokio, sleeps until the next pending deadline (or an idle tick
//! when nothing is pending, so newly scheduled timers are noticed) and
//! advances its source. It stops when the shutdown channel flips to `true`
//! or its sender is dropped.

use std::sync::PoisonError;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::app::SharedRuntime;
use crate::config::MIN_IDLE_TICK_MS;
use crate::host::Host;

use super::toast_service::Toaster;

/// Something with deadlines the driver can advance.
pub trait TimerSource: Send + Sync + 'static {
    fn next_deadline(&self) -> Option<Instant>;

    /// Fires everything due now. Returns how many timers fired.
    fn advance(&self) -> usize;
}

impl TimerSource for Toaster {
    fn next_deadline(&self) -> Option<Instant> {
        Toaster::next_deadline(self)
    }

    fn advance(&self) -> usize {
        Toaster::advance(self, self.now()).len()
    }
}

impl<H> TimerSource for SharedRuntime<H>
where
    H: Host + Send + 'static,
{
    fn next_deadline(&self) -> Option<Instant> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_deadline()
    }

    fn advance(&self) -> usize {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .advance()
    }
}

/// Spawns the driver loop on the current tokio runtime.
pub fn spawn<S>(source: S, idle_tick: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()>
where
    S: TimerSource,
{
    let idle_tick = idle_tick.max(Duration::from_millis(MIN_IDLE_TICK_MS));
    tokio::spawn(async move {
        tracing::debug!(?idle_tick, "timer driver started");
        loop {
            let now = tokio::time::Instant::now();
            let idle = now + idle_tick;
            let wake = source
                .next_deadline()
                .map(|deadline| tokio::time::Instant::from_std(deadline).min(idle))
                .unwrap_or(idle);

            tokio::select! {
                _ = tokio::time::sleep_until(wake) => {
                    let fired = source.advance();
                    if fired > 0 {
                        tracing::trace!(fired, "timers fired");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("timer driver stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Runtime;
    use crate::config::{Settings, ToastSettings};
    use crate::domain::{ElementId, Rect, ToastOptions};
    use crate::host::MemoryHost;
    use crate::overlay::{Activation, Geometry, HoverTarget, OverlayConfig, OverlayKind, TokioClock};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn expires_toasts_on_time() {
        let toaster = Toaster::new(Arc::new(TokioClock), &ToastSettings::default());
        toaster.push(ToastOptions::message("bye").duration(Duration::from_millis(3000)));
        let (tx, rx) = watch::channel(false);
        let driver = spawn(toaster.clone(), Duration::from_millis(50), rx);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(toaster.len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(toaster.is_empty());

        tx.send(true).unwrap();
        driver.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn notices_timers_scheduled_while_idle() {
        let toaster = Toaster::new(Arc::new(TokioClock), &ToastSettings::default());
        let (tx, rx) = watch::channel(false);
        let driver = spawn(toaster.clone(), Duration::from_millis(50), rx);

        tokio::time::sleep(Duration::from_millis(500)).await;
        toaster.push(ToastOptions::message("late").duration(Duration::from_millis(100)));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(toaster.is_empty());

        drop(tx);
        driver.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn zero_idle_tick_still_sleeps() {
        let toaster = Toaster::new(Arc::new(TokioClock), &ToastSettings::default());
        let (tx, rx) = watch::channel(false);
        let driver = spawn(toaster.clone(), Duration::ZERO, rx);

        toaster.push(ToastOptions::message("quick").duration(Duration::from_millis(20)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(toaster.is_empty());

        tx.send(true).unwrap();
        driver.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn drives_hover_intent() {
        let mut host = MemoryHost::default();
        host.add("trigger", None);
        host.set_rect(&ElementId::from("trigger"), Rect::new(0.0, 0.0, 10.0, 10.0));
        host.add_detached("tip");
        let mut runtime = Runtime::new(host, Arc::new(TokioClock), Settings::default());
        let tip = runtime.register(
            OverlayConfig::new(OverlayKind::Tooltip, "tip", Geometry::Centered { max_width: 200.0 })
                .trigger("trigger")
                .activation(Activation::Hover {
                    open_delay: Duration::from_millis(150),
                    close_delay: Duration::ZERO,
                })
                .dismiss(None)
                .focus_trap(false),
        );
        let shared = runtime.into_shared();
        let (tx, rx) = watch::channel(false);
        let driver = spawn(Arc::clone(&shared), Duration::from_millis(50), rx);

        shared
            .lock()
            .unwrap()
            .pointer_enter(tip, HoverTarget::Trigger)
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(shared.lock().unwrap().is_open(tip).unwrap());

        tx.send(true).unwrap();
        driver.await.unwrap();
    }
}
