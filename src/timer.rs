use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

struct Shared {
    running: Mutex<bool>,
    stop_signal: Condvar,
}

/// Periodic callback on a dedicated worker thread.
///
/// The callback is expected to do nothing beyond a cheap, race-free update (the
/// game wires in a saturating atomic increment); it must never touch board
/// state. `start` is idempotent and `stop` joins the worker, so no callback
/// fires after `stop` returns.
pub struct GameTimer {
    interval: Duration,
    callback: Callback,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl GameTimer {
    pub fn new(interval: Duration, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            interval,
            callback: Arc::new(callback),
            shared: Arc::new(Shared {
                running: Mutex::new(false),
                stop_signal: Condvar::new(),
            }),
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Spawns the worker. A no-op while the worker is alive, so repeated starts
    /// never produce double-rate ticking.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }

        *self.shared.running.lock().unwrap() = true;

        let shared = Arc::clone(&self.shared);
        let callback = Arc::clone(&self.callback);
        let interval = self.interval;

        self.worker = Some(std::thread::spawn(move || loop {
            let guard = shared.running.lock().unwrap();
            if !*guard {
                break;
            }

            let (guard, wait) = shared.stop_signal.wait_timeout(guard, interval).unwrap();
            let keep_running = *guard;
            drop(guard);

            if !keep_running {
                break;
            }
            if wait.timed_out() {
                callback();
            }
        }));
    }

    /// Signals the worker and blocks until it has fully exited.
    pub fn stop(&mut self) {
        {
            let mut running = self.shared.running.lock().unwrap();
            *running = false;
            self.shared.stop_signal.notify_all();
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for GameTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread::sleep;

    fn counting_timer(interval: Duration) -> (GameTimer, Arc<AtomicU32>) {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);
        let timer = GameTimer::new(interval, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (timer, ticks)
    }

    #[test]
    fn ticks_while_running() {
        let (mut timer, ticks) = counting_timer(Duration::from_millis(10));
        timer.start();
        sleep(Duration::from_millis(100));
        timer.stop();
        assert!(ticks.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn start_is_idempotent() {
        let (mut timer, ticks) = counting_timer(Duration::from_millis(20));
        timer.start();
        timer.start();
        timer.start();
        sleep(Duration::from_millis(130));
        timer.stop();

        // a second worker would roughly double the rate
        let observed = ticks.load(Ordering::SeqCst);
        assert!(observed >= 1, "observed {}", observed);
        assert!(observed <= 9, "observed {}", observed);
    }

    #[test]
    fn no_tick_after_stop_returns() {
        let (mut timer, ticks) = counting_timer(Duration::from_millis(5));
        timer.start();
        sleep(Duration::from_millis(30));
        timer.stop();

        let after_stop = ticks.load(Ordering::SeqCst);
        sleep(Duration::from_millis(30));
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn restarts_after_stop() {
        let (mut timer, ticks) = counting_timer(Duration::from_millis(5));
        timer.start();
        sleep(Duration::from_millis(30));
        timer.stop();
        assert!(!timer.is_running());

        let before_restart = ticks.load(Ordering::SeqCst);
        timer.start();
        assert!(timer.is_running());
        sleep(Duration::from_millis(30));
        timer.stop();
        assert!(ticks.load(Ordering::SeqCst) > before_restart);
    }

    #[test]
    fn stop_without_start_is_harmless() {
        let (mut timer, ticks) = counting_timer(Duration::from_millis(5));
        timer.stop();
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }
}
