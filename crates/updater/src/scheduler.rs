use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use infinity_protocol::UpdateInfo;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::checker::UpdateChecker;
use crate::error::UpdateError;

/// Default delay before the first check.
const INITIAL_DELAY: Duration = Duration::from_secs(10);
/// Default time between checks.
const CHECK_INTERVAL: Duration = Duration::from_secs(4 * 60 * 60);

/// Progress reported to the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    /// A newer version exists; download starts right away.
    Available(UpdateInfo),
    /// The update is downloaded and will be installed on quit.
    Downloaded(UpdateInfo),
}

/// Receives [`UpdateEvent`]s.
pub type EventSink = Arc<dyn Fn(UpdateEvent) + Send + Sync + 'static>;

/// Timing of the update loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub initial_delay: Duration,
    pub interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            initial_delay: INITIAL_DELAY,
            interval: CHECK_INTERVAL,
        }
    }
}

impl ScheduleConfig {
    pub fn from_secs(initial_delay: u64, interval: u64) -> Self {
        Self {
            initial_delay: Duration::from_secs(initial_delay),
            // A zero interval would spin.
            interval: Duration::from_secs(interval.max(1)),
        }
    }
}

/// Periodic update checks with automatic download.
pub struct UpdateScheduler<C> {
    checker: Arc<C>,
    config: ScheduleConfig,
    sink: EventSink,
    downloaded: Mutex<Option<String>>,
    cancel: CancellationToken,
}

impl<C: UpdateChecker> UpdateScheduler<C> {
    pub fn new(checker: Arc<C>, config: ScheduleConfig, sink: EventSink) -> Self {
        Self {
            checker,
            config,
            sink,
            downloaded: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    pub fn checker(&self) -> &Arc<C> {
        &self.checker
    }

    /// Version already downloaded and waiting for install.
    pub fn downloaded_version(&self) -> Option<String> {
        self.downloaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs one check, downloading the update when one is found.
    ///
    /// A version that was already downloaded is announced again but not
    /// downloaded twice.
    pub async fn check_once(&self) -> Result<Option<UpdateInfo>, UpdateError> {
        let Some(update) = self.checker.check().await? else {
            debug!("no update available");
            return Ok(None);
        };

        info!(version = %update.version, "update available");
        (self.sink)(UpdateEvent::Available(update.clone()));

        if self.downloaded_version().as_deref() == Some(update.version.as_str()) {
            debug!(version = %update.version, "update already downloaded");
            return Ok(Some(update));
        }

        self.checker.download(&update).await?;
        info!(version = %update.version, "update downloaded, installs on quit");
        *self.downloaded.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(update.version.clone());
        (self.sink)(UpdateEvent::Downloaded(update.clone()));

        Ok(Some(update))
    }

    /// Runs the loop until [`stop`](Self::stop). Errors are logged and the
    /// loop keeps going. The caller spawns it on the runtime it owns.
    pub async fn run(&self) {
        tokio::select! {
            _ = self.cancel.cancelled() => return,
            _ = tokio::time::sleep(self.config.initial_delay) => {}
        }

        let mut interval = tokio::time::interval(self.config.interval);
        // After a suspend, check once and restart the period instead of
        // replaying every missed tick.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.check_once().await {
                        warn!("{e}");
                    }
                }
            }
        }
        debug!("update scheduler stopped");
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Installs the downloaded update. Errors are logged, not returned.
    pub fn install_on_quit(&self) {
        self.stop();
        if self.downloaded_version().is_none() {
            return;
        }
        match self.checker.install() {
            Ok(true) => info!("update installed"),
            Ok(false) => debug!("no update to install"),
            Err(e) => error!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::UpdateFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeChecker {
        version: Mutex<Option<String>>,
        fail_checks: Mutex<usize>,
        fail_downloads: Mutex<usize>,
        checks: AtomicUsize,
        downloads: AtomicUsize,
        installs: AtomicUsize,
    }

    impl FakeChecker {
        fn offering(version: &str) -> Self {
            let checker = Self::default();
            *checker.version.lock().unwrap() = Some(version.to_string());
            checker
        }
    }

    impl UpdateChecker for FakeChecker {
        fn check(&self) -> UpdateFuture<'_, Option<UpdateInfo>> {
            Box::pin(async move {
                self.checks.fetch_add(1, Ordering::SeqCst);
                let mut failures = self.fail_checks.lock().unwrap();
                if *failures > 0 {
                    *failures -= 1;
                    return Err(UpdateError::Check("offline".into()));
                }
                Ok(self
                    .version
                    .lock()
                    .unwrap()
                    .clone()
                    .map(|version| UpdateInfo { version }))
            })
        }

        fn download<'a>(&'a self, _info: &'a UpdateInfo) -> UpdateFuture<'a, ()> {
            Box::pin(async move {
                self.downloads.fetch_add(1, Ordering::SeqCst);
                let mut failures = self.fail_downloads.lock().unwrap();
                if *failures > 0 {
                    *failures -= 1;
                    return Err(UpdateError::Download("connection reset".into()));
                }
                Ok(())
            })
        }

        fn install(&self) -> Result<bool, UpdateError> {
            self.installs.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<UpdateEvent>>>, EventSink) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let e = events.clone();
        (events, Arc::new(move |event: UpdateEvent| e.lock().unwrap().push(event)))
    }

    fn info(version: &str) -> UpdateInfo {
        UpdateInfo {
            version: version.into(),
        }
    }

    fn spawn_run(scheduler: &Arc<UpdateScheduler<FakeChecker>>) -> tokio::task::JoinHandle<()> {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run().await })
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn found_update_is_announced_then_downloaded() {
        let (events, sink) = recorder();
        let scheduler = UpdateScheduler::new(
            Arc::new(FakeChecker::offering("1.5.0")),
            ScheduleConfig::default(),
            sink,
        );

        let found = scheduler.check_once().await.unwrap();
        assert_eq!(found, Some(info("1.5.0")));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                UpdateEvent::Available(info("1.5.0")),
                UpdateEvent::Downloaded(info("1.5.0")),
            ]
        );
        assert_eq!(scheduler.downloaded_version().as_deref(), Some("1.5.0"));
    }

    #[tokio::test]
    async fn no_update_emits_nothing() {
        let (events, sink) = recorder();
        let scheduler =
            UpdateScheduler::new(Arc::new(FakeChecker::default()), ScheduleConfig::default(), sink);

        assert_eq!(scheduler.check_once().await.unwrap(), None);
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(scheduler.checker().downloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn same_version_is_not_downloaded_twice() {
        let (events, sink) = recorder();
        let scheduler = UpdateScheduler::new(
            Arc::new(FakeChecker::offering("2.0.0")),
            ScheduleConfig::default(),
            sink,
        );

        scheduler.check_once().await.unwrap();
        scheduler.check_once().await.unwrap();

        assert_eq!(scheduler.checker().downloads.load(Ordering::SeqCst), 1);
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], UpdateEvent::Available(info("2.0.0")));
    }

    #[tokio::test]
    async fn newer_version_is_downloaded() {
        let (_events, sink) = recorder();
        let checker = Arc::new(FakeChecker::offering("2.0.0"));
        let scheduler = UpdateScheduler::new(checker.clone(), ScheduleConfig::default(), sink);

        scheduler.check_once().await.unwrap();
        *checker.version.lock().unwrap() = Some("2.0.1".into());
        scheduler.check_once().await.unwrap();

        assert_eq!(checker.downloads.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.downloaded_version().as_deref(), Some("2.0.1"));
    }

    #[tokio::test]
    async fn failed_download_is_retried_next_check() {
        let (events, sink) = recorder();
        let checker = Arc::new(FakeChecker::offering("3.1.0"));
        *checker.fail_downloads.lock().unwrap() = 1;
        let scheduler = UpdateScheduler::new(checker.clone(), ScheduleConfig::default(), sink);

        let err = scheduler.check_once().await.unwrap_err();
        assert!(matches!(err, UpdateError::Download(_)));
        assert_eq!(scheduler.downloaded_version(), None);

        scheduler.check_once().await.unwrap();
        assert_eq!(checker.downloads.load(Ordering::SeqCst), 2);
        assert_eq!(
            events.lock().unwrap().last(),
            Some(&UpdateEvent::Downloaded(info("3.1.0")))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn first_check_after_initial_delay_then_every_interval() {
        let (_events, sink) = recorder();
        let checker = Arc::new(FakeChecker::default());
        let scheduler = Arc::new(UpdateScheduler::new(
            checker.clone(),
            ScheduleConfig::default(),
            sink,
        ));
        let handle = spawn_run(&scheduler);

        settle().await;
        tokio::time::advance(Duration::from_secs(9)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(4 * 60 * 60)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 2);

        scheduler.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn check_errors_do_not_stop_the_loop() {
        let (events, sink) = recorder();
        let checker = Arc::new(FakeChecker::offering("1.1.0"));
        *checker.fail_checks.lock().unwrap() = 1;
        let scheduler = Arc::new(UpdateScheduler::new(
            checker.clone(),
            ScheduleConfig::from_secs(1, 60),
            sink,
        ));
        let handle = spawn_run(&scheduler);

        settle().await;
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 1);
        assert!(events.lock().unwrap().is_empty());

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 2);
        assert_eq!(events.lock().unwrap().len(), 2);

        scheduler.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn missed_checks_are_not_replayed() {
        let (_events, sink) = recorder();
        let checker = Arc::new(FakeChecker::default());
        let scheduler = Arc::new(UpdateScheduler::new(
            checker.clone(),
            ScheduleConfig::from_secs(1, 60),
            sink,
        ));
        let handle = spawn_run(&scheduler);

        settle().await;
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 1);

        // Three periods pass at once, as after a sleep.
        tokio::time::advance(Duration::from_secs(180)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(59)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(checker.checks.load(Ordering::SeqCst), 3);

        scheduler.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_first_check() {
        let (_events, sink) = recorder();
        let checker = Arc::new(FakeChecker::offering("9.9.9"));
        let scheduler = Arc::new(UpdateScheduler::new(
            checker.clone(),
            ScheduleConfig::default(),
            sink,
        ));
        let handle = spawn_run(&scheduler);

        scheduler.stop();
        handle.await.unwrap();
        assert_eq!(checker.checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn install_on_quit_only_with_download() {
        let (_events, sink) = recorder();
        let checker = Arc::new(FakeChecker::offering("4.0.0"));
        let scheduler = UpdateScheduler::new(checker.clone(), ScheduleConfig::default(), sink);

        scheduler.install_on_quit();
        assert_eq!(checker.installs.load(Ordering::SeqCst), 0);

        scheduler.check_once().await.unwrap();
        scheduler.install_on_quit();
        assert_eq!(checker.installs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = ScheduleConfig::from_secs(0, 0);
        assert_eq!(config.initial_delay, Duration::ZERO);
        assert_eq!(config.interval, Duration::from_secs(1));
    }
}
