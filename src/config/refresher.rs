//! Periodic ConfigMap refresh and publication.
//!
//! # Responsibilities
//! - Poll the ConfigMap file at a fixed interval
//! - Detect changes by structural comparison against the published copy
//! - Republish atomically for lock-free concurrent readers
//! - Retarget the log level filter when the document's `level` changes
//!
//! # Design Decisions
//! - Polling, not filesystem notification: mounted ConfigMaps update by
//!   symlink swap, which notification APIs report unreliably
//! - One tick at a time: the loop awaits each refresh before the next
//! - Every tick failure is contained and logged; the loop never exits
//!   on its own

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast;
use tracing_subscriber::filter::LevelFilter;

use crate::config::loader::{load_config_map, ConfigError};
use crate::config::schema::ConfigMap;
use crate::observability::logging::LevelHandle;

/// Reader-visible snapshot of the mounted ConfigMap.
///
/// Single writer (the refresh tick), any number of lock-free readers.
/// The greeting template is derived from the stored document, so a
/// reader always sees one fully-formed document, never a torn mix of
/// old message and new level.
#[derive(Default)]
pub struct PublishedConfig {
    current: ArcSwapOption<ConfigMap>,
}

impl PublishedConfig {
    /// Create an empty snapshot; nothing is published until the first
    /// successful refresh.
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// The currently published document, if any.
    pub fn get(&self) -> Option<Arc<ConfigMap>> {
        self.current.load_full()
    }

    /// The currently published greeting template, if any.
    pub fn greeting_template(&self) -> Option<String> {
        self.current.load().as_ref().map(|c| c.message.clone())
    }

    fn store(&self, doc: Option<Arc<ConfigMap>>) {
        self.current.store(doc);
    }
}

/// Background task that keeps [`PublishedConfig`] in sync with the
/// ConfigMap file.
pub struct ConfigRefresher {
    path: PathBuf,
    interval: Duration,
    published: Arc<PublishedConfig>,
    levels: LevelHandle,
}

impl ConfigRefresher {
    /// Create a refresher polling `path` every `interval`.
    pub fn new(
        path: PathBuf,
        interval: Duration,
        published: Arc<PublishedConfig>,
        levels: LevelHandle,
    ) -> Self {
        Self {
            path,
            interval,
            published,
            levels,
        }
    }

    /// Run until the shutdown signal fires.
    ///
    /// The first poll happens one full interval after start. Ticks are
    /// strictly sequential; a slow refresh delays the next tick rather
    /// than overlapping it.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.interval,
            self.interval,
        );
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            path = ?self.path,
            interval_ms = self.interval.as_millis() as u64,
            "Config refresher started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.refresh().await,
                _ = shutdown.recv() => {
                    tracing::info!("Config refresher stopping");
                    break;
                }
            }
        }
    }

    /// One refresh attempt. Never propagates failure past the tick.
    pub async fn refresh(&self) {
        match load_config_map(&self.path).await {
            Ok(Some(doc)) => self.publish(doc),
            Ok(None) => {
                if self.published.get().is_some() {
                    self.published.store(None);
                }
                tracing::error!(path = ?self.path, "Config map is empty, greeting disabled");
            }
            Err(e) => {
                if self.published.get().is_some() {
                    self.published.store(None);
                }
                tracing::error!(path = ?self.path, "Error getting config: {}", e);
            }
        }
    }

    fn publish(&self, doc: ConfigMap) {
        if self.published.get().as_deref() == Some(&doc) {
            return;
        }

        let doc = Arc::new(doc);
        self.published.store(Some(doc.clone()));

        // A level failure does not undo the content swap above.
        if let Err(e) = self.apply_level(&doc) {
            tracing::error!("Error applying log level from config: {}", e);
        }
    }

    fn apply_level(&self, doc: &ConfigMap) -> Result<(), ConfigError> {
        let name = doc.level.as_deref().ok_or(ConfigError::MissingLevel)?;
        let name = name.to_lowercase();
        let level: LevelFilter = name
            .parse()
            .map_err(|_| ConfigError::InvalidLevel(name.clone()))?;

        if self.levels.current() != Some(level) {
            tracing::info!("New configuration retrieved: {}", doc.message);
            tracing::info!("New log level: {}", name);
            self.levels.set(level);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::reload;

    struct Fixture {
        refresher: ConfigRefresher,
        published: Arc<PublishedConfig>,
        levels: LevelHandle,
        dir: tempfile::TempDir,
        // Dropping the layer would disconnect the handle.
        _layer: reload::Layer<LevelFilter, tracing_subscriber::Registry>,
    }

    fn fixture(initial: LevelFilter) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app-config.yml");
        let (layer, handle) = reload::Layer::new(initial);
        let levels = LevelHandle::new(handle);
        let published = Arc::new(PublishedConfig::new());
        let refresher = ConfigRefresher::new(
            path,
            Duration::from_millis(2000),
            published.clone(),
            levels.clone(),
        );
        Fixture {
            refresher,
            published,
            levels,
            dir,
            _layer: layer,
        }
    }

    impl Fixture {
        fn write(&self, content: &str) {
            fs::write(self.dir.path().join("app-config.yml"), content).unwrap();
        }

        fn remove(&self) {
            fs::remove_file(self.dir.path().join("app-config.yml")).unwrap();
        }
    }

    #[test]
    fn nothing_published_before_first_load() {
        let fx = fixture(LevelFilter::INFO);
        assert!(fx.published.get().is_none());
        assert!(fx.published.greeting_template().is_none());
    }

    #[tokio::test]
    async fn first_successful_refresh_publishes() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;
        assert_eq!(fx.published.greeting_template().as_deref(), Some("Hello %s"));
    }

    #[tokio::test]
    async fn unchanged_content_does_not_republish() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;
        let first = fx.published.get().unwrap();

        fx.refresher.refresh().await;
        let second = fx.published.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fx.levels.current(), Some(LevelFilter::INFO));
    }

    #[tokio::test]
    async fn message_change_republishes_without_touching_level() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;

        fx.write("message: Hello %s!\nlevel: info\n");
        fx.refresher.refresh().await;

        assert_eq!(
            fx.published.greeting_template().as_deref(),
            Some("Hello %s!")
        );
        assert_eq!(fx.levels.current(), Some(LevelFilter::INFO));
    }

    #[tokio::test]
    async fn level_change_updates_the_filter() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;

        fx.write("message: Hello %s\nlevel: DEBUG\n");
        fx.refresher.refresh().await;

        assert_eq!(fx.published.greeting_template().as_deref(), Some("Hello %s"));
        assert_eq!(fx.levels.current(), Some(LevelFilter::DEBUG));
    }

    #[tokio::test]
    async fn absence_clears_published_config() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;
        assert!(fx.published.get().is_some());

        fx.remove();
        fx.refresher.refresh().await;
        assert!(fx.published.get().is_none());
        assert!(fx.published.greeting_template().is_none());
    }

    #[tokio::test]
    async fn absence_does_not_touch_level() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: debug\n");
        fx.refresher.refresh().await;
        assert_eq!(fx.levels.current(), Some(LevelFilter::DEBUG));

        fx.remove();
        fx.refresher.refresh().await;
        assert_eq!(fx.levels.current(), Some(LevelFilter::DEBUG));
    }

    #[tokio::test]
    async fn config_reappearing_after_absence_is_republished() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;
        fx.remove();
        fx.refresher.refresh().await;
        assert!(fx.published.get().is_none());

        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;
        assert_eq!(fx.published.greeting_template().as_deref(), Some("Hello %s"));
    }

    #[tokio::test]
    async fn empty_file_clears_published_config() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;

        fx.write("");
        fx.refresher.refresh().await;
        assert!(fx.published.get().is_none());
    }

    #[tokio::test]
    async fn parse_failure_clears_published_config() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");
        fx.refresher.refresh().await;

        fx.write("message: [broken\n");
        fx.refresher.refresh().await;
        assert!(fx.published.get().is_none());
    }

    #[tokio::test]
    async fn missing_level_still_publishes_content() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\n");
        fx.refresher.refresh().await;

        assert_eq!(fx.published.greeting_template().as_deref(), Some("Hello %s"));
        assert_eq!(fx.levels.current(), Some(LevelFilter::INFO));
    }

    #[tokio::test]
    async fn unknown_level_still_publishes_content() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: loud\n");
        fx.refresher.refresh().await;

        assert_eq!(fx.published.greeting_template().as_deref(), Some("Hello %s"));
        assert_eq!(fx.levels.current(), Some(LevelFilter::INFO));
    }

    #[tokio::test]
    async fn level_comparison_is_case_insensitive() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: INFO\n");
        fx.refresher.refresh().await;
        // "INFO" normalizes to the already-active level.
        assert_eq!(fx.levels.current(), Some(LevelFilter::INFO));

        fx.write("message: Hello %s\nlevel: WaRn\n");
        fx.refresher.refresh().await;
        assert_eq!(fx.levels.current(), Some(LevelFilter::WARN));
    }

    #[tokio::test]
    async fn concurrent_readers_never_see_a_torn_document() {
        let fx = fixture(LevelFilter::INFO);
        let doc_a = "message: Hello %s\nlevel: info\n";
        let doc_b = "message: Goodbye %s\nlevel: debug\n";

        fx.write(doc_a);
        fx.refresher.refresh().await;
        let full_a = fx.published.get().unwrap();

        fx.write(doc_b);
        fx.refresher.refresh().await;
        let full_b = fx.published.get().unwrap();

        let stop = Arc::new(AtomicBool::new(false));
        let mut readers = Vec::new();
        for _ in 0..4 {
            let published = fx.published.clone();
            let stop = stop.clone();
            let a = full_a.clone();
            let b = full_b.clone();
            readers.push(std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if let Some(snapshot) = published.get() {
                        // Message and level must come from the same
                        // document, never one field from each.
                        assert!(
                            *snapshot == *a || *snapshot == *b,
                            "observed a torn document: {:?}",
                            snapshot
                        );
                    }
                }
            }));
        }

        for _ in 0..100 {
            fx.write(doc_a);
            fx.refresher.refresh().await;
            fx.write(doc_b);
            fx.refresher.refresh().await;
        }

        stop.store(true, Ordering::Relaxed);
        for reader in readers {
            reader.join().unwrap();
        }
    }

    /// Collects formatted log output for inspection.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn unchanged_content_emits_no_info_lines() {
        let fx = fixture(LevelFilter::INFO);
        // "debug" differs from the active level, so the first tick
        // announces the new configuration.
        fx.write("message: Hello %s\nlevel: debug\n");

        let capture = Capture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(LevelFilter::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        fx.refresher.refresh().await;
        let first = capture.contents();
        assert!(first.contains("New configuration retrieved"));
        assert!(first.contains("New log level: debug"));

        fx.refresher.refresh().await;
        let second = capture.contents();
        assert_eq!(first, second, "second tick emitted log lines");
    }

    #[tokio::test]
    async fn run_waits_one_interval_before_first_poll() {
        let fx = fixture(LevelFilter::INFO);
        fx.write("message: Hello %s\nlevel: info\n");

        let published = fx.published.clone();
        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(fx.refresher.run(rx));

        // Well inside the 2000 ms interval nothing is published yet.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(published.get().is_none());

        tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let fx = fixture(LevelFilter::INFO);
        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(fx.refresher.run(rx));
        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("refresher did not stop")
            .unwrap();
    }
}
