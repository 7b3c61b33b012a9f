//! Watching a saved component config for edits.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the config watcher.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// Config was created or written
    Changed(PathBuf),

    /// Config was deleted
    Removed(PathBuf),
}

/// Watches one config file.
///
/// Editors often replace files instead of writing in place, so the parent
/// directory is watched and events are filtered by file name.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Start watching `config`.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(config: &Path) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let dir = match config.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        let target = config.to_path_buf();
        std::thread::spawn(move || {
            let mut debouncer = Debouncer::new(QUIET_PERIOD);

            loop {
                let received = match debouncer.wait(Instant::now()) {
                    Some(wait) => sync_rx.recv_timeout(wait),
                    None => sync_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };

                match received {
                    Ok(event) => {
                        for path in &event.paths {
                            if let Some(watch_event) = classify_event(&target, path, &event.kind) {
                                debouncer.push(watch_event, Instant::now());
                            }
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        if let Some(watch_event) = debouncer.flush() {
                            let _ = async_tx.blocking_send(watch_event);
                        }
                        return;
                    }
                }

                if let Some(watch_event) = debouncer.ready(Instant::now()) {
                    if async_tx.blocking_send(watch_event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Time a config must stay quiet before its last event is emitted.
const QUIET_PERIOD: Duration = Duration::from_millis(100);

/// Trailing-edge debounce: a burst of events (truncate then write, or
/// remove then create) collapses into its last event once the file goes
/// quiet.
#[derive(Debug)]
struct Debouncer {
    quiet: Duration,
    pending: Option<(Instant, WatchEvent)>,
}

impl Debouncer {
    fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    fn push(&mut self, event: WatchEvent, now: Instant) {
        self.pending = Some((now, event));
    }

    /// How long to wait before the pending event is due, if there is one.
    fn wait(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(at, _)| (*at + self.quiet).saturating_duration_since(now))
    }

    fn ready(&mut self, now: Instant) -> Option<WatchEvent> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(at, _)| now.duration_since(*at) >= self.quiet);
        if due {
            self.flush()
        } else {
            None
        }
    }

    fn flush(&mut self) -> Option<WatchEvent> {
        self.pending.take().map(|(_, event)| event)
    }
}

/// Classify a notify event on `path` relative to the watched `target`.
fn classify_event(target: &Path, path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    if path.file_name() != target.file_name() {
        return None;
    }

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed(target.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(target.to_path_buf())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use notify::EventKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_only_the_target() {
        let target = Path::new("/work/button-config.json");

        assert_eq!(
            classify_event(
                target,
                Path::new("/work/button-config.json"),
                &EventKind::Modify(ModifyKind::Any)
            ),
            Some(WatchEvent::Changed(target.to_path_buf()))
        );
        assert_eq!(
            classify_event(
                target,
                Path::new("/work/button-config.json"),
                &EventKind::Remove(RemoveKind::File)
            ),
            Some(WatchEvent::Removed(target.to_path_buf()))
        );
        assert_eq!(
            classify_event(
                target,
                Path::new("/work/other.json"),
                &EventKind::Create(CreateKind::File)
            ),
            None
        );
    }

    #[test]
    fn debounce_emits_last_event_after_quiet_period() {
        let path = PathBuf::from("/work/card-config.json");
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET_PERIOD);

        debouncer.push(WatchEvent::Removed(path.clone()), start);
        debouncer.push(
            WatchEvent::Changed(path.clone()),
            start + Duration::from_millis(60),
        );

        assert_eq!(debouncer.ready(start + Duration::from_millis(120)), None);
        assert_eq!(
            debouncer.wait(start + Duration::from_millis(120)),
            Some(Duration::from_millis(40))
        );
        assert_eq!(
            debouncer.ready(start + Duration::from_millis(160)),
            Some(WatchEvent::Changed(path))
        );
        assert_eq!(debouncer.wait(start + Duration::from_millis(160)), None);
    }

    #[tokio::test]
    async fn watches_config_changes() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("card-config.json");
        fs::write(&config, "{}").unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&config).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(temp.path().join("unrelated.txt"), "x").unwrap();
        fs::write(&config, r#"{"id":"x"}"#).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        let event = event.expect("timeout waiting for config watch event");
        assert_eq!(event, Some(WatchEvent::Changed(config)));
    }
}
