//! Change-driven re-runs.
//!
//! Watches the site root recursively and re-applies the patcher to HTML
//! files that change. Passes are serialized through one loop; a batch caused
//! by the patcher's own rewrite converges to `AlreadyCompliant` on the next
//! round and stops re-triggering, because every rule is idempotent.

use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::applicator::{discover_html_files, fix_file, is_html_path, FileReport};
use crate::patcher::Patcher;
use crate::safety::SiteGuard;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
const RERUN_COOLDOWN_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// Pure debouncer: only handles timing and event deduplication.
pub struct Debouncer {
    /// Path -> ChangeKind (dedup is free via map key uniqueness)
    changes: HashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
    last_run: Option<Instant>,
    debounce: Duration,
    cooldown: Duration,
}

impl Debouncer {
    pub fn new(debounce: Duration) -> Self {
        Self {
            changes: HashMap::new(),
            last_event: None,
            last_run: None,
            debounce,
            cooldown: Duration::from_millis(RERUN_COOLDOWN_MS),
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Removed + Created/Modified -> the restore event wins
    /// - Modified + Removed -> upgrade to Removed
    /// - Created + Removed -> appeared then vanished, discard
    /// - Same kind: first event wins
    pub fn add_event(&mut self, event: &Event) {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // Metadata-only changes (mtime/chmod noise) would re-trigger
                // endlessly
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }

            let path = path.clone();
            if let Some(&existing) = self.changes.get(&path) {
                match (existing, kind) {
                    (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                        self.changes.insert(path, kind);
                    }
                    (ChangeKind::Modified, ChangeKind::Removed) => {
                        self.changes.insert(path, ChangeKind::Removed);
                    }
                    (ChangeKind::Created, ChangeKind::Removed) => {
                        self.changes.remove(&path);
                    }
                    _ => continue,
                }
            } else {
                self.changes.insert(path, kind);
            }
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the batch if debounce + cooldown elapsed.
    pub fn take_if_ready(&mut self) -> Option<HashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }

        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;

        if changes.is_empty() {
            return None;
        }

        self.last_run = Some(Instant::now());
        Some(changes)
    }

    pub fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < self.debounce {
            return false;
        }

        if let Some(last_run) = self.last_run {
            if last_run.elapsed() < self.cooldown {
                return false;
            }
        }

        !self.changes.is_empty()
    }

    /// Precise sleep duration until the next possible ready time.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining = self.debounce.saturating_sub(last_event.elapsed());

        let cooldown_remaining = self
            .last_run
            .map(|t| self.cooldown.saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.changes.len()
    }
}

/// Check if path is a temp/backup file (editor and tempfile artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to watch {path}: {source}")]
    Notify {
        path: PathBuf,
        source: notify::Error,
    },
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// Watch the site root and keep it compliant.
///
/// Runs an initial full pass over the tree, then re-fixes changed HTML files
/// per debounced batch. Every [`FileReport`] is handed to `report`. Blocks
/// until the watch backend disconnects.
pub fn watch_site(
    patcher: &Patcher,
    guard: &SiteGuard,
    options: &WatchOptions,
    mut report: impl FnMut(&FileReport),
) -> Result<(), WatchError> {
    let root = guard.site_root().to_path_buf();

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        let _ = tx.send(res);
    })
    .map_err(|source| WatchError::Notify {
        path: root.clone(),
        source,
    })?;
    watcher
        .watch(guard.site_root(), RecursiveMode::Recursive)
        .map_err(|source| WatchError::Notify {
            path: guard.site_root().to_path_buf(),
            source,
        })?;

    // Initial full pass
    for file in discover_html_files(guard.site_root()) {
        report(&fix_file(patcher, guard, &file, false).report);
    }

    let mut debouncer = Debouncer::new(options.debounce);
    loop {
        match rx.recv_timeout(debouncer.sleep_duration()) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            // Backend hiccup on a single event: keep watching
            Ok(Err(_)) => {}
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }

        if let Some(changes) = debouncer.take_if_ready() {
            let mut batch: Vec<PathBuf> = changes
                .into_iter()
                .filter(|(path, kind)| *kind != ChangeKind::Removed && is_html_path(path))
                .map(|(path, _)| path)
                .collect();
            batch.sort();

            for path in batch {
                report(&fix_file(patcher, guard, &path, false).report);
            }
        }
    }
}
