//! Analyzer plus orchestrator with request supersession.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use sprig_config::SmartSelectConfig;

use super::{SelectionOrchestrator, SelectionUpdate};
use crate::analysis::walker::normalize_and_validate_path;
use crate::analysis::{AnalysisControl, AnalyzeError, Analyzer, CancellationToken, Progress};
use crate::graph::GraphStatus;

#[derive(Debug)]
struct InFlight {
    generation: u64,
    token: CancellationToken,
}

/// Selection front-end for one project.
///
/// `select` may be called concurrently. When a root is selected again while
/// its previous analysis is still running, the previous one is cancelled and
/// its result is dropped; `select` then returns `Ok(None)` for it.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sprig_config::SmartSelectConfig;
/// use sprig_graph::{Analyzer, AnalyzerOptions, SelectionSession};
///
/// # async fn example() -> Result<(), sprig_graph::AnalyzeError> {
/// let analyzer = Analyzer::native(AnalyzerOptions::default())?;
/// let session = SelectionSession::new(
///     Arc::new(analyzer),
///     SmartSelectConfig::default().with_enabled(true),
/// );
///
/// if let Some(update) = session.select("src/App.tsx").await? {
///     println!("+{} files", update.added.len());
/// }
/// let update = session.deselect("src/App.tsx")?;
/// println!("-{} files", update.removed.len());
/// # Ok(())
/// # }
/// ```
pub struct SelectionSession {
    analyzer: Arc<Analyzer>,
    orchestrator: SelectionOrchestrator,
    config: RwLock<SmartSelectConfig>,
    in_flight: Mutex<FxHashMap<PathBuf, InFlight>>,
    generation: AtomicU64,
    progress: Option<Arc<dyn Fn(&Path, Progress) + Send + Sync>>,
}

impl SelectionSession {
    pub fn new(analyzer: Arc<Analyzer>, config: SmartSelectConfig) -> Self {
        Self {
            analyzer,
            orchestrator: SelectionOrchestrator::new(),
            config: RwLock::new(config),
            in_flight: Mutex::new(FxHashMap::default()),
            generation: AtomicU64::new(0),
            progress: None,
        }
    }

    /// Receive progress for every running analysis, tagged with its root.
    pub fn with_progress(
        mut self,
        callback: impl Fn(&Path, Progress) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn orchestrator(&self) -> &SelectionOrchestrator {
        &self.orchestrator
    }

    pub fn config(&self) -> SmartSelectConfig {
        self.config.read().clone()
    }

    /// Replace the settings used by later requests.
    pub fn set_config(&self, config: SmartSelectConfig) {
        *self.config.write() = config;
    }

    /// Analyze `root` and merge its graph into the selection.
    ///
    /// Returns `Ok(None)` when the request was superseded or cancelled
    /// before it finished.
    pub async fn select(
        &self,
        root: impl AsRef<Path>,
    ) -> Result<Option<SelectionUpdate>, AnalyzeError> {
        let root = self.normalize(root.as_ref())?;
        let token = CancellationToken::new();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        if let Some(previous) = self.in_flight.lock().insert(
            root.clone(),
            InFlight {
                generation,
                token: token.clone(),
            },
        ) {
            tracing::debug!(root = %root.display(), "superseding in-flight analysis");
            previous.token.cancel();
        }

        let mut control = AnalysisControl::new().with_cancellation(token.clone());
        if let Some(progress) = &self.progress {
            let progress = Arc::clone(progress);
            let tagged = root.clone();
            control = control.with_progress(move |p| progress(&tagged, p));
        }

        let config = self.config();
        let result = self.analyzer.analyze_with(&root, &config, &control).await;

        // Held through `apply_root`, so a concurrent `deselect` either cancels
        // this request first or removes the applied result afterwards.
        let mut in_flight = self.in_flight.lock();
        let current = in_flight
            .get(&root)
            .is_some_and(|f| f.generation == generation);
        if current {
            in_flight.remove(&root);
        }

        let graph = result?;
        if !current || token.is_cancelled() || graph.status == GraphStatus::Cancelled {
            tracing::debug!(root = %root.display(), "dropping stale analysis result");
            return Ok(None);
        }

        let update = self.orchestrator.apply_root(&root, &graph);
        drop(in_flight);
        Ok(Some(update))
    }

    /// Remove `root`'s contribution, cancelling its analysis if one is running.
    pub fn deselect(&self, root: impl AsRef<Path>) -> Result<SelectionUpdate, AnalyzeError> {
        let root = self.normalize(root.as_ref())?;
        self.cancel(&root);
        Ok(self.orchestrator.remove_root(&root))
    }

    /// Cancel the running analysis for `root`, if any. Its result will be dropped.
    pub fn cancel(&self, root: &Path) -> bool {
        match self.in_flight.lock().remove(root) {
            Some(in_flight) => {
                in_flight.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every running analysis.
    pub fn cancel_all(&self) {
        for (_, in_flight) in self.in_flight.lock().drain() {
            in_flight.token.cancel();
        }
    }

    /// Number of analyses currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn normalize(&self, root: &Path) -> Result<PathBuf, AnalyzeError> {
        let project_root = self.analyzer.project_root();
        normalize_and_validate_path(root, project_root).map_err(|e| {
            AnalyzeError::RootOutsideProject {
                path: e.path,
                project_root: e.root,
            }
        })
    }
}

impl std::fmt::Debug for SelectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSession")
            .field("project_root", &self.analyzer.project_root())
            .field("selected", &self.orchestrator.len())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
