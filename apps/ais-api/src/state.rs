use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use color_eyre::eyre::WrapErr;
use tokio::sync::Mutex;

use ais_domain::feedback::FeedbackEntry;
use ais_service::RankingEngine;

#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<RankingEngine>,
	snapshot: Option<PathBuf>,
	/// Serializes snapshot writes so a slower write never lands after a newer one.
	persist: Arc<Mutex<()>>,
}
impl AppState {
	/// Builds the engine and, when `feedback.snapshot_path` points at an existing file, restores
	/// the feedback log from it.
	pub async fn new(config: ais_config::Config) -> color_eyre::Result<Self> {
		let snapshot = config.feedback.snapshot_path.as_ref().map(PathBuf::from);
		let engine = RankingEngine::new(config);

		if let Some(path) = snapshot.as_ref().filter(|path| path.exists()) {
			let path = path.clone();
			let entries = tokio::task::spawn_blocking(move || read_snapshot(&path)).await??;

			engine.restore_feedback(entries);
		}

		Ok(Self { engine: Arc::new(engine), snapshot, persist: Arc::default() })
	}

	pub fn with_engine(engine: RankingEngine) -> Self {
		let snapshot = engine.cfg.feedback.snapshot_path.as_ref().map(PathBuf::from);

		Self { engine: Arc::new(engine), snapshot, persist: Arc::default() }
	}

	/// Writes the current feedback log to the snapshot file, if one is configured. Failures are
	/// logged; the in-memory log stays authoritative.
	pub async fn persist_feedback(&self) {
		let Some(path) = self.snapshot.clone() else { return };
		let _guard = self.persist.lock().await;
		// Read under the guard so the last writer always holds the newest log.
		let entries = self.engine.feedback_entries();
		let written = tokio::task::spawn_blocking(move || write_snapshot(&path, &entries)).await;

		match written {
			Ok(Ok(())) => {},
			Ok(Err(err)) => tracing::warn!(error = %err, "Failed to write feedback snapshot."),
			Err(err) => tracing::warn!(error = %err, "Feedback snapshot task failed."),
		}
	}
}

fn read_snapshot(path: &Path) -> color_eyre::Result<Vec<FeedbackEntry>> {
	let raw = std::fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read feedback snapshot at {}.", path.display()))?;
	let entries = serde_json::from_str(&raw)
		.wrap_err_with(|| format!("Failed to parse feedback snapshot at {}.", path.display()))?;

	Ok(entries)
}

/// Writes next to `path` first and renames over it, so readers never see a partial file.
fn write_snapshot(path: &Path, entries: &[FeedbackEntry]) -> color_eyre::Result<()> {
	let raw = serde_json::to_vec_pretty(entries)?;
	let staging = staging_path(path);

	std::fs::write(&staging, raw)
		.wrap_err_with(|| format!("Failed to write feedback snapshot at {}.", staging.display()))?;
	std::fs::rename(&staging, path)
		.wrap_err_with(|| format!("Failed to replace feedback snapshot at {}.", path.display()))?;

	Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
	let mut staging = path.as_os_str().to_owned();

	staging.push(".tmp");

	PathBuf::from(staging)
}
