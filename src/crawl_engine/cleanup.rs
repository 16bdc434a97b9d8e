//! Browser and profile directory teardown after a crawl

use anyhow::Result;
use chromiumoxide::Browser;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of cleanup operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

impl CleanupResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Close the browser, wait for the process to exit, then remove the
/// profile directory if this run created it
///
/// Every step runs even when an earlier one fails; failures are collected
/// into [`CleanupResult::PartialFailure`].
pub async fn cleanup_browser_and_data(
    mut browser: Browser,
    owned_data_dir: Option<PathBuf>,
) -> Result<CleanupResult> {
    let mut errors = Vec::new();

    debug!(target: "pagescrape::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "pagescrape::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
    }

    debug!(target: "pagescrape::cleanup", "Waiting for browser process to exit");
    if let Err(e) = browser.wait().await {
        warn!(target: "pagescrape::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    if let Some(dir) = owned_data_dir
        && let Err(e) = remove_profile_dir(&dir).await
    {
        errors.push(format!("Directory cleanup failed: {e}"));
    }

    if errors.is_empty() {
        Ok(CleanupResult::Success)
    } else {
        Ok(CleanupResult::PartialFailure(errors))
    }
}

/// Remove a scratch profile directory, logging a failure
///
/// # Errors
///
/// The I/O error from the removal.
pub async fn remove_profile_dir(dir: &Path) -> std::io::Result<()> {
    debug!(target: "pagescrape::cleanup", "Removing profile directory {}", dir.display());
    tokio::fs::remove_dir_all(dir).await.inspect_err(|e| {
        warn!(
            target: "pagescrape::cleanup",
            "Failed to remove profile directory {}: {e}",
            dir.display()
        );
    })
}
