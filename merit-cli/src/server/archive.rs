use std::{io::ErrorKind, path::PathBuf};

use chrono::{DateTime, Local};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{core::plan::ProductionPlan, prelude::*};

/// Files sharing a timestamp before giving up.
const MAX_ATTEMPTS: usize = 100;

/// Keeps a copy of every production plan served.
pub struct Archive {
    directory: PathBuf,
}

impl Archive {
    pub const fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    /// Store the plan, a failure is only logged.
    pub async fn store(&self, plan: &ProductionPlan) {
        if let Err(error) = self.store_fallible(plan, Local::now()).await {
            warn!("failed to archive the production plan: {error:#}");
        }
    }

    #[instrument(skip_all)]
    async fn store_fallible(
        &self,
        plan: &ProductionPlan,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("failed to create `{}`", self.directory.display()))?;
        let contents = serde_json::to_vec_pretty(plan)?;
        let stem = format!("response-{}", now.format("%Y%m%d-%H%M%S%.6f"));

        for attempt in 0..MAX_ATTEMPTS {
            let path = if attempt == 0 {
                self.directory.join(format!("{stem}.json"))
            } else {
                self.directory.join(format!("{stem}-{attempt}.json"))
            };
            let opened = OpenOptions::new().write(true).create_new(true).open(&path).await;
            let mut file = match opened {
                Ok(file) => file,
                Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "taken");
                    continue;
                }
                Err(error) => {
                    return Err(error)
                        .with_context(|| format!("failed to create `{}`", path.display()));
                }
            };
            file.write_all(&contents)
                .await
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            file.flush().await?;
            info!(path = %path.display(), "archived");
            return Ok(path);
        }
        bail!(
            "no free name for `{stem}` in `{}` after {MAX_ATTEMPTS} attempts",
            self.directory.display(),
        )
    }
}
