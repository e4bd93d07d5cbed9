use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::model::RawRecord;
use crate::normalize::Normalizer;
use crate::store::RecipeStore;

/// Pause after every insert attempt.
pub const INSERT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub success: usize,
    pub errors: usize,
}

impl ImportStats {
    pub fn total(&self) -> usize {
        self.success + self.errors
    }
}

/// Normalize and insert each record in order. Failures are counted and the
/// loop moves on; nothing is rolled back.
pub async fn persist_all(
    store: &dyn RecipeStore,
    normalizer: &Normalizer,
    records: &[RawRecord],
    delay: Duration,
) -> Result<ImportStats> {
    let total = records.len();
    let mut stats = ImportStats::default();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    info!("Importing {} recipes", total);

    for (i, raw) in records.iter().enumerate() {
        let record = normalizer.normalize(raw);
        let n = i + 1;
        pb.set_message(record.name.clone());

        match store.insert(&record).await {
            Ok(rows) if !rows.is_empty() => {
                stats.success += 1;
                pb.suspend(|| info!("[{}/{}] {} - ok", n, total, record.name));
            }
            Ok(_) => {
                stats.errors += 1;
                pb.suspend(|| warn!("[{}/{}] {} - not confirmed", n, total, record.name));
            }
            Err(e) => {
                stats.errors += 1;
                pb.suspend(|| warn!("[{}/{}] {} - error: {}", n, total, record.name, e));
            }
        }

        pb.inc(1);
        tokio::time::sleep(delay).await;
    }

    pb.finish_and_clear();
    Ok(stats)
}
