//! Concurrent batch analysis
//!
//! Items run on the tokio runtime with at most `concurrency` in flight.
//! Results land in a pre-sized vector at their input index, so output order
//! always matches input order regardless of completion order.

use std::collections::BTreeMap;
use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::{AnalyzerConfig, DEFAULT_BATCH_CONCURRENCY};
use crate::evaluator::Analyzer;
use crate::types::{AnalysisResult, AnalyzeOptions, BreachStatus, StrengthCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub check_breach: bool,
    /// Values below 1 are treated as 1.
    pub concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            check_breach: false,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl BatchOptions {
    pub fn from_config(config: &AnalyzerConfig, check_breach: bool) -> Self {
        Self {
            check_breach,
            concurrency: config.batch_concurrency,
        }
    }
}

/// An item whose analysis is incomplete or degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub average_score: f64,
    pub categories: BTreeMap<StrengthCategory, usize>,
    pub common_count: usize,
    pub breached_count: usize,
    pub unknown_breach_count: usize,
}

impl SummaryStatistics {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a AnalysisResult>) -> Self {
        let mut summary = Self::default();
        let mut total_score = 0.0;

        for result in results {
            summary.count += 1;
            total_score += result.score;
            *summary.categories.entry(result.category).or_default() += 1;
            if result.is_common {
                summary.common_count += 1;
            }
            match result.breach {
                Some(BreachStatus::Exposed { .. }) => summary.breached_count += 1,
                Some(BreachStatus::Unknown { .. }) => summary.unknown_breach_count += 1,
                _ => {}
            }
        }

        if summary.count > 0 {
            summary.average_score = (total_score / summary.count as f64 * 10.0).round() / 10.0;
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Aligned with the input; `None` for items that did not complete.
    pub results: Vec<Option<AnalysisResult>>,
    /// Over completed items only.
    pub summary: SummaryStatistics,
    /// Ordered by index.
    pub degradations: Vec<Degradation>,
    pub cancelled: bool,
}

/// Analyzes every password, isolating per-item failures.
///
/// Cancelling `token` stops scheduling; items already running complete.
pub async fn analyze_batch(
    analyzer: Arc<Analyzer>,
    passwords: Vec<SecretString>,
    options: BatchOptions,
    token: CancellationToken,
) -> BatchReport {
    let total = passwords.len();
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let analyze_options = AnalyzeOptions {
        check_breach: options.check_breach,
    };

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Batch analysis started: {} items, concurrency {}",
        total,
        options.concurrency.max(1)
    );

    let mut results: Vec<Option<AnalysisResult>> = vec![None; total];
    let mut tasks = JoinSet::new();
    let mut scheduled = 0;
    let mut cancelled = false;

    for (index, password) in passwords.into_iter().enumerate() {
        let permit = tokio::select! {
            biased;
            _ = token.cancelled() => {
                cancelled = true;
                break;
            }
            permit = semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let analyzer = analyzer.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let result = analyzer.analyze(&password, analyze_options).await;
            (index, result)
        });
        scheduled += 1;
    }

    if cancelled {
        #[cfg(feature = "tracing")]
        tracing::info!("Batch cancelled after scheduling {} of {} items", scheduled, total);
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Batch item task failed: {}", _e);
            }
        }
    }

    let degradations: Vec<Degradation> = results
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            let reason = match slot {
                None if index >= scheduled => "Not analyzed: batch was cancelled".to_string(),
                None => "Analysis did not complete".to_string(),
                Some(AnalysisResult {
                    breach: Some(BreachStatus::Unknown { reason }),
                    ..
                }) => format!("Breach status unknown: {}", reason),
                Some(_) => return None,
            };
            Some(Degradation { index, reason })
        })
        .collect();

    let summary = SummaryStatistics::from_results(results.iter().flatten());

    #[cfg(feature = "tracing")]
    tracing::info!(
        "Batch analysis finished: {} of {} completed, {} degraded",
        summary.count,
        total,
        degradations.len()
    );

    BatchReport {
        results,
        summary,
        degradations,
        cancelled,
    }
}
