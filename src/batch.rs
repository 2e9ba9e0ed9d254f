use crate::error::Result;
use std::path::Path;

/// Aggregate counts for one batch run. `processed` and `errors` always
/// partition the set of seen items, so `processed + errors == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    pub total: usize,
    pub processed: usize,
    pub errors: usize,
}

/// Apply `op` to every item in order, isolating per-item failures.
///
/// A failing `op` invocation is logged, counted in `errors`, and never stops
/// the batch. After each item (success or failure) the optional `progress`
/// callback receives `(seen_count, total_count, file_name)`; a panic inside
/// the callback propagates and aborts the run, which is the one supported
/// cancellation path.
pub fn run_batch<T, F, P>(items: &[T], mut op: F, mut progress: Option<P>) -> BatchOutcome
where
    T: AsRef<Path>,
    F: FnMut(&T) -> Result<()>,
    P: FnMut(usize, usize, &str),
{
    let total = items.len();
    let mut outcome = BatchOutcome {
        total,
        ..Default::default()
    };

    for (seen, item) in items.iter().enumerate() {
        match op(item) {
            Ok(()) => outcome.processed += 1,
            Err(e) => {
                crate::error!("Failed to process {:?}: {}", item.as_ref(), e);
                outcome.errors += 1;
            }
        }

        if let Some(callback) = progress.as_mut() {
            let name = item
                .as_ref()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            callback(seen + 1, total, &name);
        }
    }

    outcome
}
