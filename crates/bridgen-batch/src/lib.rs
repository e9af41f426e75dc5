//! Parallel batch runner.
//!
//! [`par_transform_map`] splits an ordered map into fixed-size batches, runs a transform over
//! them on a bounded rayon pool and merges the outputs in batch order. The first failing batch
//! stops any batch that has not started yet; batches already running are drained and their
//! results discarded.

use rayon::ThreadPoolBuilder;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum BatchError<E> {
    /// A batch transform failed. Holds the first error observed.
    #[error("{0}")]
    Batch(E),
    #[error("failed to start batch workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl<E> BatchError<E> {
    /// The batch transform's own error, if that is what failed.
    pub fn into_batch(self) -> Option<E> {
        match self {
            BatchError::Batch(err) => Some(err),
            BatchError::Pool(_) => None,
        }
    }
}

/// Applies `f` to `input` in batches of `batch_size` entries across up to `workers` threads.
///
/// - `batch_size <= 0`: `f` is called once, on the calling thread, with the whole map.
/// - `workers <= 0`: one thread per batch.
///
/// The merged result equals applying `f` to each batch sequentially and extending the output
/// in batch order. On failure no partial output is returned.
pub fn par_transform_map<K, V, U, E, F>(
    input: BTreeMap<K, V>,
    f: F,
    workers: isize,
    batch_size: isize,
) -> Result<BTreeMap<K, U>, BatchError<E>>
where
    K: Ord + Send,
    V: Send,
    U: Send,
    E: Send,
    F: Fn(BTreeMap<K, V>) -> Result<BTreeMap<K, U>, E> + Sync,
{
    if batch_size <= 0 {
        return f(input).map_err(BatchError::Batch);
    }

    let batches = split(input, batch_size.unsigned_abs());
    if batches.is_empty() {
        return Ok(BTreeMap::new());
    }
    let threads = if workers <= 0 {
        batches.len()
    } else {
        workers.unsigned_abs().min(batches.len())
    }
    .max(1);

    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("bridgen-batch-{i}"))
        .build()?;
    tracing::debug!(batches = batches.len(), threads, "dispatching batches");

    let failed = AtomicBool::new(false);
    let (tx, rx) = mpsc::channel();
    pool.scope_fifo(|scope| {
        for (index, batch) in batches.into_iter().enumerate() {
            let (f, failed, tx) = (&f, &failed, tx.clone());
            scope.spawn_fifo(move |_| {
                if failed.load(Ordering::Acquire) {
                    tracing::debug!(batch = index, "skipping batch after failure");
                    return;
                }
                let result = f(batch);
                if result.is_err() {
                    failed.store(true, Ordering::Release);
                }
                // The receiver outlives the scope, so sending cannot fail.
                let _ = tx.send((index, result));
            });
        }
    });
    drop(tx);

    let mut outputs = Vec::new();
    let mut first_error = None;
    for (index, result) in rx {
        match result {
            Ok(output) => outputs.push((index, output)),
            Err(err) => {
                tracing::debug!(batch = index, "batch failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    if let Some(err) = first_error {
        return Err(BatchError::Batch(err));
    }

    outputs.sort_by_key(|(index, _)| *index);
    let mut merged = BTreeMap::new();
    for (_, output) in outputs {
        merged.extend(output);
    }
    Ok(merged)
}

fn split<K: Ord, V>(input: BTreeMap<K, V>, size: usize) -> Vec<BTreeMap<K, V>> {
    let mut batches = Vec::new();
    let mut current = BTreeMap::new();
    for (key, value) in input {
        current.insert(key, value);
        if current.len() == size {
            batches.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}
