use crate::{
    common::{backoff, item::Item},
    error::{Error, Result},
};

use indexmap::IndexMap;
use std::{future::Future, sync::atomic, time};

/// Maximum number of keys in one BatchGetItem request.
pub const BATCH_GET_SIZE: usize = 100;

/// Maximum number of requests in one BatchWriteItem request.
pub const BATCH_WRITE_SIZE: usize = 25;

/// Outcome of one batch call: what went through and what must be sent again.
#[derive(Debug)]
pub(crate) struct Attempt<U, O> {
    pub(crate) resolved: Vec<O>,
    pub(crate) unprocessed: Vec<U>,
}

/// Split `units` into contiguous groups of at most `size`, keeping their order.
pub(crate) fn chunk<U>(units: Vec<U>, size: usize) -> Vec<Vec<U>> {
    let mut chunks = Vec::with_capacity(units.len().div_ceil(size));
    let mut units = units.into_iter().peekable();
    while units.peek().is_some() {
        chunks.push(units.by_ref().take(size).collect());
    }
    chunks
}

// key attributes are scalars, so the debug form of the sorted entries is canonical
fn fingerprint(key: &Item) -> String {
    let mut entries: Vec<_> = key.iter().collect();
    entries.sort_by(|(left, _), (right, _)| left.cmp(right));
    format!("{entries:?}")
}

/// Drop structurally equal keys, keeping the first occurrence of each.
pub(crate) fn deduplicate(keys: Vec<Item>) -> Vec<Item> {
    let mut unique = IndexMap::with_capacity(keys.len());
    for key in keys {
        unique.entry(fingerprint(&key)).or_insert(key);
    }
    unique.into_values().collect()
}

/// Send `units` in chunks of `size`, all chunks at once, and drain each chunk's remainder.
///
/// Every chunk retries its own unprocessed units, sequentially, with jittered backoff,
/// until none are left. A hard failure in one chunk stops the others from retrying
/// again but lets their in-flight calls settle; the first failure is returned.
pub(crate) async fn dispatch<U, O, F, Fut>(
    table: &str,
    units: Vec<U>,
    size: usize,
    policy: backoff::RetryPolicy,
    call: F,
) -> Result<Vec<O>>
where
    F: Fn(Vec<U>) -> Fut,
    Fut: Future<Output = Result<Attempt<U, O>>>,
{
    let abort = atomic::AtomicBool::new(false);
    let chunks = chunk(units, size);
    let drains = chunks
        .into_iter()
        .map(|units| drain(table, units, policy, &call, &abort));
    let outcomes = futures::future::join_all(drains).await;
    let mut resolved = Vec::new();
    for outcome in outcomes {
        resolved.extend(outcome?);
    }
    Ok(resolved)
}

async fn drain<U, O, F, Fut>(
    table: &str,
    units: Vec<U>,
    policy: backoff::RetryPolicy,
    call: &F,
    abort: &atomic::AtomicBool,
) -> Result<Vec<O>>
where
    F: Fn(Vec<U>) -> Fut,
    Fut: Future<Output = Result<Attempt<U, O>>>,
{
    let outcome = drain_until_empty(table, units, policy, call, abort).await;
    if outcome.is_err() {
        abort.store(true, atomic::Ordering::Relaxed);
    }
    outcome
}

async fn drain_until_empty<U, O, F, Fut>(
    table: &str,
    mut remaining: Vec<U>,
    policy: backoff::RetryPolicy,
    call: &F,
    abort: &atomic::AtomicBool,
) -> Result<Vec<O>>
where
    F: Fn(Vec<U>) -> Fut,
    Fut: Future<Output = Result<Attempt<U, O>>>,
{
    let mut resolved = Vec::new();
    let mut previous_delay = time::Duration::ZERO;
    let mut retries = 0;
    loop {
        let attempt = call(remaining).await?;
        resolved.extend(attempt.resolved);
        remaining = attempt.unprocessed;
        if remaining.is_empty() {
            return Ok(resolved);
        }
        if !policy.allows(retries) {
            return Err(Error::UnprocessedRemaining {
                table: table.to_string(),
                remaining: remaining.len(),
            });
        }
        let delay = backoff::next_delay(previous_delay);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            table,
            remaining = remaining.len(),
            delay_ms = delay.as_millis() as u64,
            "retrying unprocessed batch units"
        );
        tokio::time::sleep(delay).await;
        // another chunk failed: the whole call is lost anyway
        if abort.load(atomic::Ordering::Relaxed) {
            return Ok(resolved);
        }
        previous_delay = delay;
        retries += 1;
    }
}
