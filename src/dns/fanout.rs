//! All-types lookup.

use super::{Name, Resolve};
use crate::record::{Record, RecordType};
use futures::future::join_all;

/// Looks `host` up for every type in [`RecordType::ALL`] at once.
///
/// Waits for every lookup to settle. Failed lookups are logged and left out;
/// the rest are concatenated in [`RecordType::ALL`] order, without
/// deduplication. Never fails: if every lookup fails the result is empty.
pub async fn resolve_all<R>(host: &str, resolver: &R) -> Vec<Record>
where
    R: Resolve + ?Sized,
{
    let lookups = RecordType::ALL
        .map(|rtype| async move { (rtype, resolver.resolve(Name::new(host), rtype).await) });

    let mut records = Vec::new();
    for (rtype, result) in join_all(lookups).await {
        match result {
            Ok(found) => records.extend(found),
            Err(e) => {
                tracing::debug!(host = %host, rtype = %rtype, error = %e, "lookup failed, skipping type");
            }
        }
    }

    tracing::debug!(host = %host, count = records.len(), "all-types lookup complete");
    records
}
