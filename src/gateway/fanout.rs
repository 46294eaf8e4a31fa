// Order-preserving fan-out/fan-in.
//
// One future per input, all run concurrently, and the barrier waits for
// every one of them; a failure in one future never cancels the others.
// Result index i always corresponds to input index i.

use std::future::Future;

/// Map every item through an async function concurrently and collect the
/// outputs in input order. `T` is usually a `Result`, so partial failures
/// come back as values rather than short-circuiting the batch.
pub async fn join_all_ordered<I, F, Fut, T>(items: I, f: F) -> Vec<T>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    futures::future::join_all(items.into_iter().map(f)).await
}
