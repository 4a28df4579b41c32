use tagdb_types::Value;

use crate::error::StoreResult;
use crate::memory::ValueHandle;

/// Read side of a tag store.
///
/// All implementations must satisfy these invariants:
/// - Reads never trigger computation, except the producer passed to
///   [`get_or_fill`](TagReader::get_or_fill) on a miss.
/// - A reader never observes a partially applied write batch.
/// - Iteration over a tag follows the order in which identifiers were
///   first tagged with it.
pub trait TagReader: Send + Sync {
    /// Point lookup. Returns `Ok(None)` if no entry exists at `id`.
    fn get(&self, id: &str) -> StoreResult<Option<Value>>;

    /// Returns `true` if an entry exists at `id`.
    fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Return the entry at `id`, filling it from `produce` on a miss.
    ///
    /// `produce` runs at most once per miss. Returning `None` leaves the
    /// store untouched and yields `Ok(None)`. `produce` must not call back
    /// into the store.
    fn get_or_fill(
        &self,
        id: &str,
        produce: &mut dyn FnMut() -> Option<Value>,
    ) -> StoreResult<Option<Value>>;

    /// Visit every identifier tagged with `tag`, in insertion order.
    ///
    /// `visit` receives the identifier and a handle that looks its value up
    /// on demand. Iteration stops the first time `visit` returns `false`.
    /// `visit` runs while the store is read-locked and must not call back
    /// into the store: once a writer is queued, a nested lock deadlocks.
    fn iter(
        &self,
        tag: &str,
        visit: &mut dyn FnMut(&str, &ValueHandle<'_>) -> bool,
    ) -> StoreResult<()>;
}

/// Write side of a tag store, available only inside a write scope.
pub trait TagWriter {
    /// Insert or overwrite the entry at `id`. Existing tag edges are kept.
    fn put(&mut self, id: &str, value: Value);

    /// Tag `id` with each of `tags`.
    ///
    /// One-directional: `id` joins `reverse[tag]` and `tag` joins
    /// `forward[id]`. Symmetric links need a second call with roles swapped.
    fn tag(&mut self, id: &str, tags: &[String]);

    /// Cascading deletion of `ids` and everything tagged with them.
    ///
    /// Returns the deduplicated identifiers whose entries were removed, in
    /// the order they were discovered.
    fn invalidate(&mut self, ids: &[String]) -> Vec<String>;
}
