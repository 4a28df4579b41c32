//! The capability interface every stored item implements.

use std::any::Any;
use std::sync::Arc;

/// Shared handle to a type-erased item.
pub type ItemRef = Arc<dyn Item>;

/// Type-erasure helpers available on every `'static + Send + Sync` type.
///
/// Blanket-implemented; item types never implement this by hand. It lets a
/// `dyn Item` be converted back into an `Arc<dyn Any>` so the concrete type
/// can be recovered with a checked downcast.
pub trait AsAny: Any + Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Name of the concrete type, used in type-mismatch reports.
    fn concrete_type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn concrete_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An entity produced by a loader and indexed into the store.
///
/// Implementations must satisfy:
/// - `kind()` is stable for a concrete type and non-empty.
/// - `indexes()` yields at least one `(key, value)` pair, and each pair
///   addresses the item uniquely within its kind.
/// - `relations()` does not form a cycle. Cycles are rejected by the graph
///   indexer when its cycle guard is enabled and recurse forever otherwise.
pub trait Item: AsAny {
    /// Category label; each kind is owned by at most one loader.
    fn kind(&self) -> &str;

    /// Ordered `(attribute key, attribute value)` pairs addressing this item.
    fn indexes(&self) -> Vec<(String, String)>;

    /// Items this one refers to.
    fn relations(&self) -> Vec<ItemRef> {
        Vec::new()
    }
}
