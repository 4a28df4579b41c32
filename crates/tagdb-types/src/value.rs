//! Any-typed container held by the store.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::item::{AsAny, ItemRef};

/// A stored value: a shared, type-erased payload plus the name of its
/// concrete type.
///
/// Cloning is cheap (reference count bump). Typed readers recover the
/// concrete type with [`Value::downcast`], which never returns a value of
/// the wrong type.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wrap an owned value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an already shared value without copying it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wrap a type-erased item, keeping its concrete type recoverable.
    pub fn from_item(item: ItemRef) -> Self {
        let type_name = AsAny::concrete_type_name(&*item);
        Self {
            inner: AsAny::into_any(item),
            type_name,
        }
    }

    /// Name of the concrete type held.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the held value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the held value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Recover a shared `T`, or `None` if the held value is another type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Returns `true` if both values share the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type_name", &self.type_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    #[derive(Debug, PartialEq)]
    struct Gadget(&'static str);

    impl Item for Gadget {
        fn kind(&self) -> &str {
            "gadget"
        }

        fn indexes(&self) -> Vec<(String, String)> {
            vec![("name".into(), self.0.into())]
        }
    }

    #[test]
    fn downcast_to_held_type() {
        let v = Value::new("bar");
        assert!(v.is::<&str>());
        assert_eq!(v.downcast_ref::<&str>(), Some(&"bar"));
        assert_eq!(*v.downcast::<&str>().unwrap(), "bar");
    }

    #[test]
    fn downcast_to_other_type_is_none() {
        let v = Value::new(42u64);
        assert!(v.downcast::<String>().is_none());
        assert!(v.downcast_ref::<i32>().is_none());
        assert_eq!(v.type_name(), "u64");
    }

    #[test]
    fn from_item_keeps_concrete_type() {
        let item: ItemRef = Arc::new(Gadget("g1"));
        let v = Value::from_item(item);
        assert!(v.type_name().ends_with("Gadget"));
        assert_eq!(*v.downcast::<Gadget>().unwrap(), Gadget("g1"));
    }

    #[test]
    fn clones_share_allocation() {
        let v = Value::new(String::from("shared"));
        let w = v.clone();
        assert!(v.ptr_eq(&w));
        assert!(!v.ptr_eq(&Value::new(String::from("shared"))));
    }

    #[test]
    fn debug_shows_type_name() {
        let v = Value::new(1u8);
        assert_eq!(format!("{v:?}"), "Value { type_name: \"u8\" }");
    }
}
