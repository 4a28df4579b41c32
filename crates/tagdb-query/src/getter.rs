use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tagdb_store::TagReader;
use tagdb_types::{encode, Item, Value};

use crate::error::{QueryError, QueryResult};

/// Kind label of `T`, taken from a prototype instance.
pub(crate) fn kind_of<T: Item>(prototype: &T) -> QueryResult<String> {
    let kind = prototype.kind();
    if kind.is_empty() {
        return Err(QueryError::KindInference {
            type_name: std::any::type_name::<T>(),
        });
    }
    Ok(kind.to_string())
}

/// Checked downcast of a stored value to `T`.
pub(crate) fn downcast<T: Item>(id: &str, value: &Value) -> QueryResult<Arc<T>> {
    value.downcast::<T>().ok_or_else(|| QueryError::TypeMismatch {
        id: id.to_string(),
        expected: std::any::type_name::<T>(),
        actual: value.type_name(),
    })
}

/// Fetches one `T` by the value of one of its index keys.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tagdb_query::Getter;
/// use tagdb_store::{InMemoryTagStore, StoreError, TagWriter};
/// use tagdb_types::{Item, Value};
///
/// #[derive(Default)]
/// struct User { login: String }
///
/// impl Item for User {
///     fn kind(&self) -> &str { "user" }
///     fn indexes(&self) -> Vec<(String, String)> {
///         vec![("login".into(), self.login.clone())]
///     }
/// }
///
/// let store = Arc::new(InMemoryTagStore::new());
/// store.update(|w| {
///     w.put("user{login:ada}", Value::new(User { login: "ada".into() }));
///     Ok::<_, StoreError>(())
/// }).unwrap();
///
/// let by_login = Getter::new(store, &User::default(), "login").unwrap();
/// assert_eq!(by_login.get("ada").unwrap().unwrap().login, "ada");
/// assert!(by_login.get("bob").unwrap().is_none());
/// ```
pub struct Getter<T> {
    reader: Arc<dyn TagReader>,
    kind: String,
    by_key: String,
    _item: PhantomData<fn() -> T>,
}

impl<T: Item> Getter<T> {
    /// Bind a getter to `T`'s kind, read from `prototype`, and `by_key`.
    ///
    /// Fails with [`QueryError::KindInference`] if the prototype reports an
    /// empty kind.
    pub fn new(
        reader: Arc<dyn TagReader>,
        prototype: &T,
        by_key: impl Into<String>,
    ) -> QueryResult<Self> {
        Ok(Self {
            reader,
            kind: kind_of(prototype)?,
            by_key: by_key.into(),
            _item: PhantomData,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The item stored under `kind{by_key:val}`, if any.
    pub fn get(&self, val: &str) -> QueryResult<Option<Arc<T>>> {
        let id = encode(&self.kind, &self.by_key, val);
        match self.reader.get(&id)? {
            Some(value) => downcast::<T>(&id, &value).map(Some),
            None => Ok(None),
        }
    }
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Self {
            reader: Arc::clone(&self.reader),
            kind: self.kind.clone(),
            by_key: self.by_key.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Getter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("kind", &self.kind)
            .field("by_key", &self.by_key)
            .finish()
    }
}
