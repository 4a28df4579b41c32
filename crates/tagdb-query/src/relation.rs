use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use tagdb_store::{TagReader, ValueHandle};
use tagdb_types::{encode, Item, Pointer, Value};

use crate::error::{QueryError, QueryResult};
use crate::getter::{downcast, kind_of};

/// Visit every identifier under `tag`, stopping at the first error or when
/// `step` asks to stop.
fn scan(
    reader: &dyn TagReader,
    tag: &str,
    mut step: impl FnMut(&str, &ValueHandle<'_>) -> QueryResult<bool>,
) -> QueryResult<()> {
    let mut failure = None;
    reader.iter(tag, &mut |id, handle| match step(id, handle) {
        Ok(proceed) => proceed,
        Err(e) => {
            failure = Some(e);
            false
        }
    })?;
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn value_of(id: &str, handle: &ValueHandle<'_>) -> QueryResult<Value> {
    handle.get().ok_or_else(|| QueryError::RetrievalFailed { id: id.to_string() })
}

/// Untyped scan of the items of `kind` listed under `tag`.
///
/// Only identifiers of the form `kind{tag.key:*}` are passed to `collect`;
/// others are skipped. Stops when `collect` returns `false`.
pub fn query_by_tag(
    reader: &dyn TagReader,
    kind: &str,
    tag: &Pointer,
    collect: &mut dyn FnMut(Value) -> bool,
) -> QueryResult<()> {
    scan(reader, &tag.encode(), |id, handle| {
        let pointer = Pointer::parse(id)?;
        if pointer.kind != kind || pointer.key != tag.key {
            return Ok(true);
        }
        Ok(collect(value_of(id, handle)?))
    })
}

/// Fetches every `T` related to an item of another kind.
///
/// For `T = Bar`, `unique_key = "id"`, `other_kind = "foo"` and
/// `other_key = "id"`, `fetch("1")` returns every bar related to
/// `foo{id:1}`, one per bar (only bar identifiers on the `id` key are kept,
/// so a bar indexed under several keys is not repeated).
pub struct RelationQuery<T> {
    reader: Arc<dyn TagReader>,
    kind: String,
    unique_key: String,
    other_kind: String,
    other_key: String,
    _item: PhantomData<fn() -> T>,
}

impl<T: Item> RelationQuery<T> {
    pub fn new(
        reader: Arc<dyn TagReader>,
        prototype: &T,
        unique_key: impl Into<String>,
        other_kind: impl Into<String>,
        other_key: impl Into<String>,
    ) -> QueryResult<Self> {
        Ok(Self {
            reader,
            kind: kind_of(prototype)?,
            unique_key: unique_key.into(),
            other_kind: other_kind.into(),
            other_key: other_key.into(),
            _item: PhantomData,
        })
    }

    /// Items of `T` related to `other_kind{other_key:val}`, in the order
    /// they were linked.
    pub fn fetch(&self, val: &str) -> QueryResult<Vec<Arc<T>>> {
        let tag = encode(&self.other_kind, &self.other_key, val);
        let mut found = Vec::new();
        scan(&*self.reader, &tag, |id, handle| {
            let pointer = Pointer::parse(id)?;
            if pointer.kind != self.kind || pointer.key != self.unique_key {
                return Ok(true);
            }
            found.push(downcast::<T>(id, &value_of(id, handle)?)?);
            Ok(true)
        })?;
        debug!(%tag, kind = %self.kind, found = found.len(), "relation query");
        Ok(found)
    }
}

impl<T> Clone for RelationQuery<T> {
    fn clone(&self) -> Self {
        Self {
            reader: Arc::clone(&self.reader),
            kind: self.kind.clone(),
            unique_key: self.unique_key.clone(),
            other_kind: self.other_kind.clone(),
            other_key: self.other_key.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RelationQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationQuery")
            .field("kind", &self.kind)
            .field("unique_key", &self.unique_key)
            .field("other_kind", &self.other_kind)
            .field("other_key", &self.other_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagdb_graph::GraphIndexer;
    use tagdb_store::{InMemoryTagStore, StoreError, TagWriter};
    use tagdb_types::ItemRef;

    #[derive(Debug, Default)]
    struct Foo {
        id: String,
        name: String,
    }

    impl Item for Foo {
        fn kind(&self) -> &str {
            "foo"
        }

        fn indexes(&self) -> Vec<(String, String)> {
            vec![("id".into(), self.id.clone()), ("name".into(), self.name.clone())]
        }
    }

    #[derive(Debug, Default)]
    struct Bar {
        id: String,
        name: String,
        foos: Vec<Arc<Foo>>,
    }

    impl Item for Bar {
        fn kind(&self) -> &str {
            "bar"
        }

        fn indexes(&self) -> Vec<(String, String)> {
            vec![("id".into(), self.id.clone()), ("name".into(), self.name.clone())]
        }

        fn relations(&self) -> Vec<ItemRef> {
            self.foos.iter().map(|f| Arc::clone(f) as ItemRef).collect()
        }
    }

    fn foo(id: &str) -> Arc<Foo> {
        Arc::new(Foo {
            id: id.into(),
            name: format!("foo{id}"),
        })
    }

    /// `bar{id:1}` related to `foo{id:1}` and `foo{id:2}`.
    fn populated() -> Arc<InMemoryTagStore> {
        let store = Arc::new(InMemoryTagStore::new());
        let bar: ItemRef = Arc::new(Bar {
            id: "1".into(),
            name: "bar1".into(),
            foos: vec![foo("1"), foo("2")],
        });
        store
            .update(|w| {
                GraphIndexer::default().index(w, Some(&bar)).unwrap();
                Ok::<_, StoreError>(())
            })
            .unwrap();
        store
    }

    fn extra_tag(store: &InMemoryTagStore, id: &str, tag: &str) {
        store
            .update(|w| {
                w.tag(id, &[tag.to_string()]);
                Ok::<_, StoreError>(())
            })
            .unwrap();
    }

    // -----------------------------------------------------------------------
    // Relation queries
    // -----------------------------------------------------------------------

    #[test]
    fn one_to_one_relation() {
        let store = populated();
        let bars_by_foo_id =
            RelationQuery::new(store, &Bar::default(), "id", "foo", "id").unwrap();
        let bars = bars_by_foo_id.fetch("1").unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].name, "bar1");
    }

    #[test]
    fn one_to_many_relation() {
        let store = populated();
        let foos_by_bar_id =
            RelationQuery::new(store, &Foo::default(), "id", "bar", "id").unwrap();
        let ids: Vec<String> = foos_by_bar_id
            .fetch("1")
            .unwrap()
            .iter()
            .map(|f| f.id.clone())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn query_by_other_key() {
        let store = populated();
        let foos_by_bar_name =
            RelationQuery::new(store, &Foo::default(), "name", "bar", "name").unwrap();
        let foos = foos_by_bar_name.fetch("bar1").unwrap();
        assert_eq!(foos.len(), 2);
    }

    #[test]
    fn unknown_relation_is_empty() {
        let store = populated();
        let q = RelationQuery::new(store, &Bar::default(), "id", "foo", "id").unwrap();
        assert!(q.fetch("99").unwrap().is_empty());
    }

    #[test]
    fn malformed_identifier_aborts() {
        let store = populated();
        extra_tag(&store, "plain", "foo{id:1}");
        let q = RelationQuery::new(store, &Bar::default(), "id", "foo", "id").unwrap();
        assert!(matches!(q.fetch("1"), Err(QueryError::MalformedIdentifier(_))));
    }

    #[test]
    fn listed_without_value_is_retrieval_failure() {
        let store = populated();
        extra_tag(&store, "bar{id:7}", "foo{id:2}");
        let q = RelationQuery::new(store, &Bar::default(), "id", "foo", "id").unwrap();
        match q.fetch("2") {
            Err(QueryError::RetrievalFailed { id }) => assert_eq!(id, "bar{id:7}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn wrong_type_aborts() {
        let store = populated();
        store
            .update(|w| {
                w.put("bar{id:8}", Value::new(3u16));
                w.tag("bar{id:8}", &["foo{id:2}".to_string()]);
                Ok::<_, StoreError>(())
            })
            .unwrap();
        let q = RelationQuery::new(store, &Bar::default(), "id", "foo", "id").unwrap();
        match q.fetch("2") {
            Err(QueryError::TypeMismatch { id, actual, .. }) => {
                assert_eq!(id, "bar{id:8}");
                assert_eq!(actual, "u16");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn debug_lists_binding() {
        let store = populated();
        let q = RelationQuery::new(store, &Foo::default(), "id", "bar", "id").unwrap();
        let debug = format!("{:?}", q.clone());
        assert!(debug.contains("other_kind: \"bar\""));
    }

    // -----------------------------------------------------------------------
    // Untyped scan
    // -----------------------------------------------------------------------

    #[test]
    fn query_by_tag_filters_kind_and_key() {
        let store = populated();
        let mut names = Vec::new();
        query_by_tag(&*store, "foo", &Pointer::new("bar", "id", "1"), &mut |value| {
            names.push(value.downcast::<Foo>().unwrap().name.clone());
            true
        })
        .unwrap();
        assert_eq!(names, vec!["foo1", "foo2"]);
    }

    #[test]
    fn query_by_tag_stops_early() {
        let store = populated();
        let mut seen = 0;
        query_by_tag(&*store, "foo", &Pointer::new("bar", "id", "1"), &mut |_| {
            seen += 1;
            false
        })
        .unwrap();
        assert_eq!(seen, 1);
    }
}
