use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tagdb_sdk::{Item, ItemRef, ItemSink, LoaderError, TagDb};

const FOOS: usize = 1000;
const FOOS_PER_BAR: usize = 4;

#[derive(Default)]
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

#[derive(Default)]
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

fn bars() -> Vec<ItemRef> {
    (0..FOOS / FOOS_PER_BAR)
        .map(|i| {
            let foos = (0..FOOS_PER_BAR)
                .map(|j| {
                    let n = i * FOOS_PER_BAR + j;
                    Arc::new(Foo {
                        id: n.to_string(),
                        name: format!("bar {n}"),
                    })
                })
                .collect();
            Arc::new(Bar {
                id: i.to_string(),
                name: format!("bar {i}"),
                foos,
            }) as ItemRef
        })
        .collect()
}

fn populated() -> TagDb {
    let items = bars();
    let db = TagDb::builder()
        .with_loader_fn("bar", move |sink: &mut ItemSink| -> Result<(), LoaderError> {
            sink.extend(items.iter().cloned());
            Ok(())
        })
        .build();
    db.reload_all().expect("initial reload");
    db
}

fn bench(c: &mut Criterion) {
    let db = populated();
    let mut rng = StdRng::seed_from_u64(0x7a6d);
    let mut group = c.benchmark_group("tagdb");

    let foo_by_id = db.getter(&Foo::default(), "id").expect("getter");
    group.bench_function("get", |b| {
        b.iter(|| {
            let key = rng.gen_range(0..FOOS).to_string();
            assert!(foo_by_id.get(&key).expect("get").is_some());
        })
    });

    let bars_by_foo_id = db
        .relation_query(&Bar::default(), "id", "foo", "id")
        .expect("relation query");
    group.bench_function("query one-to-one relation", |b| {
        b.iter(|| {
            let key = rng.gen_range(0..FOOS).to_string();
            assert_eq!(bars_by_foo_id.fetch(&key).expect("fetch").len(), 1);
        })
    });

    let foos_by_bar_id = db
        .relation_query(&Foo::default(), "id", "bar", "id")
        .expect("relation query");
    group.bench_function("query one-to-many relation", |b| {
        b.iter(|| {
            let key = rng.gen_range(0..FOOS / FOOS_PER_BAR).to_string();
            assert_eq!(foos_by_bar_id.fetch(&key).expect("fetch").len(), FOOS_PER_BAR);
        })
    });

    let stale: ItemRef = Arc::new(Foo {
        id: "333".into(),
        ..Default::default()
    });
    group.bench_function("invalidate", |b| {
        b.iter(|| db.invalidate(std::slice::from_ref(&stale)).expect("invalidate"))
    });

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench
);

criterion_main!(benches);
