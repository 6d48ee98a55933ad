//! Benchmarks for relationship resolution fan-out.
//!
//! Run with: `cargo bench --bench resolution`
//!
//! Every selected relationship edge is one store round trip, so latency
//! grows with the number of comments under the post.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;

use docgraph::{
    build_schema, Collection, Comment, DocGraphSchema, Entity, InMemoryDocumentStore, Post,
    SchemaOptions, StoreHandle, User,
};

const NESTED_QUERY: &str = r#"{ post(id: "p1") { title user { username } comments { body user { username } } } }"#;

fn make_schema(comment_count: usize) -> DocGraphSchema {
    let store = InMemoryDocumentStore::new();

    for i in 0..4 {
        let user = User {
            id: format!("u{}", i),
            email: format!("user{}@bench.dev", i),
            username: format!("user{}", i),
            img_url: None,
        };
        store.insert(Collection::Users, user.id.clone(), user.to_document().unwrap());
    }

    let post = Post {
        id: "p1".to_string(),
        title: "bench".to_string(),
        body: "body".to_string(),
        user_id: "u0".to_string(),
    };
    store.insert(Collection::Posts, "p1", post.to_document().unwrap());

    for i in 0..comment_count {
        let comment = Comment {
            id: format!("c{:05}", i),
            body: format!("comment {}", i),
            user_id: format!("u{}", i % 4),
            post_id: "p1".to_string(),
        };
        store.insert(Collection::Comments, comment.id.clone(), comment.to_document().unwrap());
    }

    build_schema(StoreHandle::new(store), &SchemaOptions::default()).unwrap()
}

/// Benchmark a nested post query as the number of comments grows.
fn bench_nested_fan_out(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("nested_fan_out");

    for comments in [1usize, 10, 100] {
        let schema = make_schema(comments);
        group.throughput(Throughput::Elements(comments as u64 + 3));
        group.bench_with_input(BenchmarkId::from_parameter(comments), &schema, |b, schema| {
            b.to_async(&rt).iter(|| async {
                let response = schema.execute(black_box(NESTED_QUERY)).await;
                black_box(response)
            });
        });
    }

    group.finish();
}

/// Benchmark a flat lookup for comparison.
fn bench_point_lookup(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let schema = make_schema(10);

    c.bench_function("point_lookup", |b| {
        b.to_async(&rt).iter(|| async {
            let response = schema.execute(black_box(r#"{ post(id: "p1") { title } }"#)).await;
            black_box(response)
        });
    });
}

criterion_group!(benches, bench_nested_fan_out, bench_point_lookup);
criterion_main!(benches);
