//! Session operation benchmarks.
//!
//! Every façade call pays for open + transaction + close. These benches
//! compare that against batching the same work through `execute`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nutz_bench::{generate_keys, random_data, temp_session};
use nutz_core::{ops, resolve_chain, NamespacePath, Outcome, Request, TxMode, Walk};

/// Benchmark single creates, one transaction each.
fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for size in [64, 1024, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (_dir, session) = temp_session();
            let data = random_data(size);

            b.iter(|| {
                let result = session.create("bench", "key", black_box(&data), &["a", "b"]);
                black_box(result.is_ok());
            });
        });
    }
    group.finish();
}

/// Benchmark gets at increasing nesting depth.
fn bench_get_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_depth");
    let names = ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"];

    for depth in [0usize, 2, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let (_dir, session) = temp_session();
            let path = &names[..depth];
            assert!(session.create("bench", "key", &random_data(256), path).is_ok());

            b.iter(|| {
                let result = session.get("bench", black_box("key"), path);
                black_box(result.payload().map(<[u8]>::len));
            });
        });
    }
    group.finish();
}

/// Benchmark writing N records one call at a time versus one batched body.
fn bench_batching(c: &mut Criterion) {
    let mut group = c.benchmark_group("batching");
    group.sample_size(10);

    for count in [10usize, 100].iter() {
        let keys = generate_keys(*count);
        let data = random_data(256);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("per_call", count), &keys, |b, keys| {
            let (_dir, session) = temp_session();
            b.iter(|| {
                for key in keys {
                    black_box(session.create("bench", key, &data, &["batch"]).is_ok());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("execute", count), &keys, |b, keys| {
            let (_dir, session) = temp_session();
            let request = Request::new("bench").path(&["batch"]);
            b.iter(|| {
                let result = session.execute(TxMode::Write, request, |txn, request, _| {
                    let path = request.namespace()?;
                    for key in keys {
                        ops::create(txn, &path, key, &data)?;
                    }
                    Ok(Outcome::empty())
                });
                black_box(result.is_ok());
            });
        });
    }
    group.finish();
}

/// Benchmark a nested get while the file holds many unrelated sibling buckets.
fn bench_get_among_siblings(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_among_siblings");
    group.sample_size(20);

    for siblings in [0usize, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(siblings), siblings, |b, &siblings| {
            let (_dir, session) = temp_session();
            assert!(session.create("t", "key", &random_data(64), &["a", "b", "c"]).is_ok());

            let names = generate_keys(siblings);
            let seeded = session.execute(TxMode::Write, Request::new("t"), |txn, request, _| {
                let root = request.namespace()?;
                for name in &names {
                    let path = NamespacePath::new(root.root(), &["items", name.as_str()])?;
                    resolve_chain(txn, &path, Walk::CreateMissing)?;
                }
                Ok(Outcome::empty())
            });
            assert!(seeded.is_ok());

            b.iter(|| {
                let result = session.get("t", black_box("key"), &["a", "b", "c"]);
                black_box(result.payload().map(<[u8]>::len));
            });
        });
    }
    group.finish();
}

/// Benchmark enumerating a populated bucket.
fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");

    for count in [100usize, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let (_dir, session) = temp_session();
            let keys = generate_keys(count);
            let data = random_data(128);
            let seeded = session.execute(TxMode::Write, Request::new("bench"), |txn, request, _| {
                let path = request.namespace()?;
                for key in &keys {
                    ops::create(txn, &path, key, &data)?;
                }
                Ok(Outcome::empty())
            });
            assert!(seeded.is_ok());

            b.iter(|| {
                let result = session.enumerate("bench", &[]);
                black_box(result.enumerated().map(|entries| entries.len()));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_get_depth,
    bench_batching,
    bench_get_among_siblings,
    bench_enumerate
);
criterion_main!(benches);
