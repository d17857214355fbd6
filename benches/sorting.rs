//! Sorting benchmarks
//!
//! Compares the three kernels on plain integers and on runtime lists,
//! where every comparison goes through rich comparison.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pybuiltins::objects::{new_int, new_list, ObjRef};
use pybuiltins::sort::{
    insertion_sort, merge_sort, merge_sort_iterable, timsort, timsort_list, NaturalOrder,
};

/// Deterministic scrambled sequence
fn scrambled(n: usize) -> Vec<i64> {
    (0..n as i64).map(|i| (i * 7919 + 13) % 1009 - 500).collect()
}

fn runtime_list(values: &[i64]) -> ObjRef {
    new_list(values.iter().copied().map(new_int).collect())
}

fn bench_native_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("native");

    for size in [16, 256, 4096].iter() {
        let data = scrambled(*size);

        if *size <= 256 {
            group.bench_with_input(BenchmarkId::new("insertion", size), &data, |b, data| {
                b.iter(|| {
                    let mut items = data.clone();
                    insertion_sort(black_box(&mut items), &mut NaturalOrder).unwrap();
                    items
                });
            });
        }

        group.bench_with_input(BenchmarkId::new("merge", size), &data, |b, data| {
            b.iter(|| merge_sort(black_box(data), &mut NaturalOrder).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("timsort", size), &data, |b, data| {
            b.iter(|| {
                let mut items = data.clone();
                timsort(black_box(&mut items), &mut NaturalOrder).unwrap();
                items
            });
        });
    }

    group.finish();
}

fn bench_runtime_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("runtime");

    for size in [64, 1024].iter() {
        let data = scrambled(*size);

        group.bench_with_input(BenchmarkId::new("timsort_list", size), &data, |b, data| {
            b.iter(|| {
                let list = runtime_list(data);
                timsort_list(black_box(&list)).unwrap();
                list
            });
        });

        group.bench_with_input(BenchmarkId::new("merge_sort_iterable", size), &data, |b, data| {
            let list = runtime_list(data);
            b.iter(|| merge_sort_iterable(black_box(&list)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_native_kernels, bench_runtime_lists);
criterion_main!(benches);
