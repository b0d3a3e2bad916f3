use std::hint::black_box;

use criterion::{measurement::Measurement, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use ordtree::{AabbTree, Axis, AvlTree, RangeTree};

use crate::Lfsr;

#[derive(Debug)]
struct BenchName {
    bench_name: &'static str,
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(format!("{}/n_values", v.bench_name), v.n_values)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("query");

    for n_values in [1, 100, 1_000, 10_000] {
        bench_range_query(&mut g, n_values);
        bench_range_tree(&mut g, n_values);
        bench_overlaps(&mut g, n_values);
    }
}

fn bench_range_query<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let mut rand = Lfsr::default();
    let mut t = AvlTree::new();
    for _i in 0..n_values {
        t.insert(rand.next(), 42_usize).unwrap();
    }

    let bench_name = BenchName {
        n_values,
        bench_name: "range_query",
    };

    g.throughput(Throughput::Elements(n_values as _));
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter(|| {
            for v in t.range_query(&4_200, &42_000) {
                black_box(v);
            }
        })
    });
}

fn bench_range_tree<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let mut rand = Lfsr::default();
    let points = (0..n_values).map(|_| rand.next_point()).collect::<Vec<_>>();
    let t = RangeTree::build(vec![Axis(0), Axis(1)], 2, points).unwrap();

    let bench_name = BenchName {
        n_values,
        bench_name: "range_tree",
    };

    g.throughput(Throughput::Elements(n_values as _));
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter(|| black_box(t.query(&[4_200, 4_200], &[42_000, 42_000]).unwrap()))
    });
}

fn bench_overlaps<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    M: Measurement,
{
    let mut rand = Lfsr::default();
    let intervals = (0..n_values).map(|_| rand.next_interval()).collect::<Vec<_>>();
    let t = AabbTree::build(
        0,
        |v: &(u16, u16), _axis: usize| *v,
        |a: &(u16, u16), b: &(u16, u16)| a.0 <= b.1 && b.0 <= a.1,
        intervals,
    )
    .unwrap();

    let bench_name = BenchName {
        n_values,
        bench_name: "overlaps",
    };

    g.throughput(Throughput::Elements(n_values as _));
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter(|| {
            for v in t.query_overlaps(&(4_200, 4_300)).unwrap() {
                black_box(v);
            }
        })
    });
}
