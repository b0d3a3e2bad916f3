use criterion::{measurement::Measurement, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use ordtree::{Avl, Inner, Leaf, Natural, Plain, Tree};

use crate::Lfsr;

#[derive(Debug, Clone, Copy)]
struct BenchName {
    policy: &'static str,
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(format!("{}/n_values", v.policy), v.n_values)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("insert");

    for n_values in [1, 100, 1_000, 10_000] {
        bench_avl_inner(&mut g, n_values);
        bench_avl_leaf(&mut g, n_values);
        bench_plain_inner(&mut g, n_values);
        bench_plain_leaf(&mut g, n_values);
    }
}

macro_rules! insert_bench {
    (
        $name:ident, $balance:ty, $storage:ty
    ) => {
        paste::paste! {
            /// Measure the time needed to insert `n_values` number of
            /// randomly generated keys into an empty tree.
            fn [<bench_ $name>]<M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
            where
                M: Measurement,
            {
                let bench_name = BenchName {
                    policy: stringify!($name),
                    n_values,
                };
                g.throughput(Throughput::Elements(n_values as _)); // Keys inserted per second
                g.bench_function(BenchmarkId::from(bench_name), |b| {
                    b.iter_batched(
                        || (Tree::<u16, usize, Natural, $balance, $storage>::default(), Lfsr::default()),
                        |(mut t, mut rand)| {
                            for _i in 0..n_values {
                                t.insert(rand.next(), 42_usize).unwrap();
                            }
                            t
                        },
                        criterion::BatchSize::PerIteration,
                    );
                });
            }
        }
    };
}

insert_bench!(avl_inner, Avl, Inner);
insert_bench!(avl_leaf, Avl, Leaf);
insert_bench!(plain_inner, Plain, Inner);
insert_bench!(plain_leaf, Plain, Leaf);
