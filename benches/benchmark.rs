use criterion::{criterion_group, criterion_main, Criterion};
use peak::cohort::Cohort;
use peak::config::Parameters;
use peak::run::Run;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn 适应度(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let cohort = Cohort::of_size(1000, &mut rng);
    c.bench_function("平均适应度", |b| {
        b.iter(|| black_box(cohort.mean_fitness().unwrap()))
    });
}

fn 锦标赛选择(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let cohort = Cohort::of_size(1000, &mut rng);
    c.bench_function("锦标赛选择", |b| {
        b.iter(|| black_box(cohort.binary_tournament_select(500, &mut rng).unwrap()))
    });
}

fn 完整运行(c: &mut Criterion) {
    let parameters = Parameters::default();
    let mut seed = 0;
    c.bench_function("完整运行", |b| {
        b.iter(|| {
            seed += 1;
            black_box(Run::with_seed(parameters, seed).unwrap())
        })
    });
}

criterion_group!(benches, 适应度, 锦标赛选择, 完整运行);
criterion_main!(benches);
