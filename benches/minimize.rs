use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use descent::{
    AdamParams, BetaFormula, HeavyBallGradient, LineSearchParams, NonlinearConjugateGradient,
    Quadratic, Rosenbrock, Sgd, StochasticParams, StopRule, SteepestDescent,
};

fn ill_conditioned_quadratic(n: usize) -> Quadratic {
    // eigenvalues spread linearly from 1 to 100
    let d: Vec<f64> = (0..n)
        .map(|i| 1.0 + 99.0 * i as f64 / (n - 1) as f64)
        .collect();
    Quadratic::diagonal(&d)
}

fn bench_quadratics(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadratic");
    for n in [10usize, 100] {
        let f = ill_conditioned_quadratic(n);
        let x0: Vec<f64> = vec![1.0; n];
        let stop = StopRule { eps: 1e-6, max_iter: 10_000 };
        let ls = LineSearchParams { max_f_eval: 100_000, ..Default::default() };

        group.bench_with_input(BenchmarkId::new("steepest", n), &n, |b, _| {
            b.iter(|| {
                SteepestDescent::new(&f, Some(x0.clone()), stop, ls)
                    .unwrap()
                    .minimize()
            })
        });
        group.bench_with_input(BenchmarkId::new("cg_hybrid", n), &n, |b, _| {
            b.iter(|| {
                NonlinearConjugateGradient::new(
                    &f,
                    Some(x0.clone()),
                    BetaFormula::HybridFrPr,
                    0,
                    stop,
                    ls,
                )
                .unwrap()
                .minimize()
            })
        });
        group.bench_with_input(BenchmarkId::new("heavy_ball", n), &n, |b, _| {
            b.iter(|| {
                HeavyBallGradient::new(&f, Some(x0.clone()), 0.5, stop, ls)
                    .unwrap()
                    .minimize()
            })
        });
    }
    group.finish();
}

fn bench_rosenbrock(c: &mut Criterion) {
    let f = Rosenbrock::new(10).unwrap();
    let x0 = vec![-1.0; 10];
    let stop = StopRule { eps: 1e-4, max_iter: 50_000 };
    let ls = LineSearchParams { max_f_eval: 500_000, ..Default::default() };

    c.bench_function("rosenbrock/cg_hybrid", |b| {
        b.iter(|| {
            NonlinearConjugateGradient::new(
                &f,
                Some(x0.clone()),
                BetaFormula::HybridFrPr,
                1,
                stop,
                ls,
            )
            .unwrap()
            .minimize()
        })
    });

    c.bench_function("rosenbrock/adam_epoch_budget", |b| {
        let params = StochasticParams { step_size: 0.01, epochs: 1000, ..Default::default() };
        b.iter(|| {
            descent::Adam::new(&f, Some(x0.clone()), params, AdamParams::default())
                .unwrap()
                .minimize()
        })
    });

    c.bench_function("rosenbrock/sgd_epoch_budget", |b| {
        let params = StochasticParams { step_size: 1e-3, epochs: 1000, ..Default::default() };
        b.iter(|| Sgd::new(&f, Some(x0.clone()), params).unwrap().minimize())
    });
}

criterion_group!(benches, bench_quadratics, bench_rosenbrock);
criterion_main!(benches);
