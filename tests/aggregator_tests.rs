use dilithium_bench_eval::aggregator::reducer::std_dev;
use dilithium_bench_eval::aggregator::{
    attribute, cycles_statistic, instruction_histogram, per_function_statistic, CycleAccounting,
    Reducer,
};
use dilithium_bench_eval::loader::{load_trace, BenchmarkSelection, CounterPair, LoadedTrace};
use dilithium_bench_eval::store::TraceDatabase;
use dilithium_bench_eval::utils::error::{AttributionError, StatsError};

/// One benchmark whose iterations run a single function
fn single_function_trace(function: &str, cycles: &[u64], calls: &[u64]) -> LoadedTrace {
    let mut db = TraceDatabase::new();
    db.add_benchmark(1, "sign");

    for (i, &c) in cycles.iter().enumerate() {
        let iteration = i as i64 + 1;
        db.add_iteration(1, iteration, c)
            .add_counter(iteration, function, "bn.mulqacc", c, 0);
        if let Some(&count) = calls.get(i) {
            db.add_call(iteration, function, count);
        }
    }

    load_trace(&db, &BenchmarkSelection::single(1)).unwrap()
}

#[test]
fn test_lossless_attribution() {
    let mut db = TraceDatabase::new();
    db.add_benchmark(1, "verify");
    for iteration in 1..=3 {
        let scale = iteration as u64;
        db.add_iteration(1, iteration, 110 * scale)
            .add_counter(iteration, "main", "add", 10 * scale, 3)
            .add_counter(iteration, "ntt_dilithium", "bn.mulqacc", 60 * scale, 1)
            .add_counter(iteration, "ntt_dilithium", "bn.wsrr", 15 * scale, 0)
            .add_counter(iteration, "poly_uniform", "bn.wsrr", 25 * scale, 2);
    }
    let trace = load_trace(&db, &BenchmarkSelection::single(1)).unwrap();

    let attribution = attribute(&trace, CycleAccounting::Instructions).unwrap();

    for (id, functions) in attribution.iterations() {
        let attributed: u64 = functions.values().map(|p| p.count).sum();
        assert_eq!(attributed, trace.iterations[id].total_cycles);
    }
}

#[test]
fn test_corrupt_trace_is_rejected() {
    let mut db = TraceDatabase::new();
    db.add_benchmark(1, "verify")
        .add_iteration(1, 1, 100)
        .add_counter(1, "main", "add", 100, 0)
        .add_iteration(1, 2, 100)
        .add_counter(2, "main", "add", 101, 0);
    let trace = load_trace(&db, &BenchmarkSelection::single(1)).unwrap();

    match attribute(&trace, CycleAccounting::Instructions) {
        Err(AttributionError::CycleMismatch {
            iteration,
            expected,
            attributed,
        }) => {
            assert_eq!((iteration, expected, attributed), (2, 100, 101));
        }
        other => panic!("expected a cycle mismatch, got {:?}", other),
    }
}

#[test]
fn test_shake_reassignment() {
    let mut db = TraceDatabase::new();
    db.add_benchmark(1, "sign")
        .add_iteration(1, 1, 60)
        .add_counter(1, "poly_challenge", "bn.wsrr", 10, 2)
        .add_counter(1, "poly_challenge", "addi", 50, 5);
    let trace = load_trace(&db, &BenchmarkSelection::single(1)).unwrap();

    let attribution = attribute(&trace, CycleAccounting::Instructions).unwrap();
    let functions = attribution.iteration(1).unwrap();

    assert_eq!(functions["SHAKE"], CounterPair::new(10, 2));
    assert_eq!(functions["poly_challenge"], CounterPair::new(50, 5));
}

#[test]
fn test_per_call_normalization_divides_before_reducing() {
    let trace = single_function_trace("poly_uniform", &[100, 120, 260], &[10, 10, 20]);
    let attribution = attribute(&trace, CycleAccounting::Instructions).unwrap();
    let divisor = 40.0 / 3.0;

    let mean = per_function_statistic(&attribution, &trace.call_counts, Reducer::Mean, true)
        .unwrap()["poly_uniform"];
    assert!((mean.cycles - 160.0 / divisor).abs() < 1e-9);

    let spread = per_function_statistic(&attribution, &trace.call_counts, Reducer::StdDev, true)
        .unwrap()["poly_uniform"];
    let expected = std_dev(&[100.0 / divisor, 120.0 / divisor, 260.0 / divisor]).unwrap();
    assert!((spread.cycles - expected).abs() < 1e-9);

    // The divisor is the mean call count, not the requested statistic of the calls
    let wrong = std_dev(&[100.0, 120.0, 260.0]).unwrap() / std_dev(&[10.0, 10.0, 20.0]).unwrap();
    assert!((spread.cycles - wrong).abs() > 1.0);
}

#[test]
fn test_cycle_statistics() {
    let trace = single_function_trace("main", &[90, 100, 140], &[]);

    assert_eq!(cycles_statistic(&trace, Reducer::Mean).unwrap(), 110.0);
    assert_eq!(cycles_statistic(&trace, Reducer::Median).unwrap(), 100.0);
    assert_eq!(cycles_statistic(&trace, Reducer::Min).unwrap(), 90.0);
}

#[test]
fn test_std_dev_over_one_iteration_is_error() {
    let trace = single_function_trace("main", &[90], &[]);

    assert_eq!(
        cycles_statistic(&trace, Reducer::StdDev),
        Err(StatsError::TooFewSamples { needed: 2, got: 1 })
    );
}

#[test]
fn test_histogram_median() {
    let trace = single_function_trace("main", &[5, 7, 9], &[]);

    let histogram = instruction_histogram(&trace).unwrap();

    assert_eq!(histogram.len(), 1);
    assert_eq!(histogram[0].instruction, "bn.mulqacc");
    assert_eq!(histogram[0].count, 7);
}
