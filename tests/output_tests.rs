use dilithium_bench_eval::aggregator::{GroupShare, InstructionCount, Reducer};
use dilithium_bench_eval::output::{read_report_json, render_text, write_report_json, write_text};
use dilithium_bench_eval::report::{CycleSummary, EvaluationReport, FunctionRow};
use pretty_assertions::assert_eq;

fn create_test_report() -> EvaluationReport {
    EvaluationReport {
        version: "1.0.0".to_string(),
        benchmark_ids: vec![4],
        operation: "sign".to_string(),
        iterations: 3,
        statistic: Reducer::Median,
        cycles: CycleSummary {
            mean: 1_250_000,
            median: 1_240_000,
            std_dev: 31_000,
        },
        groups: vec![
            GroupShare {
                group: "Polynomial Arithmetic".to_string(),
                color: Some("set37c1".to_string()),
                percentage: 61,
            },
            GroupShare {
                group: "SHAKE".to_string(),
                color: Some("set37c6".to_string()),
                percentage: 39,
            },
        ],
        functions: vec![FunctionRow {
            function: "ntt_dilithium".to_string(),
            group: "Polynomial Arithmetic".to_string(),
            calls: 12,
            cycles: 48_000,
            stalls: 1_200,
            total: 49_200,
            per_call: 4_100,
            per_call_cycles: 4_000.0,
            per_call_stalls: 100.0,
        }],
        instruction_histogram: vec![
            InstructionCount {
                instruction: "bn.mulqacc".to_string(),
                count: 30_000,
            },
            InstructionCount {
                instruction: "addi".to_string(),
                count: 512,
            },
        ],
        generated_at: "2025-02-14T10:00:00Z".to_string(),
    }
}

#[test]
fn test_render_text_sections() {
    let text = render_text(&create_test_report(), "bench.json");

    assert!(text.starts_with(" --- sign: index 4 in bench.json ---\n"));
    for section in [
        "Overall Stats",
        "Group Percentages",
        "Per Function Statistics (accumulated)",
        "Instruction Histogram",
    ] {
        assert!(text.contains(section), "missing section {}", section);
    }
    assert!(text.ends_with("\n\n\n"));
}

#[test]
fn test_render_text_rows() {
    let text = render_text(&create_test_report(), "bench.json");
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines.contains(&"Mean       1250000"));
    assert!(lines.contains(&"Std. Dev.    31000"));
    assert!(lines.contains(&"Polynomial Arithmetic          61"));
    assert!(lines.contains(&"bn.mulqacc   30000"));
    assert!(lines
        .iter()
        .any(|l| l.starts_with("ntt_dilithium") && l.ends_with("4100")));
}

#[test]
fn test_json_round_trip() {
    let report = create_test_report();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("out/report.json");

    write_report_json(&[report.clone()], &path).unwrap();
    let loaded = read_report_json(&path).unwrap();

    assert_eq!(loaded, vec![report]);
}

#[test]
fn test_write_text_rejects_empty_path() {
    assert!(write_text("x", "").is_err());
}

#[test]
fn test_write_text() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("eval_result.txt");

    let text = render_text(&create_test_report(), "bench.json");
    write_text(&text, &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
}
