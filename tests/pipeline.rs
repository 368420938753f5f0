//! End-to-end pipeline scenarios, run through the public `compile` entry
//! point and (where a real file matters) through scratch files on disk.

use ezyc::{Severity, TranspilerConfig, compile};
use std::io::Write;

fn run(src: &str) -> (String, ezyc::Diagnostics) {
    compile(src, &TranspilerConfig::default())
}

#[test]
fn add_function_transpiles_with_inferred_int32_body() {
    let (c_source, diagnostics) = run("fn int32 add(int32 a, int32 b) { let int32 c = a + b; }");
    assert!(!diagnostics.has_errors());
    assert!(c_source.contains("int32_t add(int32_t a, int32_t b)"));
    assert!(c_source.contains("int32_t c = a + b;"));
}

#[test]
fn print_with_mixed_argument_types_synthesizes_format_string() {
    let (c_source, diagnostics) = run(r#"fn main() { print("hi", 42); }"#);
    assert!(!diagnostics.has_errors());
    assert!(c_source.contains(r#"printf("%s %" PRId32, "hi", (int32_t)42)"#));
}

#[test]
fn float64_literal_infers_a_double_declaration() {
    let (c_source, diagnostics) = run("fn main() { let pi = 3.14159; }");
    assert!(!diagnostics.has_errors());
    assert!(c_source.contains("double pi = 3.14159;"));
}

#[test]
fn nested_binary_expressions_reproduce_original_grouping() {
    let (c_source, _diagnostics) = run(
        "fn float64 f(float64 a, float64 b, float64 c) { let float64 r = (a + b) * (c - a); }",
    );
    assert!(c_source.contains("(a + b) * (c - a)"));
}

#[test]
fn binop_operand_is_parenthesized_even_when_precedence_would_allow_flattening() {
    // 1 + 2 * 3 must transpile to 1 + (2 * 3): every binop operand that is
    // itself a binop is parenthesized, never just the lower-precedence ones.
    let (c_source, _diagnostics) = run("fn main() { let int32 y = 1 + 2 * 3; }");
    assert!(c_source.contains("1 + (2 * 3)"));
}

#[test]
fn const_without_initializer_is_reported_and_does_not_crash_the_run() {
    let (_c_source, diagnostics) = run("fn main() { const int32 x; }");
    assert!(diagnostics.has_errors());
    assert!(diagnostics.iter().any(|d| d.message.contains("Const declarations must be immediately assigned")));
}

#[test]
fn unterminated_string_literal_is_a_lexical_error_not_a_panic() {
    let (_c_source, diagnostics) = run(r#"fn main() { print("never closed); }"#);
    assert!(diagnostics.has_errors());
}

#[test]
fn one_bad_top_level_form_does_not_lose_the_rest_of_the_file() {
    let src = "struct Bad { }\nfn int32 ok() { let int32 x = 1; }\n";
    let (c_source, diagnostics) = run(src);
    assert!(diagnostics.has_errors());
    assert!(c_source.contains("int32_t ok(void)"));
}

#[test]
fn diagnostics_carry_both_severities_when_both_occur() {
    // Missing return type is a warning; the reserved `return` keyword is an error.
    let src = "fn main() { return 1; }";
    let (_c_source, diagnostics) = run(src);
    assert!(diagnostics.iter().any(|d| d.severity == Severity::Error));
}

#[test]
fn transpiler_config_defaults_match_documented_sizes() {
    let config = TranspilerConfig::default();
    assert_eq!(config.arena_block_size, 1024 * 1024);
    assert_eq!(config.output_chunk_size, 64 * 1024);
}

#[test]
fn compiling_a_source_file_from_disk_round_trips_through_a_scratch_file() {
    let mut input = tempfile::NamedTempFile::new().expect("create scratch input file");
    writeln!(input, "fn int32 square(int32 x) {{ let int32 r = x * x; }}").expect("write scratch source");

    let src = std::fs::read_to_string(input.path()).expect("read back scratch source");
    let (c_source, diagnostics) = run(&src);
    assert!(!diagnostics.has_errors());
    assert!(c_source.contains("int32_t square(int32_t x)"));

    let output = tempfile::NamedTempFile::new().expect("create scratch output file");
    std::fs::write(output.path(), &c_source).expect("write generated C");
    let written_back = std::fs::read_to_string(output.path()).expect("read back generated C");
    assert_eq!(written_back, c_source);
}
