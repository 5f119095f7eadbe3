#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use kiln_eval::PureFunctionRegistry;
use kiln_lexer::LineFlags;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn fold(line: &str) -> String {
    fold_line(&PureFunctionRegistry::new(), line).text
}

fn lines(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}

// Folding

#[test]
fn folds_precedence() {
    assert_eq!(fold("x = 10 + 5 * 3 + 30;"), "x = 55;");
}

#[test]
fn folds_floor_division() {
    assert_eq!(fold("    y = 7 / 2;"), "    y = 3;");
    assert_eq!(fold("y = -7 / 2;"), "y = -4;");
}

#[test]
fn folds_pure_function_calls() {
    assert_eq!(fold("x = fac(4);"), "x = 24;");
    assert_eq!(fold("x = abs(-5);"), "x = 5;");
    assert_eq!(fold("x = fac(n);"), "x = fac(n);");
}

#[test]
fn folds_constant_parts_of_runtime_expressions() {
    assert_eq!(fold("x = y + 2 * 3;"), "x = y + 6;");
    assert_eq!(fold("x = fac(2 + 1) * n;"), "x = 6 * n;");
    assert_eq!(fold("x = y - (0 - 5);"), "x = y - (-5);");
}

#[test]
fn folds_comparisons() {
    assert_eq!(fold("if (a == 2*3) then"), "if (a == 6) then");
    assert_eq!(fold("while (i < 2 * 5) do"), "while (i < 10) do");
    assert_eq!(fold("if b != 4 - 4 then"), "if b != 0 then");
}

#[test]
fn folds_every_region_of_a_line() {
    let folded = fold_line(
        &PureFunctionRegistry::new(),
        "if a < 1 + 1 then b = 3 * 3; endif",
    );
    assert_eq!(folded.text, "if a < 2 then b = 9; endif");
    assert_eq!(folded.folded, 2);
}

#[test]
fn leaves_non_constant_text_alone() {
    for line in [
        "x = x + 1;",
        "x = 1 / 0;",
        "x = 9223372036854775807 + 1;",
        "x = 2 + 3 @;",
        "x = rand(3);",
        "print(2 + 3);",
        "var int x;",
        "",
    ] {
        let folded = fold_line(&PureFunctionRegistry::new(), line);
        assert_eq!(folded.text, line);
        assert!(!folded.changed(), "{line}");
    }
}

#[test]
fn folding_is_idempotent_on_literals() {
    for line in ["x = 55;", "x = -4;", "x = y - (-5);", "if (a == 6) then"] {
        assert_eq!(fold(line), line);
    }
}

#[test]
fn folding_uses_the_given_registry() {
    let registry = PureFunctionRegistry::empty();
    assert_eq!(fold_line(&registry, "x = fac(3);").text, "x = fac(3);");
}

// Hoisting

const LOOP_PROGRAM: &str = "\
fun int main()
    var int x;
    var int y;
    x = 0;
    while (x < 10) do
        y = 2 + 3;
        x = x + 1;
    endwhile;
endfun
";

#[test]
fn hoists_constant_assignment_once() {
    let out = optimize_source(LOOP_PROGRAM);
    assert_eq!(
        out,
        lines(
            "fun int main()
    var int x;
    var int y;
        y = 5;
    x = 0;
    while (x < 10) do
        x = x + 1;
    endwhile;
endfun"
        )
    );
    assert_eq!(out.matches("y = 5;").count(), 1);
    assert!(!out.contains("2 + 3"));
}

#[test]
fn keeps_loop_variant_assignment() {
    let out = optimize_source(LOOP_PROGRAM);
    assert!(out.contains("        x = x + 1;\n"));
}

#[test]
fn second_assignment_to_hoisted_variable_stays() {
    let src = lines(
        "fun main()
    var int y;
    while (i < 3) do
        y = 2 + 3;
        y = 4 * 2;
    endwhile;
endfun",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "fun main()
    var int y;
        y = 5;
    while (i < 3) do
        y = 8;
    endwhile;
endfun"
        )
    );
}

#[test]
fn loops_outside_main_are_not_hoisted() {
    let src = lines(
        "fun int helper()
    while (i < 3) do
        z = 1 + 1;
    endwhile;
endfun
fun int main()
    var int a;
    a = 1;
endfun",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "fun int helper()
    while (i < 3) do
        z = 2;
    endwhile;
endfun
fun int main()
    var int a;
    a = 1;
endfun"
        )
    );
}

#[test]
fn assignments_outside_loops_are_only_folded() {
    let src = lines(
        "fun main()
    var int a;
    a = 2 * 21;
endfun",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "fun main()
    var int a;
    a = 42;
endfun"
        )
    );
}

#[test]
fn inserts_after_header_without_declarations() {
    let src = lines(
        "fun main()
    i = 0;
    while (i < 3) do
        k = fac(3);
        i = i + 1;
    endwhile;
endfun",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "fun main()
        k = 6;
    i = 0;
    while (i < 3) do
        i = i + 1;
    endwhile;
endfun"
        )
    );
}

#[test]
fn declarations_before_main_do_not_move_insertion_point() {
    let src = lines(
        "var int g;
fun main()
    while (i < 3) do
        k = 1;
    endwhile;
endfun",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "var int g;
fun main()
        k = 1;
    while (i < 3) do
    endwhile;
endfun"
        )
    );
}

#[test]
fn inner_endwhile_returns_to_main() {
    let src = lines(
        "fun main()
    var int a;
    while (i < 3) do
        while (j < 3) do
            a = 4;
        endwhile;
        b = 1 + 1;
    endwhile;
    c = 1 + 2;
endfun",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "fun main()
    var int a;
            a = 4;
    while (i < 3) do
        while (j < 3) do
        endwhile;
        b = 2;
    endwhile;
    c = 3;
endfun"
        )
    );
}

#[test]
fn assignment_after_inner_loop_is_folded_in_place() {
    let out = optimize_source(
        "fun main()\n    var int a;\n    while (i < 3) do\n        while (j < 3) do\n        endwhile;\n        b = 1 + 1;\n    endwhile;\nendfun\n",
    );
    assert!(out.contains("        b = 2;\n    endwhile;"), "{out}");
    assert!(!out.contains("    var int a;\n        b = 2;"), "{out}");
}

#[test]
fn unrecognized_input_is_never_hoisted() {
    let src = lines(
        "fun main()
    while (i < 3) do
        y = 2 @ 3;
    endwhile;
endfun",
    );
    let out = Optimizer::default().optimize_source(&src);
    assert_eq!(out.text, src);
    assert_eq!(out.stats.assignments_hoisted, 0);
}

#[test]
fn comparisons_in_loops_are_not_assignments() {
    let src = lines(
        "fun main()
    while (i < 3) do
        if x <= 2 + 3 then
        endif;
    endwhile;
endfun",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "fun main()
    while (i < 3) do
        if x <= 5 then
        endif;
    endwhile;
endfun"
        )
    );
}

#[test]
fn unterminated_main_still_flushes() {
    let src = lines(
        "fun main()
    while (k < 2) do
        c = 3 * 3;
    endwhile;",
    );
    assert_eq!(
        optimize_source(&src),
        lines(
            "fun main()
        c = 9;
    while (k < 2) do
    endwhile;"
        )
    );
}

#[test]
fn hoisted_names_reset_per_function() {
    let src = lines(
        "fun main()
    while (i < 2) do
        y = 1;
    endwhile;
endfun
fun main()
    while (i < 2) do
        y = 2;
    endwhile;
endfun",
    );
    let out = optimize_source(&src);
    assert_eq!(out.matches("y = 1;").count(), 1);
    assert_eq!(out.matches("y = 2;").count(), 1);
    assert_eq!(
        out,
        lines(
            "fun main()
        y = 1;
    while (i < 2) do
    endwhile;
endfun
fun main()
        y = 2;
    while (i < 2) do
    endwhile;
endfun"
        )
    );
}

#[test]
fn preserves_line_terminators() {
    let src = "fun main()\r\n    while (k < 2) do\r\n        c = 1 + 2;\r\n    endwhile;\r\nendfun";
    assert_eq!(
        optimize_source(src),
        "fun main()\r\n        c = 3;\r\n    while (k < 2) do\r\n    endwhile;\r\nendfun"
    );
}

#[test]
fn structural_lines_are_verbatim() {
    let src = lines(
        "fun   main()
    while (x < 2 + 2) do
    endwhile;
endfun",
    );
    assert_eq!(optimize_source(&src), src);
}

#[test]
fn loop_context_tracks_state() {
    let registry = PureFunctionRegistry::new();
    let mut pass = HoistingPass::new(kiln_eval::Evaluator::new(&registry), true);
    let mut output = OutputBuffer::new();

    let mut feed = |text: &str, output: &mut OutputBuffer| {
        let line = SourceLine::new(text);
        let disposition = pass.process(&line, output);
        if disposition != Disposition::Suppress {
            output.push(text.to_string(), line.flags);
        }
        (disposition, pass.context().state())
    };

    assert_eq!(
        feed("fun main()\n", &mut output),
        (Disposition::Verbatim, LoopState::InMain)
    );
    assert_eq!(
        feed("while (a < 1) do\n", &mut output),
        (Disposition::Verbatim, LoopState::InMainInWhile)
    );
    assert_eq!(
        feed("q = 7;\n", &mut output),
        (Disposition::Suppress, LoopState::InMainInWhile)
    );
    assert_eq!(
        feed("r = q;\n", &mut output),
        (Disposition::Retain, LoopState::InMainInWhile)
    );
    assert_eq!(
        feed("endwhile;\n", &mut output),
        (Disposition::Verbatim, LoopState::InMain)
    );
    assert_eq!(
        feed("endfun\n", &mut output),
        (Disposition::Verbatim, LoopState::OutsideMain)
    );
    assert_eq!(pass.hoisted(), 1);
    assert!(pass.context().pending().is_empty());
}

#[test]
fn hoisted_assignment_renders_with_indent() {
    let hoisted = HoistedAssignment {
        name: "y".to_string(),
        value: -3,
        indent: "\t".to_string(),
        terminator: "\n".to_string(),
    };
    assert_eq!(hoisted.render(), "\ty = -3;\n");
}

// Configuration and statistics

#[test]
fn hoisting_can_be_disabled() {
    let optimizer = Optimizer::new(OptimizerConfig::new().with_hoist(false));
    let out = optimizer.optimize_source(LOOP_PROGRAM);
    assert!(out.text.contains("    while (x < 10) do\n        y = 5;\n"));
    assert_eq!(out.stats.assignments_hoisted, 0);
    assert_eq!(out.stats.expressions_folded, 1);
}

#[test]
fn optimizer_keeps_its_config_and_registry() {
    let config = OptimizerConfig::new().with_hoist(false);
    let optimizer = Optimizer::with_registry(config, PureFunctionRegistry::empty());
    assert_eq!(optimizer.config(), config);
    assert!(optimizer.registry().is_empty());
    assert_eq!(optimizer.optimize_source("x = fac(3);\n").text, "x = fac(3);\n");

    let default = Optimizer::default();
    assert_eq!(default.config(), OptimizerConfig::default());
    assert_eq!(default.registry().names(), vec!["abs", "fac"]);
}

#[test]
fn folding_can_be_disabled() {
    let src = lines(
        "fun main()
    a = 2 * 3;
    while (i < 2) do
        b = 2 * 3;
    endwhile;
endfun",
    );
    let optimizer = Optimizer::new(OptimizerConfig::new().with_fold(false));
    assert_eq!(
        optimizer.optimize_source(&src).text,
        lines(
            "fun main()
        b = 6;
    a = 2 * 3;
    while (i < 2) do
    endwhile;
endfun"
        )
    );
}

#[test]
fn stats_count_work() {
    let out = Optimizer::default().optimize_source(LOOP_PROGRAM);
    assert_eq!(out.stats.lines_read, 9);
    assert_eq!(out.stats.lines_written, 9);
    assert_eq!(out.stats.assignments_hoisted, 1);
    assert_eq!(out.stats.expressions_folded, 0);
    assert!(out.stats.changed());
}

#[test]
fn stats_merge() {
    let mut total = PassStats::default();
    let one = PassStats {
        lines_read: 3,
        lines_written: 2,
        expressions_folded: 1,
        assignments_hoisted: 1,
        ..PassStats::default()
    };
    total.merge(&one);
    total.merge(&one);
    assert_eq!(total.lines_read, 6);
    assert_eq!(total.assignments_hoisted, 2);
    assert!(total.to_string().starts_with("6 lines in, 4 lines out, 2 folded, 2 hoisted"));
}

#[test]
fn output_buffer_finds_declarations() {
    let mut buffer = OutputBuffer::new();
    buffer.push("var int a;\n".to_string(), LineFlags::INT_DECLARATION);
    buffer.push("fun main()\n".to_string(), LineFlags::FUN_HEADER);
    buffer.push("var int b;\n".to_string(), LineFlags::INT_DECLARATION);
    buffer.push("b = 1;\n".to_string(), LineFlags::HAS_ASSIGN);

    assert_eq!(buffer.last_declaration_since(0), Some(2));
    assert_eq!(buffer.last_declaration_since(3), None);
    assert_eq!(buffer.last_declaration_since(10), None);

    buffer.insert_lines(99, ["tail\n".to_string()]);
    assert_eq!(buffer.lines().last(), Some("tail\n"));
}

// File driver

#[test]
fn optimize_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input1.txt");
    let output = dir.path().join("input1_optimized.txt");
    std::fs::write(&input, LOOP_PROGRAM).unwrap();

    let stats = optimize(&input, &output).unwrap();
    assert_eq!(stats.assignments_hoisted, 1);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        optimize_source(LOOP_PROGRAM)
    );
}

#[test]
fn optimize_overwrites_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    std::fs::write(&input, "x = 1 + 1;\n").unwrap();
    std::fs::write(&output, "stale contents that are longer\n").unwrap();

    optimize(&input, &output).unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "x = 2;\n");
}

#[test]
fn missing_input_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.txt");
    let err = optimize(&input, dir.path().join("out.txt")).unwrap_err();
    assert!(matches!(err, OptimizeError::Read { .. }));
    assert_eq!(err.path(), input.as_path());
}

#[test]
fn unwritable_output_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    std::fs::write(&input, "x = 1;\n").unwrap();
    let output = dir.path().join("no_such_dir").join("out.txt");

    let err = optimize(&input, &output).unwrap_err();
    assert!(matches!(err, OptimizeError::Write { .. }));
    assert_eq!(err.path(), output.as_path());
}

// Properties

fn arb_operand() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..100).prop_map(|n| n.to_string()),
        (1i64..100).prop_map(|n| format!("(-{n})")),
        Just("y".to_string()),
        (0i64..6).prop_map(|n| format!("fac({n})")),
    ]
}

fn arb_rhs() -> impl Strategy<Value = String> {
    arb_operand().prop_recursive(3, 16, 2, |inner| {
        (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/"]), inner)
            .prop_map(|(l, op, r)| format!("({l} {op} {r})"))
    })
}

proptest! {
    #[test]
    fn folding_is_idempotent(rhs in arb_rhs()) {
        let once = fold(&format!("x = {rhs};"));
        let twice = fold(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn lines_without_introducers_are_untouched(rhs in arb_rhs()) {
        let line = format!("print({rhs});");
        prop_assert_eq!(fold(&line), line);
    }
}
