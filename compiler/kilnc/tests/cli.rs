#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
//! End-to-end tests of the `kiln` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn kiln(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kiln"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const PROGRAM: &str = "\
fun int main()
    var int x;
    var int y;
    x = 10 + 5 * 3 + 30;
    while (x < 100) do
        y = 2 + 3;
        x = x + y;
    endwhile;
    print(x);
endfun
";

const OPTIMIZED: &str = "\
fun int main()
    var int x;
    var int y;
        y = 5;
    x = 55;
    while (x < 100) do
        x = x + y;
    endwhile;
    print(x);
endfun
";

#[test]
fn optimize_writes_requested_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.txt"), PROGRAM).unwrap();

    let out = kiln(&["optimize", "prog.txt", "-o", "out.txt"], dir.path());
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), OPTIMIZED);
    assert!(stdout(&out).contains("prog.txt -> out.txt"));
}

#[test]
fn optimize_defaults_output_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("input7.txt"), PROGRAM).unwrap();

    let out = kiln(&["optimize", "input7.txt"], dir.path());
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(
        fs::read_to_string(dir.path().join("input7_optimized.txt")).unwrap(),
        OPTIMIZED
    );
}

#[test]
fn optimize_respects_pass_flags() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.txt"), PROGRAM).unwrap();

    let out = kiln(
        &["optimize", "prog.txt", "-o", "out.txt", "--no-fold", "--no-hoist"],
        dir.path(),
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), PROGRAM);
}

#[test]
fn missing_input_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();

    let out = kiln(&["optimize", "absent.txt"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error: optimization failed for absent.txt: cannot read"));
}

#[test]
fn batch_skips_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("inputs");
    fs::create_dir(&inputs).unwrap();
    fs::write(inputs.join("input1.txt"), PROGRAM).unwrap();
    fs::write(inputs.join("input14.txt"), "z = abs(0 - 9);\n").unwrap();

    let out = kiln(&["batch"], dir.path());
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("2 optimized, 12 skipped, 0 failed"));
    assert_eq!(
        fs::read_to_string(inputs.join("input1_optimized.txt")).unwrap(),
        OPTIMIZED
    );
    assert_eq!(
        fs::read_to_string(inputs.join("input14_optimized.txt")).unwrap(),
        "z = 9;\n"
    );
    assert!(!inputs.join("input2_optimized.txt").exists());
}

#[test]
fn batch_accepts_directory_and_range() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("input2.txt"), "a = fac(5);\n").unwrap();
    fs::write(dir.path().join("input3.txt"), "a = fac(3);\n").unwrap();

    let dir_arg = dir.path().to_string_lossy().into_owned();
    let out = kiln(
        &["batch", &dir_arg, "--first=2", "--last=2", "--no-parallel"],
        dir.path(),
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("1 optimized, 0 skipped, 0 failed"));
    assert_eq!(
        fs::read_to_string(dir.path().join("input2_optimized.txt")).unwrap(),
        "a = 120;\n"
    );
    assert!(!dir.path().join("input3_optimized.txt").exists());
}

#[test]
fn eval_prints_value() {
    let dir = tempfile::tempdir().unwrap();
    let out = kiln(&["eval", "-7 / 2"], dir.path());
    assert_eq!(stdout(&out), "-4\n");

    let out = kiln(&["eval", "fac(n)"], dir.path());
    assert_eq!(stdout(&out), "not constant: `n` is not a constant\n");
}

#[test]
fn fold_prints_line() {
    let dir = tempfile::tempdir().unwrap();
    let out = kiln(&["fold", "if (a == 2*3) then"], dir.path());
    assert_eq!(stdout(&out), "if (a == 6) then\n");
}

#[test]
fn lex_shows_classification() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.txt"), PROGRAM).unwrap();
    let out = kiln(&["lex", "prog.txt"], dir.path());
    assert!(out.status.success());
    let listing = stdout(&out);
    assert!(listing.contains("   1 MainHeader"));
    assert!(listing.contains("   5 LoopHeader"));
    assert!(listing.contains("   8 LoopEnd"));
    assert!(listing.contains("  10 FunctionEnd"));
}

#[test]
fn functions_lists_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let out = kiln(&["functions"], dir.path());
    assert!(out.status.success());
    let listing = stdout(&out);
    assert!(listing.starts_with("abs      Absolute value"));
    assert!(listing.contains("fac      Factorial"));
}

#[test]
fn unknown_command_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = kiln(&["frobnicate"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Unknown command: frobnicate"));
}
