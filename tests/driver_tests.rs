use jtac::driver::DriverError;
use jtac::{Config, Driver};
use pretty_assertions::assert_eq;
use std::thread;

fn get_test_name() -> String {
    thread::current()
        .name()
        .unwrap()
        .replace("::", "_")
}

fn output_path(extension: &str) -> String {
    let project_path = std::env!("CARGO_MANIFEST_DIR");
    let dir = format!("{}/target/test_outputs", project_path);

    std::fs::create_dir_all(&dir).expect("create output dir");

    format!("{}/{}.{}", dir, get_test_name(), extension)
}

/// Runs the driver on an inline program with every output redirected into
/// one file, and returns the exit code and what was written.
fn run_inline(program: &str, extra_args: &[&str]) -> (i32, String) {
    let output_file = output_path("out");
    let mut args = vec!["jtac", "-i", program];

    args.extend_from_slice(extra_args);

    let mut config = Config::try_from(args).unwrap();

    config.__output_override = Some(output_file.clone());

    let summary = Driver::new(config).run().expect("program compiles");
    let output = std::fs::read_to_string(&output_file).expect("Failed to read output file");

    (summary.exit_code(), output)
}

#[test]
fn prints_tac_for_a_method() {
    let program = "class Main {
    public static void main(String[] args) {
        int a = 2;
        int b = a * 3;
        if (b > a) a = b;
    }
}";
    let expected = "\
func main
main:
L1:
a = 2
t1 = a * 3
b = t1
if b g a goto L4
goto L3
L3:
t2 = 0
goto L5
L4:
t2 = 1
L5:
if t2 eq 0 goto L6
a = b
L6:
L2:
ret
";

    assert_eq!(run_inline(program, &[]), (0, expected.to_string()));
}

#[test]
fn reads_and_arrays() {
    let program = "class Main {
    static {
        Scanner sc = new Scanner(System.in);
        int n = sc.nextInt();
        int[] xs = new int[n];
        xs[0] = sc.nextInt();
    }
}";
    let expected = "\
input n
declare xs, n, int
input xs[0]
";

    assert_eq!(run_inline(program, &[]), (0, expected.to_string()));
}

#[test]
fn diagnostics_set_the_exit_code() {
    let program = "class Main {\n  static {\n    int a = 1;\n    a = b;\n    break;\n  }\n}";
    let expected = "\
a = 1
line 4: undeclared identifier 'b'
line 5: break outside of a loop
";

    assert_eq!(run_inline(program, &[]), (2, expected.to_string()));
}

#[test]
fn trace_follows_the_code() {
    let program = "class Main { static { int a = 1; } }";
    let expected = "\
a = 1
Literal
VariableDeclarator
LocalVariableDeclarationStatement
Block
StaticInitializer
ClassDeclaration
CompilationUnit
Goal
";

    assert_eq!(run_inline(program, &["-t"]), (0, expected.to_string()));
}

#[test]
fn ir_output_goes_to_the_given_file() {
    let ir_file = output_path("tac");
    let args = vec!["jtac", "-r", &ir_file, "-i", "class A { static { int x = 4; } }"];
    let config = Config::try_from(args).unwrap();
    let summary = Driver::new(config).run().unwrap();
    let output = std::fs::read_to_string(&ir_file).expect("Failed to read output file");

    assert_eq!(summary.instrs, 1);
    assert_eq!(output, "x = 4\n");
}

#[test]
fn syntax_errors_abort_the_run() {
    let args = vec!["jtac", "-i", "class A {\n  static { int = 4; }\n}"];
    let config = Config::try_from(args).unwrap();

    match Driver::new(config).run() {
        Err(DriverError::Syntax { error, rendered }) => {
            assert!(!error.errors.is_empty());
            assert!(rendered.starts_with("<input>: line 2: syntax error:"));
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn reads_source_files() {
    let source_file = output_path("java");

    std::fs::write(&source_file, "class A { void f() { } }").unwrap();

    let output_file = output_path("out");
    let mut config = Config::try_from(vec!["jtac", source_file.as_str()]).unwrap();

    config.__output_override = Some(output_file.clone());
    Driver::new(config).run().unwrap();

    let output = std::fs::read_to_string(&output_file).unwrap();

    assert_eq!(output, "func f\nf:\nL1:\nL2:\nret\n");
}

#[test]
fn missing_files_are_reported() {
    let config = Config::try_from(vec!["jtac", "/nonexistent/Missing.java"]).unwrap();

    assert!(matches!(
        Driver::new(config).run(),
        Err(DriverError::Read { .. })
    ));
}

#[test]
fn demo_programs_compile_cleanly() {
    let project_path = std::env!("CARGO_MANIFEST_DIR");

    for demo in ["fibonacci", "bubble_sort", "fizzbuzz"] {
        let source_file = format!("{}/demos/{}.java", project_path, demo);
        let output_file = output_path(&format!("{}.tac", demo));
        let mut config = Config::try_from(vec!["jtac", source_file.as_str()]).unwrap();

        config.__output_override = Some(output_file.clone());

        let summary = Driver::new(config).run().unwrap();
        let output = std::fs::read_to_string(&output_file).unwrap();

        assert_eq!(summary.exit_code(), 0, "{} reported:\n{}", demo, output);
        assert!(summary.instrs > 0);
    }
}
