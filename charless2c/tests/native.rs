use c2charless::compile;
use charless2c::{decode, transpile, Config, Machine};
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, PartialEq)]
struct Outcome {
    success: bool,
    stdout: String,
}

fn cc_available() -> bool {
    Command::new("cc")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Build the emitted C with `cc` and run it on `input`.
fn native(code: &str, input: &str) -> Outcome {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("main.c");
    let binary = dir.path().join("main");
    std::fs::write(&source, transpile(code)).unwrap();

    let build = Command::new("cc")
        .arg(&source)
        .arg("-o")
        .arg(&binary)
        .output()
        .unwrap();
    assert!(
        build.status.success(),
        "cc failed: {}",
        String::from_utf8_lossy(&build.stderr)
    );

    let mut child = Command::new(&binary)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    if let Some(mut stdin) = child.stdin.take() {
        // The program may exit before reading its input.
        let _ = stdin.write_all(input.as_bytes());
    }
    let out = child.wait_with_output().unwrap();
    Outcome {
        success: out.status.success(),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
    }
}

fn emulated(code: &str, input: &str) -> Outcome {
    let program = decode(code);
    let mut machine = Machine::new(&program, &Config::default());
    let mut output = Vec::new();
    let result = machine.run(&mut input.as_bytes(), &mut output, Some(1_000_000));
    Outcome {
        success: result.is_ok(),
        stdout: String::from_utf8_lossy(&output).into_owned(),
    }
}

fn assert_same(code: &str, input: &str, success: bool) {
    if !cc_available() {
        eprintln!("cc not found, skipping");
        return;
    }
    let expect = emulated(code, input);
    println!("{expect:?}");
    assert_eq!(expect.success, success);
    assert_eq!(native(code, input), expect);
}

macro_rules! case {
    ($name:ident, code: $code:expr, $input:expr, $success:expr) => {
        #[test]
        fn $name() {
            assert_same($code, $input, $success);
        }
    };
    ($name:ident, $source:expr, $input:expr, $success:expr) => {
        #[test]
        fn $name() {
            assert_same(&compile($source).unwrap(), $input, $success);
        }
    };
}

case!(
    factorial,
    "#include <stdio.h>\nint main() {\n  int n = 6;\n  int f = 1;\n  while (n != 1) {\n    f = f * n;\n    n = n - 1;\n  }\n  printf(\"%d\\n\", f);\n  return 0;\n}\n",
    "",
    true
);
case!(
    arithmetic,
    r#"printf("%d", 0 - 7); printf("%d", 17 % 5); printf("%d", 7 / 2); printf("%d", 3 >= 3);"#,
    "",
    true
);
case!(
    special_text,
    r#"printf("100%\t\"q\"\\ hé ✓\n");"#,
    "",
    true
);
case!(
    scan,
    r#"int n; int c; scanf("%d", &n); scanf("%c", &c); printf("%d", n * 2); printf("%c", c);"#,
    " -21x",
    true
);
case!(
    scan_at_eof,
    r#"int c; scanf("%c", &c); printf("%d", c);"#,
    "",
    true
);
case!(
    branches,
    r#"int a = 4; if (a > 3) { printf("big"); } if (a < 3) { printf("small"); }"#,
    "",
    true
);
case!(
    division_by_zero,
    r#"printf("a"); printf("%d", 1 / 0);"#,
    "",
    false
);
case!(
    modulo_by_zero,
    r#"int z = 0; printf("%d", 5 % z);"#,
    "",
    false
);
// pop on an empty stack
case!(stack_underflow, code: "501200", "", false);
// push 1; jump 0
case!(
    stack_overflow,
    code: "500200990120070020099000000200",
    "",
    false
);
