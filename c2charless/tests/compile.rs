use c2charless::{compile, generate, Error, Instruction, Label, TokenKind};
use charless_arch::OpKind;

const STORE: &str = "510200";
const LOAD: &str = "511200";
const POP: &str = "501200";
const ADD: &str = "600200";
const SUB: &str = "601200";
const MUL: &str = "602200";
const EQ: &str = "801200";
const PRINT_NUM: &str = "020200";
const PRINT_CHAR: &str = "040200";
const HALT: &str = "000200";

fn push(val: u32) -> String {
    format!("500200990{val}200")
}

fn jump(op: &str, target: usize) -> String {
    format!("{op}200990{target:05}200")
}

fn assert(code: &str, expect: &[&str]) {
    println!("{code}");
    let out = compile(code).unwrap();
    println!("{out}");
    assert_eq!(out, expect.concat());
}

macro_rules! case {
    ($name:ident, $code:expr, [$($part:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert($code, &[$(&$part),*]);
        }
    };
}

case!(
    declare_and_print,
    r#"int x = 5; printf("%d", x);"#,
    [push(5), push(0), STORE, push(0), LOAD, PRINT_NUM]
);
case!(declare_only, "int x; int y;", []);
case!(
    print_text,
    r#"printf("hi\n");"#,
    ["010200", "3104", "3105", "210", "200"]
);
case!(print_empty, r#"printf("");"#, ["010200", "200"]);
case!(
    print_char,
    r#"int c = 65; printf("%c", c);"#,
    [push(65), push(0), STORE, push(0), LOAD, PRINT_CHAR]
);
case!(
    print_number_wins,
    r#"printf("%c %d", 7);"#,
    [push(7), PRINT_NUM]
);
case!(
    print_discards_value,
    r#"printf("ok", 7);"#,
    [push(7), POP, "010200", "3111", "3107", "200"]
);
case!(
    assign_value_then_address,
    "x = 1 + 2 * 3;",
    [push(1), push(2), push(3), MUL, ADD, push(0), STORE]
);
case!(
    left_associative,
    "x = 8 - 2 - 1;",
    [push(8), push(2), SUB, push(1), SUB, push(0), STORE]
);
case!(
    parenthesized,
    "x = (8 - 2) * 1;",
    [push(8), push(2), SUB, push(1), MUL, push(0), STORE]
);
case!(
    not_equal,
    "x = 1 != 2;",
    [push(1), push(2), EQ, push(0), EQ, push(0), STORE]
);
case!(
    comparisons,
    "a = 1 < 2; b = 1 > 2; c = 1 <= 2; d = 1 >= 2; e = 1 == 2;",
    [
        push(1), push(2), "803200", push(0), STORE,
        push(1), push(2), "802200", push(1), STORE,
        push(1), push(2), "805200", push(2), STORE,
        push(1), push(2), "804200", push(3), STORE,
        push(1), push(2), EQ, push(4), STORE,
    ]
);
case!(
    scan_number,
    r#"scanf("%d", &n);"#,
    ["101200", push(0), STORE]
);
case!(
    scan_char,
    r#"scanf("%c", &n);"#,
    ["100200", push(0), STORE]
);
case!(return_halts, "return 0;", [HALT]);
case!(
    main_wrapper,
    "#include <stdio.h>\nint main() {\n  int x = 1;\n  return 0;\n}\n",
    [push(1), push(0), STORE, HALT]
);
case!(bare_expression_statement, "x; ; }", []);
case!(invalid_characters_dropped, "int x = 5 @;", [push(5), push(0), STORE]);

// Offsets: 0 push 3, 13 push 0, 26 store, 32 loop, 51 jz, 68 body, 125 jump, 142 end
case!(
    while_loop,
    "int x = 3; while (x) { x = x - 1; }",
    [
        push(3), push(0), STORE,
        push(0), LOAD,
        jump("701", 142),
        push(0), LOAD, push(1), SUB, push(0), STORE,
        jump("700", 32),
    ]
);

// Offsets: 0 push 0, 13 load, 19 jz, 36 body, 68 jump, 85 end
case!(
    if_block,
    "if (x) { y = 2; }",
    [
        push(0), LOAD,
        jump("701", 85),
        push(2), push(1), STORE,
        jump("700", 85),
    ]
);

#[test]
fn while_structure() {
    let program = generate("while (x) { x = x - 1; }").unwrap();
    let labels: Vec<_> = program
        .insts
        .iter()
        .filter(|inst| matches!(inst, Instruction::LabelDef(_)))
        .collect();
    assert_eq!(
        labels,
        vec![
            &Instruction::LabelDef(Label(1)),
            &Instruction::LabelDef(Label(2))
        ]
    );
    let jumps: Vec<_> = program
        .insts
        .iter()
        .filter(|inst| matches!(inst, Instruction::Jump(..)))
        .collect();
    assert_eq!(
        jumps,
        vec![
            &Instruction::Jump(OpKind::Jz, Label(2)),
            &Instruction::Jump(OpKind::Jump, Label(1))
        ]
    );
    assert_eq!(program.insts.first(), Some(&Instruction::LabelDef(Label(1))));
    assert_eq!(program.insts.last(), Some(&Instruction::LabelDef(Label(2))));
}

#[test]
fn else_is_not_attached() {
    // `else` and its braces are skipped, the body runs unconditionally
    let program = generate("if (x) { } else { y = 1; }").unwrap();
    assert_eq!(program.symbols.get("y"), Some(1));
    assert_eq!(
        compile("if (x) { } else { y = 1; }").unwrap(),
        [
            push(0),
            LOAD.to_string(),
            jump("701", 53),
            jump("700", 53),
            push(1),
            push(1),
            STORE.to_string()
        ]
        .concat()
    );
}

#[test]
fn nested_labels_are_unique() {
    let program = generate("while (a) { if (b) { while (c) { } } }").unwrap();
    let mut defs: Vec<u32> = program
        .insts
        .iter()
        .filter_map(|inst| match inst {
            Instruction::LabelDef(Label(n)) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(defs.len(), 6);
    defs.sort();
    defs.dedup();
    assert_eq!(defs.len(), 6);
}

#[test]
fn symbol_addresses() {
    let program = generate("int a; int b; a = b; c = a; int a;").unwrap();
    assert_eq!(program.symbols.get("a"), Some(0));
    assert_eq!(program.symbols.get("b"), Some(1));
    assert_eq!(program.symbols.get("c"), Some(2));
    assert_eq!(program.symbols.len(), 3);
    assert_eq!(
        program.symbols.iter().collect::<Vec<_>>(),
        vec![("a", 0), ("b", 1), ("c", 2)]
    );
    assert_eq!(program.symbols.name(2), Some("c"));
}

// ----------------------------------------------------------------------------
// Failures
// ----------------------------------------------------------------------------

fn unexpected(code: &str) -> (&'static str, TokenKind) {
    match compile(code) {
        Err(Error::UnexpectedToken { expected, found }) => (expected, found.kind),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn missing_semicolon() {
    assert_eq!(unexpected("int x = 5"), ("`;`", TokenKind::Eof));
}

#[test]
fn unclosed_block() {
    assert_eq!(unexpected("while (x) { x = 1;"), ("`}`", TokenKind::Eof));
}

#[test]
fn unary_minus_is_not_an_expression() {
    assert_eq!(unexpected("x = -1;"), ("expression", TokenKind::Minus));
}

#[test]
fn printf_needs_a_format() {
    assert_eq!(
        unexpected("printf(x);"),
        ("string literal", TokenKind::Ident(format!("x")))
    );
}

#[test]
fn declaration_needs_a_name() {
    assert_eq!(unexpected("int 5;"), ("identifier", TokenKind::Number(format!("5"))));
}

#[test]
fn return_needs_a_number() {
    assert_eq!(unexpected("return x;"), ("number", TokenKind::Ident(format!("x"))));
}

#[test]
fn error_position() {
    match compile("int x = 1;\nx = 2\n") {
        Err(Error::UnexpectedToken { found, .. }) => {
            assert_eq!(found.kind, TokenKind::Eof);
            assert_eq!(found.line, 2);
        }
        other => panic!("{other:?}"),
    }
    match compile("int x = 1;\n  x = = 2;") {
        Err(Error::UnexpectedToken { found, .. }) => {
            assert_eq!((found.line, found.col), (1, 6));
        }
        other => panic!("{other:?}"),
    }
}

#[test]
fn integer_overflow() {
    assert!(matches!(
        compile("x = 99999999999999999999;"),
        Err(Error::IntegerOverflow(_))
    ));
}

#[test]
fn ambiguous_literal() {
    assert!(matches!(
        compile("x = 1200;"),
        Err(Error::Operand { .. })
    ));
    assert!(compile("x = 20;").is_ok());
}

#[test]
fn separator_in_number_field() {
    let err = compile("int x = 200;").unwrap_err();
    assert!(matches!(err, Error::Operand { .. }));
    assert!(
        err.to_string()
            .contains("a charless number field cannot contain the separator `200`"),
        "{err}"
    );

    // Address 200 belongs to the 201st variable.
    let source: String = (0..=200).map(|i| format!("int v{i} = 1;")).collect();
    assert!(matches!(compile(&source), Err(Error::Operand { .. })));
    let source: String = (0..200).map(|i| format!("int v{i} = 1;")).collect();
    assert!(compile(&source).is_ok());
}
