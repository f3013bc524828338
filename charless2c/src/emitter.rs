use crate::config::Config;
use crate::decoder::Program;
use charless_arch::Inst;
use tracing::warn;

const PREAMBLE: &str = "\
#include <stdio.h>
#include <stdlib.h>
#include <string.h>

#define STACK_SIZE {stack_size}
#define MEMORY_SIZE {memory_size}

long stack[STACK_SIZE];
int sp = -1;
long memory[MEMORY_SIZE];

void push(long value) {
    if (sp >= STACK_SIZE - 1) { fprintf(stderr, \"Stack overflow\\n\"); exit(1); }
    stack[++sp] = value;
}

long pop() {
    if (sp < 0) { fprintf(stderr, \"Stack underflow\\n\"); exit(1); }
    return stack[sp--];
}

int main() {
    memset(memory, 0, sizeof(memory));
";

/// Render a decoded program as a single C function with one label per
/// instruction offset and a final label at the end offset.
pub fn emit(program: &Program, config: &Config) -> String {
    for (addr, target) in program.dangling() {
        warn!(addr, target, "goto to a missing label, the C output will not compile");
    }
    let mut lines = vec![PREAMBLE
        .replace("{stack_size}", &config.stack_size.to_string())
        .replace("{memory_size}", &config.memory_size.to_string())];
    for (addr, inst) in &program.insts {
        lines.push(format!("    Label_{addr}: ;"));
        lines.push(format!("    {}", statement(inst)));
    }
    lines.push(format!("    Label_{}: ;", program.len));
    lines.push("}\n".to_string());
    lines.join("\n")
}

fn binary(expr: &str) -> String {
    format!("{{ long b = pop(); long a = pop(); push({expr}); }}")
}

fn checked(op: char) -> String {
    format!(
        "{{ long b = pop(); long a = pop(); if (b!=0) push(a {op} b); else {{ fprintf(stderr, \"Div by zero\\n\"); exit(1); }} }}"
    )
}

/// C statement for one instruction.
pub fn statement(inst: &Inst) -> String {
    match inst {
        Inst::Halt => "return 0;".to_string(),
        Inst::PrintStr(text) => format!("printf(\"{}\");", escape(text)),
        Inst::PrintNum => "printf(\"%ld\", pop());".to_string(),
        Inst::PrintChar => "printf(\"%c\", (char)pop());".to_string(),
        Inst::InputChar => "push(getchar());".to_string(),
        Inst::InputNum => "{ long val = 0; scanf(\"%ld\", &val); push(val); }".to_string(),
        Inst::PrintNewline => "printf(\"\\n\");".to_string(),

        Inst::Push(val) => format!("push({val});"),
        Inst::Pop => "pop();".to_string(),
        Inst::Store => "{ long addr = pop(); long val = pop(); if(addr >= 0 && addr < MEMORY_SIZE) memory[addr] = val; }".to_string(),
        Inst::Load => "{ long addr = pop(); if(addr >= 0 && addr < MEMORY_SIZE) push(memory[addr]); else push(0); }".to_string(),

        Inst::Add => binary("a + b"),
        Inst::Sub => binary("a - b"),
        Inst::Mul => binary("a * b"),
        Inst::Div => checked('/'),
        Inst::Mod => checked('%'),

        Inst::Jump(target) => format!("goto Label_{target};"),
        Inst::Jz(target) => format!("if (pop() == 0) goto Label_{target};"),
        Inst::Jnz(target) => format!("if (pop() != 0) goto Label_{target};"),

        Inst::Eq => binary("a == b ? 1 : 0"),
        Inst::Gt => binary("a > b ? 1 : 0"),
        Inst::Lt => binary("a < b ? 1 : 0"),
        Inst::Gte => binary("a >= b ? 1 : 0"),
        Inst::Lte => binary("a <= b ? 1 : 0"),
    }
}

/// Escape text for a C string literal used as a printf format.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '%' => out.push_str("%%"),
            ch if (ch as u32) < 0x20 || ch == '\x7f' => {
                out.push_str(&format!("\\{:03o}", ch as u32))
            }
            ch => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes() {
        assert_eq!(escape("hi\n"), "hi\\n");
        assert_eq!(escape("a\"b\\c"), "a\\\"b\\\\c");
        assert_eq!(escape("100%"), "100%%");
        assert_eq!(escape("\x01\t\r"), "\\001\\t\\r");
        assert_eq!(escape("é"), "é");
    }

    #[test]
    fn statements() {
        assert_eq!(statement(&Inst::Push(5)), "push(5);");
        assert_eq!(statement(&Inst::Jz(34)), "if (pop() == 0) goto Label_34;");
        assert_eq!(
            statement(&Inst::Sub),
            "{ long b = pop(); long a = pop(); push(a - b); }"
        );
        assert_eq!(
            statement(&Inst::PrintStr("50%\n".into())),
            "printf(\"50%%\\n\");"
        );
    }
}
