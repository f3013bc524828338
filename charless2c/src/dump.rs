use crate::decoder::Program;
use charless_arch::OpKind;
use color_print::cformat;

/// Listing of a decoded program, one line per instruction. A non-empty
/// `only` keeps the instructions of those kinds.
pub fn dump(program: &Program, only: &[OpKind]) -> Vec<String> {
    let mut lines = vec![
        cformat!("<s>{:>6} | {:<3} | {}</>", "offset", "op", "instruction"),
        "-------+-----+---------------------------------------------".to_string(),
    ];
    for (addr, inst) in &program.insts {
        if !only.is_empty() && !only.contains(&inst.op()) {
            continue;
        }
        lines.push(cformat!(
            "<b>{:>6}</> | {} | {}",
            addr,
            inst.op().code(),
            inst.cformat()
        ));
    }
    lines.push(cformat!("<b>{:>6}</> | --- | <s>end</>", program.len));
    lines
}
