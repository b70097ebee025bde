use super::builder::OpReader;
use super::{Inst, Program};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

impl Display for Program {
    /// Render a numbered listing of the bytecode with branch and jump
    /// operands resolved to line numbers.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let code = self.code();

        // first pass maps instruction offsets to line numbers
        let mut line_of: HashMap<u32, usize> = HashMap::new();
        let mut r = OpReader::new(code);
        let mut lines = 0;
        while !r.done() {
            line_of.insert(r.idx, lines);
            lines += 1;
            skip_operands(&mut r);
        }

        let mut r = OpReader::new(code);
        let mut n = 0;
        while !r.done() {
            write!(f, "{:>4} ", n)?;
            n += 1;
            match r.inst() {
                Inst::Stop => writeln!(f, "  stop")?,
                Inst::Match => writeln!(f, " match '{}'", printable(r.rune()))?,
                Inst::MatchRange => {
                    let lo = r.rune();
                    let hi = r.rune();
                    writeln!(f, " match '{}'-'{}'", printable(lo), printable(hi))?
                }
                Inst::Branch => {
                    let target = r.u32();
                    writeln!(f, "branch {}", target_line(&line_of, target))?
                }
                Inst::Jump => {
                    let target = r.u32();
                    writeln!(f, "  jump {}", target_line(&line_of, target))?
                }
                Inst::Accept => writeln!(f, "accept")?,
                Inst::StartGroup => writeln!(f, "groupS {}", r.u32())?,
                Inst::CloseGroup => writeln!(f, "groupE")?,
                Inst::StartCounter => writeln!(f, "countS")?,
                Inst::IncCounter => writeln!(f, "countI")?,
                Inst::CloseCounter => writeln!(f, "countE")?,
                Inst::CkLtC => writeln!(f, "  c_lt {}", r.u32())?,
                Inst::CkGteC => writeln!(f, " c_gte {}", r.u32())?,
            }
        }
        Ok(())
    }
}

fn skip_operands(r: &mut OpReader) {
    match r.inst() {
        Inst::Match | Inst::Branch | Inst::Jump | Inst::StartGroup | Inst::CkLtC | Inst::CkGteC => {
            r.u32();
        }
        Inst::MatchRange => {
            r.u32();
            r.u32();
        }
        _ => {}
    }
}

fn target_line(line_of: &HashMap<u32, usize>, target: u32) -> String {
    match line_of.get(&target) {
        Some(line) => line.to_string(),
        // a target one past the last instruction is the implicit end
        None => "end".to_string(),
    }
}

fn printable(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        c if (c as u32) < 32 || c == char::MAX => format!("\\u{{{:x}}}", c as u32),
        c => c.to_string(),
    }
}
