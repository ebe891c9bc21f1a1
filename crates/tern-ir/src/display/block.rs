//! Block and function rendering.

use std::fmt::{self, Write};

use crate::{Block, BlockExit, Function, Rir, ValueId};

const INDENT: &str = "    ";

impl Function {
    fn operand_str(&self, value: ValueId) -> &str {
        self.value(value).map_or("?", |v| v.id())
    }

    /// `fndef name($0:u32) -> u64` for definitions, `fndecl name(u32) -> u64`
    /// for plain declarations.
    fn signature(&self, rir: &Rir) -> String {
        let args: Vec<String> = if self.is_plain_declaration() {
            self.argument_types().iter().map(|ty| rir.type_str(*ty)).collect()
        } else {
            self.argument_types()
                .iter()
                .enumerate()
                .map(|(position, ty)| {
                    let id = self
                        .argument_value(position)
                        .map_or("?", |value| self.operand_str(value));
                    format!("{id}:{}", rir.type_str(*ty))
                })
                .collect()
        };
        format!(
            "{} {}({}) -> {}",
            if self.is_plain_declaration() { "fndecl" } else { "fndef" },
            self.name(),
            args.join(", "),
            rir.type_str(self.return_type())
        )
    }

    fn write_block(&self, out: &mut String, block: &Block, rir: &Rir) -> fmt::Result {
        writeln!(out, "{}:", self.operand_str(block.label()))?;
        for expr in self.block_expressions(block) {
            writeln!(out, "{INDENT}{}", self.expression_string(expr, rir))?;
        }
        match block.exit() {
            Some(BlockExit::Branch { dst }) => {
                writeln!(out, "{INDENT}branch({})", self.operand_str(dst))
            }
            Some(BlockExit::CondBranch {
                cond,
                taken,
                fallthrough,
            }) => writeln!(
                out,
                "{INDENT}condbranch({}, {}, {})",
                self.operand_str(cond),
                self.operand_str(taken),
                self.operand_str(fallthrough)
            ),
            Some(BlockExit::Return(expr)) => match self.expression(expr) {
                Some(ret) => writeln!(out, "{INDENT}{}", self.expression_string(ret, rir)),
                None => writeln!(out, "{INDENT}return(?)"),
            },
            Some(BlockExit::Unreachable) => writeln!(out, "{INDENT}unreachable()"),
            None => Ok(()),
        }
    }
}

impl Rir {
    /// Renders a function with its blocks in layout order.
    #[must_use]
    pub fn function_to_string(&self, func: &Function) -> String {
        let mut out = func.signature(self);
        out.push('\n');
        if func.is_plain_declaration() {
            return out;
        }
        out.push_str("{\n");
        for block in func.blocks() {
            // writing into a String cannot fail
            let _ = func.write_block(&mut out, block, self);
        }
        out.push_str("}\n");
        out
    }
}
