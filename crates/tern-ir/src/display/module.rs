//! Unit rendering.

use std::fmt;

use crate::{Global, Rir, TypeDef};

impl Rir {
    /// `$name = typedef(a:i32, b:string)` or `$name = uniondef(...)`.
    ///
    /// Unnamed members render as their bare type.
    #[must_use]
    pub fn typedef_line(&self, typedef: &TypeDef) -> String {
        let members: Vec<String> = typedef
            .members
            .iter()
            .map(|member| match &member.name {
                Some(name) => format!("{name}:{}", self.type_str(member.ty)),
                None => self.type_str(member.ty),
            })
            .collect();
        format!(
            "${} = {}({})",
            typedef.name,
            if typedef.is_union { "uniondef" } else { "typedef" },
            members.join(", ")
        )
    }

    /// `global(name, string, "content")`, with the content escaped
    #[must_use]
    pub fn global_line(&self, global: &Global) -> String {
        format!(
            "global({}, {}, {:?})",
            global.name,
            self.type_str(global.ty),
            &*global.content
        )
    }
}

impl fmt::Display for Rir {
    /// Typedefs, then global literals, then functions in declaration order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separate = false;
        for typedef in self.typedefs() {
            writeln!(f, "{}", self.typedef_line(typedef))?;
            separate = true;
        }
        for global in self.global_literals() {
            writeln!(f, "{}", self.global_line(global))?;
            separate = true;
        }
        for func in self.functions() {
            if separate {
                writeln!(f)?;
            }
            f.write_str(&self.function_to_string(func))?;
            separate = true;
        }
        Ok(())
    }
}
