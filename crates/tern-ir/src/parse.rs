//! Reading rendered typedef lines back.

use thiserror::Error;

/// Errors from [`parse_typedef_line`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTypeDefError {
    #[error("expected '$<name> = ...', got '{0}'")]
    MissingName(String),

    #[error("unknown definition kind '{0}', expected 'typedef' or 'uniondef'")]
    UnknownKind(String),

    #[error("unbalanced parentheses in '{0}'")]
    Unbalanced(String),

    #[error("empty member in '{0}'")]
    EmptyMember(String),
}

/// A typedef line split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTypeDef {
    pub name: String,
    pub is_union: bool,
    /// Members in order as `(name, type)`, types in their rendered form
    pub members: Vec<(Option<String>, String)>,
}

/// Parses a line such as `$pair = typedef(a:i32, b:$other*)`.
pub fn parse_typedef_line(line: &str) -> Result<ParsedTypeDef, ParseTypeDefError> {
    let line = line.trim();
    let (name, definition) = line
        .strip_prefix('$')
        .and_then(|rest| rest.split_once(" = "))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| ParseTypeDefError::MissingName(line.to_string()))?;

    let (kind, rest) = definition
        .split_once('(')
        .ok_or_else(|| ParseTypeDefError::Unbalanced(line.to_string()))?;
    let is_union = match kind {
        "typedef" => false,
        "uniondef" => true,
        other => return Err(ParseTypeDefError::UnknownKind(other.to_string())),
    };
    let body = rest
        .strip_suffix(')')
        .filter(|body| !body.contains(['(', ')']))
        .ok_or_else(|| ParseTypeDefError::Unbalanced(line.to_string()))?;

    let mut members = Vec::new();
    if !body.trim().is_empty() {
        for member in body.split(',').map(str::trim) {
            let parsed = match member.split_once(':') {
                Some((name, ty)) => (Some(name.to_string()), ty.to_string()),
                None => (None, member.to_string()),
            };
            if parsed.1.is_empty() || parsed.0.as_deref() == Some("") {
                return Err(ParseTypeDefError::EmptyMember(line.to_string()));
            }
            members.push(parsed);
        }
    }

    Ok(ParsedTypeDef {
        name: name.to_string(),
        is_union,
        members,
    })
}
