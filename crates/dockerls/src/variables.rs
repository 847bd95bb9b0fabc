//
// variables.rs
//
// Build-argument declarations and substitution references.
//
// Declarations accumulate in document order, partitioned by build stage:
// scope 0 holds `ARG`s declared before the first `FROM`, and each `FROM`
// opens a new stage ordinal. `ENV` declarations scope the same way but are
// only reachable through reference resolution, never through the `ARG`
// name-token self-lookup.
//

use std::ops::Range;

use crate::document_model::{LineKind, LogicalLine};
use crate::instruction::Argument;

/// An `ARG`/`ENV` declaration. `name_span` is a char range in the logical
/// text of line `line`; `value` is `None` for a bare `ARG name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub name: String,
    pub value: Option<String>,
    pub line: usize,
    pub name_span: Range<usize>,
    pub scope: u32,
}

/// A `$name` / `${name}` occurrence in instruction argument text. The span
/// covers the whole token, braces included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    pub name: String,
    pub span: Range<usize>,
}

/// All declarations of a document plus the stage ordinal of every logical
/// line, built in one left-to-right pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    decls: Vec<VariableDeclaration>,
    stages: Vec<u32>,
}

impl VariableTable {
    pub fn build(lines: &[LogicalLine]) -> Self {
        let mut decls = Vec::new();
        let mut stages = Vec::with_capacity(lines.len());
        let mut stage = 0u32;

        for (index, line) in lines.iter().enumerate() {
            if let LineKind::Instruction(instr) = &line.kind {
                if instr.recognized && instr.keyword == "FROM" {
                    stage += 1;
                }
                if instr.recognized && (instr.keyword == "ARG" || instr.keyword == "ENV") {
                    if let Some(arg) = &instr.argument {
                        if let Some(decl) = parse_declaration(arg, index, stage) {
                            decls.push(decl);
                        }
                    }
                }
            }
            stages.push(stage);
        }

        Self { decls, stages }
    }

    /// Stage ordinal of a logical line (0 before the first `FROM`).
    pub fn stage_of(&self, line: usize) -> u32 {
        self.stages.get(line).copied().unwrap_or(0)
    }

    /// Declaration on `line` whose name token contains logical `offset`,
    /// for the `ARG` self-lookup case. Token hit-testing is inclusive of the
    /// end position, matching LSP cursor-between-characters semantics.
    pub fn declaration_at(&self, line: usize, offset: usize) -> Option<&VariableDeclaration> {
        self.decls
            .iter()
            .find(|d| d.line == line && d.name_span.start <= offset && offset <= d.name_span.end)
    }

    /// Resolve a reference at (logical line, char offset) to the nearest
    /// preceding visible declaration: global, or the line's enclosing stage.
    pub fn resolve(&self, name: &str, line: usize, offset: usize) -> Option<&VariableDeclaration> {
        let stage = self.stage_of(line);
        self.decls
            .iter()
            .filter(|d| {
                d.name == name
                    && (d.scope == 0 || d.scope == stage)
                    && (d.line < line || (d.line == line && d.name_span.start < offset))
            })
            .last()
    }

    pub fn declarations(&self) -> &[VariableDeclaration] {
        &self.decls
    }
}

/// Parse `name[=value]` out of an `ARG`/`ENV` argument. Quoted values are
/// stripped one quote layer.
fn parse_declaration(arg: &Argument, line: usize, scope: u32) -> Option<VariableDeclaration> {
    let chars: Vec<char> = arg.text.chars().collect();
    let mut name_end = 0usize;
    while name_end < chars.len() && chars[name_end] != '=' && !chars[name_end].is_whitespace() {
        name_end += 1;
    }
    if name_end == 0 {
        return None;
    }

    let name: String = chars[..name_end].iter().collect();
    let value = if chars.get(name_end) == Some(&'=') {
        let raw: String = chars[name_end + 1..].iter().collect();
        Some(strip_quotes(&raw))
    } else {
        None
    };

    Some(VariableDeclaration {
        name,
        value,
        line,
        name_span: arg.span.start..arg.span.start + name_end,
        scope,
    })
}

fn strip_quotes(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() >= 2 {
        let (first, last) = (chars[0], chars[chars.len() - 1]);
        if (first == '\'' && last == '\'') || (first == '"' && last == '"') {
            return chars[1..chars.len() - 1].iter().collect();
        }
    }
    value.to_string()
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// All references in `text`; spans are offset by `base` so they line up with
/// logical-text positions when `text` is an argument slice.
pub fn references(text: &str, base: usize) -> Vec<VariableReference> {
    let chars: Vec<char> = text.chars().collect();
    let mut refs = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i] != '$' {
            i += 1;
            continue;
        }
        if chars.get(i + 1) == Some(&'{') {
            // Braces must close for this to count as a reference.
            match chars[i + 2..].iter().position(|c| *c == '}') {
                Some(rel) => {
                    let close = i + 2 + rel;
                    refs.push(VariableReference {
                        name: chars[i + 2..close].iter().collect(),
                        span: base + i..base + close + 1,
                    });
                    i = close + 1;
                }
                None => i += 1,
            }
        } else {
            let mut end = i + 1;
            while end < chars.len() && is_name_char(chars[end]) {
                end += 1;
            }
            if end > i + 1 {
                refs.push(VariableReference {
                    name: chars[i + 1..end].iter().collect(),
                    span: base + i..base + end,
                });
            }
            i = end.max(i + 1);
        }
    }

    refs
}

/// The reference whose span contains `offset` (end-inclusive), if any.
pub fn reference_at(text: &str, base: usize, offset: usize) -> Option<VariableReference> {
    references(text, base)
        .into_iter()
        .find(|r| r.span.start <= offset && offset <= r.span.end)
}
