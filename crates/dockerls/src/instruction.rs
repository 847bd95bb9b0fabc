//
// instruction.rs
//
// Splits a logical line's text into a keyword and argument text, and parses
// the nested instruction named by `ONBUILD`. Spans are char offsets into the
// logical text, so they compose directly with fragment position mapping.
//

use std::ops::Range;

use crate::keywords;

/// Argument text of an instruction: everything after the first whitespace
/// run following the keyword, trimmed of trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub text: String,
    pub span: Range<usize>,
}

/// A parsed instruction. Unrecognized leading tokens still produce a node
/// (position mapping stays total) but carry no documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Upper-cased form of the leading token.
    pub keyword: String,
    /// Whether the keyword is part of the instruction vocabulary.
    pub recognized: bool,
    pub keyword_span: Range<usize>,
    pub argument: Option<Argument>,
    /// Set only when the keyword is `ONBUILD` and the argument text starts
    /// with a parseable trigger instruction. One level deep.
    pub nested: Option<Box<Instruction>>,
}

fn is_ws(ch: char) -> bool {
    ch.is_whitespace()
}

/// Parse a logical line's text. Returns `None` for blank text.
pub fn parse(text: &str) -> Option<Instruction> {
    let chars: Vec<char> = text.chars().collect();
    parse_range(&chars, 0, chars.len(), true)
}

/// Parse `chars[start..end]`; spans in the result are absolute offsets into
/// `chars`. `allow_nested` is cleared for the `ONBUILD` trigger so nesting
/// stops at one level.
fn parse_range(
    chars: &[char],
    start: usize,
    end: usize,
    allow_nested: bool,
) -> Option<Instruction> {
    let mut kw_start = start;
    while kw_start < end && is_ws(chars[kw_start]) {
        kw_start += 1;
    }
    if kw_start == end {
        return None;
    }

    let mut kw_end = kw_start;
    while kw_end < end && !is_ws(chars[kw_end]) {
        kw_end += 1;
    }

    let token: String = chars[kw_start..kw_end].iter().collect();
    let canonical = keywords::canonical(&token);
    let keyword = canonical
        .map(str::to_string)
        .unwrap_or_else(|| token.to_uppercase());
    let recognized = canonical.is_some();

    let mut arg_start = kw_end;
    while arg_start < end && is_ws(chars[arg_start]) {
        arg_start += 1;
    }
    let mut arg_end = end;
    while arg_end > arg_start && is_ws(chars[arg_end - 1]) {
        arg_end -= 1;
    }

    let argument = if arg_start < arg_end {
        Some(Argument {
            text: chars[arg_start..arg_end].iter().collect(),
            span: arg_start..arg_end,
        })
    } else {
        None
    };

    let nested = if allow_nested && keyword == "ONBUILD" {
        argument
            .as_ref()
            .and_then(|arg| parse_range(chars, arg.span.start, arg.span.end, false))
            .map(Box::new)
    } else {
        None
    };

    Some(Instruction {
        keyword,
        recognized,
        keyword_span: kw_start..kw_end,
        argument,
        nested,
    })
}
