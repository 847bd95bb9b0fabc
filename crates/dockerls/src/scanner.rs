//
// scanner.rs
//
// Splits raw document text into physical lines with absolute byte offsets
// and line-ending classification. All three terminator conventions found in
// Dockerfiles (LF, lone CR, CRLF) are recognized.
//

/// How a physical line is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Cr,
    CrLf,
    /// Final line of the document, no terminator.
    Eof,
}

/// A physical line of the document. `start..end` are byte offsets into the
/// source and exclude the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalLine {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub ending: LineEnding,
}

impl PhysicalLine {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Scan `source` into physical lines. Always returns at least one line, so
/// position lookups on an empty document degrade gracefully rather than
/// indexing into an empty list.
pub fn scan(source: &str) -> Vec<PhysicalLine> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(PhysicalLine {
                    index: lines.len(),
                    start,
                    end: i,
                    ending: LineEnding::Lf,
                });
                i += 1;
                start = i;
            }
            b'\r' => {
                let ending = if bytes.get(i + 1) == Some(&b'\n') {
                    i += 2;
                    LineEnding::CrLf
                } else {
                    i += 1;
                    LineEnding::Cr
                };
                lines.push(PhysicalLine {
                    index: lines.len(),
                    start,
                    end: if ending == LineEnding::CrLf { i - 2 } else { i - 1 },
                    ending,
                });
                start = i;
            }
            _ => i += 1,
        }
    }

    lines.push(PhysicalLine {
        index: lines.len(),
        start,
        end: bytes.len(),
        ending: LineEnding::Eof,
    });

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let lines = scan("");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start, 0);
        assert_eq!(lines[0].end, 0);
        assert_eq!(lines[0].ending, LineEnding::Eof);
    }

    #[test]
    fn test_single_line_no_terminator() {
        let lines = scan("FROM node");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text("FROM node"), "FROM node");
        assert_eq!(lines[0].ending, LineEnding::Eof);
    }

    #[test]
    fn test_lf() {
        let src = "FROM node\nEXPOSE 8081";
        let lines = scan(src);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(src), "FROM node");
        assert_eq!(lines[0].ending, LineEnding::Lf);
        assert_eq!(lines[1].text(src), "EXPOSE 8081");
        assert_eq!(lines[1].start, 10);
    }

    #[test]
    fn test_cr() {
        let src = "FROM node\rEXPOSE 8081";
        let lines = scan(src);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].ending, LineEnding::Cr);
        assert_eq!(lines[1].text(src), "EXPOSE 8081");
    }

    #[test]
    fn test_crlf() {
        let src = "FROM node\r\nEXPOSE 8081";
        let lines = scan(src);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].ending, LineEnding::CrLf);
        assert_eq!(lines[0].end, 9);
        assert_eq!(lines[1].start, 11);
    }

    #[test]
    fn test_trailing_terminator_yields_empty_final_line() {
        let lines = scan("FROM node\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, 10);
        assert_eq!(lines[1].end, 10);
        assert_eq!(lines[1].ending, LineEnding::Eof);
    }

    #[test]
    fn test_mixed_endings() {
        let src = "a\nb\rc\r\nd";
        let lines = scan(src);
        let endings: Vec<_> = lines.iter().map(|l| l.ending).collect();
        assert_eq!(
            endings,
            vec![
                LineEnding::Lf,
                LineEnding::Cr,
                LineEnding::CrLf,
                LineEnding::Eof
            ]
        );
        let texts: Vec<_> = lines.iter().map(|l| l.text(src)).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_blank_lines_between_content() {
        let src = "\r\n\r\nRUN ls";
        let lines = scan(src);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text(src), "");
        assert_eq!(lines[1].text(src), "");
        assert_eq!(lines[2].text(src), "RUN ls");
    }
}
