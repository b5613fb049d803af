//! DSC comment scanner.
//!
//! The scanner reads a PostScript document line by line and classifies each
//! line as plain content, an `%%IncludeResource` directive, or one of the
//! structuring comments the inliner cares about. Recognition is purely
//! syntactic: anything that does not parse cleanly is plain content.
//!
//! # Example
//!
//! ```
//! use psincluderes::scanner::{CommentScanner, ScannedLine};
//!
//! let input: &[u8] = b"%!PS\n%%IncludeResource: font Helvetica\nshowpage\n";
//! let lines: Vec<_> = CommentScanner::new(input)
//!     .collect::<psincluderes::Result<_>>()
//!     .unwrap();
//!
//! assert!(matches!(lines[1], ScannedLine::IncludeResource { .. }));
//! assert_eq!(lines[2], ScannedLine::Passthrough(b"showpage\n".to_vec()));
//! ```

use regex::bytes::Regex;
use std::io::BufRead;

use crate::error::{Error, Result};
use crate::model::{ResourceReference, ResourceType};

/// Structuring comments recognised by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// `%%BeginProlog`
    BeginProlog,
    /// `%%EndProlog`
    EndProlog,
    /// `%%BeginSetup`
    BeginSetup,
    /// `%%EndSetup`
    EndSetup,
    /// `%%BeginResource:` or a legacy `%%BeginFont:`, `%%BeginProcSet:`,
    /// `%%BeginFile:`. Holds the reference when the arguments parse.
    BeginResource(Option<ResourceReference>),
    /// `%%EndResource` or a legacy `%%EndFont`, `%%EndProcSet`, `%%EndFile`
    EndResource,
    /// `%%BeginDocument:`
    BeginDocument,
    /// `%%EndDocument`
    EndDocument,
    /// `%%Page:`
    Page,
    /// `%%Trailer`
    Trailer,
    /// `%%EOF`
    Eof,
    /// `%%DocumentNeededResources:`
    DocumentNeededResources,
    /// `%%+` continuation of the previous comment
    Continuation,
}

/// A classified input line. Every variant keeps the raw bytes of the line,
/// terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedLine {
    /// Content copied through untouched.
    Passthrough(Vec<u8>),
    /// A well-formed `%%IncludeResource:` directive.
    IncludeResource {
        /// Parsed resource reference
        reference: ResourceReference,
        /// Original line
        raw: Vec<u8>,
    },
    /// A recognised structuring comment.
    Marker {
        /// Which comment
        kind: MarkerKind,
        /// Original line
        raw: Vec<u8>,
    },
}

impl ScannedLine {
    /// Take the raw bytes of the line.
    pub fn into_raw(self) -> Vec<u8> {
        match self {
            ScannedLine::Passthrough(raw) => raw,
            ScannedLine::IncludeResource { raw, .. } => raw,
            ScannedLine::Marker { raw, .. } => raw,
        }
    }
}

/// Lazy, single-pass classifier over a buffered reader.
///
/// Yields one `Result<ScannedLine>` per input line. After a read error the
/// scanner is exhausted.
pub struct CommentScanner<R> {
    reader: R,
    keyword_regex: Regex,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> CommentScanner<R> {
    /// Create a scanner over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            // constant pattern
            keyword_regex: Regex::new(r"^%%(\+|[A-Za-z]+:?)").unwrap(),
            line_number: 0,
            finished: false,
        }
    }

    /// 1-based number of the last line produced (0 before the first).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Classify a single line.
    pub fn classify(&self, line: Vec<u8>) -> ScannedLine {
        let (keyword, args_start) = match self.keyword_regex.captures(&line) {
            Some(caps) => match caps.get(1) {
                Some(m) => (m.as_bytes().to_vec(), m.end()),
                None => return ScannedLine::Passthrough(line),
            },
            None => return ScannedLine::Passthrough(line),
        };
        let args = std::str::from_utf8(&line[args_start..]).ok();

        let kind = match keyword.as_slice() {
            b"IncludeResource:" => {
                return match args.and_then(ResourceReference::parse) {
                    Some(reference) => ScannedLine::IncludeResource {
                        reference,
                        raw: line,
                    },
                    None => ScannedLine::Passthrough(line),
                };
            }
            b"BeginResource:" => MarkerKind::BeginResource(args.and_then(ResourceReference::parse)),
            b"BeginFont:" => MarkerKind::BeginResource(
                args.and_then(|a| ResourceReference::parse_typed(ResourceType::Font, a)),
            ),
            b"BeginProcSet:" => MarkerKind::BeginResource(
                args.and_then(|a| ResourceReference::parse_typed(ResourceType::ProcSet, a)),
            ),
            b"BeginFile:" => MarkerKind::BeginResource(
                args.and_then(|a| ResourceReference::parse_typed(ResourceType::File, a)),
            ),
            b"EndResource" | b"EndFont" | b"EndProcSet" | b"EndFile" => MarkerKind::EndResource,
            b"BeginProlog" => MarkerKind::BeginProlog,
            b"EndProlog" => MarkerKind::EndProlog,
            b"BeginSetup" => MarkerKind::BeginSetup,
            b"EndSetup" => MarkerKind::EndSetup,
            b"BeginDocument:" => MarkerKind::BeginDocument,
            b"EndDocument" => MarkerKind::EndDocument,
            b"Page:" => MarkerKind::Page,
            b"Trailer" => MarkerKind::Trailer,
            b"EOF" => MarkerKind::Eof,
            b"DocumentNeededResources:" => MarkerKind::DocumentNeededResources,
            b"+" => MarkerKind::Continuation,
            _ => return ScannedLine::Passthrough(line),
        };

        ScannedLine::Marker { kind, raw: line }
    }
}

impl<R: BufRead> Iterator for CommentScanner<R> {
    type Item = Result<ScannedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                Some(Ok(self.classify(line)))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(Error::InputRead(e)))
            }
        }
    }
}

/// Parse the resource list carried by a `%%DocumentNeededResources:` line or
/// one of its `%%+` continuations.
///
/// Each line names one or more resources; a type keyword starts a new
/// reference and the following tokens are names of that type. Tokens before
/// the first type keyword, and `(atend)`, are ignored.
pub fn parse_resource_list(line: &[u8]) -> Vec<ResourceReference> {
    let text = String::from_utf8_lossy(line);
    let args = match text.strip_prefix("%%+") {
        Some(rest) => rest,
        None => text.split_once(':').map(|(_, rest)| rest).unwrap_or(""),
    };

    let mut references: Vec<ResourceReference> = Vec::new();
    let mut current: Option<ResourceType> = None;
    for token in args.split_whitespace() {
        if let Some(resource_type) = ResourceType::from_keyword(token) {
            current = Some(resource_type);
            continue;
        }
        let Some(resource_type) = current else {
            continue;
        };
        if token == "(atend)" {
            continue;
        }

        // procset names are followed by a version and a revision
        let is_number = token.starts_with(|c: char| c.is_ascii_digit() || c == '.');
        match references.last_mut() {
            Some(last)
                if is_number
                    && resource_type == ResourceType::ProcSet
                    && last.resource_type == ResourceType::ProcSet
                    && last.revision.is_none() =>
            {
                if last.version.is_none() {
                    last.version = Some(token.to_string());
                } else {
                    last.revision = Some(token.to_string());
                }
            }
            _ => references.push(ResourceReference::new(resource_type, token)),
        }
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, BufReader, Read};

    fn classify(line: &[u8]) -> ScannedLine {
        CommentScanner::new(&b""[..]).classify(line.to_vec())
    }

    #[test]
    fn test_include_resource_directive() {
        let line = classify(b"%%IncludeResource: procset MyProcs 1.0\n");
        match line {
            ScannedLine::IncludeResource { reference, raw } => {
                assert_eq!(reference.to_string(), "procset MyProcs 1.0");
                assert_eq!(raw, b"%%IncludeResource: procset MyProcs 1.0\n");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_directive_is_passthrough() {
        for line in [
            &b"%%IncludeResource:\n"[..],
            b"%%IncludeResource: widget Foo\n",
            b"%%IncludeResource: font\n",
            b"%%IncludeResource: font \xff\xfe\n",
            b"%%IncludeResourceX: font Foo\n",
        ] {
            assert_eq!(classify(line), ScannedLine::Passthrough(line.to_vec()));
        }
    }

    #[test]
    fn test_directive_must_start_the_line() {
        let line = b" %%IncludeResource: font Helvetica\n";
        assert_eq!(classify(line), ScannedLine::Passthrough(line.to_vec()));
    }

    #[test]
    fn test_markers() {
        let cases: Vec<(&[u8], MarkerKind)> = vec![
            (&b"%%BeginProlog\n"[..], MarkerKind::BeginProlog),
            (&b"%%EndProlog\r\n"[..], MarkerKind::EndProlog),
            (&b"%%EndSetup\n"[..], MarkerKind::EndSetup),
            (&b"%%EndResource\n"[..], MarkerKind::EndResource),
            (&b"%%EndProcSet\n"[..], MarkerKind::EndResource),
            (&b"%%BeginDocument: inner.eps\n"[..], MarkerKind::BeginDocument),
            (&b"%%Page: 1 1\n"[..], MarkerKind::Page),
            (&b"%%Trailer\n"[..], MarkerKind::Trailer),
            (&b"%%EOF"[..], MarkerKind::Eof),
            (
                b"%%DocumentNeededResources: font Helvetica\n",
                MarkerKind::DocumentNeededResources,
            ),
            (&b"%%+ font Courier\n"[..], MarkerKind::Continuation),
        ];
        for (line, kind) in cases {
            assert_eq!(
                classify(line),
                ScannedLine::Marker {
                    kind,
                    raw: line.to_vec()
                }
            );
        }
    }

    #[test]
    fn test_begin_resource_variants() {
        fn expect(line: &[u8], reference: Option<ResourceReference>) {
            assert_eq!(
                classify(line),
                ScannedLine::Marker {
                    kind: MarkerKind::BeginResource(reference),
                    raw: line.to_vec()
                }
            );
        }

        expect(
            b"%%BeginResource: font Helvetica\n",
            Some(ResourceReference::new(ResourceType::Font, "Helvetica")),
        );
        expect(
            b"%%BeginProcSet: Util 1 0\n",
            Some(
                ResourceReference::new(ResourceType::ProcSet, "Util")
                    .with_version("1")
                    .with_revision("0"),
            ),
        );
        expect(
            b"%%BeginFont: Courier\n",
            Some(ResourceReference::new(ResourceType::Font, "Courier")),
        );
        expect(b"%%BeginResource: gadget X\n", None);
    }

    #[test]
    fn test_unknown_comments_pass_through() {
        for line in [&b"%%Title: test\n"[..], b"%!PS-Adobe-3.0\n", b"% plain\n"] {
            assert_eq!(classify(line), ScannedLine::Passthrough(line.to_vec()));
        }
    }

    #[test]
    fn test_iterator_keeps_terminators() {
        let input: &[u8] = b"a\r\nb\n\nlast";
        let mut scanner = CommentScanner::new(input);
        let raws: Vec<Vec<u8>> = scanner
            .by_ref()
            .map(|line| line.unwrap().into_raw())
            .collect();
        assert_eq!(raws, vec![b"a\r\n".to_vec(), b"b\n".to_vec(), b"\n".to_vec(), b"last".to_vec()]);
        assert_eq!(scanner.line_number(), 4);
        assert!(scanner.next().is_none());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_read_error_ends_scan() {
        let mut scanner = CommentScanner::new(BufReader::new(FailingReader));
        assert!(matches!(scanner.next(), Some(Err(Error::InputRead(_)))));
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_parse_resource_list() {
        let refs = parse_resource_list(b"%%DocumentNeededResources: font Helvetica Courier\n");
        assert_eq!(
            refs,
            vec![
                ResourceReference::new(ResourceType::Font, "Helvetica"),
                ResourceReference::new(ResourceType::Font, "Courier"),
            ]
        );

        let refs = parse_resource_list(b"%%+ procset Util 1.0 0 font Symbol\n");
        assert_eq!(
            refs,
            vec![
                ResourceReference::new(ResourceType::ProcSet, "Util")
                    .with_version("1.0")
                    .with_revision("0"),
                ResourceReference::new(ResourceType::Font, "Symbol"),
            ]
        );

        assert!(parse_resource_list(b"%%DocumentNeededResources: (atend)\n").is_empty());
    }
}
