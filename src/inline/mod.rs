//! The inliner: replaces `%%IncludeResource` directives with resource bodies.
//!
//! The inliner drives a [`CommentScanner`] over the input and copies every
//! line to the output in order. A directive whose resource has not been seen
//! yet in this run is replaced by the resource body between
//! `%%BeginResource:` and `%%EndResource` markers; later directives for the
//! same type and name produce no output. Bodies are scanned the same way, so
//! directives inside an inlined resource are expanded too.
//!
//! `%%DocumentNeededResources` is never rewritten, even though inlining makes
//! the resources it lists supplied rather than needed.
//!
//! # Example
//!
//! ```no_run
//! use psincluderes::{Inliner, InlineOptions, SearchPath};
//! use std::io::{self, BufReader};
//!
//! fn main() -> psincluderes::Result<()> {
//!     let inliner = Inliner::with_options(
//!         SearchPath::new().with_dir("resources"),
//!         InlineOptions::new().strict(),
//!     );
//!     let report = inliner.run(BufReader::new(io::stdin()), io::stdout())?;
//!     eprintln!("inlined {} resources", report.inlined.len());
//!     Ok(())
//! }
//! ```

mod options;
mod report;

pub use options::{InlineOptions, MissingResource};
pub use report::InlineReport;

use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::locator::ResourceLocator;
use crate::model::{ResourceRecord, ResourceReference};
use crate::scanner::{parse_resource_list, CommentScanner, MarkerKind, ScannedLine};

/// Comments that already delimit a resource body.
const BEGIN_MARKERS: [&[u8]; 4] = [
    b"%%BeginResource:",
    b"%%BeginFont:",
    b"%%BeginProcSet:",
    b"%%BeginFile:",
];

/// Resource inliner over a [`ResourceLocator`].
pub struct Inliner<L> {
    locator: L,
    options: InlineOptions,
}

/// Per-run state. Dropped when the run ends.
#[derive(Default)]
struct RunState {
    record: ResourceRecord,
    // One frame per open %%BeginDocument; resources inlined inside an
    // embedded document go to its frame and are forgotten at %%EndDocument.
    documents: Vec<ResourceRecord>,
    in_needed_resources: bool,
    report: InlineReport,
}

impl RunState {
    fn is_present(&self, reference: &ResourceReference) -> bool {
        self.record.contains(reference)
            || self.documents.iter().any(|frame| frame.contains(reference))
    }

    fn current_record(&mut self) -> &mut ResourceRecord {
        self.documents.last_mut().unwrap_or(&mut self.record)
    }
}

impl<L: ResourceLocator> Inliner<L> {
    /// Create an inliner with default options.
    pub fn new(locator: L) -> Self {
        Self::with_options(locator, InlineOptions::default())
    }

    /// Create an inliner with custom options.
    pub fn with_options(locator: L, options: InlineOptions) -> Self {
        Self { locator, options }
    }

    /// Filter `input` into `output`.
    ///
    /// Each run starts with an empty record of inlined resources. Output is
    /// flushed before returning. On error, whatever was already written
    /// stays written.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<InlineReport> {
        let mut state = RunState::default();
        let mut scanner = CommentScanner::new(input);

        for line in scanner.by_ref() {
            self.process(line?, &mut state, &mut output)?;
        }

        output.flush().map_err(Error::OutputWrite)?;

        let mut report = state.report;
        report.lines = scanner.line_number();
        log::debug!(
            "{} lines, {} inlined, {} duplicates dropped, {} missing",
            report.lines,
            report.inlined.len(),
            report.duplicates,
            report.missing.len()
        );
        Ok(report)
    }

    /// Filter an in-memory document.
    pub fn run_bytes(&self, input: &[u8]) -> Result<(Vec<u8>, InlineReport)> {
        let mut output = Vec::with_capacity(input.len());
        let report = self.run(input, &mut output)?;
        Ok((output, report))
    }

    /// Handle one line of the input or of an inlined body.
    fn process<W: Write>(
        &self,
        line: ScannedLine,
        state: &mut RunState,
        output: &mut W,
    ) -> Result<()> {
        match line {
            ScannedLine::IncludeResource { reference, raw } => {
                state.in_needed_resources = false;
                self.include(&reference, &raw, state, output)
            }
            ScannedLine::Marker { kind, raw } => {
                self.observe(&kind, &raw, state);
                write_all(output, &raw)
            }
            ScannedLine::Passthrough(raw) => {
                state.in_needed_resources = false;
                write_all(output, &raw)
            }
        }
    }

    /// Track structure that affects later directives.
    fn observe(&self, kind: &MarkerKind, raw: &[u8], state: &mut RunState) {
        let continues_needed = state.in_needed_resources;
        state.in_needed_resources = false;

        match kind {
            MarkerKind::BeginDocument => state.documents.push(ResourceRecord::new()),
            MarkerKind::EndDocument => {
                state.documents.pop();
            }
            MarkerKind::BeginResource(Some(reference))
                if self.options.record_embedded && state.documents.is_empty() =>
            {
                if state.record.insert(reference) {
                    log::debug!("{} already embedded", reference);
                    state.report.embedded.push(reference.clone());
                }
            }
            MarkerKind::DocumentNeededResources => {
                state.report.needed.extend(parse_resource_list(raw));
                state.in_needed_resources = true;
            }
            MarkerKind::Continuation if continues_needed => {
                state.report.needed.extend(parse_resource_list(raw));
                state.in_needed_resources = true;
            }
            _ => {}
        }
    }

    fn include<W: Write>(
        &self,
        reference: &ResourceReference,
        raw: &[u8],
        state: &mut RunState,
        output: &mut W,
    ) -> Result<()> {
        if state.is_present(reference) {
            log::debug!("dropping repeated {}", reference);
            state.report.duplicates += 1;
            return Ok(());
        }

        match self.locator.load(reference) {
            Ok(body) => {
                log::debug!("inlining {} ({} bytes)", reference, body.len());
                // Recorded before the body is expanded, so a body that
                // includes itself (directly or through others) stops here.
                state.current_record().insert(reference);
                state.report.inlined.push(reference.clone());
                self.expand(reference, &body, line_terminator(raw), state, output)
            }
            Err(e) if e.is_recoverable() => match self.options.missing {
                MissingResource::Fail => Err(e),
                MissingResource::Passthrough => {
                    log::warn!("{}", e);
                    state.report.missing.push(reference.clone());
                    write_all(output, raw)
                }
            },
            Err(e) => Err(e),
        }
    }

    /// Write a resource body, adding `%%BeginResource`/`%%EndResource` unless
    /// the body already starts with its own begin comment. Directives inside
    /// the body are inlined like those of the input.
    fn expand<W: Write>(
        &self,
        reference: &ResourceReference,
        body: &[u8],
        eol: &[u8],
        state: &mut RunState,
        output: &mut W,
    ) -> Result<()> {
        let wrap = !BEGIN_MARKERS.iter().any(|marker| body.starts_with(marker));

        if wrap {
            write_all(output, format!("%%BeginResource: {}", reference).as_bytes())?;
            write_all(output, eol)?;
        }
        for line in CommentScanner::new(body) {
            self.process(line?, state, output)?;
        }
        if !body.is_empty() && !body.ends_with(b"\n") {
            write_all(output, eol)?;
        }
        if wrap {
            write_all(output, b"%%EndResource")?;
            write_all(output, eol)?;
        }
        Ok(())
    }
}

fn line_terminator(line: &[u8]) -> &'static [u8] {
    if line.ends_with(b"\r\n") {
        b"\r\n"
    } else {
        b"\n"
    }
}

fn write_all<W: Write>(output: &mut W, bytes: &[u8]) -> Result<()> {
    output.write_all(bytes).map_err(Error::OutputWrite)
}
