//! # psincluderes
//!
//! Inline PostScript resources referenced by `%%IncludeResource` comments.
//!
//! This is the inverse of `extractres`: every `%%IncludeResource: <type>
//! <name>` directive in a DSC-conforming document is replaced with the body
//! of the named resource, found by searching a list of directories and
//! trying the file extensions registered for the resource type. Each
//! resource is inlined once, at its first use; repeated directives are
//! dropped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use psincluderes::{include_file, InlineOptions, SearchPath};
//!
//! fn main() -> psincluderes::Result<()> {
//!     let search_path = SearchPath::new().with_dir("/usr/share/ps-resources");
//!     let (document, report) =
//!         include_file("document.ps", &search_path, InlineOptions::default())?;
//!     std::fs::write("document-full.ps", document)?;
//!     println!("inlined {} resources", report.inlined.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Limitations
//!
//! `%%DocumentNeededResources` comments are copied unchanged, even when the
//! resources they list have been inlined.

pub mod detect;
pub mod error;
pub mod inline;
pub mod locator;
pub mod model;
pub mod scanner;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, PsFormat, HEADER_LEN};
pub use error::{Error, Result};
pub use inline::{InlineOptions, InlineReport, Inliner, MissingResource};
pub use locator::{ResourceLocator, SearchPath};
pub use model::{ResourceRecord, ResourceReference, ResourceType};
pub use scanner::{CommentScanner, MarkerKind, ScannedLine};

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Inline resources from `input` into `output`.
///
/// # Arguments
///
/// * `input` - Buffered PostScript source
/// * `output` - Destination for the rewritten document
/// * `search_path` - Directories to search for resource files
/// * `options` - Inlining options
///
/// # Example
///
/// ```no_run
/// use psincluderes::{include_resources, InlineOptions, SearchPath};
/// use std::io::{self, BufReader};
///
/// let report = include_resources(
///     BufReader::new(io::stdin()),
///     io::stdout(),
///     &SearchPath::new(),
///     InlineOptions::new(),
/// )
/// .unwrap();
/// eprintln!("{} duplicates dropped", report.duplicates);
/// ```
pub fn include_resources<R: BufRead, W: Write>(
    input: R,
    output: W,
    search_path: &SearchPath,
    options: InlineOptions,
) -> Result<InlineReport> {
    Inliner::with_options(search_path, options).run(input, output)
}

/// Inline resources into an in-memory document.
///
/// # Example
///
/// ```
/// use psincluderes::{include_in_memory, InlineOptions, SearchPath};
///
/// let (output, report) = include_in_memory(
///     b"%!PS\nshowpage\n",
///     &SearchPath::empty(),
///     InlineOptions::new(),
/// )
/// .unwrap();
/// assert_eq!(output, b"%!PS\nshowpage\n");
/// assert!(report.inlined.is_empty());
/// ```
pub fn include_in_memory(
    data: &[u8],
    search_path: &SearchPath,
    options: InlineOptions,
) -> Result<(Vec<u8>, InlineReport)> {
    Inliner::with_options(search_path, options).run_bytes(data)
}

/// Inline resources into a PostScript file, returning the rewritten document.
///
/// Failing to open or read `path` is [`Error::InputRead`].
pub fn include_file<P: AsRef<Path>>(
    path: P,
    search_path: &SearchPath,
    options: InlineOptions,
) -> Result<(Vec<u8>, InlineReport)> {
    let file = File::open(path).map_err(Error::InputRead)?;
    let mut output = Vec::new();
    let report = include_resources(BufReader::new(file), &mut output, search_path, options)?;
    Ok((output, report))
}
