//! PostScript format detection.

use crate::error::{Error, Result};

/// PostScript header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsFormat {
    /// DSC version from `%!PS-Adobe-x.y` (e.g. "3.0"), if declared
    pub dsc_version: Option<String>,
    /// Whether the header declares Encapsulated PostScript
    pub eps: bool,
}

impl std::fmt::Display for PsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.eps { "EPS" } else { "PostScript" };
        match self.dsc_version {
            Some(ref version) => write!(f, "{} (DSC {})", kind, version),
            None => write!(f, "{}", kind),
        }
    }
}

/// PostScript magic bytes: %!
const PS_MAGIC: &[u8] = b"%!";
const DSC_MAGIC: &[u8] = b"%!PS-Adobe-";
const PDF_MAGIC: &[u8] = b"%PDF-";
/// DOS EPS binary header: C5 D0 D3 C6
const DOS_EPS_MAGIC: &[u8] = &[0xC5, 0xD0, 0xD3, 0xC6];

/// Number of leading bytes to read before calling
/// [`detect_format_from_bytes`]; enough for the longest DSC header line
/// worth inspecting.
pub const HEADER_LEN: usize = 64;

/// Detect the format from the start of a document.
///
/// # Returns
/// * `Ok(PsFormat)` for a `%!` header
/// * `Err(Error::IncompatibleInput)` for PDF or DOS EPS binaries
/// * `Err(Error::UnknownFormat)` for anything else
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PsFormat> {
    if data.starts_with(PDF_MAGIC) {
        return Err(Error::IncompatibleInput("PDF document".to_string()));
    }
    if data.starts_with(DOS_EPS_MAGIC) {
        return Err(Error::IncompatibleInput("DOS EPS binary".to_string()));
    }
    if !data.starts_with(PS_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let first_line = data
        .split(|&b| b == b'\n' || b == b'\r')
        .next()
        .unwrap_or_default();
    let header = String::from_utf8_lossy(first_line);

    let dsc_version = if first_line.starts_with(DSC_MAGIC) {
        header[DSC_MAGIC.len()..]
            .split_whitespace()
            .next()
            .filter(|v| is_valid_version(v))
            .map(str::to_string)
    } else {
        None
    };

    Ok(PsFormat {
        dsc_version,
        eps: header.contains(" EPSF-"),
    })
}

/// Check if a version string looks like `x.y`.
fn is_valid_version(version: &str) -> bool {
    match version.split_once('.') {
        Some((major, minor)) => {
            !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit())
                && minor.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_dsc_header() {
        let format = detect_format_from_bytes(b"%!PS-Adobe-3.0\n%%Creator: x\n").unwrap();
        assert_eq!(format.dsc_version.as_deref(), Some("3.0"));
        assert!(!format.eps);
        assert_eq!(format.to_string(), "PostScript (DSC 3.0)");
    }

    #[test]
    fn test_detect_eps() {
        let format = detect_format_from_bytes(b"%!PS-Adobe-3.0 EPSF-3.0\r\n").unwrap();
        assert_eq!(format.dsc_version.as_deref(), Some("3.0"));
        assert!(format.eps);
    }

    #[test]
    fn test_detect_bare_magic() {
        let format = detect_format_from_bytes(b"%!\n/a 1 def\n").unwrap();
        assert_eq!(format.dsc_version, None);
        assert_eq!(format.to_string(), "PostScript");
    }

    #[test]
    fn test_detect_pdf_is_incompatible() {
        let result = detect_format_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3");
        assert!(matches!(result, Err(Error::IncompatibleInput(_))));

        let result = detect_format_from_bytes(&[0xC5, 0xD0, 0xD3, 0xC6, 0, 0]);
        assert!(matches!(result, Err(Error::IncompatibleInput(_))));
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_format_from_bytes(b"%%IncludeResource: font F\n"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(detect_format_from_bytes(b""), Err(Error::UnknownFormat)));
        assert!(matches!(
            detect_format_from_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("3.0"));
        assert!(!is_valid_version("3"));
        assert!(!is_valid_version("abc"));
        assert!(!is_valid_version("3.x"));
    }
}
