// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Line terminator detection and the CRLF policy.

use std::fmt;

/// Submodule pointer lines may keep LF endings under a CRLF policy.
const SUBMODULE_MARKER: &str = "Subproject commit";

/// The terminator of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eol {
    CrLf,
    Lf,
    Cr,
    /// Last line of the input without a terminator.
    None,
}

impl Eol {
    /// The terminator text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Eol::CrLf => "\r\n",
            Eol::Lf => "\n",
            Eol::Cr => "\r",
            Eol::None => "",
        }
    }

    /// Split a line into its content and terminator.
    pub fn split(line: &str) -> (&str, Eol) {
        if let Some(content) = line.strip_suffix("\r\n") {
            (content, Eol::CrLf)
        } else if let Some(content) = line.strip_suffix('\n') {
            (content, Eol::Lf)
        } else if let Some(content) = line.strip_suffix('\r') {
            (content, Eol::Cr)
        } else {
            (line, Eol::None)
        }
    }
}

impl fmt::Display for Eol {
    /// Quoted escape form, e.g. `'\n'`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped = match self {
            Eol::CrLf => "\\r\\n",
            Eol::Lf => "\\n",
            Eol::Cr => "\\r",
            Eol::None => "",
        };
        write!(f, "'{}'", escaped)
    }
}

/// Check whether an added line breaks the CRLF policy.
pub fn crlf_violation(eol: Eol, force_crlf: bool, line: &str) -> bool {
    force_crlf && eol != Eol::CrLf && !line.contains(SUBMODULE_MARKER)
}

/// Split text into lines, keeping each terminator.
///
/// `\r\n`, `\n` and a lone `\r` all end a line.
pub fn split_keep_ends(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') {
                    i + 1
                } else {
                    i
                };
                lines.push(&text[start..=end]);
                start = end + 1;
                i = end;
            }
            _ => {}
        }
        i += 1;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submodule_carve_out() {
        assert!(!crlf_violation(Eol::Lf, true, "Subproject commit abc123"));
    }

    #[test]
    fn test_lf_under_crlf_policy() {
        assert!(crlf_violation(Eol::Lf, true, "normal code"));
        assert!(crlf_violation(Eol::None, true, "normal code"));
        assert!(crlf_violation(Eol::Cr, true, "normal code"));
    }

    #[test]
    fn test_crlf_never_violates() {
        assert!(!crlf_violation(Eol::CrLf, true, "anything"));
    }

    #[test]
    fn test_policy_off_never_violates() {
        for eol in [Eol::CrLf, Eol::Lf, Eol::Cr, Eol::None] {
            assert!(!crlf_violation(eol, false, "normal code"));
        }
    }

    #[test]
    fn test_split() {
        assert_eq!(Eol::split("abc\r\n"), ("abc", Eol::CrLf));
        assert_eq!(Eol::split("abc\n"), ("abc", Eol::Lf));
        assert_eq!(Eol::split("abc\r"), ("abc", Eol::Cr));
        assert_eq!(Eol::split("abc"), ("abc", Eol::None));
    }

    #[test]
    fn test_display() {
        assert_eq!(Eol::Lf.to_string(), "'\\n'");
        assert_eq!(Eol::CrLf.to_string(), "'\\r\\n'");
        assert_eq!(Eol::None.to_string(), "''");
    }

    #[test]
    fn test_split_keep_ends() {
        let lines = split_keep_ends("a\r\nb\nc\rd");
        assert_eq!(lines, vec!["a\r\n", "b\n", "c\r", "d"]);
        assert!(split_keep_ends("").is_empty());
        assert_eq!(split_keep_ends("\r\n\r\n"), vec!["\r\n", "\r\n"]);
    }
}
