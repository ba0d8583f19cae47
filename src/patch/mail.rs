// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Minimal single-part mail parsing for patch emails.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{PatchCheckError, PatchError, Result};
use crate::rules::{split_keep_ends, Eol};

lazy_static! {
    /// RFC 2047 encoded word.
    static ref ENCODED_WORD_RE: Regex =
        Regex::new(r"=\?([^?\s]+)\?([QqBb])\?([^?\s]*)\?=").unwrap();
}

/// A parsed mail message: unfolded headers and a decoded text body.
#[derive(Debug, Clone)]
pub struct MailMessage {
    headers: Vec<(String, String)>,
    body: String,
}

impl MailMessage {
    /// Parse a mail message.
    ///
    /// A leading mbox `From ` line is skipped. Headers end at the first
    /// empty line (or the first line that is not a header).
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let lines = split_keep_ends(text);
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut offset = 0;
        let mut index = 0;

        if let Some(first) = lines.first() {
            if first.starts_with("From ") {
                offset += first.len();
                index = 1;
            }
        }

        while let Some(line) = lines.get(index) {
            let (content, _) = Eol::split(line);

            if content.is_empty() {
                offset += line.len();
                break;
            }

            if content.starts_with(' ') || content.starts_with('\t') {
                match headers.last_mut() {
                    Some((_, value)) => value.push_str(content),
                    None => break,
                }
            } else if let Some((key, value)) = content.split_once(':') {
                if key.is_empty() || key.contains(char::is_whitespace) {
                    break;
                }
                headers.push((key.to_string(), value.trim_start().to_string()));
            } else {
                break;
            }

            offset += line.len();
            index += 1;
        }

        if headers.is_empty() {
            return Err(PatchCheckError::Patch(PatchError::Malformed {
                name: name.to_string(),
                message: "no mail headers found".to_string(),
            }));
        }

        let raw_body = &text[offset..];
        let encoding = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("Content-Transfer-Encoding"))
            .map(|(_, v)| v.trim().to_ascii_lowercase());

        let body = match encoding.as_deref() {
            Some("quoted-printable") => {
                String::from_utf8_lossy(&decode_quoted_printable(raw_body, false)).into_owned()
            }
            Some("base64") => {
                let compact: String = raw_body.chars().filter(|c| !c.is_whitespace()).collect();
                let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| {
                    PatchCheckError::Patch(PatchError::Malformed {
                        name: name.to_string(),
                        message: format!("invalid base64 body: {}", e),
                    })
                })?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            _ => raw_body.to_string(),
        };

        Ok(Self { headers, body })
    }

    /// Get the raw value of the first header with this name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The decoded body text.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Decode RFC 2047 encoded words in a header value.
///
/// Whitespace separating two adjacent encoded words is dropped.
pub fn decode_header(value: &str) -> String {
    let mut result = String::new();
    let mut last_end = 0;
    let mut previous_was_encoded = false;

    for caps in ENCODED_WORD_RE.captures_iter(value) {
        let whole = caps.get(0).map(|m| (m.start(), m.end()));
        let Some((start, end)) = whole else {
            continue;
        };

        let between = &value[last_end..start];
        if !(previous_was_encoded && between.chars().all(char::is_whitespace)) {
            result.push_str(between);
        }

        let charset = &caps[1];
        let encoding = &caps[2];
        let payload = &caps[3];

        match decode_word(charset, encoding, payload) {
            Some(decoded) => {
                result.push_str(&decoded);
                previous_was_encoded = true;
            }
            None => {
                tracing::warn!("Could not decode header word: {}", &value[start..end]);
                result.push_str(&value[start..end]);
                previous_was_encoded = false;
            }
        }

        last_end = end;
    }

    result.push_str(&value[last_end..]);
    result
}

fn decode_word(charset: &str, encoding: &str, payload: &str) -> Option<String> {
    let bytes = if encoding.eq_ignore_ascii_case("q") {
        decode_quoted_printable(payload, true)
    } else {
        STANDARD.decode(payload.as_bytes()).ok()?
    };

    // RFC 2231 language suffix, e.g. utf-8*en
    let charset = charset.split('*').next().unwrap_or(charset);

    match charset.to_ascii_lowercase().as_str() {
        "iso-8859-1" | "latin1" | "latin-1" => Some(bytes.iter().map(|&b| b as char).collect()),
        "utf-8" | "utf8" | "us-ascii" => Some(String::from_utf8_lossy(&bytes).into_owned()),
        other => {
            tracing::warn!("Unknown charset '{}', decoding as UTF-8", other);
            Some(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Decode quoted-printable text.
///
/// In header mode `_` stands for a space. Soft line breaks are removed.
fn decode_quoted_printable(input: &str, header: bool) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'=' => {
                let rest = &bytes[i + 1..];
                if rest.starts_with(b"\r\n") {
                    i += 3;
                } else if rest.starts_with(b"\n") {
                    i += 2;
                } else if let Some(value) = rest.get(..2).and_then(hex_pair) {
                    out.push(value);
                    i += 3;
                } else {
                    out.push(b'=');
                    i += 1;
                }
            }
            b'_' if header => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    out
}

/// Exactly two hex digits, no sign.
fn hex_pair(pair: &[u8]) -> Option<u8> {
    if pair.len() != 2 || !pair.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(text, 16).ok()
}
