// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Splitting a patch email into message, diffstat and diff.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Result;

use super::mail::{decode_header, MailMessage};

lazy_static! {
    /// Start of the first file in a git diff.
    static ref GIT_DIFF_RE: Regex = Regex::new(r"(?mi)^diff\s+--git\s+a/.+\s+b/.+$").unwrap();

    /// Commit message followed by a `---` diffstat block.
    static ref STAT_RE: Regex = Regex::new(
        r"(?mi)(?P<message>[\s\S]*)(?P<stat>^---$[\r\n]+(?:^\s+.+\s+\|\s+\d+\s+\+*-*$[\r\n]+)+[\s\S]+)"
    ).unwrap();

    /// Leading `[PATCH v2 1/3]` style prefixes.
    static ref SUBJECT_PREFIX_RE: Regex = Regex::new(r"^\s*(\[[^\[\]]*\])*\s*").unwrap();
}

/// The parts of a patch that the checks look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchPieces {
    /// Raw `From:` header value.
    pub author: Option<String>,
    /// Decoded subject without bracketed prefixes.
    pub subject: Option<String>,
    /// Commit message body.
    pub message: Option<String>,
    /// Diffstat block.
    pub stat: Option<String>,
    /// Unified git diff.
    pub diff: Option<String>,
}

impl PatchPieces {
    /// Split a patch in email format, or a bare git diff.
    pub fn split(name: &str, patch: &str) -> Result<Self> {
        if patch.starts_with("diff --git") {
            tracing::debug!("{} is a bare diff", name);
            return Ok(Self {
                diff: Some(patch.to_string()),
                ..Self::default()
            });
        }

        let mail = MailMessage::parse(name, patch)?;
        let mut content = mail.body();
        let mut pieces = Self::default();

        if let Some(m) = GIT_DIFF_RE.find(content) {
            pieces.diff = Some(content[m.start()..].to_string());
            content = &content[..m.start()];
        }

        match STAT_RE.captures(content) {
            Some(caps) => {
                pieces.message = caps.name("message").map(|m| m.as_str().to_string());
                pieces.stat = caps.name("stat").map(|m| m.as_str().to_string());
            }
            None => pieces.message = Some(content.to_string()),
        }

        let subject = mail.header("Subject").map(decode_header).unwrap_or_default();
        pieces.subject = Some(clean_subject(&subject));
        pieces.author = mail.header("From").map(str::to_string);

        tracing::debug!(
            "Split {}: subject={:?} diff={} stat={}",
            name,
            pieces.subject,
            pieces.diff.is_some(),
            pieces.stat.is_some()
        );

        Ok(pieces)
    }
}

/// Remove line breaks and one leading run of bracketed prefixes.
pub fn clean_subject(subject: &str) -> String {
    let flat = subject.replace("\r\n", "").replace('\n', "");
    SUBJECT_PREFIX_RE.replacen(&flat, 1, "").into_owned()
}
