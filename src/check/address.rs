// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Email address format check.

use lazy_static::lazy_static;
use regex::Regex;

use crate::report::{Finding, FindingKind, Section, SectionOutcome};

lazy_static! {
    /// `Name <address>`, capturing the name, the separating whitespace and
    /// the address.
    static ref EMAIL_RE: Regex = Regex::new(r"(?mi)\A\s*(.*?)(\s*)<(.+)>\s*$").unwrap();
}

/// Collect the problems with one `Name <address>` value.
pub fn address_problems(email: &str) -> Vec<String> {
    let email = email.trim();
    let mut problems = Vec::new();

    let Some(caps) = EMAIL_RE.captures(email) else {
        problems.push(format!("Email format is invalid: {}", email));
        return problems;
    };

    let name = caps.get(1).map_or("", |m| m.as_str()).trim();
    let separator = caps.get(2).map_or("", |m| m.as_str());
    let address = caps.get(3).map_or("", |m| m.as_str());

    if name.is_empty() {
        problems.push(format!(
            "Name is not provided with email address: {}",
            email
        ));
    } else {
        let quoted = name.len() > 2 && name.starts_with('"') && name.ends_with('"');
        if name.contains(',') && !quoted {
            problems.push(format!(
                "Add quotes (\") around name with a comma: {}",
                name
            ));
        }
    }

    if separator.is_empty() {
        problems.push(format!(
            "There should be a space between the name and email address: {}",
            email
        ));
    }

    if address.contains(' ') {
        problems.push(format!(
            "The email address cannot contain a space: {}",
            address
        ));
    }

    if name.contains(" via Groups.Io") && address.ends_with("@groups.io") {
        problems.push(format!(
            "Email rewritten by lists DMARC / DKIM / SPF: {}",
            email
        ));
    }

    problems
}

/// Email address check for author and committer identities.
#[derive(Debug, Clone, Copy)]
pub struct AddressCheck;

impl AddressCheck {
    /// Check an identity; `label` names it in the report (e.g. `Author`).
    pub fn run(section: Section, email: Option<&str>, label: &str) -> SectionOutcome {
        let mut outcome = SectionOutcome::new(section, label);

        match email {
            None => outcome.push(Finding::error(
                FindingKind::InvalidEmail,
                "Email address is missing!",
            )),
            Some(email) => {
                for problem in address_problems(email) {
                    outcome.push(Finding::error(FindingKind::InvalidEmail, problem));
                }
            }
        }

        outcome
    }
}
