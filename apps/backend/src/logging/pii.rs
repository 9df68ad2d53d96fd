//! PII redaction helpers for log output.
//!
//! Audit log entries carry the email of the account involved (never the
//! password); emails are masked down to the first character of the local
//! part so operators can correlate without the log becoming a directory.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email pattern: matches standard email addresses.
fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
    });
    &EMAIL_REGEX
}

/// Redacts email addresses in a string: keeps the first character of the
/// local part, replaces the rest with ***, keeps the full domain.
pub fn redact(input: &str) -> String {
    email_regex()
        .replace_all(input, |caps: &regex::Captures| {
            let full_match = &caps[0];
            match full_match.find('@') {
                Some(at_pos) if at_pos > 0 => {
                    let first_char = &full_match[..1];
                    let domain = &full_match[at_pos..];
                    format!("{first_char}***{domain}")
                }
                _ => full_match.to_string(),
            }
        })
        .into_owned()
}

/// Display wrapper that redacts its contents when formatted.
///
/// Use in tracing fields: `email = %Redacted(&email)`.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::{redact, Redacted};

    #[test]
    fn masks_email_local_part() {
        assert_eq!(redact("alice@example.com"), "a***@example.com");
    }

    #[test]
    fn masks_emails_inside_text() {
        assert_eq!(
            redact("login failed for bob.smith@mail.example.org today"),
            "login failed for b***@mail.example.org today"
        );
    }

    #[test]
    fn leaves_non_emails_alone() {
        assert_eq!(redact("no pii here"), "no pii here");
    }

    #[test]
    fn display_wrapper_redacts() {
        assert_eq!(
            format!("{}", Redacted("carol@example.com")),
            "c***@example.com"
        );
    }
}
