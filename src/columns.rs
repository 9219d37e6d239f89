//! E-mail column detection from a header row.
//!
//! Headers are compared case-insensitively against `email` and `e-mail`.
//! An exact match anywhere in the row wins over a header that merely contains
//! one of those words, even when the containing header comes first.

use crate::error::ColumnError;

const EMAIL_LABELS: [&str; 2] = ["email", "e-mail"];

/// Returns the zero-based index of the column most likely to hold e-mail
/// addresses.
pub fn locate_email_column<S: AsRef<str>>(headers: &[S]) -> Result<usize, ColumnError> {
    let mut close_match = None;
    for (idx, header) in headers.iter().enumerate() {
        let lowered = header.as_ref().to_lowercase();
        if EMAIL_LABELS.contains(&lowered.as_str()) {
            return Ok(idx);
        }
        if close_match.is_none() && EMAIL_LABELS.iter().any(|label| lowered.contains(label)) {
            close_match = Some(idx);
        }
    }
    close_match.ok_or(ColumnError::NoEmailColumnFound)
}
