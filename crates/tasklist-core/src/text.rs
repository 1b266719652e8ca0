use std::borrow::Cow;

use thiserror::Error;

/// Maximum number of characters accepted for a task text.
pub const MAX_TASK_LENGTH: usize = 500;

/// Rejections produced while validating task text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing left after trimming.
    #[error("task text must not be empty")]
    Empty,
    /// Trimmed input is longer than [`MAX_TASK_LENGTH`].
    #[error("task text is too long ({len} characters, maximum {max})")]
    TooLong {
        /// Character count of the trimmed input.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Trim, bound-check and sanitize user input into storable task text.
///
/// The length bound applies to the trimmed input as typed, before escaping.
///
/// # Errors
/// Returns [`ValidationError::Empty`] for blank input and
/// [`ValidationError::TooLong`] when the trimmed input exceeds [`MAX_TASK_LENGTH`].
pub fn validate_text(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len > MAX_TASK_LENGTH {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_TASK_LENGTH,
        });
    }
    let clean = sanitize(trimmed);
    let clean = clean.trim();
    if clean.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(clean.to_owned())
}

/// Escape markup-significant characters and flatten control characters.
///
/// `& < > " '` become `&amp; &lt; &gt; &quot; &#39;`; every control
/// character (tab, newline, bell, ...) becomes a single space.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Reverse the entity escaping applied by [`sanitize`].
///
/// Unknown entities are left as written.
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity));
        if let Some((entity, ch)) = decoded {
            out.push(*ch);
            rest = &tail[entity.len()..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];
