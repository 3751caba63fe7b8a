//! `HH:MM:SS` duration strings as stored on workout documents.

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("too many duration components: {0}")]
    TooManyParts(usize),
    #[error("invalid duration component `{0}`")]
    InvalidComponent(String),
    #[error("duration `{0}` does not fit in seconds")]
    Overflow(String),
}

/// Format whole seconds as zero-padded `HH:MM:SS`. Hours are not capped.
#[must_use]
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parse a colon-delimited duration back into seconds.
///
/// Accepts `H:M:S`, `M:S` or a bare number of seconds. Components are read
/// right to left, so `"5:30"` is five minutes thirty.
///
/// # Errors
///
/// Returns a [`DurationError`] for empty input, more than three components,
/// any component that is not a non-negative integer, or a total that
/// overflows `u64` seconds.
pub fn parse_duration(raw: &str) -> Result<u64, DurationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(DurationError::TooManyParts(parts.len()));
    }

    let mut total = 0u64;
    for (place, part) in parts.iter().rev().enumerate() {
        let value = part
            .trim()
            .parse::<u64>()
            .map_err(|_| DurationError::InvalidComponent((*part).to_owned()))?;
        let unit = match place {
            0 => 1,
            1 => 60,
            _ => 3600,
        };
        total = value
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| DurationError::Overflow(trimmed.to_owned()))?;
    }
    Ok(total)
}

#[cfg(test)]
#[path = "duration_test.rs"]
mod tests;
