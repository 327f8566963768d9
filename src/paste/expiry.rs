//! `expires_in` grammar (§6.2): literal tokens, `never`/`""`, `burn`, or a
//! generic composite duration expression like `2h30m`.

use chrono::{DateTime, Duration, Utc};

use super::error::{PasteError, PasteResult};

/// The resolved expiry outcome of parsing an `expires_in` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// No time-based expiry, no burn.
    Never,
    /// No time expiry, but burn-after-read.
    Burn,
    /// Expires at a computed instant.
    At(DateTime<Utc>),
}

const LITERAL_TOKENS: &[(&str, i64)] = &[
    ("10m", 10 * 60),
    ("30m", 30 * 60),
    ("1h", 60 * 60),
    ("6h", 6 * 60 * 60),
    ("12h", 12 * 60 * 60),
    ("1d", 24 * 60 * 60),
    ("3d", 3 * 24 * 60 * 60),
    ("1w", 7 * 24 * 60 * 60),
    ("2w", 14 * 24 * 60 * 60),
    // Approximate; a calendar-exact month is not implemented (§9).
    ("1M", 30 * 24 * 60 * 60),
];

/// Parse an `expires_in` expression relative to `now`.
pub fn parse(expires_in: Option<&str>, now: DateTime<Utc>) -> PasteResult<Expiry> {
    let raw = expires_in.unwrap_or("").trim();

    if raw.is_empty() || raw.eq_ignore_ascii_case("never") {
        return Ok(Expiry::Never);
    }
    if raw.eq_ignore_ascii_case("burn") {
        return Ok(Expiry::Burn);
    }

    if let Some((_, secs)) = LITERAL_TOKENS.iter().find(|(tok, _)| *tok == raw) {
        return Ok(Expiry::At(now + Duration::seconds(*secs)));
    }

    let secs = parse_composite_duration(raw).ok_or(PasteError::InvalidExpiresIn)?;
    if secs == 0 {
        return Err(PasteError::InvalidExpiresIn);
    }
    Ok(Expiry::At(now + Duration::seconds(secs)))
}

/// Parse a composite duration expression of `N{s|m|h}` segments, e.g. `2h30m`.
fn parse_composite_duration(s: &str) -> Option<i64> {
    let mut total: i64 = 0;
    let mut chars = s.chars().peekable();
    let mut matched_any = false;

    while chars.peek().is_some() {
        let mut digits = String::new();
        while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            digits.push(chars.next().unwrap());
        }
        if digits.is_empty() {
            return None;
        }
        let unit = chars.next()?;
        let value: i64 = digits.parse().ok()?;
        let multiplier = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            _ => return None,
        };
        total += value * multiplier;
        matched_any = true;
    }

    matched_any.then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_and_never_mean_no_expiry() {
        assert_eq!(parse(None, now()).unwrap(), Expiry::Never);
        assert_eq!(parse(Some(""), now()).unwrap(), Expiry::Never);
        assert_eq!(parse(Some("never"), now()).unwrap(), Expiry::Never);
    }

    #[test]
    fn burn_sets_burn_variant() {
        assert_eq!(parse(Some("burn"), now()).unwrap(), Expiry::Burn);
    }

    #[test]
    fn literal_tokens_resolve_to_fixed_offsets() {
        let Expiry::At(at) = parse(Some("1h"), now()).unwrap() else {
            panic!("expected At");
        };
        assert_eq!(at, now() + Duration::hours(1));
    }

    #[test]
    fn composite_duration_parses() {
        let Expiry::At(at) = parse(Some("2h30m"), now()).unwrap() else {
            panic!("expected At");
        };
        assert_eq!(at, now() + Duration::minutes(150));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse(Some("not-a-duration"), now()),
            Err(PasteError::InvalidExpiresIn)
        ));
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(matches!(parse(Some("0s"), now()), Err(PasteError::InvalidExpiresIn)));
    }

    #[test]
    fn all_literal_tokens_accepted() {
        for (tok, _) in LITERAL_TOKENS {
            assert!(parse(Some(tok), now()).is_ok(), "token {tok} should parse");
        }
    }
}
