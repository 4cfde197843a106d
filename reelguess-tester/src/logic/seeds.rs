use anyhow::{Context, Result, bail};
use reelguess_game::{DateKey, generate_session_seed};
use std::collections::HashSet;

const MAX_DATE_SPAN: i64 = 366;

/// Resolve CLI seed tokens: decimal, `0x` hex, or `random` for a fresh seed.
///
/// Duplicates are dropped, order is kept, and an empty list falls back to 1337.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for token in tokens {
        let seed = if token.eq_ignore_ascii_case("random") {
            generate_session_seed()
        } else if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            u64::from_str_radix(&hex.replace('_', ""), 16)
                .with_context(|| format!("invalid hex seed: {token}"))?
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(1337);
    }
    Ok(seeds)
}

/// Resolve CLI date tokens: `today`, `YYYY-MM-DD`, or an inclusive range
/// `YYYY-MM-DD..YYYY-MM-DD`.
pub fn resolve_date_inputs(tokens: &[String]) -> Result<Vec<DateKey>> {
    let mut seen = HashSet::new();
    let mut dates = Vec::new();

    for token in tokens {
        for date in expand_date_token(token)? {
            if seen.insert(date) {
                dates.push(date);
            }
        }
    }

    if dates.is_empty() {
        dates.push(DateKey::today());
    }
    Ok(dates)
}

fn expand_date_token(token: &str) -> Result<Vec<DateKey>> {
    if token.eq_ignore_ascii_case("today") {
        return Ok(vec![DateKey::today()]);
    }

    let Some((start, end)) = token.split_once("..") else {
        return Ok(vec![parse_date(token)?]);
    };

    let start = parse_date(start)?;
    let end = parse_date(end)?;
    let span = (end.date() - start.date()).num_days();
    if span < 0 {
        bail!("date range {token} ends before it starts");
    }
    if span > MAX_DATE_SPAN {
        bail!("date range {token} spans more than {MAX_DATE_SPAN} days");
    }

    Ok(start
        .date()
        .iter_days()
        .take_while(|day| *day <= end.date())
        .map(DateKey::new)
        .collect())
}

fn parse_date(raw: &str) -> Result<DateKey> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_decimal_hex_and_negative_seeds() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "0xBEEF", "-7", "42"])).unwrap();
        assert_eq!(seeds, vec![42, 0xBEEF, 7]);
    }

    #[test]
    fn rejects_garbage_seed() {
        assert!(resolve_seed_inputs(&tokens(&["orange"])).is_err());
    }

    #[test]
    fn empty_seed_list_uses_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![1337]);
    }

    #[test]
    fn expands_date_ranges() {
        let dates = resolve_date_inputs(&tokens(&["2026-02-27..2026-03-02", "2026-02-28"])).unwrap();
        let rendered: Vec<String> = dates.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            ["2026-02-27", "2026-02-28", "2026-03-01", "2026-03-02"]
        );
    }

    #[test]
    fn rejects_backwards_or_malformed_dates() {
        assert!(resolve_date_inputs(&tokens(&["2026-03-02..2026-03-01"])).is_err());
        assert!(resolve_date_inputs(&tokens(&["16/10/2026"])).is_err());
    }
}
