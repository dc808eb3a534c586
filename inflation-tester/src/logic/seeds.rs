use anyhow::{Result, bail};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;

/// Seed metadata used for logic and playability analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// The token as typed, when it differs from the decimal rendering.
    pub label: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, label: None }
    }

    #[must_use]
    pub fn display(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.seed.to_string())
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports decimal integers (negative values use their magnitude) and
/// `0x`-prefixed hexadecimal. Duplicates are dropped, keeping the first
/// spelling; an empty list falls back to [`DEFAULT_SEED`].
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let info = parse_seed_token(token)?;
        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(resolved)
}

fn parse_seed_token(token: &str) -> Result<SeedInfo> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        let digits = hex.replace('_', "");
        return match u64::from_str_radix(&digits, 16) {
            Ok(seed) => Ok(SeedInfo {
                seed,
                label: Some(token.to_string()),
            }),
            Err(_) => bail!("Unrecognized seed token: {token}"),
        };
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(SeedInfo::from_numeric(value));
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(SeedInfo::from_numeric(value.unsigned_abs()));
    }

    bail!("Unrecognized seed token: {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_decimal_and_hex() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xFF", "0xDEAD_BEEF"])).unwrap();
        let values: Vec<_> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![42, 7, 255, 0xDEAD_BEEF]);
        assert_eq!(seeds[2].display(), "0xFF");
        assert_eq!(seeds[0].display(), "42");
    }

    #[test]
    fn deduplicates_and_defaults() {
        let seeds = resolve_seed_inputs(&tokens(&["255", "0xff", " "])).unwrap();
        assert_eq!(seeds.len(), 1);
        assert!(seeds[0].label.is_none());

        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1337)]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xZZ"])).is_err());
    }
}
