use anyhow::{Context, Result, bail};

/// Parse CLI seed tokens. Accepts decimal, `0x` hex and `a..b` ranges.
pub fn parse_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in tokens {
        if let Some((start, end)) = token.split_once("..") {
            let start = parse_one(start)?;
            let end = parse_one(end)?;
            if end < start {
                bail!("seed range {token} is empty");
            }
            seeds.extend(start..end);
        } else {
            seeds.push(parse_one(token)?);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    seeds.dedup();
    Ok(seeds)
}

fn parse_one(token: &str) -> Result<u64> {
    let token = token.trim();
    let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse(),
    };
    parsed.with_context(|| format!("invalid seed `{token}`"))
}
