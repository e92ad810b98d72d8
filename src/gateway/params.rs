/// Parse an optional `limit` query value: absent means `default`, anything
/// non-positive or non-numeric is an error, larger values are capped.
pub fn parse_limit(raw: Option<&str>, default: i32, cap: i32) -> Result<i32, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };

    let parsed = raw
        .parse::<i64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| "limit must be a positive integer".to_string())?;

    Ok(parsed.min(i64::from(cap)) as i32)
}

/// Positive 64-bit integer in string form, or `None`.
pub fn parse_positive_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|v| *v > 0)
}

/// Comma-separated positive ids, e.g. `16114,16115`. `None` when empty or
/// any element is invalid.
pub fn parse_match_ids(raw: &str) -> Option<Vec<i64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let ids: Option<Vec<i64>> = raw.split(',').map(parse_positive_int).collect();
    ids.filter(|ids| !ids.is_empty())
}

/// Exactly three Latin letters.
pub fn is_valid_iata(value: &str) -> bool {
    value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic())
}

/// Origin airport from the query or the service-level default, validated
/// and upper-cased.
pub fn resolve_origin(query: Option<&str>, default_origin: &str) -> Result<String, String> {
    let mut origin = query.map(str::trim).unwrap_or_default().to_uppercase();
    if origin.is_empty() {
        origin = default_origin.trim().to_uppercase();
    }

    if origin.is_empty() {
        return Err("origin_iata is required".to_string());
    }
    if !is_valid_iata(&origin) {
        return Err("origin_iata must be 3 latin letters".to_string());
    }

    Ok(origin)
}
