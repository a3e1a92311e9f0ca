use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks.
/// Used for the admin API key header.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check a presented admin key against the configured one. No configured
/// key means the admin API is closed to everyone.
pub fn admin_key_matches(configured: Option<&str>, presented: Option<&str>) -> bool {
    match (configured, presented) {
        (Some(expected), Some(given)) => constant_time_compare(expected, given),
        _ => false,
    }
}
