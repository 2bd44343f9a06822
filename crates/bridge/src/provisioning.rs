/// Check if a Matrix user may link puppets on this bridge.
///
/// A blacklist match always denies. An empty whitelist means everyone else is
/// allowed (open policy). Patterns are matched case-insensitively against the
/// full MXID and support glob-style `*` wildcards.
pub fn is_allowed(mxid: &str, whitelist: &[String], blacklist: &[String]) -> bool {
    let mxid = mxid.to_lowercase();
    if matches_any(&mxid, blacklist) {
        return false;
    }
    whitelist.is_empty() || matches_any(&mxid, whitelist)
}

fn matches_any(mxid: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| glob_match(&pattern.to_lowercase(), mxid))
}

/// Glob matching supporting `*` as a wildcard for any sequence of chars.
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(head) = parts.next() else {
        return text.is_empty();
    };
    let Some(mut rest) = text.strip_prefix(head) else {
        return false;
    };

    let segments: Vec<&str> = parts.collect();
    let Some((tail, middle)) = segments.split_last() else {
        // No wildcard at all.
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(tail)
}
