/// Replace `${ENV_VAR}` and `${ENV_VAR:-fallback}` placeholders in raw config
/// text.
///
/// Placeholders that cannot be resolved and have no fallback are left as-is.
pub fn substitute_env(input: &str) -> String {
    expand(input, |name| std::env::var(name).ok())
}

fn expand(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated, keep the tail verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let inner = &after[..end];
        let (name, fallback) = match inner.split_once(":-") {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (inner, None),
        };

        match (name.is_empty(), lookup(name), fallback) {
            (false, Some(value), _) => out.push_str(&value),
            (false, None, Some(fallback)) => out.push_str(fallback),
            _ => {
                out.push_str("${");
                out.push_str(inner);
                out.push('}');
            },
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn lookup(name: &str) -> Option<String> {
        match name {
            "ECHO_DOMAIN" => Some("example.org".to_string()),
            "ECHO_PORT" => Some("8434".to_string()),
            _ => None,
        }
    }

    #[rstest]
    #[case("domain: ${ECHO_DOMAIN}", "domain: example.org")]
    #[case("${ECHO_DOMAIN}:${ECHO_PORT}", "example.org:8434")]
    #[case("port: ${ECHO_MISSING:-6000}", "port: 6000")]
    #[case("port: ${ECHO_PORT:-6000}", "port: 8434")]
    #[case("${ECHO_MISSING}", "${ECHO_MISSING}")]
    #[case("${}", "${}")]
    #[case("open ${ECHO_DOMAIN", "open ${ECHO_DOMAIN")]
    #[case("plain text", "plain text")]
    fn expands(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(expand(input, lookup), expected);
    }

    #[test]
    fn empty_fallback_is_allowed() {
        assert_eq!(expand("x${ECHO_MISSING:-}y", lookup), "xy");
    }
}
