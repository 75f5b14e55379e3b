//! String clean-up applied to every caller-supplied name and path.

/// Removes ASCII control characters and surrounding whitespace.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| !c.is_ascii_control()).collect();
    stripped.trim().to_string()
}

/// Sanitizes and strips leading/trailing slashes.
#[must_use]
pub fn trim_slashes(input: &str) -> String {
    sanitize(input).trim_matches('/').to_string()
}

/// Normalizes a trailing `s`: `template` and `templates` both become `templates`.
#[must_use]
pub fn pluralize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    format!("{}s", input.strip_suffix('s').unwrap_or(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_control_chars_and_whitespace() {
        assert_eq!(sanitize("  ad\u{0}min\n "), "admin");
        assert_eq!(sanitize("\t\r"), "");
    }

    #[test]
    fn sanitize_keeps_inner_spaces() {
        assert_eq!(sanitize(" a b "), "a b");
    }

    #[test]
    fn trim_slashes_both_ends() {
        assert_eq!(trim_slashes("//default/Sales/"), "default/Sales");
        assert_eq!(trim_slashes(" /x/ "), "x");
        assert_eq!(trim_slashes("/"), "");
    }

    #[test]
    fn pluralize_adds_single_s() {
        assert_eq!(pluralize("template"), "templates");
        assert_eq!(pluralize("templates"), "templates");
        assert_eq!(pluralize(""), "");
    }
}
