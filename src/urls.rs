use regex::Regex;

/// Shape accepted for user-supplied website URLs: optional http(s)
/// scheme, optional www prefix, a host with at least one dot, then an
/// optional path or query.
const URL_PATTERN: &str = r"^(https?://)?(www\.)?[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+([/?].*)?$";

/// Checks whether user input looks like a web URL.
///
/// Intentionally permissive: this is a shape check only, it does not
/// resolve DNS or probe reachability.
#[derive(Debug)]
pub struct UrlValidator {
    pattern: Regex,
}

impl UrlValidator {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(URL_PATTERN).expect("URL pattern should be valid"),
        }
    }

    /// Returns true when the input matches the accepted URL shape
    pub fn is_valid(&self, input: &str) -> bool {
        if input.is_empty() {
            return false;
        }
        self.pattern.is_match(input)
    }
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off validity check; prefer holding a [`UrlValidator`] when
/// checking many inputs
pub fn is_valid_url(input: &str) -> bool {
    UrlValidator::new().is_valid(input)
}

/// Prefix `https://` unless the input already carries an http(s)
/// scheme. The input is otherwise returned untouched.
pub fn normalize_url(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    if input.starts_with("http://") || input.starts_with("https://") {
        return input.to_string();
    }
    format!("https://{}", input)
}
