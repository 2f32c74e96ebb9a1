use serde::{Deserialize, Serialize};
use std::fmt;

const SCHEMES: [&str; 2] = ["https://", "http://"];
const HOST: &str = "github.com/";
const GIT_SUFFIX: &str = ".git";

/// Normalized repository search text: no scheme, no `github.com/` host, no
/// trailing `.git`, lower-case.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SearchKey(String);

impl SearchKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn sanitize(raw: &str) -> SearchKey {
    let mut current = raw.to_lowercase();
    // Stripping can expose another match (`https://https://x`, `a.git.git`),
    // so run until nothing changes to keep the result idempotent.
    loop {
        let next = strip_once(&current);
        if next == current {
            return SearchKey(current);
        }
        current = next;
    }
}

fn strip_once(value: &str) -> String {
    let mut out = remove_first(value, SCHEMES.iter().copied());
    out = remove_first(&out, std::iter::once(HOST));
    if let Some(stripped) = out.strip_suffix(GIT_SUFFIX) {
        out = stripped.to_string();
    }
    out.to_lowercase()
}

/// Removes the earliest occurrence of any of `needles`.
fn remove_first<'a>(value: &str, needles: impl Iterator<Item = &'a str>) -> String {
    let earliest = needles
        .filter_map(|needle| value.find(needle).map(|idx| (idx, needle.len())))
        .min_by_key(|(idx, _)| *idx);
    match earliest {
        Some((idx, len)) => format!("{}{}", &value[..idx], &value[idx + len..]),
        None => value.to_string(),
    }
}

/// Local filter used while typing: an empty input matches everything,
/// otherwise the sanitized text must contain the sanitized input.
pub fn matches_filter(text: &str, input: &str) -> bool {
    if input.is_empty() {
        return true;
    }
    sanitize(text).as_str().contains(sanitize(input).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sanitize_strips_url_parts() {
        assert_eq!(sanitize("HTTPS://GitHub.com/Foo/Bar.git").as_str(), "foo/bar");
        assert_eq!(sanitize("http://github.com/foo/bar").as_str(), "foo/bar");
        assert_eq!(sanitize("github.com/Foo/Bar").as_str(), "foo/bar");
        assert_eq!(sanitize("Foo/Bar.git").as_str(), "foo/bar");
    }

    #[test]
    fn sanitize_keeps_plain_queries() {
        assert_eq!(sanitize("").as_str(), "");
        assert_eq!(sanitize("OpenHands").as_str(), "openhands");
        assert_eq!(sanitize("foo.github.io").as_str(), "foo.github.io");
    }

    #[test]
    fn sanitize_removes_embedded_host() {
        assert_eq!(
            sanitize("git clone https://github.com/foo/bar.git").as_str(),
            "git clone foo/bar"
        );
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            "",
            "HTTPS://GitHub.com/Foo/Bar.git",
            "https://https://github.com/x",
            "github.com/github.com/a",
            "repo.git.git",
            "http://github.com/http://a.GIT",
            "İstanbul/Repo",
            "   spaced / name ",
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(once.as_str());
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    fn url_like() -> impl Strategy<Value = String> {
        let fragment = prop_oneof![
            Just("https://".to_string()),
            Just("http://".to_string()),
            Just("HTTPS://".to_string()),
            Just("github.com/".to_string()),
            Just("GitHub.com/".to_string()),
            Just(".git".to_string()),
            Just(".GIT".to_string()),
            "[a-zA-Z0-9/._:-]{0,6}",
        ];
        prop::collection::vec(fragment, 0..8).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent_for_any_string(input in any::<String>()) {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(once.as_str()), once);
        }

        #[test]
        fn sanitize_is_idempotent_for_url_fragments(input in url_like()) {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(once.as_str()), once.clone());
            prop_assert!(!once.as_str().contains("github.com/"));
            prop_assert!(!once.as_str().contains("http://"));
            prop_assert!(!once.as_str().contains("https://"));
            prop_assert!(!once.as_str().ends_with(".git"));
        }
    }

    #[test]
    fn filter_matches_sanitized_substrings() {
        assert!(matches_filter("Foo/Bar", ""));
        assert!(matches_filter("Foo/Bar", "https://github.com/foo/b"));
        assert!(matches_filter("Foo/Bar", "BAR"));
        assert!(!matches_filter("Foo/Bar", "baz"));
    }
}
