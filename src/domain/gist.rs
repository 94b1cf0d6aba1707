//! Gist URL construction and the `DATA_URL` rewrite of the portfolio data hook

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::errors::AppError;

/// Name of the portfolio data file inside every created gist.
pub const GIST_FILENAME: &str = "data.json";

static DATA_URL_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"const DATA_URL = '.*?';").expect("DATA_URL pattern is a valid regex")
});

pub fn gist_raw_url(raw_host: &str, owner: &str, gist_id: &str, filename: &str) -> String {
    format!("https://{raw_host}/{owner}/{gist_id}/raw/{filename}")
}

/// Result of rewriting a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub replaced: bool,
}

/// Swaps the first `const DATA_URL = '...';` literal for `url`. Content
/// without an assignment comes back unchanged.
pub fn replace_data_url(source: &str, url: &str) -> Rewrite {
    let replacement = format!("const DATA_URL = '{url}';");
    let replaced = DATA_URL_ASSIGNMENT.is_match(source);
    let content = DATA_URL_ASSIGNMENT
        .replace(source, NoExpand(&replacement))
        .into_owned();

    Rewrite { content, replaced }
}

/// Decodes repository file content as served by the GitHub contents API,
/// which wraps its base64 payload with newlines.
pub fn decode_file_content(encoded: &str) -> Result<String, AppError> {
    let compact: String = encoded
        .chars()
        .filter(|character| !character.is_ascii_whitespace())
        .collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|err| AppError::upstream("GitHub returned undecodable content", err.to_string()))?;

    String::from_utf8(bytes)
        .map_err(|err| AppError::upstream("GitHub returned non UTF-8 content", err.to_string()))
}

pub fn encode_file_content(content: &str) -> String {
    BASE64.encode(content)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const HOOK_SOURCE: &str = "import { useEffect } from 'react';\n\
        const DATA_URL = 'https://gist.githubusercontent.com/old/abc/raw/data.json';\n\
        export const usePortfolioData = () => fetch(DATA_URL);\n";

    #[test]
    fn builds_raw_url() {
        assert_eq!(
            gist_raw_url("gist.githubusercontent.com", "octocat", "f00d", "data.json"),
            "https://gist.githubusercontent.com/octocat/f00d/raw/data.json"
        );
    }

    #[test]
    fn replaces_data_url_literal() {
        let rewrite = replace_data_url(HOOK_SOURCE, "https://example.com/new.json");

        assert!(rewrite.replaced);
        assert_eq!(
            rewrite.content,
            "import { useEffect } from 'react';\n\
             const DATA_URL = 'https://example.com/new.json';\n\
             export const usePortfolioData = () => fetch(DATA_URL);\n"
        );
    }

    #[test]
    fn replaces_only_first_assignment() {
        let source = "const DATA_URL = 'a';\nconst DATA_URL = 'b';\n";
        let rewrite = replace_data_url(source, "c");
        assert_eq!(rewrite.content, "const DATA_URL = 'c';\nconst DATA_URL = 'b';\n");
    }

    #[test]
    fn dollar_signs_are_inserted_literally() {
        let rewrite = replace_data_url("const DATA_URL = 'x';", "https://h/$1/raw");
        assert_eq!(rewrite.content, "const DATA_URL = 'https://h/$1/raw';");
    }

    #[test]
    fn missing_assignment_leaves_content_untouched() {
        let rewrite = replace_data_url("export default {};\n", "https://example.com");
        assert!(!rewrite.replaced);
        assert_eq!(rewrite.content, "export default {};\n");
    }

    #[test]
    fn decodes_wrapped_base64() {
        let encoded = encode_file_content(HOOK_SOURCE);
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{head}\n{tail}\n");

        assert_eq!(decode_file_content(&wrapped).expect("decodes"), HOOK_SOURCE);
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_file_content("@@not-base64@@").expect_err("invalid payload");
        assert!(matches!(err, AppError::Upstream { .. }));
    }
}
