//! Width folding, tokenization and honorific stripping.

use std::sync::LazyLock;

use regex::Regex;

/// Fold full-width ASCII (including digits) and the ideographic space to half-width.
pub fn fold_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect()
}

/// Split text into lower-cased terms on whitespace, punctuation and symbols.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = fold_width(text).to_lowercase();
    TOKEN_SPLIT
        .split(&folded)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove honorifics and titles ("先生", "教授", "Prof.", ...).
pub fn strip_honorifics(text: &str) -> String {
    HONORIFIC.replace_all(text, "").into_owned()
}

/// Byte offset of the first honorific in `text`.
pub fn honorific_start(text: &str) -> Option<usize> {
    HONORIFIC.find(text).map(|m| m.start())
}

/// Remove every whitespace character.
pub fn remove_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// True if `haystack` contains any of `needles`.
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// The first of `needles` contained in `haystack`.
pub fn first_contained<'a>(haystack: &str, needles: &[&'a str]) -> Option<&'a str> {
    needles.iter().copied().find(|n| haystack.contains(n))
}

static TOKEN_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\p{P}\p{S}]+").expect("Invalid regex"));

static HONORIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(准教授|教授|先生|せんせい|講師|助教|博士|さん|様|氏|\bprof(essor)?\b\.?|\bdr\b\.?|\bsensei\b)")
        .expect("Invalid regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_width_digits() {
        assert_eq!(fold_width("２０２４年４月５日"), "2024年4月5日");
        assert_eq!(fold_width("１Ｑ　開始"), "1Q 開始");
        assert_eq!(fold_width("今日の予定は？"), "今日の予定は?");
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("サッカー部ある?"), vec!["サッカー部ある"]);
        assert_eq!(tokenize("Soccer, tennis!  club"), vec!["soccer", "tennis", "club"]);
        assert_eq!(tokenize("軽音・バンド"), vec!["軽音", "バンド"]);
        assert!(tokenize(" ？！ ").is_empty());
    }

    #[test]
    fn test_strip_honorifics() {
        assert_eq!(strip_honorifics("田中先生のオフィスアワー"), "田中のオフィスアワー");
        assert_eq!(strip_honorifics("佐藤准教授"), "佐藤");
        assert_eq!(strip_honorifics("Prof. Smith"), " Smith");
    }

    #[test]
    fn test_honorific_start() {
        assert_eq!(honorific_start("はるか先生"), Some("はるか".len()));
        assert_eq!(honorific_start("Prof. Smith"), Some(0));
        assert_eq!(honorific_start("図書館"), None);
    }

    #[test]
    fn test_contains_helpers() {
        assert!(contains_any("夏休みはいつ", &["冬", "夏"]));
        assert!(!contains_any("授業", &["休み"]));
        assert_eq!(first_contained("後期授業開始", &["前期", "後期"]), Some("後期"));
    }
}
