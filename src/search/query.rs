//! 検索クエリの解析
//!
//! 空白区切りの各サブタームを否定(!)・正規表現(/…/flags)・
//! リテラルに分類する。大文字を含むタームだけ大文字小文字を
//! 区別する（smart case）。

/// 解析済みの検索ターム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTerm {
    /// パターン文字列。正規表現タームはスラッシュ込みの生の形
    pub pattern: String,
    /// `/pattern/flags` 形式のタームか
    pub is_regex: bool,
    /// 大文字小文字を区別するか（生タームに大文字があれば真）
    pub case_sensitive: bool,
    /// 否定ターム（!付き）か
    pub negate: bool,
}

/// 検索文字列をタームの列に分割する
pub fn parse_query(input: &str) -> Vec<ParsedTerm> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input
        .split(' ')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| {
            let negate = term.starts_with('!');
            let pattern = if negate { &term[1..] } else { term };
            ParsedTerm {
                pattern: pattern.to_string(),
                is_regex: pattern.starts_with('/'),
                case_sensitive: term.chars().any(|ch| ch.is_ascii_uppercase()),
                negate,
            }
        })
        .collect()
}

/// `/pattern/flags` 形式を分解する
///
/// flagsは[gimy]のみ許す。最初に成立する閉じスラッシュを採用する
/// （非貪欲マッチ相当）。形式が崩れていればNone。
pub fn split_regex_term(term: &str) -> Option<(&str, &str)> {
    let rest = term.strip_prefix('/')?;
    for (idx, ch) in rest.char_indices() {
        if ch != '/' {
            continue;
        }
        let flags = &rest[idx + ch.len_utf8()..];
        if flags.chars().all(|f| matches!(f, 'g' | 'i' | 'm' | 'y')) {
            return Some((&rest[..idx], flags));
        }
    }
    None
}
