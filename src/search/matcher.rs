//! 行マッチャー
//!
//! 解析済みクエリを1行ずつ評価する。全タームを満たした行だけが
//! 受理され、否定でないタームごとに最初の出現位置が記録される。
//! 不正な正規表現タームは全行の拒否として伝播する。

use regex::{Regex, RegexBuilder};

use super::query::{split_regex_term, ParsedTerm};

/// 受理された行と、ターム順のマッチ範囲（文字オフセット, 文字数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedLine {
    pub line: usize,
    pub ranges: Vec<(usize, usize)>,
}

#[derive(Debug)]
enum TermKind {
    Literal,
    Regex(Regex),
    /// `/…/flags` 形式の解析・コンパイルに失敗したターム。
    /// このタームを含むクエリは全行を拒否する
    InvalidRegex,
}

#[derive(Debug)]
struct PreparedTerm {
    pattern: String,
    kind: TermKind,
    case_sensitive: bool,
    negate: bool,
}

/// クエリ1回分のコンパイル済みマッチャー
#[derive(Debug)]
pub struct LineMatcher {
    terms: Vec<PreparedTerm>,
}

impl LineMatcher {
    /// 解析済みタームからマッチャーを構築
    pub fn new(terms: &[ParsedTerm]) -> Self {
        let prepared = terms
            .iter()
            .map(|term| {
                let kind = if term.is_regex {
                    match compile_regex_term(&term.pattern) {
                        Some(regex) => TermKind::Regex(regex),
                        None => TermKind::InvalidRegex,
                    }
                } else {
                    TermKind::Literal
                };
                PreparedTerm {
                    pattern: term.pattern.clone(),
                    kind,
                    case_sensitive: term.case_sensitive,
                    negate: term.negate,
                }
            })
            .collect();
        Self { terms: prepared }
    }

    /// タームが1つもないか
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 1行を評価する。拒否ならNone
    pub fn match_line(&self, line_index: usize, text: &str) -> Option<MatchedLine> {
        let mut matched = MatchedLine {
            line: line_index,
            ranges: Vec::new(),
        };

        for term in &self.terms {
            match &term.kind {
                TermKind::InvalidRegex => return None,
                TermKind::Regex(regex) => {
                    let found = regex.find(text);
                    match (found, term.negate) {
                        (None, false) => return None,
                        (Some(_), true) => return None,
                        (None, true) => continue,
                        (Some(m), false) => {
                            let start = text[..m.start()].chars().count();
                            let len = m.as_str().chars().count();
                            matched.ranges.push((start, len));
                        }
                    }
                }
                TermKind::Literal => {
                    let found = find_literal(text, &term.pattern, term.case_sensitive);
                    if term.negate {
                        if found.is_some() {
                            return None;
                        }
                    } else {
                        match found {
                            None => return None,
                            Some(start) => {
                                matched.ranges.push((start, term.pattern.chars().count()));
                            }
                        }
                    }
                }
            }
        }
        Some(matched)
    }

    /// 全行を走査して受理行を集める
    pub fn search_lines<I, S>(&self, lines: I) -> Vec<MatchedLine>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| self.match_line(index, line.as_ref()))
            .collect()
    }
}

fn compile_regex_term(raw: &str) -> Option<Regex> {
    let (pattern, flags) = split_regex_term(raw)?;
    RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .build()
        .ok()
}

/// リテラルの最初の出現位置（文字オフセット）を探す
///
/// smart caseにより、大小無視のタームは常に小文字だけから成るので、
/// 行側だけを文字単位でケースフォールドして比較する。
fn find_literal(text: &str, pattern: &str, case_sensitive: bool) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    let chars: Vec<char> = text.chars().collect();
    let pattern_chars: Vec<char> = pattern.chars().collect();
    if pattern_chars.len() > chars.len() {
        return None;
    }

    let last_start = chars.len() - pattern_chars.len();
    'outer: for start in 0..=last_start {
        for (offset, pat_ch) in pattern_chars.iter().enumerate() {
            if !chars_equal(chars[start + offset], *pat_ch, case_sensitive) {
                continue 'outer;
            }
        }
        return Some(start);
    }
    None
}

fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        return a == b;
    }
    a.to_lowercase().eq(b.to_lowercase())
}
