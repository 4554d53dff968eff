//! 単語・サブワード境界の判定
//!
//! 隣接2文字(prev, curr)から境界の種類を判定する純粋述語。
//! 単語文字は `[A-Za-z0-9_]`。ドキュメント外・行末はNoneで表し、
//! 単語文字として扱わない。
//!
//! サブワード境界はcamelCase遷移・数字列・アンダースコア区切りで
//! 発生する。is_word_part_start と is_word_part_end は意図的に
//! 完全な鏡像ではない（アンダースコア隣接の扱いと大文字遷移の
//! 方向が異なる）。

fn is_word_char(ch: Option<char>) -> bool {
    matches!(ch, Some(c) if c.is_ascii_alphanumeric() || c == '_')
}

fn is_upper(ch: Option<char>) -> bool {
    matches!(ch, Some(c) if c.is_ascii_uppercase())
}

fn is_lower(ch: Option<char>) -> bool {
    matches!(ch, Some(c) if c.is_ascii_lowercase())
}

fn is_digit(ch: Option<char>) -> bool {
    matches!(ch, Some(c) if c.is_ascii_digit())
}

fn is_underscore(ch: Option<char>) -> bool {
    ch == Some('_')
}

/// 単語の終端: prevが単語文字、currが非単語文字
pub fn is_word_end(prev: Option<char>, curr: Option<char>) -> bool {
    is_word_char(prev) && !is_word_char(curr)
}

/// 単語の先頭: currが単語文字、prevが非単語文字
pub fn is_word_start(prev: Option<char>, curr: Option<char>) -> bool {
    is_word_char(curr) && !is_word_char(prev)
}

/// サブワードの終端
pub fn is_word_part_end(prev: Option<char>, curr: Option<char>) -> bool {
    if !is_word_char(prev) {
        return false;
    }
    if !is_word_char(curr) {
        return true;
    }
    // 両方が単語文字
    if is_underscore(prev) {
        return false;
    }
    if is_underscore(curr) {
        return true;
    }
    // 両方が [a-zA-Z0-9]
    if is_digit(prev) != is_digit(curr) {
        return true;
    }
    if is_digit(prev) && is_digit(curr) {
        return false;
    }
    // 両方が [a-zA-Z]
    is_lower(prev) && is_upper(curr)
}

/// サブワードの先頭
pub fn is_word_part_start(prev: Option<char>, curr: Option<char>) -> bool {
    if !is_word_char(curr) {
        return false;
    }
    if !is_word_char(prev) {
        return true;
    }
    // 両方が単語文字
    if is_underscore(curr) {
        return false;
    }
    if is_underscore(prev) {
        return true;
    }
    // 両方が [a-zA-Z0-9]
    if is_digit(prev) != is_digit(curr) {
        return true;
    }
    if is_digit(prev) && is_digit(curr) {
        return false;
    }
    // 両方が [a-zA-Z]
    is_lower(prev) && is_upper(curr)
}
