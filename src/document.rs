//! ドキュメント座標系
//!
//! ホストエディタの(行, 桁)座標で表す位置・範囲・選択と、
//! コマンド実行中に参照する行スナップショット

use std::cmp::min;

/// ドキュメント内の位置（0ベースの行と桁、文字単位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 行番号
    pub line: usize,
    /// 行内の桁（文字オフセット）
    pub character: usize,
}

impl Position {
    /// 新しい位置を作成
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// start <= end が保証された範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// 2点から範囲を作成（順序は自動的に正規化する）
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// 空範囲かどうか
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 単一行に収まっているか
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// アンカーとアクティブ位置を持つ選択
///
/// anchor == active はカーソル（空選択）を表す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// 選択の固定端
    pub anchor: Position,
    /// カーソルのある端
    pub active: Position,
}

impl Selection {
    /// アンカーとアクティブ位置から選択を作成
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// 指定位置のカーソル（空選択）を作成
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position,
            active: position,
        }
    }

    /// 空選択かどうか
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// 選択の小さい側の端
    pub fn start(&self) -> Position {
        min_position(self.anchor, self.active)
    }

    /// 選択の大きい側の端
    pub fn end(&self) -> Position {
        if self.anchor <= self.active {
            self.active
        } else {
            self.anchor
        }
    }

    /// 正規化された範囲に変換
    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }
}

fn min_position(a: Position, b: Position) -> Position {
    if a <= b {
        a
    } else {
        b
    }
}

/// コマンド実行中のドキュメント内容のスナップショット
///
/// 1コマンドの間はホスト内容が変化しない前提で、行テキストを
/// 文字ベクタとして保持し、位置演算を文字単位で行う。
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    lines: Vec<Vec<char>>,
}

impl DocumentSnapshot {
    /// 行テキストの列からスナップショットを構築
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected: Vec<Vec<char>> = lines
            .into_iter()
            .map(|line| line.as_ref().chars().collect())
            .collect();
        if collected.is_empty() {
            // 空ドキュメントも1行として扱う
            collected.push(Vec::new());
        }
        Self { lines: collected }
    }

    /// テキスト全体からスナップショットを構築
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split('\n'))
    }

    /// 行数
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// 指定行の文字数
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(Vec::len).unwrap_or(0)
    }

    /// 指定行のテキスト
    pub fn line_text(&self, line: usize) -> String {
        self.lines
            .get(line)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }

    /// 指定位置の文字。行末・範囲外はNone
    pub fn char_at(&self, position: Position) -> Option<char> {
        self.lines
            .get(position.line)
            .and_then(|chars| chars.get(position.character))
            .copied()
    }

    /// 最終行かどうか
    pub fn is_last_line(&self, line: usize) -> bool {
        line + 1 >= self.lines.len()
    }

    /// 行頭の空白文字数。全て空白の行は行長を返す
    pub fn line_indent(&self, line: usize) -> usize {
        self.lines
            .get(line)
            .map(|chars| chars.iter().take_while(|ch| ch.is_whitespace()).count())
            .unwrap_or(0)
    }

    /// 行が空かどうか
    pub fn line_is_empty(&self, line: usize) -> bool {
        self.line_len(line) == 0
    }

    /// 位置を行内に丸める
    pub fn clamp(&self, position: Position) -> Position {
        let line = min(position.line, self.line_count().saturating_sub(1));
        Position::new(line, min(position.character, self.line_len(line)))
    }

    /// 範囲内のテキストを取り出す（行区切りは\n）
    pub fn text_in_range(&self, range: Range) -> String {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        if start >= end {
            return String::new();
        }

        if start.line == end.line {
            return self.lines[start.line][start.character..end.character]
                .iter()
                .collect();
        }

        let mut out = String::new();
        out.extend(self.lines[start.line][start.character..].iter());
        for line in (start.line + 1)..end.line {
            out.push('\n');
            out.extend(self.lines[line].iter());
        }
        out.push('\n');
        out.extend(self.lines[end.line][..end.character].iter());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_lexicographically() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(1, 1), Position::new(1, 1));
    }

    #[test]
    fn range_normalizes_order() {
        let range = Range::new(Position::new(3, 0), Position::new(1, 2));
        assert_eq!(range.start, Position::new(1, 2));
        assert_eq!(range.end, Position::new(3, 0));
    }

    #[test]
    fn selection_start_end() {
        let selection = Selection::new(Position::new(2, 4), Position::new(0, 1));
        assert_eq!(selection.start(), Position::new(0, 1));
        assert_eq!(selection.end(), Position::new(2, 4));
        assert!(!selection.is_empty());
        assert!(Selection::caret(Position::new(1, 1)).is_empty());
    }

    #[test]
    fn snapshot_char_access() {
        let snapshot = DocumentSnapshot::from_text("ab\ncd");
        assert_eq!(snapshot.line_count(), 2);
        assert_eq!(snapshot.char_at(Position::new(0, 1)), Some('b'));
        // 行末は文字なし
        assert_eq!(snapshot.char_at(Position::new(0, 2)), None);
        assert_eq!(snapshot.char_at(Position::new(5, 0)), None);
    }

    #[test]
    fn snapshot_text_in_range_spans_lines() {
        let snapshot = DocumentSnapshot::from_text("hello\nworld\nlast");
        let range = Range::new(Position::new(0, 3), Position::new(2, 2));
        assert_eq!(snapshot.text_in_range(range), "lo\nworld\nla");
        let single = Range::new(Position::new(1, 1), Position::new(1, 4));
        assert_eq!(snapshot.text_in_range(single), "orl");
    }

    #[test]
    fn snapshot_indent_counts_whitespace() {
        let snapshot = DocumentSnapshot::from_text("  two\n\ttab\nplain\n   ");
        assert_eq!(snapshot.line_indent(0), 2);
        assert_eq!(snapshot.line_indent(1), 1);
        assert_eq!(snapshot.line_indent(2), 0);
        // 空白だけの行は行長
        assert_eq!(snapshot.line_indent(3), 3);
    }

    #[test]
    fn empty_document_has_one_line() {
        let snapshot = DocumentSnapshot::from_text("");
        assert_eq!(snapshot.line_count(), 1);
        assert_eq!(snapshot.line_len(0), 0);
    }
}
