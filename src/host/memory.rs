//! インメモリホスト
//!
//! テストとベンチマークが使うリファレンス実装。行ベクタで
//! ドキュメントを保持し、HostEditorの全操作を素直に実装する。
//! 表示系の操作は後から検証できるように記録だけ残す。

use std::collections::HashMap;

use crate::config::ExtensionConfig;
use crate::document::{DocumentSnapshot, Position, Range, Selection};
use crate::error::HostResult;
use crate::host::{
    BuiltinMove, DecorationStyle, HostEditor, PassthroughCommand, RevealKind,
};

const PAGE_SIZE: usize = 10;

/// テスト用インメモリホスト
#[derive(Debug, Clone)]
pub struct MemoryHost {
    lines: Vec<String>,
    selections: Vec<Selection>,
    clipboard: String,
    config: ExtensionConfig,
    undo_stack: Vec<(Vec<String>, Vec<Selection>)>,
    /// 表示中の行。Noneなら全行が見えている扱い
    viewport: Option<Vec<usize>>,
    // 検証用の記録
    pub decorations: HashMap<DecorationStyle, Vec<Range>>,
    pub revealed: Vec<(Range, RevealKind)>,
    pub page_up_scrolls: usize,
    pub folded_lines: Vec<usize>,
    pub fold_active: bool,
    pub messages: Vec<String>,
    pub status_messages: Vec<String>,
    pub swiper_context: bool,
}

impl MemoryHost {
    /// 空のドキュメントで作成
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// テキストからドキュメントを作成
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            selections: vec![Selection::caret(Position::new(0, 0))],
            clipboard: String::new(),
            config: ExtensionConfig::default(),
            undo_stack: Vec::new(),
            viewport: None,
            decorations: HashMap::new(),
            revealed: Vec::new(),
            page_up_scrolls: 0,
            folded_lines: Vec::new(),
            fold_active: false,
            messages: Vec::new(),
            status_messages: Vec::new(),
            swiper_context: false,
        }
    }

    /// 設定を差し替える
    pub fn with_config(mut self, config: ExtensionConfig) -> Self {
        self.config = config;
        self
    }

    /// 表示範囲を制限する（テスト用途）
    pub fn set_viewport(&mut self, lines: Vec<usize>) {
        self.viewport = Some(lines);
    }

    /// ドキュメント全体のテキスト
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// クリップボード内容（検証用）
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// カーソルをキャレットとして置く
    pub fn place_caret(&mut self, position: Position) {
        self.selections = vec![Selection::caret(position)];
    }

    /// 複数キャレットを置く
    pub fn place_carets(&mut self, positions: &[Position]) {
        self.selections = positions.iter().copied().map(Selection::caret).collect();
    }

    /// 選択を1つ置く
    pub fn select(&mut self, anchor: Position, active: Position) {
        self.selections = vec![Selection::new(anchor, active)];
    }

    /// 指定スタイルの装飾範囲（検証用）
    pub fn decoration_ranges(&self, style: DecorationStyle) -> &[Range] {
        self.decorations.get(&style).map(Vec::as_slice).unwrap_or(&[])
    }

    fn push_undo(&mut self) {
        self.undo_stack.push((self.lines.clone(), self.selections.clone()));
    }

    fn clamp_position(&self, position: Position) -> Position {
        let line = position.line.min(self.lines.len().saturating_sub(1));
        let character = position.character.min(self.line_len(line));
        Position::new(line, character)
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// (行, 桁)をドキュメント全体の文字オフセットへ変換
    fn char_offset(&self, position: Position) -> usize {
        let mut offset = 0;
        for line in 0..position.line {
            offset += self.line_len(line) + 1; // 改行分
        }
        offset + position.character
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (line, text) in self.lines.iter().enumerate() {
            let len = text.chars().count();
            if remaining <= len {
                return Position::new(line, remaining);
            }
            remaining -= len + 1;
        }
        Position::new(
            self.lines.len().saturating_sub(1),
            self.line_len(self.lines.len().saturating_sub(1)),
        )
    }

    fn replace_chars(&mut self, start: usize, end: usize, replacement: &str) {
        let chars: Vec<char> = self.text().chars().collect();
        let mut text: String = chars[..start.min(chars.len())].iter().collect();
        text.push_str(replacement);
        text.extend(chars[end.min(chars.len())..].iter());
        self.lines = text.split('\n').map(str::to_string).collect();
    }

    fn delete_range(&mut self, range: Range) {
        let start = self.char_offset(self.clamp_position(range.start));
        let end = self.char_offset(self.clamp_position(range.end));
        self.replace_chars(start, end, "");
    }

    fn move_position(&self, position: Position, motion: BuiltinMove) -> Position {
        let last_line = self.lines.len().saturating_sub(1);
        match motion {
            BuiltinMove::Up => {
                let line = position.line.saturating_sub(1);
                Position::new(line, position.character.min(self.line_len(line)))
            }
            BuiltinMove::Down => {
                let line = (position.line + 1).min(last_line);
                Position::new(line, position.character.min(self.line_len(line)))
            }
            BuiltinMove::Left => {
                if position.character > 0 {
                    Position::new(position.line, position.character - 1)
                } else if position.line > 0 {
                    Position::new(position.line - 1, self.line_len(position.line - 1))
                } else {
                    position
                }
            }
            BuiltinMove::Right => {
                if position.character < self.line_len(position.line) {
                    Position::new(position.line, position.character + 1)
                } else if position.line < last_line {
                    Position::new(position.line + 1, 0)
                } else {
                    position
                }
            }
            BuiltinMove::LineStart => Position::new(position.line, 0),
            BuiltinMove::LineEnd => Position::new(position.line, self.line_len(position.line)),
            BuiltinMove::PageUp => {
                let line = position.line.saturating_sub(PAGE_SIZE);
                Position::new(line, position.character.min(self.line_len(line)))
            }
            BuiltinMove::PageDown => {
                let line = (position.line + PAGE_SIZE).min(last_line);
                Position::new(line, position.character.min(self.line_len(line)))
            }
            BuiltinMove::BufferStart => Position::new(0, 0),
            BuiltinMove::BufferEnd => Position::new(last_line, self.line_len(last_line)),
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEditor for MemoryHost {
    fn has_document(&self) -> bool {
        true
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, line: usize) -> String {
        self.lines.get(line).cloned().unwrap_or_default()
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn word_range_at(&self, position: Position) -> Option<Range> {
        let chars: Vec<char> = self.lines.get(position.line)?.chars().collect();
        let is_word = |ch: char| ch.is_ascii_alphanumeric() || ch == '_';

        let mut index = position.character.min(chars.len());
        if index >= chars.len() || !is_word(chars[index]) {
            // カーソル直前の単語も対象にする
            if index > 0 && is_word(chars[index - 1]) {
                index -= 1;
            } else {
                return None;
            }
        }

        let mut start = index;
        while start > 0 && is_word(chars[start - 1]) {
            start -= 1;
        }
        let mut end = index;
        while end < chars.len() && is_word(chars[end]) {
            end += 1;
        }
        Some(Range::new(
            Position::new(position.line, start),
            Position::new(position.line, end),
        ))
    }

    fn visible_lines(&self) -> Vec<usize> {
        match &self.viewport {
            Some(lines) => lines.clone(),
            None => (0..self.lines.len()).collect(),
        }
    }

    fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        if !selections.is_empty() {
            self.selections = selections;
        }
    }

    fn apply_deletes(&mut self, ranges: &[Range]) -> HostResult<bool> {
        if ranges.is_empty() {
            return Ok(true);
        }
        self.push_undo();
        // 先頭からの削除量を追跡しつつ、末尾側から適用する
        let mut ordered: Vec<Range> = ranges.to_vec();
        ordered.sort_by(|a, b| a.start.cmp(&b.start));
        let offsets: Vec<(usize, usize)> = ordered
            .iter()
            .map(|range| {
                (
                    self.char_offset(self.clamp_position(range.start)),
                    self.char_offset(self.clamp_position(range.end)),
                )
            })
            .collect();
        for range in ordered.iter().rev() {
            self.delete_range(*range);
        }
        // 削除位置ごとにカーソルを残す
        let mut removed = 0;
        let mut carets = Vec::with_capacity(offsets.len());
        for (start, end) in offsets {
            carets.push(Selection::caret(
                self.offset_to_position(start.saturating_sub(removed)),
            ));
            removed += end - start;
        }
        self.selections = carets;
        Ok(true)
    }

    fn insert_text(&mut self, position: Position, text: &str) -> HostResult<()> {
        self.push_undo();
        let offset = self.char_offset(self.clamp_position(position));
        self.replace_chars(offset, offset, text);
        Ok(())
    }

    fn paste(&mut self, text: &str) -> HostResult<()> {
        self.push_undo();
        let mut ordered = self.selections.clone();
        ordered.sort_by(|a, b| b.start().cmp(&a.start()));
        let mut new_carets = Vec::new();
        for selection in ordered {
            let start = self.char_offset(self.clamp_position(selection.start()));
            let end = self.char_offset(self.clamp_position(selection.end()));
            self.replace_chars(start, end, text);
            new_carets.push(self.offset_to_position(start + text.chars().count()));
        }
        new_carets.reverse();
        self.selections = new_carets.into_iter().map(Selection::caret).collect();
        Ok(())
    }

    fn delete_current_lines(&mut self) -> HostResult<()> {
        self.push_undo();
        let mut lines: Vec<usize> = self.selections.iter().map(|s| s.active.line).collect();
        lines.sort_unstable();
        lines.dedup();
        for line in lines.into_iter().rev() {
            if self.lines.len() > 1 {
                self.lines.remove(line);
            } else {
                self.lines[0].clear();
            }
        }
        let caret = self.clamp_position(self.selections[0].active);
        self.selections = vec![Selection::caret(caret)];
        Ok(())
    }

    fn undo(&mut self) -> HostResult<()> {
        if let Some((lines, selections)) = self.undo_stack.pop() {
            self.lines = lines;
            self.selections = selections;
        }
        Ok(())
    }

    fn cursor_move(&mut self, motion: BuiltinMove, extend: bool) -> HostResult<()> {
        self.selections = self
            .selections
            .iter()
            .map(|selection| {
                let target = self.move_position(selection.active, motion);
                if extend {
                    Selection::new(selection.anchor, target)
                } else {
                    Selection::caret(target)
                }
            })
            .collect();
        Ok(())
    }

    fn run_passthrough(&mut self, command: PassthroughCommand) -> HostResult<()> {
        match command {
            PassthroughCommand::IndentLines => {
                self.push_undo();
                let lines: Vec<usize> = self
                    .selections
                    .iter()
                    .flat_map(|s| s.start().line..=s.end().line)
                    .collect();
                for line in lines {
                    if let Some(text) = self.lines.get_mut(line) {
                        text.insert(0, '\t');
                    }
                }
            }
            PassthroughCommand::Outdent => {
                self.push_undo();
                let lines: Vec<usize> = self
                    .selections
                    .iter()
                    .flat_map(|s| s.start().line..=s.end().line)
                    .collect();
                for line in lines {
                    if let Some(text) = self.lines.get_mut(line) {
                        if text.starts_with('\t') || text.starts_with(' ') {
                            text.remove(0);
                        }
                    }
                }
            }
            PassthroughCommand::AddCommentLine => {
                self.push_undo();
                for line in 0..self.lines.len() {
                    let covered = self
                        .selections
                        .iter()
                        .any(|s| (s.start().line..=s.end().line).contains(&line));
                    if covered {
                        self.lines[line].insert_str(0, "// ");
                    }
                }
            }
            PassthroughCommand::RemoveCommentLine => {
                self.push_undo();
                for line in 0..self.lines.len() {
                    let covered = self
                        .selections
                        .iter()
                        .any(|s| (s.start().line..=s.end().line).contains(&line));
                    if covered && self.lines[line].starts_with("// ") {
                        self.lines[line] = self.lines[line][3..].to_string();
                    }
                }
            }
            PassthroughCommand::Undo => return self.undo(),
            PassthroughCommand::Redo => {}
        }
        Ok(())
    }

    fn clipboard_read(&mut self) -> HostResult<String> {
        Ok(self.clipboard.clone())
    }

    fn clipboard_write(&mut self, text: &str) -> HostResult<()> {
        self.clipboard = text.to_string();
        Ok(())
    }

    fn reveal(&mut self, range: Range, kind: RevealKind) {
        self.revealed.push((range, kind));
    }

    fn scroll_page_up(&mut self) {
        self.page_up_scrolls += 1;
    }

    fn fold_lines(&mut self, lines: &[usize]) {
        self.folded_lines = lines.to_vec();
        self.fold_active = true;
    }

    fn unfold_all(&mut self) {
        self.folded_lines.clear();
        self.fold_active = false;
    }

    fn set_decorations(&mut self, style: DecorationStyle, ranges: &[Range]) {
        if ranges.is_empty() {
            self.decorations.remove(&style);
        } else {
            self.decorations.insert(style, ranges.to_vec());
        }
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn set_status_message(&mut self, message: &str) {
        self.status_messages.push(message.to_string());
    }

    fn set_swiper_context(&mut self, active: bool) {
        self.swiper_context = active;
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot::from_lines(self.lines.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_splits_lines() {
        let host = MemoryHost::from_text("one\ntwo\nthree");
        assert_eq!(host.line_count(), 3);
        assert_eq!(host.line_text(1), "two");
        assert_eq!(host.text(), "one\ntwo\nthree");
    }

    #[test]
    fn delete_joins_lines() {
        let mut host = MemoryHost::from_text("one\ntwo");
        host.apply_deletes(&[Range::new(Position::new(0, 3), Position::new(1, 0))])
            .unwrap();
        assert_eq!(host.text(), "onetwo");
    }

    #[test]
    fn insert_splits_lines() {
        let mut host = MemoryHost::from_text("ab");
        host.insert_text(Position::new(0, 1), "x\ny").unwrap();
        assert_eq!(host.text(), "ax\nyb");
    }

    #[test]
    fn paste_replaces_selection() {
        let mut host = MemoryHost::from_text("hello world");
        host.select(Position::new(0, 0), Position::new(0, 5));
        host.paste("bye").unwrap();
        assert_eq!(host.text(), "bye world");
        assert_eq!(host.selections()[0], Selection::caret(Position::new(0, 3)));
    }

    #[test]
    fn undo_restores_text() {
        let mut host = MemoryHost::from_text("keep");
        host.insert_text(Position::new(0, 4), "!").unwrap();
        assert_eq!(host.text(), "keep!");
        host.undo().unwrap();
        assert_eq!(host.text(), "keep");
    }

    #[test]
    fn word_range_covers_cursor_word() {
        let host = MemoryHost::from_text("let foo_bar = 1;");
        let range = host.word_range_at(Position::new(0, 6)).unwrap();
        assert_eq!(range.start, Position::new(0, 4));
        assert_eq!(range.end, Position::new(0, 11));
        assert!(host.word_range_at(Position::new(0, 12)).is_none());
    }

    #[test]
    fn word_range_just_after_word() {
        let host = MemoryHost::from_text("foo = 1");
        let range = host.word_range_at(Position::new(0, 3)).unwrap();
        assert_eq!(range.start, Position::new(0, 0));
        assert_eq!(range.end, Position::new(0, 3));
    }

    #[test]
    fn cursor_move_clamps_column() {
        let mut host = MemoryHost::from_text("long line\nab");
        host.place_caret(Position::new(0, 8));
        host.cursor_move(BuiltinMove::Down, false).unwrap();
        assert_eq!(host.selections()[0].active, Position::new(1, 2));
    }

    #[test]
    fn delete_current_lines_removes_cursor_lines() {
        let mut host = MemoryHost::from_text("a\nb\nc");
        host.place_carets(&[Position::new(0, 0), Position::new(2, 0)]);
        host.delete_current_lines().unwrap();
        assert_eq!(host.text(), "b");
    }
}
