//! 永続単語ハイライト
//!
//! 選択テキストまたはカーソル下の単語をトグル式でハイライトする。
//! 単語はスロットに保持し、色はスロット番号で決まる。削除は
//! スロットを空にするだけで位置を詰めない（他の単語の色が
//! ずれないようにするため）。

use regex::RegexBuilder;

use crate::document::{Position, Range};
use crate::host::{DecorationStyle, HostEditor};

/// 単語ハイライトの管理
#[derive(Debug, Clone, Default)]
pub struct WordHighlighter {
    /// 占有/空をタグ付けしたスロット列
    slots: Vec<Option<String>>,
}

impl WordHighlighter {
    /// 空の状態を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 占有中のスロット数（テスト用途）
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// スロット列への参照（テスト用途）
    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// 選択中の単語をトグルする
    ///
    /// 既にあれば外し、なければ最初の空スロットを再利用して加える。
    pub fn toggle_selected_word<H: HostEditor>(&mut self, host: &mut H) {
        if !host.has_document() {
            return;
        }
        let Some(pattern) = selected_word_pattern(host) else {
            return;
        };

        if let Some(index) = self
            .slots
            .iter()
            .position(|slot| slot.as_deref() == Some(pattern.as_str()))
        {
            self.slots[index] = None;
        } else if let Some(index) = self.slots.iter().position(Option::is_none) {
            self.slots[index] = Some(pattern);
        } else {
            self.slots.push(Some(pattern));
        }

        self.decorate(host);
    }

    /// すべてのハイライトを外す
    pub fn clear_all<H: HostEditor>(&mut self, host: &mut H) {
        self.slots.clear();
        self.decorate(host);
    }

    /// 最後のスロットを外す
    pub fn clear_last<H: HostEditor>(&mut self, host: &mut H) {
        self.slots.pop();
        self.decorate(host);
    }

    /// ドキュメント変更・エディタ切り替えに伴う再描画
    pub fn refresh<H: HostEditor>(&self, host: &mut H) {
        self.decorate(host);
    }

    /// 占有スロットごとに全文を走査して装飾を更新する
    fn decorate<H: HostEditor>(&self, host: &mut H) {
        if !host.has_document() {
            return;
        }
        let palette_len = host.config().highlight.colors.len();
        if palette_len == 0 {
            return;
        }
        let ignore_case = host.config().highlight.ignore_case;

        let lines: Vec<String> = (0..host.line_count()).map(|i| host.line_text(i)).collect();
        let text = lines.join("\n");
        let index = OffsetIndex::new(&text);

        let mut buckets: Vec<Vec<Range>> = vec![Vec::new(); palette_len];
        for (slot, word) in self.slots.iter().enumerate() {
            let Some(word) = word else {
                continue;
            };
            let Ok(regex) = RegexBuilder::new(word).case_insensitive(ignore_case).build() else {
                continue;
            };
            for found in regex.find_iter(&text) {
                if found.range().is_empty() {
                    continue;
                }
                let range = Range::new(
                    index.position_at(found.start()),
                    index.position_at(found.end()),
                );
                buckets[slot % palette_len].push(range);
            }
        }

        for (palette_index, ranges) in buckets.iter().enumerate() {
            host.set_decorations(DecorationStyle::word_highlight(palette_index), ranges);
        }
    }
}

/// ハイライト対象のパターンを解決する
///
/// 明示的な選択はそのままエスケープし、カーソル下の単語は
/// 単語境界付きの完全一致にする。
fn selected_word_pattern<H: HostEditor>(host: &H) -> Option<String> {
    let selection = host.primary_selection()?;
    let snapshot = host.snapshot();

    let selected = snapshot.text_in_range(selection.range());
    if !selected.is_empty() {
        return Some(regex::escape(&selected));
    }

    let range = host.word_range_at(selection.start())?;
    let word = snapshot.text_in_range(range);
    if word.is_empty() {
        return None;
    }
    Some(format!(r"\b{}\b", regex::escape(&word)))
}

/// バイトオフセットから(行, 桁)を引くための索引
struct OffsetIndex {
    /// 各行の先頭バイトオフセット
    line_starts: Vec<usize>,
    /// 行ごとのテキスト（桁計算用）
    lines: Vec<String>,
}

impl OffsetIndex {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            line_starts,
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    fn position_at(&self, byte_offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&byte_offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let column_bytes = byte_offset - self.line_starts[line];
        let column = self.lines[line]
            .get(..column_bytes)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        Position::new(line, column)
    }
}
