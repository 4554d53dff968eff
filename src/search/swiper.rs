//! swiper検索セッション
//!
//! インクリメンタルな行検索の対話セッション。入力のたびに全行を
//! 再評価し、結果リスト・アクティブ項目・装飾色を更新する。
//! 確定した値と選択項目はセッションをまたいで持ち越される。
//! ピッカーUI自体はホストの担当で、ここは値変更・アクティブ変更・
//! 確定・クローズの各イベントに応答する状態機械を提供する。

use super::decoration::{bucket_matches, MatchDecorations, PALETTE_SIZE};
use super::history::SearchHistory;
use super::matcher::{LineMatcher, MatchedLine};
use super::query::parse_query;
use crate::document::{Position, Range, Selection};
use crate::error::HostResult;
use crate::host::{DecorationStyle, HostEditor, RevealKind};

/// 検索欄の初期プロンプト。この値のままでは検索しない
pub const PROMPT_STRING: &str = "type 2 or more chars to search";

/// 検索を実行する最小文字数
const MIN_QUERY_LEN: usize = 2;

/// 結果リストの表示項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    /// 行番号とクエリを埋め込んだラベル
    pub label: String,
    /// 行テキスト
    pub description: String,
    pub line: usize,
    pub ranges: Vec<(usize, usize)>,
}

/// セッションをまたいで持ち越す状態
#[derive(Debug, Clone)]
struct SwiperState {
    last_value: String,
    last_selected: Option<SearchItem>,
}

/// ピッカーが開いている間だけ存在する状態
#[derive(Debug, Clone)]
struct PickerState {
    value: String,
    /// 履歴ナビゲーション開始時に退避した入力
    stash: String,
    history_index: Option<usize>,
    original_selection: Selection,
    initial_cursor_line: usize,
    accepted: bool,
}

/// swiper検索の状態機械
#[derive(Debug)]
pub struct SwiperSession {
    state: SwiperState,
    history: SearchHistory,
    picker: Option<PickerState>,
    items: Vec<SearchItem>,
    matches: Vec<MatchedLine>,
    active_index: Option<usize>,
    /// 直近に強調したアクティブ行。次の検索まで持ち越される
    active_line: Option<usize>,
}

impl SwiperSession {
    /// 新しいセッション管理を作成
    pub fn new() -> Self {
        Self {
            state: SwiperState {
                last_value: PROMPT_STRING.to_string(),
                last_selected: None,
            },
            history: SearchHistory::new(),
            picker: None,
            items: Vec::new(),
            matches: Vec::new(),
            active_index: None,
            active_line: None,
        }
    }

    /// ピッカーが開いているか
    pub fn is_active(&self) -> bool {
        self.picker.is_some()
    }

    /// 現在の結果リスト
    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    /// アクティブ項目の番号
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// 現在の入力値
    pub fn value(&self) -> Option<&str> {
        self.picker.as_ref().map(|p| p.value.as_str())
    }

    /// 履歴への参照（テスト用途）
    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// 検索セッションを開く
    ///
    /// 初期クエリは選択テキスト、なければカーソル下の単語、
    /// どちらもなければ前回の値。
    pub fn open<H: HostEditor>(&mut self, host: &mut H) {
        if !host.has_document() || self.picker.is_some() {
            return;
        }

        let Some(selection) = host.primary_selection() else {
            return;
        };
        let snapshot = host.snapshot();
        let selected_text = snapshot.text_in_range(selection.range());
        let initial_search = if !selected_text.is_empty() {
            selected_text
        } else {
            host.word_range_at(selection.start())
                .map(|range| snapshot.text_in_range(range))
                .unwrap_or_default()
        };
        if !initial_search.is_empty() {
            self.state = SwiperState {
                last_value: initial_search,
                last_selected: None,
            };
        }

        let value = self.state.last_value.clone();
        self.picker = Some(PickerState {
            value: value.clone(),
            stash: String::new(),
            history_index: None,
            original_selection: selection,
            initial_cursor_line: selection.active.line,
            accepted: false,
        });
        self.items.clear();
        self.matches.clear();
        self.active_index = None;
        self.active_line = None;
        host.set_swiper_context(true);

        self.value_changed(host, &value);
    }

    /// 入力値の変更
    pub fn value_changed<H: HostEditor>(&mut self, host: &mut H, value: &str) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        picker.value = value.to_string();
        let initial_line = picker.initial_cursor_line;

        if value.chars().count() < MIN_QUERY_LEN || value == PROMPT_STRING {
            return;
        }

        let terms = parse_query(value);
        let matcher = LineMatcher::new(&terms);
        let lines: Vec<String> = (0..host.line_count()).map(|i| host.line_text(i)).collect();
        let matches = matcher.search_lines(&lines);
        log::debug!("swiper {:?}: {} terms, {} lines matched", value, terms.len(), matches.len());

        self.items = matches
            .iter()
            .map(|m| SearchItem {
                label: format!("{}: {} ", left_pad(m.line + 1), value),
                description: lines.get(m.line).cloned().unwrap_or_default(),
                line: m.line,
                ranges: m.ranges.clone(),
            })
            .collect();
        self.matches = matches;
        self.active_index = None;

        let carried = if self.state.last_value == value {
            self.state.last_selected.as_ref()
        } else {
            None
        };
        if let Some(last) = carried {
            self.active_index = self
                .items
                .iter()
                .position(|item| item.label == last.label && item.line == last.line);
        } else {
            self.active_index = self
                .items
                .iter()
                .position(|item| item.line >= initial_line)
                .or_else(|| {
                    // カーソル以降にマッチがなければ、その手前で最も近いもの
                    if self.items.is_empty() {
                        None
                    } else {
                        Some(self.items.len() - 1)
                    }
                });
        }

        let active_line = self.active_index.map(|idx| self.items[idx].line);
        self.update_match_colors(host, active_line);
        if self.active_index.is_some() {
            self.focus_on_active(host);
        }
    }

    /// アクティブ項目の変更（結果リスト内の移動）
    pub fn active_changed<H: HostEditor>(&mut self, host: &mut H, index: usize) {
        if self.picker.is_none() || index >= self.items.len() {
            return;
        }
        self.active_index = Some(index);
        self.focus_on_active(host);
    }

    /// アクティブ項目で確定する
    pub fn accept<H: HostEditor>(&mut self, host: &mut H) {
        let Some(picker) = self.picker.as_ref() else {
            return;
        };
        let Some(index) = self.active_index else {
            return;
        };
        let Some(item) = self.items.get(index).cloned() else {
            return;
        };

        let value = picker.value.clone();
        self.add_to_history(&value);
        self.state = SwiperState {
            last_value: value,
            last_selected: Some(item.clone()),
        };
        if let Some(picker) = self.picker.as_mut() {
            picker.accepted = true;
        }
        self.hide(host);
        self.jump_to(host, &item);
    }

    /// ピッカーを閉じる
    ///
    /// 確定なしで閉じた場合はセッション開始時の選択と表示位置を戻す。
    pub fn hide<H: HostEditor>(&mut self, host: &mut H) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        self.clear_decorations(host);
        if !picker.accepted {
            let selection = picker.original_selection;
            host.reveal(selection.range(), RevealKind::Center);
            host.set_selections(vec![selection]);
        }
        host.set_swiper_context(false);
        self.items.clear();
        self.matches.clear();
        self.active_index = None;
        self.active_line = None;
    }

    /// 履歴をひとつ古い方へ
    pub fn history_up<H: HostEditor>(&mut self, host: &mut H) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        if self.history.is_empty() {
            return;
        }

        // ナビゲーション開始時の入力を退避する
        if picker.history_index.is_none() {
            picker.stash = picker.value.clone();
        }

        let current = picker.value.clone();
        let mut index = picker.history_index;
        let mut new_value = None;
        // 現在の入力と一致するエントリは読み飛ばす
        while index.map_or(0, |i| i + 1) < self.history.len() {
            let next = index.map_or(0, |i| i + 1);
            index = Some(next);
            if self.history.get(next) != Some(&current) {
                new_value = self.history.get(next).cloned();
                break;
            }
        }
        picker.history_index = index;

        if let Some(value) = new_value {
            self.value_changed(host, &value);
        }
    }

    /// 履歴をひとつ新しい方へ。最新を越えたら退避した入力に戻す
    pub fn history_down<H: HostEditor>(&mut self, host: &mut H) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };

        match picker.history_index {
            Some(index) if index > 0 => {
                picker.history_index = Some(index - 1);
                if let Some(value) = self.history.get(index - 1).cloned() {
                    self.value_changed(host, &value);
                }
            }
            Some(0) => {
                picker.history_index = None;
                let stash = picker.stash.clone();
                self.value_changed(host, &stash);
            }
            _ => {}
        }
    }

    /// アクティブな結果の行をクリップボードへコピーする
    pub fn copy_current_line<H: HostEditor>(&mut self, host: &mut H) -> HostResult<()> {
        if self.picker.is_none() || !host.has_document() {
            return Ok(());
        }
        let Some(index) = self.active_index else {
            return Ok(());
        };
        let Some(item) = self.items.get(index) else {
            return Ok(());
        };

        let line_text = host.line_text(item.line);
        host.clipboard_write(&line_text)?;
        host.show_message("Line copied to clipboard");
        Ok(())
    }

    fn add_to_history(&mut self, value: &str) {
        if value.is_empty() || value == PROMPT_STRING || value.chars().count() < MIN_QUERY_LEN {
            return;
        }
        self.history.add_entry(value.to_string());
    }

    fn focus_on_active<H: HostEditor>(&mut self, host: &mut H) {
        let Some(index) = self.active_index else {
            return;
        };
        let Some(item) = self.items.get(index) else {
            return;
        };
        let line = item.line;
        let top = Position::new(line, 0);
        host.reveal(Range::new(top, top), RevealKind::Center);
        host.set_selections(vec![Selection::caret(top)]);
        self.update_match_colors(host, Some(line));
    }

    fn jump_to<H: HostEditor>(&self, host: &mut H, item: &SearchItem) {
        // 最後に記録された範囲へ移動する
        let (start, end) = match item.ranges.last() {
            Some(&(offset, len)) => (offset, offset + len),
            None => (0, 0),
        };
        let select_match = host.config().swiper.select_match;
        let anchor = Position::new(item.line, if select_match { start } else { end });
        let active = Position::new(item.line, end);
        host.set_selections(vec![Selection::new(anchor, active)]);
    }

    fn update_match_colors<H: HostEditor>(&mut self, host: &mut H, active_line: Option<usize>) {
        if active_line.is_some() {
            self.active_line = active_line;
        }
        let decorations = bucket_matches(&self.matches, self.active_line);
        apply_decorations(host, &decorations);
    }

    fn clear_decorations<H: HostEditor>(&self, host: &mut H) {
        apply_decorations(host, &MatchDecorations::empty());
    }
}

impl Default for SwiperSession {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_decorations<H: HostEditor>(host: &mut H, decorations: &MatchDecorations) {
    for index in 0..PALETTE_SIZE {
        host.set_decorations(DecorationStyle::match_border(index), &decorations.plain[index]);
        host.set_decorations(
            DecorationStyle::match_border_active(index),
            &decorations.active[index],
        );
    }
}

/// 1始まりの行番号を4桁ゼロ埋めで表示する
fn left_pad(line_number: usize) -> String {
    format!("{:04}", line_number)
}
