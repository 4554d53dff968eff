//! ホストエディタ境界
//!
//! コアが呼び出すホストエディタの操作面をトレイトとして定義する。
//! ドキュメント・選択・装飾・クリップボードの実体はホスト側にあり、
//! コアは「何をするか」だけを指示する。

pub mod memory;

pub use memory::MemoryHost;

use crate::config::ExtensionConfig;
use crate::document::{DocumentSnapshot, Position, Range, Selection};
use crate::error::HostResult;

/// 範囲を表示する際のスクロール位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    /// ホスト既定（最小スクロール）
    Default,
    /// 画面中央
    Center,
    /// 画面上端
    Top,
}

/// ホスト組み込みのカーソル移動
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinMove {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    BufferStart,
    BufferEnd,
}

/// マーク解除を抑止したままホストへ転送するコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughCommand {
    IndentLines,
    Outdent,
    AddCommentLine,
    RemoveCommentLine,
    Undo,
    Redo,
}

/// 装飾スタイルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    /// swiperマッチの枠線
    MatchBorder,
    /// アクティブ行のswiperマッチ（枠線+背景）
    MatchBorderActive,
    /// 永続単語ハイライト
    WordHighlight,
}

/// パレット番号付きの装飾スタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationStyle {
    pub kind: DecorationKind,
    pub palette_index: usize,
}

impl DecorationStyle {
    pub fn match_border(palette_index: usize) -> Self {
        Self {
            kind: DecorationKind::MatchBorder,
            palette_index,
        }
    }

    pub fn match_border_active(palette_index: usize) -> Self {
        Self {
            kind: DecorationKind::MatchBorderActive,
            palette_index,
        }
    }

    pub fn word_highlight(palette_index: usize) -> Self {
        Self {
            kind: DecorationKind::WordHighlight,
            palette_index,
        }
    }
}

/// ホストエディタの操作面
///
/// すべての変更系メソッドは完了までホスト側で同期的に処理される
/// 前提（協調的単一スレッドモデル）。失敗はResultで返し、
/// コアは呼び出し側で静かに無視するか伝播するかを決める。
pub trait HostEditor {
    // --- 読み取り ---

    /// アクティブなドキュメントが存在するか
    fn has_document(&self) -> bool;

    /// 行数
    fn line_count(&self) -> usize;

    /// 指定行のテキスト
    fn line_text(&self, line: usize) -> String;

    /// 現在の選択（先頭がプライマリ）
    fn selections(&self) -> Vec<Selection>;

    /// 指定位置を含む単語の範囲
    fn word_range_at(&self, position: Position) -> Option<Range>;

    /// 表示中の行番号
    fn visible_lines(&self) -> Vec<usize>;

    /// 読み取り専用の設定
    fn config(&self) -> &ExtensionConfig;

    // --- 書き込み ---

    /// 選択を置き換える
    fn set_selections(&mut self, selections: Vec<Selection>);

    /// 複数範囲を1回の編集として削除する
    fn apply_deletes(&mut self, ranges: &[Range]) -> HostResult<bool>;

    /// 指定位置にテキストを挿入する
    fn insert_text(&mut self, position: Position, text: &str) -> HostResult<()>;

    /// 各選択をテキストで置き換える（ホストのペースト動作）
    fn paste(&mut self, text: &str) -> HostResult<()>;

    /// カーソルのある行を削除する
    fn delete_current_lines(&mut self) -> HostResult<()>;

    /// ホストのundo
    fn undo(&mut self) -> HostResult<()>;

    /// ホスト組み込みのカーソル移動
    fn cursor_move(&mut self, motion: BuiltinMove, extend: bool) -> HostResult<()>;

    /// マーク保持コマンドの転送
    fn run_passthrough(&mut self, command: PassthroughCommand) -> HostResult<()>;

    // --- クリップボード ---

    fn clipboard_read(&mut self) -> HostResult<String>;

    fn clipboard_write(&mut self, text: &str) -> HostResult<()>;

    // --- 表示 ---

    /// 範囲を表示位置へスクロールする
    fn reveal(&mut self, range: Range, kind: RevealKind);

    /// カーソルを動かさずに1ページ上へスクロールする
    fn scroll_page_up(&mut self);

    /// 指定行を折り畳む
    fn fold_lines(&mut self, lines: &[usize]);

    /// すべての折り畳みを解除する
    fn unfold_all(&mut self);

    /// スタイルごとの装飾範囲を設定する（空スライスでクリア）
    fn set_decorations(&mut self, style: DecorationStyle, ranges: &[Range]);

    /// 通知メッセージ
    fn show_message(&mut self, message: &str);

    /// ステータスバーメッセージ
    fn set_status_message(&mut self, message: &str);

    /// swiper入力中フラグ（キーバインド文脈用）
    fn set_swiper_context(&mut self, active: bool);

    // --- 既定実装 ---

    /// プライマリ選択
    fn primary_selection(&self) -> Option<Selection> {
        self.selections().into_iter().next()
    }

    /// 現在内容のスナップショットを取得
    fn snapshot(&self) -> DocumentSnapshot {
        let lines: Vec<String> = (0..self.line_count()).map(|i| self.line_text(i)).collect();
        DocumentSnapshot::from_lines(lines)
    }
}
