//! 単語・サブワード移動エンジン
//!
//! ドキュメント位置を1文字ずつ歩き、境界述語が成立する最初の
//! 位置を探す。マルチカーソルの移動・削除範囲の計算もここで行う。

pub mod boundary;

use crate::document::{DocumentSnapshot, Position, Range, Selection};

/// 単語系カーソル移動の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordMotion {
    WordRight,
    WordLeft,
    WordPartRight,
    WordPartLeft,
}

/// 位置を1文字進める。行末では次行の先頭へ。ドキュメント末尾ではNone
pub fn next_position(doc: &DocumentSnapshot, pos: Position) -> Option<Position> {
    if pos.character < doc.line_len(pos.line) {
        Some(Position::new(pos.line, pos.character + 1))
    } else if pos.line + 1 < doc.line_count() {
        Some(Position::new(pos.line + 1, 0))
    } else {
        None
    }
}

/// 位置を1文字戻す。行頭では前行の末尾へ。ドキュメント先頭ではNone
pub fn prev_position(doc: &DocumentSnapshot, pos: Position) -> Option<Position> {
    if pos.character > 0 {
        Some(Position::new(pos.line, pos.character - 1))
    } else if pos.line > 0 {
        Some(Position::new(pos.line - 1, doc.line_len(pos.line - 1)))
    } else {
        None
    }
}

/// 右方向に歩いて単語終端を探す
pub fn find_word_end_right(doc: &DocumentSnapshot, pos: Position) -> Position {
    find_right(doc, pos, boundary::is_word_end)
}

/// 右方向に歩いてサブワード終端を探す
pub fn find_word_part_end_right(doc: &DocumentSnapshot, pos: Position) -> Position {
    find_right(doc, pos, boundary::is_word_part_end)
}

/// 左方向に歩いて単語先頭を探す
pub fn find_word_start_left(doc: &DocumentSnapshot, pos: Position) -> Position {
    find_left(doc, pos, boundary::is_word_start)
}

/// 左方向に歩いてサブワード先頭を探す
pub fn find_word_part_start_left(doc: &DocumentSnapshot, pos: Position) -> Position {
    find_left(doc, pos, boundary::is_word_part_start)
}

/// 移動種別に応じた到達位置を計算
pub fn target_position(doc: &DocumentSnapshot, pos: Position, motion: WordMotion) -> Position {
    match motion {
        WordMotion::WordRight => find_word_end_right(doc, pos),
        WordMotion::WordLeft => find_word_start_left(doc, pos),
        WordMotion::WordPartRight => find_word_part_end_right(doc, pos),
        WordMotion::WordPartLeft => find_word_part_start_left(doc, pos),
    }
}

fn find_right<F>(doc: &DocumentSnapshot, mut pos: Position, pred: F) -> Position
where
    F: Fn(Option<char>, Option<char>) -> bool,
{
    loop {
        let Some(next) = next_position(doc, pos) else {
            // ドキュメント末尾に到達: ここまで歩いた位置を返す
            return pos;
        };
        if pred(doc.char_at(pos), doc.char_at(next)) {
            return next;
        }
        pos = next;
    }
}

fn find_left<F>(doc: &DocumentSnapshot, pos: Position, pred: F) -> Position
where
    F: Fn(Option<char>, Option<char>) -> bool,
{
    // Emacs流に、判定を始める前にまず1文字戻る
    let Some(mut pos) = prev_position(doc, pos) else {
        return pos;
    };
    loop {
        let Some(prev) = prev_position(doc, pos) else {
            return pos;
        };
        if pred(doc.char_at(prev), doc.char_at(pos)) {
            return pos;
        }
        pos = prev;
    }
}

/// マルチカーソル移動後の選択を計算
///
/// マークモード中はアンカーを保ったまま選択を伸ばし、
/// それ以外は到達位置のカーソルに畳む。
pub fn motion_selections(
    doc: &DocumentSnapshot,
    selections: &[Selection],
    motion: WordMotion,
    extend: bool,
) -> Vec<Selection> {
    selections
        .iter()
        .map(|selection| {
            let target = target_position(doc, selection.active, motion);
            if extend {
                Selection::new(selection.anchor, target)
            } else {
                Selection::caret(target)
            }
        })
        .collect()
}

/// マルチカーソル削除の範囲を計算
///
/// カーソルごとに移動先までの範囲を求め、開始位置の降順に
/// 並べてから重なり・隣接する範囲を併合する。末尾から先頭への
/// 順序で適用すれば位置の無効化なしに一括削除できる。
pub fn delete_ranges(
    doc: &DocumentSnapshot,
    selections: &[Selection],
    motion: WordMotion,
) -> Vec<Range> {
    let ranges: Vec<Range> = selections
        .iter()
        .map(|selection| {
            let pos = selection.active;
            Range::new(pos, target_position(doc, pos, motion))
        })
        .collect();
    merge_descending(ranges)
}

/// 範囲を開始位置の降順に整列し、重なり・隣接を併合する
pub fn merge_descending(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort_by(|a, b| b.start.cmp(&a.start));

    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if last.start <= range.end => {
                // 降順整列のため last.start <= range.end なら重なるか接している
                let start = if range.start < last.start {
                    range.start
                } else {
                    last.start
                };
                let end = if last.end > range.end { last.end } else { range.end };
                *last = Range { start, end };
            }
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> DocumentSnapshot {
        DocumentSnapshot::from_text(text)
    }

    #[test]
    fn stepping_crosses_line_boundaries() {
        let doc = doc("ab\ncd");
        assert_eq!(
            next_position(&doc, Position::new(0, 2)),
            Some(Position::new(1, 0))
        );
        assert_eq!(
            prev_position(&doc, Position::new(1, 0)),
            Some(Position::new(0, 2))
        );
        assert_eq!(next_position(&doc, Position::new(1, 2)), None);
        assert_eq!(prev_position(&doc, Position::new(0, 0)), None);
    }

    #[test]
    fn word_end_right_stops_after_word() {
        let doc = doc("foo bar");
        assert_eq!(
            find_word_end_right(&doc, Position::new(0, 0)),
            Position::new(0, 3)
        );
        assert_eq!(
            find_word_end_right(&doc, Position::new(0, 3)),
            Position::new(0, 7)
        );
    }

    #[test]
    fn word_start_left_steps_once_before_scanning() {
        let doc = doc("foo bar");
        assert_eq!(
            find_word_start_left(&doc, Position::new(0, 7)),
            Position::new(0, 4)
        );
        assert_eq!(
            find_word_start_left(&doc, Position::new(0, 4)),
            Position::new(0, 0)
        );
    }

    #[test]
    fn word_motion_crosses_lines() {
        let doc = doc("one\ntwo");
        assert_eq!(
            find_word_end_right(&doc, Position::new(0, 3)),
            Position::new(1, 3)
        );
        assert_eq!(
            find_word_start_left(&doc, Position::new(1, 0)),
            Position::new(0, 0)
        );
    }

    #[test]
    fn word_part_motion_stops_inside_camel_case() {
        let doc = doc("fooBarBaz");
        assert_eq!(
            find_word_part_end_right(&doc, Position::new(0, 0)),
            Position::new(0, 3)
        );
        assert_eq!(
            find_word_part_end_right(&doc, Position::new(0, 3)),
            Position::new(0, 6)
        );
        assert_eq!(
            find_word_part_start_left(&doc, Position::new(0, 6)),
            Position::new(0, 3)
        );
    }

    #[test]
    fn edge_calls_return_input_unchanged() {
        let doc = doc("ab");
        assert_eq!(
            find_word_end_right(&doc, Position::new(0, 2)),
            Position::new(0, 2)
        );
        assert_eq!(
            find_word_start_left(&doc, Position::new(0, 0)),
            Position::new(0, 0)
        );
    }

    #[test]
    fn merge_joins_overlapping_and_touching_ranges() {
        let ranges = vec![
            Range::new(Position::new(0, 5), Position::new(0, 13)),
            Range::new(Position::new(0, 12), Position::new(0, 13)),
            Range::new(Position::new(0, 20), Position::new(0, 25)),
        ];
        let merged = merge_descending(ranges);
        assert_eq!(
            merged,
            vec![
                Range::new(Position::new(0, 20), Position::new(0, 25)),
                Range::new(Position::new(0, 5), Position::new(0, 13)),
            ]
        );
    }

    #[test]
    fn merge_keeps_disjoint_ranges() {
        let ranges = vec![
            Range::new(Position::new(0, 0), Position::new(0, 2)),
            Range::new(Position::new(0, 4), Position::new(0, 6)),
        ];
        let merged = merge_descending(ranges);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].start, Position::new(0, 4));
    }

    #[test]
    fn duplicate_cursors_merge_to_single_range() {
        let doc = doc("hello worldZZ end");
        let selections = vec![
            Selection::caret(Position::new(0, 5)),
            Selection::caret(Position::new(0, 12)),
            Selection::caret(Position::new(0, 12)),
        ];
        let ranges = delete_ranges(&doc, &selections, WordMotion::WordRight);
        assert_eq!(
            ranges,
            vec![Range::new(Position::new(0, 5), Position::new(0, 13))]
        );
    }

    #[test]
    fn motion_selections_extend_in_mark_mode() {
        let doc = doc("foo bar");
        let selections = vec![Selection::caret(Position::new(0, 0))];
        let extended = motion_selections(&doc, &selections, WordMotion::WordRight, true);
        assert_eq!(
            extended,
            vec![Selection::new(Position::new(0, 0), Position::new(0, 3))]
        );
        let collapsed = motion_selections(&doc, &selections, WordMotion::WordRight, false);
        assert_eq!(collapsed, vec![Selection::caret(Position::new(0, 3))]);
    }
}
