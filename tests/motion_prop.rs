// motion_prop.rs - 位置ステップと境界探索のプロパティテスト

use proptest::prelude::*;

use emil::document::{DocumentSnapshot, Position};
use emil::motion::{
    find_word_end_right, find_word_part_end_right, find_word_part_start_left,
    find_word_start_left, next_position, prev_position,
};

/// 単語・記号・空白・改行が混ざったテキストを生成する
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("word".to_string()),
            Just("Camel".to_string()),
            Just("x1_2".to_string()),
            Just(" ".to_string()),
            Just("-".to_string()),
            Just("\n".to_string()),
        ],
        0..30,
    )
    .prop_map(|parts| parts.concat())
}

/// ドキュメント内の有効な位置をすべて列挙する
fn all_positions(doc: &DocumentSnapshot) -> Vec<Position> {
    let mut positions = Vec::new();
    for line in 0..doc.line_count() {
        for character in 0..=doc.line_len(line) {
            positions.push(Position::new(line, character));
        }
    }
    positions
}

proptest! {
    #[test]
    fn next_then_prev_round_trips(text in arb_text()) {
        let doc = DocumentSnapshot::from_text(&text);
        for pos in all_positions(&doc) {
            if let Some(next) = next_position(&doc, pos) {
                prop_assert_eq!(prev_position(&doc, next), Some(pos));
            }
        }
    }

    #[test]
    fn prev_then_next_round_trips(text in arb_text()) {
        let doc = DocumentSnapshot::from_text(&text);
        for pos in all_positions(&doc) {
            if let Some(prev) = prev_position(&doc, pos) {
                prop_assert_eq!(next_position(&doc, prev), Some(pos));
            }
        }
    }

    #[test]
    fn right_walks_never_move_backward(text in arb_text()) {
        let doc = DocumentSnapshot::from_text(&text);
        for pos in all_positions(&doc) {
            prop_assert!(find_word_end_right(&doc, pos) >= pos);
            prop_assert!(find_word_part_end_right(&doc, pos) >= pos);
        }
    }

    #[test]
    fn left_walks_never_move_forward(text in arb_text()) {
        let doc = DocumentSnapshot::from_text(&text);
        for pos in all_positions(&doc) {
            prop_assert!(find_word_start_left(&doc, pos) <= pos);
            prop_assert!(find_word_part_start_left(&doc, pos) <= pos);
        }
    }

    #[test]
    fn walk_results_stay_in_bounds(text in arb_text()) {
        let doc = DocumentSnapshot::from_text(&text);
        for pos in all_positions(&doc) {
            for target in [
                find_word_end_right(&doc, pos),
                find_word_start_left(&doc, pos),
                find_word_part_end_right(&doc, pos),
                find_word_part_start_left(&doc, pos),
            ] {
                prop_assert!(target.line < doc.line_count());
                prop_assert!(target.character <= doc.line_len(target.line));
            }
        }
    }

    #[test]
    fn repeated_right_walk_terminates(text in arb_text()) {
        let doc = DocumentSnapshot::from_text(&text);
        let mut pos = Position::new(0, 0);
        let mut steps = 0;
        loop {
            let next = find_word_part_end_right(&doc, pos);
            if next == pos {
                break;
            }
            pos = next;
            steps += 1;
            prop_assert!(steps <= text.chars().count() + 1);
        }
    }
}
