use criterion::{black_box, criterion_group, criterion_main, Criterion};

use emil::document::{DocumentSnapshot, Position};
use emil::motion::{find_word_end_right, find_word_part_end_right};

fn build_document(lines: usize) -> DocumentSnapshot {
    let text: Vec<String> = (0..lines)
        .map(|i| format!("let someCamelCase_{} = parse_input_{}(arg{});", i, i, i))
        .collect();
    DocumentSnapshot::from_lines(text)
}

fn bench_word_walks(c: &mut Criterion) {
    let doc = build_document(200);

    c.bench_function("word_end_right_full_walk", |b| {
        b.iter(|| {
            let mut pos = Position::new(0, 0);
            loop {
                let next = find_word_end_right(&doc, black_box(pos));
                if next == pos {
                    break;
                }
                pos = next;
            }
            black_box(pos)
        })
    });

    c.bench_function("word_part_end_right_full_walk", |b| {
        b.iter(|| {
            let mut pos = Position::new(0, 0);
            loop {
                let next = find_word_part_end_right(&doc, black_box(pos));
                if next == pos {
                    break;
                }
                pos = next;
            }
            black_box(pos)
        })
    });
}

fn bench_snapshot_build(c: &mut Criterion) {
    let lines: Vec<String> = (0..500)
        .map(|i| format!("line {} with someWords and_underscores{}", i, i))
        .collect();

    c.bench_function("snapshot_from_lines_500", |b| {
        b.iter(|| DocumentSnapshot::from_lines(black_box(&lines)))
    });
}

criterion_group!(benches, bench_word_walks, bench_snapshot_build);
criterion_main!(benches);
