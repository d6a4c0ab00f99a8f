//! Annotated, line-numbered diff between two versions of a file.
//!
//! Every line of both versions appears exactly once, prefixed by its old and/or
//! new line number:
//!
//! ```text
//!    1    1  unchanged
//!    2      - removed
//!         2 + added
//! ```
//!
//! A replaced block is rendered as its removed lines followed by its added lines.

use similar::{capture_diff_slices, Algorithm, DiffTag};

use crate::models::DiffLine;

/// Split on the usual line boundaries. A trailing terminator does not produce
/// an empty last line, and `\r\n` counts as one boundary.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let is_break = matches!(
            ch,
            '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
        );
        if !is_break {
            continue;
        }

        lines.push(&text[start..idx]);
        start = idx + ch.len_utf8();

        if ch == '\r' {
            if let Some(&(next_idx, '\n')) = chars.peek() {
                chars.next();
                start = next_idx + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Align the lines of `old` and `new` into a single annotated sequence.
pub fn align(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    let mut lines = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    // Consecutive non-equal ops form one hunk: all removals, then all additions
    let mut removed = Vec::new();
    let mut added = Vec::new();
    let mut old_line_num = 1;
    let mut new_line_num = 1;

    for op in capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines) {
        let (tag, old_range, new_range) = op.as_tag_tuple();

        if tag != DiffTag::Equal {
            for text in &old_lines[old_range] {
                removed.push(DiffLine::Removed { old: old_line_num, text: text.to_string() });
                old_line_num += 1;
            }
            for text in &new_lines[new_range] {
                added.push(DiffLine::Added { new: new_line_num, text: text.to_string() });
                new_line_num += 1;
            }
            continue;
        }

        lines.append(&mut removed);
        lines.append(&mut added);

        for (i, text) in old_lines[old_range.clone()].iter().enumerate() {
            lines.push(DiffLine::Unchanged {
                old: old_line_num + i,
                new: new_line_num + i,
                text: text.to_string(),
            });
        }
        old_line_num += old_range.len();
        new_line_num += new_range.len();
    }

    lines.append(&mut removed);
    lines.append(&mut added);
    lines
}

/// Render the full annotated diff of `old` → `new`.
pub fn render_diff(old: &str, new: &str) -> String {
    align(old, new)
        .iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Listing for a file with no prior version: a header with the line count,
/// then every line marked as added.
pub fn render_added_file(content: &str) -> String {
    let lines = split_lines(content);
    let mut out = Vec::with_capacity(lines.len() + 1);
    out.push(format!("@@ -0,0 +1,{} @@", lines.len()));
    for (i, line) in lines.iter().enumerate() {
        out.push(format!("{:4} +{}", i + 1, line));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// (old number, new number, marker, text) parsed back out of a rendered row
    fn parse_row(row: &str) -> (Option<usize>, Option<usize>, char, &str) {
        let old = row[0..4].trim().parse().ok();
        let new = row[5..9].trim().parse().ok();
        let marker = row[10..11].chars().next().unwrap();
        let text = if marker == ' ' { &row[11..] } else { &row[12..] };
        (old, new, marker, text)
    }

    fn assert_counters_consistent(old: &str, new: &str) {
        let rendered = render_diff(old, new);
        let rows: Vec<_> = if rendered.is_empty() {
            Vec::new()
        } else {
            rendered.split('\n').map(parse_row).collect()
        };

        let olds: Vec<usize> = rows.iter().filter_map(|r| r.0).collect();
        let news: Vec<usize> = rows.iter().filter_map(|r| r.1).collect();

        assert_eq!(olds, (1..=split_lines(old).len()).collect::<Vec<_>>());
        assert_eq!(news, (1..=split_lines(new).len()).collect::<Vec<_>>());
    }

    #[test]
    fn split_lines_handles_terminators() {
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec![""]);
        assert_eq!(split_lines("a\u{2028}b"), vec!["a", "b"]);
    }

    #[test]
    fn single_line_replacement() {
        let rendered = render_diff("a\nb\nc", "a\nx\nc");
        assert_eq!(
            rendered,
            ["   1    1  a", "   2      - b", "        2 + x", "   3    3  c"].join("\n")
        );
    }

    #[test]
    fn empty_old_is_all_inserts() {
        let lines = align("", "a\nb");
        assert_eq!(
            lines,
            vec![
                DiffLine::Added { new: 1, text: "a".into() },
                DiffLine::Added { new: 2, text: "b".into() },
            ]
        );
        assert!(render_diff("", "a\nb").lines().all(|row| row.starts_with("     ")));
    }

    #[test]
    fn empty_new_is_all_removals() {
        assert_eq!(render_diff("a\nb\n", ""), "   1      - a\n   2      - b");
    }

    #[test]
    fn identical_texts_have_no_markers() {
        let text = "fn main() {\n    println!(\"hi\");\n}\n";
        let rendered = render_diff(text, text);
        let rows: Vec<_> = rendered.split('\n').map(parse_row).collect();

        assert_eq!(rows.len(), split_lines(text).len());
        assert!(rows.iter().all(|r| r.2 == ' '));
        assert_eq!(rows[1], (Some(2), Some(2), ' ', "    println!(\"hi\");"));
    }

    #[test]
    fn both_empty_renders_nothing() {
        assert_eq!(render_diff("", ""), "");
    }

    #[test]
    fn trailing_whitespace_is_a_change() {
        let lines = align("a\nb", "a \nb");
        assert_eq!(
            lines,
            vec![
                DiffLine::Removed { old: 1, text: "a".into() },
                DiffLine::Added { new: 1, text: "a ".into() },
                DiffLine::Unchanged { old: 2, new: 2, text: "b".into() },
            ]
        );
    }

    #[test]
    fn uneven_replace_keeps_counters_independent() {
        let lines = align("keep\none\ntwo\nthree\ntail", "keep\nuno\ntail\nextra");
        assert_eq!(lines.first(), Some(&DiffLine::Unchanged { old: 1, new: 1, text: "keep".into() }));
        assert!(lines.contains(&DiffLine::Unchanged { old: 5, new: 3, text: "tail".into() }));
        assert_eq!(lines.last(), Some(&DiffLine::Added { new: 4, text: "extra".into() }));
        assert_counters_consistent("keep\none\ntwo\nthree\ntail", "keep\nuno\ntail\nextra");
    }

    #[test]
    fn removed_run_precedes_added_run_in_a_replace() {
        let lines = align("x\ny", "p\nq\nr");
        let kinds: Vec<char> = lines
            .iter()
            .map(|l| match l {
                DiffLine::Removed { .. } => '-',
                DiffLine::Added { .. } => '+',
                DiffLine::Unchanged { .. } => ' ',
            })
            .collect();
        assert_eq!(kinds, vec!['-', '-', '+', '+', '+']);
    }

    #[test]
    fn line_numbers_cover_both_sides_exactly_once() {
        let cases = [
            ("", ""),
            ("a", ""),
            ("", "a"),
            ("a\nb\nc\nd", "b\nc\nd\ne"),
            ("1\n2\n3\n4\n5\n6", "1\n3\n2\n4\n6\n5\n7"),
            ("same\nsame\nsame", "same\nother\nsame\nsame"),
            ("x\r\ny\r\n", "x\ny\nz\n"),
        ];
        for (old, new) in cases {
            assert_counters_consistent(old, new);
        }
    }

    #[test]
    fn added_file_listing() {
        assert_eq!(
            render_added_file("use std::io;\n\nfn main() {}\n"),
            ["@@ -0,0 +1,3 @@", "   1 +use std::io;", "   2 +", "   3 +fn main() {}"].join("\n")
        );
    }

    #[test]
    fn added_empty_file_is_header_only() {
        assert_eq!(render_added_file(""), "@@ -0,0 +1,0 @@");
    }
}
