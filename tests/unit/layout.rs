use proptest::prelude::*;

use super::*;
use crate::config::BannerConfig;

fn mono(advance: f32) -> impl FnMut(TextRole, &str) -> f32 {
    move |_, s: &str| s.chars().count() as f32 * advance
}

fn geometry() -> BannerGeometry {
    BannerConfig::default().geometry().unwrap()
}

#[test]
fn wraps_greedily_at_word_boundaries() {
    let lines = wrap_lines(&mut mono(10.0), TextRole::Headline, "aa bb cc dd", 50.0);
    assert_eq!(lines, vec!["aa bb", "cc dd"]);
}

#[test]
fn exact_fit_stays_on_line() {
    let lines = wrap_lines(&mut mono(10.0), TextRole::Subtext, "abcd e", 60.0);
    assert_eq!(lines, vec!["abcd e"]);
}

#[test]
fn overlong_word_stands_alone() {
    let lines = wrap_lines(
        &mut mono(10.0),
        TextRole::Headline,
        "a supercalifragilistic b",
        50.0,
    );
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

#[test]
fn empty_and_blank_text_give_no_lines() {
    assert!(wrap_lines(&mut mono(10.0), TextRole::Subtext, "", 50.0).is_empty());
    assert!(wrap_lines(&mut mono(10.0), TextRole::Subtext, "  \n\t ", 50.0).is_empty());
}

#[test]
fn collapses_whitespace_runs() {
    let lines = wrap_lines(&mut mono(1.0), TextRole::Subtext, "  a   b\nc ", 100.0);
    assert_eq!(lines, vec!["a b c"]);
}

#[test]
fn measures_with_the_requested_role() {
    let mut seen = Vec::new();
    let mut m = |role: TextRole, s: &str| {
        seen.push(role);
        s.len() as f32
    };
    wrap_lines(&mut m, TextRole::Subtext, "a b c", 100.0);
    assert!(seen.iter().all(|r| *r == TextRole::Subtext));
    assert_eq!(seen.len(), 2);
}

#[test]
fn single_line_headline_without_subtext() {
    let g = geometry();
    let content = BannerContent::new("Write a great headline here", "");
    let layout = compute_layout(&content, &mut mono(20.0), &g);

    assert_eq!(layout.headline_lines.len(), 1);
    assert!(layout.subtext_lines.is_empty());
    assert_eq!(layout.max_width, 2400.0 - 180.0 - 180.0);
    assert_eq!(layout.content_height, 144.0);
    assert_eq!(layout.headline_y, 1300.0 - 160.0 - 144.0);
    assert_eq!(layout.subtext_y, layout.headline_y + 144.0);
    assert_eq!(layout.overlay_height, 144.0 + 120.0 + 160.0);
    assert!(layout.overlay_top(g.height()) < layout.headline_y);
}

#[test]
fn subtext_adds_gap_and_lines() {
    let g = geometry();
    let content = BannerContent::new("Headline", "one two three");
    let layout = compute_layout(&content, &mut mono(20.0), &g);
    assert_eq!(layout.subtext_lines, vec!["one two three"]);
    assert_eq!(layout.content_height, 144.0 + 64.0 + 76.0);
    assert_eq!(layout.subtext_y, layout.headline_y + 144.0 + 64.0);
    assert_eq!(layout.subtext_y + 76.0, 1300.0 - 160.0);
}

#[test]
fn overlay_is_capped() {
    let g = geometry();
    let long = "word ".repeat(400);
    let content = BannerContent::new(long.clone(), long);
    let layout = compute_layout(&content, &mut mono(30.0), &g);
    assert_eq!(layout.overlay_height, 0.6 * 1300.0);
}

proptest! {
    #[test]
    fn wrapped_lines_fit(
        words in prop::collection::vec("[a-z]{1,14}", 0..40),
        max in 40.0f32..400.0,
    ) {
        let text = words.join(" ");
        let mut m = mono(7.0);
        let lines = wrap_lines(&mut m, TextRole::Subtext, &text, max);
        for line in &lines {
            let fits = m(TextRole::Subtext, line) <= max;
            prop_assert!(fits || !line.contains(' '));
        }
        prop_assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn overlay_grows_with_content(a in 0usize..30, b in 0usize..30) {
        let g = geometry();
        let (lo, hi) = (a.min(b), a.max(b));
        let content = |words: usize| BannerContent::new("x", "word ".repeat(words * 20));
        let small = compute_layout(&content(lo), &mut mono(20.0), &g);
        let large = compute_layout(&content(hi), &mut mono(20.0), &g);
        prop_assert!(small.content_height <= large.content_height);
        prop_assert!(small.overlay_height <= large.overlay_height);
        prop_assert!(large.overlay_height <= 0.6 * g.height() + 1e-3);
    }
}
