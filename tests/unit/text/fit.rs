use super::*;
use crate::render::record::FixedAdvance;
use proptest::prelude::*;

fn constraints(max_width: f64) -> FitConstraints {
    FitConstraints {
        max_width,
        max_lines: 3,
        max_size: 132.0,
        min_size: 64.0,
        step: 2.0,
        max_visible_words: 6,
        family: "Test".to_owned(),
        weight: 900.0,
    }
}

#[test]
fn truncate_words_appends_ellipsis_only_when_cutting() {
    assert_eq!(truncate_words("a b c", 3), "a b c");
    assert_eq!(truncate_words("a  b c", 5), "a  b c");
    assert_eq!(truncate_words("a b c d", 2), "a b…");
    assert_eq!(truncate_words("a b", 0), "…");
    assert_eq!(truncate_words("", 0), "");
}

#[test]
fn candidate_sizes_always_include_minimum() {
    assert_eq!(candidate_sizes(10.0, 5.0, 2.0), vec![10.0, 8.0, 6.0, 5.0]);
    assert_eq!(candidate_sizes(10.0, 6.0, 2.0), vec![10.0, 8.0, 6.0]);
    assert_eq!(candidate_sizes(10.0, 10.0, 2.0), vec![10.0]);
}

#[test]
fn candidate_sizes_collapse_inverted_bounds_and_fix_step() {
    assert_eq!(candidate_sizes(10.0, 20.0, 2.0), vec![10.0]);
    assert_eq!(candidate_sizes(6.0, 2.0, 0.0), vec![6.0, 4.0, 2.0]);
    assert_eq!(candidate_sizes(6.0, 2.0, f64::NAN), vec![6.0, 4.0, 2.0]);
    assert_eq!(candidate_sizes(6.0, 2.0, -3.0), vec![6.0, 4.0, 2.0]);
}

#[test]
fn candidate_sizes_are_floored_at_one_pixel() {
    assert_eq!(candidate_sizes(4.0, -10.0, 2.0), vec![4.0, 2.0, 1.0]);
    assert_eq!(candidate_sizes(-3.0, -10.0, 2.0), vec![1.0]);
    assert_eq!(candidate_sizes(0.0, 0.0, 2.0), vec![1.0]);
    assert_eq!(candidate_sizes(f64::INFINITY, 8.0, 2.0), vec![8.0]);
}

#[test]
fn candidate_sizes_stay_bounded_for_huge_ranges() {
    for max in [1e8, 1e10, 1e17, 1e300] {
        let sizes = candidate_sizes(max, 64.0, 2.0);
        assert!(sizes.len() <= 1025, "{max}: {}", sizes.len());
        assert_eq!(sizes[0], max);
        assert_eq!(*sizes.last().unwrap(), 64.0);
        assert!(sizes.windows(2).all(|w| w[0] > w[1]), "{max}");
    }
    let tiny_step = candidate_sizes(200.0, 10.0, 1e-12);
    assert!(tiny_step.len() <= 1025);
    assert_eq!(*tiny_step.last().unwrap(), 10.0);
}

#[test]
fn huge_max_size_still_fits() {
    let mut c = constraints(1136.0);
    c.max_size = 1e17;
    let r = fit_title(&mut FixedAdvance::default(), "Hi", &c).unwrap();
    assert!(r.font_size <= 1136.0 && r.font_size >= 64.0, "{}", r.font_size);
    assert_eq!(r.lines, vec!["Hi"]);
}

#[test]
fn negative_minimum_size_is_floored_for_oversized_word() {
    let mut c = constraints(1136.0);
    c.max_size = 8.0;
    c.min_size = -10.0;
    c.max_lines = 1;
    let word = "W".repeat(2000);
    let r = fit_title(&mut FixedAdvance::default(), &word, &c).unwrap();
    assert_eq!(r.font_size, MIN_FONT_SIZE);
    assert_eq!(r.lines.len(), 1);
}

#[test]
fn short_title_fits_at_max_size() {
    let r = fit_title(&mut FixedAdvance::default(), "Hi", &constraints(1136.0)).unwrap();
    assert_eq!(r.font_size, 132.0);
    assert_eq!(r.lines, vec!["Hi"]);
}

#[test]
fn picks_largest_size_that_fits() {
    // The ten-letter word fits on its own line once 10 * size / 2 <= 500.
    let r = fit_title(
        &mut FixedAdvance::default(),
        "abcdefghij klmnopqrs",
        &constraints(500.0),
    )
    .unwrap();
    assert_eq!(r.font_size, 100.0);
    assert_eq!(r.lines, vec!["abcdefghij", "klmnopqrs"]);
}

#[test]
fn worked_example_truncates_to_six_words() {
    let c = FitConstraints {
        max_width: 25.0,
        max_lines: 3,
        max_size: 10.0,
        min_size: 10.0,
        step: 2.0,
        max_visible_words: 6,
        family: "Test".to_owned(),
        weight: 900.0,
    };
    let r = fit_title(&mut FixedAdvance::default(), "A B C D E F G H I J", &c).unwrap();
    assert_eq!(r.font_size, 10.0);
    assert_eq!(r.lines, vec!["A B C", "D E", "F…"]);
}

#[test]
fn degenerate_fit_returns_minimum_size() {
    let mut c = constraints(100.0);
    c.max_lines = 1;
    let r = fit_title(&mut FixedAdvance::default(), "Incomprehensibilities", &c).unwrap();
    assert_eq!(r.font_size, 64.0);
    assert_eq!(r.lines, vec!["Incomprehensibilities…"]);
}

#[test]
fn empty_title_fits_trivially() {
    let r = fit_title(&mut FixedAdvance::default(), "", &constraints(0.0)).unwrap();
    assert_eq!(r.font_size, 132.0);
    assert!(r.lines.is_empty());
}

proptest! {
    #[test]
    fn size_stays_within_bounds_and_is_deterministic(
        words in prop::collection::vec("[a-z]{1,10}", 0..20),
        width in 0.0f64..1500.0,
        max_size in 20.0f64..200.0,
        min_size in 1.0f64..200.0,
        max_lines in 1usize..5,
    ) {
        let text = words.join(" ");
        let mut c = constraints(width);
        c.max_size = max_size;
        c.min_size = min_size;
        c.max_lines = max_lines;

        let a = fit_title(&mut FixedAdvance::default(), &text, &c).unwrap();
        let b = fit_title(&mut FixedAdvance::default(), &text, &c).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert!(a.font_size <= max_size);
        prop_assert!(a.font_size >= min_size.min(max_size));
        prop_assert!(a.lines.len() <= max_lines);
    }
}
