use super::*;

#[test]
fn wrap_breaks_at_whitespace_without_splitting_words() {
    assert_eq!(
        wrap("Twilight Imperium Fourth Edition", 14),
        vec!["Twilight", "Imperium", "Fourth Edition"]
    );
    assert_eq!(wrap("Worker Placement", 16), vec!["Worker Placement"]);
    assert_eq!(
        wrap("Hand Management", 14),
        vec!["Hand", "Management"]
    );
}

#[test]
fn wrap_keeps_overlong_words_whole() {
    assert_eq!(
        wrap("Pneumonoultramicroscopic dice", 10),
        vec!["Pneumonoultramicroscopic", "dice"]
    );
}

#[test]
fn wrap_collapses_whitespace_and_handles_empty() {
    assert_eq!(wrap("  a   b  ", 10), vec!["a b"]);
    assert!(wrap("", 10).is_empty());
    assert!(wrap("   ", 10).is_empty());
}

#[test]
fn wrap_counts_characters_not_bytes() {
    assert_eq!(wrap("Ärger Äpfel", 11), vec!["Ärger Äpfel"]);
}

#[test]
fn truncate_fits_ellipsis_inside_budget() {
    let name = "A".repeat(40);
    let out = truncate(&name, 15);
    assert_eq!(out.chars().count(), 15);
    assert_eq!(out, format!("{}...", "A".repeat(12)));
}

#[test]
fn truncate_leaves_short_names_alone() {
    assert_eq!(truncate("Azul", 15), "Azul");
    assert_eq!(truncate(&"x".repeat(15), 15), "x".repeat(15));
}

#[test]
fn truncate_degenerate_budgets() {
    assert_eq!(truncate("Terraforming Mars", 2), "..");
    assert_eq!(truncate("Terraforming Mars", 0), "");
}

#[test]
fn block_height_is_ascent_times_lines() {
    let m = FontMetrics {
        ascent: 80.0,
        descent: 20.0,
    };
    assert_eq!(m.line_height(), 80.0);
    assert_eq!(m.block_height(3), 240.0);
}

#[test]
fn upward_block_ends_at_origin() {
    let pts = anchor_block(Point::new(356.0, 500.0), &[80.0, 80.0], BlockGrowth::Up);
    assert_eq!(pts, vec![Point::new(356.0, 340.0), Point::new(356.0, 420.0)]);
}

#[test]
fn downward_block_starts_at_origin() {
    let pts = anchor_block(Point::new(10.0, 100.0), &[30.0, 30.0, 30.0], BlockGrowth::Down);
    assert_eq!(pts[0], Point::new(10.0, 100.0));
    assert_eq!(pts[2], Point::new(10.0, 160.0));
}
