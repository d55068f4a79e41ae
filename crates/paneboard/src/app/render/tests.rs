use ratatui::backend::TestBackend;
use ratatui::style::{Color, Modifier};
use ratatui::Terminal;

use super::output::capture_lines;
use super::{hotkey_legend, render, DashboardView};
use crate::config::KeymapConfig;

const LEGEND: &str = " [s] Start  [r] Restart  [c] Close  [o] Attach  [q] Quit ";

fn draw(width: u16, height: u16, view: &DashboardView<'_>) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal.draw(|frame| render(frame, view)).expect("draw");
    terminal
}

fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

fn view<'a>(names: Vec<&'a str>, selected: usize, capture: &'a str) -> DashboardView<'a> {
    DashboardView {
        job_names: names,
        selected,
        message: None,
        capture,
        legend: LEGEND,
    }
}

#[test]
fn default_legend_lists_lifecycle_keys() {
    assert_eq!(hotkey_legend(&KeymapConfig::default()), LEGEND);

    let keymap = KeymapConfig {
        attach: Vec::new(),
        ..KeymapConfig::default()
    };
    assert!(!hotkey_legend(&keymap).contains("Attach"));
}

#[test]
fn frame_has_list_output_and_legend() {
    let terminal = draw(80, 10, &view(vec!["build", "watch"], 1, "\x1b[31mred\x1b[0mplain\n"));

    let top = row(&terminal, 0);
    assert!(top.contains(" Jobs "), "{top}");
    assert!(top.contains(" Output: watch "), "{top}");
    assert!(row(&terminal, 1).contains("build"));
    assert!(row(&terminal, 2).contains("watch"));
    assert!(row(&terminal, 9).contains("[q] Quit"));

    let buffer = terminal.backend().buffer();
    // Left pane is a third of the width; selected row is reversed edge to edge.
    assert!(buffer[(1, 2)].modifier.contains(Modifier::REVERSED));
    assert!(buffer[(24, 2)].modifier.contains(Modifier::REVERSED));
    assert!(!buffer[(1, 1)].modifier.contains(Modifier::REVERSED));
    assert!(buffer[(0, 9)].modifier.contains(Modifier::REVERSED));

    // Output pane content starts inside its border at x = 26 + 1.
    assert_eq!(buffer[(27, 1)].symbol(), "r");
    assert_eq!(buffer[(27, 1)].fg, Color::Red);
    assert_eq!(buffer[(30, 1)].symbol(), "p");
    assert_eq!(buffer[(30, 1)].fg, Color::Reset);
}

#[test]
fn message_is_shown_when_capture_is_empty() {
    let mut dashboard = view(vec!["build"], 0, "");
    dashboard.message = Some("Session does not exist.");
    let terminal = draw(80, 8, &dashboard);

    assert!(row(&terminal, 1).contains("Session does not exist."));
    assert!(!row(&terminal, 6).contains("Session does not exist."));
}

#[test]
fn message_is_shown_above_capture() {
    let mut dashboard = view(vec!["build"], 0, "compiling\n");
    dashboard.message = Some("Session started successfully.");
    let terminal = draw(80, 8, &dashboard);

    assert!(row(&terminal, 1).contains("Session started successfully."));
    assert!(row(&terminal, 2).contains("compiling"));
    let buffer = terminal.backend().buffer();
    assert!(buffer[(27, 1)].modifier.contains(Modifier::BOLD));
    assert!(!buffer[(27, 2)].modifier.contains(Modifier::BOLD));
}

#[test]
fn every_line_of_a_failure_message_is_shown() {
    let mut dashboard = view(vec!["build"], 0, "No active session.");
    dashboard.message = Some("warning on stdout\nfatal: real stderr diagnostic");
    let terminal = draw(80, 8, &dashboard);

    assert!(row(&terminal, 1).contains("warning on stdout"));
    assert!(row(&terminal, 2).contains("fatal: real stderr diagnostic"));
    assert!(row(&terminal, 3).contains("No active session."));
}

#[test]
fn capture_keeps_newest_rows_below_a_message() {
    let mut dashboard = view(vec!["build"], 0, "one\ntwo\nthree\nfour\n");
    dashboard.message = Some("Session restarted successfully.");
    // Inner height is 4: one message row and the three newest capture rows.
    let terminal = draw(80, 7, &dashboard);

    assert!(row(&terminal, 1).contains("Session restarted"));
    assert!(row(&terminal, 2).contains("two"));
    assert!(row(&terminal, 4).contains("four"));
}

#[test]
fn empty_job_list_shows_hint() {
    let terminal = draw(90, 6, &view(Vec::new(), 0, ""));
    assert!(row(&terminal, 0).contains(" Output "));
    assert!(row(&terminal, 1).contains("No jobs configured."));
}

#[test]
fn long_lines_are_cut_at_the_pane_edge() {
    let long = "x".repeat(200);
    let terminal = draw(30, 5, &view(vec!["build"], 0, &long));
    // Output pane spans x = 10..30, inner x = 11..29.
    let second = row(&terminal, 1);
    assert_eq!(second.chars().filter(|ch| *ch == 'x').count(), 18);
    assert!(second.ends_with('│'), "{second}");
}

#[test]
fn selection_beyond_list_height_stays_visible() {
    let names: Vec<String> = (0..20).map(|idx| format!("job{idx}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let terminal = draw(60, 8, &view(names, 15, ""));
    // Inner height is 5 (8 rows - legend - two borders).
    assert!(row(&terminal, 5).contains("job15"));
    assert!(row(&terminal, 1).contains("job11"));
}

#[test]
fn tiny_terminals_do_not_panic() {
    draw(3, 2, &view(vec!["build"], 0, "\x1b[32mok\n"));
    draw(1, 1, &view(vec!["build"], 0, "ok"));
}

#[test]
fn capture_lines_keep_newest_rows() {
    let capture = "one\ntwo\n\x1b[33mthree\x1b[0m\n\n   \n\x1b[0m\n";
    let lines = capture_lines(capture, 10, 2);
    let texts: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
    assert_eq!(texts, vec!["two".to_string(), "three".to_string()]);
    assert_eq!(lines[1].spans[0].style.fg, Some(Color::Yellow));
}

#[test]
fn title_shows_session_name_when_it_differs() {
    let terminal = draw(80, 6, &view(vec!["api.v2"], 0, ""));
    assert!(row(&terminal, 0).contains(" Output: api.v2 [api-v2] "));
}

#[test]
fn tabs_expand_to_tab_stops_within_the_pane() {
    let terminal = draw(30, 5, &view(vec!["build"], 0, "a\tb\t\t\tcdefghijklmnop\n"));
    // Output pane inner x = 11..29; `b` lands on the first tab stop.
    assert_eq!(terminal.backend().buffer()[(19, 1)].symbol(), "b");
    let second = row(&terminal, 1);
    assert!(second.ends_with('│'), "{second}");
    assert!(!second.contains('c'), "{second}");
}

#[test]
fn expand_tabs_counts_from_the_starting_column() {
    use super::layout::expand_tabs;
    assert_eq!(expand_tabs("plain", 0), "plain");
    assert_eq!(expand_tabs("a\tb", 0), "a       b");
    assert_eq!(expand_tabs("\tb", 6), "  b");
    assert_eq!(expand_tabs("x\x07y", 0), "xy");
}
