use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::event::RowError;
use crate::score::{format_score_with_tiebreak, FormatOptions};
use crate::scoring::{EventPlacement, Standing, Treatment};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format points without trailing zeros ("100", "66.67", "-2.5")
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        return format!("{:.0}", points);
    }
    let formatted = format!("{:.2}", points);
    formatted.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad a name to `width` characters (by char count, not bytes)
fn pad_name(name: &str, width: usize) -> String {
    let len = name.chars().count();
    if len >= width {
        name.to_string()
    } else {
        format!("{}{}", name, " ".repeat(width - len))
    }
}

/// Name column width: the longest name, capped by what the terminal leaves over
fn name_column_width<'a>(names: impl Iterator<Item = &'a str>, fixed_width: usize) -> usize {
    let longest = names.map(|n| n.chars().count()).max().unwrap_or(0);
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    }
}

fn treatment_note(treatment: Treatment) -> Option<&'static str> {
    match treatment {
        Treatment::Ranked | Treatment::Excluded => None,
        Treatment::WorstPerformance => Some("worst performance"),
        Treatment::LastPlace => Some("last place"),
        Treatment::Zero => Some("zero"),
    }
}

/// Format one event's placements as a table: rank, points, athlete, result
/// No headers (minimal format)
/// Rank column: 4 chars (fits "999."), right-aligned
/// Points column: 8 chars, right-aligned
pub fn format_event_table(placements: &[EventPlacement], use_colors: bool) -> String {
    if placements.is_empty() {
        return "No results.".to_string();
    }

    let rank_width = 4;
    let points_width = 8;
    let separator = "  ";
    let fixed_width = rank_width + 1 + points_width + separator.len() * 2 + 24;
    let name_width = name_column_width(
        placements.iter().map(|p| p.athlete_id.as_str()),
        fixed_width,
    );

    placements
        .iter()
        .map(|placement| {
            let rank_str = format!("{:>width$}", format!("{}.", placement.rank), width = rank_width);
            let points_str = format!(
                "{:>width$}",
                format_points(placement.points),
                width = points_width
            );
            let name = pad_name(&truncate_name(&placement.athlete_id, name_width), name_width);
            let mut result = format_score_with_tiebreak(&placement.score, FormatOptions::default());
            if let Some(note) = treatment_note(placement.treatment) {
                result = format!("{} ({})", result, note);
            }

            if use_colors {
                let result = if placement.treatment == Treatment::Ranked {
                    result
                } else {
                    result.dimmed().to_string()
                };
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    points_str.bold(),
                    separator,
                    name.cyan(),
                    separator,
                    result
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, points_str, separator, name, separator, result
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format placements as tab-separated values for scripting
/// Columns: rank, points, athlete, result, treatment (no headers, no colors)
pub fn format_event_tsv(placements: &[EventPlacement]) -> String {
    placements
        .iter()
        .map(|p| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                p.rank,
                format_points(p.points),
                p.athlete_id,
                format_score_with_tiebreak(&p.score, FormatOptions::default()),
                treatment_label(p.treatment)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn treatment_label(treatment: Treatment) -> &'static str {
    match treatment {
        Treatment::Ranked => "ranked",
        Treatment::WorstPerformance => "worst_performance",
        Treatment::LastPlace => "last_place",
        Treatment::Zero => "zero",
        Treatment::Excluded => "excluded",
    }
}

/// Format overall standings: rank, total, athlete, per-event placements
pub fn format_standings_table(standings: &[Standing], use_colors: bool) -> String {
    if standings.is_empty() {
        return "No athletes.".to_string();
    }

    let rank_width = 4;
    let total_width = 9;
    let separator = "  ";
    let fixed_width = rank_width + 1 + total_width + separator.len() * 2 + 30;
    let name_width = name_column_width(
        standings.iter().map(|s| s.athlete_id.as_str()),
        fixed_width,
    );

    standings
        .iter()
        .map(|standing| {
            let rank_str = format!("{:>width$}", format!("{}.", standing.rank), width = rank_width);
            let total_str = format!(
                "{:>width$}",
                format_points(standing.total_points),
                width = total_width
            );
            let name = pad_name(&truncate_name(&standing.athlete_id, name_width), name_width);
            let events = standing
                .event_placements
                .iter()
                .map(|(event, rank)| format!("{}:{}", event, rank))
                .collect::<Vec<_>>()
                .join(" ");

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    total_str.bold(),
                    separator,
                    name.cyan(),
                    separator,
                    events.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, total_str, separator, name, separator, events
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format standings as tab-separated values
/// Columns: rank, total, athlete (no headers, no colors)
pub fn format_standings_tsv(standings: &[Standing]) -> String {
    standings
        .iter()
        .map(|s| format!("{}\t{}\t{}", s.rank, format_points(s.total_points), s.athlete_id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a points table, one "position. points" per line
/// Overridden positions are marked with '*'
pub fn format_points_table(table: &[i64], overridden: &[u32], use_colors: bool) -> String {
    table
        .iter()
        .enumerate()
        .map(|(i, points)| {
            let position = i as u32 + 1;
            let position_str = format!("{:>4}", format!("{}.", position));
            let marker = if overridden.contains(&position) { "*" } else { "" };
            if use_colors {
                format!("{} {:>5}{}", position_str.dimmed(), points.bold(), marker.yellow())
            } else {
                format!("{} {:>5}{}", position_str, points, marker)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format skipped rows for stderr
pub fn format_row_errors(errors: &[RowError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - row {} ({}): {}", e.row + 1, e.athlete, e.error))
        .collect::<Vec<_>>()
        .join("\n")
}
