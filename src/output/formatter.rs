use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{RankedRow, SlotScore};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format the remaining attempts of a slot as "[5,3]", empty when there are none
pub fn format_other_values(values: &[i64]) -> String {
    if values.is_empty() {
        return String::new();
    }
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("[{}]", joined)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
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

fn format_slot(slot: &SlotScore, use_colors: bool) -> String {
    let others = format_other_values(&slot.aggregate.other_values);
    let best = slot.aggregate.best_value;
    if !use_colors {
        return if others.is_empty() {
            format!("{} {}", slot.label(), best)
        } else {
            format!("{} {} {}", slot.label(), best, others)
        };
    }

    let best_str = if slot.aggregate.contributed {
        best.green().to_string()
    } else {
        best.dimmed().to_string()
    };
    if others.is_empty() {
        format!("{} {}", slot.label().dimmed(), best_str)
    } else {
        format!("{} {} {}", slot.label().dimmed(), best_str, others.dimmed())
    }
}

/// Format ranked rows as a table: position, final score, participant, club, slots.
/// No headers. Positions are 1-based within the given rows, so a filtered view
/// is numbered on its own.
pub fn format_standings_table(rows: &[&RankedRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No participants found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 4;
    let score_width = 7;
    let separator = "  ";
    let name_width = rows
        .iter()
        .map(|r| r.participant_id.chars().count())
        .max()
        .unwrap_or(0);
    // Names get at most a third of the terminal, at least 12 columns
    let name_width = match term_width {
        Some(width) => name_width.min((width / 3).max(12)),
        None => name_width,
    };

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>width$}.", idx + 1, width = index_width - 1);
            let score_padded = format!("{:>width$}", row.final_score, width = score_width);
            let name = truncate_name(&row.participant_id, name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);
            let slots = row
                .per_event
                .iter()
                .map(|slot| format_slot(slot, use_colors))
                .collect::<Vec<_>>()
                .join(separator);

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name_padded,
                    separator,
                    row.club.cyan(),
                    separator,
                    slots
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_padded, separator, name_padded, separator, row.club, separator, slots
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single row with a per-slot breakdown (for verbose mode)
pub fn format_row_detail(row: &RankedRow, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(row.per_event.len() + 2);

    if use_colors {
        lines.push(format!(
            "{} ({}, {})",
            row.participant_id.bold(),
            row.club.cyan(),
            row.gender
        ));
    } else {
        lines.push(format!("{} ({}, {})", row.participant_id, row.club, row.gender));
    }

    for slot in &row.per_event {
        let mut line = format!("  {}: {}", slot.label(), slot.aggregate.best_value);
        if slot.points != slot.aggregate.best_value {
            line.push_str(&format!(" ({} pts)", slot.points));
        }
        if !slot.aggregate.other_values.is_empty() {
            line.push_str(&format!(
                "  others: {}",
                format_other_values(&slot.aggregate.other_values)
            ));
        }
        lines.push(line);
    }

    lines.push(format!(
        "  Total: {} x {} events = {}",
        row.total_score, row.events_completed, row.final_score
    ));
    lines.join("\n")
}

/// Format rows as tab-separated values for scripting.
/// Header line first; one column per slot holding its best value.
pub fn format_tsv(rows: &[&RankedRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let mut header = vec![
        "position".to_string(),
        "participant".to_string(),
        "gender".to_string(),
        "club".to_string(),
    ];
    header.extend(first.per_event.iter().map(|s| s.label().to_string()));
    header.extend(["total".to_string(), "events".to_string(), "final".to_string()]);

    let mut lines = vec![header.join("\t")];
    for (idx, row) in rows.iter().enumerate() {
        let mut fields = vec![
            (idx + 1).to_string(),
            row.participant_id.clone(),
            row.gender.to_string(),
            row.club.clone(),
        ];
        fields.extend(row.per_event.iter().map(|s| s.aggregate.best_value.to_string()));
        fields.extend([
            row.total_score.to_string(),
            row.events_completed.to_string(),
            row.final_score.to_string(),
        ]);
        lines.push(fields.join("\t"));
    }
    lines.join("\n")
}
