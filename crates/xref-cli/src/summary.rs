use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use xref_cli::types::{ResolveResult, RunResult};
use xref_map::{EXACT_MATCH_SCORE, MatchError, ResolutionSource};
use xref_model::{MatchSet, MatchSummary, RosterId};

pub fn print_resolve_summary(result: &ResolveResult) {
    println!("Run: {}", result.run_key);
    let source = match result.resolution.source {
        ResolutionSource::Cache => "cache",
        ResolutionSource::Computed => "computed",
    };
    println!(
        "Roster: {} players ({} eligible), stats: {} rows, {} names, matches: {source}",
        result.roster_players,
        result.canonical,
        result.stats_rows,
        result.names.len()
    );
    if let Some(outcome) = &result.resolution.outcome {
        println!(
            "Passes: {}, ambiguous ties: {}",
            outcome.passes.len(),
            outcome.ties.len()
        );
    }
    print_match_table(&result.resolution.matches, Some(&result.roster_names));
    print_confidence_line(&result.resolution.summary);
}

pub fn print_run_summary(result: &RunResult) {
    print_resolve_summary(&result.resolve);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Kept"), header_cell("Dropped")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    let merge = &result.merge;
    table.add_row(vec![
        Cell::new("Merge"),
        Cell::new(merge.joined),
        count_cell(merge.dropped_stats + merge.dropped_roster, Color::Yellow),
    ]);
    let prune = &result.prune;
    table.add_row(vec![
        Cell::new("Prune: minutes"),
        Cell::new("-"),
        count_cell(prune.below_min_minutes, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Prune: unavailable"),
        Cell::new(prune.injured_kept),
        count_cell(prune.unavailable, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Output")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.records).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    if !merge.issues.is_empty() {
        eprintln!("Merge issues:");
        for issue in &merge.issues {
            eprintln!("- {issue:?}");
        }
    }
    for path in &result.outputs {
        println!("Wrote {}", path.display());
    }
}

/// Report a failed resolution, including any matches made before it stopped.
pub fn print_match_failure(error: &MatchError) {
    if let Some(partial) = error.partial() {
        println!("Matches committed before failure:");
        print_match_table(partial, None);
        print_confidence_line(&partial.summary());
    }
    let unmatched = error.unmatched();
    if !unmatched.is_empty() {
        eprintln!("Unmatched names ({}):", unmatched.len());
        for name in unmatched {
            eprintln!("- {name}");
        }
    }
}

fn print_match_table(matches: &MatchSet, roster_names: Option<&BTreeMap<RosterId, String>>) {
    if matches.is_empty() {
        println!("No matches.");
        return;
    }
    let mut table = Table::new();
    let mut header = vec![header_cell("Free-text name"), header_cell("Roster id")];
    if roster_names.is_some() {
        header.push(header_cell("Roster name"));
    }
    header.push(header_cell("Confidence"));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let mut records: Vec<_> = matches.iter().collect();
    records.sort_by(|a, b| {
        a.confidence
            .cmp(&b.confidence)
            .then_with(|| a.free_text_name.cmp(&b.free_text_name))
    });
    for record in records {
        let mut row = vec![
            Cell::new(&record.free_text_name),
            Cell::new(record.roster_id),
        ];
        if let Some(names) = roster_names {
            row.push(match names.get(&record.roster_id) {
                Some(name) => Cell::new(name),
                None => dim_cell("-"),
            });
        }
        row.push(confidence_cell(record.confidence));
        table.add_row(row);
    }
    println!("{table}");
}

fn print_confidence_line(summary: &MatchSummary) {
    match (summary.mean_confidence, summary.min_confidence) {
        (Some(mean), Some(min)) => println!(
            "{} players matched, mean confidence {mean:.2}, lowest {min}",
            summary.matched
        ),
        _ => println!("{} players matched", summary.matched),
    }
}

fn confidence_cell(confidence: u8) -> Cell {
    match confidence {
        EXACT_MATCH_SCORE => Cell::new("exact").fg(Color::Green),
        90.. => Cell::new(confidence).fg(Color::Green),
        75..=89 => Cell::new(confidence).fg(Color::Yellow),
        _ => Cell::new(confidence)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
