use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use scene_model::{AggregationResult, PositionSource, Scene};

pub fn print_summary(result: &AggregationResult) {
    let stats = &result.statistics;
    println!("Document: {}", result.document_id);
    println!(
        "Pages: {}  Chunks: {}  Extraction: {}",
        stats.total_pages, stats.chunks_processed, stats.extraction_method
    );
    println!("{}", build_summary_table(result));
    let review = review_lines(result);
    if !review.is_empty() {
        println!();
        println!("Flagged for review:");
        for line in review {
            println!("- {line}");
        }
    }
    if stats.fragments_dropped > 0 {
        eprintln!("{}", dropped_message(stats.fragments_dropped));
    }
}

/// One line per flagged scene: order, scene number and review notes.
pub fn review_lines(result: &AggregationResult) -> Vec<String> {
    result
        .flagged()
        .map(|scene| {
            format!(
                "{} ({}): {}",
                scene.order, scene.ordinal.canonical, scene.review.notes
            )
        })
        .collect()
}

fn dropped_message(count: usize) -> String {
    format!("Dropped {count} detections missing a required field")
}

/// Scene table with a totals row.
pub fn build_summary_table(result: &AggregationResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Scene"),
        header_cell("Heading"),
        header_cell("Time"),
        header_cell("Pages"),
        header_cell("Length"),
        header_cell("Position"),
        header_cell("Review"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Center);

    for scene in &result.scenes {
        table.add_row(vec![
            Cell::new(scene.order),
            ordinal_cell(scene),
            Cell::new(&scene.heading.raw),
            time_cell(scene),
            Cell::new(page_span(scene)),
            Cell::new(eighths(scene.position.rounded_length)),
            source_cell(scene.provenance.position_source),
            review_cell(scene),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} scenes", result.statistics.total_scenes))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(eighths(result.total_length())).add_attribute(Attribute::Bold),
        dim_cell("-"),
        flagged_total_cell(result.statistics.flagged_for_review),
    ]);
    table
}

/// Render a page length as whole pages plus eighths, e.g. `1 3/8`.
pub fn eighths(length: f64) -> String {
    let total = (length * 8.0).round() as u64;
    let (whole, rest) = (total / 8, total % 8);
    match (whole, rest) {
        (0, 0) => "0".to_string(),
        (whole, 0) => whole.to_string(),
        (0, rest) => format!("{rest}/8"),
        (whole, rest) => format!("{whole} {rest}/8"),
    }
}

fn page_span(scene: &Scene) -> String {
    let position = &scene.position;
    if position.end_page > position.start_page {
        format!("{}-{}", position.start_page, position.end_page)
    } else {
        position.start_page.to_string()
    }
}

fn ordinal_cell(scene: &Scene) -> Cell {
    if scene.ordinal.raw.is_empty() {
        dim_cell(&scene.ordinal.canonical)
    } else {
        Cell::new(&scene.ordinal.canonical)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn time_cell(scene: &Scene) -> Cell {
    let label = scene.time.canonical.as_str();
    if scene.time.inferred_from_previous {
        Cell::new(format!("{label}*")).fg(Color::DarkGrey)
    } else {
        Cell::new(label)
    }
}

fn source_cell(source: PositionSource) -> Cell {
    match source {
        PositionSource::ExactTextMatch | PositionSource::LayoutMatch => {
            Cell::new(source.as_str()).fg(Color::Green)
        }
        PositionSource::ProviderEstimate => Cell::new(source.as_str()).fg(Color::Yellow),
        PositionSource::OrderFallback => Cell::new(source.as_str()).fg(Color::Red),
    }
}

fn review_cell(scene: &Scene) -> Cell {
    if scene.review.flagged {
        Cell::new("!")
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn flagged_total_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(4)),
        ColumnConstraint::UpperBoundary(Width::Fixed(28)),
        ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::LowerBoundary(Width::Fixed(7)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
    ]);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighths_render_whole_and_fractional_pages() {
        assert_eq!(eighths(0.0), "0");
        assert_eq!(eighths(0.125), "1/8");
        assert_eq!(eighths(1.0), "1");
        assert_eq!(eighths(2.5), "2 4/8");
    }

    #[test]
    fn dropped_message_names_missing_fields() {
        assert_eq!(
            dropped_message(3),
            "Dropped 3 detections missing a required field"
        );
    }
}
