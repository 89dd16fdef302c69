//! Game log table extraction from page markup.
//!
//! Tables are looked up by id in the document and inside HTML comments, where
//! the site parks some of its tables until a script reveals them.

use crate::error::AppError;
use crate::table::RawTable;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::invalid_selector(css, e.to_string()))
}

struct TableSelectors {
    table: Selector,
    head_row: Selector,
    body_row: Selector,
    any_row: Selector,
    cell: Selector,
}

impl TableSelectors {
    fn new(table_id: &str) -> Result<Self, AppError> {
        Ok(TableSelectors {
            table: selector(&format!("table#{table_id}"))?,
            head_row: selector("thead tr")?,
            body_row: selector("tbody tr")?,
            any_row: selector("tr")?,
            cell: selector("th, td")?,
        })
    }
}

fn colspan(cell: &ElementRef) -> usize {
    cell.value()
        .attr("colspan")
        .and_then(|span| span.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}

/// Cell texts of a row, with `colspan` cells repeated across their span.
fn row_cells(row: &ElementRef, selectors: &TableSelectors) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in row.select(&selectors.cell) {
        let text = cell.text().collect::<String>().trim().to_string();
        let span = colspan(&cell);
        cells.extend(std::iter::repeat_n(text, span));
    }
    cells
}

/// Blank header cells become `Unnamed: <index>`.
fn name_headers(cells: Vec<String>) -> Vec<String> {
    cells
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            if name.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name
            }
        })
        .collect()
}

fn parse_table(table: ElementRef, selectors: &TableSelectors) -> RawTable {
    let header_row = table
        .select(&selectors.head_row)
        .last()
        .or_else(|| table.select(&selectors.any_row).next());
    let headers = header_row
        .map(|row| name_headers(row_cells(&row, selectors)))
        .unwrap_or_default();

    let mut raw = RawTable::new(headers);
    let body_rows: Vec<ElementRef> = table.select(&selectors.body_row).collect();
    let rows = if body_rows.is_empty() {
        table.select(&selectors.any_row).skip(1).collect()
    } else {
        body_rows
    };
    for row in rows {
        let cells = row_cells(&row, selectors);
        if !cells.is_empty() {
            raw.push_row(cells);
        }
    }
    raw
}

fn collect_tables(document: &Html, selectors: &TableSelectors, out: &mut Vec<RawTable>) {
    for table in document.select(&selectors.table) {
        out.push(parse_table(table, selectors));
    }
}

/// Every table with the given id, in document order, commented-out ones last.
pub fn extract_tables(html: &str, table_id: &str) -> Result<Vec<RawTable>, AppError> {
    let selectors = TableSelectors::new(table_id)?;
    let document = Html::parse_document(html);
    let mut tables = Vec::new();
    collect_tables(&document, &selectors, &mut tables);

    let marker = format!("id=\"{table_id}\"");
    for node in document.tree.root().descendants() {
        if let Node::Comment(comment) = node.value() {
            let text: &str = comment;
            if text.contains(&marker) {
                let fragment = Html::parse_fragment(text);
                collect_tables(&fragment, &selectors, &mut tables);
            }
        }
    }

    debug!("Found {} '{table_id}' tables", tables.len());
    Ok(tables)
}

/// One player's game log: all matching tables of the markup, merged by column name.
pub fn extract_game_log(html: &str, player_id: &str, table_id: &str) -> Result<RawTable, AppError> {
    let mut tables = extract_tables(html, table_id)?.into_iter();
    let Some(mut merged) = tables.next() else {
        return Err(AppError::no_table(player_id, table_id));
    };
    for table in tables {
        merged.append(table);
    }
    Ok(merged)
}
