use crate::cli::{io, ui::style::UiStyle};

/// Column alignment inside a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub align: Align,
}

impl TableColumn {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            align: Align::Left,
        }
    }

    /// Right-aligned column, used for amounts and counts.
    pub fn numeric(header: impl Into<String>) -> Self {
        Self {
            align: Align::Right,
            ..Self::new(header)
        }
    }
}

/// Simple table model used for rendering record lists and reports.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain([column.header.chars().count(), column.min_width])
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// Renders [`Table`] instances using padded columns.
pub struct TableRenderer;

impl TableRenderer {
    pub fn render(table: &Table, style: &UiStyle) {
        for line in Self::render_lines(table, style) {
            let _ = io::println_text(&line);
        }
    }

    pub fn render_lines(table: &Table, style: &UiStyle) -> Vec<String> {
        let widths = table.widths();
        let mut lines = Vec::new();

        if let Some(title) = &table.title {
            lines.push(style.apply_header_style(title));
        }

        let header = Self::join(
            table
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| pad(&column.header, *width, column.align)),
        );
        let rule = style.horizontal_line(header.chars().count().max(1));
        lines.push(style.apply_header_style(&header));
        lines.push(rule);

        for row in &table.rows {
            lines.push(Self::join(table.columns.iter().zip(&widths).enumerate().map(
                |(idx, (column, width))| {
                    let cell = row.get(idx).map(String::as_str).unwrap_or("");
                    pad(cell, *width, column.align)
                },
            )));
        }
        lines
    }

    fn join(cells: impl Iterator<Item = String>) -> String {
        cells.collect::<Vec<_>>().join("  ").trim_end().to_string()
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_grow_to_fit_cells() {
        let mut table = Table::new(
            Some("Sessions"),
            vec![TableColumn::new("Client"), TableColumn::numeric("Price")],
        );
        table.add_row(vec!["Ana Maria", "$150.00"]);
        table.add_row(vec!["Bo", "$5.00"]);

        let lines = TableRenderer::render_lines(&table, &UiStyle::plain());
        assert_eq!(
            lines,
            vec![
                "Sessions".to_string(),
                "Client       Price".to_string(),
                "------------------".to_string(),
                "Ana Maria  $150.00".to_string(),
                "Bo           $5.00".to_string(),
            ]
        );
    }
}
