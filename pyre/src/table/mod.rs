use std::cmp::max;

/// Accumulates rows of owned cells and renders them with columns padded to equal width.
/// Rows may have different lengths; column widths are counted in `char`s.
#[derive(Default, Debug, Clone)]
pub struct Table {
    column_widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn push_row(&mut self, row: Vec<String>) {
        if row.len() > self.column_widths.len() {
            self.column_widths.resize(row.len(), 0);
        }
        self.column_widths
            .iter_mut()
            .zip(&row)
            .for_each(|(width, cell)| *width = max(*width, cell.chars().count()));
        self.rows.push(row);
    }

    pub fn to_string(&self, sep: &str) -> String {
        let pad = |cell: &str, width: usize| {
            let len = cell.chars().count();
            if len < width {
                format!("{}{}", cell, " ".repeat(width - len))
            } else {
                cell.to_string()
            }
        };
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.column_widths)
                    .map(|(cell, width)| format!("{}{sep}", pad(cell, *width)))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
