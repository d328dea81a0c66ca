use datasheet_engine::engine::compare_values;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::Grid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

impl Grid {
    /// Sort rows ascending by the given columns, most significant first.
    pub fn sort_ascending(&mut self, columns: &[usize]) {
        let keys: Vec<_> = columns.iter().map(|&c| (c, SortOrder::Ascending)).collect();
        self.sort(&keys);
    }

    /// Sort rows descending by the given columns, most significant first.
    pub fn sort_descending(&mut self, columns: &[usize]) {
        let keys: Vec<_> = columns.iter().map(|&c| (c, SortOrder::Descending)).collect();
        self.sort(&keys);
    }

    /// Stable in-place sort by `(column, order)` keys.
    ///
    /// Cells compare by formatted value, numerically when both sides are
    /// decimal numbers. If any key names a column outside the grid nothing
    /// is reordered.
    pub fn sort(&mut self, keys: &[(usize, SortOrder)]) {
        let width = self.column_count();
        if let Some((column, _)) = keys.iter().find(|(column, _)| *column >= width) {
            tracing::debug!(column, width, "sort key out of range, not sorting");
            return;
        }

        let options = &self.options;
        let mut decorated: Vec<_> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| {
                let values: Vec<String> = keys
                    .iter()
                    .map(|(column, _)| {
                        row.get(*column)
                            .map(|cell| cell.borrow().value(options))
                            .unwrap_or_default()
                    })
                    .collect();
                (values, row)
            })
            .collect();

        decorated.sort_by(|(left, _), (right, _)| compare_keys(left, right, keys));
        self.rows = decorated.into_iter().map(|(_, row)| row).collect();
    }
}

fn compare_keys(left: &[String], right: &[String], keys: &[(usize, SortOrder)]) -> Ordering {
    for ((l, r), (_, order)) in left.iter().zip(right).zip(keys) {
        let ordering = match order {
            SortOrder::Ascending => compare_values(l, r),
            SortOrder::Descending => compare_values(r, l),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
