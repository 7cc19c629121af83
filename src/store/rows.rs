//! Presentation binding for entry lists.
//!
//! A shell showing an archive as a virtual list only needs a row count,
//! per-cell values, and change notifications. [`RowModel`] is that narrow
//! interface; any presentation layer can bind to it without knowing about
//! arena slots or tombstones. Rows are *live* positions: removing an entry
//! removes its row even though the underlying arena slot survives.

/// Columns of the entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// The entry's name.
    Name,
    /// Human-readable payload size.
    Size,
}

/// A change to the visible row set, emitted after a successful mutation.
///
/// Row numbers are live positions at the time the event fires: an
/// `Appended` row is the new last row, a `Removed` row is where the entry
/// sat before it disappeared from view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowChange {
    /// A new row appeared at the end of the list.
    Appended {
        /// Position of the new row.
        row: usize,
    },
    /// An existing row's cells changed (entry content was replaced).
    Changed {
        /// Position of the changed row.
        row: usize,
    },
    /// A row disappeared from the list.
    Removed {
        /// Position the row occupied before removal.
        row: usize,
    },
}

/// Read side of the presentation binding.
pub trait RowModel {
    /// Number of visible rows (live entries).
    fn row_count(&self) -> usize;

    /// Cell value for `row` and `column`, or `None` for a bad row.
    fn row_value(&self, row: usize, column: Column) -> Option<String>;
}

/// Formats a byte count the way a file listing does.
///
/// Binary units, one decimal place from KiB up.
///
/// ```
/// use wadex::human_size;
///
/// assert_eq!(human_size(999), "999 B");
/// assert_eq!(human_size(2048), "2.0 KiB");
/// assert_eq!(human_size(5 * 1024 * 1024), "5.0 MiB");
/// ```
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
