//! Report rows for a job board, as a text table or JSON.

use std::fmt::Write as _;

use mesh_measure::{format_fixed, group_thousands};
use print_job::{EntryReport, EntryStatus, JobBoard, JobEntry, Totals};
use serde::Serialize;

/// Load state shown in a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Values are present.
    Ready,
    /// Still loading.
    Loading,
    /// The load failed; see the error.
    Failed,
}

/// One line of output per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// File name as imported.
    pub file: String,
    /// Load state.
    pub status: RowStatus,
    /// Copies the values cover.
    pub amount: u32,
    /// Two-decimal values, for ready entries.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub values: Option<EntryReport>,
    /// Failure reason, for failed entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportRow {
    /// Row for one entry.
    #[must_use]
    pub fn from_entry(entry: &JobEntry) -> Self {
        let (status, error) = match &entry.status {
            EntryStatus::Ready(_) => (RowStatus::Ready, None),
            EntryStatus::Loading => (RowStatus::Loading, None),
            EntryStatus::Failed(failure) => (RowStatus::Failed, Some(failure.message.clone())),
        };
        Self {
            file: entry.file_name.clone(),
            status,
            amount: entry.params.amount,
            values: entry.report(),
            error,
        }
    }

    /// Rows for every entry on `board`, in import order.
    #[must_use]
    pub fn collect(board: &JobBoard) -> Vec<Self> {
        board.iter().map(Self::from_entry).collect()
    }
}

const HEADERS: [&str; 7] = [
    "FILE",
    "QTY",
    "SIZE (mm)",
    "VOLUME (mm³)",
    "SURFACE (mm²)",
    "WEIGHT (g)",
    "PRICE",
];

/// Render rows and a total line as an aligned text table.
///
/// With `grouped`, integer parts are split by thousands with spaces.
#[must_use]
pub fn render_table(rows: &[ReportRow], totals: &Totals, grouped: bool) -> String {
    let show = |s: &str| if grouped { group_thousands(s) } else { s.to_string() };

    let mut cells: Vec<[String; 7]> = Vec::with_capacity(rows.len() + 2);
    cells.push(HEADERS.map(str::to_string));
    for row in rows {
        let values = match (&row.values, row.status) {
            (Some(v), _) => [
                format!("{} x {} x {}", show(&v.width), show(&v.depth), show(&v.height)),
                show(&v.volume),
                show(&v.surface_area),
                show(&v.weight),
                show(&v.price),
            ],
            (None, RowStatus::Loading) => [
                "loading".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            (None, _) => Default::default(),
        };
        let [size, volume, surface, weight, price] = values;
        cells.push([
            row.file.clone(),
            row.amount.to_string(),
            size,
            volume,
            surface,
            weight,
            price,
        ]);
    }
    cells.push([
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        show(&format_fixed(totals.weight)),
        show(&format_fixed(totals.price)),
    ]);

    let mut widths = [0usize; 7];
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (i, line) in cells.iter().enumerate() {
        let mut text = String::new();
        for (col, cell) in line.iter().enumerate() {
            let pad = widths[col] - cell.chars().count();
            if col == 0 {
                let _ = write!(text, "{cell}{}", " ".repeat(pad));
            } else {
                let _ = write!(text, "  {}{cell}", " ".repeat(pad));
            }
        }
        // Failure reasons go after the (empty) value columns
        if let Some(err) = i.checked_sub(1).and_then(|r| rows.get(r)).and_then(|r| r.error.as_ref()) {
            let _ = write!(text, "  error: {err}");
        }
        out.push_str(text.trim_end());
        out.push('\n');
    }
    out
}
