use crate::label::Label;
use crate::stage::{Stage, STAGE_COUNT};

/// The in-memory table: one row per document, plus three label columns.
///
/// Loaded once at startup and exclusively owned by the session. Row identity
/// is the positional index into `rows`; it is stable across stage filtering
/// and is the key used when writing labels back. `set_label` is the only
/// mutation path.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Column index of each stage's label column, in stage order.
    label_cols: [usize; STAGE_COUNT],
}

impl Dataset {
    /// Build a dataset from a header and data rows.
    ///
    /// Label columns named in `label_names` are resolved against the header;
    /// missing ones are appended (with empty cells) so every stage always has
    /// a column to write into. Returns the dataset and the names of any
    /// appended columns. Short rows are padded to the header width.
    pub fn new(
        mut columns: Vec<String>,
        mut rows: Vec<Vec<String>>,
        label_names: &[String; STAGE_COUNT],
    ) -> (Dataset, Vec<String>) {
        let mut appended = Vec::new();
        let mut label_cols = [0usize; STAGE_COUNT];

        for (stage, name) in label_names.iter().enumerate() {
            match columns.iter().position(|c| c == name) {
                Some(idx) => label_cols[stage] = idx,
                None => {
                    label_cols[stage] = columns.len();
                    columns.push(name.clone());
                    appended.push(name.clone());
                }
            }
        }

        let width = columns.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }

        (
            Dataset {
                columns,
                rows,
                label_cols,
            },
            appended,
        )
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell value by column name, or None if the column does not exist.
    /// Out-of-range rows also yield None rather than panicking.
    pub fn field(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Raw cell value of a stage's label column ("" for unset).
    pub fn raw_label(&self, row: usize, stage: Stage) -> &str {
        self.rows
            .get(row)
            .map(|r| r[self.label_cols[stage.index()]].as_str())
            .unwrap_or("")
    }

    /// Parsed label for a stage, None when unset or invalid.
    pub fn label(&self, row: usize, stage: Stage) -> Option<Label> {
        Label::parse(self.raw_label(row, stage))
    }

    /// A row is complete for a stage iff its label parses.
    pub fn is_complete(&self, row: usize, stage: Stage) -> bool {
        self.label(row, stage).is_some()
    }

    /// Write a label into the stage column at `row`. The single mutation
    /// path; there is no clear operation, a stored label can only be
    /// replaced by another label.
    pub fn set_label(&mut self, row: usize, stage: Stage, label: Label) {
        if let Some(r) = self.rows.get_mut(row) {
            r[self.label_cols[stage.index()]] = label.as_str().to_string();
        }
    }
}
