// Record presentation: turns one dataset row into display-ready fields.
// Pure formatting, no mutation.

use crate::dataset::Dataset;

/// Default cap on long free-text fields, in characters.
pub const CONTENT_PREVIEW_CHARS: usize = 700;

/// How a field renders, including its missing-value policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Raw value; missing renders as the empty string.
    Plain,
    /// Rendered as a link when present, `-` when missing.
    Url,
    /// Raw value capped at the preview length, with `...` when truncated.
    LongText,
}

impl FieldKind {
    /// Placeholder shown when the value is missing or the column absent.
    fn missing_placeholder(&self) -> &'static str {
        match self {
            FieldKind::Url => "-",
            FieldKind::Plain | FieldKind::LongText => "",
        }
    }
}

/// A named field in the fixed review order.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            kind,
        }
    }
}

/// The document fields reviewed for each record, in display order.
pub fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Policy Name", FieldKind::Plain),
        FieldSpec::new("date", FieldKind::Plain),
        FieldSpec::new("title", FieldKind::Plain),
        FieldSpec::new("content", FieldKind::LongText),
        FieldSpec::new("url", FieldKind::Url),
        FieldSpec::new("docID", FieldKind::Plain),
        FieldSpec::new("site name", FieldKind::Plain),
        FieldSpec::new("Issue Keyword", FieldKind::Plain),
        FieldSpec::new("Responsible ministry", FieldKind::Plain),
    ]
}

/// One display-ready field: name, formatted text, and whether the text is
/// a link target the UI should style as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub name: String,
    pub text: String,
    pub is_link: bool,
}

/// Format every field of `row` for human review. Fields whose column is
/// absent from the dataset fall back to the missing-value policy.
pub fn present_row(
    dataset: &Dataset,
    row: usize,
    fields: &[FieldSpec],
    preview_chars: usize,
) -> Vec<DisplayField> {
    fields
        .iter()
        .map(|spec| {
            let value = dataset.field(row, &spec.name).unwrap_or("");
            let missing = value.trim().is_empty();
            let text = if missing {
                spec.kind.missing_placeholder().to_string()
            } else {
                match spec.kind {
                    FieldKind::LongText => clip_chars(value, preview_chars),
                    FieldKind::Plain | FieldKind::Url => value.to_string(),
                }
            };
            DisplayField {
                name: spec.name.clone(),
                text,
                is_link: spec.kind == FieldKind::Url && !missing,
            }
        })
        .collect()
}

/// Cap `s` at `max_chars` characters, appending `...` when anything was cut.
/// Counts chars, not bytes, so multi-byte text is never split mid-scalar.
fn clip_chars(s: &str, max_chars: usize) -> String {
    let mut chars = s.char_indices();
    match chars.nth(max_chars) {
        Some((byte_end, _)) => format!("{}...", &s[..byte_end]),
        None => s.to_string(),
    }
}
