use std::fmt;

/// A review label. The enumeration is closed: anything that is not exactly
/// "Y", "N", or "M" counts as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Yes,
    No,
    Maybe,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Yes, Label::No, Label::Maybe];

    /// Parse a cell value. Returns None for unset (empty, whitespace,
    /// or any value outside the enumeration).
    pub fn parse(raw: &str) -> Option<Label> {
        match raw.trim() {
            "Y" => Some(Label::Yes),
            "N" => Some(Label::No),
            "M" => Some(Label::Maybe),
            _ => None,
        }
    }

    /// The cell value written to the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Yes => "Y",
            Label::No => "N",
            Label::Maybe => "M",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
