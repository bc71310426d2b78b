// Labeling engine - in-memory dataset, stage filtering, session cursor,
// and record presentation. No I/O lives here.

pub mod cursor;
pub mod dataset;
pub mod label;
pub mod present;
pub mod stage;

pub use cursor::SessionCursor;
pub use dataset::Dataset;
pub use label::Label;
pub use stage::{eligible_rows, Stage};
