use crate::dataset::Dataset;
use crate::label::Label;

/// Number of review passes over the dataset.
pub const STAGE_COUNT: usize = 3;

/// One of the three sequential review passes.
///
/// A stage does not own any data; it is an index into the dataset's
/// label columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stage(usize);

impl Stage {
    pub const ALL: [Stage; STAGE_COUNT] = [Stage(0), Stage(1), Stage(2)];

    pub fn new(index: usize) -> Option<Stage> {
        if index < STAGE_COUNT {
            Some(Stage(index))
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// Stages preceding this one, in order.
    pub fn prior(&self) -> impl Iterator<Item = Stage> {
        (0..self.0).map(Stage)
    }

    pub fn is_last(&self) -> bool {
        self.0 == STAGE_COUNT - 1
    }
}

/// Rows eligible for labeling at `stage`, in original table order.
///
/// Stage 0 admits every row. A later stage admits a row iff every prior
/// stage's label parses as a valid `Label`. Each stage is filtered against
/// the full table independently; the result is not defined as a subset of
/// the previous stage's working set.
///
/// An empty result means the stage is immediately complete, not an error.
pub fn eligible_rows(dataset: &Dataset, stage: Stage) -> Vec<usize> {
    (0..dataset.num_rows())
        .filter(|&row| {
            stage
                .prior()
                .all(|prior| Label::parse(dataset.raw_label(row, prior)).is_some())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table with mixed label completeness:
    ///   row 0: 1차=Y, 2차=N   (complete through stage 2)
    ///   row 1: 1차=M          (complete through stage 1)
    ///   row 2: unset          (stage 0 only)
    ///   row 3: 1차=?, 2차=Y   (invalid stage-0 label; stage 0 only)
    fn mixed_dataset() -> Dataset {
        let columns = vec!["title".into(), "1차".into(), "2차".into(), "3차".into()];
        let rows = vec![
            vec!["a".into(), "Y".into(), "N".into(), String::new()],
            vec!["b".into(), "M".into(), String::new(), String::new()],
            vec!["c".into(), String::new(), String::new(), String::new()],
            vec!["d".into(), "?".into(), "Y".into(), String::new()],
        ];
        let (dataset, appended) =
            Dataset::new(columns, rows, &["1차".into(), "2차".into(), "3차".into()]);
        assert!(appended.is_empty());
        dataset
    }

    #[test]
    fn stage_zero_admits_all_rows() {
        let dataset = mixed_dataset();
        assert_eq!(eligible_rows(&dataset, Stage::ALL[0]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn later_stages_require_all_prior_labels() {
        let dataset = mixed_dataset();
        assert_eq!(eligible_rows(&dataset, Stage::ALL[1]), vec![0, 1]);
        assert_eq!(eligible_rows(&dataset, Stage::ALL[2]), vec![0]);
    }

    #[test]
    fn stage_two_does_not_credit_later_labels() {
        // Row 3 has 2차=Y but an invalid 1차, so it is not eligible past stage 0.
        let dataset = mixed_dataset();
        assert!(!eligible_rows(&dataset, Stage::ALL[1]).contains(&3));
        assert!(!eligible_rows(&dataset, Stage::ALL[2]).contains(&3));
    }

    #[test]
    fn eligible_rows_have_valid_prior_labels() {
        let dataset = mixed_dataset();
        for stage in Stage::ALL {
            for row in eligible_rows(&dataset, stage) {
                for prior in stage.prior() {
                    assert!(dataset.label(row, prior).is_some());
                }
            }
        }
    }

    #[test]
    fn empty_working_set_is_not_an_error() {
        let columns = vec!["title".into(), "1차".into(), "2차".into(), "3차".into()];
        let rows = vec![vec!["a".into(), String::new(), String::new(), String::new()]];
        let (dataset, _) =
            Dataset::new(columns, rows, &["1차".into(), "2차".into(), "3차".into()]);
        assert!(eligible_rows(&dataset, Stage::ALL[1]).is_empty());
    }

    #[test]
    fn stage_bounds() {
        assert!(Stage::new(2).is_some());
        assert!(Stage::new(3).is_none());
        assert!(Stage::ALL[2].is_last());
        assert!(!Stage::ALL[0].is_last());
    }
}
