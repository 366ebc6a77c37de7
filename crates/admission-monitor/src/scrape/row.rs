use super::normalizer::{clean_text, parse_rank};
use crate::snapshot::Applicant;

/// Rows with fewer cells are headers, group captions or spacers.
pub const MIN_ROW_CELLS: usize = 8;

/// Stored when the table has no total score column.
pub const SCORE_PLACEHOLDER: &str = "---";

/// Maps one table row's cell texts onto an [`Applicant`], or `None` when the row is not an
/// applicant row.
pub fn parse_row<S: AsRef<str>>(cells: &[S]) -> Option<Applicant> {
    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let cell = |index: usize| cells.get(index).map(|text| clean_text(text.as_ref()));

    Some(Applicant {
        position: parse_rank(&cell(0)?),
        unique_code: cell(1)?,
        consent: cell(2)?,
        sd_score: cell(3)?,
        lang_score: cell(4)?,
        achievements: cell(5)?,
        additional: cell(6)?,
        priority: parse_rank(&cell(7)?),
        total_score: cell(8).unwrap_or_else(|| SCORE_PLACEHOLDER.to_string()),
    })
}
