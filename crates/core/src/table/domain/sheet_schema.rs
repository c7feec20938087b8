//! Fixed layout of the coding sheet.
//!
//! The first four rows are boilerplate the researchers fill in (family id,
//! file name, a merged "Code" banner over the coding columns) followed by
//! the thirteen column headers; transcript rows start below them. The eight
//! coding columns stay empty in generated output.

/// 0-based column indices of the transcript fields.
pub const TIME: usize = 0;
pub const TALK_TURN: usize = 1;
pub const SEGMENT: usize = 2;
pub const SPEAKER: usize = 3;
pub const TEXT: usize = 4;

/// 0-based sheet row indices of the boilerplate rows.
pub const FAMILY_ID_ROW: usize = 0;
pub const FILE_NAME_ROW: usize = 1;
pub const CODE_ROW: usize = 2;
pub const HEADER_ROW: usize = 3;
pub const FIRST_DATA_ROW: usize = 4;

pub const FAMILY_ID_LABEL: &str = "Family ID";
pub const FILE_NAME_LABEL: &str = "File name";
pub const CODE_LABEL: &str = "Code";

pub const HEADER_LABELS: [&str; 13] = [
    "Time",
    "Talk turn",
    "Segment",
    "Speaker",
    "Text",
    "NegativeEmotion",
    "EmotionalSupport",
    "Mom",
    "Dad",
    "Sib1",
    "Sib2",
    "Par_NM",
    "Y_NM",
];

/// 0-based span of the coding columns the "Code" banner merges across.
pub const CODE_FIRST_COLUMN: usize = 5;
pub const CODE_LAST_COLUMN: usize = 12;

/// Widths of the leading columns in 1/256-character units.
pub const COLUMN_WIDTHS: [u32; 7] = [2500, 2500, 2500, 5000, 10000, 5000, 5000];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_covers_code_span() {
        assert_eq!(HEADER_LABELS.len(), CODE_LAST_COLUMN + 1);
        assert!(CODE_FIRST_COLUMN > TEXT);
    }

    #[test]
    fn test_transcript_columns_lead_the_sheet() {
        assert_eq!(HEADER_LABELS[TIME], "Time");
        assert_eq!(HEADER_LABELS[TALK_TURN], "Talk turn");
        assert_eq!(HEADER_LABELS[SEGMENT], "Segment");
        assert_eq!(HEADER_LABELS[SPEAKER], "Speaker");
        assert_eq!(HEADER_LABELS[TEXT], "Text");
    }
}
