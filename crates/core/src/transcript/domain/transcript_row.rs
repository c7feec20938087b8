/// One output line of the coding table.
///
/// `talk_turn` is shared by every row of the same uninterrupted speaker
/// turn; `segment` counts the pieces that turn was split into (by time
/// brackets or paragraph ends) and restarts at 1 with each new speaker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptRow {
    /// Timestamp label, present only on the row that starts a new time segment.
    pub time: Option<String>,
    pub talk_turn: u32,
    pub segment: u32,
    /// Most recently recognized speaker label, carried forward.
    pub speaker: String,
    /// Accumulated, trimmed utterance text.
    pub text: String,
}
