use crate::transcript::domain::ignore_list::IgnoreList;
use crate::transcript::domain::transcript_row::TranscriptRow;

/// What the scanner is currently inside of.
///
/// Bracketed content is only ambiguous while open; the first character after
/// `[` decides between annotation (alphabetic) and timestamp (anything else),
/// and the ignore list splits annotations into kept and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnnotationState {
    Normal,
    /// Inside a kept annotation; bracket characters pass through literally.
    Emotion,
    /// Inside a dropped annotation; nothing reaches the buffer until `]`.
    Ignored,
}

/// Single-pass segmenter for one transcript document.
///
/// Feed paragraphs in document order via [`consume`](TurnParser::consume);
/// each call returns the rows completed by that paragraph. Talk-turn and
/// segment counters are per-document, so a parser must not be reused across
/// documents.
///
/// An empty (or whitespace-only) paragraph ends the whole document: every
/// later paragraph is silently dropped. Source transcripts mark their end
/// with a blank line, and trailing boilerplate after it must not be parsed.
///
/// The parser never fails. Unbalanced brackets and other malformed input
/// degrade into rows with missing fields rather than errors.
pub struct TurnParser {
    ignored: IgnoreList,
    speaker: String,
    talk_turn: u32,
    segment: u32,
    pending_time: Option<String>,
    state: AnnotationState,
    halted: bool,
}

impl TurnParser {
    /// The ignore list is snapshotted here; later mutations of the caller's
    /// copy are not observed by this parser.
    pub fn new(ignored: IgnoreList) -> Self {
        Self {
            ignored,
            speaker: String::new(),
            talk_turn: 0,
            segment: 1,
            pending_time: None,
            state: AnnotationState::Normal,
            halted: false,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Consumes one paragraph and returns the rows it completed, in order.
    pub fn consume(&mut self, paragraph: &str) -> Vec<TranscriptRow> {
        let mut rows = Vec::new();
        if self.halted {
            return rows;
        }

        let text = paragraph.trim();
        if text.is_empty() {
            self.halted = true;
            return rows;
        }

        let chars: Vec<char> = text.chars().collect();
        let mut sb = String::new();
        // A timestamp deferred from the previous paragraph belongs to the
        // first row this paragraph flushes.
        let mut row_time = self.pending_time.take();

        for i in 0..chars.len() {
            let c = chars[i];
            let last = i + 1 == chars.len();

            // Forced flush at paragraph end. A final `]` outside any
            // annotation is the one case handled by the bracket arm instead
            // (it closes a timestamp and emits no text row).
            if last && (c != ']' || self.state != AnnotationState::Normal) {
                if self.state != AnnotationState::Ignored {
                    sb.push(c);
                }
                let time = row_time.take();
                self.flush(&mut rows, time, &sb);
                self.state = AnnotationState::Normal;
                break;
            }

            match c {
                ':' => {
                    if chars[i + 1] == ' ' {
                        // Speaker marker: everything buffered so far is the
                        // new speaker label.
                        self.speaker = sb.trim().to_string();
                        sb.clear();
                        self.talk_turn += 1;
                        self.segment = 1;
                    } else if self.state != AnnotationState::Ignored {
                        // Ordinary colon, e.g. inside `12:30`.
                        sb.push(':');
                    }
                }
                '[' => {
                    if chars[i + 1].is_alphabetic() {
                        if self.matches_ignored(&chars, i) {
                            self.state = AnnotationState::Ignored;
                        } else {
                            self.state = AnnotationState::Emotion;
                            sb.push('[');
                        }
                    } else if !sb.trim().is_empty() {
                        // Timestamp bracket: flush the text it punctuates
                        // first. The timestamp itself accumulates through
                        // the default arm and is claimed at `]`.
                        let time = row_time.take();
                        self.flush(&mut rows, time, &sb);
                        sb.clear();
                    }
                }
                ']' => match self.state {
                    AnnotationState::Ignored => self.state = AnnotationState::Normal,
                    AnnotationState::Emotion => {
                        sb.push(']');
                        self.state = AnnotationState::Normal;
                    }
                    AnnotationState::Normal => {
                        let stamp = sb.trim().to_string();
                        sb.clear();
                        if i + 2 >= chars.len() {
                            // Nothing non-trivial follows: defer the
                            // timestamp to the next paragraph's first row.
                            self.pending_time = Some(stamp);
                        } else {
                            row_time = Some(stamp);
                        }
                    }
                },
                _ => {
                    if self.state != AnnotationState::Ignored {
                        sb.push(c);
                    }
                }
            }
        }

        rows
    }

    fn flush(&mut self, rows: &mut Vec<TranscriptRow>, time: Option<String>, text: &str) {
        let segment = self.segment;
        self.segment += 1;
        rows.push(TranscriptRow {
            time,
            talk_turn: self.talk_turn,
            segment,
            speaker: self.speaker.clone(),
            text: text.trim().to_string(),
        });
    }

    /// Tests the annotation word that starts at `open` (a `[`) against the
    /// ignore list. The word runs to the first `]` or digit; without either,
    /// to the paragraph's last character (exclusive).
    fn matches_ignored(&self, chars: &[char], open: usize) -> bool {
        let mut end = chars.len() - 1;
        for (j, &c) in chars.iter().enumerate().skip(open) {
            if c == ']' || c.is_numeric() {
                end = j;
                break;
            }
        }
        let word: String = chars[open + 1..end].iter().collect();
        self.ignored.contains(&word)
    }
}
