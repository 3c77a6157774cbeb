use poscore::feedback::{FeedbackError, FeedbackSink, Tone};
use std::io::{self, Write};

/// Rings the terminal bell; the tone shape is left to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleBell;

impl FeedbackSink for ConsoleBell {
    fn play(&mut self, _tone: &Tone) -> Result<(), FeedbackError> {
        let mut stderr = io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|err| FeedbackError::AudioUnavailable(err.to_string()))
    }
}
