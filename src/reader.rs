//! Streaming decoder for dot-terminated message bodies
//! ([RFC 3977 §3.1.1](https://datatracker.ietf.org/doc/html/rfc3977#section-3.1.1)).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::source::CharSource;

/// Line ending emitted in place of each decoded CRLF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// The host platform's native convention: [`CrLf`](Self::CrLf) on
    /// Windows, [`Lf`](Self::Lf) elsewhere.
    pub fn native() -> Self {
        if cfg!(windows) { Self::CrLf } else { Self::Lf }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Decodes a multi-line response body terminated by a line containing a
/// single period, as produced by NNTP
/// ([RFC 3977 §3.1.1](https://datatracker.ietf.org/doc/html/rfc3977#section-3.1.1))
/// and POP3 ([RFC 1939 §3](https://datatracker.ietf.org/doc/html/rfc1939#section-3)).
///
/// Wraps a [`CharSource`] positioned at the first character of the body and
/// yields the decoded content: doubled leading periods collapse to one,
/// every CRLF is replaced by the configured [`LineEnding`], the terminator
/// line is consumed but never surfaced, and reads past it report end of
/// stream.
///
/// The terminator line's own CRLF is consumed from the source, so once the
/// decoder has been drained (or [`close`](Self::close)d) the source sits
/// exactly at the start of the next protocol exchange. The decoder never
/// closes the source. If the source ends before the terminator line
/// appears, whatever was received decodes normally and the stream ends
/// silently.
///
/// All operations take `&mut self`; a decoder shared across tasks must be
/// wrapped in a `Mutex` by the caller.
#[derive(Debug)]
pub struct DotTerminatedReader<S> {
    source: Option<S>,
    pending: VecDeque<char>,
    ending: LineEnding,
    at_start: bool,
    eof: bool,
}

impl<S: CharSource> DotTerminatedReader<S> {
    /// Wrap `source` using the platform's native line ending.
    ///
    /// Performs no I/O; `source` must already be positioned at the first
    /// character of the body.
    pub fn new(source: S) -> Self {
        Self::with_line_ending(source, LineEnding::native())
    }

    pub fn with_line_ending(source: S, ending: LineEnding) -> Self {
        Self {
            source: Some(source),
            pending: VecDeque::with_capacity(ending.as_str().len() + 2),
            ending,
            at_start: true,
            eof: false,
        }
    }

    /// Next decoded character, or `None` at end of message.
    ///
    /// A single call may perform several reads on the source to resolve
    /// stuffing and terminator lookahead.
    pub fn read_char(&mut self) -> Result<Option<char>, DecodeError> {
        if let Some(ch) = self.pending.pop_front() {
            return Ok(Some(ch));
        }
        if self.eof {
            return Ok(None);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        let Some(ch) = source.read_char()? else {
            // Source exhausted before the terminator line appeared.
            // Degrades to an ordinary end of stream.
            self.eof = true;
            return Ok(None);
        };

        if self.at_start {
            self.at_start = false;
            if ch == '.' {
                return match source.read_char()? {
                    Some('.') => Ok(Some('.')),
                    _ => {
                        // Empty body: the message opens with its own
                        // terminator line. Consume the line ending too.
                        source.read_char()?;
                        self.eof = true;
                        tracing::trace!("empty body terminator");
                        Ok(None)
                    }
                };
            }
        }

        if ch != '\r' {
            return Ok(Some(ch));
        }

        match source.read_char()? {
            Some('\n') => {}
            Some(other) => {
                // Lone CR, not part of a line ending.
                source.unread_char(other);
                return Ok(Some('\r'));
            }
            None => return Ok(Some('\r')),
        }

        match source.read_char()? {
            Some('.') => match source.read_char()? {
                Some('.') => {
                    // Stuffed line: the doubled period collapses to one.
                    self.stage_line_ending();
                    self.pending.push_back('.');
                }
                _ => {
                    // Terminator line; discard the remainder of its CRLF
                    // so the source ends up past it.
                    source.read_char()?;
                    self.eof = true;
                    tracing::trace!("body terminator reached");
                    self.stage_line_ending();
                }
            },
            Some(other) => {
                source.unread_char(other);
                self.stage_line_ending();
            }
            None => {
                self.stage_line_ending();
            }
        }

        Ok(self.pending.pop_front())
    }

    /// Fill `buf` with decoded characters.
    ///
    /// Returns `Ok(None)` if the message had already ended before the first
    /// character, otherwise `Ok(Some(n))` with `1 <= n <= buf.len()`. An
    /// empty `buf` returns `Ok(Some(0))` without touching the source. To
    /// fill a sub-range, pass a sub-slice.
    pub fn read_chars(&mut self, buf: &mut [char]) -> Result<Option<usize>, DecodeError> {
        if buf.is_empty() {
            return Ok(Some(0));
        }
        let Some(first) = self.read_char()? else {
            return Ok(None);
        };
        buf[0] = first;
        let mut filled = 1;
        while filled < buf.len() {
            match self.read_char()? {
                Some(ch) => {
                    buf[filled] = ch;
                    filled += 1;
                }
                None => break,
            }
        }
        Ok(Some(filled))
    }

    /// Drain the remaining decoded content into a `String`.
    pub fn read_to_string(&mut self) -> Result<String, DecodeError> {
        let mut out = String::new();
        while let Some(ch) = self.read_char()? {
            out.push(ch);
        }
        Ok(out)
    }

    /// Whether decoded characters are staged, or the source reports
    /// readiness. Performs no blocking I/O.
    pub fn ready(&mut self) -> Result<bool, DecodeError> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        match self.source.as_mut() {
            Some(source) => Ok(source.ready()?),
            None => Ok(false),
        }
    }

    /// Finish with the message, leaving the source positioned past the
    /// terminator line.
    ///
    /// If the terminator has not been reached yet, reads and discards the
    /// remainder of the body first; a partially read message that is never
    /// closed leaves the connection desynchronized for the next exchange.
    /// Does not close the source; its reference is released. Idempotent;
    /// reads after close report end of stream.
    pub fn close(&mut self) -> Result<(), DecodeError> {
        if self.source.is_none() {
            return Ok(());
        }
        if !self.eof {
            let mut drained = 0usize;
            while self.read_char()?.is_some() {
                drained += 1;
            }
            if drained > 0 {
                tracing::debug!(drained, "discarded undelivered body characters on close");
            }
        }
        self.eof = true;
        self.at_start = false;
        self.pending.clear();
        self.source = None;
        Ok(())
    }

    fn stage_line_ending(&mut self) {
        for ch in self.ending.as_str().chars() {
            self.pending.push_back(ch);
        }
    }
}
