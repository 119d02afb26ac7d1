//! Dot-terminated message body decoding for line-based text protocols.
//!
//! NNTP ([RFC 3977 §3.1.1](https://datatracker.ietf.org/doc/html/rfc3977#section-3.1.1))
//! and POP3 ([RFC 1939 §3](https://datatracker.ietf.org/doc/html/rfc1939#section-3))
//! send multi-line responses as CRLF-delimited lines terminated by a line
//! containing a single period, with any body line that starts with a period
//! sent with that period doubled ("dot-stuffing"). [`DotTerminatedReader`]
//! wraps a character source positioned at the start of such a body and
//! streams the decoded content:
//!
//! - doubled leading periods collapse to one
//! - every CRLF is replaced by the configured [`LineEnding`]
//! - the terminator line is consumed but never surfaced
//! - reads past the terminator report end of stream
//!
//! The source is left positioned exactly past the terminator line, so the
//! same connection can carry the next protocol exchange.
//!
//! ```
//! use dotterm::{DotTerminatedReader, LineEnding, StringSource};
//!
//! let source = StringSource::new("hello\r\n..dotted\r\n.\r\n");
//! let mut reader = DotTerminatedReader::with_line_ending(source, LineEnding::Lf);
//! assert_eq!(reader.read_to_string().unwrap(), "hello\n.dotted\n");
//! ```

mod error;
mod reader;
mod source;

pub use crate::error::DecodeError;
pub use crate::reader::{DotTerminatedReader, LineEnding};
pub use crate::source::{CharSource, StringSource};
