//! Character sources feeding the decoder.

use std::io;

/// Input contract required by [`DotTerminatedReader`](crate::DotTerminatedReader):
/// single-character reads plus a one-slot pushback so a peeked character can
/// be un-consumed.
///
/// The decoder never pushes back more than one character at a time and never
/// calls [`unread_char`](Self::unread_char) twice without an intervening
/// [`read_char`](Self::read_char), so implementations only need a single
/// pushback slot.
pub trait CharSource {
    /// Next character, or `None` once the transport is exhausted.
    fn read_char(&mut self) -> io::Result<Option<char>>;

    /// Return `ch` so that the next [`read_char`](Self::read_char) yields it
    /// again.
    fn unread_char(&mut self, ch: char);

    /// Whether a [`read_char`](Self::read_char) would return without
    /// blocking.
    fn ready(&mut self) -> io::Result<bool>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        (**self).read_char()
    }

    fn unread_char(&mut self, ch: char) {
        (**self).unread_char(ch)
    }

    fn ready(&mut self) -> io::Result<bool> {
        (**self).ready()
    }
}

/// In-memory [`CharSource`] over owned text.
///
/// Infallible; useful when the framed body has already been received in
/// full, and for tests.
#[derive(Debug)]
pub struct StringSource {
    chars: Vec<char>,
    pos: usize,
    pushed: Option<char>,
}

impl StringSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            chars: text.into().chars().collect(),
            pos: 0,
            pushed: None,
        }
    }
}

impl CharSource for StringSource {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        if let Some(ch) = self.pushed.take() {
            return Ok(Some(ch));
        }
        match self.chars.get(self.pos) {
            Some(&ch) => {
                self.pos += 1;
                Ok(Some(ch))
            }
            None => Ok(None),
        }
    }

    fn unread_char(&mut self, ch: char) {
        debug_assert!(self.pushed.is_none(), "pushback slot already occupied");
        self.pushed = Some(ch);
    }

    fn ready(&mut self) -> io::Result<bool> {
        Ok(self.pushed.is_some() || self.pos < self.chars.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_order_until_exhausted() {
        let mut src = StringSource::new("ab");
        assert_eq!(src.read_char().unwrap(), Some('a'));
        assert_eq!(src.read_char().unwrap(), Some('b'));
        assert_eq!(src.read_char().unwrap(), None);
        assert_eq!(src.read_char().unwrap(), None);
    }

    #[test]
    fn unread_is_returned_by_next_read() {
        let mut src = StringSource::new("xy");
        assert_eq!(src.read_char().unwrap(), Some('x'));
        src.unread_char('x');
        assert_eq!(src.read_char().unwrap(), Some('x'));
        assert_eq!(src.read_char().unwrap(), Some('y'));
    }

    #[test]
    fn ready_reflects_remaining_input() {
        let mut src = StringSource::new("z");
        assert!(src.ready().unwrap());
        assert_eq!(src.read_char().unwrap(), Some('z'));
        assert!(!src.ready().unwrap());
        src.unread_char('z');
        assert!(src.ready().unwrap());
    }

    #[test]
    fn mut_ref_forwards_to_inner_source() {
        let mut src = StringSource::new("q");
        let mut by_ref: &mut StringSource = &mut src;
        assert_eq!(by_ref.read_char().unwrap(), Some('q'));
        assert_eq!(src.read_char().unwrap(), None);
    }
}
