//! Append-only output buffer with line semantics.

/// Length-tracked byte buffer.
///
/// Every `out` call appends the line followed by `\n`, so `len()` is always
/// the offset at which the next line starts. Output can be redirected into
/// a scratch buffer and the captured bytes taken back with `restore`.
#[derive(Debug, Default)]
pub struct ByteSink {
    buffer: Vec<u8>,
    redirects: Vec<Vec<u8>>,
}

impl ByteSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the active destination.
    pub fn len(&self) -> usize {
        self.active().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn out(&mut self, line: &str) {
        self.out_bytes(line.as_bytes());
    }

    pub fn out_bytes(&mut self, line: &[u8]) {
        let target = self.active_mut();
        target.extend_from_slice(line);
        target.push(b'\n');
    }

    pub fn out_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.out(line.as_ref());
        }
    }

    /// Sends subsequent output to a fresh buffer.
    pub fn redirect(&mut self) {
        self.redirects.push(Vec::new());
    }

    /// Ends the innermost redirect and returns what it captured, without the
    /// final line terminator.
    pub fn restore(&mut self) -> Option<Vec<u8>> {
        let mut captured = self.redirects.pop()?;
        if captured.last() == Some(&b'\n') {
            captured.pop();
        }
        Some(captured)
    }

    pub fn is_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }

    /// Consumes the sink; the final line carries no terminator.
    pub fn into_bytes(mut self) -> Vec<u8> {
        if self.redirects.is_empty() && self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
        }
        self.buffer
    }

    fn active(&self) -> &Vec<u8> {
        self.redirects.last().unwrap_or(&self.buffer)
    }

    fn active_mut(&mut self) -> &mut Vec<u8> {
        match self.redirects.last_mut() {
            Some(buffer) => buffer,
            None => &mut self.buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_tracks_length() {
        let mut sink = ByteSink::new();
        assert!(sink.is_empty());
        sink.out("%PDF-1.3");
        assert_eq!(sink.len(), 9);
        sink.out_bytes(&[b'%', 0xBA, 0xDF, 0xAC, 0xE0]);
        assert_eq!(sink.len(), 15);
    }

    #[test]
    fn test_into_bytes_strips_last_newline() {
        let mut sink = ByteSink::new();
        sink.out_lines(["startxref", "42", "%%EOF"]);
        assert_eq!(sink.into_bytes(), b"startxref\n42\n%%EOF".to_vec());
    }

    #[test]
    fn test_redirect_and_restore() {
        let mut sink = ByteSink::new();
        sink.out("1 0 obj");

        sink.redirect();
        assert!(sink.is_redirected());
        assert_eq!(sink.len(), 0);
        sink.out("0 0 m");
        sink.out("10 10 l");

        sink.redirect();
        sink.out("nested");
        assert_eq!(sink.restore(), Some(b"nested".to_vec()));

        assert_eq!(sink.restore(), Some(b"0 0 m\n10 10 l".to_vec()));
        assert!(!sink.is_redirected());
        assert_eq!(sink.len(), 8);
        assert_eq!(sink.restore(), None);
    }
}
