use std::slice;

use crate::error::Error;

/// Collects the lexical errors of a single run.
///
/// A run has failed as soon as one error is reported; the flag stays set
/// until [`Diagnostics::reset`] is called.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn error<S: Into<String>>(&mut self, line: usize, message: S) {
        self.report(Error::lexical(line, message))
    }

    pub fn has_failed(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        self.errors.clear();
    }
}

impl <'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let d = Diagnostics::new();
        assert!(!d.has_failed());
        assert!(d.is_empty());
    }

    #[test]
    fn failure_is_sticky_until_reset() {
        let mut d = Diagnostics::new();
        d.error(3, "Something odd.");
        d.report(Error::unterminated_string(5));
        assert!(d.has_failed());
        assert_eq!(2, d.len());

        let mut lines = Vec::new();
        for e in &d {
            lines.push(e.line());
        }
        assert_eq!(vec![3, 5], lines);

        d.reset();
        assert!(!d.has_failed());
        assert_eq!(0, d.errors().len());
    }
}
