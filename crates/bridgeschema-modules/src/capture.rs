//! Deferred collection of recoverable parser faults.

use crate::error::ParserError;

/// Collects recoverable faults for one module build.
///
/// A unit of translation runs through [`ErrorCapturer::capture`]. Recoverable
/// faults are recorded and turn into `Ok(None)`; fatal faults are returned
/// unchanged so they abort the whole module.
#[derive(Debug, Default)]
pub struct ErrorCapturer {
    errors: Vec<ParserError>,
    discard: bool,
}

impl ErrorCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capturer that swallows recoverable faults without recording them.
    pub fn discarding() -> Self {
        Self {
            errors: Vec::new(),
            discard: true,
        }
    }

    pub fn capture<T>(
        &mut self,
        unit: impl FnOnce(&mut Self) -> Result<T, ParserError>,
    ) -> Result<Option<T>, ParserError> {
        match unit(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                self.record(err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn record(&mut self, err: ParserError) {
        if !self.discard {
            self.errors.push(err);
        }
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParserError> {
        self.errors
    }
}
