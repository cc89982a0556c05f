//! CLI command implementations - one module per subcommand.

use bridgeschema_modules::ParserError;
use std::path::Path;

pub mod combine;
pub mod parse;

/// Print a fault as `path:line:column: severity: message`.
pub(crate) fn report_fault(path: &Path, error: &ParserError, severity: &str) {
    eprintln!(
        "{}:{}: {}: {}",
        path.display(),
        error.span,
        severity,
        error.kind
    );
}
