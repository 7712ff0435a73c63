//! The prepared-statement probe capability, per §4.3 and §6. `sqlshape-pg`
//! provides the `tokio-postgres`-backed implementation; tests in this
//! crate use an in-memory fake.

use crate::catalog::Oid;
use crate::error::AnalyzerError;

/// The authoritative parameter and output-column types a live backend's
/// `PREPARE`/`DESCRIBE` returned for a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeDescription {
    /// Parameter types, in `$1, $2, ...` order.
    pub parameter_types: Vec<Oid>,
    /// Output column `(name, type_oid)` pairs, in `SELECT`/`RETURNING`
    /// order. Empty for statements with no result rows (e.g. `UPDATE`
    /// without `RETURNING`).
    pub output_columns: Vec<(String, Oid)>,
}

/// A capability for preparing and describing a statement against a live
/// backend, without exposing the wire protocol itself to this crate.
///
/// Implementors own the connection; `sqlshape-core` only ever calls
/// `prepare`, `describe`, and `deallocate` — in that order, always calling
/// `deallocate` even if `describe` failed, per the RAII guard contract in
/// §5.
pub trait ProbeConn {
    /// Issues `PREPARE` for `sql` (already rewritten to positional `$n`
    /// parameters), returning an opaque statement handle.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Probe`] if the backend rejects the
    /// statement.
    fn prepare(&mut self, sql: &str) -> Result<String, AnalyzerError>;

    /// Issues `DESCRIBE` for a handle returned by [`Self::prepare`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Probe`] if the backend cannot describe the
    /// statement.
    fn describe(&mut self, handle: &str) -> Result<ProbeDescription, AnalyzerError>;

    /// Issues `DEALLOCATE` for a handle returned by [`Self::prepare`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Probe`] if deallocation fails. Callers
    /// should still treat the statement's resources as released.
    fn deallocate(&mut self, handle: &str) -> Result<(), AnalyzerError>;
}

/// Runs `prepare` → `describe` → `deallocate` against `probe`, guaranteeing
/// `deallocate` runs even if `describe` failed (§5's RAII guard contract,
/// without requiring `ProbeConn` itself to be droppable state).
///
/// # Errors
///
/// Returns whichever of `describe`'s or `deallocate`'s errors occurred;
/// `describe`'s takes priority if both failed.
pub fn probe_statement(probe: &mut dyn ProbeConn, sql: &str) -> Result<ProbeDescription, AnalyzerError> {
    let handle = probe.prepare(sql)?;
    let description = probe.describe(&handle);
    let dealloc = probe.deallocate(&handle);
    match (description, dealloc) {
        (Ok(description), Ok(())) => Ok(description),
        (Err(err), _) => Err(err),
        (Ok(_), Err(err)) => Err(err),
    }
}
