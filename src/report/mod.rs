//! Dashboard rendering for Sitewatch.
//!
//! Pure functions from a status snapshot (plus optional per-check metrics)
//! to self-contained HTML or Markdown strings. The renderer performs no
//! network or filesystem access; the caller persists the output.

pub mod services;

#[cfg(test)]
mod tests;
