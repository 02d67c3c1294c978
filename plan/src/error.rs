//! Errors raised inside the document store.
//!
//! None of these escape the public editing API: every entry point logs the
//! error and turns it into a no-op. They exist so the internal helpers can
//! use `?` and so tests can assert on the exact rejection reason.

use crate::doc::{ElementId, ElementKind};

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("element {0} is not a booth")]
    NotABooth(ElementId),
    #[error("invalid element draft: {0}")]
    InvalidDraft(String),
    #[error("invalid geometry: x={x} y={y} width={width} height={height}")]
    InvalidGeometry { x: f64, y: f64, width: f64, height: f64 },
    #[error("detail kind {incoming:?} does not match element kind {current:?}")]
    KindMismatch { incoming: ElementKind, current: ElementKind },
}
