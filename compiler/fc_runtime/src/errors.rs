//! Errors raised by the runtime heap and the built-ins.
//!
//! Two categories share one enum:
//! - Invariant violations (`ReferenceUnderflow`, `ReferenceOverflow`,
//!   `DanglingApartment`, `CycleDetected`): the evaluator broke the heap's contract. They are
//!   logged at `error` level where they are detected and must not be
//!   reported as user errors.
//! - Language-level failures (wrong kind, bad index, unknown name): the
//!   user's program did something invalid.

use std::fmt;

use crate::{ApartmentId, ValueKind};

/// Result of a heap or built-in operation.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    // Invariant violations
    /// Releasing more references than an apartment holds.
    ReferenceUnderflow {
        apartment: ApartmentId,
        held: u32,
        released: u64,
    },
    /// Adding references past `u32::MAX`.
    ReferenceOverflow {
        apartment: ApartmentId,
        held: u32,
        added: u64,
    },
    /// An id that does not name a live apartment.
    DanglingApartment { apartment: ApartmentId },
    /// Installing `child` under `parent` would make `parent` its own
    /// descendant.
    CycleDetected {
        parent: ApartmentId,
        child: ApartmentId,
    },

    // Language-level
    NotACollection { got: ValueKind },
    NotAStruct { got: ValueKind },
    IndexOutOfBounds { index: usize, len: usize },
    UndefinedField { field: String },
    UndefinedVariable { name: String },
    UnknownBuiltin { name: String },
    ArityMismatch {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    TypeMismatch {
        name: &'static str,
        expected: ValueKind,
        got: ValueKind,
    },
}

impl RuntimeError {
    /// Whether this error is a broken heap contract rather than a user error.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::ReferenceUnderflow { .. }
                | Self::ReferenceOverflow { .. }
                | Self::DanglingApartment { .. }
                | Self::CycleDetected { .. }
        )
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReferenceUnderflow {
                apartment,
                held,
                released,
            } => write!(
                f,
                "internal error: released {released} references from {apartment:?}, which holds {held}"
            ),
            Self::ReferenceOverflow {
                apartment,
                held,
                added,
            } => write!(
                f,
                "internal error: adding {added} references to {apartment:?}, which holds {held}, overflows its count"
            ),
            Self::DanglingApartment { apartment } => {
                write!(f, "internal error: {apartment:?} is not a live apartment")
            }
            Self::CycleDetected { parent, child } => write!(
                f,
                "cannot store {child:?} inside {parent:?}: it already contains it"
            ),
            Self::NotACollection { got } => write!(f, "expected a collection, got {got}"),
            Self::NotAStruct { got } => write!(f, "expected a struct instance, got {got}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::UndefinedField { field } => write!(f, "no field `{field}` on struct"),
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::UnknownBuiltin { name } => write!(f, "undefined function: {name}"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "{name} expects {expected} {arg_word}, got {got}")
            }
            Self::TypeMismatch {
                name,
                expected,
                got,
            } => write!(f, "{name} expects a {expected}, got {got}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
