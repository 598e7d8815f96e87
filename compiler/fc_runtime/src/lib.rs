//! fastcode runtime - the reference-counted value heap.
//!
//! Runtime values live in apartments owned by a `GarbageCollector`. Bindings
//! in an `Environment`, struct fields, and collection links all name
//! apartments by `ApartmentId`, so assigning an aggregate shares it rather
//! than copying it:
//!
//! ```text
//! a = [1, 2]      a ─► head ─► 1 ─► 2
//! b = a           b ─┘
//! ```
//!
//! Every apartment carries a count of the ownership paths that reach it.
//! Apartments whose count drops to zero are reclaimed by the next sweep.

mod apartment;
mod builtins;
mod collection;
mod collector;
mod environment;
mod errors;
mod structs;
mod value;

use std::sync::Once;

pub use apartment::{Apartment, ApartmentId};
pub use builtins::{BuiltinFn, Builtins};
pub use collector::{CollectorConfig, GarbageCollector, GcStats};
pub use environment::Environment;
pub use errors::{RuntimeError, RuntimeResult};
pub use value::{Children, CollectionValue, StructField, StructInstance, Value, ValueKind};

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has any
/// effect. Enable with `RUST_LOG=fc_runtime=debug` or `RUST_LOG=fc_runtime=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true),
                )
                .init();
        }
    });
}
