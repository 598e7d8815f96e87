//! Root bindings of a running program.
//!
//! Every name bound here holds one root reference on its apartment. The
//! global table lives for the whole run; each function call pushes a local
//! scope, and popping it releases the locals it bound. Locals of outer calls
//! are not visible from inner ones.

use rustc_hash::FxHashMap;

use crate::{ApartmentId, GarbageCollector, RuntimeError, RuntimeResult};

type Bindings = FxHashMap<String, ApartmentId>;

#[derive(Clone, Debug, Default)]
pub struct Environment {
    global: Bindings,
    scopes: Vec<Bindings>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Number of local scopes currently pushed.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Bindings::default());
        tracing::debug!(depth = self.scopes.len(), "pushed scope");
    }

    /// Drop the innermost local scope, releasing everything it bound.
    pub fn pop_scope(&mut self, gc: &mut GarbageCollector) -> RuntimeResult<()> {
        let Some(scope) = self.scopes.pop() else {
            return Ok(());
        };
        tracing::debug!(depth = self.scopes.len(), released = scope.len(), "popped scope");
        release_all(gc, scope)
    }

    /// Bind `name` to `id`, releasing whatever the name held before.
    ///
    /// Non-global bindings go to the innermost scope, or to the global table
    /// when no scope is pushed.
    pub fn bind(
        &mut self,
        gc: &mut GarbageCollector,
        name: &str,
        id: ApartmentId,
        global: bool,
    ) -> RuntimeResult<()> {
        gc.add_reference(id)?;
        let table = match self.scopes.last_mut() {
            Some(scope) if !global => scope,
            _ => &mut self.global,
        };
        if let Some(previous) = table.insert(name.to_string(), id) {
            gc.remove_reference(previous)?;
        }
        tracing::trace!(name, apartment = ?id, global, "bound");
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<ApartmentId> {
        self.scopes
            .last()
            .and_then(|scope| scope.get(name))
            .or_else(|| self.global.get(name))
            .copied()
    }

    /// Like `lookup`, failing with `UndefinedVariable`.
    pub fn get(&self, name: &str) -> RuntimeResult<ApartmentId> {
        self.lookup(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Release every binding, local and global.
    pub fn clear(&mut self, gc: &mut GarbageCollector) -> RuntimeResult<()> {
        while !self.scopes.is_empty() {
            self.pop_scope(gc)?;
        }
        release_all(gc, std::mem::take(&mut self.global))
    }
}

fn release_all(gc: &mut GarbageCollector, bindings: Bindings) -> RuntimeResult<()> {
    for id in bindings.into_values() {
        gc.remove_reference(id)?;
    }
    Ok(())
}
