//! Fixed-size, ordered store of typed variables.
//!
//! [`VariableRegistry`] is built once at startup from the application's
//! variable set and never grows or shrinks afterwards. Slots are addressed
//! by insertion index; names are resolved with a linear scan, which is
//! fine for the tens of variables a control surface exposes.

use super::variable::{VarValue, Variable};
use crate::error::{RegistryError, VarError};

/// Central store for all exposed variables.
///
/// Owned by a single task; there is no interior locking. Readers always
/// copy values out into reply payloads.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    vars: Box<[Variable]>,
}

impl VariableRegistry {
    /// Creates a registry over the given variables, preserving their order.
    ///
    /// Duplicate names are accepted; lookups resolve to the first one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Empty`] if `vars` is empty.
    pub fn new(vars: Vec<Variable>) -> Result<Self, RegistryError> {
        if vars.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (index, var) in vars.iter().enumerate() {
            if vars
                .iter()
                .take(index)
                .any(|earlier| earlier.name() == var.name())
            {
                tracing::warn!(name = var.name(), index, "duplicate variable name shadowed");
            }
        }
        Ok(Self {
            vars: vars.into_boxed_slice(),
        })
    }

    /// Returns the index of the first variable named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|v| v.name() == name)
    }

    /// Returns the variable at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Variable> {
        self.vars.get(index)
    }

    /// Looks a variable up by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Variable> {
        self.find(name).and_then(|i| self.get(i))
    }

    /// Writes `candidate` into slot `index`.
    ///
    /// Checks run in order: index bounds, kind compatibility, limits.
    /// On any failure the stored value is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::InvalidIndex`], [`VarError::TypeMismatch`] or
    /// [`VarError::OutOfRange`].
    pub fn set(&mut self, index: usize, candidate: VarValue) -> Result<&Variable, VarError> {
        let var = self
            .vars
            .get_mut(index)
            .ok_or(VarError::InvalidIndex(index))?;
        var.assign(candidate)?;
        tracing::info!(name = var.name(), value = %var.value(), "variable updated");
        Ok(var)
    }

    /// Iterates over the variables in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    /// Returns the number of registered variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if the registry holds no variables.
    ///
    /// Always `false` for a registry built with [`VariableRegistry::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
