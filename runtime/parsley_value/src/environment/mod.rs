//! Lexical scopes for the evaluator.
//!
//! An `Environment` is a cheap handle to one scope. Scopes link to their
//! parent, and the link never changes after creation. Closures and
//! dictionary entries capture a handle, never a copy, so later writes to a
//! captured scope are visible through every handle to it.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::Value;

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// A plain declaration (`Expr::Let` with `immutable: false`). `assign`
    /// may rebind it.
    Mutable,
    /// The immutable `let` form (`Expr::Let` with `immutable: true`).
    /// `assign` fails.
    Immutable,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Whether a binding is visible to importers of the module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Local,
    Exported,
}

/// Error returned by `declare` and `assign`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Variable exists but is immutable.
    Immutable,
    /// Variable not found in any scope.
    Undefined,
    /// Name is reserved in this scope and cannot be rebound.
    Protected,
}

/// A single-threaded scope wrapper for reference-counted interior
/// mutability.
///
/// All scope allocations go through `LocalScope::new()`. Scopes are never
/// shared across threads, hence `Rc` rather than `Arc`.
#[repr(transparent)]
pub(crate) struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A variable binding.
#[derive(Clone)]
struct Binding {
    value: Value,
    mutability: Mutability,
    visibility: Visibility,
}

/// Bindings owned by one scope.
#[derive(Default)]
struct Scope {
    bindings: FxHashMap<String, Binding>,
    /// Names that may not be redeclared or assigned in this scope.
    protected: FxHashSet<String>,
    parent: Option<Environment>,
}

/// Handle to a scope and, through it, its chain of enclosing scopes.
#[derive(Clone)]
pub struct Environment(LocalScope<Scope>);

impl Environment {
    /// A new root scope.
    pub fn new() -> Self {
        Environment(LocalScope::new(Scope::default()))
    }

    /// A new scope whose parent is `self`.
    #[must_use]
    pub fn enclosed(&self) -> Self {
        Environment(LocalScope::new(Scope {
            parent: Some(self.clone()),
            ..Scope::default()
        }))
    }

    /// The enclosing scope, if any.
    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    /// Returns `true` if both handles refer to the same scope.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&(a.0).0, &(b.0).0)
    }

    /// Look a name up here, then in each enclosing scope outward.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        if let Some(binding) = scope.bindings.get(name) {
            return Some(binding.value.clone());
        }
        scope.parent.as_ref()?.resolve(name)
    }

    /// Bind `name` in this scope only, shadowing any outer binding.
    pub fn declare(
        &self,
        name: impl Into<String>,
        value: Value,
        visibility: Visibility,
        mutability: Mutability,
    ) -> Result<(), AssignError> {
        let name = name.into();
        let mut scope = self.0.borrow_mut();
        if scope.protected.contains(&name) {
            return Err(AssignError::Protected);
        }
        scope.bindings.insert(
            name,
            Binding {
                value,
                mutability,
                visibility,
            },
        );
        Ok(())
    }

    /// Declare a local, mutable binding.
    pub fn define(&self, name: impl Into<String>, value: Value) -> Result<(), AssignError> {
        self.declare(name, value, Visibility::Local, Mutability::Mutable)
    }

    /// Overwrite an existing binding in the scope that owns it.
    ///
    /// Assigning to a name no scope owns is an error, not a declaration.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        let parent = {
            let mut guard = self.0.borrow_mut();
            let scope = &mut *guard;
            if let Some(binding) = scope.bindings.get_mut(name) {
                if scope.protected.contains(name) {
                    return Err(AssignError::Protected);
                }
                if !binding.mutability.is_mutable() {
                    return Err(AssignError::Immutable);
                }
                binding.value = value;
                return Ok(());
            }
            scope.parent.clone()
        };
        match parent {
            Some(parent) => parent.assign(name, value),
            None => Err(AssignError::Undefined),
        }
    }

    /// Bind `name` and reserve it against later redeclaration or assignment
    /// in this scope. Used for builtins.
    pub fn protect(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let mut scope = self.0.borrow_mut();
        scope.bindings.insert(
            name.clone(),
            Binding {
                value,
                mutability: Mutability::Immutable,
                visibility: Visibility::Local,
            },
        );
        scope.protected.insert(name);
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.0.borrow().protected.contains(name)
    }

    /// Whether `name` is exported from this scope.
    pub fn is_exported(&self, name: &str) -> bool {
        self.0
            .borrow()
            .bindings
            .get(name)
            .is_some_and(|b| b.visibility == Visibility::Exported)
    }

    /// Whether the binding `name` resolves to is immutable.
    pub fn is_immutable(&self, name: &str) -> bool {
        let scope = self.0.borrow();
        match scope.bindings.get(name) {
            Some(binding) => !binding.mutability.is_mutable(),
            None => scope
                .parent
                .as_ref()
                .is_some_and(|parent| parent.is_immutable(name)),
        }
    }

    /// Exported bindings of this scope, sorted by name.
    pub fn exports(&self) -> Vec<(String, Value)> {
        let scope = self.0.borrow();
        let mut exports: Vec<_> = scope
            .bindings
            .iter()
            .filter(|(_, b)| b.visibility == Visibility::Exported)
            .map(|(name, b)| (name.clone(), b.value.clone()))
            .collect();
        exports.sort_by(|a, b| a.0.cmp(&b.0));
        exports
    }

    /// Every name visible from this scope, sorted and deduplicated.
    pub fn identifiers(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.0.borrow();
            names.extend(scope.bindings.keys().cloned());
            current = scope.parent.clone();
        }
        names.sort();
        names.dedup();
        names
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

// Scopes can reach themselves through captured closures, so Debug lists
// names only.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<_> = scope.bindings.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}
