//! Ordered stack of live views.

use crate::navigation::view::{View, ViewInstance, ViewKind, ViewToken};

/// Result of an [`ViewStack::exit`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitOutcome {
    /// The current view was removed.
    Exited(ViewInstance),
    /// The current view is the root and stays.
    RootRetained,
    /// Nothing was on the stack.
    Empty,
}

/// Views in push order; the last element is current.
///
/// The first instance is the root and can never be exited.
#[derive(Debug, Clone)]
pub struct ViewStack {
    instances: Vec<ViewInstance>,
    next_token: u64,
}

impl ViewStack {
    /// Empty stack. The first push becomes the root.
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            next_token: 1,
        }
    }

    pub fn with_root(root: View) -> Self {
        let mut stack = Self::new();
        stack.push(root);
        stack
    }

    /// Pushes a brand-new instance and makes it current.
    pub fn push(&mut self, view: View) -> ViewToken {
        let token = ViewToken(self.next_token);
        self.next_token += 1;
        log::debug!("STACK: Push {} {}", view.kind(), token);
        self.instances.push(ViewInstance { token, view });
        token
    }

    /// Removes the current instance, restoring the one beneath it.
    pub fn exit(&mut self) -> ExitOutcome {
        match self.instances.len() {
            0 => ExitOutcome::Empty,
            1 => {
                log::debug!("STACK: Exit ignored on root view");
                ExitOutcome::RootRetained
            }
            _ => match self.instances.pop() {
                Some(instance) => {
                    log::debug!("STACK: Exit {} {}", instance.kind(), instance.token);
                    ExitOutcome::Exited(instance)
                }
                None => ExitOutcome::Empty,
            },
        }
    }

    /// Highest token handed out so far, including exited instances.
    pub fn last_issued(&self) -> Option<ViewToken> {
        (self.next_token > 1).then(|| ViewToken(self.next_token - 1))
    }

    pub fn current(&self) -> Option<&ViewInstance> {
        self.instances.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut ViewInstance> {
        self.instances.last_mut()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, token: ViewToken) -> bool {
        self.instances.iter().any(|i| i.token == token)
    }

    /// Topmost instance of `kind`.
    pub fn find_kind(&self, kind: ViewKind) -> Option<&ViewInstance> {
        self.instances.iter().rev().find(|i| i.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<ViewKind> {
        self.instances.iter().map(ViewInstance::kind).collect()
    }
}

impl Default for ViewStack {
    fn default() -> Self {
        Self::new()
    }
}
