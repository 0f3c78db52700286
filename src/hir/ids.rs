//! Placeholder identifiers for references resolved after the scan.

use uuid::Uuid;

use crate::base::{qualifier, Identifier, IdentifierError};

/// Mints placeholder identifiers for one session.
///
/// A placeholder is `root.unresolved:<session>-<n>`: the session id keeps
/// placeholders of different sessions sharing one store apart, the counter
/// keeps them apart within a session even when minted in the same instant.
#[derive(Clone, Debug)]
pub struct PlaceholderMint {
    root: Identifier,
    session: Uuid,
    next: u64,
}

impl PlaceholderMint {
    /// Create a mint with a fresh session id.
    pub fn new(root: Identifier) -> Self {
        Self {
            root,
            session: Uuid::new_v4(),
            next: 0,
        }
    }

    /// The next unused placeholder.
    pub fn mint(&mut self) -> Result<Identifier, IdentifierError> {
        let fragment = format!("{}-{}", self.session.simple(), self.next);
        let id = self.root.child(qualifier::UNRESOLVED, &fragment)?;
        self.next += 1;
        Ok(id)
    }

    /// How many placeholders this mint has produced.
    pub fn minted(&self) -> u64 {
        self.next
    }
}

/// True if `id` was produced by a [`PlaceholderMint`].
pub fn is_placeholder(id: &Identifier) -> bool {
    id.strongest_qualifier() == Some(qualifier::UNRESOLVED)
}
