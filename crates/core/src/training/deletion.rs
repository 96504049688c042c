/// Outcome of a delete request on a model that may still be referenced.
#[derive(Debug, Clone, PartialEq)]
pub enum Deletion<T> {
    /// Still referenced: the row was kept and marked archived.
    Archived(T),
    /// Physically removed from its table.
    Removed(T),
}

impl<T> Deletion<T> {
    pub fn is_removed(&self) -> bool {
        matches!(self, Deletion::Removed(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Deletion::Archived(model) | Deletion::Removed(model) => model,
        }
    }
}
