//! Session context: backend access and the centralized error boundary.

use crate::backend::Backend;
use crate::Result;
use std::rc::Rc;

/// Shared per-session collaborator.
///
/// Owns the backend and supplies the `consumed_error` boundary through which
/// every validation and build error flows, so logging stays in one place and
/// the builder's entry points can collapse failures into error sentinels
/// without propagating `Result` to the caller.
pub struct Context<B: Backend> {
    backend: B,
}

impl<B: Backend> Context<B> {
    /// Create a context owning `backend`.
    pub fn new(backend: B) -> Rc<Self> {
        Rc::new(Self { backend })
    }

    /// The backend owned by this context.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create an empty backend graph.
    pub fn create_graph(&self) -> Result<B::Graph> {
        self.backend.create_graph()
    }

    /// Consume a result, logging its error if any.
    ///
    /// Returns `Some` on success and `None` on failure. Callers decide what
    /// sentinel the `None` becomes; the error itself stops here.
    pub fn consumed_error<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::error!(%error, "graph error consumed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::RecordingBackend;
    use crate::Error;

    #[test]
    fn test_consumed_error_passes_success_through() {
        let context = Context::new(RecordingBackend::default());
        assert_eq!(context.consumed_error(Ok(7)), Some(7));
    }

    #[test]
    fn test_consumed_error_swallows_failure() {
        let context = Context::new(RecordingBackend::default());
        let result: crate::Result<()> = Err(Error::Validation("bad rank".to_string()));
        assert_eq!(context.consumed_error(result), None);
    }
}
