use thiserror::Error;

/// Failures that cross module boundaries: raised by algorithms that keep state
/// across graph mutations and surfaced again by [`ListenableGraph::end_update`].
///
/// [`ListenableGraph::end_update`]: crate::graph::listenable::ListenableGraph::end_update
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Cannot create more than {limit} connected components: the id space is exhausted")]
    ComponentIdsExhausted { limit: u32 },
}
