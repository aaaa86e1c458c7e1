//! Dispatch abstraction over whatever owns the playback state.

use crate::{DispatchResult, PlaybackAction};

/// Trait for dispatching actions to the playback engine.
///
/// Front ends hold a `Dispatcher` rather than reaching into the engine's
/// state, so every user intent takes the same path through the recompute table.
pub trait Dispatcher {
    fn dispatch(&mut self, action: &PlaybackAction) -> DispatchResult;
}
