//! LocalDispatcher: Dispatcher implementation for in-process playback.

use pianolatron_types::{DispatchResult, Dispatcher, PlaybackAction};

use crate::piano::PianoBackend;
use crate::state::AppState;

use super::dispatch_action;

/// Dispatcher that applies actions directly to in-process state and plays
/// through the given piano.
pub struct LocalDispatcher<'a> {
    pub state: &'a mut AppState,
    pub piano: &'a dyn PianoBackend,
}

impl<'a> LocalDispatcher<'a> {
    pub fn new(state: &'a mut AppState, piano: &'a dyn PianoBackend) -> Self {
        Self { state, piano }
    }
}

impl<'a> Dispatcher for LocalDispatcher<'a> {
    fn dispatch(&mut self, action: &PlaybackAction) -> DispatchResult {
        dispatch_action(action, self.state, self.piano)
    }
}
