// Subscribe / unsubscribe controls behind a rendering capability, so the
// subscription logic runs without a browser.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    /// Only "Unsubscribe" is visible.
    Subscribed,
    /// Only "Subscribe" is visible.
    NotSubscribed,
}

impl ToggleState {
    pub fn from_subscribed(subscribed: bool) -> Self {
        if subscribed {
            ToggleState::Subscribed
        } else {
            ToggleState::NotSubscribed
        }
    }

    pub fn subscribe_visible(&self) -> bool {
        matches!(self, ToggleState::NotSubscribed)
    }

    pub fn unsubscribe_visible(&self) -> bool {
        matches!(self, ToggleState::Subscribed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Subscribe,
    Unsubscribe,
}

impl ToggleAction {
    /// The state a toggle shows after the action.
    pub fn target(&self) -> ToggleState {
        match self {
            ToggleAction::Subscribe => ToggleState::Subscribed,
            ToggleAction::Unsubscribe => ToggleState::NotSubscribed,
        }
    }
}

/// Anything that can show the pair of controls.
pub trait ToggleSurface {
    type Handle;

    fn render_toggle(&mut self, state: ToggleState) -> Self::Handle;
    fn update_toggle(&mut self, handle: &Self::Handle, state: ToggleState);
}

/// Surface that just remembers what it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub rendered: Vec<ToggleState>,
}

impl RecordingSurface {
    pub fn current(&self) -> Option<ToggleState> {
        self.rendered.last().copied()
    }
}

impl ToggleSurface for RecordingSurface {
    type Handle = usize;

    fn render_toggle(&mut self, state: ToggleState) -> usize {
        self.rendered.push(state);
        self.rendered.len() - 1
    }

    fn update_toggle(&mut self, _handle: &usize, state: ToggleState) {
        self.rendered.push(state);
    }
}
