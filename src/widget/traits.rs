//! Widget trait and the callbacks views raise.
//!
//! Views never mutate application state themselves. They report what the
//! user asked for through [`ViewCallbacks`]; the shell decides what happens.

use crate::actor::InputEvent;
use crate::buffer::Buffer;
use crate::layout::Rect;
use crate::model::EventId;

/// A UI component that can be rendered to a buffer and handle input.
///
/// All views implement this trait, so the app can lay them out, route input
/// and redraw them uniformly.
pub trait Widget {
    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect;

    /// Set the bounds of this widget.
    ///
    /// Called when the layout changes (e.g., terminal resize).
    fn set_bounds(&mut self, bounds: Rect);

    /// Render this widget to the given buffer.
    ///
    /// The widget should only write to cells within its bounds.
    fn render(&self, buffer: &mut Buffer);

    /// Handle an input event, raising callbacks for user intents.
    ///
    /// Returns `true` if the event was consumed by this widget,
    /// `false` if it should propagate to other widgets.
    fn handle_input(&mut self, event: &InputEvent, callbacks: &mut dyn ViewCallbacks) -> bool;

    /// Check if this widget needs to be redrawn.
    fn needs_redraw(&self) -> bool;

    /// Clear the redraw flag after rendering.
    fn clear_redraw(&mut self);
}

/// User intents raised by the views.
pub trait ViewCallbacks {
    /// An event was picked.
    fn on_select_event(&mut self, id: &EventId);

    /// The details of an event were requested.
    fn on_open_event_detail(&mut self, id: &EventId);

    /// A month (0 = January) was picked.
    fn on_select_month(&mut self, month0: u32);

    /// Deletion of an event was requested.
    fn on_delete_event(&mut self, _id: &EventId) {}

    /// Another year was picked.
    fn on_select_year(&mut self, _year: i32) {}
}

/// A recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSignal {
    /// See [`ViewCallbacks::on_select_event`].
    SelectEvent(EventId),
    /// See [`ViewCallbacks::on_open_event_detail`].
    OpenEventDetail(EventId),
    /// See [`ViewCallbacks::on_select_month`].
    SelectMonth(u32),
    /// See [`ViewCallbacks::on_delete_event`].
    DeleteEvent(EventId),
    /// See [`ViewCallbacks::on_select_year`].
    SelectYear(i32),
}

/// Queue signals for the shell to apply after input handling.
impl ViewCallbacks for Vec<ViewSignal> {
    fn on_select_event(&mut self, id: &EventId) {
        self.push(ViewSignal::SelectEvent(id.clone()));
    }

    fn on_open_event_detail(&mut self, id: &EventId) {
        self.push(ViewSignal::OpenEventDetail(id.clone()));
    }

    fn on_select_month(&mut self, month0: u32) {
        self.push(ViewSignal::SelectMonth(month0));
    }

    fn on_delete_event(&mut self, id: &EventId) {
        self.push(ViewSignal::DeleteEvent(id.clone()));
    }

    fn on_select_year(&mut self, year: i32) {
        self.push(ViewSignal::SelectYear(year));
    }
}
