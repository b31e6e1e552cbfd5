use crate::state::DashState;

/// Every presentation widget implements this trait.
///
/// Widgets are purely reactive: they receive a read-only view of
/// [`DashState`] and render a text block. Stateful widgets (alerts) fold
/// each new state in through [`DashWidget::on_state_change`].
pub trait DashWidget: Send + std::fmt::Debug {
    /// Unique string identifier, e.g. `"cpu"` or `"processes"`.
    fn id(&self) -> &str;

    /// Called once per tick, before rendering.
    fn on_state_change(&mut self, _state: &DashState) {}

    /// Render the widget. `None` hides it for this frame.
    fn view(&self, state: &DashState) -> Option<String>;
}
