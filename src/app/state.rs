use crate::domain::Mode;

/// What the user asked for this frame. Applied to the engine after rendering.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiAction {
    StartBot,
    StopBot,
    ChangeMode(Mode),
    Analyze(String),
    RefreshStats,
    Reconnect,
}
