#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Refresh,
    ToggleHelp,
    Navigate(Direction),
    Kill(u32),
    CopyStats,
    EnterThresholdEdit,
    UpdateThresholdInput(String),
    SubmitThresholds,
    CancelThresholdEdit,
    None,
}
