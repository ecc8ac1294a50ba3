/// database identity of a user row. plain bigserial, no flake ids needed
/// at this scale
pub type UserId = i64;

/// database identity of a widget settings row
pub type WidgetSettingsId = i64;
