use crate::appearance::{Color, DEFAULT_BADGE_COLOR, DEFAULT_DOT_COLOR};

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct RunningIndicator {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child, unwrap(argument, str), default = Self::default().color)]
    pub color: Color,
    /// Index into the dot style list. Unknown indices render the default style.
    #[knuffel(child, unwrap(argument), default = Self::default().style)]
    pub style: u8,
}

impl Default for RunningIndicator {
    fn default() -> Self {
        Self {
            off: false,
            color: DEFAULT_DOT_COLOR,
            style: 0,
        }
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct NotificationBadge {
    #[knuffel(child)]
    pub off: bool,
    #[knuffel(child, unwrap(argument, str), default = Self::default().color)]
    pub color: Color,
    /// Index into the badge style list. Unknown indices render the default style.
    #[knuffel(child, unwrap(argument), default = Self::default().style)]
    pub style: u8,
}

impl Default for NotificationBadge {
    fn default() -> Self {
        Self {
            off: false,
            color: DEFAULT_BADGE_COLOR,
            style: 0,
        }
    }
}
