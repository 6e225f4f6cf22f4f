use strum::{Display, EnumString};

/// The four closed kinds of node in a docking layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum LayoutNodeKind {
    Split,
    Panel,
    EditorRegion,
    Sliding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Screen edge a sliding panel is docked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Orientation along which the panel slides in from this edge.
    pub fn orientation(self) -> Orientation {
        match self {
            Side::Left | Side::Right => Orientation::Horizontal,
            Side::Top | Side::Bottom => Orientation::Vertical,
        }
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameState {
    #[default]
    Normal,
    Iconified,
    Maximized,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorAreaState {
    #[default]
    Joined,
    Separated,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelKind {
    #[default]
    View,
    Editor,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn side_orientation() {
        assert_eq!(Side::Left.orientation(), Orientation::Horizontal);
        assert_eq!(Side::Right.orientation(), Orientation::Horizontal);
        assert_eq!(Side::Top.orientation(), Orientation::Vertical);
        assert_eq!(Side::Bottom.orientation(), Orientation::Vertical);
    }

    #[test]
    fn string_forms() {
        assert_eq!(Side::from_str("bottom").unwrap(), Side::Bottom);
        assert!(Side::from_str("middle").is_err());
        assert_eq!(Orientation::Vertical.to_string(), "vertical");
        assert_eq!(LayoutNodeKind::EditorRegion.to_string(), "EditorRegion");
    }
}
