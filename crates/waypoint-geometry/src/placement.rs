#![forbid(unsafe_code)]

//! Requested tooltip placements and their resolved directions.

/// Gap between the target and the tooltip when a placement doesn't say otherwise.
pub const DEFAULT_OFFSET: f64 = 16.0;

/// Where a step wants its tooltip relative to the target.
///
/// The eight directional variants carry the gap between target edge and
/// tooltip. `Center` ignores the target entirely; `Automatic` lets the
/// layout engine pick the side with the most free space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Placement {
    Top { offset: f64 },
    Bottom { offset: f64 },
    Leading { offset: f64 },
    Trailing { offset: f64 },
    TopLeading { offset: f64 },
    TopTrailing { offset: f64 },
    BottomLeading { offset: f64 },
    BottomTrailing { offset: f64 },
    Center,
    #[default]
    Automatic,
}

impl Placement {
    pub const fn top() -> Self {
        Self::Top {
            offset: DEFAULT_OFFSET,
        }
    }

    pub const fn bottom() -> Self {
        Self::Bottom {
            offset: DEFAULT_OFFSET,
        }
    }

    pub const fn leading() -> Self {
        Self::Leading {
            offset: DEFAULT_OFFSET,
        }
    }

    pub const fn trailing() -> Self {
        Self::Trailing {
            offset: DEFAULT_OFFSET,
        }
    }

    pub const fn top_leading() -> Self {
        Self::TopLeading {
            offset: DEFAULT_OFFSET,
        }
    }

    pub const fn top_trailing() -> Self {
        Self::TopTrailing {
            offset: DEFAULT_OFFSET,
        }
    }

    pub const fn bottom_leading() -> Self {
        Self::BottomLeading {
            offset: DEFAULT_OFFSET,
        }
    }

    pub const fn bottom_trailing() -> Self {
        Self::BottomTrailing {
            offset: DEFAULT_OFFSET,
        }
    }

    /// Build a directional placement from a resolved direction and an offset.
    ///
    /// `Direction::Center` maps to [`Placement::Center`] and drops the offset.
    pub const fn from_direction(direction: Direction, offset: f64) -> Self {
        match direction {
            Direction::Top => Self::Top { offset },
            Direction::Bottom => Self::Bottom { offset },
            Direction::Leading => Self::Leading { offset },
            Direction::Trailing => Self::Trailing { offset },
            Direction::TopLeading => Self::TopLeading { offset },
            Direction::TopTrailing => Self::TopTrailing { offset },
            Direction::BottomLeading => Self::BottomLeading { offset },
            Direction::BottomTrailing => Self::BottomTrailing { offset },
            Direction::Center => Self::Center,
        }
    }

    /// The gap carried by a directional placement.
    pub const fn offset(self) -> Option<f64> {
        match self {
            Self::Top { offset }
            | Self::Bottom { offset }
            | Self::Leading { offset }
            | Self::Trailing { offset }
            | Self::TopLeading { offset }
            | Self::TopTrailing { offset }
            | Self::BottomLeading { offset }
            | Self::BottomTrailing { offset } => Some(offset),
            Self::Center | Self::Automatic => None,
        }
    }

    /// The fixed direction of this placement, or `None` for `Automatic`.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Top { .. } => Some(Direction::Top),
            Self::Bottom { .. } => Some(Direction::Bottom),
            Self::Leading { .. } => Some(Direction::Leading),
            Self::Trailing { .. } => Some(Direction::Trailing),
            Self::TopLeading { .. } => Some(Direction::TopLeading),
            Self::TopTrailing { .. } => Some(Direction::TopTrailing),
            Self::BottomLeading { .. } => Some(Direction::BottomLeading),
            Self::BottomTrailing { .. } => Some(Direction::BottomTrailing),
            Self::Center => Some(Direction::Center),
            Self::Automatic => None,
        }
    }
}

/// A resolved, offset-free placement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Top,
    Bottom,
    Leading,
    Trailing,
    TopLeading,
    TopTrailing,
    BottomLeading,
    BottomTrailing,
    Center,
}

impl Direction {
    /// Horizontal and vertical sign of the outward normal: `-1` towards the
    /// leading/top side, `+1` towards the trailing/bottom side, `0` on the
    /// target's centre line.
    pub const fn signs(self) -> (i8, i8) {
        match self {
            Self::Top => (0, -1),
            Self::Bottom => (0, 1),
            Self::Leading => (-1, 0),
            Self::Trailing => (1, 0),
            Self::TopLeading => (-1, -1),
            Self::TopTrailing => (1, -1),
            Self::BottomLeading => (-1, 1),
            Self::BottomTrailing => (1, 1),
            Self::Center => (0, 0),
        }
    }

    /// Whether the tooltip sits above or below the target.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Leading => Self::Trailing,
            Self::Trailing => Self::Leading,
            Self::TopLeading => Self::BottomTrailing,
            Self::TopTrailing => Self::BottomLeading,
            Self::BottomLeading => Self::TopTrailing,
            Self::BottomTrailing => Self::TopLeading,
            Self::Center => Self::Center,
        }
    }
}
