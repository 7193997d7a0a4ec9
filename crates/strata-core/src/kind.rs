//! Classification enums shared across the workspace.

use std::fmt;

/// Crust type of a mesh cell, as produced by crust initialisation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CrustKind {
    /// Dense oceanic crust.
    #[default]
    Oceanic,
    /// Buoyant continental crust.
    Continental,
}

impl CrustKind {
    /// Decode the upstream `u8` crust type (`0` oceanic, anything else continental).
    pub fn from_raw(raw: u8) -> Self {
        if raw > 0 {
            Self::Continental
        } else {
            Self::Oceanic
        }
    }

    /// Returns `true` for continental crust.
    pub fn is_continental(self) -> bool {
        matches!(self, Self::Continental)
    }
}

/// Regime of a plate boundary segment or boundary cell.
///
/// Segments carry an explicit "no regime" state; cells use
/// `Option<BoundaryType>` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoundaryType {
    /// Plates moving toward each other.
    Convergent,
    /// Plates moving apart.
    Divergent,
    /// Plates sliding past each other.
    Transform,
}

impl BoundaryType {
    /// Encoded value used by boundary-type arrays (`0` is reserved for none).
    pub fn code(self) -> u8 {
        match self {
            Self::Convergent => 1,
            Self::Divergent => 2,
            Self::Transform => 3,
        }
    }

    /// Decode a boundary-type byte. `0` and unknown values are `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Convergent),
            2 => Some(Self::Divergent),
            3 => Some(Self::Transform),
            _ => None,
        }
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convergent => write!(f, "convergent"),
            Self::Divergent => write!(f, "divergent"),
            Self::Transform => write!(f, "transform"),
        }
    }
}

/// Kind of a tectonic event.
///
/// The declaration order is the tie-break priority used when two events
/// produce identical scores and intensities at a cell: a lower
/// [`priority`](Self::priority) wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// Oceanic plate diving beneath another plate.
    Subduction,
    /// Two continental margins colliding.
    Collision,
    /// Divergent rifting.
    Rift,
    /// Transform shear.
    TransformShear,
    /// Mantle plume under a plate interior.
    IntraplateHotspot,
}

impl EventType {
    /// Numeric tie-break priority (1..=5, lower wins).
    pub fn priority(self) -> u8 {
        match self {
            Self::Subduction => 1,
            Self::Collision => 2,
            Self::Rift => 3,
            Self::TransformShear => 4,
            Self::IntraplateHotspot => 5,
        }
    }

    /// Decode a priority byte (`0` and unknown values are `None`).
    pub fn from_priority(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Subduction),
            2 => Some(Self::Collision),
            3 => Some(Self::Rift),
            4 => Some(Self::TransformShear),
            5 => Some(Self::IntraplateHotspot),
            _ => None,
        }
    }

    /// Subduction and collision are the convergent event kinds.
    pub fn is_convergent(self) -> bool {
        matches!(self, Self::Subduction | Self::Collision)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Subduction => "subduction",
            Self::Collision => "collision",
            Self::Rift => "rift",
            Self::TransformShear => "transform-shear",
            Self::IntraplateHotspot => "intraplate-hotspot",
        };
        f.write_str(name)
    }
}

/// One of the five tracked tectonic driver channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Orogenic uplift potential.
    Uplift,
    /// Rift (extension) potential.
    Rift,
    /// Shear stress.
    Shear,
    /// Volcanism.
    Volcanism,
    /// Crustal fracturing.
    Fracture,
}

impl Channel {
    /// All channels in canonical order.
    pub const ALL: [Channel; 5] = [
        Channel::Uplift,
        Channel::Rift,
        Channel::Shear,
        Channel::Volcanism,
        Channel::Fracture,
    ];

    /// Position of this channel in [`Channel::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}
