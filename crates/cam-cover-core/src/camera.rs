use serde::{Deserialize, Serialize};

/// Camera kind. The two kinds only differ by their [`CameraSpec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraKind {
    Short,
    Long,
}

impl CameraKind {
    pub const ALL: [CameraKind; 2] = [CameraKind::Short, CameraKind::Long];

    /// Numeric code used in candidate labels and submission files.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            CameraKind::Short => 1,
            CameraKind::Long => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(CameraKind::Short),
            2 => Some(CameraKind::Long),
            _ => None,
        }
    }
}

impl std::fmt::Display for CameraKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraKind::Short => f.write_str("short"),
            CameraKind::Long => f.write_str("long"),
        }
    }
}

/// Observation range and unit price of one camera kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    /// Nominal range. A piece is watched when it is strictly closer than this.
    pub range: f64,
    pub unit_cost: f64,
}

impl CameraSpec {
    pub const fn new(range: f64, unit_cost: f64) -> Self {
        Self { range, unit_cost }
    }

    #[inline]
    pub fn range_squared(&self) -> f64 {
        self.range * self.range
    }

    /// Radius used when constructing candidate centers.
    ///
    /// Shrinking the nominal range by `margin` keeps every generated center
    /// strictly inside the range of the pieces it was built from, even after
    /// floating point rounding.
    #[inline]
    pub fn effective_radius(&self, margin: f64) -> f64 {
        self.range - margin
    }

    /// Strict range test on a squared distance.
    #[inline]
    pub fn covers_squared(&self, distance_sq: f64) -> bool {
        distance_sq < self.range_squared()
    }
}
