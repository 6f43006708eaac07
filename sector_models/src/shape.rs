//! Sector shape templates.
//!
//! A shape places named fixes in a local planar frame (nautical miles, x east,
//! y north) centred on the sector centre, converts them to geographic
//! coordinates, and derives the straight "spokes" that cross the sector.
//!
//! # Templates (h = offset_nm + length_nm / 2, q = length_nm / 4)
//! ```text
//! I:  a(0,h) b(0,L/2) c(0,0) d(0,-L/2) e(0,-h)
//! X:  vertical a b e f g, horizontal c d e h i, crossing at e
//! Y:  fork e(0,q), stem f(0,-q) g(0,-(offset+q)),
//!     left branch b(-, L/2) a(-, offset), right branch d c mirrored,
//!     both branches leaving the fork 60° either side of north
//! ```
//! Every spoke has five fixes and passes through its centre fix at index 2.
//! For I and X that fix sits on the sector centre; for Y it is the fork.

use crate::error::{SectorError, SectorResult};
use crate::route::ROUTE_LENGTH;
use crate::Point;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::f64::consts::FRAC_PI_3;
use std::fmt;

/// Nautical miles per degree of latitude in the local-to-geographic mapping.
const NM_PER_DEGREE: f64 = 60.0;

/// Index of the shared centre fix along every spoke.
pub const SPOKE_CENTRE: usize = 2;

/// Joins the end fix names of a route identifier; not allowed inside fix names.
pub const ROUTE_NAME_SEPARATOR: char = '-';

/// An ordered fix list along one spoke: `(name, position)` pairs.
pub type FixSequence = Vec<(String, Point)>;

/// The closed set of sector templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorType {
    /// One straight airway.
    I,
    /// Two perpendicular airways crossing at the centre.
    X,
    /// A stem from the south splitting into two branches.
    Y,
}

impl SectorType {
    /// Number of distinct fixes the template places.
    pub fn fix_count(self) -> usize {
        match self {
            SectorType::I => 5,
            SectorType::X => 9,
            SectorType::Y => 7,
        }
    }

    /// Lowercase single-letter names `a, b, ...` for the template.
    pub fn default_fix_names(self) -> Vec<String> {
        ('a'..='z')
            .take(self.fix_count())
            .map(String::from)
            .collect()
    }

    /// Fix indices (in name order) along each directed spoke.
    fn spokes(self) -> &'static [[usize; ROUTE_LENGTH]] {
        match self {
            SectorType::I => &[[4, 3, 2, 1, 0], [0, 1, 2, 3, 4]],
            SectorType::X => &[
                [6, 5, 4, 1, 0],
                [0, 1, 4, 5, 6],
                [2, 3, 4, 7, 8],
                [8, 7, 4, 3, 2],
            ],
            SectorType::Y => &[
                [6, 5, 4, 1, 0],
                [0, 1, 4, 5, 6],
                [6, 5, 4, 3, 2],
                [2, 3, 4, 5, 6],
            ],
        }
    }

    /// Local planar positions (nm) in fix-name order.
    fn layout(self, length_nm: f64, offset_nm: f64) -> Vec<Vector2<f64>> {
        let half = length_nm / 2.0;
        let outer = offset_nm + half;
        match self {
            SectorType::I => vec![
                Vector2::new(0.0, outer),
                Vector2::new(0.0, half),
                Vector2::new(0.0, 0.0),
                Vector2::new(0.0, -half),
                Vector2::new(0.0, -outer),
            ],
            SectorType::X => vec![
                Vector2::new(0.0, outer),
                Vector2::new(0.0, half),
                Vector2::new(-outer, 0.0),
                Vector2::new(-half, 0.0),
                Vector2::new(0.0, 0.0),
                Vector2::new(0.0, -half),
                Vector2::new(0.0, -outer),
                Vector2::new(half, 0.0),
                Vector2::new(outer, 0.0),
            ],
            SectorType::Y => {
                let quarter = length_nm / 4.0;
                // Lateral distance of a branch point at height `y` above the fork.
                let branch = |y: f64| (y - quarter) * FRAC_PI_3.tan();
                vec![
                    Vector2::new(-branch(offset_nm), offset_nm),
                    Vector2::new(-branch(half), half),
                    Vector2::new(branch(offset_nm), offset_nm),
                    Vector2::new(branch(half), half),
                    Vector2::new(0.0, quarter),
                    Vector2::new(0.0, -quarter),
                    Vector2::new(0.0, -(offset_nm + quarter)),
                ]
            }
        }
    }
}

impl fmt::Display for SectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SectorType::I => "I",
            SectorType::X => "X",
            SectorType::Y => "Y",
        };
        write!(f, "{tag}")
    }
}

/// Geometric parameters shared by all templates.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    /// Fix names in template order; `None` uses `a, b, ...`
    pub fix_names: Option<Vec<String>>,
    /// Distance between the two fixes either side of the centre (nm)
    pub length_nm: f64,
    /// Extra distance from those fixes out to the end fixes (nm)
    pub offset_nm: f64,
    /// Sector centre as `[longitude, latitude]` (degrees)
    pub centre: [f64; 2],
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            fix_names: None,
            length_nm: 50.0,
            offset_nm: 40.0,
            centre: [-0.1275, 51.5], // London
        }
    }
}

impl ShapeParams {
    pub fn with_fix_names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.fix_names = Some(names.iter().map(|n| n.as_ref().to_string()).collect());
        self
    }

    pub fn with_length_nm(mut self, length_nm: f64) -> Self {
        self.length_nm = length_nm;
        self
    }

    pub fn with_offset_nm(mut self, offset_nm: f64) -> Self {
        self.offset_nm = offset_nm;
        self
    }

    pub fn with_centre(mut self, lon: f64, lat: f64) -> Self {
        self.centre = [lon, lat];
        self
    }
}

/// A named sector waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Fix {
    /// Uppercase name, unique within its shape
    pub name: String,
    /// Geographic position (x = lon, y = lat)
    pub position: Point,
    /// Offset from the sector centre in the local frame (nm, x east, y north)
    pub local_nm: Vector2<f64>,
}

/// A sector template instantiated with names, dimensions and a centre.
#[derive(Clone, Debug)]
pub struct SectorShape {
    sector_type: SectorType,
    length_nm: f64,
    offset_nm: f64,
    centre: Point,
    fixes: Vec<Fix>,
}

impl SectorShape {
    /// Place the fixes of `sector_type` according to `params`.
    pub fn new(sector_type: SectorType, params: &ShapeParams) -> SectorResult<Self> {
        let names: Vec<String> = params
            .fix_names
            .clone()
            .unwrap_or_else(|| sector_type.default_fix_names())
            .iter()
            .map(|n| n.to_uppercase())
            .collect();

        let expected = sector_type.fix_count();
        if names.len() != expected {
            return Err(SectorError::FixCount {
                sector_type,
                expected,
                actual: names.len(),
            });
        }
        let mut seen = HashSet::new();
        for name in &names {
            if name.is_empty() || name.contains(ROUTE_NAME_SEPARATOR) {
                return Err(SectorError::InvalidFixName(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(SectorError::DuplicateFix(name.clone()));
            }
        }

        if !params.length_nm.is_finite() || params.length_nm <= 0.0 {
            return Err(SectorError::InvalidDimension {
                name: "length_nm",
                value: params.length_nm,
            });
        }
        if !params.offset_nm.is_finite() || params.offset_nm < 0.0 {
            return Err(SectorError::InvalidDimension {
                name: "offset_nm",
                value: params.offset_nm,
            });
        }
        // The Y branches need their outer fixes beyond the inner ones.
        if sector_type == SectorType::Y && params.offset_nm <= params.length_nm / 2.0 {
            return Err(SectorError::InvalidDimension {
                name: "offset_nm",
                value: params.offset_nm,
            });
        }
        let [lon, lat] = params.centre;
        if !lon.is_finite() || !lat.is_finite() || lat.abs() >= 90.0 {
            return Err(SectorError::InvalidDimension {
                name: "centre latitude",
                value: lat,
            });
        }
        let centre = Point::new(lon, lat);

        let fixes = names
            .into_iter()
            .zip(sector_type.layout(params.length_nm, params.offset_nm))
            .map(|(name, local_nm)| Fix {
                name,
                position: local_to_geographic(centre, &local_nm),
                local_nm,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            %sector_type,
            fixes = fixes.len(),
            length_nm = params.length_nm,
            offset_nm = params.offset_nm,
            "placed sector fixes"
        );

        Ok(Self {
            sector_type,
            length_nm: params.length_nm,
            offset_nm: params.offset_nm,
            centre,
            fixes,
        })
    }

    pub fn i(params: &ShapeParams) -> SectorResult<Self> {
        Self::new(SectorType::I, params)
    }

    pub fn x(params: &ShapeParams) -> SectorResult<Self> {
        Self::new(SectorType::X, params)
    }

    pub fn y(params: &ShapeParams) -> SectorResult<Self> {
        Self::new(SectorType::Y, params)
    }

    pub fn sector_type(&self) -> SectorType {
        self.sector_type
    }

    /// The sector type is fixed at construction; every call fails.
    pub fn set_sector_type(&mut self, sector_type: SectorType) -> SectorResult<()> {
        Err(SectorError::ImmutableSectorType {
            current: self.sector_type,
            attempted: sector_type,
        })
    }

    pub fn length_nm(&self) -> f64 {
        self.length_nm
    }

    pub fn offset_nm(&self) -> f64 {
        self.offset_nm
    }

    pub fn centre(&self) -> Point {
        self.centre
    }

    /// All fixes, in the order their names were supplied.
    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    /// The fix every spoke crosses.
    pub fn centre_fix(&self) -> &Fix {
        &self.fixes[self.sector_type.spokes()[0][SPOKE_CENTRE]]
    }

    /// Look up a fix by name (case-insensitive).
    pub fn fix(&self, name: &str) -> Option<&Fix> {
        let name = name.to_uppercase();
        self.fixes.iter().find(|f| f.name == name)
    }

    /// Every directed spoke as an ordered `(name, position)` list.
    pub fn routes(&self) -> Vec<FixSequence> {
        self.sector_type
            .spokes()
            .iter()
            .map(|spoke| {
                spoke
                    .iter()
                    .map(|&i| (self.fixes[i].name.clone(), self.fixes[i].position))
                    .collect()
            })
            .collect()
    }

    /// One identifier per spoke, `FIRST-LAST`, index-aligned with [`Self::routes`].
    pub fn route_names(&self) -> Vec<String> {
        self.sector_type
            .spokes()
            .iter()
            .map(|spoke| {
                let first = &self.fixes[spoke[0]].name;
                let last = &self.fixes[spoke[ROUTE_LENGTH - 1]].name;
                format!("{first}{ROUTE_NAME_SEPARATOR}{last}")
            })
            .collect()
    }

    /// Route name → ordered fix list.
    pub fn named_routes(&self) -> BTreeMap<String, FixSequence> {
        self.route_names().into_iter().zip(self.routes()).collect()
    }
}

/// Fixed affine mapping from the local nm frame to longitude/latitude.
fn local_to_geographic(centre: Point, local_nm: &Vector2<f64>) -> Point {
    let lat = centre.y() + local_nm.y / NM_PER_DEGREE;
    let lon = centre.x() + local_nm.x / (NM_PER_DEGREE * centre.y().to_radians().cos());
    Point::new(lon, lat)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
