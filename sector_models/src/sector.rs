//! A named sector wrapping one shape, with its routes derived once.

use crate::error::{SectorError, SectorResult};
use crate::route::Route;
use crate::shape::{SectorShape, SectorType, ShapeParams};
use crate::Point;

/// A modelled airspace sector: a name, a shape and the routes through it.
#[derive(Clone, Debug)]
pub struct SectorElement {
    name: String,
    shape: SectorShape,
    routes: Vec<Route>,
}

impl SectorElement {
    pub fn new(name: impl Into<String>, shape: SectorShape) -> Self {
        let routes = shape
            .route_names()
            .into_iter()
            .zip(shape.routes())
            .map(|(name, fixes)| Route::new(name, fixes))
            .collect();
        Self {
            name: name.into(),
            shape,
            routes,
        }
    }

    /// Build the shape and wrap it in one step.
    pub fn build(
        name: impl Into<String>,
        sector_type: SectorType,
        params: &ShapeParams,
    ) -> SectorResult<Self> {
        Ok(Self::new(name, SectorShape::new(sector_type, params)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &SectorShape {
        &self.shape
    }

    pub fn centre_point(&self) -> Point {
        self.shape.centre()
    }

    pub fn fix_location(&self, fix_name: &str) -> SectorResult<Point> {
        self.shape
            .fix(fix_name)
            .map(|f| f.position)
            .ok_or_else(|| SectorError::UnknownFix(fix_name.to_string()))
    }

    /// Routes in the same order as [`SectorShape::routes`].
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, name: &str) -> SectorResult<&Route> {
        self.routes
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| SectorError::UnknownRoute(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::ROUTE_LENGTH;

    fn i_element() -> SectorElement {
        SectorElement::build("HELL", SectorType::I, &ShapeParams::default()).unwrap()
    }

    #[test]
    fn centre_and_fix_locations() {
        let sector = i_element();
        let c = sector.centre_point();
        assert!((c.x() + 0.1275).abs() < 1e-12 && (c.y() - 51.5).abs() < 1e-12);
        assert_eq!(sector.fix_location("c").unwrap(), c);

        // 65 nm north and south of the centre at 60 nm per degree.
        let a = sector.fix_location("A").unwrap();
        assert!((a.y() - (51.5 + 65.0 / 60.0)).abs() < 1e-9);
        assert!((a.x() - c.x()).abs() < 1e-12);
        let e = sector.fix_location("e").unwrap();
        assert!((e.y() - (51.5 - 65.0 / 60.0)).abs() < 1e-9);

        assert_eq!(sector.fix_location("Z"), Err(SectorError::UnknownFix("Z".into())));
    }

    #[test]
    fn routes_run_between_end_fixes() {
        let sector = i_element();
        let routes = sector.routes();
        assert_eq!(routes.len(), 2);

        assert_eq!(routes[0].length(), ROUTE_LENGTH);
        assert_eq!(routes[0].fix_names()[0], "E");
        assert_eq!(routes[0].fix_names()[4], "A");
        assert_eq!(routes[1].fix_names()[0], "A");
        assert_eq!(routes[1].fix_names()[4], "E");
        assert_eq!(routes[1].fix_points()[0], sector.fix_location("A").unwrap());

        assert_eq!(sector.route("A-E").unwrap(), &routes[1]);
        assert!(sector.route("A-C").is_err());
    }
}
