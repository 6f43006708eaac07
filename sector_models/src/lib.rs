//! `sector_models` — Sector geometry: fixes, shape templates, routes, geodesy.
//!
//! # Module layout
//! - [`geo_helper`] — Great-circle distance and interpolation
//! - [`shape`]      — I/X/Y templates placing named fixes
//! - [`route`]      — Ordered view over one spoke
//! - [`sector`]     — Named sector owning a shape and its routes
//! - [`error`]      — Validation / lookup / immutability errors

pub mod error;
pub mod geo_helper;
pub mod route;
pub mod sector;
pub mod shape;

/// Geographic coordinate: x = longitude, y = latitude (degrees).
pub type Point = geo::Point<f64>;

pub use error::{SectorError, SectorResult};
pub use route::{Route, ROUTE_LENGTH};
pub use sector::SectorElement;
pub use shape::{Fix, FixSequence, SectorShape, SectorType, ShapeParams, ROUTE_NAME_SEPARATOR, SPOKE_CENTRE};
