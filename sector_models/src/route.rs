//! A queryable view over one spoke of a sector shape.

use crate::shape::FixSequence;
use crate::Point;

/// Fixes per spoke in every template.
pub const ROUTE_LENGTH: usize = 5;

/// An ordered, named sequence of fixes belonging to one sector.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    name: String,
    fixes: FixSequence,
}

impl Route {
    pub(crate) fn new(name: String, fixes: FixSequence) -> Self {
        Self { name, fixes }
    }

    /// Stable identifier, `FIRST-LAST`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positions of the fixes, in flying order.
    pub fn fix_points(&self) -> Vec<Point> {
        self.fixes.iter().map(|(_, p)| *p).collect()
    }

    /// Names of the fixes, index-aligned with [`Self::fix_points`].
    pub fn fix_names(&self) -> Vec<String> {
        self.fixes.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Number of fixes.
    pub fn length(&self) -> usize {
        self.fixes.len()
    }

    pub fn first(&self) -> Option<&(String, Point)> {
        self.fixes.first()
    }

    pub fn last(&self) -> Option<&(String, Point)> {
        self.fixes.last()
    }

    pub fn fix_index(&self, name: &str) -> Option<usize> {
        let name = name.to_uppercase();
        self.fixes.iter().position(|(n, _)| *n == name)
    }
}
