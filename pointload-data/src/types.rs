//! Core data types produced by the loaders.
//!
//! These are CPU-side, render-ready representations: positions and colors
//! are stored as packed `[f32; 3]` triples so they can be handed to a GPU
//! buffer without conversion.

use glam::Vec3;

/// A decoded point cloud.
///
/// `positions` and `colors` always have the same length. Colors are RGB in
/// the 0-1 range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl PointSet {
    /// Create a point set from parallel position and color arrays.
    ///
    /// Returns `None` if the arrays differ in length.
    pub fn new(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> Option<Self> {
        (positions.len() == colors.len()).then_some(Self { positions, colors })
    }

    /// Create a point set where every point has the same color.
    pub fn with_uniform_color(positions: Vec<[f32; 3]>, color: [f32; 3]) -> Self {
        let colors = vec![color; positions.len()];
        Self { positions, colors }
    }

    pub(crate) fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
        }
    }

    pub(crate) fn push(&mut self, position: [f32; 3], color: [f32; 3]) {
        self.positions.push(position);
        self.colors.push(color);
    }

    /// Number of points.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` slice.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `r, g, b, r, g, b, ...` slice.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Position of point `index`.
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).map(|p| Vec3::from_array(*p))
    }

    /// Color of point `index`.
    pub fn color(&self, index: usize) -> Option<Vec3> {
        self.colors.get(index).map(|c| Vec3::from_array(*c))
    }

    /// Axis-aligned bounding box of all positions, or `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.is_empty() {
            return None;
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in &self.positions {
            let pos = Vec3::from_array(*p);
            min = min.min(pos);
            max = max.max(pos);
        }
        Some(Bounds { min, max })
    }

    /// Split into the position and color arrays.
    pub fn into_parts(self) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
        (self.positions, self.colors)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// A point set paired with the caller's rendering material.
///
/// The material is opaque to the loader; it is stored exactly as given.
#[derive(Debug, Clone)]
pub struct RenderablePoints<M> {
    pub points: PointSet,
    pub material: M,
}

impl<M> RenderablePoints<M> {
    pub fn new(points: PointSet, material: M) -> Self {
        Self { points, material }
    }

    /// 3-component position attribute, one entry per point.
    pub fn position_attribute(&self) -> &[f32] {
        self.points.positions_flat()
    }

    /// 3-component color attribute, one entry per point.
    pub fn color_attribute(&self) -> &[f32] {
        self.points.colors_flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        assert!(PointSet::new(vec![[0.0; 3]; 2], vec![[1.0; 3]; 1]).is_none());
        assert!(PointSet::new(vec![[0.0; 3]; 2], vec![[1.0; 3]; 2]).is_some());
    }

    #[test]
    fn test_flat_views() {
        let set = PointSet::new(
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            vec![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
        )
        .unwrap();
        assert_eq!(set.count(), 2);
        assert_eq!(set.positions_flat(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(set.colors_flat().len(), 6);
        assert_eq!(set.position(1), Some(Vec3::new(4.0, 5.0, 6.0)));
        assert_eq!(set.color(2), None);
    }

    #[test]
    fn test_bounds() {
        let set = PointSet::with_uniform_color(
            vec![[-1.0, 0.0, 2.0], [3.0, -4.0, 1.0], [0.0, 1.0, 0.0]],
            [1.0; 3],
        );
        let bounds = set.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 1.0, 2.0));
        assert_eq!(bounds.size(), Vec3::new(4.0, 5.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, -1.5, 1.0));
    }

    #[test]
    fn test_empty_bounds() {
        assert!(PointSet::default().bounds().is_none());
    }

    #[test]
    fn test_renderable_keeps_material() {
        let set = PointSet::with_uniform_color(vec![[1.0, 2.0, 3.0]], [1.0; 3]);
        let renderable = RenderablePoints::new(set, "basic-points");
        assert_eq!(renderable.material, "basic-points");
        assert_eq!(renderable.position_attribute(), &[1.0, 2.0, 3.0]);
        assert_eq!(renderable.color_attribute(), &[1.0, 1.0, 1.0]);
    }
}
