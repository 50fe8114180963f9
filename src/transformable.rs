//! Transformable capability: the spatial state bundle every element carries.

use crate::element::ElementConfig;
use crate::transform::Matrix;

/// Position, scale, rotation and transform origin of a scene node.
///
/// This is pure local state; composing with ancestor transforms is the
/// render pipeline's job.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformable {
    x: f32,
    y: f32,
    scale_x: f32,
    scale_y: f32,
    rotation: f32,
    origin_x: f32,
    origin_y: f32,
}

impl Transformable {
    /// Initialize from an element configuration.
    pub fn new(config: &ElementConfig) -> Self {
        Self {
            x: config.x,
            y: config.y,
            scale_x: config.scale_x,
            scale_y: config.scale_y,
            rotation: config.rotation,
            origin_x: config.origin_x,
            origin_y: config.origin_y,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    pub fn set_scale(&mut self, sx: f32, sy: f32) {
        self.scale_x = sx;
        self.scale_y = sy;
    }

    pub fn set_scale_x(&mut self, sx: f32) {
        self.scale_x = sx;
    }

    pub fn set_scale_y(&mut self, sy: f32) {
        self.scale_y = sy;
    }

    /// Rotation in radians, counter-clockwise.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Pivot point for rotation and scaling, in local coordinates.
    pub fn origin(&self) -> (f32, f32) {
        (self.origin_x, self.origin_y)
    }

    pub fn set_origin(&mut self, ox: f32, oy: f32) {
        self.origin_x = ox;
        self.origin_y = oy;
    }

    pub fn set_origin_x(&mut self, ox: f32) {
        self.origin_x = ox;
    }

    pub fn set_origin_y(&mut self, oy: f32) {
        self.origin_y = oy;
    }

    /// Snapshot of the local transform: rotation and scale about the
    /// origin, then translation.
    pub fn local_matrix(&self) -> Matrix {
        Matrix::translation(self.x + self.origin_x, self.y + self.origin_y)
            .then(&Matrix::rotation(self.rotation))
            .then(&Matrix::scaling(self.scale_x, self.scale_y))
            .then(&Matrix::translation(-self.origin_x, -self.origin_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_config() {
        let t = Transformable::new(&ElementConfig::default());
        assert_eq!(t.position(), (0.0, 0.0));
        assert_eq!(t.scale(), (1.0, 1.0));
        assert_eq!(t.rotation(), 0.0);
        assert_eq!(t.origin(), (0.0, 0.0));
    }

    #[test]
    fn test_local_matrix_translation_only() {
        let mut t = Transformable::new(&ElementConfig::default());
        t.set_position(10.0, 20.0);
        assert_eq!(t.local_matrix().apply(0.0, 0.0), (10.0, 20.0));
    }

    #[test]
    fn test_local_matrix_scales_about_origin() {
        let mut t = Transformable::new(&ElementConfig::default());
        t.set_scale(2.0, 2.0);
        t.set_origin(5.0, 5.0);
        // The origin itself stays fixed under scaling.
        let (x, y) = t.local_matrix().apply(5.0, 5.0);
        assert!((x - 5.0).abs() < 1e-5);
        assert!((y - 5.0).abs() < 1e-5);
    }
}
