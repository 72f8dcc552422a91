//! Orthographic camera and the visible play area
//!
//! The host moves or resizes the camera; the field re-derives its bounds from
//! the camera viewport every time it is updated.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_ASPECT, CAMERA_HALF_HEIGHT};

/// Orthographic 2D camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position at the middle of the screen
    pub center: Vec2,
    /// Half of the visible height in world units
    pub half_height: f32,
    /// Width / height
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_height: CAMERA_HALF_HEIGHT,
            aspect: CAMERA_ASPECT,
        }
    }
}

impl Camera {
    /// Negative extents are mirrored; non-finite ones fall back to the defaults
    pub fn new(center: Vec2, half_height: f32, aspect: f32) -> Self {
        let half_height = if half_height.is_finite() {
            half_height.abs()
        } else {
            CAMERA_HALF_HEIGHT
        };
        let aspect = if aspect.is_finite() {
            aspect.abs()
        } else {
            CAMERA_ASPECT
        };
        Self {
            center,
            half_height,
            aspect,
        }
    }

    /// Camera fitted to a screen of the given pixel size
    pub fn for_screen(width: f32, height: f32, half_height: f32) -> Self {
        let aspect = if height > 0.0 { width / height } else { CAMERA_ASPECT };
        Self::new(Vec2::ZERO, half_height, aspect)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_height * self.aspect, self.half_height)
    }

    /// World point -> viewport coordinates ((0,0) bottom-left, (1,1) top-right)
    pub fn world_to_viewport(&self, world: Vec2) -> Vec2 {
        let half = self.half_extents();
        if half.x <= 0.0 || half.y <= 0.0 {
            return Vec2::splat(0.5);
        }
        (world - (self.center - half)) / (half * 2.0)
    }

    /// Viewport coordinates -> world point
    pub fn viewport_to_world(&self, viewport: Vec2) -> Vec2 {
        let half = self.half_extents();
        self.center - half + viewport * half * 2.0
    }

    /// Pixel position (origin top-left, y down) -> world point
    pub fn screen_to_world(&self, screen: Vec2, screen_size: Vec2) -> Vec2 {
        if screen_size.x <= 0.0 || screen_size.y <= 0.0 {
            return self.center;
        }
        // Negate Y (screen coords are flipped)
        let viewport = Vec2::new(screen.x / screen_size.x, 1.0 - screen.y / screen_size.y);
        self.viewport_to_world(viewport)
    }

    /// World rectangle covered by viewport [0,1]²
    pub fn bounds(&self) -> ViewBounds {
        let a = self.viewport_to_world(Vec2::ZERO);
        let b = self.viewport_to_world(Vec2::ONE);
        // min <= max even for a mirrored camera
        ViewBounds {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// Axis-aligned visible area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl ViewBounds {
    /// Inclusive containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Which axes a point has left the visible area on.
    ///
    /// Same test as the projected viewport coordinate leaving [0, 1], done in
    /// world space so a clamped position never re-triggers from rounding.
    pub fn exits(&self, p: Vec2) -> (bool, bool) {
        (
            p.x < self.min.x || p.x > self.max.x,
            p.y < self.min.y || p.y > self.max.y,
        )
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Uniform random point inside the area
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        let t = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
        self.min + self.size() * t
    }
}
