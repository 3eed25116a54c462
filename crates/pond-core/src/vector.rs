//! 2D vector math in screen space
//!
//! Angles are in degrees. An angle of 0 points up the screen (negative y)
//! and angles grow clockwise, so 90 points right.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Heading of this vector in degrees, in `[0, 360)`.
    pub fn to_angle(&self) -> f32 {
        let angle = self.y.atan2(self.x).to_degrees() + 90.0;
        if angle < 0.0 {
            angle + 360.0
        } else {
            angle
        }
    }

    /// Unit vector pointing along `angle` degrees. Inverse of [`Vector2::to_angle`].
    pub fn from_angle(angle: f32) -> Self {
        let flipped = 360.0 - ((angle + 180.0) % 360.0);
        let radians = flipped.to_radians();
        Self::new(radians.sin(), radians.cos())
    }

    /// Unit-length copy; the zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len != 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    pub fn lerp_to(&self, other: Self, t: f32) -> Self {
        *self + (other - *self).stretch(t)
    }

    pub fn distance_to(&self, other: Self) -> f32 {
        (*self - other).length()
    }

    /// Component-wise product
    pub fn multiply(&self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise quotient
    pub fn divide(&self, other: Self) -> Self {
        Self::new(self.x / other.x, self.y / other.y)
    }

    /// Uniform scale
    pub fn stretch(&self, length: f32) -> Self {
        Self::new(self.x * length, self.y * length)
    }

    pub fn rotate(&self, degrees: f32) -> Self {
        let (sa, ca) = degrees.to_radians().sin_cos();
        Self::new(ca * self.x - sa * self.y, sa * self.x + ca * self.y)
    }

    /// Signed difference between the headings of `self` and `other`, in `(-180, 180]`.
    pub fn delta_angle(&self, other: Self) -> f32 {
        let a = self.to_angle().to_radians();
        let b = other.to_angle().to_radians();
        (a - b).sin().atan2((a - b).cos()).to_degrees()
    }

    /// Z component of the 3D cross product
    pub fn cross(&self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn to_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        self.stretch(scalar)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<glam::Vec2> for Vector2 {
    fn from(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for glam::Vec2 {
    fn from(v: Vector2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn same_heading(a: f32, b: f32) -> bool {
        ((a - b + 540.0) % 360.0 - 180.0).abs() < 1e-3
    }

    #[test]
    fn angle_convention() {
        assert!(same_heading(Vector2::new(0.0, -1.0).to_angle(), 0.0));
        assert!(same_heading(Vector2::new(1.0, 0.0).to_angle(), 90.0));
        assert!(same_heading(Vector2::new(0.0, 1.0).to_angle(), 180.0));
        assert!(same_heading(Vector2::new(-1.0, 0.0).to_angle(), 270.0));
    }

    #[test]
    fn from_angle_inverts_to_angle() {
        for deg in [0.0f32, 45.0, 90.0, 135.0, 200.0, 300.0] {
            let v = Vector2::from_angle(deg);
            assert!(approx(v.length(), 1.0));
            assert!(same_heading(v.to_angle(), deg), "{deg} -> {}", v.to_angle());
        }
    }

    #[test]
    fn normalize_zero_stays_zero() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
        let n = Vector2::new(3.0, 4.0).normalize();
        assert!(approx(n.x, 0.6) && approx(n.y, 0.8));
    }

    #[test]
    fn lerp_and_distance() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(10.0, -20.0);
        assert_eq!(a.lerp_to(b, 0.5), Vector2::new(5.0, -10.0));
        assert!(approx(Vector2::new(0.0, 3.0).distance_to(Vector2::new(4.0, 0.0)), 5.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = Vector2::new(1.0, 0.0).rotate(90.0);
        assert!(approx(r.x, 0.0) && approx(r.y, 1.0));
    }

    #[test]
    fn delta_angle_wraps() {
        let up = Vector2::from_angle(10.0);
        let left = Vector2::from_angle(350.0);
        assert!(approx(up.delta_angle(left), 20.0));
        assert!(approx(left.delta_angle(up), -20.0));
    }

    #[test]
    fn component_ops() {
        let a = Vector2::new(2.0, 6.0);
        let b = Vector2::new(4.0, 3.0);
        assert_eq!(a.multiply(b), Vector2::new(8.0, 18.0));
        assert_eq!(a.divide(b), Vector2::new(0.5, 2.0));
        assert_eq!(a.cross(b), 2.0 * 3.0 - 6.0 * 4.0);
        assert_eq!(-a, Vector2::new(-2.0, -6.0));
    }

    #[test]
    fn glam_interop() {
        let g: glam::Vec2 = Vector2::new(1.5, -2.0).into();
        assert_eq!(Vector2::from(g), Vector2::new(1.5, -2.0));
    }
}
