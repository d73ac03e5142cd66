//! Turtle pose, heading conventions and angle units.

use crate::error::PlotError;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 2D vector in the plotting frame.
pub type Vector2 = DVec2;

/// Rotates `v` counterclockwise by `degrees`.
pub fn rotate_degrees(v: Vector2, degrees: f64) -> Vector2 {
    DVec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit-circle angle of `v` in degrees, in `[0, 360)`.
///
/// Rounded to ten decimal places so that directions produced by exact
/// quarter turns report exact angles.
fn vector_angle_degrees(v: Vector2) -> f64 {
    let deg = v.y.atan2(v.x).to_degrees();
    ((deg * 1e10).round() / 1e10).rem_euclid(360.0)
}

/// Heading convention.
///
/// | Mode       | Initial heading | Positive angles  |
/// |------------|-----------------|------------------|
/// | `Standard` | east `(1, 0)`   | counterclockwise |
/// | `Logo`     | north `(0, 1)`  | clockwise        |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    Logo,
}

impl Mode {
    /// The heading a freshly reset turtle faces in this mode.
    pub fn start_heading(self) -> Vector2 {
        match self {
            Mode::Standard => DVec2::X,
            Mode::Logo => DVec2::Y,
        }
    }

    /// Sign applied when expressing physical angles as reported headings.
    pub fn angle_orient(self) -> f64 {
        match self {
            Mode::Standard => 1.0,
            Mode::Logo => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::Logo => "logo",
        }
    }
}

impl FromStr for Mode {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Mode::Standard),
            "logo" => Ok(Mode::Logo),
            _ => Err(PlotError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric expression of angles: how many units make a full circle, and
/// where zero points for the current [`Mode`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleUnit {
    /// Units in one full turn (360.0 for degrees, 2π for radians).
    pub fullcircle: f64,
    /// Physical degrees per unit, `360 / fullcircle`.
    pub degrees_per_unit: f64,
    /// Reported heading of the frame's east direction: 0 in standard
    /// mode, a quarter turn in logo mode.
    pub angle_offset: f64,
    /// +1 for counterclockwise-positive reporting, -1 for clockwise.
    pub angle_orient: f64,
}

impl AngleUnit {
    pub fn new(fullcircle: f64, mode: Mode) -> Self {
        let angle_offset = match mode {
            Mode::Standard => 0.0,
            Mode::Logo => fullcircle / 4.0,
        };
        Self {
            fullcircle,
            degrees_per_unit: 360.0 / fullcircle,
            angle_offset,
            angle_orient: mode.angle_orient(),
        }
    }

    pub fn degrees() -> Self {
        Self::new(360.0, Mode::Standard)
    }

    /// Converts an angle in this unit into physical degrees.
    pub fn to_degrees(&self, angle: f64) -> f64 {
        angle * self.degrees_per_unit
    }

    /// Normalizes into `[0, fullcircle)`.
    pub fn normalize(&self, angle: f64) -> f64 {
        angle.rem_euclid(self.fullcircle)
    }

    /// Normalizes a turn delta into `[-fullcircle/2, fullcircle/2)`, the
    /// shortest way round.
    pub fn normalize_delta(&self, angle: f64) -> f64 {
        let half = self.fullcircle / 2.0;
        (angle + half).rem_euclid(self.fullcircle) - half
    }

    /// Reports the direction of `v` as a heading in this unit and mode.
    pub fn express(&self, v: Vector2) -> f64 {
        let result = vector_angle_degrees(v) / self.degrees_per_unit;
        self.normalize(self.angle_offset + self.angle_orient * result)
    }
}

impl Default for AngleUnit {
    fn default() -> Self {
        Self::degrees()
    }
}

/// Explicit pen state for a single absolute move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PenOverride {
    /// Travel with whatever pen state the turtle already has.
    #[default]
    Keep,
    /// Force the pen down for the travel.
    Down,
    /// Force the pen up for the travel.
    Up,
}

impl PenOverride {
    /// Resolves the pen state to travel with, given the current one.
    pub fn resolve(self, current: bool) -> bool {
        match self {
            PenOverride::Keep => current,
            PenOverride::Down => true,
            PenOverride::Up => false,
        }
    }
}

impl From<bool> for PenOverride {
    fn from(down: bool) -> Self {
        if down { PenOverride::Down } else { PenOverride::Up }
    }
}

/// Position, heading and pen state of the plotting turtle.
///
/// Bookkeeping is in unscaled logical units; scale only affects what is
/// sent to the executor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector2,
    /// Always unit length.
    pub heading: Vector2,
    /// `true` while the pen is down.
    pub drawing: bool,
}

impl Pose {
    /// A pose at the origin facing the mode's start heading, pen up.
    pub fn new(mode: Mode) -> Self {
        Self {
            position: DVec2::ZERO,
            heading: mode.start_heading(),
            drawing: false,
        }
    }

    /// Moves along the heading by `distance` logical units.
    pub fn advance(&mut self, distance: f64) {
        self.position += self.heading * distance;
    }

    /// Rotates the heading counterclockwise by `degrees`.
    pub fn rotate(&mut self, degrees: f64) {
        self.heading = rotate_degrees(self.heading, degrees).normalize();
    }

    pub fn distance_to(&self, target: Vector2) -> f64 {
        (target - self.position).length()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Mode::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("standard".parse::<Mode>().unwrap(), Mode::Standard);
        assert_eq!("Logo".parse::<Mode>().unwrap(), Mode::Logo);
        assert!(matches!(
            "world".parse::<Mode>(),
            Err(PlotError::InvalidMode(_))
        ));
        assert_eq!(Mode::Logo.to_string(), "logo");
    }

    #[test]
    fn test_normalize_delta_is_half_open() {
        let unit = AngleUnit::degrees();
        assert_eq!(unit.normalize_delta(180.0), -180.0);
        assert_eq!(unit.normalize_delta(-180.0), -180.0);
        assert_eq!(unit.normalize_delta(190.0), -170.0);
        assert_eq!(unit.normalize_delta(-350.0), 10.0);
        assert_eq!(unit.normalize(-90.0), 270.0);
    }

    #[test]
    fn test_logo_unit_offset_follows_fullcircle() {
        assert_eq!(AngleUnit::new(400.0, Mode::Logo).angle_offset, 100.0);
        assert_eq!(AngleUnit::new(400.0, Mode::Standard).angle_offset, 0.0);
        assert_eq!(AngleUnit::new(400.0, Mode::Logo).degrees_per_unit, 0.9);
    }

    #[test]
    fn test_pen_override_resolution() {
        assert!(PenOverride::Keep.resolve(true));
        assert!(!PenOverride::Keep.resolve(false));
        assert!(PenOverride::Down.resolve(false));
        assert!(!PenOverride::Up.resolve(true));
        assert_eq!(PenOverride::from(true), PenOverride::Down);
    }

    #[test]
    fn test_pose_rotation_keeps_unit_heading() {
        let mut pose = Pose::new(Mode::Standard);
        for _ in 0..1000 {
            pose.rotate(7.3);
        }
        assert!((pose.heading.length() - 1.0).abs() < 1e-12);
    }
}
