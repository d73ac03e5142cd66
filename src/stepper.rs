//! Differential-drive stepper executor.
//!
//! Two unipolar steppers drive the wheels; both nibbles of an 8-bit coil
//! port are written per step (left motor in the low nibble, right motor in
//! the high nibble). A servo lifts and lowers the pen. Step pacing belongs
//! to the [`CoilPort`] implementation; this module only does the
//! arithmetic and the coil sequencing.

use crate::error::{ConfigError, ExecutorError};
use crate::executor::MotionExecutor;
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const LEFT_MOTOR: usize = 0;
pub const RIGHT_MOTOR: usize = 1;

/// Half-step coil sequence for 28BYJ-48 style steppers.
pub const HALF_STEP_MASKS: [u8; 8] = [
    0b1000, 0b1100, 0b0100, 0b0110, 0b0010, 0b0011, 0b0001, 0b1001,
];

/// Geometry and actuator constants of a stepper robot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// Coil steps per wheel revolution.
    pub steps_per_rev: u32,
    /// Wheel diameter in mm (too small spirals in, too large spirals out).
    pub wheel_diameter: f64,
    /// Distance between the wheel contact points in mm.
    pub wheelbase: f64,
    /// Servo angle holding the pen off the paper.
    pub pen_up_angle: f64,
    /// Servo angle pressing the pen on the paper.
    pub pen_down_angle: f64,
    /// Coil patterns cycled through while stepping (4 bits each).
    pub step_masks: [u8; 8],
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            steps_per_rev: 4076,
            wheel_diameter: 64.5,
            wheelbase: 112.5,
            pen_up_angle: 90.0,
            pen_down_angle: 180.0,
            step_masks: HALF_STEP_MASKS,
        }
    }
}

impl StepperConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_rev == 0 {
            return Err(ConfigError::Invalid("steps_per_rev must be non-zero".into()));
        }
        if !(self.wheel_diameter.is_finite() && self.wheel_diameter > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wheel_diameter must be positive, got {}",
                self.wheel_diameter
            )));
        }
        if !(self.wheelbase.is_finite() && self.wheelbase > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wheelbase must be positive, got {}",
                self.wheelbase
            )));
        }
        if let Some(mask) = self.step_masks.iter().find(|&&m| m == 0 || m > 0x0F) {
            return Err(ConfigError::Invalid(format!(
                "step mask {mask:#06b} must be a non-empty 4-bit pattern"
            )));
        }
        Ok(())
    }

    pub fn steps_per_mm(&self) -> f64 {
        f64::from(self.steps_per_rev) / (self.wheel_diameter * PI)
    }

    /// Wheel travel in mm for an in-place turn of `degrees`.
    pub fn turn_travel(&self, degrees: f64) -> f64 {
        self.wheelbase * PI * (degrees / 360.0)
    }
}

/// The output port the stepper coils hang off.
pub trait CoilPort {
    /// Energizes the coils in `pattern`; returns once the step may be
    /// considered taken.
    fn write(&mut self, pattern: u8) -> Result<(), ExecutorError>;
}

/// The pen lift servo.
pub trait PenServo {
    fn set_angle(&mut self, degrees: f64) -> Result<(), ExecutorError>;
}

/// [`MotionExecutor`] for a two-wheeled stepper plotter.
pub struct StepperDrive<C, S> {
    config: StepperConfig,
    coils: C,
    servo: S,
    phase: [usize; 2],
}

impl<C: CoilPort, S: PenServo> StepperDrive<C, S> {
    /// Creates a drive with the coils de-energized and the pen up.
    pub fn new(config: StepperConfig, mut coils: C, mut servo: S) -> Result<Self, ExecutorError> {
        coils.write(0)?;
        servo.set_angle(config.pen_up_angle)?;
        Ok(Self {
            config,
            coils,
            servo,
            phase: [0, 0],
        })
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    pub fn coils(&self) -> &C {
        &self.coils
    }

    pub fn servo(&self) -> &S {
        &self.servo
    }

    /// Signed step counts for wheel travels in mm, truncated toward zero.
    pub fn step_counts(&self, left: f64, right: f64) -> [i64; 2] {
        let spm = self.config.steps_per_mm();
        [(left * spm) as i64, (right * spm) as i64]
    }

    /// Steps both wheels the same number of steps, each in its own
    /// direction, then releases the coils.
    fn move_steppers(&mut self, left: f64, right: f64) -> Result<(), ExecutorError> {
        let steps = self.step_counts(left, right);
        let count = steps[LEFT_MOTOR].unsigned_abs();
        debug!("steppers left={left:.3} right={right:.3} steps={count}");

        for _ in 0..count {
            let mut out = 0u8;
            for motor in [LEFT_MOTOR, RIGHT_MOTOR] {
                let dir = steps[motor];
                if dir == 0 {
                    continue;
                }
                let mask = self.config.step_masks[self.phase[motor]];
                out |= if motor == RIGHT_MOTOR { mask << 4 } else { mask };
                self.phase[motor] = if dir > 0 {
                    (self.phase[motor] + 7) % 8
                } else {
                    (self.phase[motor] + 1) % 8
                };
            }
            self.coils.write(out)?;
        }

        self.coils.write(0)
    }

    /// Lifts the pen and releases the coils.
    pub fn done(&mut self) -> Result<(), ExecutorError> {
        self.servo.set_angle(self.config.pen_up_angle)?;
        self.coils.write(0)
    }
}

impl<C: CoilPort, S: PenServo> MotionExecutor for StepperDrive<C, S> {
    fn move_by(&mut self, distance: f64) -> Result<(), ExecutorError> {
        self.move_steppers(-distance, distance)
    }

    fn turn(&mut self, degrees: f64) -> Result<(), ExecutorError> {
        let travel = self.config.turn_travel(degrees);
        self.move_steppers(-travel, -travel)
    }

    fn pen(&mut self, down: bool) -> Result<(), ExecutorError> {
        let angle = if down {
            self.config.pen_down_angle
        } else {
            self.config.pen_up_angle
        };
        self.servo.set_angle(angle)
    }
}
