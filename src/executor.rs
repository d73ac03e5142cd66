//! The motion executor seam and two software backends.
//!
//! The engine never touches hardware. Every physical action is a blocking
//! call on a [`MotionExecutor`] supplied at construction time, so a stepper
//! robot, a simulator or a test double can be swapped in freely.

use crate::error::ExecutorError;
use crate::turtle::{Vector2, rotate_degrees};
use glam::DVec2;
use log::info;
use serde::{Deserialize, Serialize};

/// Performs the physical (or simulated) primitives of a plotter.
///
/// Each call blocks until the action completes. Errors are propagated to
/// the engine's caller unchanged.
pub trait MotionExecutor {
    /// Travels `distance` along the current heading; negative moves back.
    fn move_by(&mut self, distance: f64) -> Result<(), ExecutorError>;

    /// Turns counterclockwise by `degrees`; negative turns clockwise.
    fn turn(&mut self, degrees: f64) -> Result<(), ExecutorError>;

    /// Lowers (`true`) or raises (`false`) the pen.
    fn pen(&mut self, down: bool) -> Result<(), ExecutorError>;
}

impl<E: MotionExecutor + ?Sized> MotionExecutor for &mut E {
    fn move_by(&mut self, distance: f64) -> Result<(), ExecutorError> {
        (**self).move_by(distance)
    }

    fn turn(&mut self, degrees: f64) -> Result<(), ExecutorError> {
        (**self).turn(degrees)
    }

    fn pen(&mut self, down: bool) -> Result<(), ExecutorError> {
        (**self).pen(down)
    }
}

impl<E: MotionExecutor + ?Sized> MotionExecutor for Box<E> {
    fn move_by(&mut self, distance: f64) -> Result<(), ExecutorError> {
        (**self).move_by(distance)
    }

    fn turn(&mut self, degrees: f64) -> Result<(), ExecutorError> {
        (**self).turn(degrees)
    }

    fn pen(&mut self, down: bool) -> Result<(), ExecutorError> {
        (**self).pen(down)
    }
}

/// One primitive as received by an executor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MotionOp {
    Move(f64),
    Turn(f64),
    Pen(bool),
}

/// A straight mark left on the paper while the pen was down.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vector2,
    pub end: Vector2,
}

/// Simulating executor that records every primitive and integrates them
/// into a physical pose, collecting the segments drawn.
///
/// Starts at the origin facing east with the pen up, in executor units
/// (i.e. already scaled).
#[derive(Clone, Debug)]
pub struct RecordingExecutor {
    ops: Vec<MotionOp>,
    segments: Vec<Segment>,
    position: Vector2,
    heading: Vector2,
    pen_down: bool,
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            segments: Vec::new(),
            position: DVec2::ZERO,
            heading: DVec2::X,
            pen_down: false,
        }
    }
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every primitive received, in order.
    pub fn ops(&self) -> &[MotionOp] {
        &self.ops
    }

    /// Segments traced with the pen down.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Simulated physical position.
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Simulated physical heading (unit vector).
    pub fn heading(&self) -> Vector2 {
        self.heading
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    /// Total distance travelled, drawing or not.
    pub fn travel(&self) -> f64 {
        self.ops
            .iter()
            .map(|op| match op {
                MotionOp::Move(d) => d.abs(),
                _ => 0.0,
            })
            .sum()
    }

    /// Drops recorded ops and segments, keeping the simulated pose.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.segments.clear();
    }
}

impl MotionExecutor for RecordingExecutor {
    fn move_by(&mut self, distance: f64) -> Result<(), ExecutorError> {
        self.ops.push(MotionOp::Move(distance));
        let end = self.position + self.heading * distance;
        if self.pen_down {
            self.segments.push(Segment {
                start: self.position,
                end,
            });
        }
        self.position = end;
        Ok(())
    }

    fn turn(&mut self, degrees: f64) -> Result<(), ExecutorError> {
        self.ops.push(MotionOp::Turn(degrees));
        self.heading = rotate_degrees(self.heading, degrees).normalize();
        Ok(())
    }

    fn pen(&mut self, down: bool) -> Result<(), ExecutorError> {
        self.ops.push(MotionOp::Pen(down));
        self.pen_down = down;
        Ok(())
    }
}

/// No-op executor that only logs what it was asked to do.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingExecutor;

impl MotionExecutor for LoggingExecutor {
    fn move_by(&mut self, distance: f64) -> Result<(), ExecutorError> {
        info!("move {distance:.3}");
        Ok(())
    }

    fn turn(&mut self, degrees: f64) -> Result<(), ExecutorError> {
        info!("turn {degrees:.3}");
        Ok(())
    }

    fn pen(&mut self, down: bool) -> Result<(), ExecutorError> {
        info!("pen {}", if down { "down" } else { "up" });
        Ok(())
    }
}
