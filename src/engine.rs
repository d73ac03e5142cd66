//! The pose and geometry engine.
//!
//! The entry point is [`TurtlePlot`]. Build it around a [`MotionExecutor`],
//! optionally from an [`EngineConfig`], then issue turtle commands. Each
//! command updates the logical [`Pose`] and emits the minimal sequence of
//! `move`/`turn`/`pen` primitives to the executor.

use crate::error::{PlotError, Result};
use crate::executor::MotionExecutor;
use crate::turtle::{AngleUnit, Mode, PenOverride, Pose, Vector2};
use glam::DVec2;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Initial configuration for a [`TurtlePlot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Heading convention. Default: standard (east, counterclockwise).
    pub mode: Mode,
    /// Angle units per full circle. Default: 360 (degrees).
    pub fullcircle: f64,
    /// Multiplier applied to every distance sent to the executor.
    pub scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Standard,
            fullcircle: 360.0,
            scale: 1.0,
        }
    }
}

/// Chooses how many chords approximate an arc when the caller gives none.
pub trait StepPolicy {
    /// Number of chords for an arc of `extent` (in units where a full
    /// circle is `fullcircle`) at `radius`. Zero is treated as one.
    fn steps(&self, radius: f64, extent: f64, fullcircle: f64) -> usize;
}

/// `1 + floor(min(11 + |radius| / 6, 59) * |extent| / fullcircle)`.
///
/// More chords for bigger and longer arcs, capped at 60 per full turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStepPolicy;

impl StepPolicy for DefaultStepPolicy {
    fn steps(&self, radius: f64, extent: f64, fullcircle: f64) -> usize {
        let frac = extent.abs() / fullcircle;
        1 + ((11.0 + radius.abs() / 6.0).min(59.0) * frac) as usize
    }
}

impl<F> StepPolicy for F
where
    F: Fn(f64, f64, f64) -> usize,
{
    fn steps(&self, radius: f64, extent: f64, fullcircle: f64) -> usize {
        self(radius, extent, fullcircle)
    }
}

fn check_fullcircle(fullcircle: f64) -> Result<()> {
    if fullcircle.is_finite() && fullcircle > 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidFullCircle(fullcircle))
    }
}

fn check_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidScale(scale))
    }
}

/// Turtle-graphics plotter driving a [`MotionExecutor`].
///
/// Position bookkeeping is optimistic: the pose is updated before each
/// primitive is sent, and is not rolled back when the executor fails.
pub struct TurtlePlot<E> {
    executor: E,
    pose: Pose,
    mode: Mode,
    unit: AngleUnit,
    scale: f64,
    step_policy: Box<dyn StepPolicy>,
}

impl<E: MotionExecutor> TurtlePlot<E> {
    /// Creates a standard-mode, degree-based plotter at the origin with
    /// the pen up.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            pose: Pose::new(Mode::Standard),
            mode: Mode::Standard,
            unit: AngleUnit::degrees(),
            scale: 1.0,
            step_policy: Box::new(DefaultStepPolicy),
        }
    }

    /// Creates a plotter from `config`, validating its scale and unit.
    pub fn with_config(executor: E, config: EngineConfig) -> Result<Self> {
        check_fullcircle(config.fullcircle)?;
        check_scale(config.scale)?;
        Ok(Self {
            executor,
            pose: Pose::new(config.mode),
            mode: config.mode,
            unit: AngleUnit::new(config.fullcircle, config.mode),
            scale: config.scale,
            step_policy: Box::new(DefaultStepPolicy),
        })
    }

    /// Replaces the chord-count heuristic used by [`circle`](Self::circle)
    /// (builder pattern).
    pub fn with_step_policy(mut self, policy: impl StepPolicy + 'static) -> Self {
        self.step_policy = Box::new(policy);
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    // --- Primitives ---

    fn go(&mut self, distance: f64) -> Result<()> {
        if distance == 0.0 {
            return Ok(());
        }
        self.pose.advance(distance);
        trace!("move {distance} -> {:?}", self.pose.position);
        self.executor.move_by(distance * self.scale)?;
        Ok(())
    }

    /// Rotates counterclockwise by `angle` in the current unit.
    fn rotate(&mut self, angle: f64) -> Result<()> {
        if angle == 0.0 {
            return Ok(());
        }
        let degrees = self.unit.to_degrees(angle);
        self.pose.rotate(degrees);
        trace!("turn {degrees}");
        self.executor.turn(degrees)?;
        Ok(())
    }

    fn set_pen(&mut self, down: bool) -> Result<()> {
        if self.pose.drawing == down {
            return Ok(());
        }
        self.pose.drawing = down;
        trace!("pen {}", if down { "down" } else { "up" });
        self.executor.pen(down)?;
        Ok(())
    }

    // --- Relative motion ---

    /// Moves `distance` along the heading. Negative distances move
    /// backwards without turning.
    pub fn forward(&mut self, distance: f64) -> Result<()> {
        self.go(distance)
    }

    pub fn fd(&mut self, distance: f64) -> Result<()> {
        self.forward(distance)
    }

    /// Moves `distance` against the heading without turning.
    pub fn back(&mut self, distance: f64) -> Result<()> {
        self.go(-distance)
    }

    pub fn bk(&mut self, distance: f64) -> Result<()> {
        self.back(distance)
    }

    pub fn backward(&mut self, distance: f64) -> Result<()> {
        self.back(distance)
    }

    /// Turns counterclockwise by `angle` units, whatever the mode.
    pub fn left(&mut self, angle: f64) -> Result<()> {
        self.rotate(angle)
    }

    pub fn lt(&mut self, angle: f64) -> Result<()> {
        self.left(angle)
    }

    /// Turns clockwise by `angle` units, whatever the mode.
    pub fn right(&mut self, angle: f64) -> Result<()> {
        self.rotate(-angle)
    }

    pub fn rt(&mut self, angle: f64) -> Result<()> {
        self.right(angle)
    }

    // --- Absolute motion ---

    /// Travels in a straight line to `target`.
    ///
    /// The pen is lifted while turning to face the target, then set to
    /// `pen` resolved against the current pen state for the travel. The
    /// turtle keeps the bearing it turned to. Travelling to the current
    /// position only applies the pen state.
    pub fn goto_with(&mut self, target: Vector2, pen: PenOverride) -> Result<()> {
        let travel_down = pen.resolve(self.pose.drawing);
        let distance = self.pose.distance_to(target);
        if distance == 0.0 {
            return self.set_pen(travel_down);
        }

        self.set_pen(false)?;
        let bearing = self.towards_point(target);
        self.setheading(bearing)?;
        self.set_pen(travel_down)?;

        self.pose.position = target;
        trace!("goto {target:?} ({distance})");
        self.executor.move_by(distance * self.scale)?;
        Ok(())
    }

    /// Travels to `(x, y)` with the current pen state.
    pub fn goto(&mut self, x: f64, y: f64) -> Result<()> {
        self.goto_with(DVec2::new(x, y), PenOverride::Keep)
    }

    /// Travels to `target` with the current pen state.
    pub fn setpos(&mut self, target: impl Into<Vector2>) -> Result<()> {
        self.goto_with(target.into(), PenOverride::Keep)
    }

    /// Travels horizontally to `x`, keeping y.
    pub fn setx(&mut self, x: f64) -> Result<()> {
        let target = DVec2::new(x, self.pose.position.y);
        self.goto_with(target, PenOverride::Keep)
    }

    /// Travels vertically to `y`, keeping x.
    pub fn sety(&mut self, y: f64) -> Result<()> {
        let target = DVec2::new(self.pose.position.x, y);
        self.goto_with(target, PenOverride::Keep)
    }

    /// Travels to the origin, then faces heading zero.
    pub fn home(&mut self) -> Result<()> {
        self.goto(0.0, 0.0)?;
        self.setheading(0.0)
    }

    /// Turns the shorter way round to face `to_angle`.
    pub fn setheading(&mut self, to_angle: f64) -> Result<()> {
        let angle = (to_angle - self.heading()) * self.unit.angle_orient;
        let angle = self.unit.normalize_delta(angle);
        self.rotate(angle)
    }

    pub fn seth(&mut self, to_angle: f64) -> Result<()> {
        self.setheading(to_angle)
    }

    /// Traces an arc of `extent` (default: full circle) with the center
    /// `radius` units to the left, as an inscribed polygon of `steps`
    /// chords (default: from the step policy).
    ///
    /// A negative radius traces the mirrored arc clockwise. The turtle
    /// turns half a step before the first chord and after the last, so the
    /// polygon leaves and arrives tangent to the true arc. Afterwards the
    /// heading has changed by `extent`.
    pub fn circle(&mut self, radius: f64, extent: Option<f64>, steps: Option<usize>) -> Result<()> {
        if radius == 0.0 {
            return Ok(());
        }
        let fullcircle = self.unit.fullcircle;
        let extent = extent.unwrap_or(fullcircle);
        let steps = steps
            .unwrap_or_else(|| self.step_policy.steps(radius, extent, fullcircle))
            .max(1);

        let mut per_step = extent / steps as f64;
        let mut half_step = 0.5 * per_step;
        let mut length = 2.0 * radius * self.unit.to_degrees(half_step).to_radians().sin();
        if radius < 0.0 {
            length = -length;
            per_step = -per_step;
            half_step = -half_step;
        }
        debug!("circle r={radius} extent={extent} steps={steps} chord={length}");

        self.rotate(half_step)?;
        for _ in 0..steps {
            self.go(length)?;
            self.rotate(per_step)?;
        }
        self.rotate(-half_step)
    }

    // --- Pen ---

    pub fn penup(&mut self) -> Result<()> {
        self.set_pen(false)
    }

    pub fn pendown(&mut self) -> Result<()> {
        self.set_pen(true)
    }

    pub fn isdown(&self) -> bool {
        self.pose.drawing
    }

    // --- Queries ---

    pub fn pos(&self) -> Vector2 {
        self.pose.position
    }

    pub fn position(&self) -> Vector2 {
        self.pos()
    }

    pub fn xcor(&self) -> f64 {
        self.pose.position.x
    }

    pub fn ycor(&self) -> f64 {
        self.pose.position.y
    }

    /// Current heading in the current unit and mode, in `[0, fullcircle)`.
    pub fn heading(&self) -> f64 {
        self.unit.express(self.pose.heading)
    }

    /// Heading from the turtle to `(x, y)`, in the current unit and mode.
    pub fn towards(&self, x: f64, y: f64) -> f64 {
        self.towards_point(DVec2::new(x, y))
    }

    pub fn towards_point(&self, target: Vector2) -> f64 {
        self.unit.express(target - self.pose.position)
    }

    /// Logical (unscaled) distance from the turtle to `(x, y)`.
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        self.distance_point(DVec2::new(x, y))
    }

    pub fn distance_point(&self, target: Vector2) -> f64 {
        self.pose.distance_to(target)
    }

    // --- Configuration ---

    /// Switches heading convention by name (`"standard"` or `"logo"`,
    /// case-insensitive) and resets the turtle.
    ///
    /// An unknown name is rejected and leaves the engine untouched.
    pub fn mode(&mut self, name: &str) -> Result<()> {
        let mode = name.parse::<Mode>()?;
        self.set_mode(mode);
        Ok(())
    }

    /// Switches heading convention and resets the turtle.
    pub fn set_mode(&mut self, mode: Mode) {
        debug!("mode {mode}");
        self.mode = mode;
        self.unit = AngleUnit::new(self.unit.fullcircle, mode);
        self.reset();
    }

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    /// Restores scale 1.0 and puts the turtle back at the origin facing
    /// the mode's start heading. Bookkeeping only: nothing moves and the
    /// pen is untouched.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.pose.position = DVec2::ZERO;
        self.pose.heading = self.mode.start_heading();
    }

    /// Measures angles in units of which `fullcircle` make a full turn.
    /// The physical heading is unchanged.
    pub fn degrees(&mut self, fullcircle: f64) -> Result<()> {
        check_fullcircle(fullcircle)?;
        debug!("fullcircle {fullcircle}");
        self.unit = AngleUnit::new(fullcircle, self.mode);
        Ok(())
    }

    /// Measures angles in radians.
    pub fn radians(&mut self) -> Result<()> {
        self.degrees(TAU)
    }

    pub fn fullcircle(&self) -> f64 {
        self.unit.fullcircle
    }

    pub fn angle_unit(&self) -> &AngleUnit {
        &self.unit
    }

    /// Sets the distance multiplier for subsequent primitives. Positions
    /// already reached are not affected.
    pub fn setscale(&mut self, scale: f64) -> Result<()> {
        check_scale(scale)?;
        debug!("scale {scale}");
        self.scale = scale;
        Ok(())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
