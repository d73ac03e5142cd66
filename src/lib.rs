//! # turtleplot
//!
//! A hardware-independent turtle-graphics plotting engine for drawing robots.
//!
//! [`TurtlePlot`] tracks the turtle's pose under either heading convention
//! and any angle unit, approximates arcs with inscribed polygons and renders
//! text from Hershey-style vector fonts. Everything it does reaches the real
//! world as `move`, `turn` and `pen` calls on a [`MotionExecutor`]: a
//! [`StepperDrive`] for a two-wheeled stepper robot, a [`RecordingExecutor`]
//! for simulation and tests, or anything else the caller supplies.

pub mod engine;
pub mod error;
pub mod executor;
pub mod font;
pub mod stepper;
pub mod turtle;

pub use engine::*;
pub use error::{ConfigError, ExecutorError, FontError, PlotError};
pub use executor::*;
pub use font::*;
pub use stepper::*;
pub use turtle::*;
