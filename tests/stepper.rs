// tests/stepper.rs
use turtleplot::{
    CoilPort, ConfigError, ExecutorError, HALF_STEP_MASKS, MotionExecutor, PenServo, PlotError,
    StepperConfig, StepperDrive, TurtlePlot,
};

/// Records every coil pattern; fails once `fail_after` writes succeeded.
#[derive(Default)]
struct Coils {
    writes: Vec<u8>,
    fail_after: Option<usize>,
}

impl CoilPort for Coils {
    fn write(&mut self, pattern: u8) -> Result<(), ExecutorError> {
        if self.fail_after.is_some_and(|n| self.writes.len() >= n) {
            return Err(ExecutorError::Fault("i2c bus error".into()));
        }
        self.writes.push(pattern);
        Ok(())
    }
}

#[derive(Default)]
struct Servo {
    angles: Vec<f64>,
}

impl PenServo for Servo {
    fn set_angle(&mut self, degrees: f64) -> Result<(), ExecutorError> {
        self.angles.push(degrees);
        Ok(())
    }
}

fn drive() -> StepperDrive<Coils, Servo> {
    StepperDrive::new(StepperConfig::default(), Coils::default(), Servo::default()).unwrap()
}

#[test]
fn test_default_config_geometry() {
    let config = StepperConfig::default();
    assert_eq!(config.steps_per_rev, 4076);
    assert_eq!(config.step_masks, HALF_STEP_MASKS);
    let spm = 4076.0 / (64.5 * std::f64::consts::PI);
    assert!((config.steps_per_mm() - spm).abs() < 1e-12);
    assert!((config.turn_travel(360.0) - 112.5 * std::f64::consts::PI).abs() < 1e-12);
    config.validate().unwrap();
}

#[test]
fn test_config_from_toml() {
    let config = StepperConfig::from_toml_str(
        r#"
        wheelbase = 100.0
        pen_down_angle = 170.0
        "#,
    )
    .unwrap();
    assert_eq!(config.wheelbase, 100.0);
    assert_eq!(config.pen_down_angle, 170.0);
    assert_eq!(config.wheel_diameter, 64.5);
    assert_eq!(config.pen_up_angle, 90.0);
}

#[test]
fn test_config_rejects_bad_values() {
    assert!(matches!(
        StepperConfig::from_toml_str("wheel_diameter = -1.0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        StepperConfig::from_toml_str("steps_per_rev = 0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        StepperConfig::from_toml_str("step_masks = [0, 1, 2, 3, 4, 5, 6, 7]"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        StepperConfig::from_toml_str("wheelbase = "),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_new_releases_coils_and_lifts_pen() {
    let d = drive();
    assert_eq!(d.coils().writes, vec![0]);
    assert_eq!(d.servo().angles, vec![90.0]);
}

#[test]
fn test_move_steps_wheels_in_opposite_directions() {
    let mut d = drive();
    assert_eq!(d.step_counts(-10.0, 10.0), [-201, 201]);

    d.move_by(10.0).unwrap();
    let writes = &d.coils().writes;
    assert_eq!(writes.len(), 1 + 201 + 1);
    // Left coils advance through the sequence, right coils go backwards.
    assert_eq!(writes[1], 0b1000_1000);
    assert_eq!(writes[2], 0b1001_1100);
    assert_eq!(writes[3], 0b0001_0100);
    assert_eq!(*writes.last().unwrap(), 0);
}

#[test]
fn test_turn_steps_wheels_in_the_same_direction() {
    let mut d = drive();
    let travel = d.config().turn_travel(90.0);
    let [left, right] = d.step_counts(-travel, -travel);
    assert_eq!(left, right);
    assert!(left < 0);

    d.turn(90.0).unwrap();
    let writes = &d.coils().writes;
    assert_eq!(writes.len(), 1 + left.unsigned_abs() as usize + 1);
    assert_eq!(writes[1], 0b1000_1000);
    assert_eq!(writes[2], 0b1100_1100);
    assert_eq!(*writes.last().unwrap(), 0);
}

#[test]
fn test_short_moves_only_release_coils() {
    let mut d = drive();
    d.move_by(0.01).unwrap();
    assert_eq!(d.coils().writes, vec![0, 0]);
}

#[test]
fn test_pen_and_done_drive_servo() {
    let mut d = drive();
    d.pen(true).unwrap();
    d.pen(false).unwrap();
    d.done().unwrap();
    assert_eq!(d.servo().angles, vec![90.0, 180.0, 90.0, 90.0]);
    assert_eq!(d.coils().writes, vec![0, 0]);
}

#[test]
fn test_plotter_on_stepper_drive() {
    let mut t = TurtlePlot::new(drive());
    t.pendown().unwrap();
    t.forward(10.0).unwrap();
    t.penup().unwrap();

    let d = t.executor();
    assert_eq!(d.servo().angles, vec![90.0, 180.0, 90.0]);
    assert_eq!(d.coils().writes.len(), 1 + 201 + 1);
}

#[test]
fn test_coil_failure_reaches_the_caller() {
    let coils = Coils {
        fail_after: Some(5),
        ..Default::default()
    };
    let d = StepperDrive::new(StepperConfig::default(), coils, Servo::default()).unwrap();
    let mut t = TurtlePlot::new(d);
    let err = t.forward(10.0).unwrap_err();
    assert!(matches!(err, PlotError::Executor(ExecutorError::Fault(_))));
    assert_eq!(t.xcor(), 10.0);
    assert_eq!(t.executor().coils().writes.len(), 5);
}
