//! Draws an n-pointed star and reports what the plotter would do.
//!
//! Run with `RUST_LOG=info cargo run --example star -- 5 20`.

use turtleplot::{LoggingExecutor, TurtlePlot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let points: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(5);
    let length: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(20.0);

    let mut bot = TurtlePlot::new(LoggingExecutor);
    let angle = 180.0 - 180.0 / f64::from(points);
    bot.pendown()?;
    for _ in 0..points {
        bot.forward(length)?;
        bot.left(angle)?;
        bot.forward(length)?;
    }
    bot.penup()?;

    println!("finished at {:?}, heading {:.2}", bot.pos(), bot.heading());
    Ok(())
}
