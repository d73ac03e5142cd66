//! Traces a regular polygon with `circle` on a simulated plotter and prints
//! the segments it drew.

use turtleplot::{RecordingExecutor, TurtlePlot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let sides: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(6);
    let radius: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(30.0);

    let mut bot = TurtlePlot::new(RecordingExecutor::new());
    bot.pendown()?;
    bot.circle(radius, None, Some(sides))?;
    bot.penup()?;

    for segment in bot.executor().segments() {
        println!(
            "({:8.3}, {:8.3}) -> ({:8.3}, {:8.3})",
            segment.start.x, segment.start.y, segment.end.x, segment.end.y
        );
    }
    println!("travel: {:.3} mm", bot.executor().travel());
    Ok(())
}
