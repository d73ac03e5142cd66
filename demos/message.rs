//! Writes a message with a vector font file.
//!
//! `cargo run --example message -- romans.fnt "Hello!" 2`

use turtleplot::{RecordingExecutor, TurtlePlot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let font = args.next().ok_or("usage: message <font.fnt> [message] [scale]")?;
    let message = args.next().unwrap_or_else(|| "Hello!".to_string());
    let scale: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1.0);

    let mut bot = TurtlePlot::new(RecordingExecutor::new());
    bot.setscale(scale)?;
    bot.write(&message, &font)?;

    let sim = bot.executor();
    println!(
        "{} strokes, {:.1} mm travelled, text ends at x = {:.1}",
        sim.segments().len(),
        sim.travel(),
        bot.xcor() * scale
    );
    Ok(())
}
