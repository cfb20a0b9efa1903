//! Draws a small scene and prints it as a PNG data URL.
//!
//! Run with `cargo run -p vexel-canvas --example snapshot`, paste the
//! output into a browser address bar to view it.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use vexel_canvas::{CanvasContext, FillRule};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut ctx = CanvasContext::new(160, 120);

    // Sky
    let mut sky = ctx.create_linear_gradient(0.0, 0.0, 0.0, 120.0);
    sky.add_color_stop(0.0, "#0b2a4a");
    sky.add_color_stop(1.0, "#87ceeb");
    ctx.set_fill_gradient(&sky);
    ctx.fill_rect(0.0, 0.0, 160.0, 120.0);

    // Sun
    let mut sun = ctx.create_radial_gradient(120.0, 30.0, 2.0, 120.0, 30.0, 18.0);
    sun.add_color_stop(0.0, "#fffde0");
    sun.add_color_stop(1.0, "rgba(255, 200, 0, 0.1)");
    ctx.set_fill_gradient(&sun);
    ctx.begin_path();
    ctx.arc(120.0, 30.0, 18.0, 0.0, std::f64::consts::TAU, false);
    ctx.fill();

    // Hills
    ctx.set_fill_style("#2e6b30");
    ctx.begin_path();
    ctx.move_to(0.0, 120.0);
    ctx.quadratic_curve_to(40.0, 70.0, 80.0, 100.0);
    ctx.quadratic_curve_to(120.0, 85.0, 160.0, 110.0);
    ctx.line_to(160.0, 120.0);
    ctx.close_path();
    ctx.fill_with_rule(FillRule::NonZero);

    // Kite on a string
    ctx.save();
    ctx.translate(40.0, 40.0);
    ctx.rotate(0.4);
    ctx.set_fill_style("#d33");
    ctx.begin_path();
    ctx.move_to(0.0, -12.0);
    ctx.line_to(8.0, 0.0);
    ctx.line_to(0.0, 12.0);
    ctx.line_to(-8.0, 0.0);
    ctx.close_path();
    ctx.fill();
    ctx.restore();

    ctx.set_stroke_style("rgba(255, 255, 255, 0.8)");
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(44.0, 50.0);
    ctx.quadratic_curve_to(60.0, 90.0, 90.0, 112.0);
    ctx.stroke();

    println!("{}", ctx.to_data_url());
    Ok(())
}
