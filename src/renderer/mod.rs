//! Canvas 2D renderer
//!
//! Draws a [`Snapshot`] as filled circles. Holds no simulation state.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::{BACKGROUND_COLOR, BodyView, Snapshot};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: String,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            background: BACKGROUND_COLOR.to_css(),
        })
    }

    /// Match the drawing surface to the new arena size
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn render(&self, snapshot: &Snapshot) -> Result<(), JsValue> {
        let (w, h) = (snapshot.width as f64, snapshot.height as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(&self.background);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        // Pointer underneath the balls
        self.circle(&snapshot.pointer)?;
        for ball in &snapshot.balls {
            self.circle(ball)?;
        }
        Ok(())
    }

    fn circle(&self, body: &BodyView) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str(&body.color.to_css());
        self.ctx.begin_path();
        self.ctx.arc(
            body.x as f64,
            body.y as f64,
            body.radius as f64,
            0.0,
            std::f64::consts::TAU,
        )?;
        self.ctx.fill();
        Ok(())
    }
}
