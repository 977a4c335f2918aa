use crate::camera::{CameraPose, RenderView};
use labspace_kernel::LabState;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads lab state and a view configuration, then produces
/// output. It never mutates the state; the store owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given lab state and view.
    fn render(&self, state: &LabState, view: &RenderView) -> Self::Output;
}

/// Debug text renderer, the stand-in for a real 3D front end.
///
/// Produces a human-readable dump of the lab. Useful for CLI output, logs,
/// and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, state: &LabState, view: &RenderView) -> String {
        let pose = CameraPose::from_player(&state.player);
        let mut out = String::new();
        let p = pose.position;
        let _ = writeln!(out, "=== Lab (equipment={}) ===", state.equipment.len());
        let _ = writeln!(
            out,
            "Player: pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} fov={:.0}",
            p.x, p.y, p.z, pose.yaw_deg, pose.pitch_deg, view.fov_degrees
        );
        let _ = writeln!(
            out,
            "Selected: {}  Held: {}",
            state.player.selected.as_ref().map_or("-", |i| i.as_str()),
            state.player.held.as_ref().map_or("-", |i| i.as_str()),
        );

        for e in &state.equipment {
            let q = e.position;
            let mut flags = String::new();
            if !e.available {
                flags.push_str(" unavailable");
            }
            if !e.interactive {
                flags.push_str(" inert");
            }
            let _ = write!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}){}",
                e.id, e.category, q.x, q.y, q.z, flags
            );
            if let Some(contents) = &e.contents {
                let _ = write!(out, " contents=[{}]", contents.join(", "));
            }
            if let Some(t) = e.temperature {
                let _ = write!(out, " temp={t:.1}");
            }
            if let Some(c) = &e.color {
                let _ = write!(out, " color={c}");
            }
            out.push('\n');
        }

        if let Some(exp) = state.active_experiment() {
            let _ = writeln!(
                out,
                "Experiment: {} ({}/{}){}",
                exp.name,
                exp.completed_steps(),
                exp.steps.len(),
                if exp.completed { " COMPLETE" } else { "" }
            );
            for s in &exp.steps {
                let mark = if s.completed { 'x' } else { ' ' };
                let _ = writeln!(out, "  [{mark}] {}", s.description);
            }
        }
        if let Some(msg) = &state.message {
            let _ = writeln!(out, "> {msg}");
        }
        out
    }
}
