//! In-memory drawing surface.
//!
//! Records path commands instead of rasterizing them. Hosts use it in tests;
//! the CLI uses it to print cloud polygons.

use serde::Serialize;

use super::{DrawingSurface, Pixel, Rgba};

/// One recorded surface call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Pixel),
    LineTo(Pixel),
    ClosePath,
    Fill(Rgba),
}

/// A filled polygon reassembled from recorded commands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedPolygon {
    pub vertices: Vec<Pixel>,
    pub color: Rgba,
}

#[derive(Debug, Clone, Default)]
pub struct PathRecorder {
    commands: Vec<PathCommand>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Group commands into filled polygons, one per `Fill`.
    pub fn polygons(&self) -> Vec<RecordedPolygon> {
        let mut polygons = Vec::new();
        let mut current: Vec<Pixel> = Vec::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    current.clear();
                    current.push(p);
                }
                PathCommand::LineTo(p) => current.push(p),
                PathCommand::ClosePath => {}
                PathCommand::Fill(color) => polygons.push(RecordedPolygon {
                    vertices: std::mem::take(&mut current),
                    color,
                }),
            }
        }
        polygons
    }
}

impl DrawingSurface for PathRecorder {
    fn move_to(&mut self, point: Pixel) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Pixel) {
        self.commands.push(PathCommand::LineTo(point));
    }

    fn close_path(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(PathCommand::Fill(color));
    }
}
