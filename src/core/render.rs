//=========================================================================
// Render Target
//=========================================================================
//
// The core never rasterizes anything itself. Scenes and drawables issue
// fill/blit calls against a `Canvas` supplied by the driver; sprites are
// opaque handles resolved by whatever backend implements the canvas.
//
//=========================================================================

//=== Color ===============================================================

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Self = Self::rgb(211, 211, 211);
    pub const GREEN: Self = Self::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

//=== Sprite ==============================================================

/// Opaque image handle plus its pixel size.
///
/// Handles are handed out by the asset collaborator; the canvas backend
/// maps `id` to actual pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

impl Sprite {
    pub const fn new(id: u32, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}

//=== Canvas ==============================================================

/// Render target passed into `Scene::render` each frame.
pub trait Canvas {
    /// Fills the whole target with `color`.
    fn fill(&mut self, color: Color);

    /// Draws `sprite` with its top-left corner at `(x, y)`.
    fn blit(&mut self, sprite: &Sprite, x: f32, y: f32);
}

//=== RecordingCanvas =====================================================

/// One call made against a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill(Color),
    Blit { sprite: u32, x: f32, y: f32 },
}

/// Canvas that records draw calls instead of rasterizing.
///
/// Useful for headless runs and for asserting draw order.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Sprite ids blitted so far, in draw order.
    pub fn blitted(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Blit { sprite, .. } => Some(*sprite),
                DrawCall::Fill(_) => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn fill(&mut self, color: Color) {
        self.calls.push(DrawCall::Fill(color));
    }

    fn blit(&mut self, sprite: &Sprite, x: f32, y: f32) {
        self.calls.push(DrawCall::Blit {
            sprite: sprite.id,
            x,
            y,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
