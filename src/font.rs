//! Hershey-style vector fonts and text rendering.
//!
//! # Format
//!
//! All multi-byte values are little-endian.
//!
//! | Offset            | Size  | Content                                        |
//! |-------------------|-------|------------------------------------------------|
//! | 0                 | 2     | character count `C`                            |
//! | 2 + 2·i           | 2     | file offset of the glyph for code `begin + i`  |
//! | glyph             | 1     | point count `N`                                |
//! | glyph + 1         | 2     | `left`, `right` bearings, biased by `0x52`     |
//! | glyph + 3 + 2·k   | 2     | point `k` as `(x, y)`, biased by `0x52`        |
//!
//! Fonts with `C > 96` cover codes `[0, C)`, smaller ones the printable
//! window `[0x20, 0x20 + C)`. A point whose decoded x is `-50` is not a
//! coordinate but a pen-up marker for the point that follows.

use crate::engine::TurtlePlot;
use crate::error::{FontError, Result};
use crate::executor::MotionExecutor;
use crate::turtle::PenOverride;
use glam::DVec2;
use log::{debug, warn};
use std::ops::Range;
use std::path::Path;

/// Bias added to every signed byte in the glyph data.
pub const COORD_BIAS: i32 = 0x52;

/// Decoded x value marking a pen lift.
pub const PEN_UP_MARKER: i32 = -50;

/// Fonts with more characters than this start at code 0.
const PRINTABLE_WINDOW: u16 = 96;

/// One point of a glyph outline, relative to the glyph cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokePoint {
    pub x: f64,
    /// Font y grows downward.
    pub y: f64,
    /// Travel to this point with the pen up (start of a new stroke).
    pub pen_up_before: bool,
}

/// A decoded character.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub left: f64,
    pub right: f64,
    /// Advance after the glyph, `right - left`.
    pub width: f64,
    pub strokes: Vec<StrokePoint>,
}

/// An in-memory vector font.
#[derive(Clone, Debug)]
pub struct Font {
    data: Vec<u8>,
    count: u16,
    begin: u32,
}

impl Font {
    /// Reads a font file.
    pub fn open(path: impl AsRef<Path>) -> std::result::Result<Self, FontError> {
        let path = path.as_ref();
        debug!("loading font {}", path.display());
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> std::result::Result<Self, FontError> {
        let data = data.into();
        let count = read_u16(&data, 0)?;
        let begin = if count > PRINTABLE_WINDOW { 0x00 } else { 0x20 };
        Ok(Self { data, count, begin })
    }

    pub fn character_count(&self) -> u16 {
        self.count
    }

    /// Character codes this font defines.
    pub fn code_range(&self) -> Range<u32> {
        self.begin..self.begin + u32::from(self.count)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.code_range().contains(&code)
    }

    /// Decodes the glyph for `code`, or `None` when the font does not
    /// define it.
    pub fn glyph(&self, code: u32) -> std::result::Result<Option<Glyph>, FontError> {
        if !self.contains(code) {
            return Ok(None);
        }
        let entry = ((code - self.begin + 1) * 2) as usize;
        let offset = usize::from(read_u16(&self.data, entry)?);

        let count = read_u8(&self.data, offset)?;
        let left = unbias(read_u8(&self.data, offset + 1)?);
        let right = unbias(read_u8(&self.data, offset + 2)?);

        let mut strokes = Vec::with_capacity(usize::from(count));
        let mut pen_up = true;
        for k in 0..usize::from(count) {
            let at = offset + 3 + 2 * k;
            let x = unbias(read_u8(&self.data, at)?);
            let y = unbias(read_u8(&self.data, at + 1)?);
            if x == PEN_UP_MARKER {
                pen_up = true;
                continue;
            }
            strokes.push(StrokePoint {
                x: f64::from(x),
                y: f64::from(y),
                pen_up_before: pen_up,
            });
            pen_up = false;
        }

        Ok(Some(Glyph {
            left: f64::from(left),
            right: f64::from(right),
            width: f64::from(right - left),
            strokes,
        }))
    }
}

fn unbias(byte: u8) -> i32 {
    i32::from(byte) - COORD_BIAS
}

fn read_u8(data: &[u8], offset: usize) -> std::result::Result<u8, FontError> {
    data.get(offset)
        .copied()
        .ok_or(FontError::Truncated { offset })
}

fn read_u16(data: &[u8], offset: usize) -> std::result::Result<u16, FontError> {
    match data.get(offset..offset + 2) {
        Some(&[lo, hi]) => Ok(u16::from_le_bytes([lo, hi])),
        _ => Err(FontError::Truncated { offset }),
    }
}

impl<E: MotionExecutor> TurtlePlot<E> {
    /// Draws `message` starting at the current position, loading the font
    /// at `font_path` for the duration of the call.
    pub fn write(&mut self, message: &str, font_path: impl AsRef<Path>) -> Result<()> {
        let font = Font::open(font_path)?;
        self.write_font(message, &font)
    }

    /// Draws `message` with an already loaded font.
    ///
    /// Each glyph is placed at the current position and the turtle then
    /// advances by the glyph width along the frame's x-axis, regardless of
    /// its heading. Characters the font does not define are skipped without
    /// advancing. The pen state from before the call is restored at the end.
    pub fn write_font(&mut self, message: &str, font: &Font) -> Result<()> {
        let was_down = self.isdown();
        self.penup()?;

        for ch in message.chars() {
            let Some(glyph) = font.glyph(u32::from(ch))? else {
                warn!("font has no glyph for {ch:?}, skipping");
                continue;
            };
            let origin = self.pos();
            for point in &glyph.strokes {
                let target = origin + DVec2::new(point.x - glyph.left, -point.y);
                let pen = if point.pen_up_before {
                    PenOverride::Up
                } else {
                    PenOverride::Down
                };
                self.goto_with(target, pen)?;
            }
            self.goto_with(origin + DVec2::new(glyph.width, 0.0), PenOverride::Up)?;
        }

        if was_down {
            self.pendown()?;
        }
        Ok(())
    }
}
