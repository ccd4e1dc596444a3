//! Free-hand signature capture.
//!
//! A `SignaturePad` owns one pixel buffer for the lifetime of a form. Pointer
//! events drive a two-state machine (idle / drawing); successive samples are
//! joined with round-capped segments so coarse input still yields a
//! continuous line.

pub mod canvas;
pub mod input;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::settings::SignatureSettings;
use canvas::StrokeCanvas;
pub use input::{ClientPoint, PointerInput, SurfacePoint, SurfaceRect};

const ENABLE_LOGS: bool = false;
use crate::log_debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeState {
    Idle,
    Drawing,
}

pub struct SignaturePad {
    canvas: StrokeCanvas,
    state: StrokeState,
    last_point: Option<SurfacePoint>,
    has_ink: bool,
}

impl SignaturePad {
    pub fn new(settings: &SignatureSettings) -> Result<Self> {
        settings.validate()?;
        let canvas = StrokeCanvas::new(
            settings.width,
            settings.height,
            settings.stroke_width,
            settings.ink()?,
        );
        Ok(Self {
            canvas,
            state: StrokeState::Idle,
            last_point: None,
            has_ink: false,
        })
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    /// Whether any pixel has been painted since creation or the last `clear`.
    pub fn has_ink(&self) -> bool {
        self.has_ink
    }

    pub fn begin_stroke(&mut self, point: SurfacePoint) {
        if !point.is_finite() {
            return;
        }
        self.state = StrokeState::Drawing;
        self.last_point = Some(point);
        log_debug!("stroke started at ({}, {})", point.x, point.y);
    }

    /// Ignored unless a stroke is in progress.
    pub fn extend_stroke(&mut self, point: SurfacePoint) {
        if self.state != StrokeState::Drawing || !point.is_finite() {
            return;
        }
        if let Some(last) = self.last_point {
            if self.canvas.draw_segment(last, point) {
                self.has_ink = true;
            }
        }
        self.last_point = Some(point);
    }

    pub fn end_stroke(&mut self) {
        self.state = StrokeState::Idle;
        self.last_point = None;
    }

    /// Erases the surface. A stroke in progress stays in progress.
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.has_ink = false;
    }

    /// PNG data URI of the current content; a blank surface encodes as a
    /// fully transparent image.
    pub fn export_image(&self) -> Result<String> {
        self.canvas.to_data_uri()
    }

    /// The value stored as a record's `signatureData`.
    pub fn signature_data(&self) -> Result<Option<String>> {
        if self.has_ink {
            self.export_image().map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn pointer_down(&mut self, input: &PointerInput, rect: &SurfaceRect) {
        if let Some(point) = self.resolve(input, rect) {
            self.begin_stroke(point);
        }
    }

    pub fn pointer_move(&mut self, input: &PointerInput, rect: &SurfaceRect) {
        if let Some(point) = self.resolve(input, rect) {
            self.extend_stroke(point);
        }
    }

    /// Pointer released or left the surface.
    pub fn pointer_up(&mut self) {
        self.end_stroke();
    }

    fn resolve(&self, input: &PointerInput, rect: &SurfaceRect) -> Option<SurfacePoint> {
        input.to_surface(rect, self.canvas.width(), self.canvas.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> SignaturePad {
        SignaturePad::new(&SignatureSettings::default()).unwrap()
    }

    fn alpha(pad: &SignaturePad, x: u32, y: u32) -> u8 {
        pad.canvas.pixel(x, y).unwrap()[3]
    }

    #[test]
    fn separate_strokes_are_not_connected() {
        let mut pad = pad();
        pad.begin_stroke(SurfacePoint::new(10.0, 20.0));
        pad.extend_stroke(SurfacePoint::new(60.0, 20.0));
        pad.end_stroke();
        pad.begin_stroke(SurfacePoint::new(10.0, 120.0));
        pad.extend_stroke(SurfacePoint::new(60.0, 120.0));

        assert!(alpha(&pad, 35, 20) > 0);
        assert!(alpha(&pad, 35, 120) > 0);
        // Midpoint of the B→C jump that must never be drawn.
        assert_eq!(alpha(&pad, 35, 70), 0);
        assert_eq!(alpha(&pad, 60, 70), 0);
    }

    #[test]
    fn extend_while_idle_changes_nothing() {
        let fresh = pad().export_image().unwrap();

        let mut pad = pad();
        pad.extend_stroke(SurfacePoint::new(5.0, 5.0));
        pad.extend_stroke(SurfacePoint::new(100.0, 100.0));
        assert!(!pad.has_ink());
        assert_eq!(pad.export_image().unwrap(), fresh);

        pad.begin_stroke(SurfacePoint::new(10.0, 10.0));
        pad.end_stroke();
        pad.extend_stroke(SurfacePoint::new(200.0, 10.0));
        assert_eq!(pad.export_image().unwrap(), fresh);
    }

    #[test]
    fn clear_restores_the_blank_image() {
        let fresh = pad().export_image().unwrap();

        let mut pad = pad();
        pad.begin_stroke(SurfacePoint::new(0.0, 0.0));
        pad.extend_stroke(SurfacePoint::new(599.0, 159.0));
        pad.end_stroke();
        assert_ne!(pad.export_image().unwrap(), fresh);

        pad.clear();
        assert_eq!(pad.export_image().unwrap(), fresh);
        assert_eq!(pad.signature_data().unwrap(), None);
    }

    #[test]
    fn clear_keeps_the_drawing_state() {
        let mut pad = pad();
        pad.begin_stroke(SurfacePoint::new(10.0, 10.0));
        pad.clear();
        assert_eq!(pad.state(), StrokeState::Drawing);
        pad.extend_stroke(SurfacePoint::new(50.0, 10.0));
        assert!(pad.has_ink());
    }

    #[test]
    fn signature_data_present_only_after_drawing() {
        let mut pad = pad();
        assert_eq!(pad.signature_data().unwrap(), None);

        pad.begin_stroke(SurfacePoint::new(10.0, 10.0));
        assert_eq!(pad.signature_data().unwrap(), None);

        pad.extend_stroke(SurfacePoint::new(40.0, 30.0));
        let data = pad.signature_data().unwrap().unwrap();
        assert!(data.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn stroke_outside_the_surface_is_not_a_signature() {
        let mut pad = pad();
        pad.begin_stroke(SurfacePoint::new(-50.0, -50.0));
        pad.extend_stroke(SurfacePoint::new(-10.0, -10.0));
        pad.end_stroke();

        assert!(!pad.has_ink());
        assert_eq!(pad.signature_data().unwrap(), None);

        pad.begin_stroke(SurfacePoint::new(700.0, 20.0));
        pad.extend_stroke(SurfacePoint::new(700.0, 90.0));
        pad.extend_stroke(SurfacePoint::new(590.0, 90.0));
        pad.end_stroke();
        assert!(pad.has_ink());
        assert!(pad.signature_data().unwrap().is_some());
    }

    #[test]
    fn pointer_events_follow_the_state_machine() {
        let mut pad = pad();
        let rect = SurfaceRect {
            left: 20.0,
            top: 300.0,
            width: 600.0,
            height: 160.0,
        };
        let at = |x: f32, y: f32| {
            PointerInput::Mouse(ClientPoint {
                client_x: x,
                client_y: y,
            })
        };

        pad.pointer_move(&at(60.0, 350.0), &rect);
        assert_eq!(pad.state(), StrokeState::Idle);

        pad.pointer_down(&at(60.0, 350.0), &rect);
        assert_eq!(pad.state(), StrokeState::Drawing);
        pad.pointer_move(&at(120.0, 350.0), &rect);
        pad.pointer_up();
        assert_eq!(pad.state(), StrokeState::Idle);

        // Local (70, 50) lies on the drawn line.
        assert!(alpha(&pad, 70, 49) > 0);
        assert_eq!(alpha(&pad, 70, 100), 0);
    }

    #[test]
    fn empty_touch_does_not_start_a_stroke() {
        let mut pad = pad();
        let rect = SurfaceRect {
            left: 0.0,
            top: 0.0,
            width: 600.0,
            height: 160.0,
        };
        pad.pointer_down(&PointerInput::Touch { touches: vec![] }, &rect);
        assert_eq!(pad.state(), StrokeState::Idle);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut settings = SignatureSettings::default();
        settings.width = 0;
        assert!(SignaturePad::new(&settings).is_err());

        settings.width = 300;
        settings.height = 0;
        assert!(SignaturePad::new(&settings).is_err());
    }
}
