//! Pointer input translated into surface-local coordinates.

use serde::{Deserialize, Serialize};

/// A position in surface pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

impl SurfacePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Viewport coordinates of a pointer or touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// The surface's bounding box in viewport coordinates, as the shell measured it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerInput {
    Mouse(ClientPoint),
    /// Only the first contact is used.
    Touch { touches: Vec<ClientPoint> },
}

impl PointerInput {
    fn primary(&self) -> Option<ClientPoint> {
        match self {
            PointerInput::Mouse(point) => Some(*point),
            PointerInput::Touch { touches } => touches.first().copied(),
        }
    }

    /// Maps the event into the pixel space of a `surface_width` x
    /// `surface_height` buffer. When the displayed rect is scaled relative to
    /// the buffer, the offset is scaled with it.
    pub fn to_surface(
        &self,
        rect: &SurfaceRect,
        surface_width: u32,
        surface_height: u32,
    ) -> Option<SurfacePoint> {
        let client = self.primary()?;
        let local_x = client.client_x - rect.left;
        let local_y = client.client_y - rect.top;

        let scale_x = if rect.width > 0.0 {
            surface_width as f32 / rect.width
        } else {
            1.0
        };
        let scale_y = if rect.height > 0.0 {
            surface_height as f32 / rect.height
        } else {
            1.0
        };

        let point = SurfacePoint::new(local_x * scale_x, local_y * scale_y);
        point.is_finite().then_some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> SurfaceRect {
        SurfaceRect {
            left: 100.0,
            top: 40.0,
            width: 600.0,
            height: 160.0,
        }
    }

    #[test]
    fn mouse_and_touch_resolve_to_the_same_point() {
        let contact = ClientPoint {
            client_x: 150.0,
            client_y: 90.0,
        };
        let mouse = PointerInput::Mouse(contact).to_surface(&rect(), 600, 160);
        let touch = PointerInput::Touch {
            touches: vec![
                contact,
                ClientPoint {
                    client_x: 500.0,
                    client_y: 100.0,
                },
            ],
        }
        .to_surface(&rect(), 600, 160);

        assert_eq!(mouse, Some(SurfacePoint::new(50.0, 50.0)));
        assert_eq!(mouse, touch);
    }

    #[test]
    fn touch_without_contacts_is_ignored() {
        let input = PointerInput::Touch { touches: vec![] };
        assert_eq!(input.to_surface(&rect(), 600, 160), None);
    }

    #[test]
    fn scaled_display_maps_into_buffer_pixels() {
        let half_size = SurfaceRect {
            left: 0.0,
            top: 0.0,
            width: 300.0,
            height: 80.0,
        };
        let input = PointerInput::Mouse(ClientPoint {
            client_x: 150.0,
            client_y: 40.0,
        });
        assert_eq!(
            input.to_surface(&half_size, 600, 160),
            Some(SurfacePoint::new(300.0, 80.0))
        );
    }

    #[test]
    fn decodes_shell_payloads() {
        let mouse: PointerInput =
            serde_json::from_str(r#"{"kind":"mouse","clientX":1.5,"clientY":2}"#).unwrap();
        assert_eq!(
            mouse,
            PointerInput::Mouse(ClientPoint {
                client_x: 1.5,
                client_y: 2.0
            })
        );

        let touch: PointerInput =
            serde_json::from_str(r#"{"kind":"touch","touches":[{"clientX":3,"clientY":4}]}"#)
                .unwrap();
        assert!(matches!(touch, PointerInput::Touch { ref touches } if touches.len() == 1));
    }
}
