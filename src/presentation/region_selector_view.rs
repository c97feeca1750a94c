use iced::mouse;
use iced::widget::{canvas, container, stack, text};
use iced::{Alignment, Background, Border, Color, Element, Length, Point, Rectangle, Size};

use crate::core::models::{DisplayInfo, ScreenRegion};
use crate::global_constants::{SELECTOR_HINT_IDLE, SELECTOR_OVERLAY_RGBA};

/// Events published by one selector overlay. Points are local to the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionSelectorMessage {
    MousePressed(Point),
    MouseMoved(Point),
    MouseReleased(Option<Point>),
    CancelRequested,
}

/// Overlay covering one display. The drag itself lives in the orchestrator
/// so it can span displays; this view only draws the part of the preview
/// that falls on its own display.
pub struct RegionSelectorView {
    display: DisplayInfo,
}

impl RegionSelectorView {
    pub fn build(display: DisplayInfo) -> Self {
        log::debug!(
            "[SELECTOR] building overlay for display {} at {}",
            display.id,
            display.bounds()
        );
        Self { display }
    }

    pub fn display(&self) -> &DisplayInfo {
        &self.display
    }

    /// Converts an overlay-local point into global logical coordinates.
    pub fn to_global(&self, local: Point) -> (i32, i32) {
        self.display.to_global(local.x, local.y)
    }

    /// The part of a global preview rectangle on this display, in local
    /// coordinates.
    pub fn local_preview(&self, preview: Option<ScreenRegion>) -> Option<Rectangle> {
        let visible = preview?.intersection(&self.display.bounds())?;
        Some(Rectangle::new(
            Point::new(
                (visible.x - self.display.x) as f32,
                (visible.y - self.display.y) as f32,
            ),
            Size::new(visible.width as f32, visible.height as f32),
        ))
    }

    pub fn render_ui(&self, preview: Option<ScreenRegion>) -> Element<'_, RegionSelectorMessage> {
        let local_preview = self.local_preview(preview);
        let overlay_canvas = canvas(SelectionCanvas {
            selection: local_preview,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let mut layers: Vec<Element<'_, RegionSelectorMessage>> = vec![overlay_canvas.into()];

        if preview.is_none() && self.display.is_primary {
            let hint = container(text(SELECTOR_HINT_IDLE).size(16).style(|_theme| text::Style {
                color: Some(Color::WHITE),
            }))
            .padding([12, 24])
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color::from_rgba(0.1, 0.1, 0.1, 0.85))),
                border: Border {
                    color: Color::from_rgba(0.3, 0.6, 1.0, 0.8),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..Default::default()
            });

            layers.push(
                container(hint)
                    .width(Length::Fill)
                    .padding(iced::Padding {
                        top: 80.0,
                        right: 0.0,
                        bottom: 0.0,
                        left: 0.0,
                    })
                    .align_x(Alignment::Center)
                    .into(),
            );
        }

        container(stack(layers))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

struct SelectionCanvas {
    selection: Option<Rectangle>,
}

fn overlay_color() -> Color {
    let (red, green, blue, alpha) = SELECTOR_OVERLAY_RGBA;
    Color::from_rgba(red, green, blue, alpha)
}

impl canvas::Program<RegionSelectorMessage> for SelectionCanvas {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        _bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<RegionSelectorMessage>> {
        let position = match cursor {
            mouse::Cursor::Available(position) => Some(position),
            _ => None,
        };

        let message = match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                RegionSelectorMessage::MousePressed(position?)
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                RegionSelectorMessage::MouseMoved(position?)
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                RegionSelectorMessage::MouseReleased(position)
            }
            iced::Event::Keyboard(iced::keyboard::Event::KeyPressed {
                key: iced::keyboard::Key::Named(iced::keyboard::key::Named::Escape),
                ..
            }) => RegionSelectorMessage::CancelRequested,
            _ => return None,
        };

        Some(canvas::Action::publish(message))
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<iced::Renderer>> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let shade = overlay_color();

        match self.selection {
            Some(selection) => {
                let top_left = selection.position();
                let size = selection.size();

                frame.fill_rectangle(Point::ORIGIN, Size::new(bounds.width, top_left.y), shade);
                frame.fill_rectangle(
                    Point::new(0.0, top_left.y + size.height),
                    Size::new(bounds.width, bounds.height - (top_left.y + size.height)),
                    shade,
                );
                frame.fill_rectangle(
                    Point::new(0.0, top_left.y),
                    Size::new(top_left.x, size.height),
                    shade,
                );
                frame.fill_rectangle(
                    Point::new(top_left.x + size.width, top_left.y),
                    Size::new(bounds.width - (top_left.x + size.width), size.height),
                    shade,
                );

                frame.stroke(
                    &canvas::Path::rectangle(top_left, size),
                    canvas::Stroke::default()
                        .with_color(Color::from_rgb(0.3, 0.6, 1.0))
                        .with_width(2.0),
                );
            }
            None => frame.fill_rectangle(Point::ORIGIN, bounds.size(), shade),
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(id: u32, x: i32, is_primary: bool) -> DisplayInfo {
        DisplayInfo {
            id,
            name: format!("Display {}", id),
            x,
            y: 0,
            width: 1920,
            height: 1080,
            scale_factor: 1.0,
            is_primary,
        }
    }

    #[test]
    fn test_to_global_adds_display_origin() {
        let view = RegionSelectorView::build(display(2, 1920, false));

        assert_eq!(view.to_global(Point::new(100.0, 50.0)), (2020, 50));
    }

    #[test]
    fn test_local_preview_clips_to_display() {
        let left = RegionSelectorView::build(display(1, 0, true));
        let right = RegionSelectorView::build(display(2, 1920, false));
        let spanning = ScreenRegion::new(1820, 100, 200, 50);

        assert_eq!(
            left.local_preview(Some(spanning)),
            Some(Rectangle::new(
                Point::new(1820.0, 100.0),
                Size::new(100.0, 50.0)
            ))
        );
        assert_eq!(
            right.local_preview(Some(spanning)),
            Some(Rectangle::new(Point::new(0.0, 100.0), Size::new(100.0, 50.0)))
        );
    }

    #[test]
    fn test_local_preview_absent_on_other_display() {
        let right = RegionSelectorView::build(display(2, 1920, false));

        assert_eq!(
            right.local_preview(Some(ScreenRegion::new(10, 10, 50, 50))),
            None
        );
        assert_eq!(right.local_preview(None), None);
    }
}
