use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme};

use crate::core::models::ThemeMode;

const BUTTON_RADIUS: f32 = 6.0;

pub fn get_theme(mode: &ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::custom(
            "Booker Dark".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.09, 0.09, 0.11),
                text: Color::from_rgb(0.95, 0.95, 0.95),
                primary: Color::from_rgb(0.2, 0.33, 0.55),
                success: Color::from_rgb(0.2, 0.75, 0.4),
                danger: Color::from_rgb(0.95, 0.3, 0.3),
                warning: Color::from_rgb(1.0, 0.7, 0.0),
            },
        ),
        ThemeMode::Light => Theme::custom(
            "Booker Light".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.96, 0.95, 0.92),
                text: Color::from_rgb(0.1, 0.1, 0.12),
                primary: Color::from_rgb(0.2, 0.33, 0.55),
                success: Color::from_rgb(0.1, 0.6, 0.3),
                danger: Color::from_rgb(0.85, 0.2, 0.2),
                warning: Color::from_rgb(0.9, 0.6, 0.0),
            },
        ),
    }
}

struct ButtonPalette {
    active: Color,
    hovered: Color,
    pressed: Color,
}

fn styled_button(palette: ButtonPalette, status: button::Status) -> button::Style {
    let (background, text_color, snap) = match status {
        button::Status::Active => (palette.active, Color::WHITE, false),
        button::Status::Hovered => (palette.hovered, Color::WHITE, false),
        button::Status::Pressed => (palette.pressed, Color::WHITE, true),
        button::Status::Disabled => (
            Color::from_rgb(0.3, 0.3, 0.3),
            Color::from_rgb(0.5, 0.5, 0.5),
            false,
        ),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: background,
            width: 1.0,
            radius: BUTTON_RADIUS.into(),
        },
        shadow: Shadow::default(),
        snap,
    }
}

/// Starts a capture run.
pub fn primary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    styled_button(
        ButtonPalette {
            active: Color::from_rgb(0.2, 0.33, 0.55),
            hovered: Color::from_rgb(0.26, 0.41, 0.66),
            pressed: Color::from_rgb(0.15, 0.25, 0.43),
        },
        status,
    )
}

pub fn secondary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    styled_button(
        ButtonPalette {
            active: Color::from_rgba(0.4, 0.4, 0.45, 0.9),
            hovered: Color::from_rgba(0.5, 0.5, 0.55, 0.95),
            pressed: Color::from_rgba(0.3, 0.3, 0.35, 0.95),
        },
        status,
    )
}

/// Cancels a running capture.
pub fn danger_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    styled_button(
        ButtonPalette {
            active: Color::from_rgb(0.75, 0.22, 0.22),
            hovered: Color::from_rgb(0.85, 0.3, 0.3),
            pressed: Color::from_rgb(0.6, 0.16, 0.16),
        },
        status,
    )
}

pub fn panel_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::from_rgba(0.5, 0.5, 0.5, 0.12))),
        border: Border {
            color: Color::from_rgba(0.5, 0.5, 0.5, 0.3),
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}
