//! Colors shared by every scene.

use reel_core::Color;

pub fn dark() -> Color {
    Color::rgb8(0x0a, 0x0a, 0x1a)
}

pub fn grid() -> Color {
    Color::rgb8(0x1a, 0x1a, 0x2e)
}

pub fn cyan() -> Color {
    Color::rgb8(0x00, 0xd4, 0xff)
}

pub fn green() -> Color {
    Color::rgb8(0x00, 0xff, 0x88)
}

pub fn red() -> Color {
    Color::rgb8(0xff, 0x44, 0x44)
}

pub fn white() -> Color {
    Color::WHITE
}
