//! RGB-Farben mit Hex-Parsing und linearer Interpolation.
//!
//! Choroplethen-Farben entstehen als Interpolation zwischen Weiß und einer
//! modusspezifischen Grundfarbe; der Faktor kommt aus normalisierten Anteilen.

use serde::{Deserialize, Serialize};

/// RGB-Farbe mit 8 Bit pro Kanal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Erstellt eine Farbe aus den drei Kanälen.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parst eine Hex-Farbe der Form `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let raw = hex.strip_prefix('#')?;
        if raw.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(raw, 16).ok()?;
        Some(Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        })
    }

    /// Formatiert als `#RRGGBB` (Kleinbuchstaben).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Interpoliert linear zwischen `self` und `other`.
    ///
    /// `factor` wird auf [0, 1] geklemmt; Kanäle werden gerundet.
    pub fn lerp(self, other: Self, factor: f64) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8
        };
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}
