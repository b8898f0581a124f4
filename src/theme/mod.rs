//! Theme - folder colors and box styling.
//!
//! Every folder gets its own background color, drawn from an injected
//! [`ColorGenerator`] when the folder is created. The color never changes
//! for the lifetime of the folder.
//!
//! # Generators
//!
//! - [`SeededColors`] - uniform 24-bit colors from a seeded `StdRng`
//! - [`FixedColor`] - the same color every time (tests, monochrome output)
//!
//! # Example
//!
//! ```rust
//! use spark_folders::theme::{ColorGenerator, FolderStyle, SeededColors};
//!
//! let colors = SeededColors::new(7);
//! let style = FolderStyle::new(colors.next_color());
//! assert_eq!(style.padding, "2em");
//! assert_eq!(style.background_hex().len(), 7);
//! ```

use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Rgba;

/// Seed used by [`SeededColors::default`].
pub const DEFAULT_COLOR_SEED: u64 = 0x5EED_F01D;

// =============================================================================
// ColorGenerator
// =============================================================================

/// Source of per-folder background colors.
pub trait ColorGenerator {
    fn next_color(&self) -> Rgba;
}

/// Uniformly random opaque colors, reproducible per seed.
#[derive(Debug)]
pub struct SeededColors {
    rng: RefCell<StdRng>,
}

impl SeededColors {
    pub fn new(seed: u64) -> Self {
        Self { rng: RefCell::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Default for SeededColors {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_SEED)
    }
}

impl ColorGenerator for SeededColors {
    fn next_color(&self) -> Rgba {
        let packed: u32 = self.rng.borrow_mut().gen_range(0..=0xFF_FFFF);
        Rgba::from_packed(packed)
    }
}

/// Always the same color.
#[derive(Clone, Copy, Debug)]
pub struct FixedColor(pub Rgba);

impl ColorGenerator for FixedColor {
    fn next_color(&self) -> Rgba {
        self.0
    }
}

// =============================================================================
// FolderStyle
// =============================================================================

/// Box style attached to every folder element.
#[derive(Clone, Debug, PartialEq)]
pub struct FolderStyle {
    pub background: Rgba,
    pub padding: &'static str,
    pub width: &'static str,
    pub border: &'static str,
}

impl FolderStyle {
    pub fn new(background: Rgba) -> Self {
        Self {
            background,
            padding: "2em",
            width: "auto",
            border: "2px solid black",
        }
    }

    /// `#rrggbb`, zero padded.
    pub fn background_hex(&self) -> String {
        self.background.to_hex()
    }

    /// Foreground that stays readable on the background.
    pub fn foreground(&self) -> Rgba {
        if self.background.luminance() > 140 {
            Rgba::BLACK
        } else {
            Rgba::WHITE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_colors_reproducible() {
        let a = SeededColors::new(3);
        let b = SeededColors::new(3);
        let first: Vec<Rgba> = (0..8).map(|_| a.next_color()).collect();
        let second: Vec<Rgba> = (0..8).map(|_| b.next_color()).collect();
        assert_eq!(first, second, "same seed, same colors");
        assert!(first.iter().all(|c| c.a == 255), "colors are opaque");
    }

    #[test]
    fn test_fixed_color() {
        let fixed = FixedColor(Rgba::rgb(1, 2, 3));
        assert_eq!(fixed.next_color(), Rgba::rgb(1, 2, 3));
        assert_eq!(fixed.next_color(), Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn test_folder_style_defaults() {
        let style = FolderStyle::new(Rgba::rgb(0, 0x0a, 0xff));
        assert_eq!(style.background_hex(), "#000aff", "hex is zero padded");
        assert_eq!(style.padding, "2em");
        assert_eq!(style.width, "auto");
        assert_eq!(style.border, "2px solid black");
    }

    #[test]
    fn test_foreground_contrast() {
        assert_eq!(FolderStyle::new(Rgba::WHITE).foreground(), Rgba::BLACK);
        assert_eq!(FolderStyle::new(Rgba::BLACK).foreground(), Rgba::WHITE);
    }
}
