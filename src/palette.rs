//! # Species palette
//!
//! Gives every distinct species a color from the ten-entry [`CATEGORICAL_PALETTE`].
//!
//! Assignment
//! -----------------
//! * Species are sorted (byte-wise string order) and de-duplicated.
//! * The i-th species receives entry `i mod 10`, so an eleventh species shares the first color.
//! * The mapping depends only on the **set** of species: same input, same colors, across runs.
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::CATEGORICAL_PALETTE;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Species label to color mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesPalette {
    colors: BTreeMap<String, Rgb>,
}

impl SpeciesPalette {
    /// Build the palette from any collection of species labels (duplicates allowed).
    ///
    /// Arguments
    /// -----------------
    /// * `species` - Species labels, in any order.
    ///
    /// Return
    /// ----------
    /// * A palette holding one entry per distinct label.
    pub fn assign<I, S>(species: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut colors: BTreeMap<String, Rgb> = species
            .into_iter()
            .map(|s| (s.as_ref().to_string(), Rgb(0, 0, 0)))
            .collect();
        for (i, color) in colors.values_mut().enumerate() {
            *color = CATEGORICAL_PALETTE[i % CATEGORICAL_PALETTE.len()].into();
        }
        SpeciesPalette { colors }
    }

    pub fn color(&self, species: &str) -> Option<Rgb> {
        self.colors.get(species).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entries in sorted species order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.colors.iter().map(|(s, c)| (s.as_str(), *c))
    }
}

#[cfg(test)]
mod palette_test {
    use super::*;

    #[test]
    fn test_sorted_assignment() {
        let palette = SpeciesPalette::assign(["Grus grus", "Anser anser", "Grus grus"]);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color("Anser anser"), Some(Rgb(0x1f, 0x77, 0xb4)));
        assert_eq!(palette.color("Grus grus"), Some(Rgb(0xff, 0x7f, 0x0e)));
        assert_eq!(palette.color("Ciconia ciconia"), None);
    }

    #[test]
    fn test_order_independent() {
        let a = SpeciesPalette::assign(["c", "a", "b"]);
        let b = SpeciesPalette::assign(vec!["b".to_string(), "c".into(), "a".into()]);
        assert_eq!(a, b);
        assert_eq!(
            a.iter().map(|(s, _)| s).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
    }

    #[test]
    fn test_cycles_after_ten() {
        let names: Vec<String> = (0..12).map(|i| format!("species-{i:02}")).collect();
        let palette = SpeciesPalette::assign(&names);
        assert_eq!(palette.color("species-10"), palette.color("species-00"));
        assert_eq!(palette.color("species-11"), palette.color("species-01"));
        assert_ne!(palette.color("species-09"), palette.color("species-00"));
    }

    #[test]
    fn test_byte_order_and_display() {
        // Uppercase sorts before lowercase.
        let palette = SpeciesPalette::assign(["anser", "Branta"]);
        assert_eq!(palette.color("Branta"), Some(CATEGORICAL_PALETTE[0].into()));
        assert_eq!(Rgb(0x1f, 0x77, 0xb4).to_string(), "#1f77b4");
        assert!(SpeciesPalette::assign(Vec::<String>::new()).is_empty());
    }
}
