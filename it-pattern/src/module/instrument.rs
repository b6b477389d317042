//! Instrument table entries

/// Which header an [`Instrument`] was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstrumentKind {
    /// `IMPI` instrument header (module uses instruments)
    #[default]
    Instrument,
    /// `IMPS` sample header (sample mode: the instrument column names samples)
    Sample,
}

/// An entry of the song's instrument table
///
/// Only identification is kept; envelopes and sample data are not decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Instrument {
    /// Name (max 26 chars)
    pub name: String,
    /// DOS filename (max 12 chars)
    pub filename: String,
    /// Header kind
    pub kind: InstrumentKind,
}

impl Instrument {
    /// Create a named instrument
    pub fn new(name: &str) -> Self {
        Self {
            name: name.chars().take(26).collect(),
            ..Default::default()
        }
    }

    /// Create a named sample entry
    pub fn sample(name: &str) -> Self {
        Self {
            kind: InstrumentKind::Sample,
            ..Self::new(name)
        }
    }
}
