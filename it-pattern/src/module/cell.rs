//! Decoded pattern cells

use std::fmt;

use crate::{NOTE_CUT, NOTE_FADE, NOTE_MAX, NOTE_OFF};

const NOTE_NAMES: [&str; 12] = [
    "C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-",
];

/// Note column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Note {
    /// Nothing happened on this channel
    #[default]
    Empty,
    /// Pitched note, 0-119 = C-0 to B-9
    Pitch(u8),
    /// Silence immediately (===)
    Cut,
    /// Release the envelope (^^^)
    Off,
    /// Fade out the voice
    Fade,
}

impl Note {
    /// Decode a raw note byte
    ///
    /// Bytes between B-9 and the sentinels have no meaning and decode to
    /// [`Note::Empty`].
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0..=NOTE_MAX => Self::Pitch(raw),
            NOTE_FADE => Self::Fade,
            NOTE_CUT => Self::Cut,
            NOTE_OFF => Self::Off,
            _ => Self::Empty,
        }
    }

    /// Raw note byte, `None` for [`Note::Empty`]
    pub const fn to_raw(self) -> Option<u8> {
        match self {
            Self::Empty => None,
            Self::Pitch(n) => Some(n),
            Self::Cut => Some(NOTE_CUT),
            Self::Off => Some(NOTE_OFF),
            Self::Fade => Some(NOTE_FADE),
        }
    }

    /// Check if this note triggers a pitch
    #[inline]
    pub const fn is_pitch(self) -> bool {
        matches!(self, Self::Pitch(_))
    }

    /// Returns (octave 0-9, semitone 0-11) for a pitched note
    pub const fn octave_semitone(self) -> Option<(u8, u8)> {
        match self {
            Self::Pitch(n) => Some((n / 12, n % 12)),
            _ => None,
        }
    }
}

impl fmt::Display for Note {
    /// Tracker notation: `C-4`, `C#4`, `===`, `^^^`, `~~~`, `...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pitch(n) => write!(f, "{}{}", NOTE_NAMES[(n % 12) as usize], n / 12),
            Self::Cut => f.write_str("==="),
            Self::Off => f.write_str("^^^"),
            Self::Fade => f.write_str("~~~"),
            Self::Empty => f.write_str("..."),
        }
    }
}

/// Convert a note name to a note number
///
/// Accepts `"C-4"` (48), `"C#4"`, `"Db4"` and `"C4"`. Returns `None` for
/// anything else.
pub fn note_from_name(name: &str) -> Option<u8> {
    let name = name.trim().replace('-', "");
    let mut chars = name.chars();

    let semitone: i32 = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (1, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (-1, octave)
    } else {
        (0, rest)
    };

    let octave: i32 = octave.parse().ok()?;
    if !(0..=9).contains(&octave) {
        return None;
    }

    u8::try_from(octave * 12 + semitone + accidental)
        .ok()
        .filter(|&n| n <= NOTE_MAX)
}

/// Volume column command other than "set volume"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeCommand {
    FineVolumeUp,
    FineVolumeDown,
    VolumeSlideUp,
    VolumeSlideDown,
    PitchSlideDown,
    PitchSlideUp,
    SetPanning,
    TonePortamento,
    Vibrato,
}

impl VolumeCommand {
    /// First raw byte and the number of values in each command's range
    const fn range(self) -> (u8, u8) {
        match self {
            Self::FineVolumeUp => (65, 10),
            Self::FineVolumeDown => (75, 10),
            Self::VolumeSlideUp => (85, 10),
            Self::VolumeSlideDown => (95, 10),
            Self::PitchSlideDown => (105, 10),
            Self::PitchSlideUp => (115, 10),
            Self::SetPanning => (128, 65),
            Self::TonePortamento => (193, 10),
            Self::Vibrato => (203, 10),
        }
    }
}

/// Volume column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Volume {
    /// No volume given; the instrument/sample default applies
    #[default]
    Default,
    /// Set volume (0-64)
    Set(u8),
    /// Another volume column command with its parameter
    Command(VolumeCommand, u8),
}

impl Volume {
    /// Decode a raw volume column byte
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0..=64 => Self::Set(raw),
            65..=74 => Self::Command(VolumeCommand::FineVolumeUp, raw - 65),
            75..=84 => Self::Command(VolumeCommand::FineVolumeDown, raw - 75),
            85..=94 => Self::Command(VolumeCommand::VolumeSlideUp, raw - 85),
            95..=104 => Self::Command(VolumeCommand::VolumeSlideDown, raw - 95),
            105..=114 => Self::Command(VolumeCommand::PitchSlideDown, raw - 105),
            115..=124 => Self::Command(VolumeCommand::PitchSlideUp, raw - 115),
            128..=192 => Self::Command(VolumeCommand::SetPanning, raw - 128),
            193..=202 => Self::Command(VolumeCommand::TonePortamento, raw - 193),
            203..=212 => Self::Command(VolumeCommand::Vibrato, raw - 203),
            _ => Self::Default,
        }
    }

    /// Pull an out-of-range value back to the top of its range
    pub const fn clamped(self) -> Self {
        match self {
            Self::Set(v) if v > 64 => Self::Set(64),
            Self::Command(command, value) => {
                let (_, len) = command.range();
                if value >= len {
                    Self::Command(command, len - 1)
                } else {
                    self
                }
            }
            other => other,
        }
    }

    /// Raw volume column byte, `None` when nothing should be written
    pub const fn to_raw(self) -> Option<u8> {
        match self {
            Self::Default => None,
            Self::Set(v) if v <= 64 => Some(v),
            Self::Set(_) => None,
            Self::Command(command, value) => {
                let (base, len) = command.range();
                if value < len {
                    Some(base + value)
                } else {
                    None
                }
            }
        }
    }
}

/// Effect column (command A-Z = 1-26, parameter)
///
/// The command is not interpreted by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Effect {
    pub command: u8,
    pub param: u8,
}

impl Effect {
    pub const fn new(command: u8, param: u8) -> Self {
        Self { command, param }
    }

    /// Command letter (`A` for 1), if the command is in range
    pub fn letter(&self) -> Option<char> {
        (1..=26)
            .contains(&self.command)
            .then(|| char::from(b'@' + self.command))
    }
}

/// One channel's event in one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cell {
    /// Note column
    pub note: Note,
    /// Instrument number (1-99, 0 = none)
    pub instrument: u8,
    /// Volume column
    pub volume: Volume,
    /// Effect column
    pub effect: Option<Effect>,
}

impl Cell {
    /// An empty cell
    pub const EMPTY: Self = Self {
        note: Note::Empty,
        instrument: 0,
        volume: Volume::Default,
        effect: None,
    };

    /// Create a cell with a note, instrument and volume
    pub const fn play(note: Note, instrument: u8, volume: u8) -> Self {
        Self {
            note,
            instrument,
            volume: Volume::Set(if volume > 64 { 64 } else { volume }),
            effect: None,
        }
    }

    /// Attach an effect
    pub const fn with_effect(mut self, command: u8, param: u8) -> Self {
        self.effect = Some(Effect::new(command, param));
        self
    }

    /// Bring every field into a range the file format can store
    ///
    /// Pitches above B-9 become B-9 and volumes are clamped per command.
    pub const fn clamped(mut self) -> Self {
        if let Note::Pitch(n) = self.note
            && n > NOTE_MAX
        {
            self.note = Note::Pitch(NOTE_MAX);
        }
        self.volume = self.volume.clamped();
        self
    }

    /// Check if nothing is set
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Check if this sets an instrument
    #[inline]
    pub const fn has_instrument(&self) -> bool {
        self.instrument > 0
    }
}

impl fmt::Display for Cell {
    /// Tracker row notation: `C-4 01 v64 A06`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.note)?;

        if self.has_instrument() {
            write!(f, " {:02}", self.instrument)?;
        } else {
            f.write_str(" ..")?;
        }

        match self.volume {
            Volume::Set(v) => write!(f, " v{v:02}")?,
            Volume::Command(..) => f.write_str(" vcm")?,
            Volume::Default => f.write_str(" ...")?,
        }

        match self.effect.as_ref().and_then(|e| Some((e.letter()?, e.param))) {
            Some((letter, param)) => write!(f, " {letter}{param:02X}"),
            None => f.write_str(" ..."),
        }
    }
}
