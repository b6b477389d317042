//! Pattern rows to Sprig tune text
//!
//! Each row becomes one line, `<ms>: <token> + <token>,`, where a token is
//! `<note><glyph><ms>`. Rows without tokens are written as `<ms>,`.

use std::fmt::Write as _;
use std::ops::ControlFlow;

use anyhow::{Result, anyhow};
use it_pattern::{Cell, Note, Pattern};

use crate::config::{GlyphAssign, TuneConfig};

/// Renders pattern rows with a fixed row duration
pub struct TuneRenderer<'a> {
    row_ms: u32,
    max_channels: u8,
    separator: &'a str,
    assign: GlyphAssign,
    symbols: &'a [String],
    no_instrument: Option<&'a str>,
}

impl<'a> TuneRenderer<'a> {
    pub fn new(config: &'a TuneConfig, row_ms: u32) -> Self {
        Self {
            row_ms,
            max_channels: config.max_channels,
            separator: &config.separator,
            assign: config.glyphs.assign,
            symbols: &config.glyphs.symbols,
            no_instrument: config.glyphs.no_instrument.as_deref(),
        }
    }

    /// Render every row of `pattern`, one line each, into `out`
    pub fn render_pattern(&self, pattern: &Pattern, out: &mut String) -> Result<()> {
        for row in 0..pattern.num_rows() {
            let line = self.render_row(pattern, row)?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(())
    }

    /// Render one row as a single line without the trailing newline
    pub fn render_row(&self, pattern: &Pattern, row: u16) -> Result<String> {
        let mut tokens = Vec::new();
        let mut failure = None;

        pattern.for_each_channel(row, |channel, cell| {
            if channel >= self.max_channels {
                return ControlFlow::Break(());
            }
            if cell.note != Note::Empty || cell.instrument != 0 {
                match self.token(channel, cell) {
                    Ok(token) => tokens.push(token),
                    Err(err) => {
                        failure = Some(err);
                        return ControlFlow::Break(());
                    }
                }
            }
            if channel + 1 >= self.max_channels {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;

        if let Some(err) = failure {
            return Err(err.context(format!("Row {row}")));
        }

        let mut line = self.row_ms.to_string();
        if !tokens.is_empty() {
            line.push_str(": ");
            line.push_str(&tokens.join(self.separator));
        }
        line.push(',');
        Ok(line)
    }

    fn token(&self, channel: u8, cell: &Cell) -> Result<String> {
        let mut token = note_text(cell.note);
        token.push_str(self.glyph(channel, cell)?);
        write!(token, "{}", self.row_ms)?;
        Ok(token)
    }

    fn glyph(&self, channel: u8, cell: &Cell) -> Result<&str> {
        match self.assign {
            GlyphAssign::Instrument => {
                if cell.instrument == 0 {
                    return self.no_instrument.ok_or_else(|| {
                        anyhow!(
                            "No glyph for instrument 0 on channel {channel} (set glyphs.no_instrument)"
                        )
                    });
                }
                self.symbols
                    .get(usize::from(cell.instrument) - 1)
                    .map(String::as_str)
                    .ok_or_else(|| {
                        anyhow!(
                            "No glyph for instrument {} ({} configured)",
                            cell.instrument,
                            self.symbols.len()
                        )
                    })
            }
            GlyphAssign::Channel => self
                .symbols
                .get(usize::from(channel))
                .map(String::as_str)
                .ok_or_else(|| {
                    anyhow!(
                        "No glyph for channel {channel} ({} configured)",
                        self.symbols.len()
                    )
                }),
        }
    }
}

/// Tracker note name without the `-` filler, empty for [`Note::Empty`]
fn note_text(note: Note) -> String {
    match note {
        Note::Empty => String::new(),
        note => note.to_string().replace('-', ""),
    }
}
