//! Decoded pattern grid

use crate::error::IndexError;

use super::Cell;

/// A pattern: `num_rows` rows of `num_channels` cells, stored row-major
///
/// The grid always holds exactly `num_rows * num_channels` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    num_rows: u16,
    num_channels: u8,
    cells: Vec<Cell>,
}

impl Pattern {
    /// Create an empty pattern with the given dimensions
    pub fn empty(num_rows: u16, num_channels: u8) -> Self {
        Self {
            num_rows,
            num_channels,
            cells: vec![Cell::EMPTY; num_rows as usize * num_channels as usize],
        }
    }

    /// Number of rows
    pub fn num_rows(&self) -> u16 {
        self.num_rows
    }

    /// Number of channels in every row
    pub fn num_channels(&self) -> u8 {
        self.num_channels
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a specific row and channel
    pub fn cell(&self, row: u16, channel: u8) -> Result<&Cell, IndexError> {
        self.check_row(row)?;
        if channel >= self.num_channels {
            return Err(IndexError::Channel {
                channel,
                channels: self.num_channels,
            });
        }
        Ok(&self.cells[self.index(row, channel)])
    }

    pub(crate) fn cell_mut(&mut self, row: u16, channel: u8) -> &mut Cell {
        let index = self.index(row, channel);
        &mut self.cells[index]
    }

    /// Cells of one row, in channel order
    pub(crate) fn row_slice(&self, row: u16) -> Result<&[Cell], IndexError> {
        self.check_row(row)?;
        let start = self.index(row, 0);
        Ok(&self.cells[start..start + self.num_channels as usize])
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = (u16, u8, &mut Cell)> {
        let channels = self.num_channels.max(1) as usize;
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(i, cell)| ((i / channels) as u16, (i % channels) as u8, cell))
    }

    fn check_row(&self, row: u16) -> Result<(), IndexError> {
        if row < self.num_rows {
            Ok(())
        } else {
            Err(IndexError::Row {
                row,
                rows: self.num_rows,
            })
        }
    }

    #[inline]
    fn index(&self, row: u16, channel: u8) -> usize {
        row as usize * self.num_channels as usize + channel as usize
    }
}
