//! Row iteration

use std::iter::Enumerate;
use std::ops::ControlFlow;
use std::slice;

use crate::error::IndexError;

use super::{Cell, Pattern};

/// Borrowed view of one pattern row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: u16,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Row index within its pattern
    pub fn index(&self) -> u16 {
        self.index
    }

    /// Number of channels in the row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell for a channel, if it exists
    pub fn get(&self, channel: u8) -> Option<&'a Cell> {
        self.cells.get(channel as usize)
    }

    /// Lazy `(channel, cell)` sequence in channel order
    pub fn cells(&self) -> RowCells<'a> {
        RowCells {
            inner: self.cells.iter().enumerate(),
        }
    }
}

impl<'a> IntoIterator for Row<'a> {
    type Item = (u8, &'a Cell);
    type IntoIter = RowCells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

/// Iterator over the cells of a [`Row`]
#[derive(Debug, Clone)]
pub struct RowCells<'a> {
    inner: Enumerate<slice::Iter<'a, Cell>>,
}

impl<'a> Iterator for RowCells<'a> {
    type Item = (u8, &'a Cell);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(channel, cell)| (channel as u8, cell))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for RowCells<'_> {}

impl Pattern {
    /// Borrow one row
    pub fn row(&self, row: u16) -> Result<Row<'_>, IndexError> {
        Ok(Row {
            index: row,
            cells: self.row_slice(row)?,
        })
    }

    /// All rows in order
    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        let channels = self.num_channels() as usize;
        (0..self.num_rows()).map(move |index| {
            let start = index as usize * channels;
            Row {
                index,
                cells: &self.cells()[start..start + channels],
            }
        })
    }

    /// Visit the cells of `row` in channel order until `visit` breaks
    ///
    /// Returns the number of channels visited, including the one that broke.
    /// Stopping is decided per call; the pattern is never modified.
    pub fn for_each_channel<F>(&self, row: u16, mut visit: F) -> Result<usize, IndexError>
    where
        F: FnMut(u8, &Cell) -> ControlFlow<()>,
    {
        let mut visited = 0;
        for (channel, cell) in self.row(row)?.cells() {
            visited += 1;
            if visit(channel, cell).is_break() {
                break;
            }
        }
        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Note;

    fn numbered_pattern() -> Pattern {
        let mut pattern = Pattern::empty(2, 4);
        for channel in 0..4 {
            pattern.cell_mut(1, channel).note = Note::Pitch(48 + channel);
        }
        pattern
    }

    #[test]
    fn test_visits_in_channel_order() {
        let pattern = numbered_pattern();
        let mut seen = Vec::new();
        let visited = pattern
            .for_each_channel(1, |channel, cell| {
                seen.push((channel, cell.note));
                ControlFlow::Continue(())
            })
            .unwrap();

        assert_eq!(visited, 4);
        assert_eq!(
            seen,
            vec![
                (0, Note::Pitch(48)),
                (1, Note::Pitch(49)),
                (2, Note::Pitch(50)),
                (3, Note::Pitch(51)),
            ]
        );
    }

    #[test]
    fn test_break_after_first_channel() {
        let pattern = numbered_pattern();
        let mut seen = Vec::new();
        let visited = pattern
            .for_each_channel(0, |channel, _| {
                seen.push(channel);
                ControlFlow::Break(())
            })
            .unwrap();

        assert_eq!(visited, 1);
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn test_break_is_per_call() {
        let pattern = numbered_pattern();
        pattern
            .for_each_channel(1, |_, _| ControlFlow::Break(()))
            .unwrap();
        let visited = pattern
            .for_each_channel(1, |_, _| ControlFlow::Continue(()))
            .unwrap();
        assert_eq!(visited, 4);
    }

    #[test]
    fn test_row_out_of_range() {
        let pattern = numbered_pattern();
        let result = pattern.for_each_channel(2, |_, _| ControlFlow::Continue(()));
        assert_eq!(result, Err(IndexError::Row { row: 2, rows: 2 }));
    }

    #[test]
    fn test_rows_iterator() {
        let pattern = numbered_pattern();
        let rows: Vec<Row<'_>> = pattern.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 4));
        assert_eq!(rows[1].get(2).map(|c| c.note), Some(Note::Pitch(50)));
        assert_eq!(rows[1].into_iter().count(), 4);
    }
}
