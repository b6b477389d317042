//! Tests for IT file writer

use super::*;
use crate::error::PatternError;
use crate::module::{Note, Volume};
use crate::{parse, LoadOptions, IT_MAGIC, ORDER_END};

#[test]
fn test_write_empty_module() {
    let mut writer = SongBuilder::new("Test Song");
    writer.set_channels(4).set_speed(6).set_tempo(125);

    let pat = writer.add_pattern(64);
    writer.set_orders(&[pat]);

    let data = writer.write().unwrap();
    assert_eq!(&data[0..4], IT_MAGIC);

    let song = parse(&data, &LoadOptions::default()).expect("written IT should parse");
    assert_eq!(song.name(), "Test Song");
    assert_eq!(song.initial_speed(), 6);
    assert_eq!(song.initial_tempo(), 125);
}

#[test]
fn test_write_with_instrument() {
    let mut writer = SongBuilder::new("Instr Test");
    let kick = writer.add_instrument(Instrument {
        filename: "KICK.ITI".to_string(),
        ..Instrument::new("Kick")
    });
    assert_eq!(kick, 1);

    let pat = writer.add_pattern(64);
    writer.set_orders(&[pat]);

    let song = parse(&writer.write().unwrap(), &LoadOptions::default()).unwrap();
    assert_eq!(song.instruments().len(), 1);
    assert_eq!(song.instruments()[0].name, "Kick");
    assert_eq!(song.instruments()[0].filename, "KICK.ITI");
}

#[test]
fn test_build_rejects_dangling_instrument() {
    let mut writer = SongBuilder::new("Dangling");
    writer.add_instrument(Instrument::new("Only"));
    let pat = writer.add_pattern(4);
    writer
        .set_cell(pat, 2, 1, Cell::play(Note::Pitch(48), 2, 64))
        .unwrap();

    assert_eq!(
        writer.build(),
        Err(FormatError::Pattern {
            index: 0,
            source: PatternError::DanglingInstrument {
                row: 2,
                channel: 1,
                instrument: 2
            }
        })
    );
}

#[test]
fn test_set_cell_bounds() {
    let mut writer = SongBuilder::new("Bounds");
    let pat = writer.add_pattern(4);

    assert_eq!(
        writer.set_cell(pat, 4, 0, Cell::EMPTY).err(),
        Some(IndexError::Row { row: 4, rows: 4 })
    );
    assert_eq!(
        writer.set_cell(pat, 0, 4, Cell::EMPTY).err(),
        Some(IndexError::Channel {
            channel: 4,
            channels: 4
        })
    );
    assert_eq!(
        writer.set_cell(3, 0, 0, Cell::EMPTY).err(),
        Some(IndexError::Pattern { index: 3, count: 1 })
    );
}

#[test]
fn test_set_channels_resizes_patterns() {
    let mut writer = SongBuilder::new("Resize");
    let pat = writer.add_pattern(2);
    writer
        .set_cell(pat, 1, 0, Cell::play(Note::Off, 0, 0))
        .unwrap();
    writer.set_channels(2);

    let song = writer.build().unwrap();
    let pattern = &song.patterns()[0];
    assert_eq!(pattern.num_channels(), 2);
    assert_eq!(pattern.cells().len(), 4);
    assert_eq!(pattern.cell(1, 0).unwrap().note, Note::Off);
}

#[test]
fn test_names_fit_fixed_fields() {
    let writer = SongBuilder::new("A name that is far too long for the header   ");
    let song = writer.build().unwrap();
    assert_eq!(song.name(), "A name that is far too lon");

    let trimmed = SongBuilder::new("Spaces   ").build().unwrap();
    assert_eq!(trimmed.name(), "Spaces");
}

#[test]
fn test_sentinels_survive_writing() {
    let mut writer = SongBuilder::new("Sentinels");
    let pat = writer.add_pattern(3);
    for (row, note) in [Note::Cut, Note::Off, Note::Fade].into_iter().enumerate() {
        writer
            .set_cell(pat, row as u16, 0, Cell { note, ..Cell::EMPTY })
            .unwrap();
    }
    writer.set_orders(&[pat, ORDER_END]);

    let song = parse(&writer.write().unwrap(), &LoadOptions::default()).unwrap();
    let notes: Vec<Note> = song.patterns()[0]
        .rows()
        .map(|row| row.get(0).unwrap().note)
        .collect();
    assert_eq!(notes, vec![Note::Cut, Note::Off, Note::Fade]);
}

#[test]
fn test_out_of_range_cell_survives_writing() {
    let mut writer = SongBuilder::new("Clamp");
    writer.add_instrument(Instrument::new("Loud"));
    let pat = writer.add_pattern(1);
    writer
        .set_cell(
            pat,
            0,
            0,
            Cell {
                note: Note::Pitch(48),
                instrument: 1,
                volume: Volume::Set(200),
                effect: None,
            },
        )
        .unwrap();
    writer.set_orders(&[pat, ORDER_END]);

    let song = writer.build().unwrap();
    assert_eq!(song.patterns()[0].cell(0, 0).unwrap().volume, Volume::Set(64));

    let reloaded = parse(&writer.write().unwrap(), &LoadOptions::default()).unwrap();
    assert_eq!(reloaded, song);
}
