//! End-to-end runs of the it-tune binary

use std::path::Path;
use std::process::Command;

use it_pattern::{Cell, Instrument, Note, ORDER_END, ORDER_SKIP, SongBuilder};

fn it_tune() -> Command {
    Command::new(env!("CARGO_BIN_EXE_it-tune"))
}

/// Two-row pattern 0 at 150 BPM plus a one-row pattern 1
fn write_module(path: &Path) {
    let mut builder = SongBuilder::new("CLI Test");
    builder.set_channels(2).set_tempo(150);
    builder.add_instrument(Instrument::new("Sine"));
    builder.add_instrument(Instrument::new("Triangle"));

    let first = builder.add_pattern(2);
    builder
        .set_cell(first, 0, 0, Cell::play(Note::Pitch(48), 1, 64))
        .unwrap();
    builder
        .set_cell(first, 1, 0, Cell { instrument: 1, ..Cell::EMPTY })
        .unwrap();
    builder
        .set_cell(first, 1, 1, Cell::play(Note::Pitch(50), 2, 32))
        .unwrap();

    let second = builder.add_pattern(1);
    builder
        .set_cell(second, 0, 1, Cell::play(Note::Pitch(55), 2, 64))
        .unwrap();

    builder.set_orders(&[second, ORDER_SKIP, first, ORDER_END]);
    std::fs::write(path, builder.write().unwrap()).unwrap();
}

#[test]
fn test_render_default_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let module = dir.path().join("song.it");
    let output = dir.path().join("output.txt");
    write_module(&module);

    let status = it_tune()
        .arg("render")
        .arg(&module)
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    // 60000 / 150 / 4 = 100 ms per row
    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text, "100: C4~100,\n100: ~100 + D4^100,\n");
}

#[test]
fn test_render_song_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let module = dir.path().join("song.it");
    let config = dir.path().join("tune.toml");
    let output = dir.path().join("song.txt");
    write_module(&module);
    std::fs::write(
        &config,
        format!(
            "output = {:?}\n\n[timing]\nformula = \"fixed\"\nms = 50\n",
            output.display().to_string()
        ),
    )
    .unwrap();

    let status = it_tune()
        .arg("render")
        .arg(&module)
        .arg("--song")
        .arg("--config")
        .arg(&config)
        .status()
        .unwrap();
    assert!(status.success());

    let text = std::fs::read_to_string(&output).unwrap();
    assert_eq!(text, "50: G4^50,\n50: C4~50,\n50: ~50 + D4^50,\n");
}

#[test]
fn test_render_rejects_bad_module() {
    let dir = tempfile::tempdir().unwrap();
    let module = dir.path().join("broken.it");
    std::fs::write(&module, b"not a module").unwrap();

    let result = it_tune()
        .arg("render")
        .arg(&module)
        .arg("-o")
        .arg(dir.path().join("out.txt"))
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("broken.it"));
}

#[test]
fn test_info_lists_patterns() {
    let dir = tempfile::tempdir().unwrap();
    let module = dir.path().join("song.it");
    write_module(&module);

    let result = it_tune()
        .arg("info")
        .arg(&module)
        .arg("--pattern")
        .arg("0")
        .output()
        .unwrap();
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Name:     CLI Test"));
    assert!(stdout.contains("Tempo:    150 BPM"));
    assert!(stdout.contains("Patterns: 2"));
    assert!(stdout.contains("C-4 01 v64"));
}

#[test]
fn test_info_uses_load_section_of_config() {
    let dir = tempfile::tempdir().unwrap();
    let module = dir.path().join("old.it");
    write_module(&module);

    // Mark the module as compatible with 1.00 only
    let mut data = std::fs::read(&module).unwrap();
    data[0x2A..0x2C].copy_from_slice(&0x0100u16.to_le_bytes());
    std::fs::write(&module, data).unwrap();

    let rejected = it_tune().arg("info").arg(&module).output().unwrap();
    assert!(!rejected.status.success());

    let config = dir.path().join("tune.toml");
    std::fs::write(&config, "[load]\nmin_compatible_version = 0x0100\n").unwrap();

    let accepted = it_tune()
        .arg("info")
        .arg(&module)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(accepted.status.success());
    assert!(String::from_utf8_lossy(&accepted.stdout).contains("compatible 0x0100"));
}
