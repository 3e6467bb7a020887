//! File-backed source tests
//!
//! Exercises FileSource and windowing over real files on disk.

use std::io::{Read, Write};
use std::sync::Arc;

use wadbreaker_vfs::{DataSource, FileSource, WindowedSource};

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn file_source_reports_size_and_contents() {
    let file = write_temp(b"hello wad");
    let source = FileSource::new(file.path()).unwrap();

    assert_eq!(source.size(), 9);
    assert_eq!(source.read_all().unwrap(), b"hello wad");
    assert_eq!(source.location(), file.path().display().to_string());
}

#[test]
fn file_source_handles_are_independent() {
    let file = write_temp(b"0123456789");
    let source = FileSource::new(file.path()).unwrap();

    let mut a = source.open_forward().unwrap();
    let mut b = source.open_forward().unwrap();

    let mut buf = [0u8; 5];
    a.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"01234");

    // Second handle is unaffected by the first's position
    b.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"01234");
}

#[test]
fn window_over_file_stays_in_bounds() {
    let file = write_temp(b"AAAABBBBCCCC");
    let source: Arc<dyn DataSource> = Arc::new(FileSource::new(file.path()).unwrap());
    let window = WindowedSource::new(source, 4, 4).unwrap();

    assert_eq!(window.read_all().unwrap(), b"BBBB");
}

#[test]
fn missing_file_is_an_error() {
    assert!(FileSource::new("/definitely/not/here.wad").is_err());
}
