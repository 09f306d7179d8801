use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing a plain-text file format.
///
/// Implementors handle format-specific parsing and serialization of a single value;
/// path-based helpers are provided on top of the reader/writer methods.
pub trait TextFile {
    /// The value stored in one file.
    type Value;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a value from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Value, Self::Error>;

    /// Writes a value to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(value: &Self::Value, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a value from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Value, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a value to a file path, creating or truncating the file.
    fn write_to_path<P: AsRef<Path>>(value: &Self::Value, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(value, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
