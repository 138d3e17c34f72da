use std::io::{BufReader, BufWriter, Read, Write};

use crate::{error::Error, types::TranslationTable};

/// A file format that holds the translations of exactly one language per file.
pub trait TranslationFormat {
    /// Decode the bytes of a whole file.
    fn decode(&self, bytes: &[u8]) -> Result<TranslationTable, Error>;

    /// Encode the translations to the bytes of a whole file.
    fn encode(&self, table: &TranslationTable) -> Result<Vec<u8>, Error>;

    /// Parse from any reader.
    fn from_reader<R: Read>(&self, mut reader: R) -> Result<TranslationTable, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode(&bytes)
    }

    /// Parse from file path.
    fn read_from<P: AsRef<std::path::Path>>(&self, path: P) -> Result<TranslationTable, Error> {
        let file = std::fs::File::open(path).map_err(Error::Io)?;
        self.from_reader(BufReader::new(file))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, table: &TranslationTable, mut writer: W) -> Result<(), Error> {
        writer.write_all(&self.encode(table)?)?;
        writer.flush()?;
        Ok(())
    }

    /// Write to file path.
    fn write_to<P: AsRef<std::path::Path>>(
        &self,
        table: &TranslationTable,
        path: P,
    ) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        self.to_writer(table, BufWriter::new(file))
    }
}
