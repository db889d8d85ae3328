use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

/// A gzip-compressed save state, decompressed in memory.
#[derive(Debug, Clone)]
pub struct GameState {
    buffer: Vec<u8>,
}

impl GameState {
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let mut gz = GzDecoder::new(BufReader::new(file));

        let mut buffer = Vec::new();
        gz.read_to_end(&mut buffer)?;

        Ok(GameState { buffer })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn decompresses_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Level1.state");
        let mut gz = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        gz.write_all(b"saved state").unwrap();
        gz.finish().unwrap();

        let state = GameState::load(&path).unwrap();
        assert_eq!(state.bytes(), b"saved state");
    }

    #[test]
    fn plain_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.state");
        std::fs::write(&path, b"not gzip").unwrap();
        assert!(GameState::load(&path).is_err());
        assert!(GameState::load(dir.path().join("missing.state")).is_err());
    }
}
