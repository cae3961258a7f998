//! Per-match transcript files.
//!
//! A transcript is opened before the first ply, receives one record per ply and
//! is renamed on completion so its file name carries the outcome marker.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::engine::error::Result;
use crate::engine::models::MatchWinner;

pub struct Transcript {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Transcript {
    /// Create `<dir>/<stem>.txt`, creating `dir` if needed.
    pub fn create(dir: &Path, stem: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.txt", stem));
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        Ok(())
    }

    /// Append one ply: who moved, with which colour, where, and the board after it.
    pub fn record_ply(
        &mut self,
        ply: usize,
        mover: &str,
        color: char,
        row_col: (usize, usize),
        board: &str,
    ) -> Result<()> {
        writeln!(
            self.writer,
            "ply {} | {} ({}) -> ({}, {})",
            ply, mover, color, row_col.0, row_col.1
        )?;
        write!(self.writer, "{}", board)?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flush, close and rename to `<stem>_<marker>.txt`. Returns the final path.
    pub fn finish(mut self, winner: MatchWinner, plies: usize) -> Result<PathBuf> {
        writeln!(self.writer, "result: {} after {} plies", winner.marker(), plies)?;
        self.writer.flush()?;
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let final_path = self
            .path
            .with_file_name(format!("{}_{}.txt", stem, winner.marker()));
        std::fs::rename(&self.path, &final_path)?;
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_renames_with_marker() {
        let dir = tempfile::tempdir().unwrap();
        let mut transcript = Transcript::create(dir.path(), "match_0003").unwrap();
        transcript.header("A=first B=second").unwrap();
        transcript.record_ply(1, "A", 'w', (0, 0), " w  - \n -  - \n").unwrap();
        let original = transcript.path().to_path_buf();

        let final_path = transcript.finish(MatchWinner::Draw, 1).unwrap();
        assert_eq!(final_path, dir.path().join("match_0003_draw.txt"));
        assert!(!original.exists());

        let text = std::fs::read_to_string(&final_path).unwrap();
        assert!(text.contains("ply 1 | A (w) -> (0, 0)"));
        assert!(text.ends_with("result: draw after 1 plies\n"));
    }
}
