//! Host line protocol: startup messages and per-turn board frames.
//!
//! The host sends, one message per line:
//!
//! 1. our player id,
//! 2. `width height`,
//! 3. the production of every cell, row-major,
//! 4. a frame, and then one frame per turn.
//!
//! A frame is a run-length encoded owner list (`count owner` pairs covering
//! every cell) followed by one strength per cell.

use std::io::BufRead;
use std::str::FromStr;

use crate::board::PlayerId;

/// Errors raised while reading host messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("failed to read from host: {0}")]
    Io(#[from] std::io::Error),

    #[error("input ended while waiting for {0}")]
    UnexpectedEof(&'static str),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("expected 'width height', got '{0}'")]
    BadDimensions(String),

    #[error("expected {expected} values, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("owner runs cover {covered} cells, board has {size}")]
    OwnerOverrun { covered: usize, size: usize },

    #[error("frame ended after {got} of {expected} strengths")]
    Truncated { expected: usize, got: usize },

    #[error("{0} trailing fields after frame")]
    TrailingFields(usize),
}

/// The first two startup lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    pub id: PlayerId,
    pub width: usize,
    pub height: usize,
}

impl Handshake {
    pub fn size(&self) -> usize {
        self.width * self.height
    }
}

/// One board snapshot from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub owner: Vec<PlayerId>,
    pub strength: Vec<i32>,
}

impl Frame {
    /// Encodes the frame in host format.
    pub fn encode(&self) -> String {
        let mut fields = Vec::new();
        let mut i = 0;
        while i < self.owner.len() {
            let run = self.owner[i..]
                .iter()
                .take_while(|&&o| o == self.owner[i])
                .count();
            fields.push(format!("{} {}", run, self.owner[i]));
            i += run;
        }
        fields.extend(self.strength.iter().map(|s| s.to_string()));
        fields.join(" ")
    }
}

fn number<T: FromStr>(field: &str) -> Result<T, FrameError> {
    field
        .parse()
        .map_err(|_| FrameError::InvalidNumber(field.to_string()))
}

pub fn parse_dimensions(line: &str) -> Result<(usize, usize), FrameError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [w, h] => {
            let (width, height): (usize, usize) = (number(w)?, number(h)?);
            if width == 0 || height == 0 {
                return Err(FrameError::BadDimensions(line.to_string()));
            }
            Ok((width, height))
        }
        _ => Err(FrameError::BadDimensions(line.to_string())),
    }
}

/// Parses a production line holding exactly `size` values.
pub fn parse_production(line: &str, size: usize) -> Result<Vec<i32>, FrameError> {
    let values = line
        .split_whitespace()
        .map(number)
        .collect::<Result<Vec<i32>, _>>()?;
    if values.len() != size {
        return Err(FrameError::WrongLength {
            expected: size,
            got: values.len(),
        });
    }
    Ok(values)
}

/// Parses a frame for a board of `size` cells.
pub fn parse_frame(line: &str, size: usize) -> Result<Frame, FrameError> {
    let mut fields = line.split_whitespace();
    let mut owner = Vec::with_capacity(size);

    while owner.len() < size {
        let (Some(count), Some(id)) = (fields.next(), fields.next()) else {
            return Err(FrameError::OwnerOverrun {
                covered: owner.len(),
                size,
            });
        };
        let count: usize = number(count)?;
        let id: PlayerId = number(id)?;
        let covered = owner.len().checked_add(count).unwrap_or(usize::MAX);
        if covered > size {
            return Err(FrameError::OwnerOverrun { covered, size });
        }
        owner.extend(std::iter::repeat(id).take(count));
    }

    let mut strength = Vec::with_capacity(size);
    for field in fields.by_ref().take(size) {
        strength.push(number(field)?);
    }
    if strength.len() < size {
        return Err(FrameError::Truncated {
            expected: size,
            got: strength.len(),
        });
    }

    let trailing = fields.count();
    if trailing > 0 {
        return Err(FrameError::TrailingFields(trailing));
    }

    Ok(Frame { owner, strength })
}

/// Reads host messages from a line source.
pub struct FrameReader<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        FrameReader {
            reader,
            line: String::new(),
        }
    }

    /// Next line, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<&str>, FrameError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim_end()))
    }

    fn require_line(&mut self, what: &'static str) -> Result<&str, FrameError> {
        self.next_line()?.ok_or(FrameError::UnexpectedEof(what))
    }

    pub fn read_handshake(&mut self) -> Result<Handshake, FrameError> {
        let id = number(self.require_line("player id")?.trim())?;
        let (width, height) = parse_dimensions(self.require_line("board dimensions")?)?;
        Ok(Handshake { id, width, height })
    }

    pub fn read_production(&mut self, size: usize) -> Result<Vec<i32>, FrameError> {
        parse_production(self.require_line("production")?, size)
    }

    /// Next frame, or `None` once the host closes the stream.
    pub fn read_frame(&mut self, size: usize) -> Result<Option<Frame>, FrameError> {
        match self.next_line()? {
            Some(line) => parse_frame(line, size).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_run_length_owners() {
        let frame = parse_frame("3 0 1 2 2 0 1 2 3 4 5 6", 6).unwrap();
        assert_eq!(frame.owner, vec![0, 0, 0, 2, 0, 0]);
        assert_eq!(frame.strength, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn encode_matches_host_format() {
        let frame = Frame {
            owner: vec![0, 0, 1, 1, 1, 0],
            strength: vec![9, 9, 30, 0, 4, 255],
        };
        assert_eq!(frame.encode(), "2 0 3 1 1 0 9 9 30 0 4 255");
        assert_eq!(parse_frame(&frame.encode(), 6).unwrap(), frame);
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(matches!(
            parse_frame("7 0 1 2 3 4 5 6", 6),
            Err(FrameError::OwnerOverrun { covered: 7, size: 6 })
        ));
        assert!(matches!(
            parse_frame("6 0 1 2 3", 6),
            Err(FrameError::Truncated { expected: 6, got: 3 })
        ));
        assert!(matches!(
            parse_frame("6 0 1 2 3 4 5 6 7", 6),
            Err(FrameError::TrailingFields(1))
        ));
        assert!(matches!(
            parse_frame("6 x 1 2 3 4 5 6", 6),
            Err(FrameError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_frame("4 0", 6),
            Err(FrameError::OwnerOverrun { covered: 4, size: 6 })
        ));
    }

    #[test]
    fn huge_run_count_is_an_overrun() {
        let line = format!("2 0 {} 1 1 2 3 4 5 6", usize::MAX);
        assert!(matches!(
            parse_frame(&line, 6),
            Err(FrameError::OwnerOverrun { covered: usize::MAX, size: 6 })
        ));
    }

    #[test]
    fn reads_startup_sequence() {
        let input = "2\n3 1\n1 2 3\n2 0 1 2 5 6 7\n";
        let mut reader = FrameReader::new(Cursor::new(input));
        let hs = reader.read_handshake().unwrap();
        assert_eq!(hs, Handshake { id: 2, width: 3, height: 1 });
        assert_eq!(reader.read_production(hs.size()).unwrap(), vec![1, 2, 3]);
        let frame = reader.read_frame(hs.size()).unwrap().unwrap();
        assert_eq!(frame.owner, vec![0, 0, 2]);
        assert!(reader.read_frame(hs.size()).unwrap().is_none());
    }

    #[test]
    fn reports_early_end_of_input() {
        let mut reader = FrameReader::new(Cursor::new("1\n"));
        assert!(matches!(
            reader.read_handshake(),
            Err(FrameError::UnexpectedEof("board dimensions"))
        ));
    }

    #[test]
    fn rejects_bad_dimensions_and_production() {
        assert!(matches!(parse_dimensions("30"), Err(FrameError::BadDimensions(_))));
        assert!(matches!(parse_dimensions("0 5"), Err(FrameError::BadDimensions(_))));
        assert!(matches!(
            parse_production("1 2", 3),
            Err(FrameError::WrongLength { expected: 3, got: 2 })
        ));
    }
}
