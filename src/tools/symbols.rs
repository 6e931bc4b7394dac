//! Sequential symbol streams.
//!
//! The coder touches its input only through `SymbolReader` and its output only
//! through `SymbolWriter`.  Both are buffered and both enforce the 7-bit alphabet.

use std::io::{Read,Write,BufReader,BufWriter,ErrorKind};
use crate::Error;
use super::freq_table::ALPHABET_SIZE;

/// Reads symbols left to right, one at a time.
pub struct SymbolReader<R: Read> {
    reader: BufReader<R>,
    peeked: Option<u8>,
    count: u64
}

/// Appends decoded symbols in order.
pub struct SymbolWriter<W: Write> {
    writer: BufWriter<W>,
    count: u64
}

impl <R: Read> SymbolReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            peeked: None,
            count: 0
        }
    }
    /// true if another symbol can be read, pulls one byte ahead if needed
    pub fn has_next(&mut self) -> Result<bool,Error> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        let mut by: [u8;1] = [0];
        loop {
            match self.reader.read_exact(&mut by) {
                Ok(()) => {
                    self.peeked = Some(by[0]);
                    return Ok(true);
                },
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(false),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::FileIO(e))
            }
        }
    }
    /// Get the next symbol.  Bytes outside the alphabet are an error,
    /// as is reading past the end.
    pub fn next_symbol(&mut self) -> Result<u8,Error> {
        if !self.has_next()? {
            return Err(Error::FileIO(std::io::Error::from(ErrorKind::UnexpectedEof)));
        }
        match self.peeked.take() {
            Some(c) if (c as usize) < ALPHABET_SIZE => {
                self.count += 1;
                Ok(c)
            },
            Some(c) => Err(Error::InvalidSymbol(c)),
            None => Err(Error::FileIO(std::io::Error::from(ErrorKind::UnexpectedEof)))
        }
    }
    /// number of symbols consumed so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl <W: Write> SymbolWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            count: 0
        }
    }
    pub fn emit(&mut self,symbol: u8) -> Result<(),Error> {
        self.writer.write_all(&[symbol])?;
        self.count += 1;
        Ok(())
    }
    /// number of symbols emitted so far
    pub fn count(&self) -> u64 {
        self.count
    }
    /// flush and give back the underlying writer
    pub fn finish(self) -> Result<W,Error> {
        self.writer.into_inner().map_err(|e| Error::FileIO(e.into_error()))
    }
}

#[test]
fn reads_in_order() {
    let mut reader = SymbolReader::new("abc".as_bytes());
    let mut got = Vec::new();
    while reader.has_next().expect("read failed") {
        got.push(reader.next_symbol().expect("read failed"));
    }
    assert_eq!(got,b"abc".to_vec());
    assert_eq!(reader.count(),3);
    assert!(!reader.has_next().expect("read failed"));
}

#[test]
fn rejects_high_bytes() {
    let mut reader = SymbolReader::new([b'a',0xc3].as_slice());
    assert_eq!(reader.next_symbol().expect("read failed"),b'a');
    assert!(matches!(reader.next_symbol(),Err(Error::InvalidSymbol(0xc3))));
}

#[test]
fn writer_flushes() {
    let mut writer = SymbolWriter::new(Vec::new());
    for c in b"hi!" {
        writer.emit(*c).expect("write failed");
    }
    assert_eq!(writer.count(),3);
    assert_eq!(writer.finish().expect("flush failed"),b"hi!".to_vec());
}
