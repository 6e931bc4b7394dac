//! Static Huffman Compression of Text Files
//!
//! This module reads and writes a small container around the packed bit stream.
//! The container records how many symbols to decode, and the count of each symbol,
//! which is enough to rebuild the exact tree the compressor used.
//!
//! * 4 bytes, total symbol count, little endian
//! * 1 byte, number of distinct symbols D
//! * D entries of 5 bytes, the symbol followed by its count (little endian),
//!   in order of first occurrence
//! * packed bit stream, see `pack`
//!
//! Input must be 7-bit, any byte >= 128 is an error.
//! Files are fully buffered, the input is read twice during compression.

use std::io::{Cursor,Read,Write,Seek,SeekFrom};
use crate::DYNERR;
use crate::Error;
use crate::tools::coder::HuffmanCoder;
use crate::tools::symbols::{SymbolReader,SymbolWriter};
use crate::tools::freq_table::ALPHABET_SIZE;

const COUNT_LEN: usize = 4;
const ENTRY_LEN: usize = 5;

/// Serialize the symbol count and frequency table.
fn make_header(coder: &HuffmanCoder) -> Result<Vec<u8>,Error> {
    let freq = coder.frequencies().ok_or(Error::EmptyInput)?;
    let total = u32::try_from(freq.total()).map_err(|_| Error::FileTooLarge)?;
    let mut ans = u32::to_le_bytes(total).to_vec();
    ans.push(freq.distinct() as u8);
    for (symbol,count) in freq.entries() {
        ans.push(symbol);
        ans.append(&mut u32::to_le_bytes(count as u32).to_vec());
    }
    Ok(ans)
}

/// Parse the header, returns symbol count, `(symbol,count)` entries, and where the bit stream starts.
fn parse_header(buf: &[u8]) -> Result<(u64,Vec<(u8,u64)>,usize),Error> {
    if buf.len() < COUNT_LEN + 1 {
        return Err(Error::FileFormatMismatch);
    }
    let total = u32::from_le_bytes([buf[0],buf[1],buf[2],buf[3]]) as u64;
    let distinct = buf[COUNT_LEN] as usize;
    if distinct == 0 || distinct > ALPHABET_SIZE {
        return Err(Error::FileFormatMismatch);
    }
    let start = COUNT_LEN + 1 + distinct*ENTRY_LEN;
    if buf.len() < start {
        return Err(Error::FileFormatMismatch);
    }
    let entries: Vec<(u8,u64)> = buf[COUNT_LEN+1..start].chunks_exact(ENTRY_LEN)
        .map(|e| (e[0],u32::from_le_bytes([e[1],e[2],e[3],e[4]]) as u64))
        .collect();
    let sum: u64 = entries.iter().map(|(_,c)| *c).sum();
    if sum != total {
        log::debug!("header claims {} symbols but entries add to {}",total,sum);
        return Err(Error::FileFormatMismatch);
    }
    Ok((total,entries,start))
}

/// Main compression function.
/// `expanded_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W, opt: &crate::Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let mut expanded_length = expanded_in.seek(SeekFrom::End(0))?;
    if opt.in_offset > expanded_length {
        return Err(Box::new(Error::FileFormatMismatch));
    }
    expanded_length -= opt.in_offset;
    if expanded_length > opt.max_file_size {
        return Err(Box::new(Error::FileTooLarge));
    }
    // first pass, gather statistics and build the code
    expanded_in.seek(SeekFrom::Start(opt.in_offset))?;
    let coder = HuffmanCoder::from_reader(&mut SymbolReader::new(&mut *expanded_in))?;
    // second pass, encode
    expanded_in.seek(SeekFrom::Start(opt.in_offset))?;
    let packed = coder.encode(&mut SymbolReader::new(&mut *expanded_in))?;
    let header = make_header(&coder)?;
    compressed_out.seek(SeekFrom::Start(opt.out_offset))?;
    compressed_out.write_all(&header)?;
    compressed_out.write_all(&packed)?;
    compressed_out.flush()?;
    Ok((expanded_length,(header.len() + packed.len()) as u64))
}

/// Main expansion function.
/// `compressed_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.  Nothing is written if decoding fails.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W, opt: &crate::Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let mut compressed_length = compressed_in.seek(SeekFrom::End(0))?;
    if opt.in_offset > compressed_length {
        return Err(Box::new(Error::FileFormatMismatch));
    }
    compressed_length -= opt.in_offset;
    if compressed_length > opt.max_file_size {
        return Err(Box::new(Error::FileTooLarge));
    }
    compressed_in.seek(SeekFrom::Start(opt.in_offset))?;
    let mut buf = Vec::new();
    compressed_in.read_to_end(&mut buf)?;
    let (total,entries,start) = parse_header(&buf)?;
    let coder = HuffmanCoder::from_counts(&entries)?;
    log::debug!("expanding {} symbols from {} distinct",total,entries.len());
    expanded_out.seek(SeekFrom::Start(opt.out_offset))?;
    let mut writer = SymbolWriter::new(&mut *expanded_out);
    coder.decode(&buf[start..],&mut writer)?;
    let out_size = writer.count();
    writer.finish()?;
    Ok((compressed_length,out_size))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &crate::Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &crate::Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

#[cfg(test)]
use crate::STD_OPTIONS;

#[test]
fn compression_works() {
    let test_data = "aabbbcc".as_bytes();
    let huff_str = "07 00 00 00 03 61 02 00 00 00 62 03 00 00 00 63 02 00 00 00 0D 0F";
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,hex::decode(huff_str.replace(" ","")).unwrap());

    let test_data = "x".as_bytes();
    let huff_str = "01 00 00 00 01 78 01 00 00 00 03";
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,hex::decode(huff_str.replace(" ","")).unwrap());
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data = "aaaa".as_bytes();
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn invertibility_with_offsets() {
    let mut opt = STD_OPTIONS;
    opt.in_offset = 4;
    let compressed = compress_slice("skipaabbbcc".as_bytes(),&opt).expect("compression failed");
    assert_eq!(compressed.len(),22);
    let mut padded = vec![0xff;4];
    padded.extend_from_slice(&compressed);
    let expanded = expand_slice(&padded,&opt).expect("expansion failed");
    assert_eq!(expanded,"aabbbcc".as_bytes().to_vec());
}

#[test]
fn rejected_inputs() {
    let err = compress_slice("".as_bytes(),&STD_OPTIONS).expect_err("empty input accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::EmptyInput)));
    let err = compress_slice("caf\u{e9}".as_bytes(),&STD_OPTIONS).expect_err("8-bit input accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::InvalidSymbol(0xc3))));
    let mut opt = STD_OPTIONS;
    opt.max_file_size = 3;
    let err = compress_slice("abcd".as_bytes(),&opt).expect_err("large input accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::FileTooLarge)));
}

#[test]
fn corrupt_files() {
    let compressed = compress_slice("aabbbcc".as_bytes(),&STD_OPTIONS).expect("compression failed");
    // count does not match the entries
    let mut bad = compressed.clone();
    bad[0] = 8;
    let err = expand_slice(&bad,&STD_OPTIONS).expect_err("bad header accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::FileFormatMismatch)));
    // missing the last byte of the bit stream
    let err = expand_slice(&compressed[0..compressed.len()-1],&STD_OPTIONS).expect_err("short stream accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::TruncatedStream)));
    // header claims 2^32-1 symbols with a single byte of bits
    let huge = hex::decode("FFFFFFFF0161FFFFFFFF03").unwrap();
    let err = expand_slice(&huge,&STD_OPTIONS).expect_err("huge count accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::TruncatedStream)));
    // header cut short
    let err = expand_slice(&compressed[0..7],&STD_OPTIONS).expect_err("short header accepted");
    assert!(matches!(err.downcast_ref::<Error>(),Some(Error::FileFormatMismatch)));
}
