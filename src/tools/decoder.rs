//! Tree walk decoding.
//!
//! The stream does not mark its own end, trailing bits could look like the start
//! of another code.  So we stop on the symbol count rather than on running out of bits.

use std::io::Write;
use crate::Error;
use super::tree::HuffmanTree;
use super::symbols::SymbolWriter;

/// Decode exactly `count` symbols from `bits` (a string of '0' and '1').
pub fn decode_to_vec(bits: &str,tree: &HuffmanTree,count: u64) -> Result<Vec<u8>,Error> {
    if count == 0 {
        return Ok(Vec::new());
    }
    // every code is at least one bit
    if count > bits.len() as u64 {
        log::debug!("{} bits cannot hold {} symbols",bits.len(),count);
        return Err(Error::TruncatedStream);
    }
    let mut ans = Vec::with_capacity(count as usize);
    let mut curs = tree.root();
    for c in bits.chars() {
        let bit = match c {
            '0' => false,
            '1' => true,
            _ => return Err(Error::InvalidBitCharacter(c))
        };
        curs = curs.child(bit).ok_or(Error::CorruptTreeWalk)?;
        if curs.is_leaf() {
            ans.push(curs.symbol().ok_or(Error::CorruptTreeWalk)?);
            if ans.len() as u64 == count {
                return Ok(ans);
            }
            curs = tree.root();
        }
    }
    log::debug!("bits ran out after {} of {} symbols",ans.len(),count);
    Err(Error::TruncatedStream)
}

/// Decode exactly `count` symbols and send them to `writer`.
/// Nothing is written unless the whole stream decodes.
pub fn decode<W: Write>(bits: &str,tree: &HuffmanTree,count: u64,writer: &mut SymbolWriter<W>) -> Result<(),Error> {
    for symbol in decode_to_vec(bits,tree,count)? {
        writer.emit(symbol)?;
    }
    Ok(())
}

#[cfg(test)]
fn tree_for(txt: &str) -> HuffmanTree {
    let mut freq = super::freq_table::FrequencyTable::new();
    for c in txt.bytes() {
        freq.add(c).expect("bad symbol");
    }
    HuffmanTree::build(&freq.sorted_list().expect("empty")).expect("build failed")
}

#[test]
fn walk_small_tree() {
    // b=0, a=10, c=11
    let tree = tree_for("aabbbcc");
    assert_eq!(decode_to_vec("10100001111",&tree,7).expect("decode failed"),b"aabbbcc".to_vec());
    // stops at the count even if bits remain
    assert_eq!(decode_to_vec("10100001111",&tree,2).expect("decode failed"),b"aa".to_vec());
    assert_eq!(decode_to_vec("",&tree,0).expect("decode failed"),Vec::<u8>::new());
}

#[test]
fn truncated() {
    let tree = tree_for("aabbbcc");
    assert!(matches!(decode_to_vec("1010000111",&tree,7),Err(Error::TruncatedStream)));
    // count far beyond what the bits could hold fails before allocating
    assert!(matches!(decode_to_vec("10",&tree,u32::MAX as u64),Err(Error::TruncatedStream)));
    let mut writer = SymbolWriter::new(Vec::new());
    assert!(decode("10",&tree,2,&mut writer).is_err());
    assert_eq!(writer.count(),0);
}

#[test]
fn bad_bit() {
    let tree = tree_for("aabbbcc");
    assert!(matches!(decode_to_vec("10x",&tree,2),Err(Error::InvalidBitCharacter('x'))));
}

#[test]
fn synthetic_leaf_is_decodable() {
    // x=1, y=0 where y never occurred in the input
    let tree = tree_for("x");
    assert_eq!(decode_to_vec("101",&tree,3).expect("decode failed"),b"xyx".to_vec());
}
