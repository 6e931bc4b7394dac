//! Huffman coding pipeline.
//!
//! `HuffmanCoder` holds everything derived from the input: the frequency table,
//! the sorted leaf list, the tree, and the code table.  Each stage is a method,
//! and each needs the one before it.  A stage that fails leaves the coder as it was.

use std::io::{Read,Write};
use crate::Error;
use super::freq_table::{FrequencyTable,SymbolFrequency};
use super::tree::HuffmanTree;
use super::code_table::CodeTable;
use super::symbols::{SymbolReader,SymbolWriter};
use super::bit_packer;
use super::decoder;

/// Static Huffman coder for one input.
/// Once the code table is made the coder is only read, so it can be shared.
#[derive(Default)]
pub struct HuffmanCoder {
    freq: Option<FrequencyTable>,
    sorted_list: Option<Vec<SymbolFrequency>>,
    tree: Option<HuffmanTree>,
    codes: Option<CodeTable>
}

impl HuffmanCoder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Run every stage on the input, this is the first of the two passes over the source.
    pub fn from_reader<R: Read>(reader: &mut SymbolReader<R>) -> Result<Self,Error> {
        let mut ans = Self::new();
        ans.make_sorted_list(reader)?;
        ans.make_tree()?;
        ans.make_code_table()?;
        Ok(ans)
    }
    /// Run every stage starting from stored `(symbol,count)` pairs.
    /// Gives the same tree as the coder that produced the pairs.
    pub fn from_counts(entries: &[(u8,u64)]) -> Result<Self,Error> {
        let mut ans = Self::new();
        ans.set_frequencies(FrequencyTable::from_counts(entries)?)?;
        ans.make_tree()?;
        ans.make_code_table()?;
        Ok(ans)
    }
    /// Count symbols and produce the sorted leaf list.
    pub fn make_sorted_list<R: Read>(&mut self,reader: &mut SymbolReader<R>) -> Result<(),Error> {
        self.set_frequencies(FrequencyTable::from_reader(reader)?)
    }
    /// Use an existing frequency table, later stages are cleared.
    pub fn set_frequencies(&mut self,freq: FrequencyTable) -> Result<(),Error> {
        let list = freq.sorted_list()?;
        self.freq = Some(freq);
        self.sorted_list = Some(list);
        self.tree = None;
        self.codes = None;
        Ok(())
    }
    /// Build the tree from the sorted list.
    pub fn make_tree(&mut self) -> Result<(),Error> {
        let list = self.sorted_list.as_ref().ok_or(Error::MalformedFrequencyList)?;
        let tree = HuffmanTree::build(list)?;
        log::debug!("tree has {} leaves",tree.leaf_count());
        self.tree = Some(tree);
        self.codes = None;
        Ok(())
    }
    /// Derive the code table from the tree.
    pub fn make_code_table(&mut self) -> Result<(),Error> {
        let codes = CodeTable::generate(self.tree.as_ref())?;
        log::debug!("code table has {} entries",codes.len());
        self.codes = Some(codes);
        Ok(())
    }
    pub fn frequencies(&self) -> Option<&FrequencyTable> {
        self.freq.as_ref()
    }
    pub fn sorted_list(&self) -> Option<&[SymbolFrequency]> {
        self.sorted_list.as_deref()
    }
    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }
    pub fn codes(&self) -> Option<&CodeTable> {
        self.codes.as_ref()
    }
    /// number of symbols that were counted, this is also how many get decoded
    pub fn symbol_count(&self) -> u64 {
        match &self.freq {
            Some(freq) => freq.total(),
            None => 0
        }
    }
    /// Concatenate the codes of every symbol in the stream.
    /// This is the second pass over the source.
    pub fn encode_bits<R: Read>(&self,reader: &mut SymbolReader<R>) -> Result<String,Error> {
        let codes = self.codes.as_ref().ok_or(Error::EmptyTree)?;
        let mut ans = String::new();
        while reader.has_next()? {
            let symbol = reader.next_symbol()?;
            ans += codes.get(symbol).ok_or(Error::InvalidSymbol(symbol))?;
        }
        Ok(ans)
    }
    /// Encode the stream and pack it into bytes.
    pub fn encode<R: Read>(&self,reader: &mut SymbolReader<R>) -> Result<Vec<u8>,Error> {
        let bits = self.encode_bits(reader)?;
        log::debug!("encoded {} symbols into {} bits",reader.count(),bits.len());
        bit_packer::pack(&bits)
    }
    /// Unpack and decode `symbol_count()` symbols into `writer`.
    pub fn decode<W: Write>(&self,packed: &[u8],writer: &mut SymbolWriter<W>) -> Result<(),Error> {
        let tree = self.tree.as_ref().ok_or(Error::EmptyTree)?;
        decoder::decode(&bit_packer::unpack(packed),tree,self.symbol_count(),writer)
    }
    /// Unpack and decode `symbol_count()` symbols into a new buffer.
    pub fn decode_to_vec(&self,packed: &[u8]) -> Result<Vec<u8>,Error> {
        let tree = self.tree.as_ref().ok_or(Error::EmptyTree)?;
        decoder::decode_to_vec(&bit_packer::unpack(packed),tree,self.symbol_count())
    }
}

#[cfg(test)]
fn round_trip(txt: &[u8]) -> Vec<u8> {
    let coder = HuffmanCoder::from_reader(&mut SymbolReader::new(txt)).expect("coder failed");
    let packed = coder.encode(&mut SymbolReader::new(txt)).expect("encode failed");
    coder.decode_to_vec(&packed).expect("decode failed")
}

#[test]
fn invertibility() {
    for txt in [
        "I am Sam. Sam I am. I do not like this Sam I am.\n",
        "aabbbcc",
        "aaaa",
        "x",
        "\u{7f}\u{7f}",
        "\0\t\r\n~",
        "ab"
    ] {
        assert_eq!(round_trip(txt.as_bytes()),txt.as_bytes().to_vec());
    }
    let all: Vec<u8> = (0..128).chain((0..128).step_by(3)).collect();
    assert_eq!(round_trip(&all),all);
}

#[test]
fn packed_size() {
    let txt = "aabbbcc".as_bytes();
    let coder = HuffmanCoder::from_reader(&mut SymbolReader::new(txt)).expect("coder failed");
    let codes = coder.codes().expect("no codes");
    let len = |c: u8| codes.get(c).expect("missing code").len();
    assert!(len(b'b') < len(b'a') && len(b'b') < len(b'c'));
    let packed = coder.encode(&mut SymbolReader::new(txt)).expect("encode failed");
    let bits = len(b'a')*2 + len(b'b')*3 + len(b'c')*2 + 1;
    assert_eq!(packed.len(),(bits + 7) / 8);
    assert_eq!(packed,hex::decode("0D0F").unwrap());
}

#[test]
fn single_char() {
    let coder = HuffmanCoder::from_reader(&mut SymbolReader::new("x".as_bytes())).expect("coder failed");
    let list = coder.sorted_list().expect("no list");
    assert_eq!(list.len(),2);
    assert_eq!(list[0],SymbolFrequency::leaf(b'y',0.0));
    let codes = coder.codes().expect("no codes");
    assert_eq!(codes.get(b'x').map(|c| c.len()),Some(1));
    assert_eq!(codes.get(b'y').map(|c| c.len()),Some(1));
    let packed = coder.encode(&mut SymbolReader::new("x".as_bytes())).expect("encode failed");
    assert_eq!(packed,vec![0x03]);
    let mut writer = SymbolWriter::new(Vec::new());
    coder.decode(&packed,&mut writer).expect("decode failed");
    assert_eq!(writer.finish().expect("flush failed"),b"x".to_vec());
}

#[test]
fn deterministic() {
    let txt = "she sells sea shells by the sea shore".as_bytes();
    let encode = || {
        let coder = HuffmanCoder::from_reader(&mut SymbolReader::new(txt)).expect("coder failed");
        coder.encode(&mut SymbolReader::new(txt)).expect("encode failed")
    };
    assert_eq!(encode(),encode());
}

#[test]
fn rebuilt_from_counts() {
    let txt = "she sells sea shells by the sea shore".as_bytes();
    let coder = HuffmanCoder::from_reader(&mut SymbolReader::new(txt)).expect("coder failed");
    let packed = coder.encode(&mut SymbolReader::new(txt)).expect("encode failed");
    let entries = coder.frequencies().expect("no table").entries();
    let other = HuffmanCoder::from_counts(&entries).expect("rebuild failed");
    assert_eq!(other.codes(),coder.codes());
    assert_eq!(other.decode_to_vec(&packed).expect("decode failed"),txt.to_vec());
}

#[test]
fn stages_in_order() {
    let mut coder = HuffmanCoder::new();
    assert!(matches!(coder.make_tree(),Err(Error::MalformedFrequencyList)));
    assert!(matches!(coder.make_code_table(),Err(Error::EmptyTree)));
    assert!(matches!(coder.encode(&mut SymbolReader::new("a".as_bytes())),Err(Error::EmptyTree)));
    assert!(matches!(coder.decode_to_vec(&[0x03]),Err(Error::EmptyTree)));
    assert!(matches!(coder.make_sorted_list(&mut SymbolReader::new("".as_bytes())),Err(Error::EmptyInput)));
    assert!(coder.sorted_list().is_none());
    assert!(coder.frequencies().is_none());
}

#[test]
fn unknown_symbol_on_second_pass() {
    let coder = HuffmanCoder::from_reader(&mut SymbolReader::new("abc".as_bytes())).expect("coder failed");
    assert!(matches!(coder.encode(&mut SymbolReader::new("abd".as_bytes())),Err(Error::InvalidSymbol(b'd'))));
}
