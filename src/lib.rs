//! # huffpress
//!
//! Static Huffman compression of text files over the 7-bit alphabet.
//!
//! * `huff` is the file level interface, it reads and writes the container format
//! * `HuffmanCoder` is the pipeline object, usable on its own when the caller keeps the tree
//!
//! The bit stream is self-delimiting at the front (padding marker) but not at the back,
//! so decoding always needs the symbol count, which the container stores in its header.

mod tools;
pub mod huff;

pub use tools::freq_table::{FrequencyTable,SymbolFrequency,ALPHABET_SIZE};
pub use tools::tree::{HuffmanTree,TreeBuilder,TreeNode};
pub use tools::code_table::CodeTable;
pub use tools::bit_packer::{pack,unpack};
pub use tools::decoder::{decode,decode_to_vec};
pub use tools::symbols::{SymbolReader,SymbolWriter};
pub use tools::coder::HuffmanCoder;

type DYNERR = Box<dyn std::error::Error>;

/// Compression Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("no symbols to encode")]
    EmptyInput,
    #[error("frequency list needs at least 2 entries")]
    MalformedFrequencyList,
    #[error("Huffman tree has not been built")]
    EmptyTree,
    #[error("invalid bit character {0:?}")]
    InvalidBitCharacter(char),
    #[error("bit stream ended before all symbols were decoded")]
    TruncatedStream,
    #[error("tree walk left the tree")]
    CorruptTreeWalk,
    #[error("symbol {0} is outside the alphabet or has no code")]
    InvalidSymbol(u8),
    #[error("file format mismatch")]
    FileFormatMismatch,
    #[error("file too large")]
    FileTooLarge,
    #[error(transparent)]
    FileIO(#[from] std::io::Error)
}

/// Options controlling compression
#[derive(Clone)]
pub struct Options {
    /// starting position in the input file
    pub in_offset: u64,
    /// starting position in the output file
    pub out_offset: u64,
    /// return error if file is larger
    pub max_file_size: u64
}

pub const STD_OPTIONS: Options = Options {
    in_offset: 0,
    out_offset: 0,
    max_file_size: u32::MAX as u64
};
