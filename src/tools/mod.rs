//! Building blocks of the Huffman coder, from frequency counting to tree walk decoding.

pub mod symbols;
pub mod freq_table;
pub mod tree;
pub mod code_table;
pub mod bit_packer;
pub mod decoder;
pub mod coder;
