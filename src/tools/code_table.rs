//! Code table derived from a Huffman tree.

use crate::Error;
use super::tree::{HuffmanTree,TreeNode};
use super::freq_table::ALPHABET_SIZE;

/// Bit string code for each symbol, `None` if the symbol is not in the tree.
/// Codes are strings of '0' and '1', left branches are '0'.
#[derive(Clone,Debug,PartialEq)]
pub struct CodeTable {
    codes: Vec<Option<String>>
}

impl CodeTable {
    /// Walk the tree in preorder and record the path to every leaf.
    /// An explicit stack is used so skewed trees cannot exhaust the call stack.
    pub fn generate(tree: Option<&HuffmanTree>) -> Result<Self,Error> {
        let tree = tree.ok_or(Error::EmptyTree)?;
        let mut codes: Vec<Option<String>> = vec![None;ALPHABET_SIZE];
        let mut stack: Vec<(&TreeNode,String)> = vec![(tree.root(),String::new())];
        while let Some((node,path)) = stack.pop() {
            match (node.left(),node.right(),node.symbol()) {
                (Some(left),Some(right),_) => {
                    // right goes on first so left is visited first
                    stack.push((right,[path.as_str(),"1"].concat()));
                    stack.push((left,path + "0"));
                },
                (None,None,Some(symbol)) => {
                    let slot = codes.get_mut(symbol as usize).ok_or(Error::InvalidSymbol(symbol))?;
                    *slot = Some(path);
                },
                _ => return Err(Error::CorruptTreeWalk)
            }
        }
        Ok(Self { codes })
    }
    /// code for `symbol`, if it has one
    pub fn get(&self,symbol: u8) -> Option<&str> {
        match self.codes.get(symbol as usize) {
            Some(Some(code)) => Some(code.as_str()),
            _ => None
        }
    }
    /// `(symbol,code)` for every symbol that has a code, in symbol order
    pub fn entries(&self) -> Vec<(u8,&str)> {
        self.codes.iter().enumerate()
            .filter_map(|(i,c)| c.as_ref().map(|code| (i as u8,code.as_str())))
            .collect()
    }
    /// number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
fn table_for(txt: &str) -> CodeTable {
    let mut freq = super::freq_table::FrequencyTable::new();
    for c in txt.bytes() {
        freq.add(c).expect("bad symbol");
    }
    let tree = HuffmanTree::build(&freq.sorted_list().expect("empty")).expect("build failed");
    CodeTable::generate(Some(&tree)).expect("generate failed")
}

#[test]
fn codes_for_small_input() {
    let table = table_for("aabbbcc");
    assert_eq!(table.get(b'b'),Some("0"));
    assert_eq!(table.get(b'a'),Some("10"));
    assert_eq!(table.get(b'c'),Some("11"));
    assert_eq!(table.get(b'd'),None);
    assert_eq!(table.len(),3);
}

#[test]
fn single_symbol_codes() {
    let table = table_for("x");
    assert_eq!(table.get(b'y'),Some("0"));
    assert_eq!(table.get(b'x'),Some("1"));
}

#[test]
fn prefix_free() {
    let table = table_for("Now is the time for all good men to come to the aid of the party.\n");
    let entries = table.entries();
    for (s1,c1) in &entries {
        for (s2,c2) in &entries {
            if s1 != s2 {
                assert!(!c2.starts_with(c1),"{} is a prefix of {}",c1,c2);
            }
        }
    }
}

#[test]
fn missing_tree() {
    assert!(matches!(CodeTable::generate(None),Err(Error::EmptyTree)));
}
