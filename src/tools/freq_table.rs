//! Symbol frequency counting.
//!
//! This is the first pass over the input.  The output is a list of leaf
//! frequencies sorted in ascending order, which is what the tree builder consumes.

use std::io::Read;
use crate::Error;
use super::symbols::SymbolReader;

/// number of symbols in the alphabet (7-bit)
pub const ALPHABET_SIZE: usize = 128;

/// A symbol paired with its probability of occurrence.
/// The symbol is `None` for the merged mass carried by internal tree nodes.
/// Lists of these are ordered by probability, equal probabilities keep the
/// order in which they were created.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct SymbolFrequency {
    symbol: Option<u8>,
    probability: f64
}

impl SymbolFrequency {
    pub fn leaf(symbol: u8,probability: f64) -> Self {
        Self {
            symbol: Some(symbol),
            probability
        }
    }
    pub fn internal(probability: f64) -> Self {
        Self {
            symbol: None,
            probability
        }
    }
    pub fn symbol(&self) -> Option<u8> {
        self.symbol
    }
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// Occurrence counts for every symbol of the alphabet.
pub struct FrequencyTable {
    counts: [u64;ALPHABET_SIZE],
    /// symbols in the order they were first seen
    order: Vec<u8>,
    total: u64
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0;ALPHABET_SIZE],
            order: Vec::new(),
            total: 0
        }
    }
    /// count one occurrence of `symbol`
    pub fn add(&mut self,symbol: u8) -> Result<(),Error> {
        let idx = symbol as usize;
        if idx >= ALPHABET_SIZE {
            return Err(Error::InvalidSymbol(symbol));
        }
        if self.counts[idx] == 0 {
            self.order.push(symbol);
        }
        self.counts[idx] += 1;
        self.total += 1;
        Ok(())
    }
    /// Consume the whole stream, counting as we go.
    pub fn from_reader<R: Read>(reader: &mut SymbolReader<R>) -> Result<Self,Error> {
        let mut ans = Self::new();
        while reader.has_next()? {
            ans.add(reader.next_symbol()?)?;
        }
        log::debug!("counted {} symbols, {} distinct",ans.total,ans.order.len());
        Ok(ans)
    }
    /// Rebuild a table from `(symbol,count)` pairs given in first-occurrence order,
    /// as stored in a compressed file header.
    pub fn from_counts(entries: &[(u8,u64)]) -> Result<Self,Error> {
        let mut ans = Self::new();
        for (symbol,count) in entries {
            let idx = *symbol as usize;
            if idx >= ALPHABET_SIZE || *count == 0 || ans.counts[idx] != 0 {
                return Err(Error::FileFormatMismatch);
            }
            ans.counts[idx] = *count;
            ans.order.push(*symbol);
            ans.total += *count;
        }
        Ok(ans)
    }
    pub fn total(&self) -> u64 {
        self.total
    }
    pub fn count(&self,symbol: u8) -> u64 {
        match self.counts.get(symbol as usize) {
            Some(c) => *c,
            None => 0
        }
    }
    pub fn distinct(&self) -> usize {
        self.order.len()
    }
    /// `(symbol,count)` pairs with nonzero count, in first-occurrence order
    pub fn entries(&self) -> Vec<(u8,u64)> {
        self.order.iter().map(|s| (*s,self.counts[*s as usize])).collect()
    }
    /// Produce the ascending list of leaf frequencies used to build the tree.
    /// If only one symbol occurs, a zero probability neighbor is added so the tree
    /// has two leaves, and the real symbol gets a 1-bit code.
    pub fn sorted_list(&self) -> Result<Vec<SymbolFrequency>,Error> {
        if self.total == 0 {
            return Err(Error::EmptyInput);
        }
        let mut ans: Vec<SymbolFrequency> = self.order.iter()
            .map(|s| SymbolFrequency::leaf(*s,self.counts[*s as usize] as f64 / self.total as f64))
            .collect();
        if ans.len() == 1 {
            let extra = ((self.order[0] as usize + 1) % ALPHABET_SIZE) as u8;
            log::debug!("single symbol input, adding synthetic symbol {}",extra);
            ans.push(SymbolFrequency::leaf(extra,0.0));
        }
        // stable sort, ties stay in first-occurrence order
        ans.sort_by(|a,b| a.probability.total_cmp(&b.probability));
        Ok(ans)
    }
}

#[test]
fn sorted_ascending() {
    let mut table = FrequencyTable::new();
    for c in "aabbbcc".bytes() {
        table.add(c).expect("bad symbol");
    }
    let list = table.sorted_list().expect("empty");
    let symbols: Vec<Option<u8>> = list.iter().map(|f| f.symbol()).collect();
    assert_eq!(symbols,vec![Some(b'a'),Some(b'c'),Some(b'b')]);
    assert_eq!(list[0].probability(),2.0/7.0);
    assert_eq!(list[2].probability(),3.0/7.0);
    let sum: f64 = list.iter().map(|f| f.probability()).sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn ties_follow_first_occurrence() {
    let mut table = FrequencyTable::new();
    for c in "zyxxyz".bytes() {
        table.add(c).expect("bad symbol");
    }
    let symbols: Vec<Option<u8>> = table.sorted_list().expect("empty").iter().map(|f| f.symbol()).collect();
    assert_eq!(symbols,vec![Some(b'z'),Some(b'y'),Some(b'x')]);
}

#[test]
fn single_symbol_gets_neighbor() {
    let mut table = FrequencyTable::new();
    for c in "aaaa".bytes() {
        table.add(c).expect("bad symbol");
    }
    let list = table.sorted_list().expect("empty");
    assert_eq!(list,vec![SymbolFrequency::leaf(b'b',0.0),SymbolFrequency::leaf(b'a',1.0)]);
    // wraps at the top of the alphabet
    let mut table = FrequencyTable::new();
    table.add(127).expect("bad symbol");
    let list = table.sorted_list().expect("empty");
    assert_eq!(list[0].symbol(),Some(0));
}

#[test]
fn empty_and_invalid() {
    let table = FrequencyTable::new();
    assert!(matches!(table.sorted_list(),Err(Error::EmptyInput)));
    let mut table = FrequencyTable::new();
    assert!(matches!(table.add(200),Err(Error::InvalidSymbol(200))));
    assert!(matches!(FrequencyTable::from_counts(&[(b'a',1),(b'a',2)]),Err(Error::FileFormatMismatch)));
}

#[test]
fn counts_survive_rebuild() {
    let mut reader = SymbolReader::new("mississippi".as_bytes());
    let table = FrequencyTable::from_reader(&mut reader).expect("count failed");
    assert_eq!(table.entries(),vec![(b'm',1),(b'i',4),(b's',4),(b'p',2)]);
    let rebuilt = FrequencyTable::from_counts(&table.entries()).expect("rebuild failed");
    assert_eq!(rebuilt.total(),11);
    assert_eq!(rebuilt.sorted_list().expect("empty"),table.sorted_list().expect("empty"));
}
