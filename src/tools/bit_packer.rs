//! Packing of bit strings into bytes.
//!
//! The stream is padded at the front so it fills a whole number of bytes.
//! Padding is `8 - len%8` bits (1 to 8), all zero except the last which is 1,
//! so the reader can find where the data starts without a length field.
//! Bits are packed MSB first.

use bit_vec::BitVec;
use crate::Error;

/// Pack a string of '0' and '1' into padded bytes.
pub fn pack(bits: &str) -> Result<Vec<u8>,Error> {
    let padding = 8 - bits.len() % 8;
    let mut ans = BitVec::with_capacity(bits.len() + padding);
    for _i in 0..padding-1 {
        ans.push(false);
    }
    ans.push(true);
    for c in bits.chars() {
        match c {
            '0' => ans.push(false),
            '1' => ans.push(true),
            _ => return Err(Error::InvalidBitCharacter(c))
        }
    }
    Ok(ans.to_bytes())
}

/// Recover the bit string from padded bytes.
/// The padding ends at the first 1 in the first byte.  If the first byte is zero
/// the file is not well formed, in that case everything after it is returned.
pub fn unpack(bytes: &[u8]) -> String {
    let bits = BitVec::from_bytes(bytes);
    let start = match (0..8).find(|i| bits.get(*i) == Some(true)) {
        Some(i) => i + 1,
        None => {
            if !bytes.is_empty() {
                log::warn!("padding marker missing, skipping first byte");
            }
            8
        }
    };
    bits.iter().skip(start).map(|b| match b { true => '1', false => '0' }).collect()
}

#[test]
fn padding_marker() {
    assert_eq!(pack("").expect("pack failed"),vec![0x01]);
    assert_eq!(pack("1").expect("pack failed"),vec![0x03]);
    assert_eq!(pack("10100001111").expect("pack failed"),hex::decode("0D0F").unwrap());
    // already a multiple of 8 gets a whole byte of padding
    assert_eq!(pack("10101010").expect("pack failed"),vec![0x01,0xAA]);
}

#[test]
fn self_delimiting() {
    for bits in ["","0","1","0000000","00000000","1111111","111111111","0110100111001"] {
        assert_eq!(unpack(&pack(bits).expect("pack failed")),bits);
    }
}

#[test]
fn invalid_character() {
    assert!(matches!(pack("0102"),Err(Error::InvalidBitCharacter('2'))));
}

#[test]
fn missing_marker() {
    assert_eq!(unpack(&[]),"");
    assert_eq!(unpack(&[0x00,0xF0]),"11110000");
}
