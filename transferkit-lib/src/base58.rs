//! Base58 encoding with the Bitcoin alphabet.
//!
//! Only encoding is provided; nothing in the protocol decodes Base58.

/// The 58-character Bitcoin alphabet (no `0`, `O`, `I` or `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encode bytes as Base58.
///
/// Each leading zero byte becomes a leading `1`. The rest of the input is
/// treated as one big-endian number and converted by repeated
/// multiply-and-add into a base-58 digit buffer.
///
/// # Example
///
/// ```
/// use transferkit_lib::base58;
///
/// assert_eq!(base58::encode(b"hello"), "Cn8eVZg");
/// assert_eq!(base58::encode(&[0, 0, 0]), "111");
/// assert_eq!(base58::encode(&[]), "");
/// ```
pub fn encode(input: &[u8]) -> String {
    let zeros = input.iter().take_while(|&&byte| byte == 0).count();
    let payload = &input[zeros..];

    // log(256) / log(58) ~= 1.365, rounded up to 138/100
    let size = payload.len() * 138 / 100 + 1;
    let mut digits = vec![0u8; size];
    let mut length = 0;

    for &byte in payload {
        let mut carry = u32::from(byte);
        let mut touched = 0;
        for digit in digits.iter_mut().rev() {
            if carry == 0 && touched >= length {
                break;
            }
            carry += 256 * u32::from(*digit);
            *digit = (carry % 58) as u8;
            carry /= 58;
            touched += 1;
        }
        length = touched;
    }

    let start = digits
        .iter()
        .position(|&digit| digit != 0)
        .unwrap_or(digits.len());

    let mut encoded = String::with_capacity(zeros + digits.len() - start);
    encoded.extend(std::iter::repeat('1').take(zeros));
    encoded.extend(
        digits[start..]
            .iter()
            .map(|&digit| char::from(ALPHABET[usize::from(digit)])),
    );
    encoded
}
