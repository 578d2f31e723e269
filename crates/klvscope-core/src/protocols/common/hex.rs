/// Format bytes as a lowercase hexadecimal string.
///
/// # Examples
/// ```
/// use klvscope_core::to_hex;
///
/// assert_eq!(to_hex(&[0x01, 0xab]), "01ab");
/// ```
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parse a hexadecimal string into bytes.
///
/// Whitespace anywhere in the input is ignored. Returns `None` when the
/// remaining digit count is odd or any other character is not a hex digit.
///
/// # Examples
/// ```
/// use klvscope_core::parse_hex_string;
///
/// assert_eq!(parse_hex_string("06 0e\n2B"), Some(vec![0x06, 0x0e, 0x2b]));
/// assert_eq!(parse_hex_string("abc"), None);
/// ```
pub fn parse_hex_string(input: &str) -> Option<Vec<u8>> {
    let digits = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(16))
        .collect::<Option<Vec<u32>>>()?;
    if digits.len() % 2 != 0 {
        return None;
    }
    Some(
        digits
            .chunks_exact(2)
            .map(|pair| ((pair[0] << 4) | pair[1]) as u8)
            .collect(),
    )
}
