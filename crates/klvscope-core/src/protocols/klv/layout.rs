pub const KEY_LEN: usize = 16;
pub const KEY_RANGE: std::ops::Range<usize> = 0..KEY_LEN;
pub const LENGTH_OFFSET: usize = KEY_LEN;

/// Universal key of the UAS Datalink Local Set.
pub const UAS_LOCAL_SET_KEY: [u8; KEY_LEN] = [
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x0b, 0x01, 0x01, 0x0e, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0x00,
];
