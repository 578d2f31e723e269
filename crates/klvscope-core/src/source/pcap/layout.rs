pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
pub const PCAP_READER_BUFFER_SIZE: usize = 64 * 1024;
pub const MICROS_PER_SECOND: f64 = 1e6;
pub const NANOS_PER_SECOND: f64 = 1e9;
/// `if_tsresol` when the interface omits the option (microseconds).
pub const DEFAULT_TSRESOL: u8 = 6;
/// Set in `if_tsresol` when the exponent is a power of two.
pub const TSRESOL_BASE2_FLAG: u8 = 0x80;
