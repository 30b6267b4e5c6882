/// Currency every stored rate is expressed in, unless configured otherwise
pub const DEFAULT_REFERENCE_CURRENCY: &str = "RUB";

/// Seconds between scheduled refresh cycles
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60 * 60;

/// Longest currency code accepted from a provider or a client
pub const MAX_CURRENCY_CODE_LEN: usize = 12;
