use std::borrow::Cow;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Currency code as reported by a provider (ISO 4217 plus a few extras like XAU, BTC)
pub type Currency = Cow<'static, str>;
