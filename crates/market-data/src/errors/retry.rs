/// Classification for retry policy.
///
/// Refresh cycles never retry internally; the next scheduled trigger is the
/// retry mechanism. This class tells the scheduler how loudly to report a
/// failure.
///
/// | Class | Next cycle expected to help? | Logged as |
/// |-------|------------------------------|-----------|
/// | `NextCycle` | Yes | warning |
/// | `Never` | No (operator action needed) | error |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Transient failure: network trouble, rate limiting, provider outage.
    NextCycle,

    /// Permanent failure: bad credentials or a payload that breaks the contract.
    Never,
}
