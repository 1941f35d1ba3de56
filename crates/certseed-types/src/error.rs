/// Model construction errors.
///
/// Encoding itself never fails: every well-formed input tree produces some
/// byte string. These errors only guard the handful of invariants the input
/// model promises before encoding starts.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unused bits count {got} exceeds 7")]
    UnusedBitsOutOfRange { got: u8 },
    #[error("certificate version {got} is not 0, 1 or 2")]
    InvalidVersion { got: u8 },
}
