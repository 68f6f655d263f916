use serde::{Deserialize, Serialize};

/// Login/session lifecycle of the attached process.
///
/// Exactly one instance exists per engine; every other component asks
/// it instead of keeping its own flag.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Unattached,
    Attached,
    Scanning,
    Scanned,
    Confirmed,
    LoggedIn,
    Ready,
    LoggedOut,
}

/// QR login progress reported by the hook layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanStatus {
    Unknown,
    Waiting,
    Scanned,
    Confirmed,
    Timeout,
    Cancel,
}

impl ScanStatus {
    /// Map the native status integer; out-of-range values are `Unknown`.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => Self::Waiting,
            1 => Self::Scanned,
            2 => Self::Confirmed,
            3 => Self::Timeout,
            4 => Self::Cancel,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_status_mapping() {
        assert_eq!(ScanStatus::from_raw(0), ScanStatus::Waiting);
        assert_eq!(ScanStatus::from_raw(1), ScanStatus::Scanned);
        assert_eq!(ScanStatus::from_raw(2), ScanStatus::Confirmed);
        assert_eq!(ScanStatus::from_raw(3), ScanStatus::Timeout);
        assert_eq!(ScanStatus::from_raw(4), ScanStatus::Cancel);
    }

    #[test]
    fn test_scan_status_out_of_range() {
        assert_eq!(ScanStatus::from_raw(-1), ScanStatus::Unknown);
        assert_eq!(ScanStatus::from_raw(5), ScanStatus::Unknown);
        assert_eq!(ScanStatus::from_raw(10000), ScanStatus::Unknown);
    }
}
