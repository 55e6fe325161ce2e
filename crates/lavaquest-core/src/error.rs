/// Data-level failures surfaced by session serialization and config parsing.
///
/// Gameplay preconditions (a win request while a round is animating, a lose
/// request with no live player) are not errors; they are ignored at the
/// session boundary.
#[derive(Debug)]
pub enum SimError {
    ConfigParse(String),
    SnapshotEncode(String),
    SnapshotDecode(String),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigParse(m) => write!(f, "config parse error: {m}"),
            Self::SnapshotEncode(m) => write!(f, "snapshot encode error: {m}"),
            Self::SnapshotDecode(m) => write!(f, "snapshot decode error: {m}"),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = SimError::SnapshotDecode("truncated input".to_string());
        assert!(err.to_string().contains("snapshot decode"));
        assert!(err.to_string().contains("truncated input"));
    }
}
