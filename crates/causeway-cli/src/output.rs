//! Output formatting for the CLI.

use crate::error::Result;
use serde::Serialize;

/// Render a value as pretty-printed JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_pretty() {
        let rendered = to_json(&serde_json::json!({"deleted": "abc"})).unwrap();
        assert!(rendered.contains("\n"));
        assert!(rendered.contains("\"deleted\": \"abc\""));
    }
}
