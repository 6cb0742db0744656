//! JSON output formatting.

use crate::error::ExportResult;
use crate::scanner::ScanResult;
use std::io::Write;

/// Write results as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, results: &[ScanResult]) -> ExportResult<()> {
    serde_json::to_writer_pretty(&mut writer, results)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    #[test]
    fn test_json_array() {
        let results = vec![
            ScanResult::open(Port::new(80).unwrap(), Some("hello".into())),
            ScanResult::open(Port::new(443).unwrap(), None),
        ];
        let mut buf = Vec::new();
        write_json(&mut buf, &results).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["port"], 80);
        assert_eq!(value[0]["service"], "HTTP");
        assert_eq!(value[0]["status"], "open");
        assert_eq!(value[0]["banner"], "hello");
        assert!(value[1]["banner"].is_null());

        let parsed: Vec<ScanResult> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, results);
    }

    #[test]
    fn test_json_empty() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
    }
}
