//! CSV output formatting.

use crate::error::ExportResult;
use crate::scanner::ScanResult;
use std::io::Write;

/// Column order of CSV output.
pub const CSV_HEADER: [&str; 4] = ["port", "service", "status", "banner"];

/// Write results as CSV. The header is written even when there are no results.
pub fn write_csv<W: Write>(writer: W, results: &[ScanResult]) -> ExportResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(CSV_HEADER)?;

    for result in results {
        wtr.write_record([
            result.port.to_string().as_str(),
            result.service.as_str(),
            result.status.to_string().as_str(),
            result.banner.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    #[test]
    fn test_csv_columns() {
        let results = vec![
            ScanResult::open(Port::new(22).unwrap(), Some("SSH-2.0-OpenSSH_9.6".into())),
            ScanResult::open(Port::new(443).unwrap(), None),
        ];
        let mut buf = Vec::new();
        write_csv(&mut buf, &results).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "port,service,status,banner");
        assert_eq!(lines[1], "22,SSH,open,SSH-2.0-OpenSSH_9.6");
        assert_eq!(lines[2], "443,HTTPS,open,");
    }

    #[test]
    fn test_csv_quotes_multiline_banner() {
        let results = vec![ScanResult::open(
            Port::new(80).unwrap(),
            Some("HTTP/1.0 200 OK\r\nServer: x, y".into()),
        )];
        let mut buf = Vec::new();
        write_csv(&mut buf, &results).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[3], "HTTP/1.0 200 OK\r\nServer: x, y");
    }

    #[test]
    fn test_csv_empty_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "port,service,status,banner\n");
    }
}
