//! Proxy parser module for turning candidate list lines into candidates

use crate::proxy::models::Candidate;

/// Proxy parser for the `address,port[,country[,organization]]` list format
pub struct ProxyParser;

impl ProxyParser {
    /// Parse a single candidate line
    ///
    /// Returns `None` for lines that are not usable candidates: comments,
    /// blanks, fewer than two fields, or an empty address or port. Fields
    /// past the fourth are ignored.
    pub fn parse_line(line: &str) -> Option<Candidate> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 2 {
            return None;
        }

        let (address, port) = (parts[0], parts[1]);
        if address.is_empty() || port.is_empty() {
            return None;
        }

        let declared = |idx: usize| {
            parts
                .get(idx)
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string())
        };

        Some(Candidate::new(address, port).with_declared(declared(2), declared(3)))
    }

    /// Parse a batch of lines, dropping the ones that are not candidates
    pub fn parse_lines<I, S>(lines: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| Self::parse_line(line.as_ref()))
            .collect()
    }
}
