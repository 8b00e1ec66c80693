use crate::ReplayError;

/// Length of the record key, taken verbatim from the front of each line.
pub const KEY_LEN: usize = 16;

const TICK_START: usize = 6;
const TICK_END: usize = 9;

/// One line of ticker data split into its wire parts. Borrows from the source
/// line: the payload is the whole line as read, not a re-encoding.
#[derive(Debug, PartialEq)]
pub struct ParsedRecord<'a> {
    pub key: &'a [u8],
    pub tick: u16,
    pub payload: &'a [u8],
}

/// Splits a raw line into key, tick and payload. The tick is the 3-digit
/// cyclic counter at bytes [6, 9).
pub fn parse_line(line: &[u8]) -> Result<ParsedRecord<'_>, ReplayError> {
    if line.len() < KEY_LEN {
        return Err(malformed(line, "line shorter than the 16 byte key"));
    }

    let digits = &line[TICK_START..TICK_END];
    if !digits.iter().all(|b| b.is_ascii_digit()) {
        return Err(malformed(line, "tick bytes [6, 9) are not ASCII digits"));
    }
    let tick = digits
        .iter()
        .fold(0u16, |acc, &b| acc * 10 + u16::from(b - b'0'));

    Ok(ParsedRecord {
        key: &line[..KEY_LEN],
        tick,
        payload: line,
    })
}

fn malformed(line: &[u8], reason: &'static str) -> ReplayError {
    ReplayError::MalformedRecord {
        line: String::from_utf8_lossy(line).into_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_key_tick_and_payload() {
        let line = b"090030015NVDA000bid=1.23 ask=1.25";
        let record = parse_line(line).expect("valid line");

        assert_eq!(record.key, &line[..16]);
        assert_eq!(record.tick, 15);
        assert_eq!(record.payload, &line[..]);
    }

    #[test]
    fn tick_is_parsed_base_10_with_leading_zeros() {
        let record = parse_line(b"090030007AAPL000trade").expect("valid line");
        assert_eq!(record.tick, 7);

        let record = parse_line(b"090030999AAPL000trade").expect("valid line");
        assert_eq!(record.tick, 999);
    }

    #[test]
    fn short_line_is_rejected() {
        let err = parse_line(b"too short").expect_err("line shorter than key");
        assert!(matches!(err, ReplayError::MalformedRecord { .. }));
    }

    #[test]
    fn non_digit_tick_is_rejected() {
        let err = parse_line(b"090030x15NVDA000bid=1.23").expect_err("bad tick");
        match err {
            ReplayError::MalformedRecord { line, .. } => {
                assert_eq!(line, "090030x15NVDA000bid=1.23");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
