//! HTTP agent construction and bounded response reading.

use std::io::{self, Read};
use std::time::Duration;

/// Build an agent whose requests give up after `timeout` in total.
pub(crate) fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout(timeout)
        .build()
}

/// Read a response into memory, enforcing a maximum byte size.
pub(crate) fn read_response_bytes(
    response: ureq::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, io::Error> {
    check_content_length(&response, max_bytes)?;
    let reader = response.into_reader();
    let mut limited = reader.take(max_bytes as u64 + 1);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response exceeded {max_bytes} bytes"),
        ));
    }
    Ok(bytes)
}

fn check_content_length(response: &ureq::Response, max_bytes: usize) -> Result<(), io::Error> {
    let Some(length) = response.header("Content-Length") else {
        return Ok(());
    };
    let Ok(length) = length.parse::<u64>() else {
        return Ok(());
    };
    if length > max_bytes as u64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response too large: {length} bytes"),
        ));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_server::serve;
    use super::*;

    fn test_agent() -> ureq::Agent {
        agent(Duration::from_secs(5))
    }

    #[test]
    fn read_response_bytes_rejects_body_over_max() {
        let url = serve(vec![("/big".to_string(), vec![b'a'; 32])]);
        let response = test_agent().get(&format!("{url}/big")).call().unwrap();
        let err = read_response_bytes(response, 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn read_response_bytes_accepts_under_limit() {
        let url = serve(vec![("/hello".to_string(), b"hello".to_vec())]);
        let response = test_agent().get(&format!("{url}/hello")).call().unwrap();
        let bytes = read_response_bytes(response, 16).unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn not_found_is_a_status_error() {
        let url = serve(Vec::new());
        let err = test_agent().get(&format!("{url}/nope")).call().unwrap_err();
        assert!(matches!(err, ureq::Error::Status(404, _)));
    }
}
