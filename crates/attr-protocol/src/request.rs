use crate::error::ProtocolError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One resolution request: a single recipient address to resolve.
/// The wire schema carries exactly one attribute, `addr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub addr: String,
}

/// Read one framed request off `reader`: a run of `name=value` lines
/// terminated by a blank line.
///
/// Returns `Ok(None)` on a clean close at a request boundary (no bytes
/// read at all) so the caller's connection loop can exit quietly.
/// Any other read failure, or a close in the middle of a request, is
/// an error: per the protocol's read-error semantics, the caller
/// closes the connection rather than trying to resynchronize.
pub async fn read_request<R>(reader: &mut R) -> Result<Option<ResolveRequest>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut addr = None;
    let mut saw_any_line = false;

    loop {
        let mut line = String::new();
        let n = reader
            .read_line(&mut line)
            .await
            .map_err(ProtocolError::Io)?;
        if n == 0 {
            if saw_any_line {
                return Err(ProtocolError::UnexpectedEof);
            }
            return Ok(None);
        }
        saw_any_line = true;

        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            break;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ProtocolError::Malformed(line.to_string()))?;
        match key {
            "addr" => addr = Some(value.to_string()),
            other => return Err(ProtocolError::UnknownAttribute(other.to_string())),
        }
    }

    let addr = addr.ok_or(ProtocolError::MissingAttribute("addr"))?;
    Ok(Some(ResolveRequest { addr }))
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn reads_a_single_attribute_request() {
        let data = b"addr=user@example.com\n\n".to_vec();
        let mut reader = BufReader::new(&data[..]);
        let req = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(req.addr, "user@example.com");
    }

    #[tokio::test]
    async fn clean_close_at_boundary_returns_none() {
        let data: Vec<u8> = Vec::new();
        let mut reader = BufReader::new(&data[..]);
        assert!(read_request(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_attribute_is_rejected() {
        let data = b"addr=user@example.com\nbogus=1\n\n".to_vec();
        let mut reader = BufReader::new(&data[..]);
        assert!(matches!(
            read_request(&mut reader).await,
            Err(ProtocolError::UnknownAttribute(_))
        ));
    }

    #[tokio::test]
    async fn missing_required_attribute_is_rejected() {
        let data = b"\n".to_vec();
        let mut reader = BufReader::new(&data[..]);
        assert!(matches!(
            read_request(&mut reader).await,
            Err(ProtocolError::MissingAttribute("addr"))
        ));
    }

    #[tokio::test]
    async fn truncated_request_is_an_error() {
        let data = b"addr=user@example.com\n".to_vec();
        let mut reader = BufReader::new(&data[..]);
        assert!(matches!(
            read_request(&mut reader).await,
            Err(ProtocolError::UnexpectedEof)
        ));
    }
}
