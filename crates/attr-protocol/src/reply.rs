use crate::error::ProtocolError;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// One resolution reply: the fixed four attributes the wire schema
/// carries, always written in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveReply {
    pub transport: String,
    pub nexthop: String,
    pub recipient: String,
    pub flags: u32,
}

/// Write one framed reply to `writer` and flush it.
///
/// A write or flush failure here is the caller's cue to log a warning
/// and treat the request as failed (the peer may never see the
/// reply), rather than retrying the write or panicking: the
/// connection is probably already gone.
pub async fn write_reply<W>(writer: &mut W, reply: &ResolveReply) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let mut out = String::new();
    out.push_str("transport=");
    out.push_str(&reply.transport);
    out.push('\n');
    out.push_str("nexthop=");
    out.push_str(&reply.nexthop);
    out.push('\n');
    out.push_str("recipient=");
    out.push_str(&reply.recipient);
    out.push('\n');
    out.push_str("flags=");
    out.push_str(&reply.flags.to_string());
    out.push('\n');
    out.push('\n');

    writer
        .write_all(out.as_bytes())
        .await
        .map_err(ProtocolError::Io)?;
    writer.flush().await.map_err(ProtocolError::Io)
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn writes_attributes_in_fixed_order() {
        let reply = ResolveReply {
            transport: "smtp".to_string(),
            nexthop: "mx.example.com".to_string(),
            recipient: "user@example.com".to_string(),
            flags: 16,
        };
        let mut out = Vec::new();
        write_reply(&mut out, &reply).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "transport=smtp\nnexthop=mx.example.com\nrecipient=user@example.com\nflags=16\n\n"
        );
    }
}
