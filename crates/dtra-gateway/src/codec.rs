use bytes::BytesMut;
use dtra_core::diameter::HEADER_LEN;
use dtra_core::{DiameterHeader, DiameterPacket, GatewayError};
use tokio_util::codec::{Decoder, Encoder};

/// Largest Diameter message accepted from a peer
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// One length-delimited message read off the stream
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Packet(DiameterPacket),
    /// Header was readable but the AVPs were not
    Malformed {
        header: DiameterHeader,
        reason: String,
    },
}

/// Frames Diameter messages on a byte stream using the 24-bit length in
/// the header
#[derive(Debug, Default, Clone, Copy)]
pub struct DiameterCodec;

impl Decoder for DiameterCodec {
    type Item = InboundFrame;
    type Error = GatewayError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }

        // Version or length problems leave no way to find the next frame
        let header = DiameterHeader::parse(&src[..HEADER_LEN])?;
        let length = header.length as usize;
        if length > MAX_FRAME_LEN {
            return Err(GatewayError::Decode(format!(
                "frame of {length} bytes exceeds {MAX_FRAME_LEN}"
            )));
        }

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let frame = src.split_to(length);
        let item = match DiameterPacket::parse(&frame) {
            Ok(packet) => InboundFrame::Packet(packet),
            Err(e) => InboundFrame::Malformed {
                header,
                reason: e.to_string(),
            },
        };
        Ok(Some(item))
    }
}

impl Encoder<DiameterPacket> for DiameterCodec {
    type Error = GatewayError;

    fn encode(&mut self, item: DiameterPacket, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = item.serialize();
        dst.reserve(bytes.len());
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}
