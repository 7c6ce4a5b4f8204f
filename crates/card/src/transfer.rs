//! Chunked transfer engine for data larger than one APDU.
//!
//! Uploads slice the source into offset-addressed chunks and stop at the
//! first refused chunk. Downloads keep requesting full chunks until the
//! card signals end of data with a wrong-length status, an empty payload,
//! or a short read.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use tessera_apdu_core::prelude::*;

use crate::commands::{ReadChunkCommand, WriteChunkCommand};
use crate::constants::{IMAGE_CAPACITY, INFO_BLOCK, MAX_CHUNK};
use crate::credential::PinCredential;
use crate::error::{Error, Result};
use crate::session::Session;

/// One slice of a planned upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset into the card-side buffer
    pub offset: u16,
    /// Data bytes this chunk carries
    pub len: usize,
}

/// Iterator over the chunks needed to upload `total` bytes with a fixed
/// per-chunk capacity. Offsets are strictly increasing and contiguous.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    total: usize,
    capacity: usize,
    offset: usize,
}

impl ChunkPlan {
    /// Plan chunks for `total` bytes at `capacity` bytes per chunk
    pub fn new(total: usize, capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            total,
            capacity,
            offset: 0,
        }
    }
}

impl Iterator for ChunkPlan {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.offset >= self.total {
            return None;
        }
        let len = self.capacity.min(self.total - self.offset);
        let chunk = Chunk {
            offset: self.offset as u16,
            len,
        };
        self.offset += len;
        Some(chunk)
    }
}

/// Usable data bytes per chunk once the PIN header is accounted for.
///
/// With a PIN each chunk carries `[len][pin]` ahead of the data, and the
/// remaining room is rounded down to a whole number of 16-byte blocks so
/// the card-side cipher never sees a partial block. Never less than one
/// block.
pub fn chunk_capacity(pin: Option<&PinCredential>) -> usize {
    match pin {
        None => MAX_CHUNK,
        Some(pin) => {
            let room = MAX_CHUNK.saturating_sub(pin.overhead());
            let blocks = (room / INFO_BLOCK) * INFO_BLOCK;
            blocks.max(INFO_BLOCK)
        }
    }
}

/// Uploads `data` to the card via repeated chunk writes under `ins`.
///
/// Input longer than [`IMAGE_CAPACITY`] is truncated before planning.
/// Returns the number of bytes written; a refused chunk aborts the
/// transfer at its offset.
pub fn upload<T: CardTransport>(
    session: &mut Session<T>,
    ins: u8,
    data: &[u8],
    pin: Option<&PinCredential>,
) -> Result<usize> {
    let data = if data.len() > IMAGE_CAPACITY {
        warn!(
            len = data.len(),
            capacity = IMAGE_CAPACITY,
            "image exceeds card capacity, truncating"
        );
        &data[..IMAGE_CAPACITY]
    } else {
        data
    };

    let capacity = chunk_capacity(pin);
    for chunk in ChunkPlan::new(data.len(), capacity) {
        let slice = &data[chunk.offset as usize..chunk.offset as usize + chunk.len];
        let payload = match pin {
            Some(pin) => {
                let mut buf = BytesMut::with_capacity(pin.overhead() + chunk.len);
                buf.put_slice(&pin.prefixed());
                buf.put_slice(slice);
                buf.freeze()
            }
            None => Bytes::copy_from_slice(slice),
        };
        debug!(offset = chunk.offset, len = chunk.len, "writing chunk");
        let response = session.execute(&WriteChunkCommand::at_offset(ins, chunk.offset, payload))?;
        if !response.is_success() {
            return Err(Error::TransferAborted {
                offset: chunk.offset,
                status: response.status(),
            });
        }
    }
    Ok(data.len())
}

/// Downloads the card-side buffer via repeated chunk reads under `ins`.
///
/// Each read requests a full chunk; the transfer ends when the card
/// reports a wrong-length status or returns less than a full chunk.
pub fn download<T: CardTransport>(
    session: &mut Session<T>,
    ins: u8,
    pin: &PinCredential,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut offset: usize = 0;
    while offset < IMAGE_CAPACITY {
        let response = session.execute(&ReadChunkCommand::at_offset(ins, offset as u16, pin))?;
        match response.outcome() {
            Outcome::Success => {
                let data = response.data();
                out.extend_from_slice(data);
                debug!(offset, len = data.len(), "read chunk");
                if data.is_empty() || data.len() < MAX_CHUNK {
                    break;
                }
                offset += data.len();
            }
            Outcome::WrongLength => break,
            Outcome::SecurityNotSatisfied => {
                return Err(Error::SecurityPrecondition("PIN not verified"));
            }
            _ => {
                return Err(Error::TransferAborted {
                    offset: offset as u16,
                    status: response.status(),
                });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ins;
    use crate::session::SessionState;
    use tessera_apdu_core::transport::MockTransport;

    fn connected(transport: MockTransport) -> Session<MockTransport> {
        let mut session = Session::new();
        session.attach(transport);
        session
    }

    #[test]
    fn test_plan_covers_input_exactly() {
        let chunks: Vec<Chunk> = ChunkPlan::new(500, 240).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], Chunk { offset: 0, len: 240 });
        assert_eq!(chunks[1], Chunk { offset: 240, len: 240 });
        assert_eq!(chunks[2], Chunk { offset: 480, len: 20 });
    }

    #[test]
    fn test_plan_empty_input() {
        assert_eq!(ChunkPlan::new(0, 240).count(), 0);
    }

    #[test]
    fn test_plan_offsets_strictly_increase() {
        let mut last: Option<u16> = None;
        for chunk in ChunkPlan::new(IMAGE_CAPACITY, 240) {
            if let Some(prev) = last {
                assert!(chunk.offset > prev);
            }
            last = Some(chunk.offset);
        }
    }

    #[test]
    fn test_capacity_without_pin() {
        assert_eq!(chunk_capacity(None), 240);
    }

    #[test]
    fn test_capacity_with_pin_rounds_to_blocks() {
        // 240 - 5 = 235 -> 224
        let pin = PinCredential::new("1234");
        assert_eq!(chunk_capacity(Some(&pin)), 224);
        assert_eq!(chunk_capacity(Some(&pin)) % 16, 0);
    }

    #[test]
    fn test_capacity_floor_is_one_block() {
        let long = PinCredential::new(&"9".repeat(230));
        assert_eq!(chunk_capacity(Some(&long)), 16);
    }

    #[test]
    fn test_upload_truncates_oversized_input() {
        let transport = MockTransport::with_responses(vec![Bytes::from_static(&[0x90, 0x00])]);
        let mut session = connected(transport);
        let written = upload(&mut session, ins::WRITE_IMAGE, &[0xAB; 5000], None).unwrap();
        assert_eq!(written, IMAGE_CAPACITY);
    }

    #[test]
    fn test_upload_aborts_on_refused_chunk() {
        let transport = MockTransport::with_responses(vec![
            Bytes::from_static(&[0x90, 0x00]),
            Bytes::from_static(&[0x6A, 0x84]),
        ]);
        let mut session = connected(transport);
        let err = upload(&mut session, ins::WRITE_IMAGE, &[0x11; 500], None).unwrap_err();
        match err {
            Error::TransferAborted { offset, status } => {
                assert_eq!(offset, 240);
                assert_eq!(status.to_u16(), 0x6A84);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[test]
    fn test_upload_chunk_carries_offset_and_pin() {
        let transport = MockTransport::with_responses(vec![Bytes::from_static(&[0x90, 0x00])]);
        let mut session = connected(transport);
        let pin = PinCredential::new("1234");
        upload(&mut session, ins::WRITE_IMAGE, &[0xEE; 300], Some(&pin)).unwrap();

        let commands = &session.transport().unwrap().commands;
        assert_eq!(commands.len(), 2);
        // second chunk starts where the first (224 data bytes) ended
        assert_eq!(commands[1][2], 0x00);
        assert_eq!(commands[1][3], 224);
        // each chunk leads with the pin header
        assert_eq!(commands[0][5], 4);
        assert_eq!(&commands[0][6..10], b"1234");
    }

    #[test]
    fn test_download_stops_on_wrong_length() {
        let transport = MockTransport::with_responses(vec![
            {
                let mut first = vec![0x55; MAX_CHUNK];
                first.extend_from_slice(&[0x90, 0x00]);
                Bytes::from(first)
            },
            Bytes::from_static(&[0x67, 0x00]),
        ]);
        let mut session = connected(transport);
        let pin = PinCredential::new("1234");
        let image = download(&mut session, ins::READ_IMAGE, &pin).unwrap();
        assert_eq!(image.len(), MAX_CHUNK);
        assert_eq!(session.transport().unwrap().commands.len(), 2);
    }

    #[test]
    fn test_download_stops_on_short_read() {
        let transport = MockTransport::with_responses(vec![{
            let mut first = vec![0x55; 100];
            first.extend_from_slice(&[0x90, 0x00]);
            Bytes::from(first)
        }]);
        let mut session = connected(transport);
        let pin = PinCredential::new("1234");
        let image = download(&mut session, ins::READ_IMAGE, &pin).unwrap();
        assert_eq!(image.len(), 100);
        assert_eq!(session.transport().unwrap().commands.len(), 1);
    }

    #[test]
    fn test_download_requires_verified_pin() {
        let transport = MockTransport::with_responses(vec![Bytes::from_static(&[0x69, 0x82])]);
        let mut session = connected(transport);
        let pin = PinCredential::new("1234");
        assert!(matches!(
            download(&mut session, ins::READ_IMAGE, &pin),
            Err(Error::SecurityPrecondition("PIN not verified"))
        ));
    }

    #[test]
    fn test_download_bounded_by_capacity() {
        // card keeps answering full chunks; the loop must still stop
        let full = {
            let mut bytes = vec![0xAA; MAX_CHUNK];
            bytes.extend_from_slice(&[0x90, 0x00]);
            Bytes::from(bytes)
        };
        let transport = MockTransport::with_responses(vec![full]);
        let mut session = connected(transport);
        let pin = PinCredential::new("1234");
        let image = download(&mut session, ins::READ_IMAGE, &pin).unwrap();
        assert!(image.len() >= IMAGE_CAPACITY);
        let reads = session.transport().unwrap().commands.len();
        assert!(reads <= IMAGE_CAPACITY / MAX_CHUNK + 1);
    }

    #[test]
    fn test_round_trip_through_simulated_store() {
        let store = std::sync::Arc::new(std::sync::Mutex::new(vec![0u8; IMAGE_CAPACITY]));
        let len = std::sync::Arc::new(std::sync::Mutex::new(0usize));

        let handler = {
            let store = store.clone();
            let len = len.clone();
            move |command: &[u8]| -> Bytes {
                let ins_byte = command[1];
                let offset = ((command[2] as usize) << 8) | command[3] as usize;
                match ins_byte {
                    ins::WRITE_IMAGE => {
                        let lc = command[4] as usize;
                        let body = &command[5..5 + lc];
                        let pin_len = body[0] as usize;
                        let data = &body[1 + pin_len..];
                        let mut store = store.lock().unwrap();
                        store[offset..offset + data.len()].copy_from_slice(data);
                        let mut len = len.lock().unwrap();
                        *len = (*len).max(offset + data.len());
                        Bytes::from_static(&[0x90, 0x00])
                    }
                    ins::READ_IMAGE => {
                        let total = *len.lock().unwrap();
                        if offset >= total {
                            return Bytes::from_static(&[0x67, 0x00]);
                        }
                        let end = (offset + MAX_CHUNK).min(total);
                        let mut reply = store.lock().unwrap()[offset..end].to_vec();
                        reply.extend_from_slice(&[0x90, 0x00]);
                        Bytes::from(reply)
                    }
                    _ => Bytes::from_static(&[0x6D, 0x00]),
                }
            }
        };

        let mut session = connected(MockTransport::with_handler(handler));
        let pin = PinCredential::new("1234");
        let image: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();

        let written = upload(&mut session, ins::WRITE_IMAGE, &image, Some(&pin)).unwrap();
        assert_eq!(written, image.len());

        let copy = download(&mut session, ins::READ_IMAGE, &pin).unwrap();
        assert_eq!(copy, image);
    }
}
