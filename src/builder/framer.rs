//! Splits the incoming byte stream into JSON frames. Frames are delimited
//! by unescaped `$` bytes; a literal `$` travels as `#$` and is restored
//! after the frame closes.

use crate::error::Result;

#[derive(Debug, Default)]
pub struct FrameReader {
    carry: Vec<u8>,
    in_frame: bool,
    last: Option<u8>,
}

impl FrameReader {
    pub fn new() -> Self {
        FrameReader::default()
    }

    /// Feeds one chunk, invoking `sink` for every frame that closes inside
    /// it. Partial frames are carried over to the next call, so chunk
    /// boundaries may fall anywhere, including between `#` and `$`.
    pub fn feed<F>(&mut self, chunk: &[u8], sink: &mut F) -> Result<()>
    where
        F: FnMut(&str) -> Result<()>,
    {
        for &byte in chunk {
            let is_delimiter = byte == b'$' && self.last != Some(b'#');
            if is_delimiter {
                if self.in_frame {
                    let frame = String::from_utf8(unescape(&self.carry))?;
                    self.carry.clear();
                    self.in_frame = false;
                    self.last = Some(byte);
                    sink(&frame)?;
                    continue;
                }
                self.in_frame = true;
            } else if self.in_frame {
                self.carry.push(byte);
            }
            self.last = Some(byte);
        }
        Ok(())
    }
}

/// Restores `#$` to `$`, left to right without overlap.
fn unescape(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'#' && raw.get(i + 1) == Some(&b'$') {
            out.push(b'$');
            i += 2;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_frames(chunks: &[&[u8]]) -> Vec<String> {
        let mut reader = FrameReader::new();
        let mut frames = Vec::new();
        for chunk in chunks {
            reader
                .feed(chunk, &mut |frame| {
                    frames.push(frame.to_string());
                    Ok(())
                })
                .unwrap();
        }
        frames
    }

    #[test]
    fn splits_consecutive_frames() {
        assert_eq!(collect_frames(&[b"$a$$b$"]), vec!["a", "b"]);
    }

    #[test]
    fn unescapes_embedded_delimiter() {
        assert_eq!(collect_frames(&[b"${\"k\":\"#$\"}$"]), vec!["{\"k\":\"$\"}"]);
    }

    #[test]
    fn escape_survives_chunk_boundary() {
        assert_eq!(collect_frames(&[b"$a#", b"$b$"]), vec!["a$b"]);
    }

    #[test]
    fn delimiter_at_chunk_start_checks_previous_byte() {
        assert_eq!(collect_frames(&[b"$a", b"$"]), vec!["a"]);
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        assert_eq!(collect_frames(&[b"$a$junk", b"$open"]), vec!["a"]);
    }

    #[test]
    fn any_chunking_yields_identical_frames() {
        let stream = b"$one$${\"x\":\"#$y\"}$$tail$";
        let whole = collect_frames(&[stream.as_slice()]);
        for split in 1..stream.len() {
            let (a, b) = stream.split_at(split);
            assert_eq!(collect_frames(&[a, b]), whole, "split at {split}");
        }
    }
}
