/// RIFF/WAVE container parsing
///
/// Works on a borrowed byte slice; chunk payloads are sub-slices of the input
/// and nothing is copied until sample conversion.
use sonora_core::{ChunkKind, DecodeError, Result};
use std::fmt;

/// `WAVE_FORMAT_PCM`, the only format code accepted in a `fmt ` chunk
pub const WAVE_FORMAT_PCM: u16 = 1;

/// Size of the `RIFF` header: signature, total size, form type
const RIFF_HEADER_LEN: usize = 12;

/// Size of a chunk header: tag and little-endian length
const CHUNK_HEADER_LEN: usize = 8;

/// Minimum `fmt ` payload (PCMWAVEFORMAT)
const FMT_MIN_LEN: usize = 16;

/// Four-byte chunk identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    pub const RIFF: Self = Self(*b"RIFF");
    pub const WAVE: Self = Self(*b"WAVE");
    pub const FMT: Self = Self(*b"fmt ");
    pub const DATA: Self = Self(*b"data");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(&self.0))
    }
}

/// One tagged, length-prefixed block borrowed from the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerChunk<'a> {
    pub tag: ChunkTag,
    /// Declared length; always equal to `payload.len()`
    pub size: u32,
    pub payload: &'a [u8],
}

/// Validated view over a RIFF/WAVE byte stream
#[derive(Debug, Clone, Copy)]
pub struct RiffReader<'a> {
    body: &'a [u8],
}

impl<'a> RiffReader<'a> {
    /// Check the `RIFF` signature and `WAVE` form type
    ///
    /// The total-size field must be present but its value is not trusted;
    /// the chunk walk is bounded by the actual buffer length instead.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let signature = &bytes[..bytes.len().min(4)];
        if signature != ChunkTag::RIFF.as_bytes() {
            return Err(DecodeError::InvalidSignature {
                expected: "RIFF",
                found: escape(signature),
            });
        }

        if bytes.len() < RIFF_HEADER_LEN {
            return Err(DecodeError::TruncatedStream {
                tag: ChunkTag::RIFF.to_string(),
                declared: RIFF_HEADER_LEN as u64,
                available: bytes.len() as u64,
            });
        }

        let form_type = &bytes[8..RIFF_HEADER_LEN];
        if form_type != ChunkTag::WAVE.as_bytes() {
            return Err(DecodeError::InvalidSignature {
                expected: "WAVE",
                found: escape(form_type),
            });
        }

        Ok(Self {
            body: &bytes[RIFF_HEADER_LEN..],
        })
    }

    /// Iterate the chunks following the header
    pub fn chunks(&self) -> Chunks<'a> {
        Chunks {
            remaining: self.body,
            failed: false,
        }
    }
}

/// Iterator over container chunks
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    remaining: &'a [u8],
    failed: bool,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<ContainerChunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining.is_empty() {
            return None;
        }

        if self.remaining.len() < CHUNK_HEADER_LEN {
            self.failed = true;
            return Some(Err(DecodeError::TruncatedStream {
                tag: "chunk header".to_string(),
                declared: CHUNK_HEADER_LEN as u64,
                available: self.remaining.len() as u64,
            }));
        }

        let (header, rest) = self.remaining.split_at(CHUNK_HEADER_LEN);
        let tag = ChunkTag([header[0], header[1], header[2], header[3]]);
        let size = read_u32(header, 4);

        if size as usize > rest.len() {
            self.failed = true;
            return Some(Err(DecodeError::TruncatedStream {
                tag: tag.to_string(),
                declared: u64::from(size),
                available: rest.len() as u64,
            }));
        }

        let (payload, tail) = rest.split_at(size as usize);
        self.remaining = tail;

        Some(Ok(ContainerChunk { tag, size, payload }))
    }
}

/// Contents of the `fmt ` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub audio_format_code: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl FormatDescriptor {
    /// Parse a `fmt ` payload
    ///
    /// Byte rate and block align are skipped; both are derivable from the
    /// other fields. Anything past the first 16 bytes (`cbSize` and
    /// extension data) is ignored.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() < FMT_MIN_LEN {
            return Err(DecodeError::TruncatedStream {
                tag: ChunkTag::FMT.to_string(),
                declared: FMT_MIN_LEN as u64,
                available: payload.len() as u64,
            });
        }

        let audio_format_code = read_u16(payload, 0);
        if audio_format_code != WAVE_FORMAT_PCM {
            return Err(DecodeError::UnsupportedCodec(audio_format_code));
        }

        let descriptor = Self {
            audio_format_code,
            channels: read_u16(payload, 2),
            sample_rate: read_u32(payload, 4),
            bits_per_sample: read_u16(payload, 14),
        };

        if descriptor.channels == 0 {
            return Err(DecodeError::invalid_format("fmt chunk declares zero channels"));
        }
        if descriptor.sample_rate == 0 {
            return Err(DecodeError::invalid_format(
                "fmt chunk declares a zero sample rate",
            ));
        }

        Ok(descriptor)
    }

    /// Bytes occupied by one sample of one channel
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample).div_ceil(8)
    }

    /// Bytes occupied by one interleaved frame
    pub fn block_align(&self) -> usize {
        self.bytes_per_sample() * usize::from(self.channels)
    }
}

/// The two chunks a WAV decode needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavContents<'a> {
    pub format: FormatDescriptor,
    /// Raw interleaved sample bytes, never empty
    pub data: &'a [u8],
}

/// Walk a whole WAV byte stream and pick out its format and sample data
///
/// `fmt ` and `data` may come in either order with any number of other
/// chunks around them. The first occurrence of each wins.
pub fn parse_wav(bytes: &[u8]) -> Result<WavContents<'_>> {
    let reader = RiffReader::new(bytes)?;

    let mut format = None;
    let mut data = None;

    for chunk in reader.chunks() {
        let chunk = chunk?;
        match chunk.tag {
            ChunkTag::FMT if format.is_none() => {
                format = Some(FormatDescriptor::parse(chunk.payload)?);
            }
            ChunkTag::DATA if data.is_none() && !chunk.payload.is_empty() => {
                data = Some(chunk.payload);
            }
            ChunkTag::FMT | ChunkTag::DATA if !chunk.payload.is_empty() => {
                tracing::warn!(tag = %chunk.tag, size = chunk.size, "Ignoring duplicate chunk");
            }
            _ => {
                tracing::debug!(tag = %chunk.tag, size = chunk.size, "Skipping chunk");
            }
        }
    }

    let format = format.ok_or(DecodeError::MissingChunk(ChunkKind::Format))?;
    let data = data.ok_or(DecodeError::MissingChunk(ChunkKind::Data))?;

    Ok(WavContents { format, data })
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Render identifier bytes for diagnostics, escaping anything non-printable
fn escape(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|b| std::ascii::escape_default(*b))
        .map(char::from)
        .collect()
}
