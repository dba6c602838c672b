/// Compressed decoder adapters built on Symphonia
///
/// Each adapter registers exactly one container reader and one codec, so
/// handing it bytes of a different format fails instead of silently
/// decoding through another path. The MP3 adapter also registers the ID3v2
/// tag reader: tags are consumed before the search for the first frame
/// starts, so large embedded artwork does not exhaust the 1 MiB search window.
use sonora_core::{CompressedDecoder, DecodeError, DecodedAudio, Result, SampleRate};
use std::io::Cursor;
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CodecRegistry, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, Probe};
use symphonia::default::codecs::{MpaDecoder, VorbisDecoder};
use symphonia::default::formats::{MpaReader, OggReader};
use symphonia_metadata::id3v2::Id3v2Reader;

/// MPEG audio layer III adapter
pub struct Mp3Decoder {
    probe: Probe,
    codecs: CodecRegistry,
}

impl Mp3Decoder {
    pub fn new() -> Self {
        let mut probe = Probe::default();
        probe.register_all::<Id3v2Reader>();
        probe.register_all::<MpaReader>();
        let mut codecs = CodecRegistry::new();
        codecs.register_all::<MpaDecoder>();
        Self { probe, codecs }
    }
}

impl Default for Mp3Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressedDecoder for Mp3Decoder {
    fn name(&self) -> &'static str {
        "MP3"
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<DecodedAudio> {
        decode_all(self.name(), "mp3", bytes, &self.probe, &self.codecs)
    }
}

/// Vorbis-in-Ogg adapter
pub struct OggVorbisDecoder {
    probe: Probe,
    codecs: CodecRegistry,
}

impl OggVorbisDecoder {
    pub fn new() -> Self {
        let mut probe = Probe::default();
        probe.register_all::<OggReader>();
        let mut codecs = CodecRegistry::new();
        codecs.register_all::<VorbisDecoder>();
        Self { probe, codecs }
    }
}

impl Default for OggVorbisDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressedDecoder for OggVorbisDecoder {
    fn name(&self) -> &'static str {
        "Ogg/Vorbis"
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<DecodedAudio> {
        decode_all(self.name(), "ogg", bytes, &self.probe, &self.codecs)
    }
}

/// Decode every packet of the default track into one interleaved buffer
fn decode_all(
    name: &'static str,
    extension: &str,
    bytes: Vec<u8>,
    probe: &Probe,
    codecs: &CodecRegistry,
) -> Result<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(extension);

    let probed = probe
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::compressed(name, format!("Failed to probe stream: {}", e)))?;

    let mut format = probed.format;

    // Find the default track
    let track = format
        .default_track()
        .ok_or_else(|| DecodeError::compressed(name, "No audio tracks found"))?;
    let track_id = track.id;

    let mut decoder = codecs
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::compressed(name, format!("Failed to create decoder: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut spec: Option<SignalSpec> = None;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(DecodeError::compressed(
                    name,
                    format!("Error reading packet: {}", e),
                ));
            }
        };

        // Skip packets that are not for the default track
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt frame; the bitstream resyncs on the next packet
                tracing::warn!(format = name, error = %e, "Skipping undecodable packet");
                skipped_packets += 1;
                continue;
            }
            Err(e) => {
                return Err(DecodeError::compressed(name, format!("Decode error: {}", e)));
            }
        };

        let packet_spec = *decoded.spec();
        match spec {
            None => spec = Some(packet_spec),
            Some(first) if first != packet_spec => {
                return Err(DecodeError::compressed(
                    name,
                    format!(
                        "Stream layout changed mid-file ({} Hz/{} ch to {} Hz/{} ch)",
                        first.rate,
                        first.channels.count(),
                        packet_spec.rate,
                        packet_spec.channels.count()
                    ),
                ));
            }
            Some(_) => {}
        }

        let buf = sample_buf
            .get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, packet_spec));
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    let spec = spec.ok_or_else(|| DecodeError::compressed(name, "No audio frames decoded"))?;
    if samples.is_empty() {
        return Err(DecodeError::compressed(name, "No audio frames decoded"));
    }

    if skipped_packets > 0 {
        tracing::warn!(format = name, skipped_packets, "Decoded with skipped packets");
    }

    DecodedAudio::new(
        samples,
        spec.channels.count() as u16,
        SampleRate::new(spec.rate),
        None,
    )
}
