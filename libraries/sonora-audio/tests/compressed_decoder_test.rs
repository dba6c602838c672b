//! MP3 and Ogg/Vorbis adapter tests
//!
//! Tests for:
//! - Stream layout and frame count of a silent MPEG-1 layer III stream
//! - ID3v2 tags larger than the container search window
//! - A minimal Vorbis stream in a hand-assembled Ogg container
//! - The Ogg adapter rejecting an MP3 bitstream
//!
//! Both bitstreams are built in memory so the suite needs no binary fixtures.

use sonora_audio::{decode_file, DecodeOptions, Mp3Decoder, OggVorbisDecoder};
use sonora_core::{CompressedDecoder, DecodeError, SampleRate};
use std::io::Write;
use symphonia::core::checksum::Crc32;
use symphonia::core::io::Monitor;

// ============================================================================
// MP3 HELPERS
// ============================================================================

/// MPEG-1 layer III, no CRC, 128 kbps, 44.1 kHz, mono
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC4];

/// floor(144 * 128000 / 44100) with no padding slot
const MP3_FRAME_LEN: usize = 417;

const MP3_SAMPLES_PER_FRAME: usize = 1152;

/// Frames with zeroed side info and main data decode to silence
fn silent_mp3(frames: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frames * MP3_FRAME_LEN);
    for _ in 0..frames {
        let mut frame = vec![0u8; MP3_FRAME_LEN];
        frame[..4].copy_from_slice(&MP3_FRAME_HEADER);
        bytes.extend_from_slice(&frame);
    }
    bytes
}

/// ID3v2.3 tag whose body is `body_len` bytes of padding
fn id3v2_tag(body_len: u32) -> Vec<u8> {
    let mut tag = Vec::with_capacity(10 + body_len as usize);
    tag.extend_from_slice(b"ID3");
    tag.extend_from_slice(&[0x03, 0x00, 0x00]);
    // Syncsafe size: seven bits per byte
    for shift in [21, 14, 7, 0] {
        tag.push(((body_len >> shift) & 0x7F) as u8);
    }
    tag.resize(10 + body_len as usize, 0);
    tag
}

// ============================================================================
// OGG/VORBIS HELPERS
// ============================================================================

const VORBIS_RATE: u32 = 44_100;

/// Both block sizes are 2^8 samples
const VORBIS_BLOCKSIZES: u8 = 0x88;

/// Every packet after the first overlaps two 256-sample short blocks
const VORBIS_FRAMES_PER_PACKET: usize = (256 + 256) / 4;

/// LSB-first bit packer used by the Vorbis setup header
#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    fn write(&mut self, value: u32, bits: u32) {
        for i in 0..bits {
            if self.len % 8 == 0 {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                let last = self.bytes.len() - 1;
                self.bytes[last] |= 1 << (self.len % 8);
            }
            self.len += 1;
        }
    }

    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

fn vorbis_ident_header(channels: u8) -> Vec<u8> {
    let mut packet = vec![0x01];
    packet.extend_from_slice(b"vorbis");
    packet.extend_from_slice(&0u32.to_le_bytes());
    packet.push(channels);
    packet.extend_from_slice(&VORBIS_RATE.to_le_bytes());
    packet.extend_from_slice(&0u32.to_le_bytes());
    packet.extend_from_slice(&128_000u32.to_le_bytes());
    packet.extend_from_slice(&0u32.to_le_bytes());
    packet.push(VORBIS_BLOCKSIZES);
    packet.push(0x01);
    packet
}

fn vorbis_comment_header() -> Vec<u8> {
    let vendor = b"sonora";
    let mut packet = vec![0x03];
    packet.extend_from_slice(b"vorbis");
    packet.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    packet.extend_from_slice(vendor);
    packet.extend_from_slice(&0u32.to_le_bytes());
    packet.push(0x01);
    packet
}

/// One codebook, one floor 1 without partitions, an empty residue,
/// one mapping and a single short-block mode
fn vorbis_setup_header() -> Vec<u8> {
    let mut bits = BitWriter::default();

    // Codebooks: two entries of length 1, no lookup table
    bits.write(0, 8);
    bits.write(0x56_43_42, 24);
    bits.write(1, 16);
    bits.write(2, 24);
    bits.write(0, 1);
    bits.write(0, 1);
    bits.write(0, 5);
    bits.write(0, 5);
    bits.write(0, 4);

    // Time domain placeholders
    bits.write(0, 6);
    bits.write(0, 16);

    // Floors
    bits.write(0, 6);
    bits.write(1, 16);
    bits.write(0, 5);
    bits.write(0, 2);
    bits.write(8, 4);

    // Residues: type 0 covering nothing
    bits.write(0, 6);
    bits.write(0, 16);
    bits.write(0, 24);
    bits.write(0, 24);
    bits.write(0, 24);
    bits.write(0, 6);
    bits.write(0, 8);
    bits.write(0, 3);
    bits.write(0, 1);

    // Mappings: one submap, no coupling
    bits.write(0, 6);
    bits.write(0, 16);
    bits.write(0, 1);
    bits.write(0, 1);
    bits.write(0, 2);
    bits.write(0, 8);
    bits.write(0, 8);
    bits.write(0, 8);

    // Modes
    bits.write(0, 6);
    bits.write(0, 1);
    bits.write(0, 16);
    bits.write(0, 16);
    bits.write(0, 8);

    // Framing
    bits.write(1, 1);

    let mut packet = vec![0x05];
    packet.extend_from_slice(b"vorbis");
    packet.extend_from_slice(&bits.finish());
    packet
}

const OGG_FIRST_PAGE: u8 = 0x02;
const OGG_LAST_PAGE: u8 = 0x04;
const OGG_SERIAL: u32 = 0x50_4E_4F_53;

/// One Ogg page holding whole packets, each shorter than a lacing segment
fn ogg_page(flags: u8, granule: u64, sequence: u32, packets: &[&[u8]]) -> Vec<u8> {
    let mut page = Vec::new();
    page.extend_from_slice(b"OggS");
    page.push(0);
    page.push(flags);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&OGG_SERIAL.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0; 4]);
    page.push(packets.len() as u8);
    for packet in packets {
        assert!(packet.len() < 255, "packet needs more than one lacing segment");
        page.push(packet.len() as u8);
    }
    for packet in packets {
        page.extend_from_slice(packet);
    }

    let mut crc = Crc32::new(0);
    crc.process_buf_bytes(&page);
    page[22..26].copy_from_slice(&crc.crc().to_le_bytes());
    page
}

/// Headers plus `packets` silent short-block audio packets on a final page
fn silent_ogg_vorbis(packets: usize) -> Vec<u8> {
    // Audio packet: type bit 0, unused floor, nothing else to read
    let audio: &[u8] = &[0x00];
    let audio_packets = vec![audio; packets];
    let granule = (packets.saturating_sub(1) * VORBIS_FRAMES_PER_PACKET) as u64;

    let mut bytes = vorbis_header_pages(0);
    bytes.extend(ogg_page(OGG_LAST_PAGE, granule, 2, &audio_packets));
    bytes
}

/// Identification page followed by the comment and setup page
fn vorbis_header_pages(setup_page_flags: u8) -> Vec<u8> {
    let ident = vorbis_ident_header(1);
    let comment = vorbis_comment_header();
    let setup = vorbis_setup_header();

    let mut bytes = ogg_page(OGG_FIRST_PAGE, 0, 0, &[ident.as_slice()]);
    bytes.extend(ogg_page(
        setup_page_flags,
        0,
        1,
        &[comment.as_slice(), setup.as_slice()],
    ));
    bytes
}

// ============================================================================
// MP3
// ============================================================================

#[test]
fn test_mp3_silent_stream_layout() {
    let audio = Mp3Decoder::new().decode(silent_mp3(40)).unwrap();

    assert_eq!(audio.channels(), 1);
    assert_eq!(audio.sample_rate(), SampleRate::CD_QUALITY);
    assert_eq!(audio.frames(), 40 * MP3_SAMPLES_PER_FRAME);
    assert_eq!(audio.bits_per_sample(), None);
    assert!(audio.samples().iter().all(|s| s.abs() < 1e-6));
}

#[test]
fn test_mp3_behind_large_id3v2_tag() {
    // Larger than the 1 MiB window used to search for the first frame
    let mut bytes = id3v2_tag(1_200_000);
    bytes.extend(silent_mp3(40));

    let audio = Mp3Decoder::new().decode(bytes).unwrap();

    assert_eq!(audio.channels(), 1);
    assert_eq!(audio.sample_rate().as_hz(), 44_100);
    assert_eq!(audio.frames(), 40 * MP3_SAMPLES_PER_FRAME);
}

#[test]
fn test_mp3_behind_small_id3v2_tag() {
    let mut bytes = id3v2_tag(4096);
    bytes.extend(silent_mp3(10));

    let audio = Mp3Decoder::new().decode(bytes).unwrap();
    assert_eq!(audio.frames(), 10 * MP3_SAMPLES_PER_FRAME);
}

#[test]
fn test_mp3_file_dispatch() {
    let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    file.write_all(&silent_mp3(8)).unwrap();

    let audio = decode_file(file.path(), &DecodeOptions::default()).unwrap();
    assert_eq!(audio.channels(), 1);
    assert_eq!(audio.frames(), 8 * MP3_SAMPLES_PER_FRAME);
}

// ============================================================================
// OGG/VORBIS
// ============================================================================

#[test]
fn test_ogg_vorbis_silent_stream_layout() {
    let audio = OggVorbisDecoder::new().decode(silent_ogg_vorbis(11)).unwrap();

    assert_eq!(audio.channels(), 1);
    assert_eq!(audio.sample_rate().as_hz(), VORBIS_RATE);
    // The first packet only primes the overlap window
    assert_eq!(audio.frames(), 10 * VORBIS_FRAMES_PER_PACKET);
    assert_eq!(audio.bits_per_sample(), None);
    assert!(audio.samples().iter().all(|s| s.abs() < 1e-6));
}

#[test]
fn test_ogg_file_dispatch() {
    let mut file = tempfile::Builder::new().suffix(".ogg").tempfile().unwrap();
    file.write_all(&silent_ogg_vorbis(5)).unwrap();

    let audio = decode_file(file.path(), &DecodeOptions::default()).unwrap();
    assert_eq!(audio.channels(), 1);
    assert_eq!(audio.frames(), 4 * VORBIS_FRAMES_PER_PACKET);
}

#[test]
fn test_ogg_headers_without_audio_fail() {
    let bytes = vorbis_header_pages(OGG_LAST_PAGE);

    let err = OggVorbisDecoder::new().decode(bytes).unwrap_err();
    assert!(
        matches!(err, DecodeError::Compressed { format, .. } if format == "Ogg/Vorbis"),
        "unexpected error: {}",
        err
    );
}

// ============================================================================
// CROSS-FORMAT
// ============================================================================

#[test]
fn test_ogg_adapter_rejects_mp3_stream() {
    let err = OggVorbisDecoder::new().decode(silent_mp3(40)).unwrap_err();
    assert!(matches!(err, DecodeError::Compressed { format, .. } if format == "Ogg/Vorbis"));
}
