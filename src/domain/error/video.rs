// SPDX-License-Identifier: MPL-2.0
//! Video pipeline errors.

use std::fmt;

/// Specific error types for container and codec failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    /// Container format is not recognised.
    UnsupportedFormat,

    /// Codec is not supported by the linked codec library.
    UnsupportedCodec(String),

    /// File appears corrupted or has invalid data.
    CorruptedFile,

    /// Container holds no stream the session can decode.
    NoDecodableStream,

    /// Decoding failed for one packet.
    DecodingFailed(String),

    /// The container refused to reposition.
    SeekFailed(String),

    /// I/O error (file not found, permission denied, etc.)
    IoError(String),

    /// Generic error with raw message.
    Other(String),
}

impl VideoError {
    /// Categorises a raw codec-library message.
    #[must_use]
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Check codec/decoder errors first (they might contain "not found")
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return VideoError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no such file")
            || (msg_lower.contains("not found") && !msg_lower.contains("decoder"))
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
        {
            return VideoError::IoError(msg.to_string());
        }

        if msg_lower.contains("no video stream")
            || msg_lower.contains("no decodable stream")
            || msg_lower.contains("stream not found")
        {
            return VideoError::NoDecodableStream;
        }

        if msg_lower.contains("seek") {
            return VideoError::SeekFailed(msg.to_string());
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scaling")
            || msg_lower.contains("decode")
            || msg_lower.contains("unsupported")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        VideoError::Other(msg.to_string())
    }

    /// Tries to extract a codec name from an error message.
    fn extract_codec_name(msg: &str) -> Option<String> {
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2", "prores",
        ];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::UnsupportedFormat => write!(f, "Unsupported container format"),
            VideoError::UnsupportedCodec(codec) => write!(f, "Unsupported codec: {codec}"),
            VideoError::CorruptedFile => write!(f, "Media file is corrupted"),
            VideoError::NoDecodableStream => write!(f, "No decodable stream found"),
            VideoError::DecodingFailed(msg) => write!(f, "Decoding failed: {msg}"),
            VideoError::SeekFailed(msg) => write!(f, "Seek failed: {msg}"),
            VideoError::IoError(msg) => write!(f, "I/O error: {msg}"),
            VideoError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for VideoError {}
