//! Codecs for the on-disk cache (zstd) and for remote package indices
//! (plain, gzip, xz).

use std::io::Read;

use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

/// zstd level used for everything written to the local tree.
///
/// Snapshots are written once per sync and read many times, so ratio wins
/// over speed.
pub const COMPRESSION_LEVEL: i32 = 19;

/// Extension appended to files stored with the local codec.
pub const COMPRESSED_EXTENSION: &str = "zst";

/// Errors produced by the compression adapter.
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("failed to decode {format} stream: {message}")]
    Decode { format: &'static str, message: String },

    #[error("unsupported remote format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error while compressing: {0}")]
    Io(String),
}

/// Wire format of a remote package index, derived from its URL suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFormat {
    Plain,
    Gzip,
    Xz,
}

impl RemoteFormat {
    /// Suffix appended to the plain index path to request this format.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Xz => ".xz",
            Self::Gzip => ".gz",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Gzip => "gzip",
            Self::Xz => "xz",
        }
    }

    /// Pick the format for a resolved request path.
    ///
    /// Anything without a recognized compression suffix is read as plain
    /// text. Compression suffixes this adapter cannot decode are rejected.
    pub fn from_path(path: &str) -> Result<Self, CompressionError> {
        if path.ends_with(".xz") {
            return Ok(Self::Xz);
        }

        if path.ends_with(".gz") {
            return Ok(Self::Gzip);
        }

        const UNSUPPORTED: [&str; 4] = [".bz2", ".lzma", ".zst", ".lz4"];

        match UNSUPPORTED.iter().find(|suffix| path.ends_with(*suffix)) {
            Some(suffix) => Err(CompressionError::UnsupportedFormat(
                suffix.trim_start_matches('.').to_owned(),
            )),
            None => Ok(Self::Plain),
        }
    }
}

impl std::fmt::Display for RemoteFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compress a stream with the local codec.
pub fn compress<R: Read>(input: R) -> Result<Vec<u8>, CompressionError> {
    zstd::stream::encode_all(input, COMPRESSION_LEVEL)
        .map_err(|e| CompressionError::Io(e.to_string()))
}

/// Inverse of [`compress`]. Fails when the input is not a zstd frame.
pub fn decompress<R: Read>(input: R) -> Result<Vec<u8>, CompressionError> {
    zstd::stream::decode_all(input).map_err(|e| CompressionError::Decode {
        format: "zstd",
        message: e.to_string(),
    })
}

/// Decompress a remote index body according to its wire format.
pub fn decompress_remote<R: Read>(
    mut input: R,
    format: RemoteFormat,
) -> Result<Vec<u8>, CompressionError> {
    let mut output = Vec::new();

    let result = match format {
        RemoteFormat::Plain => input.read_to_end(&mut output),
        RemoteFormat::Gzip => GzDecoder::new(input).read_to_end(&mut output),
        RemoteFormat::Xz => XzDecoder::new(input).read_to_end(&mut output),
    };

    result.map_err(|e| CompressionError::Decode {
        format: format.name(),
        message: e.to_string(),
    })?;

    Ok(output)
}
