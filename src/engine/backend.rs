//! Compression backends: the byte transform behind each [`Encoding`].

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

use crate::Encoding;
use crate::utils::config::CompressionConsts;

/// Compresses bytes with a named encoding. Called from worker threads, one call per job.
pub trait CompressionBackend: Send + Sync {
    fn compress(&self, encoding: Encoding, bytes: &[u8]) -> Result<Vec<u8>>;

    /// Size of the compressed output. Override when the length is known without materializing it.
    fn compressed_len(&self, encoding: Encoding, bytes: &[u8]) -> Result<u64> {
        Ok(self.compress(encoding, bytes)?.len() as u64)
    }
}

/// Brotli at max quality, gzip at level 9, `none` as identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBackend;

impl DefaultBackend {
    fn brotli(bytes: &[u8]) -> Result<Vec<u8>> {
        let mut writer = brotli::CompressorWriter::new(
            Vec::with_capacity(bytes.len() / 2),
            CompressionConsts::BROTLI_BUFFER_SIZE,
            CompressionConsts::BROTLI_QUALITY,
            CompressionConsts::BROTLI_LGWIN,
        );
        writer.write_all(bytes).context("brotli write")?;
        // into_inner finishes the stream; an explicit flush would add an empty block.
        Ok(writer.into_inner())
    }

    fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(bytes.len() / 2),
            Compression::new(CompressionConsts::GZIP_LEVEL),
        );
        encoder.write_all(bytes).context("gzip write")?;
        encoder.finish().context("gzip finish")
    }
}

impl CompressionBackend for DefaultBackend {
    fn compress(&self, encoding: Encoding, bytes: &[u8]) -> Result<Vec<u8>> {
        match encoding {
            Encoding::Brotli => Self::brotli(bytes),
            Encoding::Gzip => Self::gzip(bytes),
            Encoding::None => Ok(bytes.to_vec()),
        }
    }

    fn compressed_len(&self, encoding: Encoding, bytes: &[u8]) -> Result<u64> {
        match encoding {
            Encoding::None => Ok(bytes.len() as u64),
            _ => Ok(self.compress(encoding, bytes)?.len() as u64),
        }
    }
}
