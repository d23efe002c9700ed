// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-shot async reads of an input file's contents.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use easydoc_core::error::Result;
use easydoc_core::types::{FileSource, InputFile};
use tracing::{debug, instrument};

/// The file's full contents.
#[instrument(skip_all, fields(file = %file.name, id = %file.id))]
pub async fn read_bytes(file: &InputFile) -> Result<Vec<u8>> {
    let bytes = match &file.source {
        FileSource::Memory(data) => data.to_vec(),
        FileSource::Path(path) => tokio::fs::read(path).await?,
    };
    debug!(bytes_len = bytes.len(), "Input read");
    Ok(bytes)
}

/// The file as `data:<media-type>;base64,<payload>`. An unknown media type
/// is written as `application/octet-stream`.
pub async fn read_data_uri(file: &InputFile) -> Result<String> {
    let bytes = read_bytes(file).await?;
    let media_type = if file.media_type.is_empty() {
        "application/octet-stream"
    } else {
        file.media_type.as_str()
    };
    Ok(format!("data:{};base64,{}", media_type, STANDARD.encode(bytes)))
}

/// The file decoded as UTF-8, with invalid sequences replaced.
pub async fn read_text(file: &InputFile) -> Result<String> {
    let bytes = read_bytes(file).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use easydoc_core::error::EasydocError;
    use std::io::Write;

    #[tokio::test]
    async fn reads_memory_and_disk_alike() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let on_disk = InputFile::from_path(file.path());
        let in_memory = InputFile::from_bytes("a.txt", "text/plain", b"hello".to_vec());

        assert_eq!(read_bytes(&on_disk).await.unwrap(), b"hello");
        assert_eq!(read_bytes(&in_memory).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn missing_path_is_an_io_error() {
        let file = InputFile::from_path("/definitely/not/here.pdf");
        let err = read_bytes(&file).await.unwrap_err();
        assert!(matches!(err, EasydocError::Io(_)));
    }

    #[tokio::test]
    async fn text_replaces_invalid_utf8() {
        let file = InputFile::from_bytes("a.txt", "text/plain", b"caf\xff".to_vec());
        assert_eq!(read_text(&file).await.unwrap(), "caf\u{fffd}");
    }

    #[tokio::test]
    async fn data_uri_carries_media_type() {
        let file = InputFile::from_bytes("a.png", "image/png", b"abc".to_vec());
        assert_eq!(read_data_uri(&file).await.unwrap(), "data:image/png;base64,YWJj");

        let unknown = InputFile::from_bytes("blob", "", b"abc".to_vec());
        assert!(
            read_data_uri(&unknown)
                .await
                .unwrap()
                .starts_with("data:application/octet-stream;base64,")
        );
    }
}
