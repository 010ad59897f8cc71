//! Decoder for scanners that type each code followed by Enter

use super::{BarcodeDecoder, ScanConfig};
use crate::error::ScanError;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads one symbol per line from an async reader
///
/// Keyboard-wedge USB scanners and piped input both look like this. Lines that are not a
/// valid symbol for the session's symbologies are skipped.
pub struct LineDecoder<R> {
    lines: Lines<R>,
    config: Option<ScanConfig>,
}

impl LineDecoder<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> LineDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            config: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> BarcodeDecoder for LineDecoder<R> {
    async fn start(&mut self, config: &ScanConfig) -> Result<(), ScanError> {
        if self.config.is_some() {
            return Err(ScanError::AlreadyActive);
        }
        if config.symbologies.is_empty() {
            return Err(ScanError::Init("no symbologies configured".to_string()));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    async fn next_detection(&mut self) -> Result<String, ScanError> {
        let config = self.config.as_ref().ok_or(ScanError::NotActive)?;

        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| ScanError::Input(e.to_string()))?
                .ok_or(ScanError::Closed)?;

            let code = line.trim();
            if code.is_empty() {
                continue;
            }
            if config.accepts(code) {
                return Ok(code.to_string());
            }
            tracing::warn!(input = %code, "Ignoring unreadable barcode");
        }
    }

    async fn stop(&mut self) {
        self.config = None;
    }
}
