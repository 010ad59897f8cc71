//! Barcode scan sessions
//!
//! The decoder itself (camera frames, a USB wedge scanner, piped input) sits behind
//! [`BarcodeDecoder`]. A [`ScanSession`] is single-shot: start, take the first detected code,
//! stop.

mod line;

pub use line::LineDecoder;

use crate::error::ScanError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Camera to open on devices that have several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Rear camera
    #[default]
    Environment,
    /// Front camera
    User,
}

/// One-dimensional symbologies a decoder can be asked to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    /// EAN-13, which carries ISBN-13
    Ean13,
    Ean8,
    UpcA,
}

impl Symbology {
    /// Whether `code` is a well-formed symbol of this kind
    pub fn accepts(self, code: &str) -> bool {
        let len = match self {
            Self::Ean13 => 13,
            Self::Ean8 => 8,
            Self::UpcA => 12,
        };
        code.len() == len && gtin_checksum_ok(code)
    }
}

/// GTIN check digit: weights 3,1,3,... from the right, excluding the check digit
fn gtin_checksum_ok(code: &str) -> bool {
    let digits: Option<Vec<u32>> = code.chars().map(|c| c.to_digit(10)).collect();
    let Some(digits) = digits else {
        return false;
    };
    let Some((check, body)) = digits.split_last() else {
        return false;
    };
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == *check
}

/// Decoder settings
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub facing_mode: FacingMode,
    /// Preferred capture resolution (width, height)
    pub resolution: (u32, u32),
    pub symbologies: Vec<Symbology>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            resolution: (640, 480),
            symbologies: vec![Symbology::Ean13],
        }
    }
}

impl ScanConfig {
    /// Whether any configured symbology accepts `code`
    pub fn accepts(&self, code: &str) -> bool {
        self.symbologies.iter().any(|s| s.accepts(code))
    }
}

/// External barcode decoder lifecycle
#[async_trait]
pub trait BarcodeDecoder: Send {
    /// Open the input and begin decoding
    async fn start(&mut self, config: &ScanConfig) -> Result<(), ScanError>;

    /// Wait for the next decoded symbol
    async fn next_detection(&mut self) -> Result<String, ScanError>;

    /// Stop decoding and release the input
    async fn stop(&mut self);
}

/// Single-shot capture
pub struct ScanSession;

impl ScanSession {
    /// Start `decoder`, return the first detected code and stop it again
    ///
    /// The decoder is stopped whether detection succeeds, fails or is cancelled.
    pub async fn capture_once(
        decoder: &mut dyn BarcodeDecoder,
        config: &ScanConfig,
        cancel: &CancellationToken,
    ) -> Result<String, ScanError> {
        if let Err(e) = decoder.start(config).await {
            tracing::error!("Scanner failed to start: {}", e);
            return Err(match e {
                ScanError::Init(_) | ScanError::AlreadyActive => e,
                other => ScanError::Init(other.to_string()),
            });
        }
        tracing::info!(facing = ?config.facing_mode, symbologies = ?config.symbologies, "Scanner started");

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ScanError::Cancelled),
            code = decoder.next_detection() => code,
        };

        decoder.stop().await;
        match &result {
            Ok(code) => tracing::info!(%code, "Barcode detected"),
            Err(e) => tracing::warn!("Scan ended without a code: {}", e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_symbology_checksums() {
        assert!(Symbology::Ean13.accepts("9780441172719"));
        assert!(!Symbology::Ean13.accepts("9780441172718"));
        assert!(Symbology::Ean8.accepts("96385074"));
        assert!(Symbology::UpcA.accepts("036000291452"));
        assert!(!Symbology::Ean13.accepts("036000291452"));
        assert!(!Symbology::Ean13.accepts("97804411727a9"));
    }

    #[tokio::test]
    async fn test_capture_once_takes_first_valid_code() {
        let input = b"garbage\n\n9780441172719\n9780553293357\n" as &[u8];
        let mut decoder = LineDecoder::new(BufReader::new(input));

        let code =
            ScanSession::capture_once(&mut decoder, &ScanConfig::default(), &CancellationToken::new())
                .await
                .unwrap();

        assert_eq!(code, "9780441172719");
        assert!(!decoder.is_active());
    }

    #[tokio::test]
    async fn test_capture_once_cancelled() {
        let (_writer, reader) = tokio::io::duplex(64);
        let mut decoder = LineDecoder::new(BufReader::new(reader));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = ScanSession::capture_once(&mut decoder, &ScanConfig::default(), &cancel).await;

        assert!(matches!(result, Err(ScanError::Cancelled)));
        assert!(!decoder.is_active());
    }

    #[tokio::test]
    async fn test_capture_once_init_failure() {
        let mut decoder = LineDecoder::new(BufReader::new(b"" as &[u8]));
        let config = ScanConfig {
            symbologies: Vec::new(),
            ..Default::default()
        };

        let result = ScanSession::capture_once(&mut decoder, &config, &CancellationToken::new()).await;
        assert!(matches!(result, Err(ScanError::Init(_))));
    }
}
