//! Integration tests for the scan pipeline.
//!
//! Blocks are laid out the way a document-text OCR backend reports them: one
//! block per printed line, each card eight lines tall.

use async_trait::async_trait;
use meishi_core::{
    CardPipeline, ErrorCode, MeishiConfig, MeishiError, MeishiResult, OcrBackend, ScanOutcome,
    TextBlock,
};
use std::sync::{Arc, Mutex};

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

/// Backend returning canned blocks and remembering the hints it was given.
struct FixtureBackend {
    blocks: Vec<TextBlock>,
    hints: Mutex<Vec<String>>,
}

impl FixtureBackend {
    fn new(blocks: Vec<TextBlock>) -> Self {
        Self {
            blocks,
            hints: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OcrBackend for FixtureBackend {
    async fn detect_text(&self, _image: &[u8], hints: &[String]) -> MeishiResult<Vec<TextBlock>> {
        *self.hints.lock().unwrap() = hints.to_vec();
        Ok(self.blocks.clone())
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

struct FailingBackend;

#[async_trait]
impl OcrBackend for FailingBackend {
    async fn detect_text(&self, _: &[u8], _: &[String]) -> MeishiResult<Vec<TextBlock>> {
        Err(MeishiError::ocr_service("quota exhausted"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// One card: each line becomes a 300x18 block, 20px apart.
fn card(x: f32, y: f32, lines: &[&str]) -> Vec<TextBlock> {
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| TextBlock::from_rect(*text, x, y + i as f32 * 20.0, 300.0, 18.0))
        .collect()
}

fn alpha_card(x: f32, y: f32) -> Vec<TextBlock> {
    card(
        x,
        y,
        &[
            "株式会社アルファ",
            "営業部 部長",
            "山田 太郎",
            "〒100-0001",
            "東京都千代田区1-1",
            "TEL:03-1111-2222",
            "taro@alpha.co.jp",
            "https://alpha.co.jp",
        ],
    )
}

fn beta_card(x: f32, y: f32) -> Vec<TextBlock> {
    card(
        x,
        y,
        &[
            "Beta Inc.",
            "John Smith",
            "Sales Manager",
            "1-2-3 Minato",
            "Tokyo",
            "TEL:03-3333-4444",
            "john@beta.com",
            "www.beta.com",
        ],
    )
}

fn pipeline_with(backend: Arc<dyn OcrBackend>) -> CardPipeline {
    CardPipeline::new(backend, &MeishiConfig::default()).unwrap()
}

fn offline_pipeline() -> CardPipeline {
    pipeline_with(Arc::new(FixtureBackend::new(Vec::new())))
}

#[test]
fn test_two_cards_without_cross_contamination() {
    let mut blocks = beta_card(1000.0, 0.0);
    blocks.extend(alpha_card(0.0, 0.0));

    let outcome = offline_pipeline().process_blocks(blocks);
    let records = outcome.records();
    assert_eq!(records.len(), 2, "outcome: {:?}", outcome);

    let alpha = &records[0];
    assert_eq!(alpha.name.as_deref(), Some("山田 太郎"));
    assert_eq!(alpha.company.as_deref(), Some("株式会社アルファ"));
    assert_eq!(alpha.email.as_deref(), Some("taro@alpha.co.jp"));
    assert_eq!(alpha.phone.as_deref(), Some("03-1111-2222"));
    assert_eq!(alpha.address.as_deref(), Some("〒100-0001 東京都千代田区1-1"));
    assert_eq!(alpha.website.as_deref(), Some("https://alpha.co.jp"));
    assert!(!alpha.full_text.contains("beta"));

    let beta = &records[1];
    assert_eq!(beta.name.as_deref(), Some("John Smith"));
    assert_eq!(beta.company.as_deref(), Some("Beta Inc."));
    assert_eq!(beta.email.as_deref(), Some("john@beta.com"));
    assert_eq!(beta.phone.as_deref(), Some("03-3333-4444"));
    assert_eq!(beta.website.as_deref(), Some("www.beta.com"));
    assert!(beta.address.is_none());
    assert!(!beta.full_text.contains("アルファ"));
}

#[test]
fn test_single_block_with_email() {
    let blocks = vec![TextBlock::from_rect("taro@example.com", 0.0, 0.0, 200.0, 20.0)];

    let records = offline_pipeline().process_blocks(blocks).into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].email.as_deref(), Some("taro@example.com"));
    assert_eq!(records[0].field_count(), 1);
    assert_eq!(records[0].full_text, "taro@example.com");
}

#[test]
fn test_single_block_without_identity() {
    let blocks = vec![TextBlock::from_rect("TEL 03-1234-5678", 0.0, 0.0, 200.0, 20.0)];

    let outcome = offline_pipeline().process_blocks(blocks);
    assert!(outcome.is_empty());
    assert_eq!(outcome.status(), "no_usable_fields");
}

#[test]
fn test_record_count_capped() {
    // 12 cards on a 4x3 grid, each with its own email.
    let mut blocks = Vec::new();
    for row in 0..3 {
        for col in 0..4 {
            let email = format!("user{}{}@example.com", row, col);
            let lines = [
                "Example Inc.",
                "-",
                "-",
                "-",
                "-",
                "-",
                "-",
                email.as_str(),
            ];
            blocks.extend(card(col as f32 * 1000.0, row as f32 * 1000.0, &lines));
        }
    }

    let records = offline_pipeline().process_blocks(blocks).into_records();
    assert_eq!(records.len(), 9);
    assert_eq!(records[0].email.as_deref(), Some("user00@example.com"));
}

#[test]
fn test_max_cards_configurable() {
    let config = MeishiConfig::builder().max_cards(1).build();
    let pipeline =
        CardPipeline::new(Arc::new(FixtureBackend::new(Vec::new())), &config).unwrap();

    let mut blocks = alpha_card(0.0, 0.0);
    blocks.extend(beta_card(1000.0, 0.0));
    let records = pipeline.process_blocks(blocks).into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].company.as_deref(), Some("株式会社アルファ"));
}

#[test]
fn test_identical_input_identical_output() {
    let mut blocks = alpha_card(0.0, 0.0);
    blocks.extend(beta_card(1000.0, 0.0));
    let pipeline = offline_pipeline();

    let first = serde_json::to_vec(&pipeline.process_blocks(blocks.clone())).unwrap();
    let second = serde_json::to_vec(&pipeline.process_blocks(blocks)).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_scan_passes_language_hints() {
    let backend = Arc::new(FixtureBackend::new(alpha_card(0.0, 0.0)));
    let pipeline = pipeline_with(backend.clone());

    let outcome = pipeline.scan(JPEG).await.unwrap();
    assert_eq!(outcome.records().len(), 1);
    assert_eq!(*backend.hints.lock().unwrap(), vec!["ja", "en"]);
}

#[tokio::test]
async fn test_scan_no_text() {
    let outcome = offline_pipeline().scan(JPEG).await.unwrap();
    assert_eq!(outcome, ScanOutcome::NoTextDetected);
}

#[tokio::test]
async fn test_scan_backend_failure_propagates() {
    let err = pipeline_with(Arc::new(FailingBackend))
        .scan(JPEG)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcrBackendFailed);
    assert!(err.to_string().contains("quota exhausted"));
}

#[tokio::test]
async fn test_scan_rejects_unknown_payload() {
    let err = offline_pipeline()
        .scan(b"not an image at all")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValUnsupportedFormat);
}
