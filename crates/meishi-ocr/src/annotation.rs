//! Google Vision `images:annotate` wire types and block conversion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use meishi_core::types::{Point, TextBlock};

// Request

#[derive(Debug, Serialize)]
pub(crate) struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_context: Option<ImageContext>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageContent {
    /// Base64-encoded image bytes.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Feature {
    #[serde(rename = "type")]
    pub feature_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageContext {
    pub language_hints: Vec<String>,
}

// Response

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<ImageAnnotation>,
}

/// Result for one image.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotation {
    #[serde(default)]
    pub text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    pub full_text_annotation: Option<FullTextAnnotation>,
    #[serde(default)]
    pub error: Option<Status>,
}

/// Error reported inside an otherwise successful HTTP response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Envelope of a non-2xx response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: Status,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// Polygon vertex; Vision omits coordinates that are zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct FullTextAnnotation {
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub bounding_box: Option<BoundingPoly>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub words: Vec<Word>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Word {
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Symbol {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub property: Option<TextProperty>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperty {
    #[serde(default)]
    pub detected_break: Option<DetectedBreak>,
}

#[derive(Debug, Deserialize)]
pub struct DetectedBreak {
    #[serde(rename = "type", default)]
    pub break_type: BreakType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakType {
    Space,
    SureSpace,
    EolSureSpace,
    Hyphen,
    LineBreak,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BreakType {
    /// Text emitted after a symbol carrying this break.
    fn separator(self) -> &'static str {
        match self {
            Self::Space | Self::SureSpace => " ",
            Self::EolSureSpace | Self::LineBreak => "\n",
            Self::Hyphen => "-\n",
            Self::Unknown => "",
        }
    }
}

fn points(poly: Option<&BoundingPoly>) -> Vec<Point> {
    poly.map(|p| p.vertices.iter().map(|v| Point::new(v.x, v.y)).collect())
        .unwrap_or_default()
}

impl Block {
    /// Symbol texts joined according to their detected breaks.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for symbol in self
            .paragraphs
            .iter()
            .flat_map(|p| &p.words)
            .flat_map(|w| &w.symbols)
        {
            text.push_str(&symbol.text);
            if let Some(brk) = symbol
                .property
                .as_ref()
                .and_then(|p| p.detected_break.as_ref())
            {
                text.push_str(brk.break_type.separator());
            }
        }
        text.trim_end().to_string()
    }
}

impl ImageAnnotation {
    /// Convert the annotation into text blocks.
    ///
    /// Uses the block hierarchy of `fullTextAnnotation` when present and
    /// otherwise the first (whole-image) entry of `textAnnotations`. Blank
    /// blocks and blocks without a polygon are skipped.
    pub fn into_blocks(self) -> Vec<TextBlock> {
        if let Some(full) = self.full_text_annotation {
            let blocks: Vec<TextBlock> = full
                .pages
                .iter()
                .flat_map(|page| &page.blocks)
                .filter_map(|block| {
                    let text = block.text();
                    if text.trim().is_empty() {
                        return None;
                    }
                    let block = TextBlock::from_vertices(text, &points(block.bounding_box.as_ref()));
                    if block.is_none() {
                        debug!("Skipping OCR block without bounding polygon");
                    }
                    block
                })
                .collect();
            return blocks;
        }

        self.text_annotations
            .into_iter()
            .next()
            .filter(|a| !a.description.trim().is_empty())
            .and_then(|a| {
                let vertices = points(a.bounding_poly.as_ref());
                TextBlock::from_vertices(a.description.trim_end(), &vertices)
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT_RESPONSE: &str = r#"{
        "textAnnotations": [
            {"description": "山田 太郎\ntaro@example.com", "boundingPoly": {"vertices": [{}, {"x": 300}, {"x": 300, "y": 60}, {"y": 60}]}}
        ],
        "fullTextAnnotation": {
            "text": "山田 太郎\ntaro@example.com",
            "pages": [{
                "blocks": [
                    {
                        "boundingBox": {"vertices": [{"x": 10, "y": 10}, {"x": 110, "y": 10}, {"x": 110, "y": 30}, {"x": 10, "y": 30}]},
                        "paragraphs": [{"words": [
                            {"symbols": [{"text": "山"}, {"text": "田", "property": {"detectedBreak": {"type": "SPACE"}}}]},
                            {"symbols": [{"text": "太"}, {"text": "郎", "property": {"detectedBreak": {"type": "LINE_BREAK"}}}]}
                        ]}]
                    },
                    {
                        "boundingBox": {"vertices": [{"y": 40}, {"x": 200, "y": 40}, {"x": 200, "y": 60}, {"y": 60}]},
                        "paragraphs": [{"words": [
                            {"symbols": [{"text": "t"}, {"text": "a"}, {"text": "r"}, {"text": "o", "property": {"detectedBreak": {"type": "HYPHEN"}}}]},
                            {"symbols": [{"text": "x", "property": {"detectedBreak": {"type": "EOL_SURE_SPACE"}}}]}
                        ]}]
                    },
                    {
                        "boundingBox": {"vertices": [{"x": 0, "y": 0}, {"x": 5, "y": 5}]},
                        "paragraphs": [{"words": [{"symbols": [{"text": " ", "property": {"detectedBreak": {"type": "SURE_SPACE"}}}]}]}]
                    }
                ]
            }]
        }
    }"#;

    #[test]
    fn test_blocks_from_document_annotation() {
        let annotation: ImageAnnotation = serde_json::from_str(DOCUMENT_RESPONSE).unwrap();
        let blocks = annotation.into_blocks();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "山田 太郎");
        assert_eq!(blocks[0].width, 100.0);
        assert_eq!(blocks[0].height, 20.0);
        assert_eq!(blocks[0].centroid, Point::new(60.0, 20.0));

        assert_eq!(blocks[1].text, "taro-\nx");
        assert_eq!(blocks[1].min_corner, Point::new(0.0, 40.0));
    }

    #[test]
    fn test_fallback_to_text_annotation() {
        let json = r#"{"textAnnotations": [
            {"description": "taro@example.com\n", "boundingPoly": {"vertices": [{"x": 5, "y": 5}, {"x": 205, "y": 5}, {"x": 205, "y": 25}, {"x": 5, "y": 25}]}},
            {"description": "taro@example.com"}
        ]}"#;
        let annotation: ImageAnnotation = serde_json::from_str(json).unwrap();
        let blocks = annotation.into_blocks();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "taro@example.com");
        assert_eq!(blocks[0].width, 200.0);
    }

    #[test]
    fn test_empty_annotation() {
        let annotation: ImageAnnotation = serde_json::from_str("{}").unwrap();
        assert!(annotation.into_blocks().is_empty());
    }

    #[test]
    fn test_unknown_break_type() {
        let json = r#"{"text": "a", "property": {"detectedBreak": {"type": "SOMETHING_NEW"}}}"#;
        let symbol: Symbol = serde_json::from_str(json).unwrap();
        let brk = symbol.property.unwrap().detected_break.unwrap();
        assert_eq!(brk.break_type, BreakType::Unknown);
    }

    #[test]
    fn test_known_break_types() {
        let cases = [
            ("SPACE", BreakType::Space),
            ("EOL_SURE_SPACE", BreakType::EolSureSpace),
            ("LINE_BREAK", BreakType::LineBreak),
        ];
        for (name, expected) in cases {
            let json = format!(r#"{{"type": "{}"}}"#, name);
            let brk: DetectedBreak = serde_json::from_str(&json).unwrap();
            assert_eq!(brk.break_type, expected);
        }

        let brk: DetectedBreak = serde_json::from_str("{}").unwrap();
        assert_eq!(brk.break_type, BreakType::Unknown);
    }

    #[test]
    fn test_request_shape() {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: "AAAA".to_string(),
                },
                features: vec![Feature {
                    feature_type: "DOCUMENT_TEXT_DETECTION",
                }],
                image_context: Some(ImageContext {
                    language_hints: vec!["ja".to_string(), "en".to_string()],
                }),
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["requests"][0]["features"][0]["type"],
            "DOCUMENT_TEXT_DETECTION"
        );
        assert_eq!(value["requests"][0]["imageContext"]["languageHints"][1], "en");
        assert_eq!(value["requests"][0]["image"]["content"], "AAAA");
    }
}
