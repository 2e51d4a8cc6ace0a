//! Trigram based detection via `whatlang`.

use super::{LanguageClassifier, LanguageCode};
use tracing::trace;

/// Classifier backed by the `whatlang` crate.
#[derive(Debug, Clone, Default)]
pub struct WhatlangClassifier {
    min_confidence: f64,
}

impl WhatlangClassifier {
    /// Creates a classifier that accepts any detection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores detections whose confidence is below `min_confidence`.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

impl LanguageClassifier for WhatlangClassifier {
    fn detect(&self, text: &str) -> Option<LanguageCode> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let info = whatlang::detect(text)?;
        trace!(
            lang = info.lang().code(),
            confidence = info.confidence(),
            "Detected language"
        );
        if info.confidence() < self.min_confidence {
            return None;
        }
        LanguageCode::parse(info.lang().code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_no_match() {
        let classifier = WhatlangClassifier::new();
        assert!(classifier.detect("").is_none());
        assert!(classifier.detect("   \n").is_none());
    }

    #[test]
    fn detects_korean() {
        let classifier = WhatlangClassifier::new();
        let code = classifier
            .detect("이 프로젝트는 한국어로 작성된 오픈 소스 개발 도구 모음입니다")
            .unwrap();
        assert_eq!(code.as_str(), "kor");
    }

    #[test]
    fn detects_english() {
        let classifier = WhatlangClassifier::new();
        let code = classifier
            .detect("A fast, lightweight and extensible terminal emulator written for modern systems")
            .unwrap();
        assert_eq!(code.as_str(), "eng");
    }

    #[test]
    fn confidence_floor_turns_detection_into_no_match() {
        let classifier = WhatlangClassifier::new().with_min_confidence(1.1);
        assert!(classifier.detect("This is clearly an English sentence.").is_none());
    }
}
