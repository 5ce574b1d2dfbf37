//! "Object detection" overlay: which page elements get labelled boxes.

/// How far outside the viewport a box may start and still count.
pub const VIEWPORT_SLACK_PX: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionTarget {
    pub selector: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

pub const DETECTION_TARGETS: &[DetectionTarget] = &[
    DetectionTarget {
        selector: "img",
        label: "Overfitted_Human",
        color: "#ef4444",
    },
    DetectionTarget {
        selector: "h1",
        label: "Feature_Vector_H1",
        color: "#3b82f6",
    },
    DetectionTarget {
        selector: "h2",
        label: "Class_Label",
        color: "#10b981",
    },
    DetectionTarget {
        selector: "button",
        label: "Interaction_Node",
        color: "#f59e0b",
    },
    DetectionTarget {
        selector: "a[href^=\"mailto\"]",
        label: "RECRUITER_TRAP",
        color: "#dc2626",
    },
    DetectionTarget {
        selector: "a:not([href^=\"mailto\"])",
        label: "Hyperlink",
        color: "#8b5cf6",
    },
    DetectionTarget {
        selector: "p",
        label: "Natural_Language",
        color: "#ec4899",
    },
    DetectionTarget {
        selector: "[class*=\"card\"]",
        label: "Training_Data",
        color: "#06b6d4",
    },
];

/// A client rect as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Non-empty and within the viewport grown by the slack on every side.
    pub fn is_on_screen(&self, viewport_width: f64, viewport_height: f64) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.top >= -VIEWPORT_SLACK_PX
            && self.left >= -VIEWPORT_SLACK_PX
            && self.bottom() <= viewport_height + VIEWPORT_SLACK_PX
            && self.right() <= viewport_width + VIEWPORT_SLACK_PX
    }
}

/// Maps a uniform `[0, 1)` sample onto the displayed `[0.80, 0.99)` score.
pub fn confidence(sample: f64) -> f64 {
    0.8 + sample.clamp(0.0, 1.0) * 0.19
}

#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub id: String,
    pub label: &'static str,
    pub color: &'static str,
    pub rect: Rect,
    pub confidence: f64,
}

impl Detection {
    /// `ordinal` is the element's index among the target's matches, counting
    /// off-screen ones.
    pub fn new(target: &DetectionTarget, ordinal: usize, rect: Rect, sample: f64) -> Self {
        Self {
            id: format!("{}-{ordinal}", target.label),
            label: target.label,
            color: target.color,
            rect,
            confidence: confidence(sample),
        }
    }

    /// Tag text, e.g. `Class_Label 0.87`.
    pub fn caption(&self) -> String {
        format!("{} {:.2}", self.label, self.confidence)
    }
}

/// Builds detections for the on-screen rects of one target.
pub fn detect(
    target: &DetectionTarget,
    rects: impl IntoIterator<Item = Rect>,
    viewport_width: f64,
    viewport_height: f64,
    random: &mut impl FnMut() -> f64,
) -> Vec<Detection> {
    rects
        .into_iter()
        .enumerate()
        .filter(|(_, rect)| rect.is_on_screen(viewport_width, viewport_height))
        .map(|(ordinal, rect)| Detection::new(target, ordinal, rect, random()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f64, top: f64, width: f64, height: f64) -> Rect {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    #[test]
    fn slack_extends_the_viewport() {
        assert!(rect(-100.0, -100.0, 50.0, 50.0).is_on_screen(800.0, 600.0));
        assert!(rect(0.0, 600.0, 100.0, 100.0).is_on_screen(800.0, 600.0));
        assert!(!rect(0.0, -101.0, 10.0, 10.0).is_on_screen(800.0, 600.0));
        assert!(!rect(0.0, 650.0, 10.0, 60.0).is_on_screen(800.0, 600.0));
    }

    #[test]
    fn empty_rects_are_never_detected() {
        assert!(!rect(10.0, 10.0, 0.0, 20.0).is_on_screen(800.0, 600.0));
        assert!(!rect(10.0, 10.0, 20.0, 0.0).is_on_screen(800.0, 600.0));
    }

    #[test]
    fn confidence_stays_in_range() {
        assert!((confidence(0.0) - 0.80).abs() < 1e-12);
        assert!(confidence(0.999) < 0.99);
        assert!((confidence(7.0) - 0.99).abs() < 1e-12);
    }

    #[test]
    fn detections_keep_document_ordinals() {
        let target = &DETECTION_TARGETS[2];
        let rects = [
            rect(0.0, -5000.0, 10.0, 10.0),
            rect(0.0, 100.0, 200.0, 40.0),
        ];
        let mut random = || 0.0;
        let found = detect(target, rects, 800.0, 600.0, &mut random);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "Class_Label-1");
        assert_eq!(found[0].caption(), "Class_Label 0.80");
    }
}
