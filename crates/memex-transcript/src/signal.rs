//! §4.6.1 signal scoring: a regex-based, weighted axis scorer feeding the
//! directive-gate for rule promotion.

use std::sync::OnceLock;

struct Axis {
    name: &'static str,
    weight: f64,
    pattern: &'static str,
}

const AXES: &[Axis] = &[
    Axis { name: "directive", weight: 1.0, pattern: r"(?i)\b(always|never|must|should|have to|ensure|make sure|don't ever)\b" },
    Axis { name: "decisional", weight: 0.9, pattern: r"(?i)\b(let's use|go with|decided|picked|we'll use)\b" },
    Axis { name: "consistency", weight: 0.9, pattern: r"(?i)\b(consistent|match|standardize|uniform|everywhere)\b" },
    Axis { name: "preference", weight: 0.8, pattern: r"(?i)\bI (like|prefer|want|hate|love)\b|(?i)\brather\b|(?i)\binstead of\b" },
    Axis { name: "identity", weight: 0.8, pattern: r"(?i)\b(my project|my app|I built|is called|my repo)\b" },
    Axis { name: "emotional", weight: 0.7, pattern: r"(?i)\b(love|hate|annoying|terrible|awesome)\b" },
    Axis { name: "temporal", weight: 0.7, pattern: r"(?i)\b(from now on|going forward|every time|whenever)\b" },
    Axis { name: "evaluative", weight: 0.6, pattern: r"(?i)\b(works|broken|good|bad|clean|messy)\b" },
];

/// Per-axis raw scores plus the combined total (§4.6.1).
#[derive(Debug, Clone, Default)]
pub struct SignalScore {
    pub directive: f64,
    pub decisional: f64,
    pub consistency: f64,
    pub preference: f64,
    pub identity: f64,
    pub emotional: f64,
    pub temporal: f64,
    pub evaluative: f64,
}

impl SignalScore {
    pub fn total(&self) -> f64 {
        self.directive
            + self.decisional
            + self.consistency
            + self.preference
            + self.identity
            + self.emotional
            + self.temporal
            + self.evaluative
    }

    /// "directive + temporal + consistency ≥ 0.5" (§4.6.1).
    pub fn passes_directive_gate(&self) -> bool {
        self.directive + self.temporal + self.consistency >= memex_core::constants::TRANSCRIPT_DIRECTIVE_GATE_MIN
    }
}

fn compiled_axes() -> &'static Vec<regex::Regex> {
    static AXIS_REGEXES: OnceLock<Vec<regex::Regex>> = OnceLock::new();
    AXIS_REGEXES.get_or_init(|| {
        AXES.iter()
            .map(|a| regex::Regex::new(a.pattern).expect("axis pattern is valid"))
            .collect()
    })
}

fn count_matches(re: &regex::Regex, text: &str) -> usize {
    re.find_iter(text).count()
}

/// `score(text)` (§4.6.1): per-axis score is `min(count * weight, 2 * weight)`.
pub fn score(text: &str) -> SignalScore {
    let regexes = compiled_axes();
    let mut raw = [0.0f64; 8];
    for (i, axis) in AXES.iter().enumerate() {
        let count = count_matches(&regexes[i], text) as f64;
        raw[i] = (count * axis.weight).min(2.0 * axis.weight);
    }
    SignalScore {
        directive: raw[0],
        decisional: raw[1],
        consistency: raw[2],
        preference: raw[3],
        identity: raw[4],
        emotional: raw[5],
        temporal: raw[6],
        evaluative: raw[7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_axis_fires_on_always_never() {
        let s = score("always run tests, never skip them");
        assert!(s.directive > 0.0);
    }

    #[test]
    fn score_caps_at_twice_weight() {
        let s = score("always always always always always");
        assert_eq!(s.directive, 2.0);
    }

    #[test]
    fn directive_gate_requires_combined_threshold() {
        let s = score("from now on always be consistent everywhere");
        assert!(s.passes_directive_gate());
        let weak = score("the weather is nice today");
        assert!(!weak.passes_directive_gate());
    }
}
