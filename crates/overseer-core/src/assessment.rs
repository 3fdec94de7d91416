//! Severity bands for dashboards.
//!
//! Renderers decide colors; the engine only decides which band a value
//! falls in, so every consumer agrees on what "critical" means.

use overseer_types::{AlignmentImpact, Assessment, ThreatLevel};

/// Band for a risk level: below 0.3 nominal, below 0.6 elevated.
pub fn risk_level(risk: f64) -> ThreatLevel {
    if risk < 0.3 {
        ThreatLevel::Nominal
    } else if risk < 0.6 {
        ThreatLevel::Elevated
    } else {
        ThreatLevel::Critical
    }
}

/// Band for accumulated reports relative to `threshold`.
pub fn report_level(reports: f64, threshold: f64) -> ThreatLevel {
    if reports < threshold * 0.3 {
        ThreatLevel::Nominal
    } else if reports < threshold * 0.6 {
        ThreatLevel::Elevated
    } else {
        ThreatLevel::Critical
    }
}

/// Band for alignment: above 0.7 nominal, above 0.4 elevated.
pub fn alignment_level(alignment: f64) -> ThreatLevel {
    if alignment > 0.7 {
        ThreatLevel::Nominal
    } else if alignment > 0.4 {
        ThreatLevel::Elevated
    } else {
        ThreatLevel::Critical
    }
}

/// Qualitative alignment reading.
pub fn alignment_impact(alignment: f64) -> AlignmentImpact {
    if alignment > 0.8 {
        AlignmentImpact::Excellent
    } else if alignment > 0.6 {
        AlignmentImpact::Good
    } else if alignment > 0.4 {
        AlignmentImpact::Concerning
    } else if alignment > 0.2 {
        AlignmentImpact::Critical
    } else {
        AlignmentImpact::Emergency
    }
}

/// All bands at once.
pub fn assess(risk: f64, reports: f64, report_threshold: f64, alignment: f64) -> Assessment {
    Assessment {
        risk_level: risk_level(risk),
        report_level: report_level(reports, report_threshold),
        alignment_level: alignment_level(alignment),
        alignment_impact: alignment_impact(alignment),
    }
}
