//! Template-based conclusion text for cement evaluation reports

use std::collections::BTreeMap;

use crate::types::{IntervalVerdict, QualityLabel};

/// Conclusion paragraph for a dominant quality label.
///
/// The percentage and calculated TOC are quoted when available.
pub fn conclusion(label: QualityLabel, percentage: Option<f64>, calculated_toc: Option<f64>) -> String {
    let share = percentage.map_or(String::new(), |p| format!(" with {p:.2}% of the readings"));
    let toc = calculated_toc.map_or(String::new(), |t| {
        format!(" The calculated top of cement in this range is {t:.2} m.")
    });

    format!(
        "The predominant cement quality in the analysed range is {label}{share}.{toc} {}",
        assessment(label)
    )
}

fn assessment(label: QualityLabel) -> &'static str {
    match label {
        QualityLabel::Good => {
            "Cement integrity in this range is excellent, indicating an effective \
             formation seal and high well reliability."
        }
        QualityLabel::Regular => {
            "Cement integrity in this range is acceptable, but additional monitoring \
             may be required to ensure long-term well integrity."
        }
        QualityLabel::Bad => {
            "Cement integrity in this range is deficient, suggesting potential sealing \
             problems; remedial work should be considered to secure well integrity."
        }
        QualityLabel::NoData => {
            "There is not enough valid CBL data in this range to assess cement integrity."
        }
    }
}

/// Most frequent dominant label across interval verdicts.
///
/// Ties resolve by label precedence (`Good > Regular > Bad > NoData`).
pub fn overall_label(verdicts: &[IntervalVerdict]) -> Option<QualityLabel> {
    let mut tally: BTreeMap<QualityLabel, usize> = BTreeMap::new();
    for v in verdicts {
        *tally.entry(v.dominant_label).or_insert(0) += 1;
    }
    // BTreeMap iterates in precedence order; keep the first maximum
    tally
        .into_iter()
        .fold(None, |best: Option<(QualityLabel, usize)>, (label, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((label, n)),
        })
        .map(|(label, _)| label)
}

/// Conclusion over all perforation intervals.
pub fn interval_conclusion(verdicts: &[IntervalVerdict]) -> Option<String> {
    let label = overall_label(verdicts)?;
    let matching = verdicts.iter().filter(|v| v.dominant_label == label).count();
    Some(format!(
        "{matching} of {} perforation interval(s) are predominantly {label}. {}",
        verdicts.len(),
        assessment(label)
    ))
}
