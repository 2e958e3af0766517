use serde::Serialize;

use crate::analysis::DiffractionResult;

// ---------------------------------------------------------------------------
// Summary – the numbers external collaborators display or store
// ---------------------------------------------------------------------------

/// Scalar outcome of an analysis, without the sample arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub label: String,
    pub slit_width: f64,
    pub unit: String,
    pub mean_spacing: f64,
    pub spacing_error: f64,
    pub fringe_count: usize,
    pub first_order_spacing: Option<f64>,
    pub left_minima: Vec<f64>,
    pub right_minima: Vec<f64>,
    pub origin: f64,
    pub refined: bool,
}

impl Summary {
    pub fn new(label: impl Into<String>, result: &DiffractionResult) -> Self {
        let spacing = result.spacing();
        Self {
            label: label.into(),
            slit_width: result.slit_width(),
            unit: result.unit().to_string(),
            mean_spacing: spacing.mean,
            spacing_error: spacing.error,
            fringe_count: spacing.count,
            first_order_spacing: result.first_order_spacing(),
            left_minima: result.minima_set().left.clone(),
            right_minima: result.minima_set().right.clone(),
            origin: result.center().origin,
            refined: result.refined(),
        }
    }
}

/// Plain-text results block.
pub fn render_text(summary: &Summary) -> String {
    let unit = &summary.unit;
    let first_order = match summary.first_order_spacing {
        Some(first) => format!("{first:.5e} {unit}"),
        None => "n/a".to_string(),
    };
    let lines = [
        format!("RESULTS  {}", summary.label),
        "----------".to_string(),
        format!("    Slit width:            {:.5e} {unit}", summary.slit_width),
        format!(
            "    Mean fringe spacing:   {:.5e} ± {:.1e} {unit}",
            summary.mean_spacing, summary.spacing_error
        ),
        format!("    First-order spacing:   {first_order}"),
        format!("    Valid fringes:         {}", summary.fringe_count),
        format!(
            "    Minima left / right:   {} / {}",
            summary.left_minima.len(),
            summary.right_minima.len()
        ),
    ];
    lines.join("\n") + "\n"
}

/// JSON array of summaries, pretty-printed.
pub fn render_json(summaries: &[Summary]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Summary {
        Summary {
            label: "slit_um=50".to_string(),
            slit_width: 5.0e-5,
            unit: "m".to_string(),
            mean_spacing: 0.0268,
            spacing_error: 0.0011,
            fringe_count: 6,
            first_order_spacing: Some(0.0268),
            left_minima: vec![0.0268, 0.0536, 0.0804],
            right_minima: vec![0.0268, 0.0536],
            origin: 0.0,
            refined: true,
        }
    }

    #[test]
    fn text_report_lists_the_key_numbers() {
        let text = render_text(&summary());
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("5.00000e-5 m"), "{text}");
        assert!(text.contains("Valid fringes:         6"));
        assert!(text.contains("3 / 2"));
    }

    #[test]
    fn missing_first_order_is_reported() {
        let text = render_text(&Summary {
            first_order_spacing: None,
            ..summary()
        });
        assert!(text.contains("First-order spacing:   n/a"));
    }

    #[test]
    fn json_round_trips_through_serde_value() {
        let json = render_json(&[summary()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["fringe_count"], 6);
        assert_eq!(value[0]["unit"], "m");
        assert_eq!(value[0]["right_minima"].as_array().unwrap().len(), 2);
    }
}
