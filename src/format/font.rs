//! Document-wide typeface normalization.

use super::{Anomaly, FormatPass, FormatReport};
use crate::config::StyleConfig;
use crate::model::Document;

const NORMAL_STYLE: &str = "Normal";

/// Sets the `Normal` style and every body run to the house font.
///
/// Runs are set explicitly so that direct formatting left over from the
/// source document cannot override the style.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalFontNormalizer;

impl FormatPass for GlobalFontNormalizer {
    fn name(&self) -> &str {
        "global-font"
    }

    fn apply(&self, doc: &mut Document, config: &StyleConfig, report: &mut FormatReport) {
        match doc.styles_mut() {
            Some(styles) => {
                if styles.set_font(NORMAL_STYLE, &config.font_name, config.font_size) {
                    log::debug!("Applied global font settings: {}", config.font_name);
                } else {
                    report.record(Anomaly::NormalStyleMissing);
                }
            }
            None => report.record(Anomaly::StylesPartMissing),
        }

        let paragraphs = doc.paragraphs();
        let tree = doc.tree_mut();
        for paragraph in paragraphs {
            for run in paragraph.runs(tree) {
                run.set_font(tree, &config.font_name, config.font_size);
            }
        }
    }
}
