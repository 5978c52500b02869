//! Element sequences and run-property helpers shared by the model handles.

use super::xml::{NodeId, XmlTree};

pub(crate) const P_ORDER: &[&str] = &["w:pPr"];

pub(crate) const PPR_ORDER: &[&str] = &[
    "w:pStyle",
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:framePr",
    "w:widowControl",
    "w:numPr",
    "w:suppressLineNumbers",
    "w:pBdr",
    "w:shd",
    "w:tabs",
    "w:suppressAutoHyphens",
    "w:kinsoku",
    "w:wordWrap",
    "w:overflowPunct",
    "w:topLinePunct",
    "w:autoSpaceDE",
    "w:autoSpaceDN",
    "w:bidi",
    "w:adjustRightInd",
    "w:snapToGrid",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:mirrorIndents",
    "w:suppressOverlap",
    "w:jc",
    "w:textDirection",
    "w:textAlignment",
    "w:textboxTightWrap",
    "w:outlineLvl",
    "w:divId",
    "w:cnfStyle",
    "w:rPr",
    "w:sectPr",
    "w:pPrChange",
];

pub(crate) const R_ORDER: &[&str] = &["w:rPr"];

pub(crate) const RPR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
    "w:rPrChange",
];

pub(crate) const TBL_ORDER: &[&str] = &["w:tblPr", "w:tblGrid"];

pub(crate) const TBLPR_ORDER: &[&str] = &[
    "w:tblStyle",
    "w:tblpPr",
    "w:tblOverlap",
    "w:bidiVisual",
    "w:tblStyleRowBandSize",
    "w:tblStyleColBandSize",
    "w:tblW",
    "w:jc",
    "w:tblCellSpacing",
    "w:tblInd",
    "w:tblBorders",
    "w:shd",
    "w:tblLayout",
    "w:tblCellMar",
    "w:tblLook",
    "w:tblCaption",
    "w:tblDescription",
    "w:tblPrChange",
];

pub(crate) const CELL_MAR_ORDER: &[&str] = &[
    "w:top", "w:start", "w:left", "w:bottom", "w:end", "w:right",
];

pub(crate) const TR_ORDER: &[&str] = &["w:tblPrEx", "w:trPr"];

pub(crate) const TRPR_ORDER: &[&str] = &[
    "w:cnfStyle",
    "w:divId",
    "w:gridBefore",
    "w:gridAfter",
    "w:wBefore",
    "w:wAfter",
    "w:cantSplit",
    "w:trHeight",
    "w:tblHeader",
    "w:tblCellSpacing",
    "w:jc",
    "w:hidden",
    "w:ins",
    "w:del",
    "w:trPrChange",
];

pub(crate) const TC_ORDER: &[&str] = &["w:tcPr"];

pub(crate) const TCPR_ORDER: &[&str] = &[
    "w:cnfStyle",
    "w:tcW",
    "w:gridSpan",
    "w:hMerge",
    "w:vMerge",
    "w:tcBorders",
    "w:shd",
    "w:noWrap",
    "w:tcMar",
    "w:textDirection",
    "w:tcFitText",
    "w:vAlign",
    "w:hideMark",
];

/// Read an on/off property such as `w:b`.
///
/// A bare element means on; `0`, `false` and `off` mean off.
pub(crate) fn toggle_value(tree: &XmlTree, element: NodeId) -> bool {
    !matches!(
        tree.attribute(element, "w:val"),
        Some("0") | Some("false") | Some("off")
    )
}

/// Typeface named by `w:rFonts/@w:ascii` inside a run-properties element.
pub(crate) fn font_name(tree: &XmlTree, rpr: NodeId) -> Option<String> {
    let fonts = tree.first_child(rpr, "w:rFonts")?;
    tree.attribute(fonts, "w:ascii").map(str::to_string)
}

/// Font size in points from `w:sz` (half-points).
pub(crate) fn font_size(tree: &XmlTree, rpr: NodeId) -> Option<f32> {
    let size = tree.first_child(rpr, "w:sz")?;
    let half_points: f32 = tree.attribute(size, "w:val")?.parse().ok()?;
    Some(half_points / 2.0)
}

pub(crate) fn bold(tree: &XmlTree, rpr: NodeId) -> Option<bool> {
    tree.first_child(rpr, "w:b")
        .map(|element| toggle_value(tree, element))
}

pub(crate) fn set_font_name(tree: &mut XmlTree, rpr: NodeId, name: &str) {
    let fonts = tree.ensure_child(rpr, "w:rFonts", RPR_ORDER);
    tree.set_attribute(fonts, "w:ascii", name);
    tree.set_attribute(fonts, "w:hAnsi", name);
    tree.remove_attribute(fonts, "w:asciiTheme");
    tree.remove_attribute(fonts, "w:hAnsiTheme");
}

pub(crate) fn set_font_size(tree: &mut XmlTree, rpr: NodeId, points: f32) {
    let size = tree.ensure_child(rpr, "w:sz", RPR_ORDER);
    let half_points = (points * 2.0).round() as i64;
    tree.set_attribute(size, "w:val", half_points.to_string());
}

/// Write `w:b`: a bare element for bold, `w:val="0"` for explicitly not bold.
pub(crate) fn set_bold(tree: &mut XmlTree, rpr: NodeId, bold: bool) {
    let element = tree.ensure_child(rpr, "w:b", RPR_ORDER);
    if bold {
        tree.remove_attribute(element, "w:val");
    } else {
        tree.set_attribute(element, "w:val", "0");
    }
}
