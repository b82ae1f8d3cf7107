//! The CHTML output jax: lays out a compiled [`MmlTree`] with a [`WrapperTree`] and emits the
//! `mjx-container` element showing it, together with the stylesheet those elements need.
//!
//! The stylesheet is built from what the typeset expressions actually used when `adaptiveCSS` is
//! on: the rules of the element kinds that were created, and one rule per character drawn.

use std::collections::BTreeSet;
use std::mem;

use crate::lengths::{self, em, percent};
use crate::options::OptionList;
use crate::tree::MmlTree;
use crate::util::function_list::FunctionList;
use super::font::{FontData, TexFont};
use super::html::{CssStyles, Element};
use super::wrapper::{char_class, WrapperId, WrapperTree};

/// Options of the CHTML output jax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChtmlOptions {
    /// Global scaling factor of the math
    pub scale: f64,
    /// Smallest scaling factor used
    pub min_scale: f64,
    /// Use MathML spacing rules rather than TeX ones
    pub mathml_spacing: bool,
    /// `left`, `center` or `right`
    pub display_align: String,
    /// Indentation of display math
    pub display_indent: String,
    /// Only emit CSS for the characters and elements used
    #[serde(rename = "adaptiveCSS")]
    pub adaptive_css: bool,
    /// Size of an ex relative to an em in the surrounding text
    pub ex_factor: f64,
    /// Size of an em in the surrounding text, in pixels
    pub em: f64,
    /// Width of the container math is laid out in, in pixels
    pub container_width: f64,
    /// Where the web fonts are
    #[serde(rename = "fontURL")]
    pub font_url: String,
}

impl Default for ChtmlOptions {
    fn default() -> Self {
        ChtmlOptions {
            scale:           1.,
            min_scale:       0.5,
            mathml_spacing:  false,
            display_align:   "center".into(),
            display_indent:  "0".into(),
            adaptive_css:    true,
            ex_factor:       0.5,
            em:              16.,
            container_width: 80. * 16.,
            font_url:        "https://cdn.jsdelivr.net/npm/mathjax@3/es5/output/chtml/fonts/woff-v2".into(),
        }
    }
}

impl ChtmlOptions {
    /// The defaults as an option list, for validating user options against
    pub fn defaults() -> OptionList {
        serde_json::to_value(Self::default()).map(OptionList::from_json).unwrap_or_default()
    }
}

/// Sizes of the surroundings of the math, in pixels, and the resulting scaling factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub em: f64,
    pub ex: f64,
    pub container_width: f64,
    /// Scale of the math relative to the surrounding text
    pub scale: f64,
}

impl Metrics {
    /// The metrics implied by the options, matching the x-height of the font to the surrounding ex
    pub fn from_options(options: &ChtmlOptions) -> Metrics {
        let em = options.em;
        let ex = options.ex_factor * em;
        let x_height = TexFont::new().params().x_height;
        let scale = (ex / x_height / em * options.scale).max(options.min_scale);
        Metrics { em, ex, container_width: options.container_width, scale }
    }
}

/// The CHTML output jax
pub struct Chtml<F: FontData = TexFont> {
    options: ChtmlOptions,
    font:    F,
    metrics: Metrics,
    used:    BTreeSet<(&'static str, char)>,
    kinds:   BTreeSet<String>,
    /// Run over each finished `mjx-container`
    pub post_filters: FunctionList<Element>,
}

impl<F: FontData> std::fmt::Debug for Chtml<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chtml")
            .field("options", &self.options)
            .field("metrics", &self.metrics)
            .field("chars", &self.used.len())
            .finish()
    }
}

impl Chtml<TexFont> {
    pub fn new(options: ChtmlOptions) -> Self {
        Chtml::with_font(options, TexFont::new())
    }
}

impl<F: FontData> Chtml<F> {
    pub fn with_font(options: ChtmlOptions, font: F) -> Self {
        let metrics = Metrics::from_options(&options);
        Chtml {
            options,
            font,
            metrics,
            used: BTreeSet::new(),
            kinds: BTreeSet::new(),
            post_filters: FunctionList::new(),
        }
    }

    pub fn options(&self) -> &ChtmlOptions {
        &self.options
    }

    pub fn font(&self) -> &F {
        &self.font
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Use metrics measured in the surrounding document
    pub fn set_metrics(&mut self, metrics: Metrics) {
        self.metrics = metrics;
    }

    /// Forget the characters and elements used so far
    pub fn reset(&mut self) {
        self.used.clear();
        self.kinds.clear();
    }

    /// Lay out `tree` and build its `mjx-container`. The TeX classes of the nodes are computed first.
    pub fn typeset(&mut self, tree: &mut MmlTree) -> Element {
        let mut container = Element::new("mjx-container")
            .with_attribute("class", "MathJax")
            .with_attribute("jax", "CHTML");
        let Some(root) = tree.root() else { return container };
        tree.set_tex_class(root, None);
        let tree: &MmlTree = tree;

        let display = tree[root].attributes.get_str("display") == "block";
        let metrics = self.metrics;
        let (used, kinds, pwidth) = {
            let mut wrappers = WrapperTree::new(tree, &self.font, &self.options, metrics);
            let top = wrappers.wrap(root);
            let bbox = wrappers.bbox(top);
            let pwidth = bbox.pwidth.is_some();
            if pwidth {
                let width = metrics.container_width / (metrics.em * metrics.scale);
                if wrappers.resolve_percent_widths(top, width) {
                    let bbox = wrappers.bbox(top);
                    debug!("percentage widths resolved, math is {}em wide", bbox.w);
                }
            }
            wrappers.to_chtml(top, &mut container);
            if display {
                let (align, shift) = self.align_shift(&wrappers, top);
                if let Some(math) = container.last_element_mut() {
                    math.set_attribute("display", "true");
                    if shift != 0. {
                        if align == "center" || align == "left" {
                            math.set_style("margin-left", em(shift));
                        }
                        if align == "center" || align == "right" {
                            math.set_style("margin-right", em(-shift));
                        }
                    }
                }
                if align != "center" {
                    container.set_attribute("justify", align);
                }
            }
            (mem::take(&mut wrappers.used), mem::take(&mut wrappers.kinds), pwidth)
        };
        self.used.extend(used);
        self.kinds.extend(kinds);

        if let Some(math) = container.last_element_mut() {
            math.add_class("MJX-TEX");
        }
        if (metrics.scale - 1.).abs() >= 0.001 {
            container.set_style("font-size", percent(metrics.scale));
        }
        if display {
            container.set_attribute("display", "true");
        }
        if pwidth {
            container.set_attribute("width", "full");
        }
        self.post_filters.execute(&mut container);
        container
    }

    /// Alignment and indentation of display math: those of the `<math>` element unless `auto`
    fn align_shift(&self, wrappers: &WrapperTree<F>, top: WrapperId) -> (String, f64) {
        let mut align = wrappers.attr_str(top, "indentalign");
        if align.is_empty() || align == "auto" {
            align = self.options.display_align.clone();
        }
        let mut shift = wrappers.attr_str(top, "indentshift");
        if shift.is_empty() || shift == "auto" {
            shift = self.options.display_indent.clone();
        }
        let em_px = self.metrics.em * self.metrics.scale;
        (align, lengths::length2em(&shift, 0., 1., em_px))
    }

    /// The container shown for math that failed to typeset
    pub fn typeset_error(&self, message: &str) -> Element {
        let message = message.lines().next().unwrap_or_default();
        let mut text = Element::new("mjx-utext");
        text.append_text("Math output error");
        Element::new("mjx-container")
            .with_attribute("class", "MathJax")
            .with_attribute("jax", "CHTML")
            .with_attribute("data-mjx-error", message)
            .with_child(Element::new("span")
                .with_attribute("title", message)
                .with_style("color", "red")
                .with_style("background-color", "yellow")
                .with_style("line-height", "normal")
                .with_child(text))
    }

    /// The stylesheet for everything typeset so far (or for everything, without `adaptiveCSS`)
    pub fn styles(&self) -> CssStyles {
        let mut styles = CssStyles::new();
        for (selector, declarations) in CORE_STYLES {
            styles.add(selector, declarations);
        }
        for (kind, rules) in KIND_STYLES {
            if self.options.adaptive_css && !self.kinds.contains(*kind) {
                continue;
            }
            for (selector, declarations) in rules.iter() {
                styles.add(selector, declarations);
            }
        }
        self.font_styles(&mut styles);
        self.char_styles(&mut styles);
        styles
    }

    /// `@font-face` rules and the font class of each variant
    fn font_styles(&self, styles: &mut CssStyles) {
        let url = self.options.font_url.trim_end_matches('/');
        let zero = format!("url(\"{}/MathJax_Zero.woff\") format(\"woff\")", url);
        styles.add("@font-face /* 0 */", &[("font-family", "MJXZERO"), ("src", zero.as_str())]);
        styles.add(".MJX-TEX", &[("font-family", "MJXZERO, MJXTEX")]);

        let used: BTreeSet<&str> = self.used.iter().map(|(variant, _)| *variant).collect();
        let mut families = BTreeSet::new();
        for variant in self.font.variants() {
            if variant.letter.is_empty() || (self.options.adaptive_css && !used.contains(variant.name)) {
                continue;
            }
            let family = format!("MJXZERO, {}", variant.family);
            styles.add(&format!(".TEX-{}", variant.letter), &[("font-family", family.as_str())]);
            families.insert(variant.family);
        }
        for family in families {
            let Some(file) = FONT_FILES.get(family) else { continue };
            let src = format!("url(\"{}/{}.woff\") format(\"woff\")", url, file);
            styles.add(&format!("@font-face /* {} */", family), &[("font-family", family), ("src", src.as_str())]);
        }
    }

    /// One rule per character, giving its box as padding and its glyph as content
    fn char_styles(&self, styles: &mut CssStyles) {
        let mut chars: Vec<(&'static str, char)> = Vec::new();
        if self.options.adaptive_css {
            chars.extend(self.used.iter().copied());
        } else {
            for variant in self.font.variants() {
                if let Some(table) = variant.chars {
                    chars.extend(table.keys().map(|&c| (variant.name, c)));
                }
            }
            chars.sort_unstable();
        }
        for (variant, c) in chars {
            let Some((data, found)) = self.font.char_data(variant, c) else { continue };
            let mut selector = format!("mjx-c.{}", char_class(c));
            if let Some(class) = found.font_class() {
                selector.push('.');
                selector.push_str(&class);
            }
            selector.push_str("::before");
            let padding = format!("{} {} {} 0", em(data.h), em(data.w + data.ic), em(data.d));
            let content = css_content(c);
            styles.add(&selector, &[("padding", padding.as_str()), ("content", content.as_str())]);
        }
    }
}

/// A character as a CSS string
fn css_content(c: char) -> String {
    if c.is_ascii_alphanumeric() {
        format!("\"{}\"", c)
    } else {
        format!("\"\\{:X}\"", c as u32)
    }
}

type Rules = &'static [(&'static str, &'static [(&'static str, &'static str)])];

static FONT_FILES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "MJXTEX"      => "MathJax_Main-Regular",
    "MJXTEX-B"    => "MathJax_Main-Bold",
    "MJXTEX-I"    => "MathJax_Math-Italic",
    "MJXTEX-MI"   => "MathJax_Main-Italic",
    "MJXTEX-BI"   => "MathJax_Math-BoldItalic",
    "MJXTEX-S1"   => "MathJax_Size1-Regular",
    "MJXTEX-S2"   => "MathJax_Size2-Regular",
    "MJXTEX-S3"   => "MathJax_Size3-Regular",
    "MJXTEX-S4"   => "MathJax_Size4-Regular",
    "MJXTEX-A"    => "MathJax_AMS-Regular",
    "MJXTEX-C"    => "MathJax_Calligraphic-Regular",
    "MJXTEX-C-B"  => "MathJax_Calligraphic-Bold",
    "MJXTEX-FR"   => "MathJax_Fraktur-Regular",
    "MJXTEX-FR-B" => "MathJax_Fraktur-Bold",
    "MJXTEX-SS"   => "MathJax_SansSerif-Regular",
    "MJXTEX-SS-B" => "MathJax_SansSerif-Bold",
    "MJXTEX-SS-I" => "MathJax_SansSerif-Italic",
    "MJXTEX-SC"   => "MathJax_Script-Regular",
    "MJXTEX-SC-B" => "MathJax_Script-Regular",
    "MJXTEX-T"    => "MathJax_Typewriter-Regular",
};

const CORE_STYLES: Rules = &[
    ("mjx-container[jax=\"CHTML\"]", &[("line-height", "0")]),
    ("mjx-container [space=\"1\"]", &[("margin-left", ".111em")]),
    ("mjx-container [space=\"2\"]", &[("margin-left", ".167em")]),
    ("mjx-container [space=\"3\"]", &[("margin-left", ".222em")]),
    ("mjx-container [space=\"4\"]", &[("margin-left", ".278em")]),
    ("mjx-container [space=\"5\"]", &[("margin-left", ".333em")]),
    ("mjx-container [rspace=\"1\"]", &[("margin-right", ".111em")]),
    ("mjx-container [rspace=\"2\"]", &[("margin-right", ".167em")]),
    ("mjx-container [rspace=\"3\"]", &[("margin-right", ".222em")]),
    ("mjx-container [rspace=\"4\"]", &[("margin-right", ".278em")]),
    ("mjx-container [rspace=\"5\"]", &[("margin-right", ".333em")]),
    ("mjx-container[jax=\"CHTML\"][display=\"true\"]", &[
        ("display", "block"), ("text-align", "center"), ("margin", "1em 0"),
    ]),
    ("mjx-container[jax=\"CHTML\"][display=\"true\"][width=\"full\"]", &[("display", "flex")]),
    ("mjx-container[jax=\"CHTML\"][display=\"true\"] mjx-math", &[("padding", "0")]),
    ("mjx-container[jax=\"CHTML\"][justify=\"left\"]", &[("text-align", "left")]),
    ("mjx-container[jax=\"CHTML\"][justify=\"right\"]", &[("text-align", "right")]),
    ("mjx-math", &[
        ("display", "inline-block"), ("text-align", "left"), ("line-height", "0"), ("text-indent", "0"),
        ("font-style", "normal"), ("font-weight", "normal"), ("font-size", "100%"),
        ("letter-spacing", "normal"), ("border-collapse", "collapse"), ("word-wrap", "normal"),
        ("word-spacing", "normal"), ("white-space", "nowrap"), ("direction", "ltr"), ("padding", "1px 0"),
    ]),
    ("mjx-c", &[("display", "inline-block")]),
    ("mjx-c::before", &[("display", "block"), ("width", "0")]),
    ("mjx-utext", &[("display", "inline-block"), ("padding", ".75em 0 .2em 0")]),
    ("mjx-texatom, mjx-mrow, mjx-mstyle, mjx-merror, mjx-mphantom, mjx-semantics, mjx-maction", &[
        ("display", "inline-block"),
    ]),
    ("mjx-mi, mjx-mn, mjx-mo, mjx-mtext, mjx-ms, mjx-mspace, mjx-mglyph", &[
        ("display", "inline-block"), ("text-align", "left"),
    ]),
    (".mjx-n mjx-c", &[("font-family", "MJXZERO, MJXTEX")]),
    (".mjx-i mjx-c", &[("font-family", "MJXZERO, MJXTEX-I")]),
    (".mjx-b mjx-c", &[("font-family", "MJXZERO, MJXTEX-B")]),
];

const KIND_STYLES: &[(&str, Rules)] = &[
    ("mjx-mo", &[
        ("mjx-mo", &[("display", "inline-block"), ("text-align", "left")]),
    ]),
    ("mjx-stretchy-v", &[
        ("mjx-stretchy-v", &[("display", "inline-block")]),
        ("mjx-stretchy-v > *", &[("display", "block")]),
        ("mjx-stretchy-v > mjx-ext", &[("overflow", "hidden")]),
        ("mjx-stretchy-v > mjx-ext > mjx-c", &[("transform-origin", "0 0")]),
        ("mjx-stretchy-v > mjx-mark", &[("height", "0")]),
    ]),
    ("mjx-stretchy-h", &[
        ("mjx-stretchy-h", &[("display", "inline-table"), ("width", "100%")]),
        ("mjx-stretchy-h > *", &[("display", "table-cell"), ("width", "0")]),
        ("mjx-stretchy-h > mjx-ext", &[("overflow", "hidden")]),
        ("mjx-stretchy-h > mjx-ext > mjx-c", &[("transform-origin", "0 0")]),
    ]),
    ("mjx-mfrac", &[
        ("mjx-frac", &[("display", "inline-block"), ("vertical-align", "0.17em"), ("padding", "0 .22em")]),
        ("mjx-frac[type=\"d\"]", &[("vertical-align", ".04em")]),
        ("mjx-frac[delims]", &[("padding", "0 .1em")]),
        ("mjx-frac[atop]", &[("padding", "0 .12em")]),
        ("mjx-frac[atop][delims]", &[("padding", "0")]),
        ("mjx-dtable", &[("display", "inline-table"), ("width", "100%")]),
        ("mjx-dtable > *", &[("font-size", "2000%")]),
        ("mjx-dbox", &[("display", "block"), ("font-size", "5%")]),
        ("mjx-num", &[("display", "block"), ("text-align", "center")]),
        ("mjx-den", &[("display", "block"), ("text-align", "center")]),
        ("mjx-num[align=\"left\"], mjx-den[align=\"left\"]", &[("text-align", "left")]),
        ("mjx-num[align=\"right\"], mjx-den[align=\"right\"]", &[("text-align", "right")]),
        ("mjx-nstrut", &[
            ("display", "inline-block"), ("height", ".054em"), ("width", "0"), ("vertical-align", "-.054em"),
        ]),
        ("mjx-nstrut[type=\"d\"]", &[("height", ".217em"), ("vertical-align", "-.217em")]),
        ("mjx-dstrut", &[("display", "inline-block"), ("height", ".505em"), ("width", "0")]),
        ("mjx-dstrut[type=\"d\"]", &[("height", ".726em")]),
        ("mjx-frac mjx-line", &[
            ("display", "block"), ("box-sizing", "border-box"), ("min-height", "1px"), ("height", ".06em"),
            ("border-top", ".06em solid"), ("margin", ".06em -.1em"), ("overflow", "hidden"),
        ]),
        ("mjx-frac mjx-line[type=\"d\"]", &[("margin", ".18em -.1em")]),
        ("mjx-dtable > mjx-row", &[("display", "table-row")]),
        ("mjx-dtable > mjx-row > mjx-den", &[("display", "table-cell")]),
    ]),
    ("mjx-sqrt", &[
        ("mjx-root", &[("display", "inline-block"), ("white-space", "nowrap")]),
        ("mjx-surd", &[("display", "inline-block"), ("vertical-align", "top")]),
        ("mjx-sqrt", &[("display", "inline-block"), ("padding-top", ".07em")]),
        ("mjx-sqrt > mjx-box", &[("border-top", ".07em solid")]),
        ("mjx-sqrt.mjx-tall > mjx-box", &[("padding-left", ".3em"), ("margin-left", "-.3em")]),
    ]),
    ("mjx-script", &[
        ("mjx-script", &[("display", "inline-block"), ("padding-right", ".05em"), ("padding-left", ".033em")]),
        ("mjx-script > *", &[("display", "block")]),
    ]),
    ("mjx-munderover", &[
        ("mjx-over", &[("text-align", "left")]),
        ("mjx-munderover:not([limits=\"false\"])", &[("display", "inline-block")]),
        ("mjx-munderover:not([limits=\"false\"]) > *", &[("display", "block")]),
        ("mjx-munderover:not([limits=\"false\"]) > mjx-box > mjx-munder", &[("display", "inline-table")]),
        ("mjx-munder > mjx-row", &[("display", "table-row"), ("text-align", "left")]),
    ]),
    ("mjx-munder", &[
        ("mjx-munder:not([limits=\"false\"])", &[("display", "inline-table")]),
        ("mjx-munder > mjx-row", &[("display", "table-row"), ("text-align", "left")]),
        ("mjx-under", &[("padding-bottom", ".1em")]),
    ]),
    ("mjx-mover", &[
        ("mjx-mover:not([limits=\"false\"])", &[("display", "inline-block"), ("padding-top", ".1em")]),
        ("mjx-mover:not([limits=\"false\"]) > *", &[("display", "block"), ("text-align", "left")]),
    ]),
    ("mjx-scripts", &[
        ("mjx-prescripts, mjx-scripts", &[("display", "inline-table"), ("padding-left", ".05em")]),
        ("mjx-scripts", &[("padding-left", ".033em")]),
        ("mjx-prescripts > mjx-row, mjx-scripts > mjx-row", &[("display", "table-row")]),
        ("mjx-prescripts > mjx-row > mjx-cell, mjx-scripts > mjx-row > mjx-cell", &[("display", "table-cell")]),
        ("mjx-prescripts > mjx-row > mjx-cell", &[("text-align", "right")]),
        ("mjx-scripts > mjx-row > mjx-cell", &[("text-align", "left")]),
        ("[script-align=\"left\"] > mjx-row > mjx-cell", &[("text-align", "left")]),
        ("[script-align=\"center\"] > mjx-row > mjx-cell", &[("text-align", "center")]),
        ("[script-align=\"right\"] > mjx-row > mjx-cell", &[("text-align", "right")]),
    ]),
    ("mjx-prescripts", &[
        ("mjx-prescripts", &[("display", "inline-table"), ("padding-left", ".05em")]),
        ("mjx-prescripts > mjx-row", &[("display", "table-row")]),
        ("mjx-prescripts > mjx-row > mjx-cell", &[("display", "table-cell"), ("text-align", "right")]),
    ]),
    ("mjx-itable", &[
        ("mjx-mtable", &[("display", "inline-block"), ("text-align", "center"), ("vertical-align", ".25em"),
                         ("position", "relative"), ("box-sizing", "border-box"), ("border-spacing", "0")]),
        ("mjx-table", &[("display", "inline-block"), ("vertical-align", "-.5ex"), ("box-sizing", "border-box")]),
        ("mjx-itable", &[("display", "inline-table"), ("width", "auto")]),
        ("mjx-mtr", &[("display", "table-row"), ("text-align", "left")]),
        ("mjx-mtd", &[("display", "table-cell"), ("text-align", "center"), ("padding", ".215em .4em")]),
        ("mjx-tstrut", &[("display", "inline-block"), ("height", "1em"), ("vertical-align", "-.25em")]),
        ("mjx-labels", &[("position", "absolute"), ("left", "0"), ("top", "0")]),
    ]),
    ("mjx-menclose", &[
        ("mjx-menclose", &[("display", "inline-block"), ("text-align", "left"), ("position", "relative")]),
        ("mjx-menclose > mjx-box", &[("display", "inline-block"), ("box-sizing", "border-box")]),
        ("mjx-menclose > mjx-line", &[("position", "absolute"), ("display", "inline-block"), ("height", "0"),
                                      ("transform-origin", "0 50%")]),
        ("mjx-menclose > mjx-ellipse", &[("position", "absolute"), ("display", "inline-block"),
                                         ("box-sizing", "border-box"), ("border-radius", "50%")]),
        ("mjx-menclose > mjx-arc", &[("position", "absolute"), ("display", "inline-block"),
                                     ("box-sizing", "border-box")]),
    ]),
    ("mjx-mpadded", &[
        ("mjx-mpadded", &[("display", "inline-block")]),
        ("mjx-rbox", &[("display", "inline-block"), ("position", "relative")]),
        ("mjx-block", &[("display", "inline-block")]),
    ]),
    ("mjx-mphantom", &[
        ("mjx-mphantom", &[("visibility", "hidden")]),
    ]),
    ("mjx-merror", &[
        ("mjx-merror", &[("display", "inline-block"), ("color", "red"), ("background-color", "yellow")]),
    ]),
];


#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MmlTree;

    fn fraction(display: bool) -> MmlTree {
        let mut tree = MmlTree::default();
        let one = tree.create_token("mn", "1");
        let two = tree.create_token("mn", "2");
        let frac = tree.create_node("mfrac", &[one, two]);
        let math = tree.create_node("math", &[frac]);
        if display {
            tree[math].attributes.set("display", "block");
        }
        tree.set_root(math);
        tree.inherit_attributes(math);
        tree
    }

    #[test]
    fn option_names_are_camel_case() {
        let defaults = ChtmlOptions::defaults();
        for key in ["scale", "minScale", "mathmlSpacing", "displayAlign", "displayIndent",
                    "adaptiveCSS", "exFactor", "em", "containerWidth", "fontURL"] {
            assert!(defaults.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn scale_matches_the_surrounding_ex() {
        let metrics = Metrics::from_options(&ChtmlOptions::default());
        assert!((metrics.scale - 0.5 / 0.442).abs() < 1e-9);
        let small = ChtmlOptions { scale: 0.1, ..ChtmlOptions::default() };
        assert_eq!(Metrics::from_options(&small).scale, 0.5);
    }

    #[test]
    fn container_holds_the_math() {
        let mut chtml = Chtml::new(ChtmlOptions::default());
        let mut tree = fraction(false);
        let container = chtml.typeset(&mut tree);
        assert_eq!(container.kind, "mjx-container");
        assert_eq!(container.attribute("jax"), Some("CHTML"));
        assert_eq!(container.attribute("class"), Some("MathJax"));
        assert_eq!(container.style("font-size"), Some("113.1%"));
        let math = container.find("mjx-math").unwrap();
        assert!(math.has_class("MJX-TEX"));
        assert!(container.find("mjx-mfrac").is_some());
        assert!(container.attribute("display").is_none());
    }

    #[test]
    fn display_math_is_justified() {
        let options = ChtmlOptions { display_align: "left".into(), display_indent: "2em".into(), ..ChtmlOptions::default() };
        let mut chtml = Chtml::new(options);
        let mut tree = fraction(true);
        let container = chtml.typeset(&mut tree);
        assert_eq!(container.attribute("display"), Some("true"));
        assert_eq!(container.attribute("justify"), Some("left"));
        let math = container.find("mjx-math").unwrap();
        assert_eq!(math.style("margin-left"), Some("2em"));
    }

    #[test]
    fn adaptive_styles_only_cover_what_was_used() {
        let mut chtml = Chtml::new(ChtmlOptions::default());
        let mut tree = fraction(false);
        chtml.typeset(&mut tree);
        let styles = chtml.styles();
        assert!(styles.has("mjx-c.mjx-c31.TEX-N::before"));
        assert!(styles.has("mjx-c.mjx-c32.TEX-N::before"));
        assert!(!styles.has("mjx-c.mjx-c33.TEX-N::before"));
        assert!(styles.has("mjx-frac"));
        assert!(!styles.has("mjx-sqrt"));
        let content = styles.get("mjx-c.mjx-c31.TEX-N::before").unwrap();
        assert!(content.iter().any(|(name, value)| name == "content" && value == "\"1\""));

        chtml.reset();
        assert!(!chtml.styles().has("mjx-c.mjx-c31.TEX-N::before"));
    }

    #[test]
    fn full_styles_cover_the_whole_font() {
        let options = ChtmlOptions { adaptive_css: false, ..ChtmlOptions::default() };
        let chtml = Chtml::new(options);
        let styles = chtml.styles();
        assert!(styles.has("mjx-c.mjx-c33.TEX-N::before"));
        assert!(styles.has("mjx-sqrt"));
        assert!(styles.has("@font-face /* MJXTEX */"));
    }

    #[test]
    fn css_strings() {
        assert_eq!(css_content('x'), "\"x\"");
        assert_eq!(css_content('\u{221A}'), "\"\\221A\"");
    }
}
