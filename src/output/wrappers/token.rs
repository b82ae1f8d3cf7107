//! Tokens: `mi`, `mn`, `mtext`, `ms`, `mo`, `mspace` and `mglyph`.

use crate::lengths::em;
use crate::output::bbox::BBox;
use crate::output::font::{Delimiter, Direction, FontData};
use crate::output::html::Element;
use crate::output::wrapper::{char_class, StretchSize, WrapperId, WrapperTree};
use crate::tree::classes::Role;
use crate::tree::tex_class::TexClass;

impl<'a, F: FontData> WrapperTree<'a, F> {
    pub(crate) fn token_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        self.text_bbox(id, bbox);
        if self.role(id) == Role::Identifier {
            bbox.w += bbox.ic;
        }
    }

    pub(crate) fn mo_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let stretch = self[id].stretch;
        if stretch.is_some() && self[id].size.is_none() {
            self.stretch_to(id, &[0.], false);
        }
        if let Some(StretchSize::Assembled { h, d, w }) = self[id].size {
            bbox.set_h(h);
            bbox.set_d(d);
            bbox.w = w;
        } else {
            self.text_bbox(id, bbox);
            if bbox.w == 0. && self.is_null_delimiter(id) {
                bbox.r = self.params().nulldelimiterspace;
            }
            bbox.w += bbox.ic;
        }
        if self.attr_bool(id, "symmetric") && stretch.map_or(true, |d| d.dir != Direction::Horizontal) {
            let offset = self.vcenter_offset(bbox);
            bbox.set_h(bbox.h() + offset);
            bbox.set_d(bbox.d() - offset);
        }
        let assembled = matches!(self[id].size, Some(StretchSize::Assembled { .. }));
        if self.property_bool(id, "mathaccent") && !assembled {
            bbox.w = 0.;
        }
    }

    /// An empty fence still takes TeX's null delimiter space
    fn is_null_delimiter(&self, id: WrapperId) -> bool {
        if self[id].glyph.is_some() || self.options.mathml_spacing {
            return false;
        }
        let node = self.node(id);
        node.attributes.get_explicit("fence").is_some()
            && node.text().is_empty()
            && matches!(node.tex_class, Some(TexClass::Open) | Some(TexClass::Close))
    }

    pub(crate) fn token_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let text = self.text(id);
        let variant = self.variant_name(id);
        self.add_text(&mut element, &text, variant);
        element
    }

    pub(crate) fn mo_html(&mut self, id: WrapperId) -> Element {
        let stretch = self[id].stretch;
        if stretch.is_some() && self[id].size.is_none() {
            self.stretch_to(id, &[], false);
        }
        let mut element = self.standard_node(id);
        if let (Some(StretchSize::Assembled { .. }), Some(delim)) = (self[id].size, stretch) {
            self.stretch_html(id, &mut element, delim);
            return element;
        }
        let symmetric = self.attr_bool(id, "symmetric") && stretch.map_or(true, |d| d.dir != Direction::Horizontal);
        if symmetric || self.attr_bool(id, "largeop") {
            let mut bbox = BBox::empty();
            self.text_bbox(id, &mut bbox);
            let u = em(self.vcenter_offset(&bbox));
            if u != "0" {
                element.set_style("vertical-align", u);
            }
        }
        if self.property_bool(id, "mathaccent") {
            let mut bbox = BBox::empty();
            self.text_bbox(id, &mut bbox);
            element.set_style("width", "0");
            element.set_style("margin-left", em(-bbox.w / 2.));
        }
        let text = self.text(id);
        let variant = self.variant_name(id);
        self.add_text(&mut element, &text, variant);
        element
    }

    /// An assembled delimiter: its pieces stacked (or lined up), the extenders stretched to fill
    fn stretch_html(&mut self, id: WrapperId, element: &mut Element, delim: &'static Delimiter) {
        let Some(assembly) = delim.stretch else { return };
        let font: &'a F = self.font;
        let bbox = self.bbox(id);
        let vertical = delim.dir == Direction::Vertical;
        let size = if vertical { bbox.total() } else { bbox.w };
        let extent = |c: char| {
            font.char_data(assembly.variant, c)
                .map_or(0., |(data, _)| if vertical { data.h + data.d } else { data.w })
        };
        let fixed: f64 = [assembly.begin, assembly.middle, assembly.end].iter().flatten().map(|&c| extent(c)).sum();
        let count = if assembly.middle.is_some() { 2. } else { 1. };
        let ext_size = ((size - fixed) / count).max(0.);
        let natural = extent(assembly.ext);
        let ext_scale = if natural > 0. { ext_size / natural } else { 1. };

        let kind = if vertical { "mjx-stretchy-v" } else { "mjx-stretchy-h" };
        self.kinds.insert(kind.to_string());
        let c = self.text(id).chars().next().unwrap_or(' ');
        let mut stretchy = Element::new(kind).with_attribute("class", char_class(c));
        if let Some(begin) = assembly.begin {
            stretchy.append(Element::new("mjx-beg").with_child(self.piece(begin, assembly.variant)));
        }
        stretchy.append(self.extender(assembly.ext, assembly.variant, vertical, ext_size, ext_scale));
        if let Some(middle) = assembly.middle {
            stretchy.append(Element::new("mjx-mid").with_child(self.piece(middle, assembly.variant)));
            stretchy.append(self.extender(assembly.ext, assembly.variant, vertical, ext_size, ext_scale));
        }
        if let Some(end) = assembly.end {
            stretchy.append(Element::new("mjx-end").with_child(self.piece(end, assembly.variant)));
        }
        if vertical {
            stretchy.append(Element::new("mjx-mark"));
            stretchy.set_style("height", em(bbox.total()));
            stretchy.set_style("vertical-align", em(-bbox.d()));
        } else {
            stretchy.set_style("width", em(bbox.w));
        }
        trace!("assembled {:?} to {}em", c, size);
        element.append(stretchy);
    }

    /// One piece of an assembled delimiter
    fn piece(&mut self, c: char, variant: &str) -> Element {
        match self.font.char_data(variant, c) {
            Some((_, found)) => self.char_element(c, found),
            None => Element::new("mjx-c").with_attribute("class", char_class(c)),
        }
    }

    fn extender(&mut self, c: char, variant: &str, vertical: bool, size: f64, scale: f64) -> Element {
        let mut piece = self.piece(c, variant);
        let (dimension, transform) = if vertical {
            ("height", format!("scaleY({:.3})", scale))
        } else {
            ("width", format!("scaleX({:.3})", scale))
        };
        piece.set_style("transform", transform);
        Element::new("mjx-ext").with_style(dimension, em(size)).with_child(piece)
    }

    pub(crate) fn mspace_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        bbox.w = self.length2em(id, &self.attr_str(id, "width"), 0.);
        bbox.set_h(self.length2em(id, &self.attr_str(id, "height"), 0.));
        bbox.set_d(self.length2em(id, &self.attr_str(id, "depth"), 0.));
    }

    pub(crate) fn mspace_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let bbox = self.bbox(id);
        let mut w = bbox.w;
        if w < 0. {
            element.set_style("margin-right", em(w));
            w = 0.;
        }
        if w != 0. {
            element.set_style("width", em(w));
        }
        let h = (bbox.h() + bbox.d()).max(0.);
        if h != 0. {
            element.set_style("height", em(h));
        }
        if bbox.d() != 0. {
            element.set_style("vertical-align", em(-bbox.d()));
        }
        element
    }

    /// Width, height and vertical offset of an image
    fn glyph_dimensions(&self, id: WrapperId) -> (f64, f64, f64) {
        let dimension = |name: &str| {
            let value = self.attr_str(id, name);
            if value.is_empty() || value == "auto" { 1. } else { self.length2em(id, &value, 1.) }
        };
        let valign = self.length2em(id, &self.attr_str(id, "valign"), 0.);
        (dimension("width"), dimension("height"), valign)
    }

    pub(crate) fn mglyph_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let (w, h, valign) = self.glyph_dimensions(id);
        bbox.w = w;
        bbox.set_h(h + valign);
        bbox.set_d(-valign);
    }

    pub(crate) fn mglyph_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let (w, h, valign) = self.glyph_dimensions(id);
        let alt = self.attr_str(id, "alt");
        let mut img = Element::new("img")
            .with_attribute("src", self.attr_str(id, "src"))
            .with_attribute("alt", alt.as_str())
            .with_attribute("title", alt)
            .with_style("width", em(w))
            .with_style("height", em(h));
        if valign != 0. {
            img.set_style("vertical-align", em(valign));
        }
        element.append(img);
        element
    }
}


#[cfg(test)]
mod tests {
    use crate::output::chtml::{ChtmlOptions, Metrics};
    use crate::output::font::TexFont;
    use crate::output::html::Element;
    use crate::output::wrapper::WrapperTree;
    use crate::tree::MmlTree;

    fn render(tree: &mut MmlTree, root: crate::tree::NodeId) -> Element {
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(tree, &font, &options, Metrics::from_options(&options));
        let id = wrappers.wrap(root);
        let mut parent = Element::new("mjx-container");
        wrappers.to_chtml(id, &mut parent);
        parent
    }

    #[test]
    fn identifiers_use_the_italic_font() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let root = tree.create_node("math", &[x]);
        let html = render(&mut tree, root);
        let mi = html.find("mjx-mi").unwrap();
        assert!(mi.has_class("mjx-i"));
        let c = mi.find("mjx-c").unwrap();
        assert_eq!(c.attribute("class"), Some("mjx-c78 TEX-I"));
    }

    #[test]
    fn minus_sign_is_remapped() {
        let mut tree = MmlTree::default();
        let minus = tree.create_token("mo", "-");
        let root = tree.create_node("math", &[minus]);
        let html = render(&mut tree, root);
        let c = html.find("mjx-c").unwrap();
        assert!(c.has_class("mjx-c2212"));
    }

    #[test]
    fn unknown_characters_become_text() {
        let mut tree = MmlTree::default();
        let text = tree.create_token("mtext", "\u{4E2D}");
        let root = tree.create_node("math", &[text]);
        let html = render(&mut tree, root);
        let utext = html.find("mjx-utext").unwrap();
        assert_eq!(utext.text_content(), "\u{4E2D}");
        assert!(html.find("mjx-c").is_none());
    }

    #[test]
    fn string_literal_gets_curly_quotes() {
        let mut tree = MmlTree::default();
        let ms = tree.create_token("ms", "a");
        let root = tree.create_node("math", &[ms]);
        let html = render(&mut tree, root);
        let classes: Vec<_> = html.find_all("mjx-c").iter().filter_map(|c| c.attribute("class")).map(str::to_string).collect();
        assert!(classes[0].starts_with("mjx-c201C"));
        assert!(classes[2].starts_with("mjx-c201D"));
    }

    #[test]
    fn negative_space_becomes_a_margin() {
        let mut tree = MmlTree::default();
        let space = tree.create("mspace");
        tree[space].attributes.set("width", "-0.5em");
        let root = tree.create_node("math", &[space]);
        let html = render(&mut tree, root);
        let mspace = html.find("mjx-mspace").unwrap();
        assert_eq!(mspace.style("margin-right"), Some("-0.5em"));
        assert_eq!(mspace.style("width"), None);
    }

    #[test]
    fn tall_parenthesis_is_assembled() {
        let mut tree = MmlTree::default();
        let open = tree.create_token("mo", "(");
        let space = tree.create("mspace");
        tree[space].attributes.set("height", "3em");
        tree[space].attributes.set("depth", "2em");
        let close = tree.create_token("mo", ")");
        let root = tree.create_node("math", &[open, space, close]);
        let html = render(&mut tree, root);
        let stretchy = html.find_all("mjx-stretchy-v");
        assert_eq!(stretchy.len(), 2);
        assert!(stretchy[0].find("mjx-beg").is_some());
        assert!(stretchy[0].find("mjx-ext").is_some());
        assert!(stretchy[0].find("mjx-end").is_some());
    }
}
