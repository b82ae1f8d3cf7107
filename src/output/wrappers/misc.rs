//! `mpadded`: the content's box with its dimensions changed, and the content shifted in it.

use crate::lengths::em;
use crate::output::bbox::BBox;
use crate::output::font::FontData;
use crate::output::html::Element;
use crate::output::wrapper::{WrapperId, WrapperTree};

/// The content's dimensions and the changes made to them
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Padding {
    pub h:  f64,
    pub d:  f64,
    pub w:  f64,
    pub dh: f64,
    pub dd: f64,
    pub dw: f64,
    /// `lspace`
    pub x:  f64,
    /// `voffset`
    pub y:  f64,
}

/// Which dimension of the content an `mpadded` value refers to
#[derive(Debug, Clone, Copy, PartialEq)]
enum Dimension {
    Width,
    Height,
    Depth,
}

impl Dimension {
    fn of(self, bbox: &BBox) -> f64 {
        match self {
            Dimension::Width  => bbox.w,
            Dimension::Height => bbox.h(),
            Dimension::Depth  => bbox.d(),
        }
    }
}

impl<'a, F: FontData> WrapperTree<'a, F> {
    /// Value of an `mpadded` attribute. A pseudo-unit (`width`, `height`, `depth`) makes it relative
    /// to that dimension of the content; a leading sign makes it relative to `dimension`.
    fn padded_dimension(&self, id: WrapperId, value: &str, content: &BBox, dimension: Option<Dimension>) -> f64 {
        let value = value.trim();
        let pseudo = [("width", Dimension::Width), ("height", Dimension::Height), ("depth", Dimension::Depth)]
            .into_iter()
            .find(|(name, _)| value.ends_with(name));
        let (number, size) = match pseudo {
            Some((name, dim)) => (value[.. value.len() - name.len()].trim(), dim.of(content)),
            None => (value, dimension.map_or(0., |dim| dim.of(content))),
        };
        let mut result = self.length2em(id, number, size);
        if let (true, Some(dim)) = (number.starts_with(['+', '-']), dimension) {
            result += dim.of(content);
        }
        result
    }

    pub(crate) fn padding(&mut self, id: WrapperId) -> Padding {
        let content = match self.child(id, 0) {
            Some(child) => self.bbox(child),
            None => BBox::zero(),
        };
        let attribute = |name: &str| self.attr_str(id, name);
        let (width, height, depth) = (attribute("width"), attribute("height"), attribute("depth"));
        let (lspace, voffset) = (attribute("lspace"), attribute("voffset"));

        let (w, h, d) = (content.w, content.h(), content.d());
        let mut padding = Padding { h, d, w, dh: 0., dd: 0., dw: 0., x: 0., y: 0. };
        if !width.is_empty() {
            padding.dw = self.padded_dimension(id, &width, &content, Some(Dimension::Width)).max(0.) - w;
        }
        if !height.is_empty() {
            padding.dh = self.padded_dimension(id, &height, &content, Some(Dimension::Height)).max(0.) - h;
        }
        if !depth.is_empty() {
            padding.dd = self.padded_dimension(id, &depth, &content, Some(Dimension::Depth)).max(0.) - d;
        }
        if !lspace.is_empty() {
            padding.x = self.padded_dimension(id, &lspace, &content, None);
        }
        if !voffset.is_empty() {
            padding.y = self.padded_dimension(id, &voffset, &content, None);
        }
        padding
    }

    pub(crate) fn padded_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let padding = self.padding(id);
        bbox.w = padding.w + padding.dw;
        bbox.set_h(padding.h + padding.dh);
        bbox.set_d(padding.d + padding.dd);
        if let Some(child) = self.child(id, 0) {
            bbox.pwidth = self.bbox(child).pwidth;
        }
    }

    pub(crate) fn padded_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let padding = self.padding(id);
        let mut block = Element::new("mjx-block");
        if padding.dw != 0. {
            block.set_style("width", em(padding.w + padding.dw));
        }
        if padding.dh != 0. {
            block.set_style("margin-top", em(padding.dh));
        }
        if padding.dd != 0. {
            block.set_style("margin-bottom", em(padding.dd));
        }
        let child = self.child(id, 0);
        if padding.x != 0. || padding.y != 0. {
            block.set_style("position", "relative");
            let mut rbox = Element::new("mjx-rbox")
                .with_style("left", em(padding.x))
                .with_style("top", em(-padding.y));
            if let Some(width) = block.style("width") {
                rbox.set_style("max-width", width.to_string());
            }
            if let Some(child) = child {
                self.to_chtml(child, &mut rbox);
            }
            block.append(rbox);
        } else if let Some(child) = child {
            self.to_chtml(child, &mut block);
        }
        element.append(block);
        element
    }
}


#[cfg(test)]
mod tests {
    use crate::output::bbox::BBox;
    use crate::output::chtml::{ChtmlOptions, Metrics};
    use crate::output::font::TexFont;
    use crate::output::html::Element;
    use crate::output::wrapper::WrapperTree;
    use crate::tree::MmlTree;

    fn padded(attributes: &[(&str, &str)]) -> (BBox, Element) {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let mpadded = tree.create_node("mpadded", &[x]);
        for (name, value) in attributes {
            tree[mpadded].attributes.set(*name, *value);
        }
        let root = tree.create_node("math", &[mpadded]);
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(&tree, &font, &options, Metrics::from_options(&options));
        let top = wrappers.wrap(root);
        let id = wrappers.wrapper_for(mpadded).unwrap();
        let bbox = wrappers.bbox(id);
        let mut parent = Element::new("mjx-container");
        wrappers.to_chtml(top, &mut parent);
        let element = parent.find("mjx-mpadded").unwrap().clone();
        (bbox, element)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn unchanged_without_attributes() {
        let (bbox, html) = padded(&[]);
        assert!(close(bbox.w, 0.572));
        assert!(close(bbox.h(), 0.442));
        let block = html.find("mjx-block").unwrap();
        assert!(block.styles.is_empty());
    }

    #[test]
    fn absolute_and_relative_sizes() {
        let (bbox, html) = padded(&[("width", "+1em"), ("height", "2height"), ("depth", "0")]);
        assert!(close(bbox.w, 1.572));
        assert!(close(bbox.h(), 0.884));
        assert!(close(bbox.d(), 0.));
        let block = html.find("mjx-block").unwrap();
        assert_eq!(block.style("width"), Some("1.572em"));
        assert_eq!(block.style("margin-top"), Some("0.442em"));
    }

    #[test]
    fn percentages_of_a_pseudo_unit() {
        let (bbox, _) = padded(&[("width", "50% width")]);
        assert!(close(bbox.w, 0.286));
    }

    #[test]
    fn offsets_move_the_content() {
        let (bbox, html) = padded(&[("lspace", "1em"), ("voffset", "-.5em")]);
        assert!(close(bbox.w, 0.572));
        let rbox = html.find("mjx-rbox").unwrap();
        assert_eq!(rbox.style("left"), Some("1em"));
        assert_eq!(rbox.style("top"), Some("0.5em"));
    }
}
