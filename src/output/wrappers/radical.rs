//! `msqrt` and `mroot`. The surd is a stretchy `√` drawn by the radical; the rule over the base is
//! the top border of the base's box.

use crate::lengths::em;
use crate::output::bbox::BBox;
use crate::output::font::FontData;
use crate::output::html::Element;
use crate::output::wrapper::{StretchSize, WrapperId, WrapperTree};
use crate::tree::classes::Role;

/// Placement of the index of a root: `x` its width up to the surd, `h` its raise, `dx` the
/// padding on its left
pub(crate) struct RootIndex {
    pub x:  f64,
    pub h:  f64,
    pub dx: f64,
}

impl<'a, F: FontData> WrapperTree<'a, F> {
    fn root_index(&self, id: WrapperId) -> Option<WrapperId> {
        match self.role(id) {
            Role::Root => self.child(id, 1),
            _ => None,
        }
    }

    fn surd_is_assembled(&self, surd: WrapperId) -> bool {
        matches!(self[surd].size, Some(StretchSize::Assembled { .. }))
    }

    /// Gap between the base and the rule
    pub(crate) fn surd_gap(&self, id: WrapperId, sbox: &BBox, base: &BBox) -> f64 {
        let params = self.params();
        let t = params.rule_thickness;
        let p = if self.is_display(id) { params.x_height } else { t };
        let surd_h = self.surd_height(id, base);
        if sbox.total() > surd_h {
            (sbox.total() - (surd_h - 2. * t - p / 2.)) / 2.
        } else {
            t + p / 4.
        }
    }

    fn root_index_placement(&mut self, surd: WrapperId, index: WrapperId, sbox: &BBox, height: f64) -> RootIndex {
        let assembled = self.surd_is_assembled(surd);
        let offset = if assembled { 0.5 } else { 0.6 } * sbox.w;
        let ibox = self.bbox(index);
        let w = ibox.outer_width();
        let full = w.max(offset / ibox.rscale);
        let total = sbox.total();
        let raise = if assembled { 1.9 } else { 0.55 * total } - (total - height);
        RootIndex {
            x:  full * ibox.rscale - offset,
            h:  raise + (ibox.d() * ibox.rscale).max(0.),
            dx: (full - w).max(0.),
        }
    }

    /// Box of a radical: the optional index, the surd, then the base under the rule. The same
    /// layout serves the `radical` notation of `menclose`.
    pub(crate) fn radical_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let (Some(surd), Some(base)) = (self[id].aux, self.child(id, 0)) else { return self.row_bbox(id, bbox) };
        let sbox = self.bbox(surd);
        let basebox = self.bbox(base);
        let q = self.surd_gap(id, &sbox, &basebox);
        let t = self.params().rule_thickness;
        let height = basebox.h() + q + t;
        bbox.set_h(height + t);
        let mut x = 0.;
        if let Some(index) = self.root_index(id) {
            let placement = self.root_index_placement(surd, index, &sbox, height);
            let ibox = self.bbox(index);
            bbox.combine(&ibox, 0., placement.h);
            x = placement.x;
        }
        bbox.combine(&sbox, x, height - sbox.h());
        bbox.combine(&basebox, x + sbox.w, 0.);
        bbox.clean();
    }

    pub(crate) fn root_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        self.radical_bbox(id, bbox);
    }

    /// The surd and the base under its rule, as `mjx-sqrt`
    pub(crate) fn sqrt_html(&mut self, id: WrapperId) -> Option<(Element, f64)> {
        let (surd, base) = (self[id].aux?, self.child(id, 0)?);
        let sbox = self.bbox(surd);
        let basebox = self.bbox(base);
        let q = self.surd_gap(id, &sbox, &basebox);
        let height = basebox.h() + q + self.params().rule_thickness;

        let mut surd_element = Element::new("mjx-surd");
        self.to_chtml(surd, &mut surd_element);
        let mut base_element = Element::new("mjx-box").with_style("padding-top", em(q));
        self.to_chtml(base, &mut base_element);
        let mut sqrt = Element::new("mjx-sqrt").with_child(surd_element).with_child(base_element);
        if self.surd_is_assembled(surd) {
            sqrt.add_class("mjx-tall");
        }
        self.kinds.insert("mjx-sqrt".to_string());
        Some((sqrt, height))
    }

    pub(crate) fn root_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let Some(surd) = self[id].aux else { return element };
        if let Some(index) = self.root_index(id) {
            let sbox = self.bbox(surd);
            let basebox = self.child(id, 0).map(|base| self.bbox(base)).unwrap_or_default();
            let q = self.surd_gap(id, &sbox, &basebox);
            let height = basebox.h() + q + self.params().rule_thickness;
            let placement = self.root_index_placement(surd, index, &sbox, height);
            let mut root = Element::new("mjx-root")
                .with_style("vertical-align", em(placement.h))
                .with_style("width", em(placement.x));
            self.to_chtml(index, &mut root);
            if placement.dx != 0. {
                if let Some(first) = root.last_element_mut() {
                    first.set_style("padding-left", em(placement.dx));
                }
            }
            element.append(root);
        }
        if let Some((sqrt, _)) = self.sqrt_html(id) {
            element.append(sqrt);
        }
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

    fn layout(tree: &mut MmlTree, root: crate::tree::NodeId, node: crate::tree::NodeId) -> (crate::output::bbox::BBox, Element) {
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(tree, &font, &options, Metrics::from_options(&options));
        let top = wrappers.wrap(root);
        let id = wrappers.wrapper_for(node).unwrap();
        let bbox = wrappers.bbox(id);
        let mut parent = Element::new("mjx-container");
        wrappers.to_chtml(top, &mut parent);
        (bbox, parent)
    }

    #[test]
    fn square_root_covers_its_base() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let sqrt = tree.create_node("msqrt", &[x]);
        let root = tree.create_node("math", &[sqrt]);
        let (bbox, html) = layout(&mut tree, root, sqrt);
        assert!(bbox.h() > 0.442 + 0.06);
        assert!(bbox.w > 0.572 + 0.8);
        let sqrt = html.find("mjx-sqrt").unwrap();
        assert!(sqrt.find("mjx-surd").unwrap().find("mjx-c").unwrap().has_class("mjx-c221A"));
    }

    #[test]
    fn index_sits_left_of_the_surd() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let three = tree.create_token("mn", "3");
        let mroot = tree.create_node("mroot", &[x, three]);
        let root = tree.create_node("math", &[mroot]);
        let (_, html) = layout(&mut tree, root, mroot);
        let mroot = html.find("mjx-mroot").unwrap();
        let first = mroot.elements().next().unwrap();
        assert_eq!(first.kind, "mjx-root");
        assert!(first.style("vertical-align").is_some());
    }
}
