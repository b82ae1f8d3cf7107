//! `mfrac`: stacked fractions with a rule, without one (`linethickness="0"`), and bevelled.

use crate::lengths::em;
use crate::output::bbox::BBox;
use crate::output::font::{Direction, FontData};
use crate::output::html::Element;
use crate::output::wrapper::{WrapperId, WrapperTree};

/// Shifts of a fraction with a rule: `t` the clearance around the rule, `u` the numerator
/// shift above it and `v` the denominator shift below it
struct Tuv {
    t: f64,
    u: f64,
    v: f64,
}

/// Shifts of a fraction without a rule, with `q` the gap between numerator and denominator
struct Uvq {
    u: f64,
    v: f64,
    q: f64,
}

/// Placement of a bevelled fraction
struct Bevel {
    h:     f64,
    delta: f64,
    u:     f64,
    v:     f64,
}

impl<'a, F: FontData> WrapperTree<'a, F> {
    fn frac_parts(&self, id: WrapperId) -> Option<(WrapperId, WrapperId)> {
        Some((self.child(id, 0)?, self.child(id, 1)?))
    }

    /// Space on each side, dropped when delimiters already surround the fraction
    fn frac_pad(&self, id: WrapperId) -> f64 {
        if self.property_bool(id, "withDelims") { 0. } else { self.params().nulldelimiterspace }
    }

    /// Thickness of the rule, in em
    fn frac_thickness(&self, id: WrapperId) -> f64 {
        let thickness = self.length2em(id, &self.attr_str(id, "linethickness"), 0.06);
        thickness.max(0.)
    }

    pub(crate) fn frac_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let Some((num, den)) = self.frac_parts(id) else { return bbox.clean() };
        let display = self.is_display(id);
        let (nbox, dbox) = (self.bbox(num), self.bbox(den));
        if self.attr_bool(id, "bevelled") {
            let bevel = self.bevel_data(display, &nbox, &dbox);
            let aux = self[id].aux;
            let lbox = aux.map(|aux| self.bbox(aux)).unwrap_or_default();
            bbox.combine(&nbox, 0., bevel.u);
            let w = bbox.w;
            bbox.combine(&lbox, w - bevel.delta / 2., 0.);
            let w = bbox.w;
            bbox.combine(&dbox, w - bevel.delta / 2., bevel.v);
        } else {
            let thickness = self.frac_thickness(id);
            let pad = self.frac_pad(id);
            if thickness == 0. {
                let uvq = self.atop_uvq(display, &nbox, &dbox);
                bbox.combine(&nbox, 0., uvq.u);
                bbox.combine(&dbox, 0., -uvq.v);
                bbox.w += 2. * pad;
            } else {
                let a = self.params().axis_height;
                let tuv = self.fraction_tuv(display, thickness);
                bbox.combine(&nbox, 0., a + tuv.t + (nbox.d() * nbox.rscale).max(tuv.u));
                bbox.combine(&dbox, 0., a - tuv.t - (dbox.h() * dbox.rscale).max(tuv.v));
                bbox.w += 2. * pad + 0.2;
            }
        }
        bbox.clean();
    }

    fn fraction_tuv(&self, display: bool, thickness: f64) -> Tuv {
        let params = self.params();
        let a = params.axis_height;
        let t = if display { 3.5 } else { 1.5 } * thickness;
        Tuv {
            t,
            u: if display { params.num1 } else { params.num2 } - a - t,
            v: if display { params.denom1 } else { params.denom2 } + a - t,
        }
    }

    fn atop_uvq(&self, display: bool, nbox: &BBox, dbox: &BBox) -> Uvq {
        let params = self.params();
        let (mut u, mut v) = if display { (params.num1, params.denom1) } else { (params.num3, params.denom2) };
        let p = if display { 7. } else { 3. } * params.rule_thickness;
        let mut q = (u - nbox.d() * nbox.rscale) - (dbox.h() * dbox.rscale - v);
        if q < p {
            u += (p - q) / 2.;
            v += (p - q) / 2.;
            q = p;
        }
        Uvq { u, v, q }
    }

    fn bevel_data(&self, display: bool, nbox: &BBox, dbox: &BBox) -> Bevel {
        let delta = if display { 0.4 } else { 0.15 };
        let h = (nbox.rscale * nbox.total()).max(dbox.rscale * dbox.total()) + 2. * delta;
        let a = self.params().axis_height;
        Bevel {
            h,
            delta,
            u: nbox.rscale * (nbox.d() - nbox.h()) / 2. + a + delta,
            v: dbox.rscale * (dbox.d() - dbox.h()) / 2. + a - delta,
        }
    }

    /// Size the slash of a bevelled fraction to its parts
    pub(crate) fn stretch_bevel(&mut self, id: WrapperId) {
        let Some(bevel) = self[id].aux else { return };
        let Some((num, den)) = self.frac_parts(id) else { return };
        let (nbox, dbox) = (self.bbox(num), self.bbox(den));
        let data = self.bevel_data(self.is_display(id), &nbox, &dbox);
        if self.can_stretch(bevel, Direction::Vertical) {
            self.stretch_to(bevel, &[data.h], true);
        }
    }

    pub(crate) fn frac_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let Some((num, den)) = self.frac_parts(id) else { return element };
        let display = self.is_display(id);
        if self.attr_bool(id, "bevelled") {
            self.bevelled_html(id, &mut element, num, den, display);
        } else {
            let thickness = self.frac_thickness(id);
            let frac = if thickness == 0. {
                self.atop_html(id, num, den, display)
            } else {
                self.fraction_html(id, num, den, display, thickness)
            };
            element.append(frac);
        }
        element
    }

    /// Numerator and denominator attributes: alignment when not centered
    fn frac_align(&self, id: WrapperId, tag: &str, name: &str) -> Element {
        let align = self.attr_str(id, name);
        let element = Element::new(tag);
        if align != "center" && !align.is_empty() {
            element.with_attribute("align", align)
        } else {
            element
        }
    }

    fn fraction_html(&mut self, id: WrapperId, num: WrapperId, den: WrapperId, display: bool, thickness: f64) -> Element {
        let mut frac = Element::new("mjx-frac");
        let mut line = Element::new("mjx-line");
        let mut nstrut = Element::new("mjx-nstrut");
        let mut dstrut = Element::new("mjx-dstrut");
        if display {
            for element in [&mut frac, &mut line, &mut nstrut, &mut dstrut] {
                element.set_attribute("type", "d");
            }
        }
        if self.property_bool(id, "withDelims") {
            frac.set_attribute("delims", "true");
        }
        if (thickness - 0.06).abs() > 1e-6 {
            let a = self.params().axis_height;
            let tuv = self.fraction_tuv(display, thickness);
            let t = em(thickness);
            let margin = if display { em(3. * thickness) } else { t.clone() };
            line.set_style("height", t.as_str());
            line.set_style("border-top", format!("{} solid", t));
            line.set_style("margin", format!("{} -.1em", margin));
            let nh = em(tuv.u.max(0.));
            nstrut.set_style("height", nh.as_str());
            nstrut.set_style("vertical-align", format!("-{}", nh));
            dstrut.set_style("height", em(tuv.v.max(0.)));
            frac.set_style("vertical-align", em(a - tuv.t));
        }
        let mut numerator = self.frac_align(id, "mjx-num", "numalign").with_child(nstrut);
        let mut denominator = self.frac_align(id, "mjx-den", "denomalign").with_child(dstrut);
        self.to_chtml(num, &mut numerator);
        self.to_chtml(den, &mut denominator);
        frac.with_child(numerator).with_child(
            Element::new("mjx-dbox").with_child(
                Element::new("mjx-dtable")
                    .with_child(line)
                    .with_child(Element::new("mjx-row").with_child(denominator))
            )
        )
    }

    fn atop_html(&mut self, id: WrapperId, num: WrapperId, den: WrapperId, display: bool) -> Element {
        let (nbox, dbox) = (self.bbox(num), self.bbox(den));
        let uvq = self.atop_uvq(display, &nbox, &dbox);
        let mut frac = Element::new("mjx-frac").with_attribute("atop", "true");
        if display {
            frac.set_attribute("type", "d");
        }
        if self.property_bool(id, "withDelims") {
            frac.set_attribute("delims", "true");
        }
        let mut numerator = self.frac_align(id, "mjx-num", "numalign")
            .with_style("padding-bottom", em(uvq.q));
        let mut denominator = self.frac_align(id, "mjx-den", "denomalign");
        self.to_chtml(num, &mut numerator);
        self.to_chtml(den, &mut denominator);
        frac.set_style("vertical-align", em(-(uvq.v + dbox.d() * dbox.rscale)));
        frac.with_child(numerator).with_child(
            Element::new("mjx-dbox").with_child(
                Element::new("mjx-dtable").with_child(Element::new("mjx-row").with_child(denominator))
            )
        )
    }

    fn bevelled_html(&mut self, id: WrapperId, element: &mut Element, num: WrapperId, den: WrapperId, display: bool) {
        let (nbox, dbox) = (self.bbox(num), self.bbox(den));
        let bevel = self.bevel_data(display, &nbox, &dbox);
        self.to_chtml(num, element);
        if bevel.u != 0. {
            if let Some(child) = element.last_element_mut() {
                child.set_style("vertical-align", em(bevel.u / nbox.rscale));
            }
        }
        if let Some(aux) = self[id].aux {
            self.to_chtml(aux, element);
            let dx = em(-bevel.delta / 2.);
            if let Some(slash) = element.last_element_mut() {
                slash.set_style("margin-left", dx.as_str());
                slash.set_style("margin-right", dx);
            }
        }
        self.to_chtml(den, element);
        if bevel.v != 0. {
            if let Some(child) = element.last_element_mut() {
                child.set_style("vertical-align", em(bevel.v / dbox.rscale));
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::output::chtml::{ChtmlOptions, Metrics};
    use crate::output::font::TexFont;
    use crate::output::wrapper::WrapperTree;
    use crate::tree::MmlTree;

    fn fraction(attributes: &[(&str, &str)], display: bool) -> (MmlTree, crate::tree::NodeId) {
        let mut tree = MmlTree::default();
        let one = tree.create_token("mn", "1");
        let two = tree.create_token("mn", "2");
        let frac = tree.create_node("mfrac", &[one, two]);
        for (name, value) in attributes {
            tree[frac].attributes.set(*name, *value);
        }
        let root = tree.create_node("math", &[frac]);
        if display {
            tree[root].attributes.set("display", "block");
        }
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        (tree, frac)
    }

    fn frac_box(attributes: &[(&str, &str)], display: bool) -> crate::output::bbox::BBox {
        let (tree, frac) = fraction(attributes, display);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(&tree, &font, &options, Metrics::from_options(&options));
        wrappers.wrap(tree.root().unwrap());
        let id = wrappers.wrapper_for(frac).unwrap();
        wrappers.bbox(id)
    }

    #[test]
    fn numerator_sits_above_the_axis() {
        let bbox = frac_box(&[], false);
        assert!(bbox.h() > 0.6);
        assert!(bbox.d() > 0.2);
        // both digits are 0.5em wide, plus the padding on each side
        assert!((bbox.w - (0.5 * std::f64::consts::FRAC_1_SQRT_2 + 0.44)).abs() < 1e-3);
    }

    #[test]
    fn display_fractions_are_taller() {
        let inline = frac_box(&[], false);
        let display = frac_box(&[], true);
        assert!(display.h() > inline.h());
        assert!(display.d() > inline.d());
    }

    #[test]
    fn fraction_without_rule_is_narrower() {
        let rule = frac_box(&[], false);
        let atop = frac_box(&[("linethickness", "0")], false);
        assert!((rule.w - atop.w - 0.2).abs() < 1e-9);
    }

    #[test]
    fn bevelled_fraction_is_wide() {
        let stacked = frac_box(&[], false);
        let bevelled = frac_box(&[("bevelled", "true")], false);
        assert!(bevelled.w > stacked.w);
    }
}
