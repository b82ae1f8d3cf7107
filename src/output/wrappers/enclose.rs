//! `menclose`. Borders of the content's box draw the straight sides; circles, strikes and the
//! long division arc are absolutely placed elements over it.

use std::f64::consts::SQRT_2;

use crate::lengths::em;
use crate::output::bbox::BBox;
use crate::output::font::FontData;
use crate::output::html::Element;
use crate::output::wrapper::{WrapperId, WrapperTree};

const PADDING: f64 = 0.2;
const THICKNESS: f64 = 0.067;

const TOP: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const LEFT: usize = 3;

const BORDERS: [&str; 4] = ["border-top", "border-right", "border-bottom", "border-left"];

/// Room each side of the content needs, and the part of it drawn as a border
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Extenders {
    pub space:  [f64; 4],
    pub border: [f64; 4],
}

impl Extenders {
    fn add(&mut self, space: [f64; 4], border: [f64; 4]) {
        for side in 0 .. 4 {
            self.space[side] = self.space[side].max(space[side]);
            self.border[side] = self.border[side].max(border[side]);
        }
    }
}

fn sides(list: &[usize], value: f64) -> [f64; 4] {
    let mut result = [0.; 4];
    for &side in list {
        result[side] = value;
    }
    result
}

/// A line of thickness `t` from `(x, y)` (from the top left corner), turned by `angle`
fn line(x: f64, y: f64, length: f64, angle: f64, t: f64) -> Element {
    let mut line = Element::new("mjx-line")
        .with_style("left", em(x))
        .with_style("top", em(y - t / 2.))
        .with_style("width", em(length))
        .with_style("border-top", format!("{} solid", em(t)));
    if angle != 0. {
        line.set_style("transform", format!("rotate({:.3}rad)", angle));
    }
    line
}

impl<'a, F: FontData> WrapperTree<'a, F> {
    fn enclose_sizes(&self, id: WrapperId) -> (f64, f64) {
        let size = |name: &str, default: f64| {
            let value = self.attr_str(id, name);
            if value.is_empty() { default } else { self.length2em(id, &value, default) }
        };
        (size("data-padding", PADDING), size("data-thickness", THICKNESS))
    }

    fn notations(&self, id: WrapperId) -> Vec<String> {
        let mut notations: Vec<String> = Vec::new();
        for name in self.attr_str(id, "notation").split_whitespace() {
            if !notations.iter().any(|n| n == name) {
                notations.push(name.to_string());
            }
        }
        notations
    }

    fn encloses_radical(&self, id: WrapperId) -> bool {
        self[id].aux.is_some() && self.has_notation(id, "radical")
    }

    /// The content before the notations are drawn around it
    fn enclose_content_bbox(&mut self, id: WrapperId) -> BBox {
        let mut content = BBox::empty();
        if self.encloses_radical(id) {
            self.radical_bbox(id, &mut content);
        } else {
            if let Some(child) = self.child(id, 0) {
                let cbox = self.bbox(child);
                content.append(&cbox);
            }
            content.clean();
        }
        content
    }

    pub(crate) fn enclose_extenders(&self, id: WrapperId, content: &BBox) -> Extenders {
        let (p, t) = self.enclose_sizes(id);
        let mut extenders = Extenders::default();
        for notation in self.notations(id) {
            match notation.as_str() {
                "box" | "roundedbox" => extenders.add([p + t; 4], [t; 4]),
                "top"       => extenders.add(sides(&[TOP], p + t), sides(&[TOP], t)),
                "right"     => extenders.add(sides(&[RIGHT], p + t), sides(&[RIGHT], t)),
                "bottom"    => extenders.add(sides(&[BOTTOM], p + t), sides(&[BOTTOM], t)),
                "left"      => extenders.add(sides(&[LEFT], p + t), sides(&[LEFT], t)),
                "actuarial" => extenders.add(sides(&[TOP, RIGHT], p + t), sides(&[TOP, RIGHT], t)),
                "madruwb"   => extenders.add(sides(&[BOTTOM, RIGHT], p + t), sides(&[BOTTOM, RIGHT], t)),
                "circle" => {
                    let dx = (SQRT_2 - 1.) * content.w / 2. + p + t;
                    let dy = (SQRT_2 - 1.) * content.total() / 2. + p + t;
                    extenders.add([dy, dx, dy, dx], [0.; 4]);
                },
                "phasorangle" => {
                    let hd = content.total() + 3. * p + t;
                    extenders.add([2. * p, p, p + t, hd / 3f64.sqrt()], sides(&[BOTTOM], t));
                },
                "longdiv" => extenders.add([p + t, p, p, 2. * p + t], sides(&[TOP], t)),
                _ => {},
            }
        }
        extenders
    }

    pub(crate) fn enclose_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let content = self.enclose_content_bbox(id);
        let space = self.enclose_extenders(id, &content).space;
        bbox.set_h(content.h() + space[TOP]);
        bbox.set_d(content.d() + space[BOTTOM]);
        bbox.w = content.w + space[LEFT] + space[RIGHT];
        bbox.pwidth = content.pwidth;
    }

    pub(crate) fn enclose_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let content = self.enclose_content_bbox(id);
        let extenders = self.enclose_extenders(id, &content);
        let (p, t) = self.enclose_sizes(id);
        let notations = self.notations(id);

        let mut inner = Element::new("mjx-box");
        let padding: Vec<f64> = (0 .. 4).map(|side| extenders.space[side] - extenders.border[side]).collect();
        if padding.iter().any(|&x| x != 0.) {
            let padding: Vec<String> = padding.into_iter().map(em).collect();
            inner.set_style("padding", padding.join(" "));
        }
        for (side, name) in BORDERS.iter().enumerate() {
            if extenders.border[side] > 0. {
                inner.set_style(name, format!("{} solid", em(extenders.border[side])));
            }
        }
        if notations.iter().any(|n| n == "roundedbox") {
            inner.set_style("border-radius", em(p + t));
        }
        if self.encloses_radical(id) {
            if let Some((sqrt, _)) = self.sqrt_html(id) {
                inner.append(sqrt);
            }
        } else if let Some(child) = self.child(id, 0) {
            self.to_chtml(child, &mut inner);
        }
        element.append(inner);

        let space = extenders.space;
        let w = content.w + space[LEFT] + space[RIGHT];
        let hd = content.total() + space[TOP] + space[BOTTOM];
        for notation in &notations {
            match notation.as_str() {
                "circle" => {
                    let dx = (SQRT_2 - 1.) * content.w / 2. + p;
                    let dy = (SQRT_2 - 1.) * content.total() / 2. + p;
                    element.append(Element::new("mjx-ellipse")
                        .with_style("left", em(space[LEFT] - dx - t))
                        .with_style("top", em(space[TOP] - dy - t))
                        .with_style("width", em(content.w + 2. * (dx + t)))
                        .with_style("height", em(content.total() + 2. * (dy + t)))
                        .with_style("border", format!("{} solid", em(t))));
                },
                "horizontalstrike" => element.append(line(0., hd / 2., w, 0., t)),
                "verticalstrike" => {
                    element.append(line(w / 2., 0., hd, std::f64::consts::FRAC_PI_2, t));
                },
                "updiagonalstrike" => {
                    element.append(line(0., hd, w.hypot(hd), -hd.atan2(w), t));
                },
                "downdiagonalstrike" => {
                    element.append(line(0., 0., w.hypot(hd), hd.atan2(w), t));
                },
                "phasorangle" => {
                    let run = space[LEFT];
                    element.append(line(0., hd - t / 2., run.hypot(hd), -hd.atan2(run), t));
                },
                "longdiv" => {
                    element.append(Element::new("mjx-arc")
                        .with_style("left", "0")
                        .with_style("top", "0")
                        .with_style("width", em(space[LEFT] - p))
                        .with_style("height", em(hd))
                        .with_style("border-right", format!("{} solid", em(t)))
                        .with_style("border-radius", "0 100% 100% 0 / 0 50% 50% 0"));
                },
                _ => {},
            }
        }
        self.kinds.insert("mjx-menclose".to_string());
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

    fn enclose(notation: &str) -> (BBox, Element) {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let menclose = tree.create_node("menclose", &[x]);
        tree[menclose].attributes.set("notation", notation);
        let root = tree.create_node("math", &[menclose]);
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(&tree, &font, &options, Metrics::from_options(&options));
        let top = wrappers.wrap(root);
        let id = wrappers.wrapper_for(menclose).unwrap();
        let bbox = wrappers.bbox(id);
        let mut parent = Element::new("mjx-container");
        wrappers.to_chtml(top, &mut parent);
        let element = parent.find("mjx-menclose").unwrap().clone();
        (bbox, element)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn box_adds_padding_and_rule_on_every_side() {
        let (bbox, html) = enclose("box");
        assert!(close(bbox.w, 0.572 + 2. * 0.267));
        assert!(close(bbox.h(), 0.442 + 0.267));
        assert!(close(bbox.d(), 0.011 + 0.267));
        let inner = html.find("mjx-box").unwrap();
        assert_eq!(inner.style("padding"), Some("0.2em 0.2em 0.2em 0.2em"));
        assert_eq!(inner.style("border-left"), Some("0.067em solid"));
    }

    #[test]
    fn single_sides() {
        let (bbox, html) = enclose("left bottom");
        assert!(close(bbox.w, 0.572 + 0.267));
        assert!(close(bbox.h(), 0.442));
        let inner = html.find("mjx-box").unwrap();
        assert!(inner.style("border-left").is_some());
        assert!(inner.style("border-bottom").is_some());
        assert!(inner.style("border-top").is_none());
    }

    #[test]
    fn strikes_take_no_room() {
        let (bbox, html) = enclose("updiagonalstrike horizontalstrike");
        assert!(close(bbox.w, 0.572));
        assert_eq!(html.find_all("mjx-line").len(), 2);
    }

    #[test]
    fn circle_surrounds_the_content() {
        let (bbox, html) = enclose("circle");
        assert!(bbox.w > 0.572 * 2f64.sqrt());
        assert!(html.find("mjx-ellipse").is_some());
    }

    #[test]
    fn longdiv_by_default() {
        let mut tree = MmlTree::default();
        let x = tree.create_token("mi", "x");
        let menclose = tree.create_node("menclose", &[x]);
        let root = tree.create_node("math", &[menclose]);
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(&tree, &font, &options, Metrics::from_options(&options));
        let top = wrappers.wrap(root);
        let mut parent = Element::new("mjx-container");
        wrappers.to_chtml(top, &mut parent);
        assert!(parent.find("mjx-arc").is_some());
    }

    #[test]
    fn radical_draws_a_surd() {
        let (bbox, html) = enclose("radical");
        assert!(bbox.w > 0.572 + 0.8);
        assert!(html.find("mjx-sqrt").is_some());
    }
}
