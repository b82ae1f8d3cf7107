//! Bounding boxes of laid out fragments.
//!
//! All dimensions are in em of the fragment's own font size. A box whose height or depth has not
//! been set yet (an "empty" box being accumulated into) holds `None` there; [`BBox::clean`] turns
//! any remaining `None` into zero.

/// Height, depth and width of a fragment, with the spacing data that travels with them
#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
    h: Option<f64>,
    d: Option<f64>,
    pub w: f64,
    /// Space to the left of the fragment
    pub l: f64,
    /// Space to the right of the fragment
    pub r: f64,
    /// Italic correction
    pub ic: f64,
    /// Skew for accents
    pub sk: f64,
    /// Horizontal offset for accents
    pub dx: f64,
    /// Scale relative to the top-level font size
    pub scale: f64,
    /// Scale relative to the parent's font size
    pub rscale: f64,
    /// Percentage width to resolve against the container, if any
    pub pwidth: Option<String>,
}

impl Default for BBox {
    fn default() -> Self {
        BBox::zero()
    }
}

impl BBox {
    pub fn new(h: f64, d: f64, w: f64) -> Self {
        BBox { h: Some(h), d: Some(d), w, ..BBox::empty() }
    }

    /// A box with every dimension set to zero
    pub fn zero() -> Self {
        BBox::new(0., 0., 0.)
    }

    /// A box with no height and depth yet, ready to accumulate children
    pub fn empty() -> Self {
        BBox {
            h: None, d: None, w: 0.,
            l: 0., r: 0., ic: 0., sk: 0., dx: 0.,
            scale: 1., rscale: 1.,
            pwidth: None,
        }
    }

    /// Reset height, depth and width so that children can be accumulated again
    pub fn clear(&mut self) {
        self.h = None;
        self.d = None;
        self.w = 0.;
    }

    pub fn h(&self) -> f64 {
        self.h.unwrap_or(0.)
    }

    pub fn d(&self) -> f64 {
        self.d.unwrap_or(0.)
    }

    pub fn set_h(&mut self, h: f64) {
        self.h = Some(h);
    }

    pub fn set_d(&mut self, d: f64) {
        self.d = Some(d);
    }

    pub fn is_empty(&self) -> bool {
        self.h.is_none() && self.d.is_none()
    }

    /// Height plus depth
    pub fn total(&self) -> f64 {
        self.h() + self.d()
    }

    /// Width including the left and right spacing
    pub fn outer_width(&self) -> f64 {
        self.w + self.l + self.r
    }

    /// Give unset dimensions the value zero
    pub fn clean(&mut self) {
        self.h.get_or_insert(0.);
        self.d.get_or_insert(0.);
    }

    /// Scale the dimensions
    pub fn rescale(&mut self, scale: f64) {
        self.w *= scale;
        self.h = self.h.map(|h| h * scale);
        self.d = self.d.map(|d| d * scale);
    }

    /// Place `cbox` to the right of what is already in the box
    pub fn append(&mut self, cbox: &BBox) {
        let scale = cbox.rscale;
        self.w += scale * cbox.outer_width();
        self.h = Some(max_opt(self.h, scale * cbox.h()));
        self.d = Some(max_opt(self.d, scale * cbox.d()));
    }

    /// Make room for `cbox` with its origin at `(x, y)`.
    ///
    /// Only maxima are taken, so the order in which children are combined does not matter.
    pub fn combine(&mut self, cbox: &BBox, x: f64, y: f64) {
        let rscale = cbox.rscale;
        let w = x + rscale * cbox.outer_width();
        let h = y + rscale * cbox.h();
        let d = rscale * cbox.d() - y;
        self.w = self.w.max(w);
        self.h = Some(max_opt(self.h, h));
        self.d = Some(max_opt(self.d, d));
    }

    /// Take over the dimensions of another box
    pub fn update_from(&mut self, cbox: &BBox) {
        self.h = cbox.h;
        self.d = cbox.d;
        self.w = cbox.w;
        if cbox.pwidth.is_some() {
            self.pwidth = cbox.pwidth.clone();
        }
    }
}

fn max_opt(current: Option<f64>, value: f64) -> f64 {
    current.map_or(value, |c| c.max(value))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_boxes_clean_to_zero() {
        let mut bbox = BBox::empty();
        assert!(bbox.is_empty());
        bbox.clean();
        assert_eq!(bbox, BBox::zero());
    }

    #[test]
    fn append_accumulates_width() {
        let mut row = BBox::empty();
        row.append(&BBox::new(0.7, 0.2, 0.5));
        let mut spaced = BBox::new(0.4, 0.1, 0.3);
        spaced.l = 0.1;
        spaced.r = 0.2;
        row.append(&spaced);
        assert!((row.w - 1.1).abs() < 1e-9);
        assert_eq!(row.h(), 0.7);
        assert_eq!(row.d(), 0.2);
    }

    #[test]
    fn append_respects_relative_scale() {
        let mut row = BBox::empty();
        let mut script = BBox::new(1., 0.5, 2.);
        script.rscale = 0.5;
        row.append(&script);
        assert_eq!((row.h(), row.d(), row.w), (0.5, 0.25, 1.));
    }

    #[test]
    fn combine_takes_maxima() {
        let a = BBox::new(0.5, 0.1, 2.);
        let b = BBox::new(0.9, 0.3, 1.);

        let mut ab = BBox::empty();
        ab.combine(&a, 0., 0.);
        ab.combine(&b, 0., 0.);

        let mut ba = BBox::empty();
        ba.combine(&b, 0., 0.);
        ba.combine(&a, 0., 0.);

        assert_eq!(ab, ba);
        assert_eq!(ab.w, 2.);
    }

    #[test]
    fn combine_with_offsets() {
        let mut bbox = BBox::empty();
        bbox.combine(&BBox::new(0.5, 0.2, 1.), 0., 0.);
        bbox.combine(&BBox::new(0.4, 0.1, 0.5), 1., 0.6);
        assert!((bbox.w - 1.5).abs() < 1e-9);
        assert!((bbox.h() - 1.0).abs() < 1e-9);
        assert!((bbox.d() - 0.2).abs() < 1e-9);

        bbox.combine(&BBox::new(0.3, 0.3, 0.2), 0., -0.5);
        assert!((bbox.d() - 0.8).abs() < 1e-9);
    }
}
