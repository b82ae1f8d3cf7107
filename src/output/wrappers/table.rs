//! `mtable`, with its `mtr`, `mlabeledtr` and `mtd`.
//!
//! The table is laid out as a grid: each row is as tall as its tallest cell, each column as wide
//! as its widest one (or as `columnwidth` and the table's `width` ask), with half of the row and
//! column spacing on each side of a cell and the frame spacing around the whole. Labels of
//! labeled rows go in a separate column on the `side` of the table.

use crate::lengths::{em, is_percent};
use crate::output::bbox::BBox;
use crate::output::font::FontData;
use crate::output::html::Element;
use crate::output::wrapper::{WrapperId, WrapperTree};
use crate::tree::attributes::Value;
use crate::tree::classes::Role;

/// Thickness of frame and lines
const LINE_WIDTH: f64 = 0.07;

/// Natural sizes of the rows and columns
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TableData {
    /// Height of each row
    pub h: Vec<f64>,
    /// Depth of each row
    pub d: Vec<f64>,
    /// Width of each column
    pub w: Vec<f64>,
    /// Width of the widest label
    pub l: f64,
}

/// Spacing around cells and lines between them
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TableSpacing {
    /// Space on the left of column `j` is `cspace[j]`, on its right `cspace[j + 1]`
    pub cspace: Vec<f64>,
    /// Space over row `i` is `rspace[i]`, under it `rspace[i + 1]`
    pub rspace: Vec<f64>,
    /// Width of the line after each column but the last
    pub clines: Vec<f64>,
    /// Width of the line after each row but the last
    pub rlines: Vec<f64>,
    pub fline:  f64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TableLayout {
    pub data:     TableData,
    pub spacing:  TableSpacing,
    /// Final width of each column
    pub cwidths:  Vec<f64>,
    /// Height of the grid, frame included
    pub height:   f64,
    /// Width of the grid, frame included
    pub width:    f64,
    /// Height of the grid above the baseline
    pub baseline: f64,
    /// Width taken by labels and the space before them
    pub labels:   Option<f64>,
}

/// Entry `i` of a space separated list for each of `n` items, the last entry repeating
fn spread(list: &str, n: usize) -> Vec<String> {
    let items: Vec<&str> = list.split_whitespace().collect();
    (0 .. n)
        .map(|i| items.get(i).or(items.last()).copied().unwrap_or("none").to_string())
        .collect()
}

fn line_width(style: &str) -> f64 {
    match style {
        "solid" | "dashed" => LINE_WIDTH,
        _ => 0.,
    }
}

fn line_style(style: &str) -> String {
    format!("{} {}", em(LINE_WIDTH), style)
}

impl<'a, F: FontData> WrapperTree<'a, F> {
    /// The label and the cells of a row
    fn row_cells(&self, row: WrapperId) -> (Option<WrapperId>, Vec<WrapperId>) {
        let cells = self.children(row);
        match cells.split_first() {
            Some((&label, rest)) if self.role(row) == Role::LabeledRow => (Some(label), rest.to_vec()),
            _ => (None, cells),
        }
    }

    fn table_data(&mut self, id: WrapperId) -> TableData {
        let use_height = self.node(id).property("useHeight").map_or(true, Value::as_bool);
        let mut data = TableData::default();
        for row in self.children(id) {
            let (label, cells) = self.row_cells(row);
            let rscale = self[row].bbox.rscale;
            let (mut h, mut d) = (0f64, 0f64);
            let mut measure = |cbox: &BBox| {
                let scale = rscale * cbox.rscale;
                let (mut ch, mut cd) = (cbox.h() * scale, cbox.d() * scale);
                if use_height {
                    ch = ch.max(0.75);
                    cd = cd.max(0.25);
                }
                h = h.max(ch);
                d = d.max(cd);
                cbox.w * scale
            };
            for (j, cell) in cells.into_iter().enumerate() {
                let cbox = self.bbox(cell);
                let w = measure(&cbox);
                if data.w.len() <= j {
                    data.w.push(0.);
                }
                data.w[j] = data.w[j].max(w);
            }
            if let Some(label) = label {
                let lbox = self.bbox(label);
                data.l = data.l.max(measure(&lbox));
            }
            data.h.push(h);
            data.d.push(d);
        }
        data
    }

    fn table_spacing(&self, id: WrapperId, rows: usize, cols: usize) -> TableSpacing {
        let frame = self.attr_str(id, "frame");
        let fline = line_width(&frame);
        let fspace: Vec<f64> = if fline > 0. {
            spread(&self.attr_str(id, "framespacing"), 2).iter().map(|s| self.length2em(id, s, 0.)).collect()
        } else {
            vec![0., 0.]
        };
        let halves = |name: &str, n: usize, frame: f64| {
            let mut spaces = vec![frame];
            spaces.extend(spread(&self.attr_str(id, name), n.saturating_sub(1)).iter().map(|s| self.length2em(id, s, 0.) / 2.));
            spaces.push(frame);
            spaces
        };
        let lines = |name: &str, n: usize| {
            spread(&self.attr_str(id, name), n.saturating_sub(1)).iter().map(|s| line_width(s)).collect::<Vec<f64>>()
        };
        TableSpacing {
            cspace: halves("columnspacing", cols, fspace[0]),
            rspace: halves("rowspacing", rows, fspace[1]),
            clines: lines("columnlines", cols),
            rlines: lines("rowlines", rows),
            fline,
        }
    }

    /// Width the table is asked to have, in em, if it is not sized by its content
    fn fixed_table_width(&self, id: WrapperId) -> Option<f64> {
        if let Some(width) = self[id].resolved_width {
            return Some(width);
        }
        let width = self.attr_str(id, "width");
        if width == "auto" || is_percent(&width) {
            return None;
        }
        Some(self.length2em(id, &width, 0.))
    }

    /// Widths of the columns. With a fixed table width, space left over goes to the `fit`
    /// columns, or to the `auto` ones when there is no `fit` column.
    fn column_widths(&self, id: WrapperId, data: &TableData, spacing: &TableSpacing, labels: f64) -> Vec<f64> {
        let n = data.w.len();
        let fixed = self.fixed_table_width(id);
        let extra = spacing.cspace.iter().sum::<f64>()
            + spacing.clines.iter().sum::<f64>()
            + 2. * spacing.fline
            + labels;
        if self.attr_bool(id, "equalcolumns") {
            let w = match fixed {
                Some(width) => (width - extra).max(0.) / n.max(1) as f64,
                None => data.w.iter().fold(0f64, |m, &w| m.max(w)),
            };
            return vec![w; n];
        }
        let swidths = spread(&self.attr_str(id, "columnwidth"), n);
        let Some(width) = fixed else {
            return swidths.iter().zip(&data.w)
                .map(|(s, &w)| match s.as_str() {
                    "auto" | "fit" => w,
                    s if is_percent(s) => w,
                    s => self.length2em(id, s, w),
                })
                .collect();
        };
        let cwidth = width - extra;
        let fit = swidths.iter().filter(|s| *s == "fit").count();
        let auto = swidths.iter().filter(|s| *s == "auto").count();
        let count = if fit > 0 { fit } else { auto };
        let mut dw = cwidth;
        for (s, &w) in swidths.iter().zip(&data.w) {
            dw -= match s.as_str() {
                "fit" | "auto" => w,
                s => self.length2em(id, s, cwidth),
            };
        }
        let fw = if count > 0 && dw > 0. { dw / count as f64 } else { 0. };
        swidths.iter().zip(&data.w)
            .map(|(s, &w)| match s.as_str() {
                "fit" => w + fw,
                "auto" => w + if fit == 0 { fw } else { 0. },
                s => self.length2em(id, s, cwidth),
            })
            .collect()
    }

    /// Distance from the top of the grid to the baseline, from the `align` attribute: a position
    /// in the whole table, or in one row (`"baseline 2"`, negative rows counting from the end)
    fn table_baseline(&self, id: WrapperId, data: &TableData, spacing: &TableSpacing, height: f64) -> f64 {
        let align = self.attr_str(id, "align");
        let mut parts = align.split_whitespace();
        let kind = parts.next().unwrap_or("axis");
        let n = data.h.len() as i64;
        let row = parts.next()
            .and_then(|r| r.parse::<i64>().ok())
            .map(|r| if r < 0 { n + r } else { r - 1 })
            .filter(|i| (0 .. n).contains(i))
            .map(|i| i as usize);
        let Some(i) = row else {
            let h2 = height / 2.;
            return match kind {
                "top"    => 0.,
                "bottom" => height,
                "center" | "baseline" => h2,
                _ => h2 + self.params().axis_height,
            };
        };
        let mut y = spacing.fline;
        for j in 0 .. i {
            y += spacing.rspace[j] + data.h[j] + data.d[j] + spacing.rspace[j + 1] + spacing.rlines[j];
        }
        let (h, d) = (data.h[i], data.d[i]);
        y + match kind {
            "top"    => 0.,
            "center" => spacing.rspace[i] + (h + d) / 2.,
            "bottom" => spacing.rspace[i] + h + d + spacing.rspace[i + 1],
            _ => spacing.rspace[i] + h,
        }
    }

    pub(crate) fn table_layout(&mut self, id: WrapperId) -> TableLayout {
        let mut data = self.table_data(id);
        let spacing = self.table_spacing(id, data.h.len(), data.w.len());
        if self.attr_bool(id, "equalrows") {
            let hd = data.h.iter().zip(&data.d).fold(0f64, |m, (h, d)| m.max(h + d));
            for (h, d) in data.h.iter_mut().zip(data.d.iter_mut()) {
                let extra = (hd - *h - *d) / 2.;
                *h += extra;
                *d += extra;
            }
        }
        let labeled = self.children(id).into_iter().any(|row| self.role(row) == Role::LabeledRow);
        let labels = labeled.then(|| data.l + self.length2em(id, &self.attr_str(id, "minlabelspacing"), 0.));
        let cwidths = self.column_widths(id, &data, &spacing, labels.unwrap_or(0.));
        let width = cwidths.iter().sum::<f64>()
            + spacing.cspace.iter().sum::<f64>()
            + spacing.clines.iter().sum::<f64>()
            + 2. * spacing.fline;
        let height = (0 .. data.h.len())
            .map(|i| spacing.rspace[i] + data.h[i] + data.d[i] + spacing.rspace[i + 1])
            .sum::<f64>()
            + spacing.rlines.iter().sum::<f64>()
            + 2. * spacing.fline;
        let baseline = self.table_baseline(id, &data, &spacing, height);
        trace!("table {:?}: columns {:?}, height {}", id, cwidths, height);
        TableLayout { data, spacing, cwidths, height, width, baseline, labels }
    }

    pub(crate) fn table_bbox(&mut self, id: WrapperId, bbox: &mut BBox) {
        let layout = self.table_layout(id);
        bbox.set_h(layout.baseline);
        bbox.set_d(layout.height - layout.baseline);
        bbox.w = layout.width + layout.labels.unwrap_or(0.);
        if let Some(resolved) = self[id].resolved_width {
            bbox.w = bbox.w.max(resolved);
        }
        let width = self.attr_str(id, "width");
        if is_percent(&width) {
            bbox.pwidth = Some(width);
        }
    }

    pub(crate) fn table_html(&mut self, id: WrapperId) -> Element {
        let mut element = self.standard_node(id);
        let layout = self.table_layout(id);
        let TableLayout { data, spacing, cwidths, .. } = &layout;
        let ncols = cwidths.len();
        let frame = self.attr_str(id, "frame");
        let columnlines = spread(&self.attr_str(id, "columnlines"), ncols.saturating_sub(1));
        let rowlines = spread(&self.attr_str(id, "rowlines"), data.h.len().saturating_sub(1));

        let mut itable = Element::new("mjx-itable");
        if let (Some(h), Some(rspace)) = (data.h.first(), spacing.rspace.first()) {
            itable.set_style("vertical-align", em(layout.baseline - spacing.fline - rspace - h));
        }
        if spacing.fline > 0. {
            itable.set_style("border", line_style(&frame));
        }
        let rows = self.children(id);
        let mut labels = Vec::new();
        for (i, &row) in rows.iter().enumerate() {
            let (label, cells) = self.row_cells(row);
            let mut tr = self.standard_node(row);
            tr.kind = "mjx-mtr".to_string();
            for j in 0 .. ncols {
                let mut td = match cells.get(j) {
                    Some(&cell) => {
                        let mut td = self.row_html(cell);
                        let align = self.attr_str(cell, "columnalign");
                        if align == "left" || align == "right" {
                            td.set_style("text-align", align);
                        }
                        match self.attr_str(cell, "rowalign").as_str() {
                            "top" => td.set_style("vertical-align", "top"),
                            "bottom" => td.set_style("vertical-align", "bottom"),
                            "center" => td.set_style("vertical-align", "middle"),
                            _ => {},
                        }
                        td
                    },
                    None => Element::new("mjx-mtd"),
                };
                td.set_style("padding", format!(
                    "{} {} {} {}",
                    em(spacing.rspace[i]), em(spacing.cspace[j + 1]), em(spacing.rspace[i + 1]), em(spacing.cspace[j]),
                ));
                if (cwidths[j] - data.w[j]).abs() > 0.001 {
                    td.set_style("width", em(cwidths[j]));
                }
                if j > 0 && line_width(&columnlines[j - 1]) > 0. {
                    td.set_style("border-left", line_style(&columnlines[j - 1]));
                }
                if i > 0 && line_width(&rowlines[i - 1]) > 0. {
                    td.set_style("border-top", line_style(&rowlines[i - 1]));
                }
                td.append(strut(data.h[i], data.d[i]));
                tr.append(td);
            }
            itable.append(tr);
            labels.push(label);
        }
        self.kinds.insert("mjx-mtr".to_string());
        self.kinds.insert("mjx-mtd".to_string());

        let mut table = Element::new("mjx-table").with_child(itable);
        if let Some(space) = layout.labels {
            let side = self.attr_str(id, "side");
            let left = side.starts_with("left");
            let mut litable = Element::new("mjx-itable");
            if spacing.fline > 0. {
                litable.set_style("padding", format!("{} 0", em(spacing.fline)));
            }
            for (i, label) in labels.into_iter().enumerate() {
                let mut td = match label {
                    Some(label) => self.row_html(label),
                    None => Element::new("mjx-mtd"),
                };
                td.set_style("padding", format!("{} 0 {} 0", em(spacing.rspace[i]), em(spacing.rspace[i + 1])));
                td.append(strut(data.h[i], data.d[i]));
                litable.append(Element::new("mjx-mtr").with_child(td));
            }
            let labels = Element::new("mjx-labels")
                .with_style(if left { "left" } else { "right" }, "0")
                .with_child(litable);
            table.set_style(if left { "padding-left" } else { "padding-right" }, em(space));
            table.append(labels);
            self.kinds.insert("mjx-labels".to_string());
        }
        self.kinds.insert("mjx-itable".to_string());
        element.append(table);
        element
    }
}

/// Keeps a cell at the height and depth of its row
fn strut(h: f64, d: f64) -> Element {
    Element::new("mjx-tstrut")
        .with_style("height", em(h + d))
        .with_style("vertical-align", em(-d))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::chtml::{ChtmlOptions, Metrics};
    use crate::output::font::TexFont;
    use crate::tree::{MmlTree, NodeId};

    fn table(tree: &mut MmlTree, rows: &[&[&str]]) -> NodeId {
        let rows: Vec<NodeId> = rows.iter()
            .map(|cells| {
                let cells: Vec<NodeId> = cells.iter()
                    .map(|text| {
                        let mi = tree.create_token("mi", text);
                        tree.create_node("mtd", &[mi])
                    })
                    .collect();
                tree.create_node("mtr", &cells)
            })
            .collect();
        tree.create_node("mtable", &rows)
    }

    fn with_table<R>(tree: &mut MmlTree, table: NodeId, f: impl FnOnce(&mut WrapperTree<TexFont>, WrapperId) -> R) -> R {
        let root = tree.create_node("math", &[table]);
        tree.set_root(root);
        tree.inherit_attributes(root);
        tree.set_tex_class(root, None);
        let font = TexFont::new();
        let options = ChtmlOptions::default();
        let mut wrappers = WrapperTree::new(tree, &font, &options, Metrics::from_options(&options));
        wrappers.wrap(root);
        let id = wrappers.wrapper_for(table).unwrap();
        f(&mut wrappers, id)
    }

    #[test]
    fn spread_repeats_the_last_entry() {
        assert_eq!(spread("solid dashed", 3), ["solid", "dashed", "dashed"]);
        assert_eq!(spread("", 1), ["none"]);
        assert!(spread("1em", 0).is_empty());
    }

    #[test]
    fn table_is_centered_on_the_axis() {
        let mut tree = MmlTree::default();
        let mtable = table(&mut tree, &[&["a", "b"], &["c", "d"]]);
        with_table(&mut tree, mtable, |wrappers, id| {
            let bbox = wrappers.bbox(id);
            let axis = wrappers.params().axis_height;
            assert!((bbox.h() - bbox.d() - 2. * axis).abs() < 1e-9);
            // two rows of at least 1em and one row spacing
            assert!(bbox.total() >= 2. + 0.43);
        });
    }

    #[test]
    fn fit_column_absorbs_the_remaining_space() {
        let mut tree = MmlTree::default();
        let mtable = table(&mut tree, &[&["a", "b", "c"]]);
        tree[mtable].attributes.set("width", "20em");
        tree[mtable].attributes.set("columnwidth", "fit auto 2em");
        with_table(&mut tree, mtable, |wrappers, id| {
            let layout = wrappers.table_layout(id);
            let natural = &layout.data.w;
            assert!((layout.cwidths[1] - natural[1]).abs() < 1e-9);
            assert!((layout.cwidths[2] - 2.).abs() < 1e-9);
            assert!(layout.cwidths[0] > natural[0]);
            assert!((layout.width - 20.).abs() < 1e-9);
        });
    }

    #[test]
    fn auto_columns_share_the_remaining_space() {
        let mut tree = MmlTree::default();
        let mtable = table(&mut tree, &[&["a", "b"]]);
        tree[mtable].attributes.set("width", "10em");
        with_table(&mut tree, mtable, |wrappers, id| {
            let layout = wrappers.table_layout(id);
            let extra0 = layout.cwidths[0] - layout.data.w[0];
            let extra1 = layout.cwidths[1] - layout.data.w[1];
            assert!(extra0 > 0.);
            assert!((extra0 - extra1).abs() < 1e-9);
            assert!((layout.width - 10.).abs() < 1e-9);
        });
    }

    #[test]
    fn equal_columns() {
        let mut tree = MmlTree::default();
        let mtable = table(&mut tree, &[&["m", "i"]]);
        tree[mtable].attributes.set("equalcolumns", true);
        with_table(&mut tree, mtable, |wrappers, id| {
            let layout = wrappers.table_layout(id);
            assert_eq!(layout.cwidths[0], layout.cwidths[1]);
            assert!(layout.cwidths[1] > layout.data.w[1]);
        });
    }

    #[test]
    fn frame_and_lines_are_borders() {
        let mut tree = MmlTree::default();
        let mtable = table(&mut tree, &[&["a", "b"], &["c", "d"]]);
        tree[mtable].attributes.set("frame", "solid");
        tree[mtable].attributes.set("columnlines", "dashed");
        with_table(&mut tree, mtable, |wrappers, id| {
            let mut parent = Element::new("mjx-math");
            wrappers.to_chtml(id, &mut parent);
            let itable = parent.find("mjx-itable").unwrap();
            assert_eq!(itable.style("border"), Some("0.07em solid"));
            let rows = itable.find_all("mjx-mtr");
            assert_eq!(rows.len(), 2);
            let cells: Vec<_> = rows[0].elements().collect();
            assert_eq!(cells.len(), 2);
            assert!(cells[0].style("border-left").is_none());
            assert_eq!(cells[1].style("border-left"), Some("0.07em dashed"));
            assert!(cells[0].find("mjx-tstrut").is_some());
        });
    }

    #[test]
    fn labels_widen_the_table() {
        let mut tree = MmlTree::default();
        let label = tree.create_token("mtext", "(1)");
        let label = tree.create_node("mtd", &[label]);
        let x = tree.create_token("mi", "x");
        let cell = tree.create_node("mtd", &[x]);
        let row = tree.create_node("mlabeledtr", &[label, cell]);
        let mtable = tree.create_node("mtable", &[row]);
        with_table(&mut tree, mtable, |wrappers, id| {
            let layout = wrappers.table_layout(id);
            assert_eq!(layout.data.w.len(), 1);
            assert!(layout.labels.unwrap() > 0.8);
            let bbox = wrappers.bbox(id);
            assert!(bbox.w > layout.width + 0.8);
            let mut parent = Element::new("mjx-math");
            wrappers.to_chtml(id, &mut parent);
            let labels = parent.find("mjx-labels").unwrap();
            assert_eq!(labels.style("right"), Some("0"));
            assert_eq!(labels.find_all("mjx-mtr").len(), 1);
        });
    }
}
