//! Font data used by the output: character metrics per variant, stretchy delimiters and the TeX
//! font parameters driving the layout formulas.

/// The built-in TeX font.
pub mod tex;

pub use self::tex::TexFont;

/// Height, depth, width, italic correction and skew of a character, in em
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharData {
    pub h:  f64,
    pub d:  f64,
    pub w:  f64,
    pub ic: f64,
    pub sk: f64,
    /// The font has no such character: the metrics are a guess and the output falls back to text
    pub unknown: bool,
}

impl CharData {
    pub const fn new(h: f64, d: f64, w: f64) -> Self {
        CharData { h, d, w, ic: 0., sk: 0., unknown: false }
    }

    pub const fn with_ic(h: f64, d: f64, w: f64, ic: f64) -> Self {
        CharData { h, d, w, ic, sk: 0., unknown: false }
    }

    pub const fn with_skew(h: f64, d: f64, w: f64, ic: f64, sk: f64) -> Self {
        CharData { h, d, w, ic, sk, unknown: false }
    }

    /// Guessed metrics for a character missing from the font
    pub fn unknown(c: char) -> Self {
        let w = if c.is_whitespace() {
            0.25
        } else if c as u32 >= 0x2E80 {
            1.
        } else if c.is_uppercase() {
            0.7
        } else {
            0.5
        };
        CharData { h: 0.75, d: 0.25, w, ic: 0., sk: 0., unknown: true }
    }
}

/// A font variant (`normal`, `bold`, `-largeop`, ...)
#[derive(Debug)]
pub struct VariantData {
    pub name: &'static str,
    /// Variant searched when a character is missing from this one
    pub chain: Option<&'static str>,
    /// Classes of token elements using the variant
    pub classes: &'static str,
    /// Suffix of the CSS font class of characters from this variant (`TEX-{letter}`)
    pub letter: &'static str,
    /// CSS font family holding the characters
    pub family: &'static str,
    pub chars: Option<&'static phf::Map<char, CharData>>,
}

impl VariantData {
    /// The CSS class giving characters of this variant their font, if any
    pub fn font_class(&self) -> Option<String> {
        if self.letter.is_empty() {
            None
        } else {
            Some(format!("TEX-{}", self.letter))
        }
    }
}

/// Direction a delimiter stretches in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Grows in height, as `(` does
    Vertical,
    /// Grows in width, as `→` does
    Horizontal,
}

/// Recipe to build a delimiter of any size from pieces: a begin piece (top or left), an
/// extender repeated (stretched) to fill the gap, an end piece and possibly a middle piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assembly {
    pub begin:   Option<char>,
    pub ext:     char,
    pub end:     Option<char>,
    pub middle:  Option<char>,
    /// Variant the pieces are taken from
    pub variant: &'static str,
}

/// How a stretchy character grows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delimiter {
    pub dir:     Direction,
    /// Sizes (height + depth, or width) of the ready-made versions, smallest first.
    /// Version `i` is the character in size variant `i`.
    pub sizes:   &'static [f64],
    /// Assembly used once the largest ready-made version is too small
    pub stretch: Option<Assembly>,
    /// Natural height, depth and width of the character
    pub hdw:     [f64; 3],
    /// Minimum size of an assembled version
    pub min:     f64,
}

/// TeX font parameters, in em
#[derive(Debug, Clone, PartialEq)]
pub struct TexParams {
    pub x_height: f64,
    pub quad: f64,

    pub num1: f64,
    pub num2: f64,
    pub num3: f64,
    pub denom1: f64,
    pub denom2: f64,

    pub sup1: f64,
    pub sup2: f64,
    pub sup3: f64,
    pub sub1: f64,
    pub sub2: f64,
    pub sup_drop: f64,
    pub sub_drop: f64,

    pub delim1: f64,
    pub delim2: f64,

    pub axis_height: f64,
    pub rule_thickness: f64,

    pub big_op_spacing1: f64,
    pub big_op_spacing2: f64,
    pub big_op_spacing3: f64,
    pub big_op_spacing4: f64,
    pub big_op_spacing5: f64,

    pub surd_height: f64,

    pub scriptspace: f64,
    pub nulldelimiterspace: f64,
    /// In thousandths, as TeX has it
    pub delimiterfactor: f64,
    pub delimitershortfall: f64,

    /// In pixels
    pub min_rule_thickness: f64,
    pub separation_factor: f64,
    pub extra_ic: f64,
}

/// Access to the metrics of a font
pub trait FontData {
    fn params(&self) -> &TexParams;

    /// Every variant of the font
    fn variants(&self) -> &'static [VariantData];

    fn delimiter(&self, c: char) -> Option<&'static Delimiter>;

    /// Variants holding the ready-made sizes of delimiters, smallest first
    fn size_variants(&self) -> &'static [&'static str];

    /// Scale applied to the italic correction when placing limits
    fn skew_ic_factor(&self) -> f64 {
        0.75
    }

    fn variant(&self, name: &str) -> Option<&'static VariantData> {
        self.variants().iter().find(|v| v.name == name)
    }

    /// Metrics of `c` in `variant`, following the variant chain; the variant where the character
    /// was found comes along.
    fn char_data(&self, variant: &str, c: char) -> Option<(CharData, &'static VariantData)> {
        let mut current = self.variant(variant);
        while let Some(data) = current {
            if let Some(chars) = data.chars {
                if let Some(cdata) = chars.get(&c) {
                    return Some((*cdata, data));
                }
            }
            current = data.chain.and_then(|name| self.variant(name));
        }
        None
    }

    /// Ready-made version `index` of a delimiter, clamped to the sizes available
    fn size_variant(&self, index: usize) -> &'static str {
        let sizes = self.size_variants();
        sizes.get(index).or(sizes.last()).copied().unwrap_or("normal")
    }
}
