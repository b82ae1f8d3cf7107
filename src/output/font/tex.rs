use phf::phf_map;

use super::{Assembly, CharData, Delimiter, Direction, FontData, TexParams, VariantData};

const fn c(h: f64, d: f64, w: f64) -> CharData {
    CharData::new(h, d, w)
}

const fn ci(h: f64, d: f64, w: f64, ic: f64) -> CharData {
    CharData::with_ic(h, d, w, ic)
}

const fn cs(h: f64, d: f64, w: f64, ic: f64, sk: f64) -> CharData {
    CharData::with_skew(h, d, w, ic, sk)
}

/// The Computer Modern based font of the CHTML output
#[derive(Debug, Clone)]
pub struct TexFont {
    params: TexParams,
}

impl Default for TexFont {
    fn default() -> Self {
        TexFont::new()
    }
}

impl TexFont {
    pub fn new() -> Self {
        TexFont {
            params: TexParams {
                x_height: 0.442,
                quad:     1.,

                num1:   0.676,
                num2:   0.394,
                num3:   0.444,
                denom1: 0.686,
                denom2: 0.345,

                sup1:     0.413,
                sup2:     0.363,
                sup3:     0.289,
                sub1:     0.15,
                sub2:     0.247,
                sup_drop: 0.386,
                sub_drop: 0.05,

                delim1: 2.39,
                delim2: 1.0,

                axis_height:    0.25,
                rule_thickness: 0.06,

                big_op_spacing1: 0.111,
                big_op_spacing2: 0.167,
                big_op_spacing3: 0.2,
                big_op_spacing4: 0.6,
                big_op_spacing5: 0.1,

                surd_height: 0.075,

                scriptspace:        0.05,
                nulldelimiterspace: 0.12,
                delimiterfactor:    901.,
                delimitershortfall: 0.3,

                min_rule_thickness: 1.25,
                separation_factor:  1.75,
                extra_ic:           0.033,
            },
        }
    }
}

impl FontData for TexFont {
    fn params(&self) -> &TexParams {
        &self.params
    }

    fn variants(&self) -> &'static [VariantData] {
        VARIANTS
    }

    fn delimiter(&self, c: char) -> Option<&'static Delimiter> {
        DELIMITERS.get(&c)
    }

    fn size_variants(&self) -> &'static [&'static str] {
        &["normal", "-smallop", "-largeop", "-size3", "-size4"]
    }
}

macro_rules! variant {
    ($name:expr, $chain:expr, $classes:expr, $letter:expr, $family:expr, $chars:expr) => {
        VariantData {
            name:    $name,
            chain:   $chain,
            classes: $classes,
            letter:  $letter,
            family:  $family,
            chars:   $chars,
        }
    };
}

static VARIANTS: &[VariantData] = &[
    variant!("normal",                 None,                 "mjx-n",          "N",  "MJXTEX",      Some(&NORMAL)),
    variant!("bold",                   Some("normal"),       "mjx-b",          "B",  "MJXTEX-B",    None),
    variant!("italic",                 Some("normal"),       "mjx-i",          "I",  "MJXTEX-I",    Some(&ITALIC)),
    variant!("bold-italic",            Some("italic"),       "mjx-b mjx-i",    "BI", "MJXTEX-BI",   None),
    variant!("double-struck",          Some("bold"),         "mjx-ds mjx-b",   "A",  "MJXTEX-A",    Some(&DOUBLE_STRUCK)),
    variant!("fraktur",                Some("normal"),       "mjx-fr",         "FR", "MJXTEX-FR",   None),
    variant!("bold-fraktur",           Some("bold"),         "mjx-fr mjx-b",   "FRB","MJXTEX-FR-B", None),
    variant!("script",                 Some("italic"),       "mjx-sc mjx-i",   "SC", "MJXTEX-SC",   None),
    variant!("bold-script",            Some("bold-italic"),  "mjx-sc mjx-b mjx-i", "SCB", "MJXTEX-SC-B", None),
    variant!("sans-serif",             Some("normal"),       "mjx-ss",         "SS", "MJXTEX-SS",   None),
    variant!("bold-sans-serif",        Some("bold"),         "mjx-ss mjx-b",   "SSB","MJXTEX-SS-B", None),
    variant!("sans-serif-italic",      Some("italic"),       "mjx-ss mjx-i",   "SSI","MJXTEX-SS-I", None),
    variant!("sans-serif-bold-italic", Some("bold-italic"),  "mjx-ss mjx-b mjx-i", "SSBI", "MJXTEX-SS-B", None),
    variant!("monospace",              Some("normal"),       "mjx-ty",         "T",  "MJXTEX-T",    None),
    variant!("-smallop",               Some("normal"),       "mjx-sop",        "S1", "MJXTEX-S1",   Some(&SIZE1)),
    variant!("-largeop",               Some("normal"),       "mjx-lop",        "S2", "MJXTEX-S2",   Some(&SIZE2)),
    variant!("-size3",                 Some("normal"),       "mjx-s3",         "S3", "MJXTEX-S3",   Some(&SIZE3)),
    variant!("-size4",                 Some("normal"),       "mjx-s4",         "S4", "MJXTEX-S4",   Some(&SIZE4)),
    variant!("-tex-calligraphic",      Some("italic"),       "mjx-cal mjx-i",  "C",  "MJXTEX-C",    Some(&CALLIGRAPHIC)),
    variant!("-tex-bold-calligraphic", Some("bold-italic"),  "mjx-cal mjx-b",  "CB", "MJXTEX-C-B",  None),
    variant!("-tex-oldstyle",          Some("normal"),       "mjx-os",         "OS", "MJXTEX-C",    None),
    variant!("-tex-bold-oldstyle",     Some("bold"),         "mjx-os mjx-b",   "OB", "MJXTEX-C-B",  None),
    variant!("-tex-mathit",            Some("italic"),       "mjx-mit mjx-i",  "MI", "MJXTEX-MI",   None),
    variant!("-tex-variant",           Some("normal"),       "mjx-var",        "A",  "MJXTEX-A",    None),
];


// ------------------------- STRETCHY DELIMITERS --------------------------------

const SIZES: &[f64] = &[1., 1.2, 1.8, 2.4, 3.];

macro_rules! vertical {
    ($begin:expr, $ext:expr, $end:expr, $middle:expr, $hdw:expr) => {
        Delimiter {
            dir:   Direction::Vertical,
            sizes: SIZES,
            stretch: Some(Assembly { begin: $begin, ext: $ext, end: $end, middle: $middle, variant: "-size4" }),
            hdw:   $hdw,
            min:   0.,
        }
    };
    ($hdw:expr) => {
        Delimiter { dir: Direction::Vertical, sizes: SIZES, stretch: None, hdw: $hdw, min: 0. }
    };
}

macro_rules! horizontal {
    ($size:expr, $begin:expr, $ext:expr, $end:expr, $middle:expr, $variant:expr, $hdw:expr, $min:expr) => {
        Delimiter {
            dir:   Direction::Horizontal,
            sizes: &[$size],
            stretch: Some(Assembly { begin: $begin, ext: $ext, end: $end, middle: $middle, variant: $variant }),
            hdw:   $hdw,
            min:   $min,
        }
    };
}

static DELIMITERS: phf::Map<char, Delimiter> = phf_map! {
    '(' => vertical!(Some('\u{239B}'), '\u{239C}', Some('\u{239D}'), None, [0.75, 0.25, 0.389]),
    ')' => vertical!(Some('\u{239E}'), '\u{239F}', Some('\u{23A0}'), None, [0.75, 0.25, 0.389]),
    '[' => vertical!(Some('\u{23A1}'), '\u{23A2}', Some('\u{23A3}'), None, [0.75, 0.25, 0.278]),
    ']' => vertical!(Some('\u{23A4}'), '\u{23A5}', Some('\u{23A6}'), None, [0.75, 0.25, 0.278]),
    '{' => vertical!(Some('\u{23A7}'), '\u{23AA}', Some('\u{23A9}'), Some('\u{23A8}'), [0.75, 0.25, 0.5]),
    '}' => vertical!(Some('\u{23AB}'), '\u{23AA}', Some('\u{23AD}'), Some('\u{23AC}'), [0.75, 0.25, 0.5]),
    '\u{2308}' => vertical!(Some('\u{23A1}'), '\u{23A2}', None, None, [0.75, 0.25, 0.444]),
    '\u{2309}' => vertical!(Some('\u{23A4}'), '\u{23A5}', None, None, [0.75, 0.25, 0.444]),
    '\u{230A}' => vertical!(None, '\u{23A2}', Some('\u{23A3}'), None, [0.75, 0.25, 0.444]),
    '\u{230B}' => vertical!(None, '\u{23A5}', Some('\u{23A6}'), None, [0.75, 0.25, 0.444]),
    '\u{221A}' => vertical!(Some('\u{E001}'), '\u{E000}', Some('\u{23B7}'), None, [0.8, 0.2, 0.833]),
    '\u{27E8}' => vertical!([0.75, 0.25, 0.389]),
    '\u{27E9}' => vertical!([0.75, 0.25, 0.389]),
    '/'  => vertical!([0.75, 0.25, 0.5]),
    '\\' => vertical!([0.75, 0.25, 0.5]),
    '|' => Delimiter {
        dir: Direction::Vertical, sizes: &[1.],
        stretch: Some(Assembly { begin: None, ext: '\u{2223}', end: None, middle: None, variant: "normal" }),
        hdw: [0.75, 0.25, 0.278], min: 0.,
    },
    '\u{2223}' => Delimiter {
        dir: Direction::Vertical, sizes: &[1.],
        stretch: Some(Assembly { begin: None, ext: '\u{2223}', end: None, middle: None, variant: "normal" }),
        hdw: [0.75, 0.25, 0.278], min: 0.,
    },
    '\u{2016}' => Delimiter {
        dir: Direction::Vertical, sizes: &[1.],
        stretch: Some(Assembly { begin: None, ext: '\u{2225}', end: None, middle: None, variant: "normal" }),
        hdw: [0.75, 0.25, 0.5], min: 0.,
    },
    '\u{2225}' => Delimiter {
        dir: Direction::Vertical, sizes: &[1.],
        stretch: Some(Assembly { begin: None, ext: '\u{2225}', end: None, middle: None, variant: "normal" }),
        hdw: [0.75, 0.25, 0.5], min: 0.,
    },

    '\u{2190}' => horizontal!(1., Some('\u{2190}'), '\u{2212}', None, None, "normal", [0.511, 0.011, 1.], 0.),
    '\u{2192}' => horizontal!(1., None, '\u{2212}', Some('\u{2192}'), None, "normal", [0.511, 0.011, 1.], 0.),
    '\u{2194}' => horizontal!(1., Some('\u{2190}'), '\u{2212}', Some('\u{2192}'), None, "normal", [0.511, 0.011, 1.], 0.),
    '\u{21D0}' => horizontal!(1., Some('\u{21D0}'), '=', None, None, "normal", [0.525, 0.024, 1.], 0.),
    '\u{21D2}' => horizontal!(1., None, '=', Some('\u{21D2}'), None, "normal", [0.525, 0.024, 1.], 0.),
    '\u{21D4}' => horizontal!(1., Some('\u{21D0}'), '=', Some('\u{21D2}'), None, "normal", [0.525, 0.024, 1.], 0.),
    '\u{2212}' => horizontal!(0.778, None, '\u{2212}', None, None, "normal", [0.583, 0.082, 0.778], 0.),
    '='        => horizontal!(0.778, None, '=', None, None, "normal", [0.367, -0.133, 0.778], 0.),
    '\u{AF}'   => horizontal!(0.5, None, '\u{AF}', None, None, "normal", [0.59, -0.544, 0.5], 0.),
    '\u{203E}' => horizontal!(0.5, None, '\u{AF}', None, None, "normal", [0.59, -0.544, 0.5], 0.),
    '_'        => horizontal!(0.5, None, '_', None, None, "normal", [-0.025, 0.062, 0.5], 0.),
    '\u{23DE}' => horizontal!(1., Some('\u{E150}'), '\u{E154}', Some('\u{E151}'), Some('\u{E153}'), "-size4", [0.32, 0.2, 0.5], 1.8),
    '\u{23DF}' => horizontal!(1., Some('\u{E152}'), '\u{E154}', Some('\u{E153}'), Some('\u{E151}'), "-size4", [0.32, 0.2, 0.5], 1.8),
};


// ------------------------- CHARACTER METRICS --------------------------------

static NORMAL: phf::Map<char, CharData> = phf_map! {
    ' ' => c(0., 0., 0.25),
    '!' => c(0.716, 0., 0.278),
    '#' => c(0.694, 0.194, 0.833),
    '$' => c(0.75, 0.056, 0.5),
    '%' => c(0.75, 0.056, 0.833),
    '&' => c(0.716, 0.022, 0.778),
    '\'' => c(0.694, -0.379, 0.278),
    '(' => c(0.75, 0.25, 0.389),
    ')' => c(0.75, 0.25, 0.389),
    '*' => c(0.75, -0.32, 0.5),
    '+' => c(0.583, 0.082, 0.778),
    ',' => c(0.121, 0.194, 0.278),
    '-' => c(0.252, -0.179, 0.333),
    '.' => c(0.12, 0., 0.278),
    '/' => c(0.75, 0.25, 0.5),
    '0' => c(0.666, 0.022, 0.5),
    '1' => c(0.666, 0., 0.5),
    '2' => c(0.666, 0., 0.5),
    '3' => c(0.665, 0.022, 0.5),
    '4' => c(0.677, 0., 0.5),
    '5' => c(0.666, 0.022, 0.5),
    '6' => c(0.666, 0.022, 0.5),
    '7' => c(0.676, 0.022, 0.5),
    '8' => c(0.666, 0.022, 0.5),
    '9' => c(0.666, 0.022, 0.5),
    ':' => c(0.43, 0., 0.278),
    ';' => c(0.43, 0.194, 0.278),
    '<' => c(0.54, 0.04, 0.778),
    '=' => c(0.367, -0.133, 0.778),
    '>' => c(0.54, 0.04, 0.778),
    '?' => c(0.705, 0., 0.472),
    '@' => c(0.705, 0.011, 0.778),
    'A' => c(0.716, 0., 0.75),
    'B' => c(0.683, 0., 0.708),
    'C' => c(0.705, 0.021, 0.722),
    'D' => c(0.683, 0., 0.764),
    'E' => c(0.68, 0., 0.681),
    'F' => c(0.68, 0., 0.653),
    'G' => c(0.705, 0.022, 0.785),
    'H' => c(0.683, 0., 0.75),
    'I' => c(0.683, 0., 0.361),
    'J' => c(0.683, 0.022, 0.514),
    'K' => c(0.683, 0., 0.778),
    'L' => c(0.683, 0., 0.625),
    'M' => c(0.683, 0., 0.917),
    'N' => c(0.683, 0., 0.75),
    'O' => c(0.705, 0.022, 0.778),
    'P' => c(0.683, 0., 0.681),
    'Q' => c(0.705, 0.193, 0.778),
    'R' => c(0.683, 0.022, 0.736),
    'S' => c(0.705, 0.022, 0.556),
    'T' => c(0.677, 0., 0.722),
    'U' => c(0.683, 0.022, 0.75),
    'V' => c(0.683, 0.022, 0.75),
    'W' => c(0.683, 0.022, 1.028),
    'X' => c(0.683, 0., 0.75),
    'Y' => c(0.683, 0., 0.75),
    'Z' => c(0.683, 0., 0.611),
    '[' => c(0.75, 0.25, 0.278),
    '\\' => c(0.75, 0.25, 0.5),
    ']' => c(0.75, 0.25, 0.278),
    '^' => c(0.694, -0.531, 0.5),
    '_' => c(-0.025, 0.062, 0.5),
    '`' => c(0.699, -0.505, 0.5),
    'a' => c(0.448, 0.011, 0.5),
    'b' => c(0.694, 0.011, 0.556),
    'c' => c(0.448, 0.011, 0.444),
    'd' => c(0.694, 0.011, 0.556),
    'e' => c(0.448, 0.011, 0.444),
    'f' => ci(0.705, 0., 0.306, 0.074),
    'g' => c(0.453, 0.206, 0.5),
    'h' => c(0.694, 0., 0.556),
    'i' => c(0.669, 0., 0.278),
    'j' => c(0.669, 0.205, 0.306),
    'k' => c(0.694, 0., 0.528),
    'l' => c(0.694, 0., 0.278),
    'm' => c(0.442, 0., 0.833),
    'n' => c(0.442, 0., 0.556),
    'o' => c(0.448, 0.01, 0.5),
    'p' => c(0.442, 0.194, 0.556),
    'q' => c(0.442, 0.194, 0.528),
    'r' => c(0.442, 0., 0.392),
    's' => c(0.448, 0.011, 0.394),
    't' => c(0.615, 0.01, 0.389),
    'u' => c(0.442, 0.011, 0.556),
    'v' => ci(0.431, 0.011, 0.528, 0.014),
    'w' => ci(0.431, 0.011, 0.722, 0.014),
    'x' => c(0.431, 0., 0.528),
    'y' => ci(0.431, 0.204, 0.528, 0.014),
    'z' => c(0.431, 0., 0.444),
    '{' => c(0.75, 0.25, 0.5),
    '|' => c(0.75, 0.249, 0.278),
    '}' => c(0.75, 0.25, 0.5),
    '~' => c(0.318, -0.215, 0.5),
    '\u{A0}' => c(0., 0., 0.25),
    '\u{A8}' => c(0.669, -0.554, 0.5),
    '\u{AC}' => c(0.356, -0.089, 0.667),
    '\u{AF}' => c(0.59, -0.544, 0.5),
    '\u{B0}' => c(0.715, -0.542, 0.5),
    '\u{B1}' => c(0.666, 0., 0.778),
    '\u{B4}' => c(0.699, -0.505, 0.5),
    '\u{B7}' => c(0.31, -0.199, 0.278),
    '\u{D7}' => c(0.491, -0.009, 0.778),
    '\u{F7}' => c(0.537, 0.036, 0.778),
    '\u{393}' => c(0.68, 0., 0.625),
    '\u{394}' => c(0.716, 0., 0.833),
    '\u{398}' => c(0.705, 0.022, 0.778),
    '\u{39B}' => c(0.716, 0., 0.694),
    '\u{39E}' => c(0.677, 0., 0.667),
    '\u{3A0}' => c(0.68, 0., 0.75),
    '\u{3A3}' => c(0.683, 0., 0.722),
    '\u{3A5}' => c(0.705, 0., 0.778),
    '\u{3A6}' => c(0.683, 0., 0.722),
    '\u{3A8}' => c(0.683, 0., 0.778),
    '\u{3A9}' => c(0.704, 0., 0.722),
    '\u{2013}' => c(0.285, -0.248, 0.5),
    '\u{2014}' => c(0.285, -0.248, 1.),
    '\u{2016}' => c(0.75, 0.25, 0.5),
    '\u{2018}' => c(0.694, -0.379, 0.278),
    '\u{2019}' => c(0.694, -0.379, 0.278),
    '\u{201C}' => c(0.694, -0.379, 0.5),
    '\u{201D}' => c(0.694, -0.379, 0.5),
    '\u{2020}' => c(0.705, 0.216, 0.444),
    '\u{2021}' => c(0.705, 0.205, 0.444),
    '\u{2026}' => c(0.12, 0., 1.172),
    '\u{2032}' => c(0.56, -0.043, 0.275),
    '\u{203E}' => c(0.59, -0.544, 0.5),
    '\u{2061}' => c(0., 0., 0.),
    '\u{2062}' => c(0., 0., 0.),
    '\u{2063}' => c(0., 0., 0.),
    '\u{2064}' => c(0., 0., 0.),
    '\u{2111}' => c(0.705, 0.01, 0.722),
    '\u{2113}' => c(0.705, 0.02, 0.417),
    '\u{2118}' => c(0.453, 0.216, 0.636),
    '\u{211C}' => c(0.716, 0.022, 0.722),
    '\u{2135}' => c(0.694, 0., 0.611),
    '\u{2190}' => c(0.511, 0.011, 1.),
    '\u{2191}' => c(0.694, 0.193, 0.5),
    '\u{2192}' => c(0.511, 0.011, 1.),
    '\u{2193}' => c(0.694, 0.194, 0.5),
    '\u{2194}' => c(0.511, 0.011, 1.),
    '\u{2195}' => c(0.772, 0.272, 0.5),
    '\u{21A6}' => c(0.511, 0.011, 1.),
    '\u{21D0}' => c(0.525, 0.024, 1.),
    '\u{21D1}' => c(0.694, 0.194, 0.611),
    '\u{21D2}' => c(0.525, 0.024, 1.),
    '\u{21D3}' => c(0.694, 0.194, 0.611),
    '\u{21D4}' => c(0.526, 0.025, 1.),
    '\u{2200}' => c(0.694, 0.022, 0.556),
    '\u{2203}' => c(0.694, 0., 0.556),
    '\u{2205}' => c(0.772, 0.078, 0.5),
    '\u{2207}' => c(0.683, 0.033, 0.833),
    '\u{2208}' => c(0.54, 0.04, 0.667),
    '\u{2209}' => c(0.716, 0.215, 0.667),
    '\u{220B}' => c(0.54, 0.04, 0.667),
    '\u{2212}' => c(0.583, 0.082, 0.778),
    '\u{2213}' => c(0.5, 0.166, 0.778),
    '\u{2215}' => c(0.75, 0.25, 0.5),
    '\u{2216}' => c(0.75, 0.25, 0.5),
    '\u{2217}' => c(0.465, -0.035, 0.5),
    '\u{2218}' => c(0.444, -0.055, 0.5),
    '\u{2219}' => c(0.444, -0.055, 0.5),
    '\u{221A}' => ci(0.8, 0.2, 0.833, 0.02),
    '\u{221D}' => c(0.442, 0.011, 0.778),
    '\u{221E}' => c(0.442, 0.011, 1.),
    '\u{2220}' => c(0.694, 0., 0.722),
    '\u{2223}' => c(0.75, 0.249, 0.278),
    '\u{2225}' => c(0.75, 0.25, 0.5),
    '\u{2227}' => c(0.598, 0.022, 0.667),
    '\u{2228}' => c(0.598, 0.022, 0.667),
    '\u{2229}' => c(0.598, 0.022, 0.667),
    '\u{222A}' => c(0.598, 0.022, 0.667),
    '\u{222B}' => ci(0.716, 0.216, 0.417, 0.055),
    '\u{223C}' => c(0.367, -0.133, 0.778),
    '\u{2243}' => c(0.464, -0.036, 0.778),
    '\u{2245}' => c(0.589, -0.022, 0.778),
    '\u{2248}' => c(0.483, -0.055, 0.778),
    '\u{2260}' => c(0.716, 0.215, 0.778),
    '\u{2261}' => c(0.464, -0.036, 0.778),
    '\u{2264}' => c(0.636, 0.138, 0.778),
    '\u{2265}' => c(0.636, 0.138, 0.778),
    '\u{226A}' => c(0.568, 0.067, 1.),
    '\u{226B}' => c(0.567, 0.067, 1.),
    '\u{2282}' => c(0.54, 0.04, 0.778),
    '\u{2283}' => c(0.54, 0.04, 0.778),
    '\u{2286}' => c(0.636, 0.138, 0.778),
    '\u{2287}' => c(0.636, 0.138, 0.778),
    '\u{2295}' => c(0.583, 0.083, 0.778),
    '\u{2296}' => c(0.583, 0.083, 0.778),
    '\u{2297}' => c(0.583, 0.083, 0.778),
    '\u{2299}' => c(0.583, 0.083, 0.778),
    '\u{22A2}' => c(0.694, 0., 0.611),
    '\u{22A5}' => c(0.668, 0., 0.778),
    '\u{22C5}' => c(0.31, -0.199, 0.278),
    '\u{22EE}' => c(0.9, 0.03, 0.278),
    '\u{22EF}' => c(0.31, -0.199, 1.172),
    '\u{22F1}' => c(0.8, 0.03, 1.282),
    '\u{2308}' => c(0.75, 0.25, 0.444),
    '\u{2309}' => c(0.75, 0.25, 0.444),
    '\u{230A}' => c(0.75, 0.25, 0.444),
    '\u{230B}' => c(0.75, 0.25, 0.444),
    '\u{27E8}' => c(0.75, 0.25, 0.389),
    '\u{27E9}' => c(0.75, 0.25, 0.389),
};

static ITALIC: phf::Map<char, CharData> = phf_map! {
    'A' => cs(0.716, 0., 0.75, 0., 0.139),
    'B' => cs(0.683, 0., 0.759, 0., 0.083),
    'C' => cs(0.705, 0.022, 0.715, 0.045, 0.083),
    'D' => cs(0.683, 0., 0.828, 0., 0.056),
    'E' => cs(0.68, 0., 0.738, 0.026, 0.083),
    'F' => cs(0.68, 0., 0.643, 0.106, 0.083),
    'G' => cs(0.705, 0.022, 0.786, 0., 0.083),
    'H' => cs(0.683, 0., 0.831, 0.057, 0.056),
    'I' => cs(0.683, 0., 0.44, 0.064, 0.111),
    'J' => cs(0.683, 0.022, 0.555, 0.078, 0.167),
    'K' => cs(0.683, 0., 0.849, 0.04, 0.056),
    'L' => cs(0.683, 0., 0.681, 0., 0.028),
    'M' => cs(0.683, 0., 0.97, 0.081, 0.083),
    'N' => cs(0.683, 0., 0.803, 0.085, 0.083),
    'O' => cs(0.704, 0.022, 0.763, 0., 0.083),
    'P' => cs(0.683, 0., 0.642, 0.109, 0.083),
    'Q' => cs(0.704, 0.194, 0.791, 0., 0.083),
    'R' => cs(0.683, 0.021, 0.759, 0., 0.083),
    'S' => cs(0.705, 0.022, 0.613, 0.032, 0.083),
    'T' => cs(0.677, 0., 0.584, 0.12, 0.083),
    'U' => cs(0.683, 0.022, 0.683, 0.084, 0.028),
    'V' => ci(0.683, 0.022, 0.583, 0.186),
    'W' => ci(0.683, 0.022, 0.944, 0.104),
    'X' => cs(0.683, 0., 0.828, 0.024, 0.083),
    'Y' => ci(0.683, 0., 0.581, 0.182),
    'Z' => cs(0.683, 0., 0.683, 0.04, 0.083),
    'a' => c(0.441, 0.01, 0.529),
    'b' => c(0.694, 0.011, 0.429),
    'c' => cs(0.442, 0.011, 0.433, 0., 0.056),
    'd' => cs(0.694, 0.01, 0.52, 0., 0.167),
    'e' => cs(0.442, 0.011, 0.466, 0., 0.056),
    'f' => cs(0.705, 0.205, 0.49, 0.06, 0.167),
    'g' => cs(0.442, 0.205, 0.477, 0., 0.028),
    'h' => c(0.694, 0.011, 0.576),
    'i' => cs(0.661, 0.011, 0.345, 0., 0.056),
    'j' => cs(0.661, 0.204, 0.412, 0., 0.056),
    'k' => c(0.694, 0.011, 0.521),
    'l' => cs(0.694, 0.011, 0.298, 0., 0.083),
    'm' => c(0.442, 0.011, 0.878),
    'n' => c(0.442, 0.011, 0.6),
    'o' => cs(0.441, 0.011, 0.485, 0., 0.056),
    'p' => cs(0.442, 0.194, 0.503, 0., 0.083),
    'q' => cs(0.442, 0.194, 0.446, 0.014, 0.083),
    'r' => cs(0.442, 0.011, 0.451, 0., 0.056),
    's' => cs(0.442, 0.01, 0.469, 0., 0.056),
    't' => cs(0.626, 0.011, 0.361, 0., 0.083),
    'u' => cs(0.442, 0.011, 0.572, 0., 0.028),
    'v' => cs(0.443, 0.011, 0.485, 0., 0.028),
    'w' => cs(0.443, 0.011, 0.716, 0., 0.083),
    'x' => cs(0.442, 0.011, 0.572, 0., 0.028),
    'y' => cs(0.442, 0.205, 0.49, 0., 0.056),
    'z' => cs(0.442, 0.011, 0.465, 0., 0.056),
    '\u{131}' => cs(0.441, 0.01, 0.307, 0., 0.028),
    '\u{237}' => cs(0.442, 0.204, 0.332, 0., 0.083),
    '\u{393}' => cs(0.68, 0., 0.615, 0.106, 0.083),
    '\u{394}' => cs(0.716, 0., 0.833, 0., 0.167),
    '\u{398}' => cs(0.704, 0.022, 0.763, 0., 0.083),
    '\u{39B}' => cs(0.716, 0., 0.694, 0., 0.167),
    '\u{39E}' => cs(0.677, 0., 0.742, 0.075, 0.083),
    '\u{3A0}' => cs(0.68, 0., 0.831, 0.056, 0.056),
    '\u{3A3}' => cs(0.683, 0., 0.78, 0.061, 0.083),
    '\u{3A5}' => ci(0.705, 0., 0.583, 0.117),
    '\u{3A6}' => cs(0.683, 0., 0.667, 0., 0.083),
    '\u{3A8}' => cs(0.683, 0., 0.612, 0.103, 0.056),
    '\u{3A9}' => cs(0.704, 0., 0.772, 0.04, 0.083),
    '\u{3B1}' => cs(0.442, 0.011, 0.64, 0., 0.028),
    '\u{3B2}' => cs(0.705, 0.194, 0.566, 0., 0.083),
    '\u{3B3}' => ci(0.441, 0.216, 0.518, 0.025),
    '\u{3B4}' => cs(0.717, 0.01, 0.444, 0., 0.056),
    '\u{3B5}' => cs(0.452, 0.022, 0.466, 0., 0.083),
    '\u{3B6}' => cs(0.704, 0.204, 0.438, 0.073, 0.083),
    '\u{3B7}' => cs(0.442, 0.216, 0.497, 0., 0.056),
    '\u{3B8}' => cs(0.705, 0.01, 0.469, 0., 0.083),
    '\u{3B9}' => cs(0.442, 0.01, 0.354, 0., 0.056),
    '\u{3BA}' => c(0.442, 0.011, 0.576),
    '\u{3BB}' => c(0.694, 0.012, 0.583),
    '\u{3BC}' => cs(0.442, 0.216, 0.603, 0., 0.028),
    '\u{3BD}' => cs(0.442, 0., 0.494, 0.036, 0.028),
    '\u{3BE}' => cs(0.704, 0.205, 0.438, 0., 0.111),
    '\u{3BF}' => cs(0.441, 0.011, 0.485, 0., 0.056),
    '\u{3C0}' => c(0.431, 0.011, 0.57),
    '\u{3C1}' => cs(0.442, 0.216, 0.517, 0., 0.083),
    '\u{3C2}' => cs(0.442, 0.107, 0.363, 0.055, 0.083),
    '\u{3C3}' => c(0.431, 0.011, 0.571),
    '\u{3C4}' => cs(0.431, 0.013, 0.437, 0.08, 0.028),
    '\u{3C5}' => cs(0.443, 0.01, 0.54, 0., 0.028),
    '\u{3C6}' => cs(0.442, 0.218, 0.654, 0., 0.083),
    '\u{3C7}' => cs(0.442, 0.204, 0.626, 0., 0.056),
    '\u{3C8}' => cs(0.694, 0.205, 0.651, 0., 0.111),
    '\u{3C9}' => c(0.443, 0.011, 0.622),
    '\u{3D1}' => cs(0.705, 0.011, 0.591, 0., 0.083),
    '\u{3D5}' => cs(0.694, 0.205, 0.596, 0., 0.083),
    '\u{3D6}' => c(0.431, 0.01, 0.828),
    '\u{3F1}' => cs(0.442, 0.194, 0.517, 0., 0.083),
    '\u{3F5}' => cs(0.431, 0.011, 0.406, 0., 0.056),
    '\u{2202}' => cs(0.715, 0.022, 0.531, 0.035, 0.083),
};

static DOUBLE_STRUCK: phf::Map<char, CharData> = phf_map! {
    'A' => c(0.701, 0., 0.722),
    'B' => c(0.683, 0., 0.667),
    'C' => c(0.702, 0.019, 0.722),
    'D' => c(0.683, 0., 0.722),
    'E' => c(0.683, 0., 0.667),
    'F' => c(0.683, 0., 0.611),
    'G' => c(0.702, 0.019, 0.778),
    'H' => c(0.683, 0., 0.778),
    'I' => c(0.683, 0., 0.389),
    'J' => c(0.683, 0.077, 0.5),
    'K' => c(0.683, 0., 0.778),
    'L' => c(0.683, 0., 0.667),
    'M' => c(0.683, 0., 0.944),
    'N' => c(0.683, 0.02, 0.722),
    'O' => c(0.701, 0.019, 0.778),
    'P' => c(0.683, 0., 0.611),
    'Q' => c(0.701, 0.181, 0.778),
    'R' => c(0.683, 0., 0.722),
    'S' => c(0.702, 0.012, 0.556),
    'T' => c(0.683, 0., 0.667),
    'U' => c(0.683, 0.019, 0.722),
    'V' => c(0.683, 0.02, 0.722),
    'W' => c(0.683, 0.019, 1.),
    'X' => c(0.683, 0., 0.722),
    'Y' => c(0.683, 0., 0.722),
    'Z' => c(0.683, 0., 0.667),
};

static CALLIGRAPHIC: phf::Map<char, CharData> = phf_map! {
    'A' => cs(0.728, 0.05, 0.798, 0., 0.194),
    'B' => cs(0.705, 0.022, 0.657, 0., 0.139),
    'C' => cs(0.705, 0.025, 0.527, 0., 0.139),
    'D' => cs(0.683, 0., 0.771, 0., 0.083),
    'E' => cs(0.705, 0.022, 0.528, 0., 0.111),
    'F' => cs(0.683, 0.032, 0.719, 0.11, 0.111),
    'G' => cs(0.704, 0.119, 0.595, 0., 0.111),
    'H' => cs(0.683, 0.048, 0.845, 0., 0.111),
    'I' => cs(0.683, 0., 0.545, 0.097, 0.028),
    'J' => cs(0.683, 0.119, 0.678, 0.161, 0.167),
    'K' => cs(0.705, 0.022, 0.762, 0., 0.056),
    'L' => cs(0.705, 0.022, 0.69, 0., 0.139),
    'M' => cs(0.705, 0.05, 1.201, 0., 0.139),
    'N' => cs(0.789, 0.05, 0.82, 0.159, 0.083),
    'O' => cs(0.705, 0.022, 0.796, 0., 0.111),
    'P' => cs(0.683, 0.057, 0.696, 0., 0.083),
    'Q' => cs(0.705, 0.131, 0.817, 0., 0.111),
    'R' => cs(0.682, 0.022, 0.848, 0., 0.083),
    'S' => cs(0.705, 0.022, 0.606, 0., 0.139),
    'T' => cs(0.717, 0., 0.545, 0.288, 0.028),
    'U' => cs(0.683, 0.028, 0.626, 0., 0.028),
    'V' => cs(0.683, 0.052, 0.613, 0., 0.028),
    'W' => cs(0.683, 0.053, 0.988, 0., 0.083),
    'X' => cs(0.683, 0., 0.713, 0., 0.139),
    'Y' => cs(0.683, 0.143, 0.668, 0., 0.083),
    'Z' => cs(0.683, 0., 0.725, 0., 0.139),
};

static SIZE1: phf::Map<char, CharData> = phf_map! {
    '(' => c(0.85, 0.349, 0.458),
    ')' => c(0.85, 0.349, 0.458),
    '/' => c(0.85, 0.349, 0.578),
    '[' => c(0.85, 0.349, 0.417),
    '\\' => c(0.85, 0.349, 0.578),
    ']' => c(0.85, 0.349, 0.417),
    '{' => c(0.85, 0.349, 0.583),
    '}' => c(0.85, 0.349, 0.583),
    '\u{220F}' => c(0.75, 0.25, 0.944),
    '\u{2210}' => c(0.75, 0.25, 0.944),
    '\u{2211}' => c(0.75, 0.25, 1.056),
    '\u{221A}' => ci(0.85, 0.35, 1., 0.02),
    '\u{222B}' => ci(0.805, 0.306, 0.472, 0.138),
    '\u{222C}' => ci(0.805, 0.306, 0.819, 0.138),
    '\u{222D}' => ci(0.805, 0.306, 1.166, 0.138),
    '\u{222E}' => ci(0.805, 0.306, 0.472, 0.138),
    '\u{22C0}' => c(0.75, 0.249, 0.833),
    '\u{22C1}' => c(0.75, 0.249, 0.833),
    '\u{22C2}' => c(0.75, 0.249, 0.833),
    '\u{22C3}' => c(0.75, 0.249, 0.833),
    '\u{2308}' => c(0.85, 0.349, 0.472),
    '\u{2309}' => c(0.85, 0.349, 0.472),
    '\u{230A}' => c(0.85, 0.349, 0.472),
    '\u{230B}' => c(0.85, 0.349, 0.472),
    '\u{27E8}' => c(0.85, 0.35, 0.472),
    '\u{27E9}' => c(0.85, 0.35, 0.472),
    '\u{2A00}' => c(0.75, 0.25, 1.111),
    '\u{2A01}' => c(0.75, 0.25, 1.111),
    '\u{2A02}' => c(0.75, 0.25, 1.111),
    '\u{2A04}' => c(0.75, 0.249, 0.833),
    '\u{2A06}' => c(0.75, 0.249, 0.833),
};

static SIZE2: phf::Map<char, CharData> = phf_map! {
    '(' => c(1.15, 0.649, 0.597),
    ')' => c(1.15, 0.649, 0.597),
    '/' => c(1.15, 0.649, 0.811),
    '[' => c(1.15, 0.649, 0.472),
    '\\' => c(1.15, 0.649, 0.811),
    ']' => c(1.15, 0.649, 0.472),
    '{' => c(1.15, 0.649, 0.667),
    '}' => c(1.15, 0.649, 0.667),
    '\u{220F}' => c(0.95, 0.45, 1.278),
    '\u{2210}' => c(0.95, 0.45, 1.278),
    '\u{2211}' => c(0.95, 0.45, 1.444),
    '\u{221A}' => ci(1.15, 0.65, 1., 0.02),
    '\u{222B}' => ci(1.36, 0.862, 0.556, 0.388),
    '\u{222C}' => ci(1.36, 0.862, 1.015, 0.388),
    '\u{222D}' => ci(1.36, 0.862, 1.474, 0.388),
    '\u{222E}' => ci(1.36, 0.862, 0.556, 0.388),
    '\u{22C0}' => c(0.95, 0.45, 1.111),
    '\u{22C1}' => c(0.95, 0.45, 1.111),
    '\u{22C2}' => c(0.95, 0.45, 1.111),
    '\u{22C3}' => c(0.95, 0.45, 1.111),
    '\u{2308}' => c(1.15, 0.649, 0.528),
    '\u{2309}' => c(1.15, 0.649, 0.528),
    '\u{230A}' => c(1.15, 0.649, 0.528),
    '\u{230B}' => c(1.15, 0.649, 0.528),
    '\u{27E8}' => c(1.15, 0.649, 0.611),
    '\u{27E9}' => c(1.15, 0.649, 0.611),
    '\u{2A00}' => c(0.949, 0.449, 1.511),
    '\u{2A01}' => c(0.949, 0.449, 1.511),
    '\u{2A02}' => c(0.949, 0.449, 1.511),
    '\u{2A04}' => c(0.95, 0.45, 1.111),
    '\u{2A06}' => c(0.95, 0.45, 1.111),
};

static SIZE3: phf::Map<char, CharData> = phf_map! {
    '(' => c(1.45, 0.949, 0.736),
    ')' => c(1.45, 0.949, 0.736),
    '/' => c(1.45, 0.949, 1.044),
    '[' => c(1.45, 0.949, 0.528),
    '\\' => c(1.45, 0.949, 1.044),
    ']' => c(1.45, 0.949, 0.528),
    '{' => c(1.45, 0.949, 0.75),
    '}' => c(1.45, 0.949, 0.75),
    '\u{221A}' => ci(1.45, 0.95, 1., 0.02),
    '\u{2308}' => c(1.45, 0.949, 0.583),
    '\u{2309}' => c(1.45, 0.949, 0.583),
    '\u{230A}' => c(1.45, 0.949, 0.583),
    '\u{230B}' => c(1.45, 0.949, 0.583),
    '\u{27E8}' => c(1.45, 0.95, 0.75),
    '\u{27E9}' => c(1.45, 0.949, 0.75),
};

static SIZE4: phf::Map<char, CharData> = phf_map! {
    '(' => c(1.75, 1.249, 0.792),
    ')' => c(1.75, 1.249, 0.792),
    '/' => c(1.75, 1.249, 1.278),
    '[' => c(1.75, 1.249, 0.583),
    '\\' => c(1.75, 1.249, 1.278),
    ']' => c(1.75, 1.249, 0.583),
    '{' => c(1.75, 1.249, 0.806),
    '}' => c(1.75, 1.249, 0.806),
    '\u{221A}' => ci(1.75, 1.25, 1., 0.02),
    '\u{2308}' => c(1.75, 1.249, 0.639),
    '\u{2309}' => c(1.75, 1.249, 0.639),
    '\u{230A}' => c(1.75, 1.249, 0.639),
    '\u{230B}' => c(1.75, 1.249, 0.639),
    '\u{239B}' => c(1.154, 0.655, 0.875),
    '\u{239C}' => c(0.61, 0.01, 0.875),
    '\u{239D}' => c(1.165, 0.644, 0.875),
    '\u{239E}' => c(1.154, 0.655, 0.875),
    '\u{239F}' => c(0.61, 0.01, 0.875),
    '\u{23A0}' => c(1.165, 0.644, 0.875),
    '\u{23A1}' => c(1.154, 0.645, 0.667),
    '\u{23A2}' => c(0.602, 0., 0.667),
    '\u{23A3}' => c(1.155, 0.644, 0.667),
    '\u{23A4}' => c(1.154, 0.645, 0.667),
    '\u{23A5}' => c(0.602, 0., 0.667),
    '\u{23A6}' => c(1.155, 0.644, 0.667),
    '\u{23A7}' => c(0.899, 0.01, 0.889),
    '\u{23A8}' => c(1.16, 0.65, 0.889),
    '\u{23A9}' => c(0.01, 0.899, 0.889),
    '\u{23AA}' => c(0.29, 0.015, 0.889),
    '\u{23AB}' => c(0.899, 0.01, 0.889),
    '\u{23AC}' => c(1.16, 0.65, 0.889),
    '\u{23AD}' => c(0.01, 0.899, 0.889),
    '\u{23B7}' => c(0.935, 0.885, 1.056),
    '\u{27E8}' => c(1.75, 1.248, 0.806),
    '\u{27E9}' => c(1.75, 1.248, 0.806),
    '\u{E000}' => c(0.625, 0.014, 1.056),
    '\u{E001}' => ci(0.605, 0.014, 1.056, 0.02),
    '\u{E150}' => c(0.12, 0.213, 0.45),
    '\u{E151}' => c(0.12, 0.213, 0.45),
    '\u{E152}' => c(0.333, 0., 0.45),
    '\u{E153}' => c(0.333, 0., 0.45),
    '\u{E154}' => c(0.12, 0., 0.4),
};


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_chain_to_normal() {
        let font = TexFont::new();
        let (data, found) = font.char_data("bold-italic", 'x').unwrap();
        assert_eq!(found.name, "italic");
        assert_eq!(data.w, 0.572);

        let (_, found) = font.char_data("italic", '2').unwrap();
        assert_eq!(found.name, "normal");
        assert_eq!(found.font_class().as_deref(), Some("TEX-N"));

        assert!(font.char_data("normal", '\u{1F600}').is_none());
    }

    #[test]
    fn every_chain_ends() {
        let font = TexFont::new();
        for variant in font.variants() {
            let mut steps = 0;
            let mut current = Some(variant);
            while let Some(v) = current {
                current = v.chain.and_then(|name| font.variant(name));
                steps += 1;
                assert!(steps < 10, "chain of {} loops", variant.name);
            }
        }
    }

    #[test]
    fn delimiter_sizes_exist_in_size_variants() {
        let font = TexFont::new();
        for c in ['(', ')', '[', ']', '{', '}', '\u{27E8}', '\u{230A}', '\u{221A}'] {
            let delim = font.delimiter(c).unwrap();
            assert_eq!(delim.dir, Direction::Vertical);
            let mut previous = 0.;
            for (i, size) in delim.sizes.iter().enumerate() {
                assert!(*size > previous);
                previous = *size;
                let variant = font.size_variant(i);
                let (data, _) = font.char_data(variant, c).unwrap();
                assert!((data.h + data.d - size).abs() < 0.01, "{} in {}", c, variant);
            }
            if let Some(assembly) = delim.stretch {
                assert!(font.char_data(assembly.variant, assembly.ext).is_some());
            }
        }
    }

    #[test]
    fn unknown_characters_get_a_guess() {
        let data = CharData::unknown('\u{4E2D}');
        assert!(data.unknown);
        assert_eq!(data.w, 1.);
        assert_eq!(CharData::unknown(' ').w, 0.25);
    }
}
