//! HSL color scales.
//!
//! Discrete palettes are built by stepping linearly through HSL space between
//! two anchor colors. Conversions follow the usual `rgb ⇄ hsl` formulas with
//! channels in `[0, 1]` and hue as a fraction of a full turn, and hex output
//! rounds each channel as `floor(c * 255 + 0.5 - FLOAT_ERROR)`, so the same
//! anchors always give the same `#rrggbb` strings.
//!
//! The conversions are written out here instead of using colorgrad's
//! `Color::from_hsla`/`to_hsla` because published palettes depend on this
//! exact rounding.

const FLOAT_ERROR: f64 = 0.0000005;

/// A color in HSL space, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Convert an 8-bit RGB color to HSL. Grays get hue and saturation 0.
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| c as f64 / 255.0);

        let vmin = r.min(g).min(b);
        let vmax = r.max(g).max(b);
        let diff = vmax - vmin;
        let vsum = vmin + vmax;
        let l = vsum / 2.0;

        if diff < FLOAT_ERROR {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let s = if l < 0.5 {
            diff / vsum
        } else {
            diff / (2.0 - vsum)
        };

        let dr = (((vmax - r) / 6.0) + (diff / 2.0)) / diff;
        let dg = (((vmax - g) / 6.0) + (diff / 2.0)) / diff;
        let db = (((vmax - b) / 6.0) + (diff / 2.0)) / diff;

        let mut h = if r == vmax {
            db - dg
        } else if g == vmax {
            (1.0 / 3.0) + dr - db
        } else {
            (2.0 / 3.0) + dg - dr
        };
        if h < 0.0 {
            h += 1.0;
        }
        if h > 1.0 {
            h -= 1.0;
        }

        Hsl { h, s, l }
    }

    /// Convert back to 8-bit RGB.
    pub fn to_rgb(self) -> [u8; 3] {
        let Hsl { h, s, l } = self;
        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let v2 = if l < 0.5 {
                l * (1.0 + s)
            } else {
                (l + s) - (s * l)
            };
            let v1 = 2.0 * l - v2;
            (
                hue_to_channel(v1, v2, h + (1.0 / 3.0)),
                hue_to_channel(v1, v2, h),
                hue_to_channel(v1, v2, h - (1.0 / 3.0)),
            )
        };
        [r, g, b].map(|c| (c * 255.0 + 0.5 - FLOAT_ERROR) as u8)
    }
}

fn hue_to_channel(v1: f64, v2: f64, mut vh: f64) -> f64 {
    while vh < 0.0 {
        vh += 1.0;
    }
    while vh > 1.0 {
        vh -= 1.0;
    }

    if 6.0 * vh < 1.0 {
        return v1 + (v2 - v1) * 6.0 * vh;
    }
    if 2.0 * vh < 1.0 {
        return v2;
    }
    if 3.0 * vh < 2.0 {
        return v1 + (v2 - v1) * ((2.0 / 3.0) - vh) * 6.0;
    }
    v1
}

/// `steps` colors from `begin` to `end` inclusive, evenly spaced in HSL.
///
/// Hue is interpolated without wrapping, so blue to red passes through cyan,
/// green and yellow.
pub fn hsl_scale(begin: [u8; 3], end: [u8; 3], steps: usize) -> Vec<[u8; 3]> {
    let from = Hsl::from_rgb(begin);
    let to = Hsl::from_rgb(end);
    let intervals = steps.saturating_sub(1);

    let step = if intervals > 0 {
        let n = intervals as f64;
        Hsl {
            h: (to.h - from.h) / n,
            s: (to.s - from.s) / n,
            l: (to.l - from.l) / n,
        }
    } else {
        Hsl {
            h: 0.0,
            s: 0.0,
            l: 0.0,
        }
    };

    (0..steps)
        .map(|i| {
            let r = i as f64;
            Hsl {
                h: from.h + step.h * r,
                s: from.s + step.s * r,
                l: from.l + step.l * r,
            }
            .to_rgb()
        })
        .collect()
}

/// Chain several HSL scales through successive anchors.
///
/// Segment `i` runs from `anchors[i]` to `anchors[i + 1]` over `steps[i]`
/// colors; the first color of every segment after the first repeats the
/// previous segment's last color and is dropped.
pub fn hsl_chain(anchors: &[[u8; 3]], steps: &[usize]) -> Vec<[u8; 3]> {
    let mut colors = Vec::new();
    for (i, (pair, &n)) in anchors.windows(2).zip(steps).enumerate() {
        let segment = hsl_scale(pair[0], pair[1], n);
        let skip = if i == 0 { 0 } else { 1 };
        colors.extend(segment.into_iter().skip(skip));
    }
    colors
}
