//! Text and canvas effects: matrix rain columns and decrypting text.
//!
//! Randomness is injected as a `FnMut() -> f64` yielding values in `[0, 1)`
//! so the browser can pass `Math.random` and tests can pass a fixed sequence.

pub const MATRIX_GLYPHS: &str = "01010101アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";
pub const MATRIX_FONT_PX: f64 = 16.0;
pub const MATRIX_FRAME_MS: u32 = 33;
/// Chance per frame that a column past the bottom edge restarts.
pub const MATRIX_RESET_CHANCE: f64 = 0.025;
/// Translucent black painted over the canvas every frame.
pub const MATRIX_FADE_FILL: &str = "rgba(0, 0, 0, 0.05)";
pub const MATRIX_GLYPH_FILL: &str = "#0F0";

pub const DECRYPT_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";
pub const DECRYPT_SPEED_MS: u32 = 50;
pub const DECRYPT_MAX_ITERATIONS: usize = 15;

fn pick(chars: &[char], random: &mut impl FnMut() -> f64) -> char {
    if chars.is_empty() {
        return ' ';
    }
    let index = (random() * chars.len() as f64) as usize;
    chars[index.min(chars.len() - 1)]
}

/// One glyph to paint at canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug)]
pub struct MatrixRain {
    glyphs: Vec<char>,
    drops: Vec<u32>,
    height: f64,
}

impl MatrixRain {
    pub fn new(width: f64, height: f64) -> Self {
        let mut rain = Self {
            glyphs: MATRIX_GLYPHS.chars().collect(),
            drops: Vec::new(),
            height,
        };
        rain.resize(width, height);
        rain
    }

    /// Columns are re-laid on width changes; existing ones keep their row.
    pub fn resize(&mut self, width: f64, height: f64) {
        let columns = (width.max(0.0) / MATRIX_FONT_PX).floor() as usize;
        self.drops.resize(columns, 1);
        self.height = height;
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    /// Advances every column by one row and returns the glyphs to draw.
    pub fn step(&mut self, random: &mut impl FnMut() -> f64) -> Vec<Glyph> {
        let mut frame = Vec::with_capacity(self.drops.len());

        for (column, drop) in self.drops.iter_mut().enumerate() {
            let y = f64::from(*drop) * MATRIX_FONT_PX;
            frame.push(Glyph {
                ch: pick(&self.glyphs, random),
                x: column as f64 * MATRIX_FONT_PX,
                y,
            });

            if y > self.height && random() > 1.0 - MATRIX_RESET_CHANCE {
                *drop = 0;
            }
            *drop += 1;
        }

        frame
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealDirection {
    #[default]
    Start,
    End,
    Center,
}

/// Character indices in the order they settle.
pub fn reveal_order(len: usize, direction: RevealDirection) -> Vec<usize> {
    match direction {
        RevealDirection::Start => (0..len).collect(),
        RevealDirection::End => (0..len).rev().collect(),
        RevealDirection::Center => {
            let middle = len / 2;
            (0..len)
                .filter_map(|i| {
                    if i % 2 == 0 {
                        Some(middle + i / 2)
                    } else {
                        middle.checked_sub(i.div_ceil(2))
                    }
                })
                .filter(|index| *index < len)
                .collect()
        }
    }
}

/// Scrambles a string and reveals it one character per tick.
#[derive(Clone, Debug)]
pub struct Decrypt {
    target: Vec<char>,
    charset: Vec<char>,
    /// Tick at which each character settles.
    settle_at: Vec<usize>,
    max_iterations: usize,
    iteration: usize,
}

impl Decrypt {
    pub fn new(text: &str, direction: RevealDirection) -> Self {
        Self::with_charset(text, direction, DECRYPT_CHARSET, DECRYPT_MAX_ITERATIONS)
    }

    pub fn with_charset(
        text: &str,
        direction: RevealDirection,
        charset: &str,
        max_iterations: usize,
    ) -> Self {
        let target: Vec<char> = text.chars().collect();
        let mut settle_at = vec![usize::MAX; target.len()];
        for (rank, index) in reveal_order(target.len(), direction).into_iter().enumerate() {
            settle_at[index] = rank;
        }

        Self {
            target,
            charset: charset.chars().collect(),
            settle_at,
            max_iterations,
            iteration: 0,
        }
    }

    /// Renders one frame. Returns `None` once the animation is over; the
    /// caller then shows the plain text.
    pub fn tick(&mut self, random: &mut impl FnMut() -> f64) -> Option<String> {
        if self.is_done() {
            return None;
        }

        let frame = self
            .target
            .iter()
            .zip(&self.settle_at)
            .map(|(ch, settle)| {
                if *settle < self.iteration {
                    *ch
                } else {
                    pick(&self.charset, random)
                }
            })
            .collect();

        self.iteration += 1;
        Some(frame)
    }

    pub fn is_done(&self) -> bool {
        self.iteration > self.target.len() + self.max_iterations
    }

    pub fn text(&self) -> String {
        self.target.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> impl FnMut() -> f64 {
        move || value
    }

    #[test]
    fn rain_lays_out_one_column_per_glyph_width() {
        let rain = MatrixRain::new(100.0, 400.0);
        assert_eq!(rain.columns(), 6);
    }

    #[test]
    fn rain_columns_fall_one_row_per_frame() {
        let mut rain = MatrixRain::new(32.0, 400.0);
        let mut random = constant(0.0);

        let first = rain.step(&mut random);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].x, 16.0);
        assert_eq!(first[0].y, 16.0);
        assert_eq!(first[0].ch, '0');

        let second = rain.step(&mut random);
        assert_eq!(second[0].y, 32.0);
    }

    #[test]
    fn rain_restarts_only_below_the_edge() {
        let mut rain = MatrixRain::new(16.0, 20.0);
        let mut always_reset = constant(0.99);

        // Row 1 (y = 16) is still on screen.
        rain.step(&mut always_reset);
        // Row 2 (y = 32) is past the edge; the column wraps to row 1.
        rain.step(&mut always_reset);
        let frame = rain.step(&mut always_reset);
        assert_eq!(frame[0].y, 16.0);
    }

    #[test]
    fn rain_keeps_falling_when_the_roll_misses() {
        let mut rain = MatrixRain::new(16.0, 20.0);
        let mut never_reset = constant(0.5);
        for _ in 0..3 {
            rain.step(&mut never_reset);
        }
        assert_eq!(rain.step(&mut never_reset)[0].y, 64.0);
    }

    #[test]
    fn reveal_orders() {
        assert_eq!(reveal_order(4, RevealDirection::Start), vec![0, 1, 2, 3]);
        assert_eq!(reveal_order(4, RevealDirection::End), vec![3, 2, 1, 0]);
        assert_eq!(reveal_order(5, RevealDirection::Center), vec![2, 1, 3, 0, 4]);
        assert_eq!(reveal_order(4, RevealDirection::Center), vec![2, 1, 3, 0]);
        assert!(reveal_order(0, RevealDirection::Center).is_empty());
    }

    #[test]
    fn decrypt_settles_from_the_start() {
        let mut decrypt = Decrypt::with_charset("abc", RevealDirection::Start, "#", 2);
        let mut random = constant(0.0);

        assert_eq!(decrypt.tick(&mut random).as_deref(), Some("###"));
        assert_eq!(decrypt.tick(&mut random).as_deref(), Some("a##"));
        assert_eq!(decrypt.tick(&mut random).as_deref(), Some("ab#"));
        assert_eq!(decrypt.tick(&mut random).as_deref(), Some("abc"));
    }

    #[test]
    fn decrypt_finishes_after_length_plus_max_iterations() {
        let mut decrypt = Decrypt::with_charset("ab", RevealDirection::End, "#", 3);
        let mut random = constant(0.3);
        let frames = std::iter::from_fn(|| decrypt.tick(&mut random)).count();

        assert_eq!(frames, 6);
        assert!(decrypt.is_done());
        assert_eq!(decrypt.text(), "ab");
    }
}
