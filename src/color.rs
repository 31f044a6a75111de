//! Recency score -> display color

/// Red at 0, amber at 50, green at 100
const STOPS: [(f64, (u8, u8, u8)); 3] = [
  (0.0, (0xef, 0x44, 0x44)),
  (50.0, (0xf5, 0x9e, 0x0b)),
  (100.0, (0x22, 0xc5, 0x5e)),
];

/// Map a 0-100 score to a `#rrggbb` color, interpolating between stops
pub fn color_for_score(score: f64) -> String {
  let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };

  let (lo, hi) = if score <= STOPS[1].0 {
    (STOPS[0], STOPS[1])
  } else {
    (STOPS[1], STOPS[2])
  };
  let t = (score - lo.0) / (hi.0 - lo.0);

  let lerp = |a: u8, b: u8| -> u8 { (a as f64 + (b as f64 - a as f64) * t).round() as u8 };
  let (r, g, b) = (
    lerp(lo.1 .0, hi.1 .0),
    lerp(lo.1 .1, hi.1 .1),
    lerp(lo.1 .2, hi.1 .2),
  );

  format!("#{:02x}{:02x}{:02x}", r, g, b)
}
