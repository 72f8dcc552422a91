//! Decorative HUD text
//!
//! Produces rich-text markup (`<color=#RRGGBB><size=N>c</size></color>`) that
//! makes each character bob on a sine wave and cycle through the rainbow.
//! The host's text renderer interprets the tags.

use std::fmt::Write;

use crate::settings::TextFxConfig;

/// HSV (all in [0, 1]) to RGB bytes
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [to_byte(r), to_byte(g), to_byte(b)]
}

fn to_byte(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Uppercase `RRGGBB`
pub fn to_hex_rgb(rgb: [u8; 3]) -> String {
    format!("{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// Wave + rainbow markup for `text` at animation time `time` (seconds)
pub fn wave_rainbow(text: &str, time: f32, fx: &TextFxConfig) -> String {
    let mut out = String::with_capacity(text.len() * 40);
    for (i, c) in text.chars().enumerate() {
        let i = i as f32;
        let wave = (time * fx.wave_frequency + i * 0.5).sin() * fx.wave_amplitude;
        let hue = (time * fx.rainbow_speed + i * 0.1).rem_euclid(1.0);
        let color = to_hex_rgb(hsv_to_rgb(hue, 1.0, 1.0));
        // Writing into a String can't fail
        let _ = write!(
            out,
            "<color=#{color}><size={:.1}>{c}</size></color>",
            fx.base_size + wave
        );
    }
    out
}

pub fn score_text(score: f32) -> String {
    format!("Score: {score:.2}")
}

pub fn final_score_text(score: f32) -> String {
    format!("Final Score: {score:.2}")
}

/// Animated bubble counter, empty once no bubbles are left
pub fn bubble_text(count: usize, time: f32, fx: &TextFxConfig) -> String {
    if count == 0 {
        return String::new();
    }
    wave_rainbow(&format!(" Bubbles: {count}"), time, fx)
}

/// Combo counter, only shown for an actual streak
pub fn combo_text(combo: u32, multiplier: f32) -> Option<String> {
    (combo > 1).then(|| format!("Combo {combo} x{multiplier:.1}"))
}
