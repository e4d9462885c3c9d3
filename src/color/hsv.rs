use palette::{Hsv, IntoColor, Srgb};

use super::Rgb;

/// Convert hue, saturation and value (each 0.0-1.0) to an 8-bit color.
///
/// Hue wraps, so 1.0 is red again. Components outside 0.0-1.0 clamp per
/// channel.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let hsv: Hsv = Hsv::new(hue.rem_euclid(1.0) * 360.0, saturation, value);
    let rgb: Srgb = hsv.into_color();
    Rgb {
        r: to_channel(rgb.red),
        g: to_channel(rgb.green),
        b: to_channel(rgb.blue),
    }
}

/// Scale a 0.0-1.0 component to a channel byte, truncating.
pub fn to_channel(component: f32) -> u8 {
    (component * 255.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(hsv_to_rgb(0.42, 0.0, 0.5), Rgb::new(127, 127, 127));
    }

    #[test]
    fn hue_wraps_at_one() {
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(1.25, 0.6, 0.9), hsv_to_rgb(0.25, 0.6, 0.9));
    }

    #[test]
    fn out_of_range_value_clamps() {
        assert_eq!(hsv_to_rgb(0.0, 0.0, 1.5), Rgb::new(255, 255, 255));
        assert_eq!(hsv_to_rgb(0.0, 0.0, -0.5), Rgb::BLACK);
    }

    #[test]
    fn channel_clamps_out_of_range() {
        assert_eq!(to_channel(1.2), 255);
        assert_eq!(to_channel(-0.3), 0);
        assert_eq!(to_channel(0.999), 254);
    }
}
