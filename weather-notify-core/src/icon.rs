use std::fmt;

/// Display icon derived from an OpenWeather condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Storm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
    Warning,
}

impl WeatherIcon {
    /// Map a condition code to its icon.
    ///
    /// Ranges are checked in order and the first match wins, so 800 is
    /// classified as clear before the 801..900 cloud bucket is considered.
    pub fn from_code(code: i64) -> Self {
        match code {
            200..300 => WeatherIcon::Storm,
            300..400 => WeatherIcon::Drizzle,
            500..600 => WeatherIcon::Rain,
            600..700 => WeatherIcon::Snow,
            700..800 => WeatherIcon::Atmosphere,
            800 => WeatherIcon::Clear,
            801..900 => WeatherIcon::Clouds,
            _ => WeatherIcon::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::Storm => "⛈️",
            WeatherIcon::Drizzle => "🌧️",
            WeatherIcon::Rain => "🌧️",
            WeatherIcon::Snow => "❄️",
            WeatherIcon::Atmosphere => "🌫️",
            WeatherIcon::Clear => "☀️",
            WeatherIcon::Clouds => "☁️",
            WeatherIcon::Warning => "⚠️",
        }
    }
}

impl fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_code_ranges() {
        let cases = [
            (200..300, WeatherIcon::Storm),
            (300..400, WeatherIcon::Drizzle),
            (500..600, WeatherIcon::Rain),
            (600..700, WeatherIcon::Snow),
            (700..800, WeatherIcon::Atmosphere),
            (801..900, WeatherIcon::Clouds),
        ];

        for (range, expected) in cases {
            for code in range {
                assert_eq!(WeatherIcon::from_code(code), expected, "code {code}");
            }
        }
    }

    #[test]
    fn exactly_800_is_clear() {
        assert_eq!(WeatherIcon::from_code(800), WeatherIcon::Clear);
        assert_eq!(WeatherIcon::from_code(801), WeatherIcon::Clouds);
        assert_eq!(WeatherIcon::from_code(799), WeatherIcon::Atmosphere);
    }

    #[test]
    fn out_of_range_codes_are_warnings() {
        for code in [-1, 0, 199, 400, 450, 499, 900, 1000] {
            assert_eq!(WeatherIcon::from_code(code), WeatherIcon::Warning, "code {code}");
        }
    }

    #[test]
    fn display_renders_glyph() {
        assert_eq!(WeatherIcon::Clear.to_string(), "☀️");
        assert_eq!(WeatherIcon::Warning.to_string(), "⚠️");
    }
}
