//! Preview behavior settings handed to the use cases.

/// Upper bound for screenshots per link.
pub const MAX_SCREENSHOT_LIMIT: usize = 5;
/// Upper bound for links previewed per message.
pub const MAX_MAGNET_LIMIT: usize = 10;

/// Runtime preview settings, already clamped to their valid ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    /// Send screenshot links as text instead of images.
    pub output_as_link: bool,
    /// Screenshots per link, `0..=5`.
    pub max_screenshots: usize,
    /// Blur strength; `0` disables blurring.
    pub cover_mosaic_level: f32,
    /// Links per message, `1..=10`.
    pub max_magnet_count: usize,
    /// Preview links found in ordinary messages.
    pub auto_parse: bool,
    /// Groups the bot answers in; empty means all.
    pub group_whitelist: Vec<String>,
    /// Base URL screenshot links are rewritten onto.
    pub lookup_base_url: String,
}

impl PreviewSettings {
    /// Clamps a configured screenshot count.
    #[must_use]
    pub fn clamp_screenshots(value: i64) -> usize {
        usize::try_from(value.clamp(0, MAX_SCREENSHOT_LIMIT as i64)).unwrap_or(0)
    }

    /// Clamps a configured link count.
    #[must_use]
    pub fn clamp_magnets(value: i64) -> usize {
        usize::try_from(value.clamp(1, MAX_MAGNET_LIMIT as i64)).unwrap_or(1)
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            output_as_link: false,
            max_screenshots: 3,
            cover_mosaic_level: 0.3,
            max_magnet_count: 1,
            auto_parse: true,
            group_whitelist: Vec::new(),
            lookup_base_url: crate::application::services::preview_formatter::LOOKUP_HOST
                .to_string(),
        }
    }
}
