//! Loading indicator and info panel state. The platform draws it.

use corelib::scene::Rgb;

pub const LOADING_TEXT: &str = "Loading...";

#[derive(Clone, Debug, PartialEq)]
pub struct StatusPanel {
    pub loading_text: String,
    pub loading_visible: bool,
    /// `None` keeps the overlay's default text color.
    pub loading_color: Option<Rgb>,
    pub info_visible: bool,
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self {
            loading_text: LOADING_TEXT.to_string(),
            loading_visible: true,
            loading_color: None,
            info_visible: false,
        }
    }
}

impl StatusPanel {
    pub fn set_progress(&mut self, percent: f64) {
        self.loading_text = format!("Loading: {}%", percent.round() as i64);
    }

    pub fn loaded(&mut self, show_info: bool) {
        self.loading_visible = false;
        if show_info {
            self.info_visible = true;
        }
    }

    pub fn failed(&mut self, message: &str, color: Option<Rgb>) {
        self.loading_text = message.to_string();
        if color.is_some() {
            self.loading_color = color;
        }
    }
}
