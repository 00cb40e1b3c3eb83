//! Branding line shown at the bottom of every portal screen.

pub fn watermark_line(text: &str) -> String {
    format!("@Powered by: {text}")
}
