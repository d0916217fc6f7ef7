use plugpack::presentation::{ColorWhen, OutputFormat, TextRenderer};

use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};

/// Output decisions shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub format: OutputFormat,
    pub verbose: u8,
    pub color: bool,
    pub unicode: bool,
}

impl UiContext {
    pub fn new(json: bool, verbose: u8, cli_color: Option<ColorWhen>) -> Self {
        Self::from_caps(json, verbose, cli_color, detect_capabilities())
    }

    pub(crate) fn from_caps(
        json: bool,
        verbose: u8,
        cli_color: Option<ColorWhen>,
        caps: TerminalCapabilities,
    ) -> Self {
        let color = match cli_color {
            Some(ColorWhen::Never) => false,
            Some(ColorWhen::Always) => true,
            Some(ColorWhen::Auto) | None => caps.supports_color && !caps.is_ci,
        };
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            verbose,
            color: color && !json,
            unicode: caps.supports_unicode,
        }
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn renderer(&self) -> TextRenderer {
        TextRenderer::new(self.color, self.unicode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tty() -> TerminalCapabilities {
        TerminalCapabilities {
            supports_color: true,
            supports_unicode: true,
            is_ci: false,
        }
    }

    #[test]
    fn auto_follows_terminal() {
        assert!(UiContext::from_caps(false, 0, None, tty()).color);
        let ci = TerminalCapabilities { is_ci: true, ..tty() };
        assert!(!UiContext::from_caps(false, 0, Some(ColorWhen::Auto), ci).color);
    }

    #[test]
    fn explicit_color_wins() {
        let pipe = TerminalCapabilities {
            supports_color: false,
            ..tty()
        };
        assert!(UiContext::from_caps(false, 0, Some(ColorWhen::Always), pipe).color);
        assert!(!UiContext::from_caps(false, 0, Some(ColorWhen::Never), tty()).color);
    }

    #[test]
    fn json_never_colors() {
        let ui = UiContext::from_caps(true, 0, Some(ColorWhen::Always), tty());
        assert!(ui.json());
        assert!(!ui.color);
    }
}
