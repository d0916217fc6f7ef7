use plugpack::{ErrorCategory, PackError};

use crate::ui::terminal::detect_capabilities;

fn pack_error(err: &anyhow::Error) -> Option<&PackError> {
    err.chain().find_map(|cause| cause.downcast_ref::<PackError>())
}

/// Exit code for a failed command: 2 configuration, 3 resolution, 4 assembly
pub fn exit_code(err: &anyhow::Error) -> i32 {
    pack_error(err)
        .map(|e| e.category().exit_code())
        .unwrap_or(1)
}

fn category_label(err: &anyhow::Error) -> Option<&'static str> {
    Some(match pack_error(err)?.category() {
        ErrorCategory::Configuration => "configuration",
        ErrorCategory::Resolution => "resolution",
        ErrorCategory::Assembly => "assembly",
    })
}

pub fn format_error(err: &anyhow::Error) -> String {
    let caps = detect_capabilities();
    format_error_with(err, caps.supports_color, caps.supports_unicode)
}

fn format_error_with(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    use crossterm::style::Stylize;

    let icon = if supports_unicode { "✗" } else { "[ERROR]" };
    let icon = if supports_color {
        icon.red().to_string()
    } else {
        icon.to_string()
    };

    let mut out = format!("{} {}\n", icon, err);
    for cause in err.chain().skip(1) {
        out.push_str(&format!("  caused by: {}\n", cause));
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let mut output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
            "exit_code": exit_code(err),
        });
        if let Some(category) = category_label(err) {
            output["category"] = serde_json::json!(category);
        }
        println!("{}", output);
        return;
    }

    eprint!("{}", format_error(err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_follow_categories() {
        let missing = anyhow::Error::new(PackError::MissingRequiredArtifact {
            label: "Hytale server jar".to_string(),
            path: PathBuf::from("HystaleJar/HytaleServer.jar"),
        });
        assert_eq!(exit_code(&missing), 2);

        let not_found: anyhow::Result<()> = Err(PackError::ArtifactNotFound {
            artifact: "a:b:1".to_string(),
            searched: "central".to_string(),
        })
        .context("resolving dependencies");
        assert_eq!(exit_code(&not_found.unwrap_err()), 3);

        assert_eq!(exit_code(&anyhow::Error::new(PackError::Interrupted)), 4);
        assert_eq!(exit_code(&anyhow::anyhow!("something else")), 1);
    }

    #[test]
    fn plain_error_lists_causes() {
        let err: anyhow::Result<()> = Err(PackError::Interrupted).context("writing archive");
        let text = format_error_with(&err.unwrap_err(), false, false);
        assert_eq!(text, "[ERROR] writing archive\n  caused by: build interrupted\n");
    }

    #[test]
    fn category_names() {
        let err = anyhow::Error::new(PackError::Interrupted);
        assert_eq!(category_label(&err), Some("assembly"));
        assert_eq!(category_label(&anyhow::anyhow!("plain")), None);
    }
}
