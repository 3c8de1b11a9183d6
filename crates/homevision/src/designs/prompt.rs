pub const DEFAULT_STYLE: &str = "Modern";

/// Trims the requested style; blank input falls back to [`DEFAULT_STYLE`].
pub fn normalize_style(style: &str) -> &str {
    match style.trim() {
        "" => DEFAULT_STYLE,
        trimmed => trimmed,
    }
}

/// Instruction for the image model. Structural elements stay fixed, only furnishings change.
pub fn style_prompt(style: &str) -> String {
    format!(
        "Renovate this room in a '{style}' style.\n\
         CRITICAL: Keep the structural elements (walls, windows, doors, ceiling) EXACTLY as they are.\n\
         Replace furniture and decor to match the style.\n\
         Output a photorealistic image."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_style_falls_back_to_modern() {
        assert_eq!(normalize_style("   "), "Modern");
        assert_eq!(normalize_style(" Japandi "), "Japandi");
    }

    #[test]
    fn prompt_names_style_and_structural_constraint() {
        let prompt = style_prompt("Scandinavian");
        assert!(prompt.contains("'Scandinavian' style"));
        assert!(prompt.contains("walls, windows, doors, ceiling"));
        assert!(prompt.ends_with("Output a photorealistic image."));
    }
}
