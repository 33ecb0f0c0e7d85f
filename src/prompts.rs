pub const CREATIVE_IDEAS: &str = include_str!("../data/prompts/creative_ideas.txt");
pub const MASK_EDIT: &str = include_str!("../data/prompts/mask_edit.txt");
pub const REFERENCE_GENERATION: &str = include_str!("../data/prompts/reference_generation.txt");
pub const PROMPT_IDEAS_FORM: &str = include_str!("../data/prompts/prompt_ideas_form.txt");
pub const PROMPT_IDEAS_IMAGES: &str = include_str!("../data/prompts/prompt_ideas_images.txt");

/// Replace `{{key}}` placeholders in a template string. Substituted values
/// are inserted verbatim and never scanned for further placeholders.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "cats")]),
            "cats and {{b}}"
        );
    }

    #[test]
    fn test_render_does_not_expand_placeholders_in_values() {
        assert_eq!(
            render(
                "{{prompt}} at {{aspect_ratio}}",
                &[("prompt", "draw {{aspect_ratio}}"), ("aspect_ratio", "16:9")]
            ),
            "draw {{aspect_ratio}} at 16:9"
        );
    }

    #[test]
    fn test_render_repeated_and_unclosed_placeholders() {
        assert_eq!(
            render("{{a}}-{{a}} {{open", &[("a", "x")]),
            "x-x {{open"
        );
    }

    #[test]
    fn test_prompts_are_non_empty() {
        for template in [
            CREATIVE_IDEAS,
            MASK_EDIT,
            REFERENCE_GENERATION,
            PROMPT_IDEAS_FORM,
            PROMPT_IDEAS_IMAGES,
        ] {
            assert!(!template.trim().is_empty());
        }
    }

    #[test]
    fn test_templates_have_placeholders() {
        assert!(MASK_EDIT.contains("{{prompt}}"));
        assert!(REFERENCE_GENERATION.contains("{{prompt}}"));
        assert!(REFERENCE_GENERATION.contains("{{aspect_ratio}}"));
        for key in ["subject", "style", "mood", "details", "reference_note"] {
            assert!(PROMPT_IDEAS_FORM.contains(&format!("{{{{{}}}}}", key)));
        }
        assert!(PROMPT_IDEAS_IMAGES.contains("{{image_count}}"));
    }
}
