/// Splits freeform instructions into numbered steps.
///
/// Every period ends a step, so "1.5 cups" or text that is already numbered
/// gets split and numbered again.
pub fn step_lines(raw: &str) -> Vec<String> {
    raw.split('.')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect()
}

/// Numbered steps joined by newlines, empty for blank input.
pub fn format_steps(raw: &str) -> String {
    step_lines(raw).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_become_numbered_lines() {
        assert_eq!(
            format_steps("Boil water. Add pasta. Drain."),
            "1. Boil water\n2. Add pasta\n3. Drain"
        );
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(format_steps(""), "");
        assert_eq!(format_steps("  \n "), "");
        assert!(step_lines(". . .").is_empty());
    }

    #[test]
    fn test_text_without_periods_is_one_step() {
        assert_eq!(format_steps("  Stir well  "), "1. Stir well");
    }

    #[test]
    fn test_numbered_input_is_split_again() {
        // Periods after step numbers are separators too
        assert_eq!(
            step_lines("1. Soak rice. 2. Grind"),
            vec!["1. 1", "2. Soak rice", "3. 2", "4. Grind"]
        );
    }
}
