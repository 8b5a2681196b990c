//! Instruction text for the upstream model.

use crate::prompt::language::Language;

/// Renders the compliment instruction.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sender_name: Option<String>,
}

impl PromptBuilder {
    /// Create a builder. With `sender_name` set the compliment is written
    /// on that person's behalf; otherwise it speaks of "the author".
    pub fn new(sender_name: Option<String>) -> Self {
        Self {
            sender_name: sender_name.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Build the prompt for `target_name` from an ordered attribute list.
    pub fn build(&self, target_name: &str, attributes: &[String], lang_tag: Option<&str>) -> String {
        let language = Language::from_tag(lang_tag).label();
        let sender = self.sender_name.as_deref().unwrap_or("the author");
        let bullets = attributes
            .iter()
            .map(|a| format!("• {}", a))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Write a kind, professional, and natural-sounding compliment in {language}.\n\
             It should be a short message from {sender} addressed directly to a person named {target_name},\n\
             based on the following skills and qualities:\n\
             \n{bullets}\n\n\
             Use the correct grammatical form of the name \"{target_name}\" as it would naturally appear in the message\n\
             (for example, in vocative case in Czech).\n\
             \n\
             The message should be warm, sincere, and appreciative, as if {sender} truly values this person's work \
             and would be excited to become their colleague.\n\
             Avoid generic phrases, clichés, or placeholder symbols like {{{{name}}}}.\n\
             Make it personal, human, and written in proper {language}.\n\
             \n\
             Use **double line breaks** (\\n\\n) between paragraphs to clearly indicate paragraph breaks in the output.\n\
             This is important for rendering the text correctly in a web interface.\n\
             \n\
             At the end, subtly express that {sender} would be happy to join this person's team."
        )
    }
}

/// Build a prompt without a named sender.
pub fn build(target_name: &str, attributes: &[String], lang_tag: Option<&str>) -> String {
    PromptBuilder::default().build(target_name, attributes, lang_tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_attributes_rendered_in_order() {
        let prompt = build("Petra", &attrs(&["Reliable", "Curious", "Calm"]), None);

        assert!(prompt.contains("• Reliable\n• Curious\n• Calm"));
        let reliable = prompt.find("• Reliable").unwrap();
        let calm = prompt.find("• Calm").unwrap();
        assert!(reliable < calm);
    }

    #[test]
    fn test_language_branch() {
        let cs = build("Petra", &attrs(&["Reliable"]), Some("cs-CZ"));
        assert!(cs.contains("compliment in Czech."));
        assert!(cs.contains("written in proper Czech."));

        let en = build("Petra", &attrs(&["Reliable"]), Some("fr"));
        assert!(en.contains("compliment in English."));
        assert!(!en.contains("proper Czech"));
    }

    #[test]
    fn test_instructions_present() {
        let prompt = build("Tomáš", &attrs(&["Patient"]), Some("en"));

        assert!(prompt.contains("a person named Tomáš"));
        assert!(prompt.contains("grammatical form of the name \"Tomáš\""));
        assert!(prompt.contains("placeholder symbols like {{name}}"));
        assert!(prompt.contains("double line breaks"));
        assert!(prompt.contains("(\\n\\n)"));
        assert!(prompt.ends_with("would be happy to join this person's team."));
    }

    #[test]
    fn test_sender_name() {
        let named = PromptBuilder::new(Some("Jana".into())).build("Petra", &attrs(&["Kind"]), None);
        assert!(named.contains("a short message from Jana addressed"));
        assert!(named.contains("that Jana would be happy"));

        let blank = PromptBuilder::new(Some("  ".into())).build("Petra", &attrs(&["Kind"]), None);
        assert!(blank.contains("from the author addressed"));
    }

    #[test]
    fn test_empty_attributes_do_not_panic() {
        let prompt = build("Petra", &[], None);
        assert!(prompt.contains("skills and qualities:\n\n\n"));
    }
}
