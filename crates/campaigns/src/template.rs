//! Message template rendering with a fixed placeholder vocabulary.
//!
//! `{student_name}`-style tokens are filled from the per-recipient context.
//! Rendering never fails: a recognized placeholder whose field is missing
//! becomes an empty string (partial personalization beats dropping the
//! recipient), and an unrecognized placeholder is left verbatim so a
//! malformed template stays visible to the operator.

use reach_crm::Student;

/// Per-recipient substitution context. All fields optional; a `None`
/// renders as empty.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub student_email: Option<String>,
    pub facilitator_name: Option<String>,
    pub caller_name: Option<String>,
    pub offering_title: Option<String>,
}

impl RenderContext {
    pub fn for_student(student: &Student) -> Self {
        Self {
            student_name: Some(student.name.clone()),
            student_phone: Some(student.phone_number.clone()),
            student_email: student.email.clone(),
            ..Default::default()
        }
    }

    pub fn with_facilitator_name(mut self, name: Option<&str>) -> Self {
        self.facilitator_name = name.map(str::to_string);
        self
    }

    /// Value for a recognized placeholder, or `None` when the name is not
    /// in the vocabulary at all.
    fn lookup(&self, placeholder: &str) -> Option<&str> {
        let field = match placeholder {
            "student_name" => &self.student_name,
            "student_phone" => &self.student_phone,
            "student_email" => &self.student_email,
            "facilitator_name" | "practitioner_name" => &self.facilitator_name,
            "caller_name" => &self.caller_name,
            "offering_title" => &self.offering_title,
            _ => return None,
        };
        Some(field.as_deref().unwrap_or(""))
    }
}

/// Fill every recognized `{placeholder}` in `template` from `context`.
pub fn render(template: &str, context: &RenderContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match context.lookup(token) {
                    Some(value) => out.push_str(value),
                    // Unknown token stays verbatim, braces included.
                    None => {
                        out.push('{');
                        out.push_str(token);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // Unclosed brace: emit the remainder as-is.
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_named(name: &str) -> RenderContext {
        RenderContext {
            student_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_substitutes_known_placeholder() {
        assert_eq!(
            render("Hi {student_name}!", &context_named("Asha")),
            "Hi Asha!"
        );
    }

    #[test]
    fn test_missing_field_becomes_empty() {
        let context = RenderContext::default();
        assert_eq!(render("Hi {student_name}!", &context), "Hi !");
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        assert_eq!(
            render("Hi {student_name}, use code {promo_code}", &context_named("Asha")),
            "Hi Asha, use code {promo_code}"
        );
    }

    #[test]
    fn test_multiple_placeholders() {
        let context = RenderContext {
            student_name: Some("Asha".to_string()),
            facilitator_name: Some("Ravi".to_string()),
            caller_name: Some("Maya".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render(
                "Hi {student_name}! This is {caller_name} calling about {facilitator_name}'s workshop.",
                &context
            ),
            "Hi Asha! This is Maya calling about Ravi's workshop."
        );
    }

    #[test]
    fn test_unclosed_brace_passes_through() {
        assert_eq!(
            render("Hi {student_name", &context_named("Asha")),
            "Hi {student_name"
        );
    }

    #[test]
    fn test_template_without_placeholders_is_identity() {
        let context = RenderContext::default();
        assert_eq!(render("See you tomorrow!", &context), "See you tomorrow!");
    }
}
