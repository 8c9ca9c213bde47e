//! Message screen.

use std::fmt::Write;

use tempbox_api::{FileRole, RelationType};
use tempbox_core::{Message, files_of_type, relations_of_type};

use super::html_to_text;

/// Renders a message, or "Message not found" when none was assembled.
pub fn render(message: Option<&Message>) -> String {
    let Some(message) = message else {
        return "Message not found\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", message.subject);

    for kind in RelationType::ALL {
        let relations = relations_of_type(message, kind);
        if relations.is_empty() {
            continue;
        }
        let names: Vec<String> = relations.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "{kind}: {}", names.join(", "));
    }

    out.push('\n');
    out.push_str(body(message).trim_end());
    out.push('\n');

    for (role, heading) in FILE_GROUPS {
        let files = files_of_type(message, role);
        if files.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{heading}");
        for file in files {
            let _ = writeln!(out, "  {}  {}", file.file_name, file.url);
        }
    }
    out
}

/// File sections in display order.
const FILE_GROUPS: [(FileRole, &str); 3] = [
    (FileRole::Attachment, "Attachments"),
    (FileRole::Inline, "Inline"),
    (FileRole::Other, "Other files"),
];

/// Prefer plain text, fall back to HTML converted to text.
fn body(message: &Message) -> String {
    if message.has_text() {
        message.text.clone()
    } else if !message.html.trim().is_empty() {
        html_to_text(&message.html)
    } else {
        String::from("(No content)")
    }
}

#[cfg(test)]
mod tests {
    use tempbox_api::{FileRef, Relation};

    use super::*;

    fn relation(kind: RelationType, name: &str, address: &str) -> Relation {
        Relation {
            id: address.into(),
            kind,
            display_name: name.into(),
            address: address.into(),
        }
    }

    fn message() -> Message {
        Message {
            id: "42".into(),
            subject: "Welcome".into(),
            relations: vec![
                relation(RelationType::To, "Alice", "alice@example.com"),
                relation(RelationType::Cc, "", "bob@example.com"),
                relation(RelationType::To, "Carol", "carol@example.com"),
            ],
            files: vec![
                FileRef {
                    id: "1".into(),
                    role: FileRole::Inline,
                    file_name: "logo.png".into(),
                    url: "https://files/logo.png".into(),
                },
                FileRef {
                    id: "2".into(),
                    role: FileRole::Attachment,
                    file_name: "terms.pdf".into(),
                    url: "https://files/terms.pdf".into(),
                },
            ],
            text: "Hello there\n".into(),
            html: "<p>Hello there</p>".into(),
        }
    }

    #[test]
    fn test_not_found() {
        assert_eq!(render(None), "Message not found\n");
    }

    #[test]
    fn test_full_message() {
        let out = render(Some(&message()));
        assert_eq!(
            out,
            "Welcome\n\
             to: Alice <alice@example.com>, Carol <carol@example.com>\n\
             cc: <bob@example.com>\n\
             \n\
             Hello there\n\
             \n\
             Attachments\n  terms.pdf  https://files/terms.pdf\n\
             \n\
             Inline\n  logo.png  https://files/logo.png\n"
        );
    }

    #[test]
    fn test_absent_roles_are_suppressed() {
        let mut msg = message();
        msg.relations.retain(|r| r.kind != RelationType::Cc);
        msg.files.retain(|f| f.role != FileRole::Attachment);

        let out = render(Some(&msg));
        assert!(!out.contains("bcc:"));
        assert!(!out.contains("cc:"));
        assert!(!out.contains("Attachments"));
        assert!(!out.contains("Other files"));
        assert!(out.contains("Inline\n  logo.png"));
    }

    #[test]
    fn test_files_without_attachments_are_listed() {
        let mut msg = message();
        msg.files = vec![
            FileRef {
                id: "3".into(),
                role: FileRole::Other,
                file_name: "invite.ics".into(),
                url: "https://files/invite.ics".into(),
            },
            FileRef {
                id: "1".into(),
                role: FileRole::Inline,
                file_name: "logo.png".into(),
                url: "https://files/logo.png".into(),
            },
        ];

        let out = render(Some(&msg));
        assert!(!out.contains("Attachments"));
        assert!(out.ends_with(
            "Inline\n  logo.png  https://files/logo.png\n\
             \n\
             Other files\n  invite.ics  https://files/invite.ics\n"
        ));
    }

    #[test]
    fn test_html_body_when_text_is_empty() {
        let mut msg = message();
        msg.text = "  ".into();
        msg.html = "<p>Only <em>html</em></p>".into();

        let out = render(Some(&msg));
        assert!(out.contains("Only"));
        assert!(!out.contains("<p>"));
    }

    #[test]
    fn test_no_content() {
        let mut msg = message();
        msg.text.clear();
        msg.html.clear();
        assert!(render(Some(&msg)).contains("(No content)"));
    }
}
