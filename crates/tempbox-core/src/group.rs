//! Grouping of a message's relations and files by role.
//!
//! Groups are derived on every call from the message itself and never
//! stored. An empty result means the section should not be rendered.

use tempbox_api::{FileRef, FileRole, Relation, RelationType};

use crate::model::Message;

/// Relations of `kind`, in the order they appear on the message.
#[must_use]
pub fn relations_of_type(message: &Message, kind: RelationType) -> Vec<&Relation> {
    message
        .relations
        .iter()
        .filter(|r| r.kind == kind)
        .collect()
}

/// Files with `role`, in the order they appear on the message.
#[must_use]
pub fn files_of_type(message: &Message, role: FileRole) -> Vec<&FileRef> {
    message.files.iter().filter(|f| f.role == role).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn relation(id: &str, kind: RelationType) -> Relation {
        Relation {
            id: id.into(),
            kind,
            display_name: String::new(),
            address: format!("{id}@example.com"),
        }
    }

    fn file(id: &str, role: FileRole) -> FileRef {
        FileRef {
            id: id.into(),
            role,
            file_name: format!("{id}.bin"),
            url: format!("https://files/{id}"),
        }
    }

    fn message(relations: Vec<Relation>, files: Vec<FileRef>) -> Message {
        Message {
            id: "1".into(),
            subject: String::new(),
            relations,
            files,
            text: String::new(),
            html: String::new(),
        }
    }

    #[test]
    fn test_missing_role_is_empty() {
        let msg = message(
            vec![relation("a", RelationType::To), relation("b", RelationType::Cc)],
            Vec::new(),
        );

        assert!(relations_of_type(&msg, RelationType::Bcc).is_empty());
        let cc = relations_of_type(&msg, RelationType::Cc);
        assert_eq!(cc.len(), 1);
        assert_eq!(cc[0].id, "b");
    }

    #[test]
    fn test_files_by_role() {
        let msg = message(
            Vec::new(),
            vec![
                file("logo", FileRole::Inline),
                file("invoice", FileRole::Attachment),
                file("banner", FileRole::Inline),
            ],
        );

        let inline: Vec<_> = files_of_type(&msg, FileRole::Inline)
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(inline, ["logo", "banner"]);
        assert_eq!(files_of_type(&msg, FileRole::Attachment).len(), 1);
        assert!(files_of_type(&msg, FileRole::Other).is_empty());
    }

    fn relation_type() -> impl Strategy<Value = RelationType> {
        prop_oneof![
            Just(RelationType::To),
            Just(RelationType::Cc),
            Just(RelationType::Bcc),
        ]
    }

    fn file_role() -> impl Strategy<Value = FileRole> {
        prop_oneof![
            Just(FileRole::Attachment),
            Just(FileRole::Inline),
            Just(FileRole::Other),
        ]
    }

    proptest! {
        #[test]
        fn prop_relations_are_ordered_subsequence(
            kinds in proptest::collection::vec(relation_type(), 0..24),
            wanted in relation_type(),
        ) {
            let relations = kinds
                .iter()
                .enumerate()
                .map(|(i, k)| relation(&i.to_string(), *k))
                .collect();
            let msg = message(relations, Vec::new());

            let first = relations_of_type(&msg, wanted);
            let second = relations_of_type(&msg, wanted);
            prop_assert_eq!(&first, &second);

            let expected: Vec<&Relation> =
                msg.relations.iter().filter(|r| r.kind == wanted).collect();
            prop_assert_eq!(first, expected);
        }

        #[test]
        fn prop_file_groups_partition_files(
            roles in proptest::collection::vec(file_role(), 0..24),
        ) {
            let files = roles
                .iter()
                .enumerate()
                .map(|(i, r)| file(&i.to_string(), *r))
                .collect();
            let msg = message(Vec::new(), files);

            let total: usize = [FileRole::Attachment, FileRole::Inline, FileRole::Other]
                .into_iter()
                .map(|role| files_of_type(&msg, role).len())
                .sum();
            prop_assert_eq!(total, msg.files.len());

            for role in [FileRole::Attachment, FileRole::Inline, FileRole::Other] {
                let ids: Vec<usize> = files_of_type(&msg, role)
                    .iter()
                    .map(|f| f.id.parse().unwrap())
                    .collect();
                prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
