/// Named macro that appends several actions at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSequence {
    pub name: &'static str,
    pub actions: &'static [&'static str],
}

/// Built-in quick sequences offered next to the flow menu.
pub const QUICK_SEQUENCES: &[QuickSequence] = &[
    QuickSequence {
        name: "PnR Roll Finish",
        actions: &["Pick and Roll", "Pass to Roller", "Layup", "Made Shot"],
    },
    QuickSequence { name: "Iso Pull Up", actions: &["Isolation", "Pull Up Shot"] },
    QuickSequence {
        name: "Double Team Kick",
        actions: &["Double Teamed", "Pass Out", "Catch and Shoot"],
    },
    QuickSequence { name: "Post Kick Out", actions: &["Post Up", "Kick Out", "Catch and Shoot"] },
    QuickSequence { name: "Fast Break", actions: &["Transition", "Fast Break Layup", "Made Shot"] },
];

pub fn quick_sequence(name: &str) -> Option<&'static QuickSequence> {
    QUICK_SEQUENCES.iter().find(|q| q.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::TagVocabulary;

    #[test]
    fn test_every_preset_action_is_in_vocabulary() {
        let vocab = TagVocabulary::builtin();
        for preset in QUICK_SEQUENCES {
            for action in preset.actions {
                assert!(vocab.contains(action), "{} uses unknown '{}'", preset.name, action);
            }
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(quick_sequence("Iso Pull Up").unwrap().actions.len(), 2);
        assert!(quick_sequence("Alley Oop").is_none());
    }
}
