//! Help listing data.
//!
//! Groups visible registrations for a help overlay. Rendering is left to the
//! UI layer; the types serialize to JSON so they can be handed over as-is.

use serde::Serialize;

use crate::registration::RegistrationStore;

/// One row of a help listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    /// The key specification as registered.
    pub keys: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Help entries sharing a group name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HelpGroup {
    /// The group name; `None` collects ungrouped hotkeys.
    pub group: Option<String>,
    pub hotkeys: Vec<HelpEntry>,
}

/// Build help groups from the registrations shown in the help menu.
///
/// Groups appear in order of their first registration, and entries keep
/// registration order within a group.
pub fn help_groups(store: &RegistrationStore) -> Vec<HelpGroup> {
    let mut groups: Vec<HelpGroup> = Vec::new();

    for registration in store.iter().filter(|r| r.show_in_help_menu()) {
        let entry = HelpEntry {
            keys: registration.keys().to_string(),
            description: registration.description().map(str::to_string),
        };

        match groups.iter_mut().find(|g| g.group.as_deref() == registration.group()) {
            Some(group) => group.hotkeys.push(entry),
            None => groups.push(HelpGroup {
                group: registration.group().map(str::to_string),
                hotkeys: vec![entry],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::HotkeyOptions;

    #[test]
    fn test_groups_in_first_appearance_order() {
        let mut store = RegistrationStore::new();
        let nav = HotkeyOptions::new().with_group("Navigation");
        store.register("g>i", &nav.clone().with_description("Go to inbox")).unwrap();
        store.register("ctrl.s", &HotkeyOptions::new().with_group("Editing")).unwrap();
        store.register("g>h", &nav.with_description("Go home")).unwrap();
        store.register("?", &HotkeyOptions::new()).unwrap();

        let groups = help_groups(&store);
        let names: Vec<_> = groups.iter().map(|g| g.group.as_deref()).collect();
        assert_eq!(names, vec![Some("Navigation"), Some("Editing"), None]);

        assert_eq!(
            groups[0].hotkeys,
            vec![
                HelpEntry {
                    keys: "g>i".to_string(),
                    description: Some("Go to inbox".to_string()),
                },
                HelpEntry {
                    keys: "g>h".to_string(),
                    description: Some("Go home".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_hidden_hotkeys_are_skipped() {
        let mut store = RegistrationStore::new();
        store
            .register("a", &HotkeyOptions::new().with_show_in_help_menu(false))
            .unwrap();
        store.register("b", &HotkeyOptions::new()).unwrap();

        let groups = help_groups(&store);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].hotkeys[0].keys, "b");
    }

    #[test]
    fn test_empty_store() {
        assert!(help_groups(&RegistrationStore::new()).is_empty());
    }

    #[test]
    fn test_serializes_for_ui() {
        let mut store = RegistrationStore::new();
        store.register("a", &HotkeyOptions::new().with_group("General")).unwrap();

        let json = serde_json::to_string(&help_groups(&store)).unwrap();
        assert_eq!(json, r#"[{"group":"General","hotkeys":[{"keys":"a"}]}]"#);
    }
}
