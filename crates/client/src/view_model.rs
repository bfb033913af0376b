//! Presentation of the stored profile.

use crewdash_core::UserData;

use crate::user_data::UserDataStore;

const DEFAULT_NAME: &str = "User";
const DEFAULT_ROLE: &str = "Worker";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileViewModel {
    data: Option<UserData>,
}

impl ProfileViewModel {
    pub fn new(data: Option<UserData>) -> Self {
        Self { data }
    }

    pub async fn from_store(store: &UserDataStore) -> Self {
        Self::new(store.load().await)
    }

    pub fn display_name(&self) -> &str {
        self.data
            .as_ref()
            .and_then(UserData::full_name)
            .unwrap_or(DEFAULT_NAME)
    }

    pub fn display_role(&self) -> String {
        self.data
            .as_ref()
            .and_then(UserData::worker_type)
            .map(title_case)
            .unwrap_or_else(|| DEFAULT_ROLE.to_string())
    }
}

/// Uppercase the first character; the rest is left as is.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_only_touches_the_first_character() {
        assert_eq!(title_case("worker"), "Worker");
        assert_eq!(title_case("site foreman"), "Site foreman");
        assert_eq!(title_case("hVAC"), "HVAC");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn defaults_without_data() {
        let vm = ProfileViewModel::new(None);
        assert_eq!(vm.display_name(), "User");
        assert_eq!(vm.display_role(), "Worker");
    }

    #[test]
    fn absent_worker_type_defaults_role() {
        let vm = ProfileViewModel::new(Some(UserData::from_parts(Some("Jo Lin".to_string()), None)));
        assert_eq!(vm.display_name(), "Jo Lin");
        assert_eq!(vm.display_role(), "Worker");
    }

    #[test]
    fn present_fields_are_displayed() {
        let vm = ProfileViewModel::new(Some(UserData::new("Jo Lin", "plumber")));
        assert_eq!(vm.display_name(), "Jo Lin");
        assert_eq!(vm.display_role(), "Plumber");
    }

    #[tokio::test]
    async fn reads_through_the_store() {
        use std::sync::Arc;

        use crate::store::InMemoryKeyValueStore;

        let store = UserDataStore::new(Arc::new(InMemoryKeyValueStore::new()));
        assert_eq!(ProfileViewModel::from_store(&store).await.display_name(), "User");

        store.save(&UserData::new("Jo Lin", "plumber")).await;
        assert_eq!(ProfileViewModel::from_store(&store).await.display_role(), "Plumber");
    }
}
