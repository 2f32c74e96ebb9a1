use crate::config::{AppMode, PickerConfig};
use crate::merge::merge;
use crate::model::{MergedEntry, RepositoryRecord};
use crate::query::{matches_filter, sanitize};
use crate::search::{SearchCompletion, SearchSession, SearchTicket};
use crate::selection::SelectionSink;
use tracing::debug;

/// Key of the "Add more repositories..." entry shown in SaaS mode.
pub const INSTALL_KEY: &str = "install";

/// Repository picker state: the caller's known repositories, the current
/// search results and where selections go.
pub struct RepoPicker<S: SelectionSink> {
    known: Vec<RepositoryRecord>,
    session: SearchSession,
    sink: S,
    selected_key: Option<String>,
}

impl<S: SelectionSink> RepoPicker<S> {
    pub fn new(known: Vec<RepositoryRecord>, sink: S) -> Self {
        Self {
            known,
            session: SearchSession::new(),
            sink,
            selected_key: None,
        }
    }

    pub fn known(&self) -> &[RepositoryRecord] {
        &self.known
    }

    pub fn set_known(&mut self, known: Vec<RepositoryRecord>) {
        self.known = known;
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Sanitizes a settled input and starts a search if one is needed.
    pub fn begin_search(&mut self, settled_input: &str) -> Option<SearchTicket> {
        self.session.begin(sanitize(settled_input))
    }

    pub fn complete_search(&mut self, completion: SearchCompletion) -> bool {
        self.session.complete(completion)
    }

    pub fn merged(&self) -> Vec<MergedEntry<'_>> {
        merge(&self.known, self.session.results())
    }

    /// Merged entries whose name matches what is currently typed.
    pub fn visible(&self, input: &str) -> Vec<MergedEntry<'_>> {
        self.merged()
            .into_iter()
            .filter(|entry| matches_filter(&entry.record.full_name, input))
            .collect()
    }

    /// Selects the merged entry with `key`. Keys that are not currently
    /// listed are ignored.
    pub fn select(&mut self, key: &str) -> bool {
        let full_name = self
            .merged()
            .into_iter()
            .find(|entry| entry.key() == key)
            .map(|entry| entry.record.full_name.clone());
        match full_name {
            Some(full_name) => {
                self.sink.select(&full_name);
                self.selected_key = Some(key.to_string());
                true
            }
            None => {
                debug!(key, "ignoring selection of unlisted key");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.sink.clear();
        self.selected_key = None;
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    pub fn teardown(&mut self) {
        self.session.teardown();
    }
}

pub fn install_link(config: &PickerConfig) -> Option<String> {
    if config.app_mode != AppMode::Saas {
        return None;
    }
    let slug = config.app_slug.as_deref().filter(|slug| !slug.is_empty())?;
    Some(format!("https://github.com/apps/{slug}/installations/new"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::spawn_debounced;
    use crate::model::RepoOrigin;
    use crate::search::fetch;
    use crate::search::testing::ScriptedProvider;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct RecordingSink {
        events: Rc<RefCell<Vec<Option<String>>>>,
    }

    impl SelectionSink for RecordingSink {
        fn select(&self, full_name: &str) {
            self.events.borrow_mut().push(Some(full_name.to_string()));
        }

        fn clear(&self) {
            self.events.borrow_mut().push(None);
        }
    }

    fn apply(picker: &mut RepoPicker<RecordingSink>, raw: &str, records: Vec<RepositoryRecord>) {
        let ticket = picker.begin_search(raw).unwrap();
        assert!(picker.complete_search(SearchCompletion {
            ticket,
            outcome: Ok(records),
        }));
    }

    #[test]
    fn select_reports_full_name_once() {
        let sink = RecordingSink::default();
        let mut picker = RepoPicker::new(vec![RepositoryRecord::new(1, "me/own")], sink.clone());
        apply(&mut picker, "other", vec![RepositoryRecord::new(2, "them/other")]);

        assert!(picker.select("2"));
        assert_eq!(picker.selected_key(), Some("2"));
        assert_eq!(*sink.events.borrow(), vec![Some("them/other".to_string())]);
    }

    #[test]
    fn unknown_key_is_ignored() {
        let sink = RecordingSink::default();
        let mut picker = RepoPicker::new(vec![RepositoryRecord::new(1, "me/own")], sink.clone());
        assert!(!picker.select("99"));
        assert!(!picker.select(INSTALL_KEY));
        assert!(sink.events.borrow().is_empty());
        assert_eq!(picker.selected_key(), None);
    }

    #[test]
    fn clear_signals_sink() {
        let sink = RecordingSink::default();
        let mut picker = RepoPicker::new(vec![RepositoryRecord::new(1, "me/own")], sink.clone());
        picker.select("1");
        picker.clear();
        assert_eq!(
            *sink.events.borrow(),
            vec![Some("me/own".to_string()), None]
        );
        assert_eq!(picker.selected_key(), None);
    }

    #[test]
    fn merged_reflects_latest_known_list() {
        let mut picker = RepoPicker::new(Vec::new(), RecordingSink::default());
        apply(
            &mut picker,
            "x",
            vec![RepositoryRecord::new(1, "a/a"), RepositoryRecord::new(2, "b/b")],
        );
        assert_eq!(picker.merged().len(), 2);

        picker.set_known(vec![RepositoryRecord::new(2, "b/b")]);
        let merged = picker.merged();
        assert_eq!(merged[0].record.id, 2);
        assert_eq!(merged[0].origin, RepoOrigin::Known);
        assert_eq!(merged[1].record.id, 1);
        assert_eq!(merged[1].origin, RepoOrigin::Searched);
    }

    #[test]
    fn visible_filters_by_typed_input() {
        let picker = RepoPicker::new(
            vec![
                RepositoryRecord::new(1, "Octo/Cat"),
                RepositoryRecord::new(2, "octo/dog"),
            ],
            RecordingSink::default(),
        );
        let visible = picker.visible("https://github.com/octo/c");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].record.id, 1);
        assert_eq!(picker.visible("").len(), 2);
    }

    #[test]
    fn install_link_only_in_saas_mode() {
        let mut config = PickerConfig {
            app_slug: Some("my-app".to_string()),
            ..PickerConfig::default()
        };
        assert_eq!(install_link(&config), None);
        config.app_mode = AppMode::Saas;
        assert_eq!(
            install_link(&config).as_deref(),
            Some("https://github.com/apps/my-app/installations/new")
        );
        config.app_slug = None;
        assert_eq!(install_link(&config), None);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_settles_into_a_single_search() {
        let provider = Rc::new(ScriptedProvider::default().respond(
            "octo/c",
            30,
            vec![
                RepositoryRecord::new(1, "me/own"),
                RepositoryRecord::new(7, "octo/cat").with_stars(12),
            ],
        ));
        let sink = RecordingSink::default();
        let mut picker = RepoPicker::new(vec![RepositoryRecord::new(1, "me/own")], sink.clone());

        let (input, mut settled, _handle) = spawn_debounced(Duration::from_millis(300));
        input.push("https://github.com/Octo".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        input.push("https://github.com/Octo/C".to_string());
        drop(input);

        while let Some(raw) = settled.recv().await {
            if let Some(ticket) = picker.begin_search(&raw) {
                let done = fetch(provider.as_ref(), ticket).await;
                picker.complete_search(done);
            }
        }

        assert_eq!(*provider.calls.borrow(), vec!["octo/c".to_string()]);
        let labels: Vec<String> = picker.merged().iter().map(MergedEntry::label).collect();
        assert_eq!(labels, vec!["me/own".to_string(), "octo/cat (12⭐)".to_string()]);
        assert!(picker.select("7"));
        assert_eq!(*sink.events.borrow(), vec![Some("octo/cat".to_string())]);
    }
}
