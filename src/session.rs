use crate::domain::{Counters, SortDirection, Task, TaskError, TaskId, Theme};
use crate::persistence::{load_snapshot, load_theme, save_snapshot, save_theme, KeyValueStore, Snapshot};
use crate::store::{RenameOutcome, TaskStore};
use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, error, info};

/// Questions the list asks its user
pub trait Prompter {
    /// Yes/no question, true means go ahead
    fn confirm(&mut self, message: &str) -> bool;

    /// Ask for a line of text; `None` means cancelled
    fn prompt_text(&mut self, message: &str, default: &str) -> Option<String>;
}

/// A delete that has been requested but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub ids: HashSet<TaskId>,
    pub message: String,
}

/// The live list plus the storage it is saved to.
///
/// Every mutating operation validates, mutates, then saves. Session tallies
/// (deleted/edited) start at zero each time a session is opened.
pub struct Session {
    store: TaskStore,
    storage: Box<dyn KeyValueStore>,
    theme: Theme,
}

impl Session {
    /// Rehydrate from storage; unreadable data starts an empty list
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let store = load_snapshot(storage.as_ref()).into_store();
        let theme = load_theme(storage.as_ref());
        info!(tasks = store.len(), theme = theme.to_tag(), "session opened");

        Self {
            store,
            storage,
            theme,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn counters(&self) -> Counters {
        self.store.counters()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        save_theme(self.storage.as_mut(), theme)
    }

    /// Resolve a user reference: `#n` is a 1-based position, anything else a name
    pub fn resolve(&self, reference: &str) -> Option<TaskId> {
        let reference = reference.trim();
        if let Some(position) = reference.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
            return position
                .checked_sub(1)
                .and_then(|i| self.tasks().get(i))
                .map(|t| t.id);
        }
        self.store.find_by_text(reference).map(|t| t.id)
    }

    fn save(&mut self) -> Result<()> {
        let snapshot = Snapshot::from_store(&self.store);
        if let Err(e) = save_snapshot(self.storage.as_mut(), &snapshot) {
            error!("failed to save list: {:#}", e);
            return Err(e);
        }
        debug!(tasks = snapshot.tasks.len(), "saved list");
        Ok(())
    }

    pub fn create(&mut self, text: &str) -> Result<TaskId> {
        let id = self.store.create(text)?;
        info!(%id, "created task");
        self.save()?;
        Ok(id)
    }

    pub fn rename(&mut self, id: TaskId, new_text: &str) -> Result<RenameOutcome> {
        let outcome = self.store.rename(id, new_text)?;
        if outcome == RenameOutcome::Renamed {
            info!(%id, "renamed task");
            self.save()?;
        }
        Ok(outcome)
    }

    /// Ask for a new name, pre-filled with the current one. `None` when the
    /// prompt was cancelled or the task is gone.
    pub fn rename_with(&mut self, id: TaskId, prompter: &mut dyn Prompter) -> Result<Option<RenameOutcome>> {
        let Some(current) = self.store.get(id).map(|t| t.text.clone()) else {
            return Ok(None);
        };
        match prompter.prompt_text("Edit task:", &current) {
            Some(new_text) => self.rename(id, &new_text).map(Some),
            None => Ok(None),
        }
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<bool> {
        let completed = self.store.toggle_complete(id)?;
        info!(%id, completed, "toggled task");
        self.save()?;
        Ok(completed)
    }

    /// Prepare the confirmation for deleting one task; `None` if it is gone
    pub fn request_delete_one(&self, id: TaskId) -> Option<PendingDelete> {
        let task = self.store.get(id)?;
        Some(PendingDelete {
            ids: HashSet::from([id]),
            message: format!("Delete \"{}\"?", task.text),
        })
    }

    /// Prepare the confirmation for a bulk delete; `None` if nothing selected is left
    pub fn request_delete_selected(&self, ids: &HashSet<TaskId>) -> Option<PendingDelete> {
        let present: HashSet<TaskId> = ids
            .iter()
            .copied()
            .filter(|id| self.store.get(*id).is_some())
            .collect();
        if present.is_empty() {
            return None;
        }
        let message = format!("Delete {} selected tasks?", present.len());
        Some(PendingDelete {
            ids: present,
            message,
        })
    }

    /// Carry out a confirmed delete. Returns how many tasks were removed.
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> Result<usize> {
        let removed = if pending.ids.len() == 1 {
            let id = pending.ids.iter().copied().next();
            match id.map(|id| self.store.delete_one(id)) {
                Some(Ok(_)) => 1,
                Some(Err(TaskError::NotFound)) | None => 0,
                Some(Err(e)) => return Err(e.into()),
            }
        } else {
            self.store.delete_selected(&pending.ids).len()
        };

        if removed > 0 {
            info!(removed, "deleted tasks");
            self.save()?;
        }
        Ok(removed)
    }

    /// Delete one task after asking the prompter
    pub fn delete_one(&mut self, id: TaskId, prompter: &mut dyn Prompter) -> Result<usize> {
        match self.request_delete_one(id) {
            Some(pending) if prompter.confirm(&pending.message) => self.confirm_delete(pending),
            _ => Ok(0),
        }
    }

    /// Delete a selection after asking the prompter once for the whole set
    pub fn delete_selected(&mut self, ids: &HashSet<TaskId>, prompter: &mut dyn Prompter) -> Result<usize> {
        match self.request_delete_selected(ids) {
            Some(pending) if prompter.confirm(&pending.message) => self.confirm_delete(pending),
            _ => Ok(0),
        }
    }

    pub fn sort(&mut self, direction: SortDirection) -> Result<()> {
        self.store.sort(direction);
        info!(?direction, "sorted list");
        self.save()
    }

    pub fn sort_ascending(&mut self) -> Result<()> {
        self.sort(SortDirection::Ascending)
    }

    pub fn sort_descending(&mut self) -> Result<()> {
        self.sort(SortDirection::Descending)
    }

    /// Back to creation order
    pub fn reset(&mut self) -> Result<()> {
        self.store.reset();
        info!("reset list to original order");
        self.save()
    }

    /// Commit a finished drag. Returns whether the order changed.
    pub fn drag_reorder(&mut self, moved: TaskId, before: Option<TaskId>) -> Result<bool> {
        let changed = self.store.drag_reorder(moved, before)?;
        if changed {
            info!(%moved, "moved task");
            self.save()?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Answers questions from a script and records what was asked
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: VecDeque<bool>,
        texts: VecDeque<Option<String>>,
        asked: Vec<String>,
    }

    impl ScriptedPrompter {
        fn yes() -> Self {
            Self {
                answers: VecDeque::from([true]),
                ..Default::default()
            }
        }

        fn no() -> Self {
            Self {
                answers: VecDeque::from([false]),
                ..Default::default()
            }
        }

        fn typing(text: Option<&str>) -> Self {
            Self {
                texts: VecDeque::from([text.map(str::to_string)]),
                ..Default::default()
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn confirm(&mut self, message: &str) -> bool {
            self.asked.push(message.to_string());
            self.answers.pop_front().unwrap_or(false)
        }

        fn prompt_text(&mut self, message: &str, default: &str) -> Option<String> {
            self.asked.push(format!("{} [{}]", message, default));
            self.texts.pop_front().flatten()
        }
    }

    fn session() -> Session {
        Session::open(Box::new(MemoryStorage::new()))
    }

    fn names(session: &Session) -> Vec<&str> {
        session.tasks().iter().map(|t| t.text.as_str()).collect()
    }

    fn id(session: &Session, text: &str) -> TaskId {
        session.resolve(text).unwrap()
    }

    #[test]
    fn test_end_to_end_counters() {
        let mut session = session();
        session.create("Buy milk").unwrap();
        session.create("Buy bread").unwrap();
        session.toggle_complete(id(&session, "Buy milk")).unwrap();
        session.rename(id(&session, "Buy bread"), "Buy eggs").unwrap();

        assert_eq!(
            session.counters(),
            Counters {
                total: 2,
                completed: 1,
                deleted: 0,
                edited: 1
            }
        );

        let mut prompter = ScriptedPrompter::yes();
        let removed = session.delete_one(id(&session, "Buy milk"), &mut prompter).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(prompter.asked, vec!["Delete \"Buy milk\"?".to_string()]);

        let counters = session.counters();
        assert_eq!(counters.total, 1);
        assert_eq!(counters.deleted, 1);
        assert_eq!(names(&session), vec!["Buy eggs"]);
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let mut session = session();
        session.create("Buy milk").unwrap();

        let err = session.create("buy MILK").unwrap_err();
        assert!(matches!(err.downcast_ref::<TaskError>(), Some(TaskError::Duplicate(_))));
        assert_eq!(session.counters().total, 1);
    }

    #[test]
    fn test_declined_delete_keeps_task() {
        let mut session = session();
        session.create("a").unwrap();

        let removed = session.delete_one(id(&session, "a"), &mut ScriptedPrompter::no()).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(session.counters().total, 1);
        assert_eq!(session.counters().deleted, 0);
    }

    #[test]
    fn test_delete_missing_task_is_noop_without_prompt() {
        let mut session = session();
        let mut prompter = ScriptedPrompter::yes();

        assert_eq!(session.delete_one(TaskId::new(), &mut prompter).unwrap(), 0);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_delete_selected() {
        let mut session = session();
        for name in ["a", "b", "c"] {
            session.create(name).unwrap();
        }
        let selected: HashSet<TaskId> = [id(&session, "a"), id(&session, "b")].into();

        let mut prompter = ScriptedPrompter::yes();
        assert_eq!(session.delete_selected(&selected, &mut prompter).unwrap(), 2);
        assert_eq!(prompter.asked, vec!["Delete 2 selected tasks?".to_string()]);
        assert_eq!(names(&session), vec!["c"]);
        assert_eq!(session.counters().deleted, 2);
        assert_eq!(Snapshot::from_store(session.store()).original_order, vec!["c".to_string()]);
    }

    #[test]
    fn test_delete_selected_empty_asks_nothing() {
        let mut session = session();
        session.create("a").unwrap();
        let mut prompter = ScriptedPrompter::yes();

        assert_eq!(session.delete_selected(&HashSet::new(), &mut prompter).unwrap(), 0);
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_rename_with_prompt() {
        let mut session = session();
        session.create("Buy bread").unwrap();
        let task = id(&session, "Buy bread");

        let mut prompter = ScriptedPrompter::typing(Some("Buy eggs"));
        let outcome = session.rename_with(task, &mut prompter).unwrap();
        assert_eq!(outcome, Some(RenameOutcome::Renamed));
        assert_eq!(prompter.asked, vec!["Edit task: [Buy bread]".to_string()]);
        assert_eq!(names(&session), vec!["Buy eggs"]);
    }

    #[test]
    fn test_rename_with_cancelled_prompt() {
        let mut session = session();
        session.create("a").unwrap();
        let task = id(&session, "a");

        let outcome = session.rename_with(task, &mut ScriptedPrompter::typing(None)).unwrap();
        assert_eq!(outcome, None);
        assert_eq!(session.counters().edited, 0);
    }

    #[test]
    fn test_drag_then_reset() {
        let mut session = session();
        for name in ["a", "b", "c"] {
            session.create(name).unwrap();
        }
        let changed = session
            .drag_reorder(id(&session, "c"), Some(id(&session, "a")))
            .unwrap();
        assert!(changed);
        assert_eq!(names(&session), vec!["c", "a", "b"]);

        session.sort_descending().unwrap();
        session.reset().unwrap();
        assert_eq!(names(&session), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_resolve_position_and_name() {
        let mut session = session();
        session.create("first").unwrap();
        session.create("Second").unwrap();

        assert_eq!(session.resolve("#2"), Some(id(&session, "Second")));
        assert_eq!(session.resolve("second"), Some(id(&session, "Second")));
        assert_eq!(session.resolve("#0"), None);
        assert_eq!(session.resolve("#3"), None);
        assert_eq!(session.resolve("third"), None);
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = crate::persistence::storage_file(temp_dir.path());
        let open = || {
            let storage = crate::persistence::FileStorage::open(&path).unwrap();
            Session::open(Box::new(storage))
        };

        let mut session = open();
        session.create("b").unwrap();
        session.create("a").unwrap();
        session.sort_ascending().unwrap();
        session.toggle_complete(id(&session, "b")).unwrap();
        session.set_theme(Theme::Dark).unwrap();

        let reopened = open();
        assert_eq!(names(&reopened), vec!["a", "b"]);
        assert!(reopened.tasks()[1].completed);
        assert_eq!(reopened.theme(), Theme::Dark);
        assert_eq!(reopened.counters().edited, 0);
    }
}
