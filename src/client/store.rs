use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use super::{
    api::TodoApi,
    error::{ApiResult, ClientError},
};
use crate::models::Todo;

/// Client-side mirror of the server's todo list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    pub todos: Vec<Todo>,
    pub loading: bool,
    pub error: Option<ClientError>,
}

/// Everything that can happen to [`TodoState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoAction {
    FetchStarted,
    FetchSucceeded(Vec<Todo>),
    FetchFailed(ClientError),
    Created(Todo),
    Updated(Todo),
    Deleted(i64),
    /// A mutation failed; the list is left as it was.
    Failed(ClientError),
    ClearError,
}

impl TodoState {
    pub fn apply(&mut self, action: TodoAction) {
        match action {
            TodoAction::FetchStarted => {
                self.loading = true;
            }
            TodoAction::FetchSucceeded(todos) => {
                self.todos = todos;
                self.loading = false;
                self.error = None;
            }
            TodoAction::FetchFailed(err) => {
                self.todos.clear();
                self.loading = false;
                self.error = Some(err);
            }
            TodoAction::Created(todo) => {
                self.todos.push(todo);
                self.error = None;
            }
            TodoAction::Updated(todo) => {
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
                    *slot = todo;
                }
                self.error = None;
            }
            TodoAction::Deleted(id) => {
                self.todos.retain(|t| t.id != id);
                self.error = None;
            }
            TodoAction::Failed(err) => {
                self.error = Some(err);
            }
            TodoAction::ClearError => {
                self.error = None;
            }
        }
    }

    pub fn find(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Handle to the initial fetch started by [`TodoStore::load`].
#[derive(Debug)]
pub struct LoadHandle {
    task: JoinHandle<()>,
}

impl LoadHandle {
    /// Abandons the fetch. A response that arrives afterwards never reaches the state.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Waits for the fetch; `false` when it was cancelled.
    pub async fn finished(self) -> bool {
        self.task.await.is_ok()
    }
}

/// Owns the todo state and drives it through a [`TodoApi`].
///
/// Mutators do not queue. Each one applies its result when it resolves, so
/// overlapping calls land in completion order.
#[derive(Clone)]
pub struct TodoStore {
    api: Arc<dyn TodoApi>,
    state: Arc<watch::Sender<TodoState>>,
}

impl TodoStore {
    pub fn new(api: Arc<dyn TodoApi>) -> Self {
        let (state, _) = watch::channel(TodoState {
            loading: true,
            ..TodoState::default()
        });
        Self {
            api,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    /// Starts the initial fetch in the background.
    pub fn load(&self) -> LoadHandle {
        let store = self.clone();
        let task = tokio::spawn(async move { store.fetch().await });
        LoadHandle { task }
    }

    pub async fn refetch(&self) {
        self.dispatch(TodoAction::ClearError);
        self.fetch().await;
    }

    pub async fn create_todo(&self, text: &str) -> ApiResult<Todo> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyText);
        }
        let result = self.api.create_todo(text).await;
        self.settle(result, |todo| TodoAction::Created(todo.clone()))
    }

    pub async fn update_todo(&self, id: i64, completed: bool) -> ApiResult<Todo> {
        let result = self.api.update_todo(id, completed).await;
        self.settle(result, |todo| TodoAction::Updated(todo.clone()))
    }

    pub async fn delete_todo(&self, id: i64) -> ApiResult<()> {
        let result = self.api.delete_todo(id).await;
        self.settle(result, |_| TodoAction::Deleted(id))
    }

    /// Flips the completion of a todo already in the local list.
    /// `None` when the id is unknown locally.
    pub async fn toggle_todo(&self, id: i64) -> Option<ApiResult<Todo>> {
        let current = self.state.borrow().find(id).map(|todo| todo.completed);
        let completed = current?;
        Some(self.update_todo(id, !completed).await)
    }

    pub fn clear_error(&self) {
        self.dispatch(TodoAction::ClearError);
    }

    async fn fetch(&self) {
        self.dispatch(TodoAction::FetchStarted);
        match self.api.get_todos().await {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "todos loaded");
                self.dispatch(TodoAction::FetchSucceeded(todos));
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load todos");
                self.dispatch(TodoAction::FetchFailed(err));
            }
        }
    }

    fn settle<T>(&self, result: ApiResult<T>, on_ok: impl FnOnce(&T) -> TodoAction) -> ApiResult<T> {
        match &result {
            Ok(value) => self.dispatch(on_ok(value)),
            Err(err) => self.dispatch(TodoAction::Failed(err.clone())),
        }
        result
    }

    fn dispatch(&self, action: TodoAction) {
        self.state.send_modify(|state| state.apply(action));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::{TodoAction, TodoState, TodoStore};
    use crate::{
        client::{
            api::TodoApi,
            error::{ApiResult, ClientError},
        },
        models::Todo,
    };

    fn todo(id: i64, text: &str, completed: bool) -> Todo {
        Todo {
            id,
            text: text.to_string(),
            completed,
            created_at: format!("2026-02-{:02}T08:00:00.000Z", 10 + id),
        }
    }

    #[derive(Default)]
    struct FakeApi {
        todos: Mutex<Vec<Todo>>,
        failure: Mutex<Option<ClientError>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        /// Holds back updates that set `completed` to the given value.
        update_gates: Mutex<Vec<(bool, Arc<Notify>)>>,
    }

    impl FakeApi {
        fn with_todos(todos: Vec<Todo>) -> Self {
            Self {
                todos: Mutex::new(todos),
                ..Self::default()
            }
        }

        fn fail_next(&self, err: ClientError) {
            *self.failure.lock().unwrap() = Some(err);
        }

        fn hold_updates_to(&self, completed: bool) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.update_gates
                .lock()
                .unwrap()
                .push((completed, gate.clone()));
            gate
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record_call(&self) -> ApiResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl TodoApi for FakeApi {
        async fn get_todos(&self) -> ApiResult<Vec<Todo>> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.record_call()?;
            Ok(self.todos.lock().unwrap().clone())
        }

        async fn create_todo(&self, text: &str) -> ApiResult<Todo> {
            self.record_call()?;
            let mut todos = self.todos.lock().unwrap();
            let id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            let created = todo(id, text.trim(), false);
            todos.push(created.clone());
            Ok(created)
        }

        async fn update_todo(&self, id: i64, completed: bool) -> ApiResult<Todo> {
            let gate = self
                .update_gates
                .lock()
                .unwrap()
                .iter()
                .find(|(value, _)| *value == completed)
                .map(|(_, gate)| gate.clone());
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.record_call()?;
            let mut todos = self.todos.lock().unwrap();
            let entry = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(ClientError::NotFound)?;
            entry.completed = completed;
            Ok(entry.clone())
        }

        async fn delete_todo(&self, id: i64) -> ApiResult<()> {
            self.record_call()?;
            let mut todos = self.todos.lock().unwrap();
            let before = todos.len();
            todos.retain(|t| t.id != id);
            if todos.len() == before {
                return Err(ClientError::NotFound);
            }
            Ok(())
        }
    }

    async fn loaded_store(api: Arc<FakeApi>) -> TodoStore {
        let store = TodoStore::new(api);
        assert!(store.load().finished().await);
        store
    }

    #[test]
    fn fetch_failure_empties_the_list() {
        let mut state = TodoState {
            todos: vec![todo(1, "stale", false)],
            loading: true,
            error: None,
        };

        state.apply(TodoAction::FetchFailed(ClientError::Network));

        assert!(state.todos.is_empty());
        assert!(!state.loading);
        assert_eq!(
            state.error_message().as_deref(),
            Some("Network error. Please try again.")
        );
    }

    #[test]
    fn created_todo_is_appended_without_resorting() {
        let mut state = TodoState {
            todos: vec![todo(2, "newer", false), todo(1, "older", false)],
            loading: false,
            error: Some(ClientError::Unknown),
        };

        state.apply(TodoAction::Created(todo(3, "newest", false)));

        let ids: Vec<i64> = state.todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert!(state.error.is_none());
    }

    #[test]
    fn updates_replace_in_place_and_failures_keep_the_list() {
        let mut state = TodoState {
            todos: vec![todo(1, "a", false), todo(2, "b", false)],
            ..TodoState::default()
        };

        state.apply(TodoAction::Updated(todo(1, "a", true)));
        state.apply(TodoAction::Failed(ClientError::NotFound));

        assert_eq!(state.todos, vec![todo(1, "a", true), todo(2, "b", false)]);
        assert_eq!(state.error, Some(ClientError::NotFound));

        state.apply(TodoAction::Deleted(1));
        assert_eq!(state.todos, vec![todo(2, "b", false)]);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn load_fills_the_list() {
        let api = Arc::new(FakeApi::with_todos(vec![todo(2, "b", true), todo(1, "a", false)]));
        let store = TodoStore::new(api.clone());
        assert!(store.snapshot().loading);

        assert!(store.load().finished().await);

        let state = store.snapshot();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.todos.len(), 2);
    }

    #[tokio::test]
    async fn load_failure_sets_error() {
        let api = Arc::new(FakeApi::default());
        api.fail_next(ClientError::ServerUnavailable);

        let store = loaded_store(api).await;

        let state = store.snapshot();
        assert!(state.todos.is_empty());
        assert!(!state.loading);
        assert_eq!(
            state.error_message().as_deref(),
            Some("Server is unavailable. Please try again later.")
        );
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_a_request() {
        let api = Arc::new(FakeApi::with_todos(vec![todo(1, "a", false)]));
        let store = loaded_store(api.clone()).await;
        let before = store.snapshot();
        let calls = api.calls();

        let err = store.create_todo("   ").await.unwrap_err();

        assert_eq!(err.to_string(), "Todo text cannot be empty");
        assert_eq!(api.calls(), calls);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn create_appends_and_failure_keeps_list() {
        let api = Arc::new(FakeApi::default());
        let store = loaded_store(api.clone()).await;

        let created = store.create_todo("Buy milk").await.expect("create");
        assert_eq!(store.snapshot().todos, vec![created.clone()]);

        api.fail_next(ClientError::Rejected(
            "body/text must NOT have more than 500 characters".to_string(),
        ));
        let err = store.create_todo("x").await.unwrap_err();

        let state = store.snapshot();
        assert_eq!(state.todos, vec![created]);
        assert_eq!(state.error, Some(err));
    }

    #[tokio::test]
    async fn toggle_flips_known_todos_only() {
        let api = Arc::new(FakeApi::with_todos(vec![todo(1, "a", false)]));
        let store = loaded_store(api.clone()).await;

        let toggled = store.toggle_todo(1).await.expect("known id").expect("toggle");
        assert!(toggled.completed);
        assert!(store.snapshot().todos[0].completed);

        let calls = api.calls();
        assert!(store.toggle_todo(42).await.is_none());
        assert_eq!(api.calls(), calls);
    }

    #[tokio::test]
    async fn delete_removes_and_reports_missing_todos() {
        let api = Arc::new(FakeApi::with_todos(vec![todo(1, "a", false), todo(2, "b", false)]));
        let store = loaded_store(api).await;

        store.delete_todo(1).await.expect("delete");
        assert_eq!(store.snapshot().todos, vec![todo(2, "b", false)]);

        let err = store.delete_todo(1).await.unwrap_err();
        assert_eq!(err.to_string(), "Todo not found. It may have been deleted.");
        assert_eq!(store.snapshot().todos, vec![todo(2, "b", false)]);
    }

    #[tokio::test]
    async fn refetch_clears_error_and_reloads() {
        let api = Arc::new(FakeApi::with_todos(vec![todo(1, "a", false)]));
        api.fail_next(ClientError::Network);
        let store = loaded_store(api).await;
        assert!(store.snapshot().error.is_some());

        store.refetch().await;

        let state = store.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.todos, vec![todo(1, "a", false)]);
    }

    #[tokio::test]
    async fn failed_refetch_empties_the_list() {
        let api = Arc::new(FakeApi::with_todos(vec![todo(1, "a", false)]));
        let store = loaded_store(api.clone()).await;
        assert_eq!(store.snapshot().todos.len(), 1);

        api.fail_next(ClientError::ServerUnavailable);
        store.refetch().await;

        let state = store.snapshot();
        assert!(state.todos.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, Some(ClientError::ServerUnavailable));
    }

    #[tokio::test]
    async fn overlapping_updates_apply_in_completion_order() {
        let api = Arc::new(FakeApi::with_todos(vec![todo(1, "a", false)]));
        let store = loaded_store(api.clone()).await;
        let first_gate = api.hold_updates_to(true);
        let second_gate = api.hold_updates_to(false);

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.update_todo(1, true).await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.update_todo(1, false).await }
        });

        second_gate.notify_one();
        let second = second.await.expect("second update task").expect("second update");
        assert!(!second.completed);
        assert!(!store.snapshot().todos[0].completed);

        first_gate.notify_one();
        let first = first.await.expect("first update task").expect("first update");
        assert!(first.completed);

        let state = store.snapshot();
        assert!(state.todos[0].completed);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn clear_error_dismisses_banner() {
        let api = Arc::new(FakeApi::default());
        api.fail_next(ClientError::Network);
        let store = loaded_store(api).await;

        store.clear_error();

        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn cancelled_load_discards_late_result() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            todos: Mutex::new(vec![todo(1, "a", false)]),
            gate: Some(gate.clone()),
            ..FakeApi::default()
        });
        let store = TodoStore::new(api.clone());

        let handle = store.load();
        handle.cancel();
        gate.notify_one();

        assert!(!handle.finished().await);
        assert!(store.snapshot().todos.is_empty());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let api = Arc::new(FakeApi::default());
        let store = loaded_store(api).await;
        let mut rx = store.subscribe();
        let _ = rx.borrow_and_update();

        store.create_todo("watched").await.expect("create");

        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().todos[0].text, "watched");
    }
}
