use askama::Template;

use super::store::TodoState;
use crate::models::Todo;

pub const LOADING_MESSAGE: &str = "Loading todos...";
pub const EMPTY_MESSAGE: &str = "No todos yet. Add one to get started!";

#[derive(Template)]
#[template(path = "components/loading_spinner.html")]
pub struct LoadingSpinner<'a> {
    pub message: &'a str,
}

#[derive(Template)]
#[template(path = "components/empty_state.html")]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl Default for EmptyState<'_> {
    fn default() -> Self {
        Self {
            message: EMPTY_MESSAGE,
        }
    }
}

#[derive(Template)]
#[template(path = "components/error_message.html")]
pub struct ErrorMessage<'a> {
    pub message: &'a str,
    pub dismissible: bool,
}

/// Submit is disabled while `disabled` is set or the value is blank.
#[derive(Template)]
#[template(path = "components/todo_input.html")]
pub struct TodoInput<'a> {
    pub value: &'a str,
    pub disabled: bool,
    pub submit_label: &'a str,
}

impl Default for TodoInput<'_> {
    fn default() -> Self {
        Self {
            value: "",
            disabled: false,
            submit_label: "Add",
        }
    }
}

#[derive(Template)]
#[template(path = "components/todo_item.html")]
pub struct TodoItem<'a> {
    pub todo: &'a Todo,
}

#[derive(Template)]
#[template(path = "components/todo_list.html")]
pub struct TodoList<'a> {
    pub todos: &'a [Todo],
}

/// The whole screen for one [`TodoState`].
#[derive(Template)]
#[template(path = "page.html")]
pub struct TodoPage<'a> {
    pub todos: &'a [Todo],
    pub loading: bool,
    pub error: Option<String>,
    pub input_value: &'a str,
    pub loading_message: &'a str,
    pub empty_message: &'a str,
}

impl<'a> TodoPage<'a> {
    pub fn from_state(state: &'a TodoState, input_value: &'a str) -> Self {
        Self {
            todos: &state.todos,
            loading: state.loading,
            error: state.error_message(),
            input_value,
            loading_message: LOADING_MESSAGE,
            empty_message: EMPTY_MESSAGE,
        }
    }
}
