use super::wrap_line;
use super::View;
use crate::domain::models::Message;
use crate::domain::models::Role;

fn view_fixture<'a>() -> View<'a> {
    return View::new("Mr Dep Dodep".to_string(), vec![], vec![]);
}

#[test]
fn it_picks_the_most_recent_assistant_reply() {
    let mut view = view_fixture();
    view.messages.push(Message::new(Role::User, "first question"));
    view.messages
        .push(Message::new(Role::Assistant, "first answer"));
    view.messages.push(Message::new(Role::User, "second question"));
    view.messages
        .push(Message::new(Role::Assistant, "second answer"));
    view.messages.push(Message::new(Role::User, "unanswered"));

    let reply = view.latest_reply().unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "second answer");
}

#[test]
fn it_has_no_reply_before_the_first_answer() {
    let mut view = view_fixture();
    assert!(view.latest_reply().is_none());

    view.messages.push(Message::new(Role::User, "hello?"));
    assert!(view.latest_reply().is_none());
}

#[test]
fn it_wraps_long_lines_on_word_boundaries() {
    let lines = wrap_line("a calm and measured answer about podcasts", 20);

    assert_eq!(
        lines,
        vec!["a calm and measured", "answer about", "podcasts"]
    );
}

#[test]
fn it_keeps_blank_lines_as_spacers() {
    let lines = wrap_line("one\n\ntwo", 80);

    assert_eq!(lines, vec!["one", " ", "two"]);
}
