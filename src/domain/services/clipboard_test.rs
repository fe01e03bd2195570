use std::path;

use super::CopyPayload;

#[test]
fn it_copies_images_as_their_path() {
    let payload = CopyPayload::ImagePath(path::PathBuf::from("/pictures/mr-dep-1.jpg"));

    assert_eq!(payload.into_text(), "/pictures/mr-dep-1.jpg");
}

#[test]
fn it_copies_cards_and_replies_verbatim() {
    let card = CopyPayload::DocCard("Who is Mr Dep\n\nCalm. Measured.".to_string());
    assert_eq!(card.into_text(), "Who is Mr Dep\n\nCalm. Measured.");

    let reply = CopyPayload::ChatReply("Short answer. Good question.".to_string());
    assert_eq!(reply.into_text(), "Short answer. Good question.");
}
